//! World geometry resolution.
//!
//! Turns each pen's local, possibly parent-relative geometry into absolute
//! world rects, anchors and sub-rects. Results are memoized in the pen's
//! calculative sidecar; the caller clears them through
//! [`PenTable::invalidate`](crate::store::PenTable::invalidate) when local
//! geometry changes.
//!
//! Ordering: a child's rect is never computed before its parent's, and a
//! pen's anchors and sub-rects never before its own rect.

use crate::errors::ResolveError;
use crate::ids::IdGenerator;
use crate::log::debug;
use crate::pen::Pen;
use crate::store::PenTable;
use crate::types::{Anchor, Rect, parent_relative, self_relative};

/// Resolve the world rect of `id`, resolving uncached ancestors first.
///
/// The result is written into the pen's sidecar together with its world
/// rotation. Rotation composes additively and is not normalized here.
pub fn world_rect(table: &mut PenTable, id: &str) -> Result<Rect, ResolveError> {
    world_rect_at_depth(table, id, 0)
}

fn world_rect_at_depth(
    table: &mut PenTable,
    id: &str,
    depth: usize,
) -> Result<Rect, ResolveError> {
    if depth > table.len() {
        return Err(ResolveError::ParentCycle { pen: id.to_string() });
    }

    let pen = table
        .get(id)
        .ok_or_else(|| ResolveError::UnknownPen { id: id.to_string() })?;

    let rect = match pen.parent_id.clone() {
        None => Rect::new(pen.x, pen.y, pen.width, pen.height).with_rotate(pen.rotate),
        Some(parent_id) => {
            let (x, y, width, height, rotate) = (pen.x, pen.y, pen.width, pen.height, pen.rotate);
            let cached = table
                .get(&parent_id)
                .ok_or_else(|| ResolveError::UnknownParent {
                    pen: id.to_string(),
                    parent: parent_id.clone(),
                })?
                .calculative
                .world_rect;
            let parent = match cached {
                Some(rect) => rect,
                None => world_rect_at_depth(table, &parent_id, depth + 1)?,
            };

            Rect::new(
                parent.x() + parent_relative(x, parent.width()),
                parent.y() + parent_relative(y, parent.height()),
                parent_relative(width, parent.width()),
                parent_relative(height, parent.height()),
            )
            .with_rotate(parent.rotate() + rotate)
        }
    };

    debug!(
        pen = id,
        x = rect.x(),
        y = rect.y(),
        width = rect.width(),
        height = rect.height(),
        rotate = rect.rotate(),
        "resolved world rect"
    );

    if let Some(pen) = table.get_mut(id) {
        pen.calculative.world_rect = Some(rect);
        pen.calculative.world_rotate = Some(rect.rotate());
    }
    Ok(rect)
}

/// Resolve the pen's world anchors from its already-resolved rect.
///
/// Declared custom anchors map into the rect and keep their ids; when none are
/// declared the pen gets four fresh edge midpoints (top, right, bottom, left).
pub fn world_anchors(pen: &mut Pen, ids: &mut dyn IdGenerator) -> Result<(), ResolveError> {
    let rect = pen
        .calculative
        .world_rect
        .ok_or_else(|| ResolveError::Unresolved { pen: pen.id.clone() })?;

    let mut anchors: Vec<Anchor> = pen
        .anchors
        .iter()
        .filter(|spec| spec.custom)
        .map(|spec| {
            let pt = rect.point_at(spec.x, spec.y);
            Anchor {
                id: spec.id.clone().unwrap_or_else(|| ids.next_id()),
                pen_id: pen.id.clone(),
                x: pt.x,
                y: pt.y,
                color: spec.color.clone(),
                background: spec.background.clone(),
                custom: true,
            }
        })
        .collect();

    if anchors.is_empty() {
        anchors = [(0.5, 0.0), (1.0, 0.5), (0.5, 1.0), (0.0, 0.5)]
            .into_iter()
            .map(|(fx, fy)| {
                let pt = rect.point_at(fx, fy);
                Anchor {
                    id: ids.next_id(),
                    pen_id: pen.id.clone(),
                    x: pt.x,
                    y: pt.y,
                    color: None,
                    background: None,
                    custom: false,
                }
            })
            .collect();
    }

    pen.calculative.world_anchors = Some(anchors);
    Ok(())
}

/// Resolve the icon sub-rect of `id`.
///
/// Offsets and sizes are fractions of the pen's own resolved size when
/// non-zero with magnitude below 1. The rect's rotation is the parent's world
/// rotation modulo 360; root pens get 0.
pub fn icon_rect(table: &mut PenTable, id: &str) -> Result<(), ResolveError> {
    let pen = table
        .get(id)
        .ok_or_else(|| ResolveError::UnknownPen { id: id.to_string() })?;
    let own = pen
        .calculative
        .world_rect
        .ok_or_else(|| ResolveError::Unresolved { pen: id.to_string() })?;

    let parent_rotate = match pen.parent_id.clone() {
        None => 0.0,
        Some(parent_id) => {
            let cached = table
                .get(&parent_id)
                .ok_or_else(|| ResolveError::UnknownParent {
                    pen: id.to_string(),
                    parent: parent_id.clone(),
                })?
                .calculative
                .world_rect;
            match cached {
                Some(rect) => rect.rotate(),
                None => world_rect(table, &parent_id)?.rotate(),
            }
        }
    };

    let Some(pen) = table.get_mut(id) else {
        return Err(ResolveError::UnknownPen { id: id.to_string() });
    };
    let icon = &pen.icon;
    let rect = sub_rect(
        &own,
        icon.icon_left,
        icon.icon_top,
        icon.icon_width,
        icon.icon_height,
    )
    .with_rotate(parent_rotate % 360.0);
    pen.calculative.world_icon_rect = Some(rect);
    Ok(())
}

/// Resolve the text sub-rect, using the same rules as the icon rect. The
/// rect carries the pen's own world rotation.
pub fn text_rect(pen: &mut Pen) -> Result<(), ResolveError> {
    let own = pen
        .calculative
        .world_rect
        .ok_or_else(|| ResolveError::Unresolved { pen: pen.id.clone() })?;
    let text = &pen.text;
    let rect = sub_rect(
        &own,
        text.text_left,
        text.text_top,
        text.text_width,
        text.text_height,
    )
    .with_rotate(own.rotate());
    pen.calculative.world_text_rect = Some(rect);
    Ok(())
}

fn sub_rect(own: &Rect, left: f64, top: f64, width: f64, height: f64) -> Rect {
    let x = self_relative(left, own.width());
    let y = self_relative(top, own.height());
    let width = if width == 0.0 {
        own.width()
    } else {
        self_relative(width, own.width())
    };
    let height = if height == 0.0 {
        own.height()
    } else {
        self_relative(height, own.height())
    };
    Rect::new(own.x() + x, own.y() + y, width, height)
}

/// Resolve whatever is missing for `id`: world rect, anchors, icon rect and
/// text rect, in that order.
pub fn ensure_resolved(
    table: &mut PenTable,
    id: &str,
    ids: &mut dyn IdGenerator,
) -> Result<(), ResolveError> {
    let pen = table
        .get(id)
        .ok_or_else(|| ResolveError::UnknownPen { id: id.to_string() })?;
    let calc = &pen.calculative;
    let (has_rect, has_anchors, has_icon, has_text) = (
        calc.world_rect.is_some(),
        calc.world_anchors.is_some(),
        calc.world_icon_rect.is_some(),
        calc.world_text_rect.is_some(),
    );

    if !has_rect {
        world_rect(table, id)?;
    }
    if !has_icon {
        icon_rect(table, id)?;
    }

    let Some(pen) = table.get_mut(id) else {
        return Err(ResolveError::UnknownPen { id: id.to_string() });
    };
    if !has_anchors {
        world_anchors(pen, ids)?;
    }
    if !has_text {
        text_rect(pen)?;
    }
    Ok(())
}

/// Resolve every pen in the table, parents first.
pub fn resolve_all(table: &mut PenTable, ids: &mut dyn IdGenerator) -> Result<(), ResolveError> {
    for id in table.draw_order() {
        ensure_resolved(table, &id, ids)?;
    }
    Ok(())
}
