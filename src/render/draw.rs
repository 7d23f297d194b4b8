//! The per-pen render pipeline.
//!
//! [`render_pen`] issues canvas calls in a fixed order: frame and rotation,
//! stroke and fill style, line attributes, shadow, fill then stroke, icon,
//! text. Everything between the outer `save` and `restore` is scoped to the
//! pen.

use std::f64::consts::PI;

use super::canvas::{Canvas2d, Paint, Repetition};
use super::path::Path2d;
use super::text::TextFont;
use crate::log::debug;
use crate::options::Options;
use crate::pen::{LineCap, Pen, TextAlign, TextBaseline};
use crate::types::{Point, Rect};

/// Interaction state that picks the stroke and fill colors.
///
/// Hover wins over active, active over normal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleState {
    Hover,
    Active,
    Normal,
}

impl StyleState {
    pub fn of(pen: &Pen) -> Self {
        if pen.calculative.hover {
            StyleState::Hover
        } else if pen.calculative.active {
            StyleState::Active
        } else {
            StyleState::Normal
        }
    }
}

/// Stroke and fill picked for one render call. `fill` is `None` when the
/// path must not be filled.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub stroke: Option<Paint>,
    pub fill: Option<Paint>,
}

fn non_empty(color: Option<&str>) -> Option<&str> {
    color.filter(|c| !c.is_empty())
}

/// Resolve stroke and fill for `state`. Patterns are created on `ctx`, so
/// this only yields an image paint when the surface supports patterns and the
/// image is loaded.
pub fn resolve_style(
    ctx: &mut dyn Canvas2d,
    pen: &Pen,
    options: &Options,
    state: StyleState,
) -> ResolvedStyle {
    let style = &pen.style;
    let calc = &pen.calculative;
    match state {
        StyleState::Hover => ResolvedStyle {
            stroke: Some(Paint::color(
                non_empty(style.hover_color.as_deref()).unwrap_or(&options.hover_color),
            )),
            fill: non_empty(style.hover_background.as_deref())
                .or(non_empty(options.hover_background.as_deref()))
                .map(Paint::color),
        },
        StyleState::Active => ResolvedStyle {
            stroke: Some(Paint::color(
                non_empty(style.active_color.as_deref()).unwrap_or(&options.active_color),
            )),
            fill: non_empty(style.active_background.as_deref())
                .or(non_empty(options.active_background.as_deref()))
                .map(Paint::color),
        },
        StyleState::Normal => {
            let stroke = if style.stroke_image.is_some() {
                calc.stroke_img
                    .as_ref()
                    .and_then(|img| ctx.create_pattern(img, Repetition::Repeat))
                    .map(Paint::Pattern)
            } else {
                Some(Paint::color(
                    non_empty(style.color.as_deref()).unwrap_or(&options.color),
                ))
            };
            let fill = if style.background_image.is_some() {
                calc.background_img
                    .as_ref()
                    .and_then(|img| ctx.create_pattern(img, Repetition::Repeat))
                    .map(Paint::Pattern)
            } else {
                non_empty(style.background.as_deref()).map(Paint::color)
            };
            ResolvedStyle { stroke, fill }
        }
    }
}

/// Rotate the drawing space by `degrees` about `center`.
fn rotate_about(ctx: &mut dyn Canvas2d, center: Point, degrees: f64) {
    ctx.translate(center.x, center.y);
    ctx.rotate(degrees * PI / 180.0);
    ctx.translate(-center.x, -center.y);
}

/// Draw one pen onto `ctx`.
///
/// Does nothing when `path` is `None` or the pen's world rect has not been
/// resolved.
pub fn render_pen(ctx: &mut dyn Canvas2d, pen: &Pen, path: Option<&Path2d>, options: &Options) {
    let Some(path) = path else {
        return;
    };
    let Some(world) = pen.calculative.world_rect else {
        debug!(pen = pen.id.as_str(), "render skipped, world rect unresolved");
        return;
    };
    let style = &pen.style;

    ctx.save();
    ctx.begin_path();

    let world_rotate = pen.calculative.world_rotate.unwrap_or(world.rotate());
    if world_rotate != 0.0 {
        rotate_about(ctx, world.center(), world_rotate);
    }

    if style.line_width > 1.0 {
        ctx.set_line_width(style.line_width);
    }

    let resolved = resolve_style(ctx, pen, options, StyleState::of(pen));
    if let Some(stroke) = resolved.stroke {
        ctx.set_stroke_style(stroke);
    }
    if let Some(fill) = &resolved.fill {
        ctx.set_fill_style(fill.clone());
    }

    match style.line_cap {
        Some(cap) => ctx.set_line_cap(cap),
        None if pen.is_line() => ctx.set_line_cap(LineCap::Round),
        None => {}
    }

    if let Some(alpha) = style.global_alpha.filter(|a| *a < 1.0) {
        ctx.set_global_alpha(alpha);
    }

    if let Some(dash) = &style.line_dash {
        ctx.set_line_dash(dash);
    }
    if style.line_dash_offset != 0.0 {
        ctx.set_line_dash_offset(style.line_dash_offset);
    }

    if let Some(shadow) = non_empty(style.shadow_color.as_deref()) {
        ctx.set_shadow_color(shadow);
        ctx.set_shadow_offset(style.shadow_offset_x, style.shadow_offset_y);
        ctx.set_shadow_blur(style.shadow_blur);
    }

    if resolved.fill.is_some() {
        ctx.fill(path);
    }
    ctx.stroke(path);

    if let Some(icon_rect) = pen.calculative.world_icon_rect {
        draw_icon(ctx, pen, &icon_rect, options);
    }

    draw_text(ctx, pen, options);

    ctx.restore();
}

/// Size of a bitmap inside `rect`.
///
/// With a known aspect ratio (natural width over height) the dimension that was not set explicitly
/// follows the image's aspect ratio; when neither was set the height drives.
pub fn image_size(pen: &Pen, rect: &Rect, aspect: Option<f64>) -> (f64, f64) {
    let (mut w, mut h) = (rect.width(), rect.height());
    let width_set = pen.icon.icon_width != 0.0;
    let height_set = pen.icon.icon_height != 0.0;
    if let Some(aspect) = aspect {
        match (width_set, height_set) {
            (true, false) => h = w / aspect,
            (false, _) => w = h * aspect,
            (true, true) => {}
        }
    }
    (w, h)
}

fn draw_icon(ctx: &mut dyn Canvas2d, pen: &Pen, rect: &Rect, options: &Options) {
    let calc = &pen.calculative;
    if let (Some(_), Some(img)) = (&pen.icon.image, &calc.img) {
        ctx.save();
        ctx.set_shadow_color("");
        ctx.set_shadow_blur(0.0);

        let (w, h) = image_size(pen, rect, img.aspect());
        let x = rect.x() + (rect.width() - w) / 2.0;
        let y = rect.y() + (rect.height() - h) / 2.0;

        if pen.icon.icon_rotate != 0.0 {
            rotate_about(ctx, rect.center(), pen.icon.icon_rotate);
        }

        ctx.draw_image(img, x, y, w, h);
        ctx.restore();
    } else if let Some(glyph) = pen.icon.icon.as_deref().filter(|g| !g.is_empty()) {
        ctx.save();
        ctx.set_shadow_color("");
        ctx.set_shadow_blur(0.0);
        ctx.set_text_align(TextAlign::Center);
        ctx.set_text_baseline(TextBaseline::Middle);

        let size = if pen.icon.icon_size > 0.0 {
            pen.icon.icon_size
        } else {
            rect.width().min(rect.height())
        };
        let family = pen.icon.icon_family.as_deref().unwrap_or(&options.icon_family);
        ctx.set_font(&format!("{size}px {family}"));

        let color = non_empty(pen.icon.icon_color.as_deref())
            .or(non_empty(pen.text.text_color.as_deref()))
            .unwrap_or(&options.text_color);
        ctx.set_fill_style(Paint::color(color));

        let world_rotate = calc.world_rect.map_or(0.0, |r| r.rotate());
        if world_rotate != 0.0 {
            rotate_about(ctx, rect.center(), world_rotate);
        }

        ctx.begin_path();
        let center = rect.center();
        ctx.fill_text(glyph, center.x, center.y);
        ctx.restore();
    }
}

fn draw_text(ctx: &mut dyn Canvas2d, pen: &Pen, options: &Options) {
    let text = &pen.text;
    let Some(draw) = pen.calculative.text_draw_rect.filter(|_| text.has_text()) else {
        return;
    };

    ctx.save();
    let color = non_empty(text.text_color.as_deref())
        .or(non_empty(pen.style.color.as_deref()))
        .unwrap_or(&options.text_color);
    ctx.set_fill_style(Paint::color(color));

    if let Some(background) = non_empty(text.text_background.as_deref()) {
        ctx.save();
        ctx.set_fill_style(Paint::color(background));
        let shift = if text.text_align == Some(TextAlign::Right) {
            draw.width()
        } else {
            0.0
        };
        ctx.fill_rect(draw.x() - shift, draw.y(), draw.width(), draw.height());
        ctx.restore();
    }

    let font = TextFont::for_pen(pen, options);
    ctx.set_font(&font.css());
    ctx.set_text_align(text.text_align.unwrap_or(TextAlign::Center));
    if let Some(baseline) = text.text_baseline {
        ctx.set_text_baseline(baseline);
    }

    let offset = TextBaseline::line_offset(text.text_baseline);
    let x = draw.x()
        + if text.text_align.is_none() {
            draw.width() / 2.0
        } else {
            0.0
        };
    for (i, line) in pen.calculative.text_lines.iter().enumerate() {
        let y = draw.y() + (i as f64 + offset) * font.line_advance();
        ctx.fill_text(line, x, y);
    }
    ctx.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::images::ImageRef;

    #[test]
    fn hover_beats_active() {
        let mut pen = Pen::new("p", "rectangle");
        pen.calculative.active = true;
        assert_eq!(StyleState::of(&pen), StyleState::Active);
        pen.calculative.hover = true;
        assert_eq!(StyleState::of(&pen), StyleState::Hover);
    }

    #[test]
    fn only_width_set_keeps_aspect() {
        let mut pen = Pen::new("p", "image");
        pen.icon.icon_width = 40.0;
        let rect = Rect::new(0.0, 0.0, 40.0, 80.0);
        let img = ImageRef::new("a.png", 200.0, 100.0);
        assert_eq!(image_size(&pen, &rect, img.aspect()), (40.0, 20.0));
    }

    #[test]
    fn height_drives_when_nothing_is_set() {
        let pen = Pen::new("p", "image");
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(image_size(&pen, &rect, Some(0.5)), (25.0, 50.0));
        assert_eq!(image_size(&pen, &rect, None), (100.0, 50.0));
    }

    #[test]
    fn both_dimensions_set_are_kept() {
        let mut pen = Pen::new("p", "image");
        pen.icon.icon_width = 30.0;
        pen.icon.icon_height = 30.0;
        let rect = Rect::new(0.0, 0.0, 30.0, 30.0);
        assert_eq!(image_size(&pen, &rect, Some(2.0)), (30.0, 30.0));
    }
}
