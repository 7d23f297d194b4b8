//! Shape path builders.
//!
//! A shape turns a resolved world rect into an outline. The render pipeline
//! never looks at which shape produced a path; pens pick their shape by
//! `name` through the [`ShapeRegistry`].

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;
use std::sync::Arc;

use enum_dispatch::enum_dispatch;

use super::path::Path2d;
use crate::log::debug;
use crate::pen::Pen;
use crate::types::Rect;

/// Common behavior for all shapes
#[enum_dispatch]
pub trait PenShape {
    /// Outline for `rect`, or `None` when the shape draws nothing.
    fn path(&self, rect: &Rect, pen: &Pen) -> Option<Path2d>;
}

/// Box with optional rounded corners from `borderRadius`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectangleShape;

impl PenShape for RectangleShape {
    fn path(&self, rect: &Rect, pen: &Pen) -> Option<Path2d> {
        let mut path = Path2d::new();
        let short_side = rect.width().min(rect.height());
        let radius = match pen.style.border_radius {
            r if r <= 0.0 => 0.0,
            r if r < 1.0 => short_side * r,
            r => r,
        }
        .min(short_side / 2.0);

        if radius <= 0.0 {
            path.rect(rect);
            return Some(path);
        }

        let (x, y, ex, ey, r) = (rect.x(), rect.y(), rect.ex(), rect.ey(), radius);
        path.move_to(x + r, y);
        path.line_to(ex - r, y);
        path.arc(ex - r, y + r, r, -FRAC_PI_2, 0.0);
        path.line_to(ex, ey - r);
        path.arc(ex - r, ey - r, r, 0.0, FRAC_PI_2);
        path.line_to(x + r, ey);
        path.arc(x + r, ey - r, r, FRAC_PI_2, PI);
        path.line_to(x, y + r);
        path.arc(x + r, y + r, r, PI, PI + FRAC_PI_2);
        path.close();
        Some(path)
    }
}

/// Circle inscribed in the rect's shorter side.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircleShape;

impl PenShape for CircleShape {
    fn path(&self, rect: &Rect, _pen: &Pen) -> Option<Path2d> {
        let center = rect.center();
        let mut path = Path2d::new();
        path.arc(
            center.x,
            center.y,
            rect.width().min(rect.height()) / 2.0,
            0.0,
            TAU,
        );
        path.close();
        Some(path)
    }
}

/// Arrow pointing left; the head is half the rect's height long.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeftArrowShape;

impl PenShape for LeftArrowShape {
    fn path(&self, rect: &Rect, _pen: &Pen) -> Option<Path2d> {
        let (x, y, w, h) = (rect.x(), rect.y(), rect.width(), rect.height());
        let head = x + h / 2.0;
        let mut path = Path2d::new();
        path.move_to(x, y + h / 2.0);
        path.line_to(head, y);
        path.line_to(head, y + h / 3.0);
        path.line_to(x + w, y + h / 3.0);
        path.line_to(x + w, y + h * 2.0 / 3.0);
        path.line_to(head, y + h * 2.0 / 3.0);
        path.line_to(head, y + h);
        path.close();
        Some(path)
    }
}

/// Arrow pointing right.
#[derive(Debug, Clone, Copy, Default)]
pub struct RightArrowShape;

impl PenShape for RightArrowShape {
    fn path(&self, rect: &Rect, _pen: &Pen) -> Option<Path2d> {
        let (x, y, w, h) = (rect.x(), rect.y(), rect.width(), rect.height());
        let head = x + w - h / 2.0;
        let mut path = Path2d::new();
        path.move_to(x, y + h / 3.0);
        path.line_to(head, y + h / 3.0);
        path.line_to(head, y);
        path.line_to(x + w, y + h / 2.0);
        path.line_to(head, y + h);
        path.line_to(head, y + h * 2.0 / 3.0);
        path.line_to(x, y + h * 2.0 / 3.0);
        path.close();
        Some(path)
    }
}

/// Arrow with heads on both ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwowayArrowShape;

impl PenShape for TwowayArrowShape {
    fn path(&self, rect: &Rect, _pen: &Pen) -> Option<Path2d> {
        let (x, y, w, h) = (rect.x(), rect.y(), rect.width(), rect.height());
        let left = x + h / 2.0;
        let right = x + w - h / 2.0;
        let mut path = Path2d::new();
        path.move_to(x, y + h / 2.0);
        path.line_to(left, y);
        path.line_to(left, y + h / 3.0);
        path.line_to(right, y + h / 3.0);
        path.line_to(right, y);
        path.line_to(x + w, y + h / 2.0);
        path.line_to(right, y + h);
        path.line_to(right, y + h * 2.0 / 3.0);
        path.line_to(left, y + h * 2.0 / 3.0);
        path.line_to(left, y + h);
        path.close();
        Some(path)
    }
}

type PathFn = dyn Fn(&Rect, &Pen) -> Option<Path2d> + Send + Sync;

/// A path builder supplied by the embedding application.
#[derive(Clone)]
pub struct CustomShape(Arc<PathFn>);

impl CustomShape {
    pub fn new(f: impl Fn(&Rect, &Pen) -> Option<Path2d> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for CustomShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomShape(..)")
    }
}

impl PenShape for CustomShape {
    fn path(&self, rect: &Rect, pen: &Pen) -> Option<Path2d> {
        (self.0)(rect, pen)
    }
}

/// Every shape the registry can hold.
#[enum_dispatch(PenShape)]
#[derive(Debug, Clone)]
pub enum ShapeEnum {
    Rectangle(RectangleShape),
    Circle(CircleShape),
    LeftArrow(LeftArrowShape),
    RightArrow(RightArrowShape),
    TwowayArrow(TwowayArrowShape),
    Custom(CustomShape),
}

/// Pen name → shape.
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    shapes: HashMap<String, ShapeEnum>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in shapes.
    pub fn common() -> Self {
        let mut registry = Self::new();
        registry.register("rectangle", RectangleShape);
        registry.register("square", RectangleShape);
        registry.register("circle", CircleShape);
        registry.register("leftArrow", LeftArrowShape);
        registry.register("rightArrow", RightArrowShape);
        registry.register("twowayArrow", TwowayArrowShape);
        registry
    }

    /// Register or replace the shape for `name`.
    pub fn register(&mut self, name: impl Into<String>, shape: impl Into<ShapeEnum>) {
        self.shapes.insert(name.into(), shape.into());
    }

    pub fn register_fn(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Rect, &Pen) -> Option<Path2d> + Send + Sync + 'static,
    ) {
        self.register(name, CustomShape::new(f));
    }

    pub fn get(&self, name: &str) -> Option<&ShapeEnum> {
        self.shapes.get(name)
    }

    /// Path for a pen with a resolved world rect. Unknown shapes and
    /// unresolved pens yield no path.
    pub fn path_for(&self, pen: &Pen) -> Option<Path2d> {
        let rect = pen.calculative.world_rect?;
        let Some(shape) = self.shapes.get(&pen.name) else {
            debug!(pen = pen.id.as_str(), name = pen.name.as_str(), "no shape registered");
            return None;
        };
        shape.path(&rect, pen)
    }
}
