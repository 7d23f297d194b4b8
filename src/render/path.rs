//! Recorded path outlines.
//!
//! Shape builders produce a [`Path2d`]; drawing surfaces replay it. The core
//! never looks inside a path beyond passing it to `fill` and `stroke`.

use glam::DVec2;

use crate::types::{Point, Rect};

/// One outline command, in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    BezierTo { c1: Point, c2: Point, to: Point },
    /// Circular arc around `center`, angles in radians, clockwise in y-down space.
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
    },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Close,
}

/// An outline built from [`PathCommand`]s.
///
/// # Example
///
/// ```
/// use topopen::render::path::Path2d;
///
/// let mut path = Path2d::new();
/// path.move_to(0.0, 0.0);
/// path.line_to(10.0, 0.0);
/// path.line_to(10.0, 10.0);
/// path.close();
/// assert_eq!(path.commands().len(), 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path2d {
    commands: Vec<PathCommand>,
}

impl Path2d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo(DVec2::new(x, y)));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::LineTo(DVec2::new(x, y)));
    }

    pub fn bezier_to(&mut self, c1: Point, c2: Point, to: Point) {
        self.commands.push(PathCommand::BezierTo { c1, c2, to });
    }

    pub fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        self.commands.push(PathCommand::Arc {
            center: DVec2::new(cx, cy),
            radius,
            start,
            end,
        });
    }

    pub fn rect(&mut self, rect: &Rect) {
        self.commands.push(PathCommand::Rect {
            x: rect.x(),
            y: rect.y(),
            width: rect.width(),
            height: rect.height(),
        });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Split an arc into cubic segments of at most a quarter turn.
///
/// Returns the arc's start point and the `(c1, c2, to)` triples that follow it.
pub fn arc_to_beziers(
    center: Point,
    radius: f64,
    start: f64,
    end: f64,
) -> (Point, Vec<(Point, Point, Point)>) {
    let on_circle = |angle: f64| center + DVec2::new(angle.cos(), angle.sin()) * radius;
    let sweep = end - start;
    let segments = (sweep.abs() / std::f64::consts::FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / segments as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let mut curves = Vec::with_capacity(segments);
    let mut a0 = start;
    for _ in 0..segments {
        let a1 = a0 + step;
        let p0 = on_circle(a0);
        let p3 = on_circle(a1);
        let t0 = DVec2::new(-a0.sin(), a0.cos()) * radius * k;
        let t1 = DVec2::new(-a1.sin(), a1.cos()) * radius * k;
        curves.push((p0 + t0, p3 - t1, p3));
        a0 = a1;
    }
    (on_circle(start), curves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn full_circle_uses_four_segments() {
        let (start, curves) = arc_to_beziers(DVec2::ZERO, 10.0, 0.0, TAU);
        assert!((start - DVec2::new(10.0, 0.0)).length() < 1e-9);
        assert_eq!(curves.len(), 4);
        let last = curves.last().unwrap().2;
        assert!((last - DVec2::new(10.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn quarter_arc_ends_on_circle() {
        let (_, curves) = arc_to_beziers(DVec2::new(5.0, 5.0), 2.0, 0.0, PI / 2.0);
        assert_eq!(curves.len(), 1);
        assert!((curves[0].2 - DVec2::new(5.0, 7.0)).length() < 1e-9);
    }

    #[test]
    fn rect_command_copies_bounds() {
        let mut path = Path2d::new();
        path.rect(&Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(
            path.commands(),
            &[PathCommand::Rect { x: 1.0, y: 2.0, width: 3.0, height: 4.0 }]
        );
    }
}
