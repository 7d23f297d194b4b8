//! Geometry value types shared by the resolver and the render pipeline.
//!
//! All coordinates are world-space pixels with the y axis pointing down, the
//! same convention as a 2D canvas context.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A world-space point.
pub type Point = DVec2;

/// World-space box with its derived corner and center.
///
/// `ex`, `ey` and `center` are always computed from `x`, `y`, `width` and
/// `height`; there is no way to set them directly.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize)]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    ex: f64,
    ey: f64,
    /// Absolute rotation in degrees.
    rotate: f64,
    center: Point,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
            ex: x + width,
            ey: y + height,
            rotate: 0.0,
            center: DVec2::new(x + width / 2.0, y + height / 2.0),
        }
    }

    pub fn with_rotate(mut self, rotate: f64) -> Self {
        self.rotate = rotate;
        self
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Right edge.
    #[inline]
    pub fn ex(&self) -> f64 {
        self.ex
    }

    /// Bottom edge.
    #[inline]
    pub fn ey(&self) -> f64 {
        self.ey
    }

    #[inline]
    pub fn rotate(&self) -> f64 {
        self.rotate
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Point at fractional position `(fx, fy)` inside the box.
    pub fn point_at(&self, fx: f64, fy: f64) -> Point {
        DVec2::new(self.x + self.width * fx, self.y + self.height * fy)
    }
}

/// Resolve a child's local value against a parent dimension.
///
/// Values `>= 1` are absolute; anything smaller (including negatives) is a
/// fraction of `basis`. The cutoff is exact: `1.0` is one pixel.
#[inline]
pub fn parent_relative(value: f64, basis: f64) -> f64 {
    if value >= 1.0 { value } else { basis * value }
}

/// Resolve a sub-rect value against the pen's own dimension.
///
/// Non-zero values with magnitude below 1 are fractions of `basis`.
#[inline]
pub fn self_relative(value: f64, basis: f64) -> f64 {
    if value != 0.0 && value.abs() < 1.0 {
        basis * value
    } else {
        value
    }
}

/// Connection point declared on a pen, in fractions of the pen's own rect.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnchorSpec {
    pub id: Option<String>,
    pub x: f64,
    pub y: f64,
    /// Only custom anchors replace the four defaults.
    pub custom: bool,
    pub color: Option<String>,
    pub background: Option<String>,
}

/// World-space connection point owned by a pen.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub id: String,
    pub pen_id: String,
    pub x: f64,
    pub y: f64,
    pub color: Option<String>,
    pub background: Option<String>,
    pub custom: bool,
}

impl Anchor {
    pub fn position(&self) -> Point {
        DVec2::new(self.x, self.y)
    }
}
