//! The drawing surface consumed by the render pipeline.
//!
//! The trait mirrors a 2D canvas context: state is mutated call by call and
//! scoped with `save` / `restore`. The pipeline depends on the exact order of
//! these calls, so implementations must apply them as issued.

use super::images::ImageRef;
use super::path::Path2d;
use crate::pen::{LineCap, TextAlign, TextBaseline};

/// How a pattern tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Repetition {
    #[default]
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
}

/// An image pattern created by the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub image: ImageRef,
    pub repetition: Repetition,
}

/// Stroke or fill paint.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Color(String),
    Pattern(Pattern),
}

impl Paint {
    pub fn color(color: impl Into<String>) -> Self {
        Paint::Color(color.into())
    }
}

/// A 2D immediate-mode drawing context.
pub trait Canvas2d {
    fn save(&mut self);
    fn restore(&mut self);
    fn begin_path(&mut self);

    fn translate(&mut self, x: f64, y: f64);
    /// Rotate the drawing space by `radians`.
    fn rotate(&mut self, radians: f64);

    fn set_line_width(&mut self, width: f64);
    fn set_stroke_style(&mut self, paint: Paint);
    fn set_fill_style(&mut self, paint: Paint);
    /// Build a pattern from a loaded image; `None` if the surface cannot.
    fn create_pattern(&mut self, image: &ImageRef, repetition: Repetition) -> Option<Pattern>;
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_line_dash(&mut self, segments: &[f64]);
    fn set_line_dash_offset(&mut self, offset: f64);

    /// An empty color disables the shadow.
    fn set_shadow_color(&mut self, color: &str);
    fn set_shadow_blur(&mut self, blur: f64);
    fn set_shadow_offset(&mut self, x: f64, y: f64);

    fn fill(&mut self, path: &Path2d);
    fn stroke(&mut self, path: &Path2d);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn draw_image(&mut self, image: &ImageRef, x: f64, y: f64, width: f64, height: f64);

    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Advance width of `text` in `font`. Does not change the current font.
    fn measure_text(&self, text: &str, font: &str) -> f64;
}
