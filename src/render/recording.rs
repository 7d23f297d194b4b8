//! A surface that records calls instead of drawing.
//!
//! Used to inspect exactly what the pipeline issues, in order. The text form
//! prints one call per line, which keeps snapshots readable.

use std::fmt;

use super::canvas::{Canvas2d, Paint, Pattern, Repetition};
use super::images::ImageRef;
use super::path::Path2d;
use super::text::{estimate_text_width, font_px};
use crate::pen::{LineCap, TextAlign, TextBaseline};

/// One recorded canvas call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    BeginPath,
    Translate(f64, f64),
    Rotate(f64),
    LineWidth(f64),
    StrokeStyle(Paint),
    FillStyle(Paint),
    CreatePattern(String, Repetition),
    LineCap(LineCap),
    GlobalAlpha(f64),
    LineDash(Vec<f64>),
    LineDashOffset(f64),
    ShadowColor(String),
    ShadowBlur(f64),
    ShadowOffset(f64, f64),
    Fill(Path2d),
    Stroke(Path2d),
    FillRect(f64, f64, f64, f64),
    DrawImage(String, f64, f64, f64, f64),
    Font(String),
    TextAlign(TextAlign),
    TextBaseline(TextBaseline),
    FillText(String, f64, f64),
}

impl DrawCall {
    /// Lowercase call name, e.g. `fill` or `strokeStyle`.
    pub fn name(&self) -> &'static str {
        match self {
            DrawCall::Save => "save",
            DrawCall::Restore => "restore",
            DrawCall::BeginPath => "beginPath",
            DrawCall::Translate(..) => "translate",
            DrawCall::Rotate(_) => "rotate",
            DrawCall::LineWidth(_) => "lineWidth",
            DrawCall::StrokeStyle(_) => "strokeStyle",
            DrawCall::FillStyle(_) => "fillStyle",
            DrawCall::CreatePattern(..) => "createPattern",
            DrawCall::LineCap(_) => "lineCap",
            DrawCall::GlobalAlpha(_) => "globalAlpha",
            DrawCall::LineDash(_) => "setLineDash",
            DrawCall::LineDashOffset(_) => "lineDashOffset",
            DrawCall::ShadowColor(_) => "shadowColor",
            DrawCall::ShadowBlur(_) => "shadowBlur",
            DrawCall::ShadowOffset(..) => "shadowOffset",
            DrawCall::Fill(_) => "fill",
            DrawCall::Stroke(_) => "stroke",
            DrawCall::FillRect(..) => "fillRect",
            DrawCall::DrawImage(..) => "drawImage",
            DrawCall::Font(_) => "font",
            DrawCall::TextAlign(_) => "textAlign",
            DrawCall::TextBaseline(_) => "textBaseline",
            DrawCall::FillText(..) => "fillText",
        }
    }
}

/// Short numbers: integers print without a fraction, others to 3 places.
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = if self.0 == 0.0 { 0.0 } else { self.0 };
        if v.fract() == 0.0 {
            write!(f, "{v}")
        } else {
            let s = format!("{v:.3}");
            match s.trim_end_matches('0').trim_end_matches('.') {
                "-0" => f.write_str("0"),
                trimmed => f.write_str(trimmed),
            }
        }
    }
}

fn paint(f: &mut fmt::Formatter<'_>, paint: &Paint) -> fmt::Result {
    match paint {
        Paint::Color(c) => write!(f, "{c}"),
        Paint::Pattern(p) => write!(f, "pattern({}, {:?})", p.image.src, p.repetition),
    }
}

impl fmt::Display for DrawCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        match self {
            DrawCall::Save | DrawCall::Restore | DrawCall::BeginPath => Ok(()),
            DrawCall::Translate(x, y) | DrawCall::ShadowOffset(x, y) => {
                write!(f, " {} {}", Num(*x), Num(*y))
            }
            DrawCall::Rotate(v)
            | DrawCall::LineWidth(v)
            | DrawCall::GlobalAlpha(v)
            | DrawCall::LineDashOffset(v)
            | DrawCall::ShadowBlur(v) => write!(f, " {}", Num(*v)),
            DrawCall::StrokeStyle(p) | DrawCall::FillStyle(p) => {
                f.write_str(" ")?;
                paint(f, p)
            }
            DrawCall::CreatePattern(src, rep) => write!(f, " {src} {rep:?}"),
            DrawCall::LineCap(cap) => write!(f, " {cap:?}"),
            DrawCall::LineDash(segments) => {
                for s in segments {
                    write!(f, " {}", Num(*s))?;
                }
                Ok(())
            }
            DrawCall::ShadowColor(c) => write!(f, " {c:?}"),
            DrawCall::Fill(path) | DrawCall::Stroke(path) => {
                write!(f, " ({} commands)", path.commands().len())
            }
            DrawCall::FillRect(x, y, w, h) => {
                write!(f, " {} {} {} {}", Num(*x), Num(*y), Num(*w), Num(*h))
            }
            DrawCall::DrawImage(src, x, y, w, h) => {
                write!(f, " {src} {} {} {} {}", Num(*x), Num(*y), Num(*w), Num(*h))
            }
            DrawCall::Font(font) => write!(f, " {font}"),
            DrawCall::TextAlign(a) => write!(f, " {a:?}"),
            DrawCall::TextBaseline(b) => write!(f, " {b:?}"),
            DrawCall::FillText(text, x, y) => write!(f, " {text:?} {} {}", Num(*x), Num(*y)),
        }
    }
}

/// Records every call; patterns are always available.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Call names in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.calls.iter().map(DrawCall::name).collect()
    }

    /// Index of the first call named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.calls.iter().position(|c| c.name() == name)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn push(&mut self, call: DrawCall) {
        self.calls.push(call);
    }
}

impl fmt::Display for RecordingCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for call in &self.calls {
            writeln!(f, "{call}")?;
        }
        Ok(())
    }
}

impl Canvas2d for RecordingCanvas {
    fn save(&mut self) {
        self.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCall::Restore);
    }

    fn begin_path(&mut self) {
        self.push(DrawCall::BeginPath);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.push(DrawCall::Translate(x, y));
    }

    fn rotate(&mut self, radians: f64) {
        self.push(DrawCall::Rotate(radians));
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawCall::LineWidth(width));
    }

    fn set_stroke_style(&mut self, paint: Paint) {
        self.push(DrawCall::StrokeStyle(paint));
    }

    fn set_fill_style(&mut self, paint: Paint) {
        self.push(DrawCall::FillStyle(paint));
    }

    fn create_pattern(&mut self, image: &ImageRef, repetition: Repetition) -> Option<Pattern> {
        self.push(DrawCall::CreatePattern(image.src.clone(), repetition));
        Some(Pattern {
            image: image.clone(),
            repetition,
        })
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.push(DrawCall::LineCap(cap));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.push(DrawCall::GlobalAlpha(alpha));
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.push(DrawCall::LineDash(segments.to_vec()));
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.push(DrawCall::LineDashOffset(offset));
    }

    fn set_shadow_color(&mut self, color: &str) {
        self.push(DrawCall::ShadowColor(color.to_string()));
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.push(DrawCall::ShadowBlur(blur));
    }

    fn set_shadow_offset(&mut self, x: f64, y: f64) {
        self.push(DrawCall::ShadowOffset(x, y));
    }

    fn fill(&mut self, path: &Path2d) {
        self.push(DrawCall::Fill(path.clone()));
    }

    fn stroke(&mut self, path: &Path2d) {
        self.push(DrawCall::Stroke(path.clone()));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawCall::FillRect(x, y, width, height));
    }

    fn draw_image(&mut self, image: &ImageRef, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawCall::DrawImage(image.src.clone(), x, y, width, height));
    }

    fn set_font(&mut self, font: &str) {
        self.push(DrawCall::Font(font.to_string()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.push(DrawCall::TextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.push(DrawCall::TextBaseline(baseline));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.push(DrawCall::FillText(text.to_string(), x, y));
    }

    fn measure_text(&self, text: &str, font: &str) -> f64 {
        estimate_text_width(text, font_px(font).unwrap_or(10.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_print_compactly() {
        assert_eq!(Num(12.0).to_string(), "12");
        assert_eq!(Num(-0.0).to_string(), "0");
        assert_eq!(Num(0.5).to_string(), "0.5");
        assert_eq!(Num(std::f64::consts::FRAC_PI_2).to_string(), "1.571");
        assert_eq!(Num(49.999_999_999).to_string(), "50");
        assert_eq!(Num(-0.0001).to_string(), "0");
    }

    #[test]
    fn display_is_one_call_per_line() {
        let mut canvas = RecordingCanvas::new();
        canvas.save();
        canvas.set_fill_style(Paint::color("#fff"));
        canvas.fill_text("hi", 1.0, 2.5);
        canvas.restore();
        assert_eq!(
            canvas.to_string(),
            "save\nfillStyle #fff\nfillText \"hi\" 1 2.5\nrestore\n"
        );
        assert_eq!(canvas.position("fillText"), Some(2));
    }

    #[test]
    fn measure_uses_font_size() {
        let canvas = RecordingCanvas::new();
        let small = canvas.measure_text("abc", "normal normal normal 10px/1.5 Arial");
        let large = canvas.measure_text("abc", "normal normal normal 20px/1.5 Arial");
        assert!((large - 2.0 * small).abs() < 1e-9);
    }
}
