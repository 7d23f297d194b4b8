//! A tiny-skia backed drawing surface.
//!
//! Covers paths, paints, patterns, dashes, caps, alpha, offset shadows and
//! scaled images. There are no glyph outlines to rasterize, so `fill_text`
//! only logs; text metrics come from the advance-width estimate.

use std::collections::HashMap;
use std::str::FromStr;

use tiny_skia::{
    FillRule, FilterQuality, Pixmap, PixmapPaint, SpreadMode, Stroke, StrokeDash,
    Transform,
};

use super::canvas::{Canvas2d, Paint, Pattern, Repetition};
use super::images::ImageRef;
use super::path::{PathCommand, Path2d, arc_to_beziers};
use super::text::{estimate_text_width, font_px};
use crate::errors::CanvasError;
use crate::log::debug;
use crate::pen::{LineCap, TextAlign, TextBaseline};

#[derive(Clone, Debug)]
struct State {
    transform: Transform,
    stroke: Option<Paint>,
    fill: Option<Paint>,
    line_width: f32,
    line_cap: tiny_skia::LineCap,
    alpha: f32,
    dash: Vec<f32>,
    dash_offset: f32,
    shadow_color: Option<tiny_skia::Color>,
    shadow_offset: (f32, f32),
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            stroke: Some(Paint::color("#000000")),
            fill: Some(Paint::color("#000000")),
            line_width: 1.0,
            line_cap: tiny_skia::LineCap::Butt,
            alpha: 1.0,
            dash: Vec::new(),
            dash_offset: 0.0,
            shadow_color: None,
            shadow_offset: (0.0, 0.0),
        }
    }
}

/// Raster surface over a [`Pixmap`].
pub struct RasterCanvas {
    pixmap: Pixmap,
    images: HashMap<String, Pixmap>,
    state: State,
    stack: Vec<State>,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        let pixmap = Pixmap::new(width, height).ok_or(CanvasError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            images: HashMap::new(),
            state: State::default(),
            stack: Vec::new(),
        })
    }

    /// Decode PNG bytes and keep them under `src` for `draw_image` and
    /// patterns. The returned handle goes into an [`ImageCache`](super::images::ImageCache).
    pub fn load_png(&mut self, src: &str, data: &[u8]) -> Result<ImageRef, CanvasError> {
        let image = Pixmap::decode_png(data).map_err(|e| CanvasError::ImageDecode {
            src: src.to_string(),
            message: e.to_string(),
        })?;
        Ok(self.insert_image(src, image))
    }

    /// Register an already decoded image.
    pub fn insert_image(&mut self, src: &str, image: Pixmap) -> ImageRef {
        let handle = ImageRef::new(src, image.width() as f64, image.height() as f64);
        self.images.insert(src.to_string(), image);
        handle
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn stroke_settings(&self) -> Stroke {
        let dash = if self.state.dash.is_empty() {
            None
        } else {
            let mut segments = self.state.dash.clone();
            if segments.len() % 2 == 1 {
                segments.extend_from_within(..);
            }
            StrokeDash::new(segments, self.state.dash_offset)
        };
        Stroke {
            width: self.state.line_width,
            line_cap: self.state.line_cap,
            dash,
            ..Stroke::default()
        }
    }

    fn draw_path(&mut self, path: &Path2d, paint: Option<&Paint>, stroke: bool) {
        let Some(paint) = paint else {
            return;
        };
        let Some(skia_path) = build_path(path) else {
            return;
        };
        let stroke_settings = stroke.then(|| self.stroke_settings());
        let state = &self.state;

        if let Some(shadow) = state.shadow_color {
            let mut shadow_paint = tiny_skia::Paint::default();
            shadow_paint.set_color(with_alpha(shadow, state.alpha));
            shadow_paint.anti_alias = true;
            let (ox, oy) = state.shadow_offset;
            let transform = Transform::from_translate(ox, oy).pre_concat(state.transform);
            match &stroke_settings {
                Some(s) => self.pixmap.stroke_path(&skia_path, &shadow_paint, s, transform, None),
                None => self.pixmap.fill_path(
                    &skia_path,
                    &shadow_paint,
                    FillRule::Winding,
                    transform,
                    None,
                ),
            }
        }

        let Some(skia_paint) = skia_paint(&self.images, paint, state.alpha) else {
            return;
        };
        match &stroke_settings {
            Some(s) => self
                .pixmap
                .stroke_path(&skia_path, &skia_paint, s, state.transform, None),
            None => self.pixmap.fill_path(
                &skia_path,
                &skia_paint,
                FillRule::Winding,
                state.transform,
                None,
            ),
        }
    }
}

/// Parse a CSS color with svgtypes.
fn parse_color(css: &str) -> Option<tiny_skia::Color> {
    match svgtypes::Color::from_str(css) {
        Ok(c) => Some(tiny_skia::Color::from_rgba8(c.red, c.green, c.blue, c.alpha)),
        Err(_) => {
            debug!(color = css, "unparsable color ignored");
            None
        }
    }
}

fn with_alpha(mut color: tiny_skia::Color, alpha: f32) -> tiny_skia::Color {
    color.apply_opacity(alpha);
    color
}

fn skia_paint<'a>(
    images: &'a HashMap<String, Pixmap>,
    paint: &Paint,
    alpha: f32,
) -> Option<tiny_skia::Paint<'a>> {
    let mut out = tiny_skia::Paint {
        anti_alias: true,
        ..tiny_skia::Paint::default()
    };
    match paint {
        Paint::Color(css) => out.set_color(with_alpha(parse_color(css)?, alpha)),
        Paint::Pattern(pattern) => {
            let image = images.get(&pattern.image.src)?;
            let spread = match pattern.repetition {
                Repetition::NoRepeat => SpreadMode::Pad,
                _ => SpreadMode::Repeat,
            };
            out.shader = tiny_skia::Pattern::new(
                image.as_ref(),
                spread,
                FilterQuality::Nearest,
                alpha,
                Transform::identity(),
            );
        }
    }
    Some(out)
}

fn point(p: glam::DVec2) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

/// Replay a recorded outline into a tiny-skia path.
fn build_path(path: &Path2d) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    let mut open = false;
    for command in path.commands() {
        match command {
            PathCommand::MoveTo(p) => {
                let (x, y) = point(*p);
                pb.move_to(x, y);
                open = true;
            }
            PathCommand::LineTo(p) => {
                let (x, y) = point(*p);
                if open {
                    pb.line_to(x, y);
                } else {
                    pb.move_to(x, y);
                    open = true;
                }
            }
            PathCommand::BezierTo { c1, c2, to } => {
                let ((x1, y1), (x2, y2), (x, y)) = (point(*c1), point(*c2), point(*to));
                pb.cubic_to(x1, y1, x2, y2, x, y);
            }
            PathCommand::Arc {
                center,
                radius,
                start,
                end,
            } => {
                let (from, curves) = arc_to_beziers(*center, *radius, *start, *end);
                let (x, y) = point(from);
                if open {
                    pb.line_to(x, y);
                } else {
                    pb.move_to(x, y);
                    open = true;
                }
                for (c1, c2, to) in curves {
                    let ((x1, y1), (x2, y2), (x, y)) = (point(c1), point(c2), point(to));
                    pb.cubic_to(x1, y1, x2, y2, x, y);
                }
            }
            PathCommand::Rect {
                x,
                y,
                width,
                height,
            } => {
                if let Some(rect) =
                    tiny_skia::Rect::from_xywh(*x as f32, *y as f32, *width as f32, *height as f32)
                {
                    pb.push_rect(rect);
                }
                open = false;
            }
            PathCommand::Close => {
                pb.close();
                open = false;
            }
        }
    }
    pb.finish()
}

impl Canvas2d for RasterCanvas {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn begin_path(&mut self) {}

    fn translate(&mut self, x: f64, y: f64) {
        self.state.transform = self
            .state
            .transform
            .pre_concat(Transform::from_translate(x as f32, y as f32));
    }

    fn rotate(&mut self, radians: f64) {
        self.state.transform = self
            .state
            .transform
            .pre_concat(Transform::from_rotate(radians.to_degrees() as f32));
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width as f32;
    }

    fn set_stroke_style(&mut self, paint: Paint) {
        self.state.stroke = Some(paint);
    }

    fn set_fill_style(&mut self, paint: Paint) {
        self.state.fill = Some(paint);
    }

    fn create_pattern(&mut self, image: &ImageRef, repetition: Repetition) -> Option<Pattern> {
        self.images.contains_key(&image.src).then(|| Pattern {
            image: image.clone(),
            repetition,
        })
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        };
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0) as f32;
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.state.dash = segments.iter().map(|s| *s as f32).collect();
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.state.dash_offset = offset as f32;
    }

    fn set_shadow_color(&mut self, color: &str) {
        self.state.shadow_color = if color.is_empty() {
            None
        } else {
            parse_color(color)
        };
    }

    // Shadows are drawn as hard offsets.
    fn set_shadow_blur(&mut self, _blur: f64) {}

    fn set_shadow_offset(&mut self, x: f64, y: f64) {
        self.state.shadow_offset = (x as f32, y as f32);
    }

    fn fill(&mut self, path: &Path2d) {
        let paint = self.state.fill.clone();
        self.draw_path(path, paint.as_ref(), false);
    }

    fn stroke(&mut self, path: &Path2d) {
        let paint = self.state.stroke.clone();
        self.draw_path(path, paint.as_ref(), true);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let mut path = Path2d::new();
        path.rect(&crate::types::Rect::new(x, y, width, height));
        self.fill(&path);
    }

    fn draw_image(&mut self, image: &ImageRef, x: f64, y: f64, width: f64, height: f64) {
        let Some(source) = self.images.get(&image.src) else {
            debug!(src = image.src.as_str(), "image not loaded on this surface");
            return;
        };
        if source.width() == 0 || source.height() == 0 {
            return;
        }
        let sx = width as f32 / source.width() as f32;
        let sy = height as f32 / source.height() as f32;
        let transform = self
            .state
            .transform
            .pre_concat(Transform::from_translate(x as f32, y as f32))
            .pre_concat(Transform::from_scale(sx, sy));
        let paint = PixmapPaint {
            opacity: self.state.alpha,
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    }

    fn set_font(&mut self, _font: &str) {}

    fn set_text_align(&mut self, _align: TextAlign) {}

    fn set_text_baseline(&mut self, _baseline: TextBaseline) {}

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        debug!(text, x, y, "text rasterization unavailable, skipped");
    }

    fn measure_text(&self, text: &str, font: &str) -> f64 {
        estimate_text_width(text, font_px(font).unwrap_or(10.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn rgba(canvas: &RasterCanvas, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = canvas.pixmap().pixel(x, y).unwrap();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            RasterCanvas::new(0, 10),
            Err(CanvasError::InvalidSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn filled_rect_covers_its_pixels() {
        let mut canvas = RasterCanvas::new(20, 20).unwrap();
        canvas.set_fill_style(Paint::color("#ff0000"));
        let mut path = Path2d::new();
        path.rect(&Rect::new(0.0, 0.0, 10.0, 10.0));
        canvas.fill(&path);
        assert_eq!(rgba(&canvas, 5, 5), (255, 0, 0, 255));
        assert_eq!(rgba(&canvas, 15, 15).3, 0);
    }

    #[test]
    fn restore_drops_translation() {
        let mut canvas = RasterCanvas::new(20, 20).unwrap();
        canvas.set_fill_style(Paint::color("blue"));
        canvas.save();
        canvas.translate(10.0, 10.0);
        canvas.restore();
        canvas.fill_rect(0.0, 0.0, 5.0, 5.0);
        assert_eq!(rgba(&canvas, 2, 2), (0, 0, 255, 255));
        assert_eq!(rgba(&canvas, 12, 12).3, 0);
    }

    #[test]
    fn unknown_colors_paint_nothing() {
        let mut canvas = RasterCanvas::new(4, 4).unwrap();
        canvas.set_fill_style(Paint::color("not-a-color"));
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0);
        assert_eq!(rgba(&canvas, 1, 1).3, 0);
    }

    #[test]
    fn patterns_need_a_loaded_image() {
        let mut canvas = RasterCanvas::new(4, 4).unwrap();
        let missing = ImageRef::new("missing.png", 2.0, 2.0);
        assert!(canvas.create_pattern(&missing, Repetition::Repeat).is_none());

        let mut tile = Pixmap::new(2, 2).unwrap();
        tile.fill(tiny_skia::Color::from_rgba8(0, 255, 0, 255));
        let handle = canvas.insert_image("tile.png", tile);
        assert_eq!(handle.natural_width, 2.0);
        let pattern = canvas.create_pattern(&handle, Repetition::Repeat).unwrap();
        canvas.set_fill_style(Paint::Pattern(pattern));
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0);
        assert_eq!(rgba(&canvas, 3, 3), (0, 255, 0, 255));
    }

    #[test]
    fn bad_png_is_a_decode_error() {
        let mut canvas = RasterCanvas::new(4, 4).unwrap();
        assert!(matches!(
            canvas.load_png("x.png", b"nope"),
            Err(CanvasError::ImageDecode { .. })
        ));
    }
}
