//! Text layout: line breaking, ellipsis and the text draw rect.

use super::canvas::Canvas2d;
use crate::options::Options;
use crate::pen::{Pen, TextAlign, TextBaseline, TextStyle};
use crate::types::Rect;

/// Proportional advance widths for printable ASCII, in hundredths of the
/// font size.
#[rustfmt::skip]
const ADVANCE: [u8; 95] = [
    28,  28,  36,  56,  56,  89,  67,  19,
    33,  33,  39,  58,  28,  33,  28,  28,
    56,  56,  56,  56,  56,  56,  56,  56,
    56,  56,  28,  28,  58,  58,  58,  56,
   102,  67,  67,  72,  72,  67,  61,  78,
    72,  28,  50,  67,  56,  83,  72,  78,
    67,  78,  72,  67,  61,  72,  67,  94,
    67,  67,  61,  28,  28,  28,  47,  56,
    33,  56,  56,  50,  56,  56,  28,  56,
    56,  22,  22,  50,  22,  83,  56,  56,
    56,  56,  33,  50,  28,  56,  50,  72,
    50,  50,  50,  33,  26,  33,  58,
];

/// Estimated advance width of `text` at `font_size` pixels.
///
/// Used by surfaces without real font metrics. Non-ASCII characters count as
/// one full em.
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    let hundredths: u32 = text
        .chars()
        .map(|c| match c {
            ' '..='~' => ADVANCE[(c as usize) - 0x20] as u32,
            _ => 100,
        })
        .sum();
    hundredths as f64 * font_size * 0.01
}

/// Pixel size from a CSS font shorthand such as `"bold 12px/1.5 Arial"`.
pub fn font_px(font: &str) -> Option<f64> {
    font.split_whitespace()
        .find_map(|token| token.split('/').next()?.strip_suffix("px")?.parse().ok())
}

/// Resolved font parameters for a pen.
#[derive(Clone, Debug, PartialEq)]
pub struct TextFont {
    pub size: f64,
    pub line_height: f64,
    pub family: String,
    pub style: String,
    pub weight: String,
}

impl TextFont {
    pub fn for_pen(pen: &Pen, options: &Options) -> Self {
        Self::from_style(&pen.text, options)
    }

    /// Pen values first, then option defaults; style and weight default to
    /// `normal`.
    pub fn from_style(text: &TextStyle, options: &Options) -> Self {
        Self {
            size: text.font_size.unwrap_or(options.font_size),
            line_height: text.line_height.unwrap_or(options.line_height),
            family: text
                .font_family
                .clone()
                .unwrap_or_else(|| options.font_family.clone()),
            style: text.font_style.clone().unwrap_or_else(|| "normal".into()),
            weight: text.font_weight.clone().unwrap_or_else(|| "normal".into()),
        }
    }

    /// `"{style} normal {weight} {size}px/{lineHeight} {family}"`.
    pub fn css(&self) -> String {
        format!(
            "{} normal {} {}px/{} {}",
            self.style, self.weight, self.size, self.line_height, self.family
        )
    }

    /// Distance between consecutive baselines.
    pub fn line_advance(&self) -> f64 {
        self.size * self.line_height
    }
}

/// Break `content` into lines that fit `max_width`.
///
/// Hard breaks on `\n` are always honored; `wrap` additionally breaks between
/// words, and inside a word that alone is wider than the line.
pub fn break_lines(
    content: &str,
    max_width: f64,
    wrap: bool,
    measure: impl Fn(&str) -> f64,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in content.split('\n') {
        if !wrap || measure(paragraph) <= max_width {
            lines.push(paragraph.to_string());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            for ch in word.chars() {
                current.push(ch);
                if measure(&current) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::replace(&mut current, ch.to_string()));
                }
            }
        }
        lines.push(current);
    }
    lines
}

/// Keep as many lines as fit `max_lines`, ending the last kept line in `...`.
pub fn apply_ellipsis(
    lines: &mut Vec<String>,
    max_lines: usize,
    max_width: f64,
    measure: impl Fn(&str) -> f64,
) {
    if lines.len() <= max_lines {
        return;
    }
    lines.truncate(max_lines.max(1));
    if let Some(last) = lines.last_mut() {
        while !last.is_empty() && measure(&format!("{last}...")) > max_width {
            last.pop();
        }
        last.push_str("...");
    }
}

/// Position the block of `lines` inside `text_rect`.
///
/// Horizontally the rect's `x` is where the pipeline anchors each line: the
/// left edge for left/start, the right edge for right/end, the rect center for
/// an explicit center, and the block's left edge when alignment is unset.
pub fn draw_rect(
    text_rect: &Rect,
    block_width: f64,
    line_count: usize,
    font: &TextFont,
    align: Option<TextAlign>,
    baseline: Option<TextBaseline>,
) -> Rect {
    let width = block_width.min(text_rect.width());
    let height = line_count as f64 * font.line_advance();

    let x = match align {
        Some(TextAlign::Left | TextAlign::Start) => text_rect.x(),
        Some(TextAlign::Right | TextAlign::End) => text_rect.ex(),
        Some(TextAlign::Center) => text_rect.center().x,
        None => text_rect.x() + (text_rect.width() - width) / 2.0,
    };
    let y = match baseline {
        Some(TextBaseline::Top | TextBaseline::Hanging) => text_rect.y(),
        Some(TextBaseline::Bottom | TextBaseline::Ideographic | TextBaseline::Alphabetic) => {
            text_rect.ey() - height
        }
        _ => text_rect.y() + (text_rect.height() - height) / 2.0,
    };
    Rect::new(x, y, width, height).with_rotate(text_rect.rotate())
}

/// Compute the pen's text lines and text draw rect from its world text rect.
/// Pens without text get both cleared.
pub fn layout(canvas: &dyn Canvas2d, pen: &mut Pen, options: &Options) {
    let calc = &mut pen.calculative;
    let (Some(content), Some(text_rect)) = (pen.text.content.as_deref(), calc.world_text_rect)
    else {
        calc.text_lines.clear();
        calc.text_draw_rect = None;
        return;
    };
    if content.is_empty() {
        calc.text_lines.clear();
        calc.text_draw_rect = None;
        return;
    }

    let text = &pen.text;
    let font = TextFont::from_style(text, options);
    let css = font.css();
    let measure = |s: &str| canvas.measure_text(s, &css);

    let mut lines = break_lines(content, text_rect.width(), !text.no_wrap(), measure);
    if text.ellipsis && font.line_advance() > 0.0 {
        let max_lines = (text_rect.height() / font.line_advance()).floor() as usize;
        apply_ellipsis(&mut lines, max_lines, text_rect.width(), measure);
    }

    let block_width = lines.iter().map(|l| measure(l)).fold(0.0, f64::max);
    calc.text_draw_rect = Some(draw_rect(
        &text_rect,
        block_width,
        lines.len(),
        &font,
        text.text_align,
        text.text_baseline,
    ));
    calc.text_lines = lines;
}
