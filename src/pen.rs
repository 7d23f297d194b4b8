//! The pen model: authoritative local fields plus the calculative sidecar.
//!
//! Field names deserialize from the camelCase JSON the editor store produces.
//! Style, text and icon attributes live in flattened sub-structs so the
//! pipeline reads `pen.style.hover_color` instead of a flat bag of options.

use serde::{Deserialize, Serialize};

use crate::render::images::ImageRef;
use crate::types::{Anchor, AnchorSpec, Rect};

/// Enum value as the editor stores it: a numeric code or a camelCase name.
#[derive(Deserialize)]
#[serde(untagged)]
enum EnumCode {
    Code(u8),
    Name(String),
}

/// Node pens are boxes; line pens are connectors and default to round caps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EnumCode")]
pub enum PenType {
    #[default]
    Node,
    Line,
}

impl TryFrom<EnumCode> for PenType {
    type Error = String;

    fn try_from(value: EnumCode) -> Result<Self, Self::Error> {
        match value {
            EnumCode::Code(0) => Ok(Self::Node),
            EnumCode::Code(1) => Ok(Self::Line),
            EnumCode::Name(name) if name == "node" => Ok(Self::Node),
            EnumCode::Name(name) if name == "line" => Ok(Self::Line),
            EnumCode::Code(code) => Err(format!("unknown pen type {code}")),
            EnumCode::Name(name) => Err(format!("unknown pen type {name:?}")),
        }
    }
}

/// Edit lock carried for the editor; the core does not enforce it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EnumCode")]
pub enum LockState {
    #[default]
    None,
    DisableEdit,
    DisableMove,
    Disable,
}

impl TryFrom<EnumCode> for LockState {
    type Error = String;

    fn try_from(value: EnumCode) -> Result<Self, Self::Error> {
        let state = match &value {
            EnumCode::Code(0) => Self::None,
            EnumCode::Code(1) => Self::DisableEdit,
            EnumCode::Code(2) => Self::DisableMove,
            EnumCode::Code(10) => Self::Disable,
            EnumCode::Name(name) => match name.as_str() {
                "none" => Self::None,
                "disableEdit" => Self::DisableEdit,
                "disableMove" => Self::DisableMove,
                "disable" => Self::Disable,
                _ => return Err(format!("unknown lock state {name:?}")),
            },
            EnumCode::Code(code) => return Err(format!("unknown lock state {code}")),
        };
        Ok(state)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Left,
    Right,
    Center,
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextBaseline {
    Top,
    Hanging,
    Middle,
    Alphabetic,
    Ideographic,
    Bottom,
}

impl TextBaseline {
    /// Fraction of a line height between a line's top and its baseline.
    pub fn line_offset(baseline: Option<TextBaseline>) -> f64 {
        match baseline {
            Some(TextBaseline::Top) => 0.0,
            Some(TextBaseline::Bottom) => 1.0,
            _ => 0.5,
        }
    }
}

/// Stroke, fill, shadow and dash attributes.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PenStyle {
    pub line_width: f64,
    /// Corner radius; below 1 it is a fraction of the shorter side.
    pub border_radius: f64,
    pub color: Option<String>,
    pub background: Option<String>,
    pub hover_color: Option<String>,
    pub hover_background: Option<String>,
    pub active_color: Option<String>,
    pub active_background: Option<String>,
    pub stroke_image: Option<String>,
    pub background_image: Option<String>,
    pub line_cap: Option<LineCap>,
    pub global_alpha: Option<f64>,
    pub line_dash: Option<Vec<f64>>,
    pub line_dash_offset: f64,
    pub shadow_color: Option<String>,
    pub shadow_blur: f64,
    pub shadow_offset_x: f64,
    pub shadow_offset_y: f64,
}

/// Text content, font and text sub-rect attributes.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    #[serde(rename = "text")]
    pub content: Option<String>,
    pub text_left: f64,
    pub text_top: f64,
    pub text_width: f64,
    pub text_height: f64,
    pub text_color: Option<String>,
    pub text_background: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub line_height: Option<f64>,
    pub font_style: Option<String>,
    pub font_weight: Option<String>,
    pub text_align: Option<TextAlign>,
    pub text_baseline: Option<TextBaseline>,
    pub white_space: Option<String>,
    pub ellipsis: bool,
}

impl TextStyle {
    pub fn has_text(&self) -> bool {
        self.content.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn no_wrap(&self) -> bool {
        self.white_space.as_deref() == Some("nowrap")
    }
}

/// Bitmap or glyph icon attributes.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IconStyle {
    pub image: Option<String>,
    pub icon: Option<String>,
    pub icon_family: Option<String>,
    pub icon_size: f64,
    pub icon_color: Option<String>,
    pub icon_rotate: f64,
    pub icon_left: f64,
    pub icon_top: f64,
    pub icon_width: f64,
    pub icon_height: f64,
}

/// Derived per-pen state. Fully recomputable, never serialized.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Calculative {
    pub world_rect: Option<Rect>,
    pub world_rotate: Option<f64>,
    pub world_anchors: Option<Vec<Anchor>>,
    pub world_icon_rect: Option<Rect>,
    pub world_text_rect: Option<Rect>,
    pub text_draw_rect: Option<Rect>,
    pub text_lines: Vec<String>,
    /// Src the `img` handle was bound for.
    pub image: Option<String>,
    pub img: Option<ImageRef>,
    pub background_image: Option<String>,
    pub background_img: Option<ImageRef>,
    pub stroke_image: Option<String>,
    pub stroke_img: Option<ImageRef>,
    pub hover: bool,
    pub active: bool,
}

impl Calculative {
    /// Drop everything derived from geometry. Image handles and interaction
    /// flags survive.
    pub fn clear_geometry(&mut self) {
        self.world_rect = None;
        self.world_rotate = None;
        self.world_anchors = None;
        self.world_icon_rect = None;
        self.world_text_rect = None;
        self.text_draw_rect = None;
        self.text_lines.clear();
    }
}

/// A visual entity in the diagram tree.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pen {
    pub id: String,
    pub parent_id: Option<String>,
    #[serde(rename = "type")]
    pub pen_type: PenType,
    /// Shape name looked up in the shape registry.
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotate: f64,
    pub layer: i32,
    pub visible: Option<bool>,
    pub locked: LockState,
    pub anchors: Vec<AnchorSpec>,
    #[serde(flatten)]
    pub style: PenStyle,
    #[serde(flatten)]
    pub text: TextStyle,
    #[serde(flatten)]
    pub icon: IconStyle,
    #[serde(skip)]
    pub calculative: Calculative,
}

impl Pen {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_rotate(mut self, rotate: f64) -> Self {
        self.rotate = rotate;
        self
    }

    /// Hidden only when `visible` is explicitly false.
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    pub fn is_line(&self) -> bool {
        self.pen_type == PenType::Line
    }
}
