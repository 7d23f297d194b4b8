//! Global render options.
//!
//! Options only fill in what a pen leaves unset. They deserialize from the
//! editor's camelCase JSON; missing fields take the values in
//! [`defaults`](crate::render::defaults).

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;
use crate::render::defaults;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    pub color: String,
    pub text_color: String,
    pub hover_color: String,
    pub hover_background: Option<String>,
    pub active_color: String,
    pub active_background: Option<String>,
    pub font_family: String,
    pub font_size: f64,
    pub line_height: f64,
    pub icon_family: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            color: defaults::COLOR.into(),
            text_color: defaults::TEXT_COLOR.into(),
            hover_color: defaults::HOVER_COLOR.into(),
            hover_background: None,
            active_color: defaults::ACTIVE_COLOR.into(),
            active_background: None,
            font_family: defaults::FONT_FAMILY.into(),
            font_size: defaults::FONT_SIZE,
            line_height: defaults::LINE_HEIGHT,
            icon_family: defaults::ICON_FAMILY.into(),
        }
    }
}

impl Options {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let options = Options::from_json(r##"{"hoverColor": "#ff0000", "fontSize": 14}"##).unwrap();
        assert_eq!(options.hover_color, "#ff0000");
        assert_eq!(options.font_size, 14.0);
        assert_eq!(options.active_color, defaults::ACTIVE_COLOR);
        assert_eq!(options.line_height, defaults::LINE_HEIGHT);
        assert!(options.hover_background.is_none());
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        assert!(matches!(
            Options::from_json("{").unwrap_err(),
            LoadError::Json(_)
        ));
    }
}
