//! Default render settings, used when neither the pen nor the options set them.

pub const COLOR: &str = "#222222";
pub const TEXT_COLOR: &str = "#222222";
pub const HOVER_COLOR: &str = "rgba(39,141,248,0.50)";
pub const ACTIVE_COLOR: &str = "#278df8";
pub const FONT_FAMILY: &str = "Arial";
pub const FONT_SIZE: f64 = 12.0;
pub const LINE_HEIGHT: f64 = 1.5;
pub const ICON_FAMILY: &str = "topology";
