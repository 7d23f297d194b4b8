//! Geometry resolution and canvas rendering for diagram pens.
//!
//! Pens form a tree through `parentId`. Child geometry is either absolute
//! (values `>= 1`) or a fraction of the parent's resolved size, and rotations
//! add up along the chain. [`resolve`] turns local values into world rects,
//! anchors and sub-rects; [`render`] draws resolved pens onto any
//! [`Canvas2d`](render::Canvas2d).

pub mod errors;
pub mod ids;
mod log;
pub mod options;
pub mod pen;
pub mod render;
pub mod resolve;
pub mod store;
pub mod types;

pub use errors::{CanvasError, LoadError, ResolveError};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use options::Options;
pub use pen::Pen;
pub use render::{RenderStats, Renderer};
pub use store::PenTable;
pub use types::{Anchor, Point, Rect};

use serde::Deserialize;

#[derive(Deserialize, Default)]
#[serde(default)]
struct DocumentOptions {
    options: Options,
}

/// Render a `{"pens": [...], "options": {...}}` document and return the
/// recorded canvas calls, one per line.
///
/// Anchor ids are sequential, so the output is stable between runs.
pub fn record(json: &str) -> Result<String, miette::Report> {
    let mut table = PenTable::from_json(json)?;
    let DocumentOptions { options } =
        serde_json::from_str(json).map_err(LoadError::from)?;

    let mut renderer = Renderer::new(options).with_ids(SequentialIds::default());
    let mut canvas = render::RecordingCanvas::new();
    renderer.render(&mut canvas, &mut table);
    Ok(canvas.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_draws_a_root_rectangle() {
        let out = record(r##"{"pens": [{"id": "a", "name": "rectangle", "width": 10, "height": 10}]}"##)
            .unwrap();
        assert!(out.starts_with("save\nbeginPath\n"));
        assert!(out.contains("stroke (1 commands)"));
        assert!(out.ends_with("restore\n"));
    }

    #[test]
    fn record_reports_dangling_parents() {
        let err = record(r#"{"pens": [{"id": "a", "parentId": "ghost"}]}"#).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn document_options_are_applied() {
        let out = record(
            r##"{
                "options": {"color": "#123456"},
                "pens": [{"id": "a", "name": "rectangle", "width": 10, "height": 10}]
            }"##,
        )
        .unwrap();
        assert!(out.contains("strokeStyle #123456"));
    }
}
