//! Drawing pens onto a canvas.
//!
//! This module is organized into submodules:
//! - `canvas`: the [`Canvas2d`] surface trait and paints
//! - `defaults`: default colors and font settings
//! - `draw`: the per-pen pipeline
//! - `images`: image handles and the image cache
//! - `path`: recorded outlines
//! - `raster`: tiny-skia surface (feature `raster`)
//! - `recording`: a surface that records calls
//! - `shapes`: shape builders and the registry
//! - `text`: line breaking and text placement

pub mod canvas;
pub mod defaults;
pub mod draw;
pub mod images;
pub mod path;
#[cfg(feature = "raster")]
pub mod raster;
pub mod recording;
pub mod shapes;
pub mod text;

pub use canvas::{Canvas2d, Paint, Pattern, Repetition};
pub use draw::{StyleState, render_pen};
pub use images::{ImageCache, ImageRef};
pub use path::{Path2d, PathCommand};
#[cfg(feature = "raster")]
pub use raster::RasterCanvas;
pub use recording::{DrawCall, RecordingCanvas};
pub use shapes::{PenShape, ShapeEnum, ShapeRegistry};

use crate::ids::{IdGenerator, RandomIds};
use crate::log::{debug, warn};
use crate::options::Options;
use crate::resolve::ensure_resolved;
use crate::store::PenTable;

/// Outcome of one render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Pens that had a path and went through the pipeline.
    pub drawn: usize,
    /// Hidden pens, pens whose geometry could not be resolved, and pens
    /// with no registered shape.
    pub skipped: usize,
}

/// Everything a render pass needs besides the table and the surface.
pub struct Renderer {
    pub options: Options,
    pub shapes: ShapeRegistry,
    pub images: ImageCache,
    ids: Box<dyn IdGenerator>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Renderer {
    /// Renderer with the built-in shapes and random anchor ids.
    pub fn new(options: Options) -> Self {
        Self {
            options,
            shapes: ShapeRegistry::common(),
            images: ImageCache::new(),
            ids: Box::new(RandomIds),
        }
    }

    /// Use `ids` for generated anchor ids.
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Draw every visible pen of `table` in layer order.
    ///
    /// Missing geometry is resolved first. A pen whose geometry cannot be
    /// resolved is logged and skipped; the pass itself never fails.
    pub fn render(&mut self, canvas: &mut dyn Canvas2d, table: &mut PenTable) -> RenderStats {
        let mut stats = RenderStats::default();
        for id in table.draw_order() {
            if !table.get(&id).is_some_and(|pen| pen.is_visible()) {
                stats.skipped += 1;
                continue;
            }
            if let Err(err) = ensure_resolved(table, &id, &mut *self.ids) {
                warn!(pen = id.as_str(), error = %err, "pen skipped");
                stats.skipped += 1;
                continue;
            }
            let Some(pen) = table.get_mut(&id) else {
                stats.skipped += 1;
                continue;
            };
            self.images.sync(pen);
            text::layout(&*canvas, pen, &self.options);

            let Some(path) = self.shapes.path_for(pen) else {
                stats.skipped += 1;
                continue;
            };
            render_pen(canvas, pen, Some(&path), &self.options);
            stats.drawn += 1;
        }
        debug!(drawn = stats.drawn, skipped = stats.skipped, "render pass done");
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::pen::Pen;

    #[test]
    fn hidden_and_orphaned_pens_are_skipped() {
        let mut table = PenTable::new();
        table.insert(Pen::new("a", "rectangle").with_rect(0.0, 0.0, 10.0, 10.0));
        let mut hidden = Pen::new("b", "rectangle").with_rect(0.0, 0.0, 10.0, 10.0);
        hidden.visible = Some(false);
        table.insert(hidden);
        table.insert(Pen::new("c", "rectangle").with_parent("ghost"));

        let mut renderer = Renderer::default().with_ids(SequentialIds::default());
        let mut canvas = RecordingCanvas::new();
        let stats = renderer.render(&mut canvas, &mut table);
        assert_eq!(stats, RenderStats { drawn: 1, skipped: 2 });
        assert_eq!(canvas.names().iter().filter(|n| **n == "stroke").count(), 1);
    }

    #[test]
    fn render_resolves_missing_geometry() {
        let mut table = PenTable::new();
        table.insert(Pen::new("a", "rectangle").with_rect(5.0, 5.0, 10.0, 10.0));
        let mut renderer = Renderer::default().with_ids(SequentialIds::default());
        renderer.render(&mut RecordingCanvas::new(), &mut table);

        let pen = table.get("a").unwrap();
        assert!(pen.calculative.world_rect.is_some());
        assert_eq!(pen.calculative.world_anchors.as_ref().map(Vec::len), Some(4));
        assert!(pen.calculative.world_icon_rect.is_some());
    }

    #[test]
    fn unregistered_shapes_are_not_counted_as_drawn() {
        let mut table = PenTable::new();
        table.insert(Pen::new("a", "rectangle").with_rect(0.0, 0.0, 10.0, 10.0));
        table.insert(Pen::new("b", "cloud").with_rect(0.0, 0.0, 10.0, 10.0));

        let mut renderer = Renderer::default().with_ids(SequentialIds::default());
        let mut canvas = RecordingCanvas::new();
        let stats = renderer.render(&mut canvas, &mut table);
        assert_eq!(stats, RenderStats { drawn: 1, skipped: 1 });
        // Geometry is still resolved for the unshaped pen.
        assert!(table.get("b").unwrap().calculative.world_rect.is_some());
    }

    #[test]
    fn removing_a_parent_skips_its_children() {
        let mut table = PenTable::new();
        table.insert(Pen::new("root", "rectangle").with_rect(0.0, 0.0, 100.0, 100.0));
        table.insert(
            Pen::new("child", "rectangle")
                .with_parent("root")
                .with_rect(0.0, 0.0, 0.5, 0.5),
        );

        let mut renderer = Renderer::default().with_ids(SequentialIds::default());
        let first = renderer.render(&mut RecordingCanvas::new(), &mut table);
        assert_eq!(first, RenderStats { drawn: 2, skipped: 0 });

        table.remove("root");
        let mut canvas = RecordingCanvas::new();
        let second = renderer.render(&mut canvas, &mut table);
        assert_eq!(second, RenderStats { drawn: 0, skipped: 1 });
        assert!(canvas.calls().is_empty());
        assert!(table.get("child").unwrap().calculative.world_rect.is_none());
    }
}
