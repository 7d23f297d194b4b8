//! Loaded image handles and their binding into pen sidecars.

use std::collections::HashMap;

use crate::log::debug;
use crate::pen::Pen;

/// A loaded image, identified by its src, with its natural size.
///
/// Drawing surfaces keep the pixels; pens only carry this handle.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRef {
    pub src: String,
    pub natural_width: f64,
    pub natural_height: f64,
}

impl ImageRef {
    pub fn new(src: impl Into<String>, natural_width: f64, natural_height: f64) -> Self {
        Self {
            src: src.into(),
            natural_width,
            natural_height,
        }
    }

    /// Width over height, when both are known.
    pub fn aspect(&self) -> Option<f64> {
        (self.natural_width > 0.0 && self.natural_height > 0.0)
            .then(|| self.natural_width / self.natural_height)
    }
}

/// Images that have finished loading, keyed by src.
#[derive(Debug, Default, Clone)]
pub struct ImageCache {
    images: HashMap<String, ImageRef>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: ImageRef) {
        self.images.insert(image.src.clone(), image);
    }

    pub fn get(&self, src: &str) -> Option<&ImageRef> {
        self.images.get(src)
    }

    pub fn remove(&mut self, src: &str) -> Option<ImageRef> {
        self.images.remove(src)
    }

    /// Bind the pen's image, background image and stroke image handles.
    ///
    /// A handle is re-bound when the configured src differs from the one it
    /// was bound for, or when it is still missing; srcs that have not loaded
    /// leave the handle empty.
    pub fn sync(&self, pen: &mut Pen) {
        let calc = &mut pen.calculative;
        bind(self, &pen.icon.image, &mut calc.image, &mut calc.img);
        bind(
            self,
            &pen.style.background_image,
            &mut calc.background_image,
            &mut calc.background_img,
        );
        bind(
            self,
            &pen.style.stroke_image,
            &mut calc.stroke_image,
            &mut calc.stroke_img,
        );
    }
}

fn bind(
    cache: &ImageCache,
    configured: &Option<String>,
    bound_src: &mut Option<String>,
    handle: &mut Option<ImageRef>,
) {
    if configured == bound_src && handle.is_some() {
        return;
    }
    *bound_src = configured.clone();
    *handle = configured.as_deref().and_then(|src| cache.get(src).cloned());
    if configured.is_some() && handle.is_none() {
        debug!(src = ?configured, "image not loaded yet");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> ImageCache {
        let mut cache = ImageCache::new();
        cache.insert(ImageRef::new("logo.png", 200.0, 100.0));
        cache.insert(ImageRef::new("tile.png", 8.0, 8.0));
        cache
    }

    #[test]
    fn sync_binds_loaded_images() {
        let mut pen = Pen::new("p", "rectangle");
        pen.icon.image = Some("logo.png".into());
        pen.style.background_image = Some("tile.png".into());
        pen.style.stroke_image = Some("missing.png".into());
        cache().sync(&mut pen);

        let calc = &pen.calculative;
        assert_eq!(calc.img.as_ref().map(|i| i.natural_width), Some(200.0));
        assert_eq!(calc.background_img.as_ref().map(|i| i.src.as_str()), Some("tile.png"));
        assert_eq!(calc.stroke_image.as_deref(), Some("missing.png"));
        assert!(calc.stroke_img.is_none());
    }

    #[test]
    fn sync_rebinds_on_src_change_and_clears_on_removal() {
        let cache = cache();
        let mut pen = Pen::new("p", "rectangle");
        pen.icon.image = Some("logo.png".into());
        cache.sync(&mut pen);
        pen.icon.image = Some("tile.png".into());
        cache.sync(&mut pen);
        assert_eq!(pen.calculative.img.as_ref().map(|i| i.src.as_str()), Some("tile.png"));

        pen.icon.image = None;
        cache.sync(&mut pen);
        assert!(pen.calculative.img.is_none());
        assert!(pen.calculative.image.is_none());
    }

    #[test]
    fn late_loading_image_is_picked_up() {
        let mut cache = ImageCache::new();
        let mut pen = Pen::new("p", "rectangle");
        pen.icon.image = Some("late.png".into());
        cache.sync(&mut pen);
        assert!(pen.calculative.img.is_none());
        cache.insert(ImageRef::new("late.png", 1.0, 1.0));
        cache.sync(&mut pen);
        assert!(pen.calculative.img.is_some());
    }

    #[test]
    fn aspect_needs_both_dimensions() {
        assert_eq!(ImageRef::new("a", 200.0, 100.0).aspect(), Some(2.0));
        assert_eq!(ImageRef::new("a", 0.0, 100.0).aspect(), None);
    }
}
