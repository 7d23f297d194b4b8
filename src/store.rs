//! The entity table: id → pen, plus insertion order.
//!
//! Parents are looked up by id on every access; no pen holds a reference to
//! another. Geometry caches are invalidated per subtree through
//! [`PenTable::invalidate`] or [`PenTable::update`].

use std::collections::HashMap;

use serde::Deserialize;

use crate::errors::{LoadError, ResolveError};
use crate::log::debug;
use crate::pen::Pen;

#[derive(Debug, Default, Clone)]
pub struct PenTable {
    pens: HashMap<String, Pen>,
    order: Vec<String>,
}

#[derive(Deserialize)]
struct TableDocument {
    pens: Vec<Pen>,
}

impl PenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load pens from `{"pens": [...]}` JSON and check parent links.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let doc: TableDocument = serde_json::from_str(json)?;
        let mut table = PenTable::new();
        for pen in doc.pens {
            if table.contains(&pen.id) {
                return Err(LoadError::DuplicateId { id: pen.id });
            }
            table.insert(pen);
        }
        table.validate()?;
        Ok(table)
    }

    /// Insert or replace a pen. Replacing keeps the pen's draw position and
    /// invalidates the caches of its descendants.
    pub fn insert(&mut self, pen: Pen) -> Option<Pen> {
        let id = pen.id.clone();
        let previous = self.pens.insert(id.clone(), pen);
        if previous.is_some() {
            self.invalidate(&id);
        } else {
            self.order.push(id);
        }
        previous
    }

    /// Remove a pen. Its descendants lose their cached geometry and resolve
    /// again on the next pass.
    pub fn remove(&mut self, id: &str) -> Option<Pen> {
        if !self.pens.contains_key(id) {
            return None;
        }
        self.invalidate(id);
        let pen = self.pens.remove(id)?;
        self.order.retain(|o| o != id);
        Some(pen)
    }

    pub fn get(&self, id: &str) -> Option<&Pen> {
        self.pens.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Pen> {
        self.pens.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pens.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pens.is_empty()
    }

    /// Pens in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Pen> {
        self.order.iter().filter_map(|id| self.pens.get(id))
    }

    /// Ids sorted by layer; equal layers keep insertion order.
    pub fn draw_order(&self) -> Vec<String> {
        let mut ids: Vec<(i32, &String)> = self
            .order
            .iter()
            .filter_map(|id| self.pens.get(id).map(|p| (p.layer, id)))
            .collect();
        ids.sort_by_key(|(layer, _)| *layer);
        ids.into_iter().map(|(_, id)| id.clone()).collect()
    }

    pub fn parent(&self, pen: &Pen) -> Option<&Pen> {
        pen.parent_id.as_deref().and_then(|pid| self.pens.get(pid))
    }

    /// Topmost ancestor of `id` (the pen itself when it is a root).
    pub fn root_of(&self, id: &str) -> Result<&Pen, ResolveError> {
        let mut pen = self
            .get(id)
            .ok_or_else(|| ResolveError::UnknownPen { id: id.to_string() })?;
        for _ in 0..=self.len() {
            let Some(parent_id) = pen.parent_id.as_deref() else {
                return Ok(pen);
            };
            pen = self.get(parent_id).ok_or_else(|| ResolveError::UnknownParent {
                pen: pen.id.clone(),
                parent: parent_id.to_string(),
            })?;
        }
        Err(ResolveError::ParentCycle { pen: id.to_string() })
    }

    /// Direct children of `id`, in insertion order.
    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Pen> + 'a {
        self.iter()
            .filter(move |p| p.parent_id.as_deref() == Some(id))
    }

    /// All descendants of `id`, parents before children.
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut frontier = vec![id.to_string()];
        while let Some(current) = frontier.pop() {
            for child in self.children(&current) {
                if child.id != id && !out.contains(&child.id) {
                    out.push(child.id.clone());
                    frontier.push(child.id.clone());
                }
            }
        }
        out
    }

    /// Clear the geometry cache of `id` and everything below it.
    pub fn invalidate(&mut self, id: &str) {
        let mut ids = self.descendants(id);
        ids.push(id.to_string());
        debug!(pen = id, count = ids.len(), "invalidating geometry");
        for pen_id in ids {
            if let Some(pen) = self.pens.get_mut(&pen_id) {
                pen.calculative.clear_geometry();
            }
        }
    }

    /// Mutate a pen's local fields, then invalidate its subtree.
    /// Returns false when the pen does not exist.
    pub fn update(&mut self, id: &str, f: impl FnOnce(&mut Pen)) -> bool {
        let Some(pen) = self.pens.get_mut(id) else {
            return false;
        };
        f(pen);
        self.invalidate(id);
        true
    }

    /// Clear the geometry cache of every pen.
    pub fn invalidate_all(&mut self) {
        for pen in self.pens.values_mut() {
            pen.calculative.clear_geometry();
        }
    }

    /// Check that every `parentId` resolves and every chain reaches a root.
    pub fn validate(&self) -> Result<(), ResolveError> {
        for id in &self.order {
            self.root_of(id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn tree() -> PenTable {
        let mut table = PenTable::new();
        table.insert(Pen::new("root", "rectangle").with_rect(0.0, 0.0, 100.0, 100.0));
        table.insert(Pen::new("child", "rectangle").with_parent("root"));
        table.insert(Pen::new("grandchild", "rectangle").with_parent("child"));
        table.insert(Pen::new("other", "rectangle"));
        table
    }

    #[test]
    fn root_of_walks_to_the_top() {
        let table = tree();
        assert_eq!(table.root_of("grandchild").unwrap().id, "root");
        assert_eq!(table.root_of("other").unwrap().id, "other");
    }

    #[test]
    fn root_of_detects_cycles() {
        let mut table = PenTable::new();
        table.insert(Pen::new("a", "rectangle").with_parent("b"));
        table.insert(Pen::new("b", "rectangle").with_parent("a"));
        assert_eq!(
            table.root_of("a").unwrap_err(),
            ResolveError::ParentCycle { pen: "a".into() }
        );
    }

    #[test]
    fn descendants_are_transitive() {
        let table = tree();
        assert_eq!(table.descendants("root"), vec!["child", "grandchild"]);
        assert!(table.descendants("other").is_empty());
    }

    #[test]
    fn update_invalidates_subtree_only() {
        let mut table = tree();
        for id in ["root", "child", "grandchild", "other"] {
            table.get_mut(id).unwrap().calculative.world_rect = Some(Rect::new(0.0, 0.0, 1.0, 1.0));
        }
        assert!(table.update("child", |pen| pen.x = 5.0));
        assert!(table.get("root").unwrap().calculative.world_rect.is_some());
        assert!(table.get("child").unwrap().calculative.world_rect.is_none());
        assert!(table.get("grandchild").unwrap().calculative.world_rect.is_none());
        assert!(table.get("other").unwrap().calculative.world_rect.is_some());
        assert!(!table.update("missing", |_| {}));
    }

    #[test]
    fn draw_order_sorts_by_layer_stably() {
        let mut table = tree();
        table.get_mut("root").unwrap().layer = 2;
        table.get_mut("other").unwrap().layer = -1;
        assert_eq!(table.draw_order(), vec!["other", "child", "grandchild", "root"]);
    }

    #[test]
    fn remove_drops_from_order() {
        let mut table = tree();
        assert!(table.remove("other").is_some());
        assert_eq!(table.iter().count(), 3);
        assert!(table.remove("other").is_none());
    }

    #[test]
    fn remove_clears_descendant_geometry() {
        let mut table = tree();
        for id in ["child", "grandchild"] {
            table.get_mut(id).unwrap().calculative.world_rect =
                Some(Rect::new(0.0, 0.0, 1.0, 1.0));
        }
        table.remove("root");
        assert!(table.get("child").unwrap().calculative.world_rect.is_none());
        assert!(table.get("grandchild").unwrap().calculative.world_rect.is_none());
        assert!(matches!(
            table.root_of("grandchild"),
            Err(ResolveError::UnknownParent { .. })
        ));
    }

    #[test]
    fn from_json_rejects_dangling_parent() {
        let json = r#"{"pens": [{"id": "a", "parentId": "nope"}]}"#;
        let err = PenTable::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Integrity(ResolveError::UnknownParent { .. })
        ));
    }

    #[test]
    fn from_json_rejects_duplicates() {
        let json = r#"{"pens": [{"id": "a"}, {"id": "a"}]}"#;
        assert!(matches!(
            PenTable::from_json(json).unwrap_err(),
            LoadError::DuplicateId { .. }
        ));
    }
}
