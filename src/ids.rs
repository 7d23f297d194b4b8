//! Id generation for anchors and pens.
//!
//! Resolution takes an `IdGenerator` instead of calling a global function, so
//! tests can assert on exact ids.

use uuid::Uuid;

/// Source of fresh, unique ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Short random ids: the first 8 hex digits of a v4 UUID.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(8);
        id
    }
}

/// Deterministic ids: `{prefix}{n}` with `n` counting up from 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("a")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn random_ids_are_short_and_unique() {
        let mut ids = RandomIds;
        let seen: HashSet<String> = (0..64).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 64);
        assert!(seen.iter().all(|id| id.len() == 8));
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new("anchor-");
        assert_eq!(ids.next_id(), "anchor-1");
        assert_eq!(ids.next_id(), "anchor-2");
    }
}
