//! Plant stem tree.
//!
//! Stems live in an arena and link to each other through [`StemId`]s:
//! parent, first child and a doubly linked sibling chain. The mesh
//! generator walks this structure read-only.

pub mod leaf;
pub mod stem;

use std::ops::{Index, IndexMut};

pub use leaf::Leaf;
pub use stem::{Stem, StemId, Surface};

/// Arena of stems forming a tree rooted at the trunk.
///
/// Slots freed by [`Plant::remove_stem`] are reused, so an id held past the
/// removal of its stem may later refer to a different stem.
#[derive(Clone, Debug, Default)]
pub struct Plant {
    stems: Vec<Option<Stem>>,
    free: Vec<StemId>,
    root: Option<StemId>,
}

impl Plant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all stems and create a new root.
    pub fn create_root(&mut self) -> StemId {
        self.remove_root();
        let id = self.alloc(Stem::default());
        self.root = Some(id);
        id
    }

    /// Remove all stems.
    pub fn remove_root(&mut self) {
        self.stems.clear();
        self.free.clear();
        self.root = None;
    }

    pub fn root(&self) -> Option<StemId> {
        self.root
    }

    /// Add a default stem as the first child of `parent`.
    pub fn add_stem(&mut self, parent: StemId) -> StemId {
        self.insert_stem(Stem::default(), parent)
    }

    /// Insert a stem as the first child of `parent`. Any links the stem
    /// carries are replaced.
    pub fn insert_stem(&mut self, mut stem: Stem, parent: StemId) -> StemId {
        let first = self[parent].child;
        stem.parent = Some(parent);
        stem.child = None;
        stem.prev_sibling = None;
        stem.next_sibling = first;

        let id = self.alloc(stem);
        if let Some(first) = first {
            self[first].prev_sibling = Some(id);
        }
        self[parent].child = Some(id);
        id
    }

    /// Remove a stem and all of its descendants.
    pub fn remove_stem(&mut self, id: StemId) {
        if self.root == Some(id) {
            self.remove_root();
            return;
        }

        self.unlink(id);

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(stem) = self.stems[current.0 as usize].take() {
                pending.extend(self.children_of(&stem));
                self.free.push(current);
            }
        }
    }

    fn unlink(&mut self, id: StemId) {
        let (parent, prev, next) = {
            let stem = &self[id];
            (stem.parent, stem.prev_sibling, stem.next_sibling)
        };

        match prev {
            Some(prev) => self[prev].next_sibling = next,
            None => {
                if let Some(parent) = parent {
                    self[parent].child = next;
                }
            }
        }
        if let Some(next) = next {
            self[next].prev_sibling = prev;
        }
    }

    fn children_of(&self, stem: &Stem) -> Vec<StemId> {
        std::iter::successors(stem.child, |&c| self[c].next_sibling).collect()
    }

    pub fn get(&self, id: StemId) -> Option<&Stem> {
        self.stems.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: StemId) -> Option<&mut Stem> {
        self.stems.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Children of a stem in sibling order.
    pub fn children(&self, id: StemId) -> impl Iterator<Item = StemId> + '_ {
        std::iter::successors(self[id].child, move |&c| self[c].next_sibling)
    }

    /// Ids of all live stems.
    pub fn stem_ids(&self) -> impl Iterator<Item = StemId> + '_ {
        self.stems
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| StemId(i as u32))
    }

    /// Number of live stems.
    pub fn len(&self) -> usize {
        self.stems.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn alloc(&mut self, stem: Stem) -> StemId {
        if let Some(id) = self.free.pop() {
            self.stems[id.0 as usize] = Some(stem);
            return id;
        }
        let id = StemId(self.stems.len() as u32);
        self.stems.push(Some(stem));
        id
    }
}

impl Index<StemId> for Plant {
    type Output = Stem;

    fn index(&self, id: StemId) -> &Stem {
        self.get(id).expect("stem id refers to a removed stem")
    }
}

impl IndexMut<StemId> for Plant {
    fn index_mut(&mut self, id: StemId) -> &mut Stem {
        self.get_mut(id).expect("stem id refers to a removed stem")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_root() {
        let mut plant = Plant::new();
        assert!(plant.is_empty());
        let root = plant.create_root();
        assert_eq!(plant.root(), Some(root));
        assert_eq!(plant.len(), 1);
        assert!(plant[root].parent().is_none());
    }

    #[test]
    fn test_add_stem_prepends() {
        let mut plant = Plant::new();
        let root = plant.create_root();
        let a = plant.add_stem(root);
        let b = plant.add_stem(root);

        assert_eq!(plant.children(root).collect::<Vec<_>>(), vec![b, a]);
        assert_eq!(plant[b].next_sibling(), Some(a));
        assert_eq!(plant[a].prev_sibling(), Some(b));
        assert_eq!(plant[a].parent(), Some(root));
    }

    #[test]
    fn test_remove_stem_subtree() {
        let mut plant = Plant::new();
        let root = plant.create_root();
        let a = plant.add_stem(root);
        let a1 = plant.add_stem(a);
        let b = plant.add_stem(root);

        plant.remove_stem(a);
        assert!(plant.get(a).is_none());
        assert!(plant.get(a1).is_none());
        assert_eq!(plant.children(root).collect::<Vec<_>>(), vec![b]);
        assert!(plant[b].next_sibling().is_none());
        assert_eq!(plant.len(), 2);
    }

    #[test]
    fn test_remove_first_child_relinks_parent() {
        let mut plant = Plant::new();
        let root = plant.create_root();
        let a = plant.add_stem(root);
        let b = plant.add_stem(root);

        plant.remove_stem(b);
        assert_eq!(plant[root].child(), Some(a));
        assert!(plant[a].prev_sibling().is_none());
    }

    #[test]
    fn test_removed_slots_reused() {
        let mut plant = Plant::new();
        let root = plant.create_root();
        for _ in 0..1000 {
            let stem = plant.add_stem(root);
            plant.add_stem(stem);
            plant.remove_stem(stem);
        }
        assert_eq!(plant.len(), 1);
        assert_eq!(plant.stems.len(), 3);
        assert!(plant[root].child().is_none());

        let reused = plant.add_stem(root);
        assert_eq!(plant.len(), 2);
        assert_eq!(plant.children(root).collect::<Vec<_>>(), vec![reused]);
    }

    #[test]
    fn test_remove_root_clears() {
        let mut plant = Plant::new();
        let root = plant.create_root();
        plant.add_stem(root);
        plant.remove_stem(root);
        assert!(plant.is_empty());
        assert_eq!(plant.stem_ids().count(), 0);
    }

    #[test]
    fn test_materials() {
        let mut stem = Stem::default();
        stem.set_material(Surface::Inner, 4);
        assert_eq!(stem.material(Surface::Outer), 0);
        assert_eq!(stem.material(Surface::Inner), 4);
    }
}
