//! Dot-path named tree of generation parameters.
//!
//! The derivation tree mirrors the stem hierarchy: top-level nodes are named
//! `"1"`, `"2"`, ... and the children of `"2"` are `"2.1"`, `"2.2"`, ...
//! Names are positional. Inserting or removing a node renames its level
//! (and everything below it) so suffixes stay contiguous.

pub mod node;
pub mod params;

pub use node::{DerivationNode, DerivationNodeId};
pub use params::{Arrangement, DerivationParams};

/// Arena-backed first-child/next-sibling tree. Slots of removed nodes are
/// reused by later insertions.
#[derive(Debug, Default)]
pub struct DerivationTree {
    nodes: Vec<Option<DerivationNode>>,
    free: Vec<DerivationNodeId>,
    root: Option<DerivationNodeId>,
}

impl DerivationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to a single node named `"1"`.
    pub fn create_root(&mut self) -> DerivationNodeId {
        self.reset();
        let id = self.alloc(DerivationNode::default());
        self.root = Some(id);
        self.rename_level(Some(id), None);
        id
    }

    /// Remove every node.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
    }

    /// First top-level node.
    pub fn root(&self) -> Option<DerivationNodeId> {
        self.root
    }

    pub fn node(&self, id: DerivationNodeId) -> &DerivationNode {
        self.get(id).expect("derivation node id refers to a removed node")
    }

    pub fn node_mut(&mut self, id: DerivationNodeId) -> &mut DerivationNode {
        self.nodes[id.0 as usize]
            .as_mut()
            .expect("derivation node id refers to a removed node")
    }

    pub fn get(&self, id: DerivationNodeId) -> Option<&DerivationNode> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Node with the given name.
    pub fn find(&self, name: &str) -> Option<DerivationNodeId> {
        self.preorder().find(|&id| self.node(id).name == name)
    }

    /// Names of all nodes in pre-order.
    pub fn names(&self) -> Vec<String> {
        self.preorder().map(|id| self.node(id).name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Append a child to the named node, inheriting its parameters.
    pub fn add_child(&mut self, name: &str) -> Option<DerivationNodeId> {
        let parent = self.find(name)?;
        let mut node = DerivationNode::with_params(self.node(parent).params().clone());
        node.parent = Some(parent);

        let last = self.siblings(self.node(parent).child).last();
        node.prev_sibling = last;
        let id = self.alloc(node);
        match last {
            Some(last) => self.node_mut(last).next_sibling = Some(id),
            None => self.node_mut(parent).child = Some(id),
        }

        self.rename_level(self.node(parent).child, Some(parent));
        Some(id)
    }

    /// Insert a node right after the named node, inheriting its parameters.
    pub fn add_sibling(&mut self, name: &str) -> Option<DerivationNodeId> {
        let prev = self.find(name)?;
        let (parent, next) = {
            let node = self.node(prev);
            (node.parent, node.next_sibling)
        };

        let mut node = DerivationNode::with_params(self.node(prev).params().clone());
        node.parent = parent;
        node.prev_sibling = Some(prev);
        node.next_sibling = next;
        let id = self.alloc(node);

        self.node_mut(prev).next_sibling = Some(id);
        if let Some(next) = next {
            self.node_mut(next).prev_sibling = Some(id);
        }

        self.rename_level(self.first_of_level(parent), parent);
        Some(id)
    }

    /// Remove the named node and its subtree. Returns `false` if no node
    /// has that name.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(id) = self.find(name) else {
            return false;
        };

        let (parent, prev, next) = {
            let node = self.node(id);
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = next,
            None => match parent {
                Some(parent) => self.node_mut(parent).child = next,
                None => self.root = next,
            },
        }
        if let Some(next) = next {
            self.node_mut(next).prev_sibling = prev;
        }

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes[current.0 as usize].take() {
                pending.extend(self.siblings(node.child));
                self.free.push(current);
            }
        }

        self.rename_level(self.first_of_level(parent), parent);
        true
    }

    fn alloc(&mut self, node: DerivationNode) -> DerivationNodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0 as usize] = Some(node);
            return id;
        }
        let id = DerivationNodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    fn first_of_level(&self, parent: Option<DerivationNodeId>) -> Option<DerivationNodeId> {
        match parent {
            Some(parent) => self.node(parent).child,
            None => self.root,
        }
    }

    fn siblings(&self, first: Option<DerivationNodeId>) -> impl Iterator<Item = DerivationNodeId> + '_ {
        std::iter::successors(first, |&id| self.node(id).next_sibling)
    }

    fn preorder(&self) -> impl Iterator<Item = DerivationNodeId> + '_ {
        let mut stack: Vec<DerivationNodeId> = self.root.into_iter().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let node = self.node(id);
            if let Some(next) = node.next_sibling {
                stack.push(next);
            }
            if let Some(child) = node.child {
                stack.push(child);
            }
            Some(id)
        })
    }

    /// Name a level positionally under its parent's name, then every level
    /// below it.
    fn rename_level(&mut self, first: Option<DerivationNodeId>, parent: Option<DerivationNodeId>) {
        let prefix = parent.map(|p| self.node(p).name.clone());
        let level: Vec<_> = self.siblings(first).collect();
        for (position, id) in level.into_iter().enumerate() {
            let name = match &prefix {
                Some(prefix) => format!("{}.{}", prefix, position + 1),
                None => (position + 1).to_string(),
            };
            self.node_mut(id).name = name;
            let child = self.node(id).child;
            self.rename_level(child, Some(id));
        }
    }

    /// Copy `source` and its subtree into this arena under `parent`.
    fn copy_subtree(
        &mut self,
        source: &DerivationTree,
        id: DerivationNodeId,
        parent: Option<DerivationNodeId>,
    ) -> DerivationNodeId {
        let original = source.node(id);
        let mut node = DerivationNode::with_params(original.params().clone());
        node.name = original.name.clone();
        node.parent = parent;
        let copy = self.alloc(node);

        let mut prev: Option<DerivationNodeId> = None;
        for child in source.siblings(original.child) {
            let child_copy = self.copy_subtree(source, child, Some(copy));
            self.link_after(prev, child_copy, copy);
            prev = Some(child_copy);
        }
        copy
    }

    fn link_after(&mut self, prev: Option<DerivationNodeId>, id: DerivationNodeId, parent: DerivationNodeId) {
        self.node_mut(id).prev_sibling = prev;
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = Some(id),
            None => self.node_mut(parent).child = Some(id),
        }
    }
}

impl Clone for DerivationTree {
    /// Rebuild the tree in a fresh, compacted arena.
    fn clone(&self) -> Self {
        let mut copy = DerivationTree::new();
        let mut prev: Option<DerivationNodeId> = None;
        for top in self.siblings(self.root) {
            let id = copy.copy_subtree(self, top, None);
            match prev {
                Some(prev) => {
                    copy.node_mut(prev).next_sibling = Some(id);
                    copy.node_mut(id).prev_sibling = Some(prev);
                }
                None => copy.root = Some(id),
            }
            prev = Some(id);
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<String>) -> Vec<String> {
        names.sort();
        names
    }

    #[test]
    fn test_get_names() {
        let mut tree = DerivationTree::new();
        tree.create_root();
        tree.add_sibling("1");
        tree.add_child("2");
        tree.add_sibling("2.1");
        tree.add_sibling("2.1");
        assert_eq!(tree.names(), vec!["1", "2", "2.1", "2.2", "2.3"]);

        tree.remove("2.1");
        assert_eq!(tree.names(), vec!["1", "2", "2.1", "2.2"]);

        tree.remove("2");
        assert_eq!(tree.names(), vec!["1"]);

        tree.reset();
        assert!(tree.names().is_empty());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_rename_keeps_identity() {
        let mut tree = DerivationTree::new();
        tree.create_root();
        let first = tree.add_child("1").unwrap();
        let second = tree.add_child("1").unwrap();
        let third = tree.add_child("1").unwrap();
        tree.node_mut(third).params_mut().seed = 3;

        assert!(tree.remove("1.1"));
        assert!(tree.get(first).is_none());
        assert_eq!(tree.node(second).name(), "1.1");
        assert_eq!(tree.node(third).name(), "1.2");
        assert_eq!(tree.find("1.2"), Some(third));
        assert_eq!(tree.node(third).params().seed, 3);
    }

    #[test]
    fn test_add_sibling_inserts_after() {
        let mut tree = DerivationTree::new();
        tree.create_root();
        let a = tree.add_child("1").unwrap();
        let c = tree.add_child("1").unwrap();
        tree.add_child("1.2").unwrap();
        let b = tree.add_sibling("1.1").unwrap();

        assert_eq!(tree.node(a).name(), "1.1");
        assert_eq!(tree.node(b).name(), "1.2");
        assert_eq!(tree.node(c).name(), "1.3");
        assert!(tree.find("1.3.1").is_some());
        assert_eq!(tree.node(b).prev_sibling(), Some(a));
        assert_eq!(tree.node(b).next_sibling(), Some(c));
    }

    #[test]
    fn test_assignment() {
        let mut tree = DerivationTree::new();
        tree.create_root();
        tree.add_child("1");
        tree.add_child("1.1");
        tree.add_sibling("1");
        tree.add_child("2");

        let mut copy = DerivationTree::new();
        copy.create_root();
        copy.add_child("1");
        copy.add_sibling("1.1");
        copy = tree.clone();

        let root = tree.node(tree.root().unwrap());
        let copy_root = copy.node(copy.root().unwrap());
        assert!(!std::ptr::eq(root, copy_root));
        assert_eq!(root.name(), copy_root.name());
        assert_eq!(
            sorted(copy.names()),
            vec!["1", "1.1", "1.1.1", "2", "2.1"]
        );
        assert_eq!(copy.names(), tree.names());
    }

    #[test]
    fn test_add_remove_cycles_reuse_slots() {
        let mut tree = DerivationTree::new();
        tree.create_root();
        for _ in 0..1000 {
            tree.add_child("1").unwrap();
            assert!(tree.remove("1.1"));
        }
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nodes.len(), 2);
        assert_eq!(tree.names(), vec!["1"]);
    }

    #[test]
    fn test_clone_compacts_removed_nodes() {
        let mut tree = DerivationTree::new();
        tree.create_root();
        tree.add_child("1");
        tree.add_child("1");
        tree.remove("1.1");

        let copy = tree.clone();
        assert_eq!(copy.len(), 2);
        assert_eq!(copy.names(), vec!["1", "1.1"]);

        let child = copy.find("1.1").unwrap();
        assert_eq!(copy.node(child).parent(), copy.root());
    }

    #[test]
    fn test_nonexistent() {
        let mut tree = DerivationTree::new();
        tree.create_root();
        assert!(tree.add_child("2").is_none());
        assert!(tree.add_sibling("1.1").is_none());
        assert!(!tree.remove("3.2"));
    }

    #[test]
    fn test_structure() {
        let mut tree = DerivationTree::new();
        let node1 = tree.create_root();
        let node2 = tree.add_sibling("1").unwrap();
        let node1_1 = tree.add_child("1").unwrap();
        let node1_2 = tree.add_sibling("1.1").unwrap();

        assert_eq!(tree.node(node2).prev_sibling(), Some(node1));
        assert!(tree.node(node2).next_sibling().is_none());

        let n = tree.node(node1_1);
        assert!(n.prev_sibling().is_none());
        assert_eq!(n.next_sibling(), Some(node1_2));
        assert_eq!(n.parent(), Some(node1));
        assert!(n.child().is_none());

        let n = tree.node(node1_2);
        assert_eq!(n.prev_sibling(), Some(node1_1));
        assert!(n.next_sibling().is_none());
        assert_eq!(n.parent(), Some(node1));
        assert!(n.child().is_none());
    }

    #[test]
    fn test_remove_second_sibling() {
        let mut tree = DerivationTree::new();
        tree.create_root();
        tree.add_child("1");
        tree.add_sibling("1.1");
        assert!(tree.remove("1.2"));

        let root = tree.root().unwrap();
        let child = tree.node(root).child().unwrap();
        let node = tree.node(child);
        assert_eq!(node.parent(), Some(root));
        assert!(node.child().is_none());
        assert!(node.next_sibling().is_none());
        assert!(node.prev_sibling().is_none());
    }

    #[test]
    fn test_remove_first_sibling() {
        let mut tree = DerivationTree::new();
        tree.create_root();
        tree.add_child("1");
        tree.add_sibling("1.1");
        assert!(tree.remove("1.1"));

        let root = tree.root().unwrap();
        let child = tree.node(root).child().unwrap();
        let node = tree.node(child);
        assert_eq!(node.name(), "1.1");
        assert_eq!(node.parent(), Some(root));
        assert!(node.next_sibling().is_none());
        assert!(node.prev_sibling().is_none());
    }

    #[test]
    fn test_remove_first_top_level_promotes_next() {
        let mut tree = DerivationTree::new();
        tree.create_root();
        let second = tree.add_sibling("1").unwrap();
        tree.add_child("2");

        assert!(tree.remove("1"));
        assert_eq!(tree.root(), Some(second));
        assert_eq!(tree.names(), vec!["1", "1.1"]);
        assert!(tree.node(second).prev_sibling().is_none());
    }

    #[test]
    fn test_child_inherits_params() {
        let mut tree = DerivationTree::new();
        let root = tree.create_root();
        tree.node_mut(root).params_mut().arrangement = Arrangement::Opposite;
        let child = tree.add_child("1").unwrap();
        assert_eq!(tree.node(child).params().arrangement, Arrangement::Opposite);
        assert_eq!(tree.len(), 2);
    }
}
