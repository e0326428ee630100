//! Path-addressed document tree.
//!
//! Nodes live in a generational arena owned by [`TreeIndex`]. The root is a
//! synthetic node keyed `Root` whose children are the top-level entries.
//! Nodes are named from the outside only by path strings (see [`crate::domain::path`]);
//! no path is stored, each is resolved by walking down from the root.

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entry::Entry;
use crate::domain::path;
use crate::domain::value::DocumentShape;

pub const ROOT_KEY: &str = "Root";

/// Tree node wrapping one entry.
#[derive(Debug)]
pub struct TreeNode {
    /// Entry data for this node; its `children` are re-hung as child nodes
    pub entry: Entry,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in entry order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn key(&self) -> &str {
        &self.entry.key
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Arena-backed tree with path-string addressing.
#[derive(Debug)]
pub struct TreeIndex {
    arena: Arena<TreeNode>,
    root: Index,
}

impl TreeIndex {
    /// Empty tree holding only the root.
    pub fn new(shape: DocumentShape) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode {
            entry: Entry::leaf(ROOT_KEY, Vec::new(), shape.empty_value()),
            parent: None,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    /// Tree with `entries` under the root, recursively.
    #[instrument(level = "debug", skip(entries), fields(count = entries.len()))]
    pub fn from_entries(shape: DocumentShape, entries: Vec<Entry>) -> Self {
        let mut tree = Self::new(shape);
        let root = tree.root;
        for entry in entries {
            tree.attach(root, entry);
        }
        tree
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &TreeNode {
        &self.arena[self.root]
    }

    pub fn node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Always false: the root is always present.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Appends a node for `entry` under `parent` and returns it.
    ///
    /// Does not descend into `entry.children`; use [`TreeIndex::attach`] for that.
    /// Returns `None` if `parent` is not in this tree.
    pub fn add_child(&mut self, parent: Index, entry: Entry) -> Option<Index> {
        if !self.arena.contains(parent) {
            return None;
        }
        let idx = self.arena.insert(TreeNode {
            entry,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(p) = self.arena.get_mut(parent) {
            p.children.push(idx);
        }
        Some(idx)
    }

    /// Adds `entry` under `parent`, then its children under the new node, recursively.
    pub fn attach(&mut self, parent: Index, entry: Entry) -> Option<Index> {
        let (head, children) = entry.detach_children();
        let idx = self.add_child(parent, head)?;
        for child in children {
            self.attach(idx, child);
        }
        Some(idx)
    }

    /// Resolves a path string, one key per level. `None` if any segment fails
    /// to match or the path is malformed.
    pub fn path_to_node(&self, path: &str) -> Option<&TreeNode> {
        self.resolve(path).and_then(|idx| self.arena.get(idx))
    }

    /// Index form of [`TreeIndex::path_to_node`].
    pub fn resolve(&self, path: &str) -> Option<Index> {
        let keys = path::split(path)?;
        let mut current = self.root;
        for key in &keys {
            let node = self.arena.get(current)?;
            current = node
                .children
                .iter()
                .copied()
                .find(|&child| self.arena.get(child).is_some_and(|c| c.entry.key == *key))?;
        }
        Some(current)
    }

    /// Paths of the direct children of `path`; empty when unresolved.
    pub fn children_keys(&self, path: &str) -> Vec<String> {
        let Some(node) = self.path_to_node(path) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter_map(|&idx| self.arena.get(idx))
            .map(|child| path::join(path, child.key()))
            .collect()
    }

    /// True iff `path` resolves to a node with at least one child.
    pub fn is_branch(&self, path: &str) -> bool {
        self.count_children(path) > 0
    }

    /// Number of direct children of `path`, 0 when unresolved.
    pub fn count_children(&self, path: &str) -> usize {
        self.path_to_node(path)
            .map(TreeNode::child_count)
            .unwrap_or(0)
    }

    /// Path string of an arena node, computed by walking up to the root.
    pub fn path_of(&self, idx: Index) -> Option<String> {
        let mut keys = Vec::new();
        let mut current = self.arena.get(idx)?;
        while let Some(parent) = current.parent {
            keys.push(current.key());
            current = self.arena.get(parent)?;
        }
        keys.reverse();
        Some(path::from_keys(keys))
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Longest root-to-leaf chain, counting the root.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Paths of all nodes without children, in pre-order. The root is excluded.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut leaves = Vec::new();
        let root = self.root_node();
        for &child in &root.children {
            self.collect_leaves(child, "", &mut leaves);
        }
        leaves
    }

    fn collect_leaves(&self, node_idx: Index, parent_path: &str, leaves: &mut Vec<String>) {
        if let Some(node) = self.node(node_idx) {
            let node_path = path::join(parent_path, node.key());
            if node.children.is_empty() {
                leaves.push(node_path);
            } else {
                for &child in &node.children {
                    self.collect_leaves(child, &node_path, leaves);
                }
            }
        }
    }
}

/// Pre-order traversal starting at the root.
pub struct TreeIterator<'a> {
    tree: &'a TreeIndex,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a TreeIndex) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
