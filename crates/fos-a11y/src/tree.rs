//! Accessibility Tree
//!
//! Arena-allocated accessibility tree. Nodes are only ever attached to an
//! existing parent on insertion, so the tree stays rooted and acyclic; walks
//! are still bounded by [`MAX_TREE_DEPTH`].

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attributes::AttrValue;
use crate::query::FindQuery;
use crate::range::Direction;
use crate::role::Role;
use crate::A11yError;

/// Deepest ancestor chain any walk will follow
pub const MAX_TREE_DEPTH: usize = 1024;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node bounds in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NodeBounds {
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Accessibility node
#[derive(Debug, Clone)]
pub struct AccessibilityNode {
    pub role: Role,
    pub attributes: BTreeMap<String, AttrValue>,
    pub state: BTreeMap<String, bool>,
    pub bounds: NodeBounds,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl AccessibilityNode {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            attributes: BTreeMap::new(),
            state: BTreeMap::new(),
            bounds: NodeBounds::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_state(mut self, name: &str, on: bool) -> Self {
        self.set_state(name, on);
        self
    }

    pub fn with_bounds(mut self, bounds: NodeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: impl Into<AttrValue>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Get an attribute value
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Set a boolean state flag
    pub fn set_state(&mut self, name: &str, on: bool) {
        self.state.insert(name.to_string(), on);
    }

    /// Read a state flag; absent flags are off
    pub fn has_state(&self, name: &str) -> bool {
        self.state.get(name).copied().unwrap_or(false)
    }

    /// Accessible name
    pub fn name(&self) -> Option<&str> {
        self.attr("name").and_then(AttrValue::as_str)
    }

    /// Text content addressed by cursors
    ///
    /// Editable fields expose their value, text runs their name.
    pub fn text(&self) -> String {
        let primary = if self.role.is_editable() { "value" } else { "name" };
        let fallback = if self.role.is_editable() { "name" } else { "value" };
        self.attr(primary)
            .or_else(|| self.attr(fallback))
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Accessibility tree
#[derive(Debug, Default)]
pub struct AccessibilityTree {
    nodes: Vec<AccessibilityNode>,
    root: Option<NodeId>,
}

impl AccessibilityTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the root node, replacing any previous root
    pub fn create_root(&mut self, role: Role) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        if let Some(old) = self.root {
            tracing::debug!("Replacing root {} with {}", old.0, id.0);
        }
        self.nodes.push(AccessibilityNode::new(role));
        self.root = Some(id);
        id
    }

    /// Add an empty node under `parent`
    pub fn add_node(&mut self, role: Role, parent: NodeId) -> Result<NodeId, A11yError> {
        self.insert(parent, AccessibilityNode::new(role))
    }

    /// Attach a prepared node as the last child of `parent`
    pub fn insert(&mut self, parent: NodeId, mut node: AccessibilityNode) -> Result<NodeId, A11yError> {
        if self.get(parent).is_none() {
            return Err(A11yError::UnknownNode(parent.0));
        }
        let id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    /// Get node by ID
    pub fn get(&self, id: NodeId) -> Option<&AccessibilityNode> {
        self.nodes.get(id.index())
    }

    /// Get mutable node
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut AccessibilityNode> {
        self.nodes.get_mut(id.index())
    }

    /// Get node or fail with [`A11yError::UnknownNode`]
    pub fn node(&self, id: NodeId) -> Result<&AccessibilityNode, A11yError> {
        self.get(id).ok_or(A11yError::UnknownNode(id.0))
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Zero-based position among siblings
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    /// Ancestor chain, leaf to root, starting with `id` itself
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>, A11yError> {
        self.node(id)?;
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if chain.len() >= MAX_TREE_DEPTH {
                tracing::warn!("Ancestor chain of node {} exceeds {} nodes", id.0, MAX_TREE_DEPTH);
                return Err(A11yError::DepthExceeded(MAX_TREE_DEPTH));
            }
            chain.push(parent);
            current = parent;
        }
        Ok(chain)
    }

    /// Ancestors of `node` (leaf to root, inclusive) that are not ancestors
    /// of `other`
    pub fn unique_ancestors(&self, node: NodeId, other: NodeId) -> Result<Vec<NodeId>, A11yError> {
        let chain = self.ancestors(node)?;
        let other_chain = self.ancestors(other)?;
        let shared = shared_suffix(&chain, &other_chain);
        Ok(chain[..chain.len() - shared].to_vec())
    }

    /// Deepest node present in both ancestor chains
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Result<Option<NodeId>, A11yError> {
        let chain = self.ancestors(a)?;
        let other_chain = self.ancestors(b)?;
        let shared = shared_suffix(&chain, &other_chain);
        Ok((shared > 0).then(|| chain[chain.len() - shared]))
    }

    /// Document order of two nodes
    pub fn compare_order(&self, a: NodeId, b: NodeId) -> Result<Ordering, A11yError> {
        if a == b {
            return Ok(Ordering::Equal);
        }
        let mut chain_a = self.ancestors(a)?;
        let mut chain_b = self.ancestors(b)?;
        chain_a.reverse();
        chain_b.reverse();
        let shared = chain_a.iter().zip(&chain_b).take_while(|(x, y)| x == y).count();
        match (chain_a.get(shared), chain_b.get(shared)) {
            // `a` is an ancestor of `b`
            (None, _) => Ok(Ordering::Less),
            (_, None) => Ok(Ordering::Greater),
            (Some(&x), Some(&y)) => Ok(self.index_in_parent(x).cmp(&self.index_in_parent(y))),
        }
    }

    /// Leftmost leaf under `id` (or `id` itself if it is a leaf)
    pub fn first_leaf(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&child) = self.children(current).first() {
            current = child;
        }
        current
    }

    /// Rightmost leaf under `id`
    pub fn last_leaf(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&child) = self.children(current).last() {
            current = child;
        }
        current
    }

    /// Next leaf in document order
    pub fn next_leaf(&self, id: NodeId, dir: Direction) -> Option<NodeId> {
        let mut current = id;
        let mut steps = 0;
        loop {
            let parent = self.parent(current)?;
            let siblings = self.children(parent);
            let pos = siblings.iter().position(|&c| c == current)?;
            let sibling = match dir {
                Direction::Forward => siblings.get(pos + 1),
                Direction::Backward => pos.checked_sub(1).and_then(|p| siblings.get(p)),
            };
            if let Some(&sibling) = sibling {
                return Some(match dir {
                    Direction::Forward => self.first_leaf(sibling),
                    Direction::Backward => self.last_leaf(sibling),
                });
            }
            current = parent;
            steps += 1;
            if steps >= MAX_TREE_DEPTH {
                tracing::warn!("Leaf walk from node {} gave up after {} levels", id.0, steps);
                return None;
            }
        }
    }

    /// Next node in pre-order, entering children before siblings
    ///
    /// Backward is the exact reverse: the previous sibling's last leaf, or
    /// the parent once the first child is reached.
    pub fn next_in_order(&self, id: NodeId, dir: Direction) -> Option<NodeId> {
        match dir {
            Direction::Forward => {
                if let Some(&child) = self.children(id).first() {
                    return Some(child);
                }
                let mut current = id;
                let mut steps = 0;
                while let Some(parent) = self.parent(current) {
                    let siblings = self.children(parent);
                    let pos = siblings.iter().position(|&c| c == current)?;
                    if let Some(&sibling) = siblings.get(pos + 1) {
                        return Some(sibling);
                    }
                    current = parent;
                    steps += 1;
                    if steps >= MAX_TREE_DEPTH {
                        tracing::warn!("Pre-order walk from node {} gave up after {} levels", id.0, steps);
                        return None;
                    }
                }
                None
            }
            Direction::Backward => {
                let parent = self.parent(id)?;
                let siblings = self.children(parent);
                let pos = siblings.iter().position(|&c| c == id)?;
                match pos.checked_sub(1).and_then(|p| siblings.get(p)) {
                    Some(&sibling) => Some(self.last_leaf(sibling)),
                    None => Some(parent),
                }
            }
        }
    }

    /// First strict descendant of `id`, in pre-order, matching `query`
    pub fn find(&self, id: NodeId, query: &FindQuery) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let node = self.get(current)?;
            if query.matches(node) {
                return Some(current);
            }
            stack.extend(node.children().iter().rev());
        }
        None
    }
}

/// Length of the common root-side suffix of two leaf-to-root chains
fn shared_suffix(a: &[NodeId], b: &[NodeId]) -> usize {
    a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;


    fn sample() -> (AccessibilityTree, Vec<NodeId>) {
        // window
        // ├── list
        // │   ├── item1 ── text1
        // │   └── item2 ── text2
        // └── button
        let mut tree = AccessibilityTree::new();
        let window = tree.create_root(Role::Window);
        let list = tree.add_node(Role::List, window).unwrap();
        let item1 = tree.add_node(Role::ListItem, list).unwrap();
        let text1 = tree.add_node(Role::StaticText, item1).unwrap();
        let item2 = tree.add_node(Role::ListItem, list).unwrap();
        let text2 = tree.add_node(Role::StaticText, item2).unwrap();
        let button = tree.add_node(Role::Button, window).unwrap();
        (tree, vec![window, list, item1, text1, item2, text2, button])
    }

    #[test]
    fn test_accessibility_tree() {
        let (tree, ids) = sample();
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.root(), Some(ids[0]));
        assert_eq!(tree.children(ids[1]), &[ids[2], ids[4]]);
        assert_eq!(tree.index_in_parent(ids[4]), Some(1));
        assert_eq!(tree.index_in_parent(ids[0]), None);
    }

    #[test]
    fn test_insert_unknown_parent() {
        let mut tree = AccessibilityTree::new();
        tree.create_root(Role::Window);
        assert!(matches!(
            tree.add_node(Role::Button, NodeId(42)),
            Err(A11yError::UnknownNode(42))
        ));
    }

    #[test]
    fn test_ancestors() {
        let (tree, ids) = sample();
        assert_eq!(tree.ancestors(ids[3]).unwrap(), vec![ids[3], ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn test_unique_ancestors_are_disjoint() {
        let (tree, ids) = sample();
        for &a in &ids {
            for &b in &ids {
                let only_a = tree.unique_ancestors(a, b).unwrap();
                let only_b = tree.unique_ancestors(b, a).unwrap();
                assert!(only_a.iter().all(|n| !only_b.contains(n)));

                // Unique part plus shared part rebuilds the full chain
                let common = tree.common_ancestor(a, b).unwrap().unwrap();
                let mut rebuilt = only_a.clone();
                rebuilt.extend(tree.ancestors(common).unwrap());
                assert_eq!(rebuilt, tree.ancestors(a).unwrap());
            }
        }
    }

    #[test]
    fn test_unique_ancestors_between_siblings() {
        let (tree, ids) = sample();
        assert_eq!(tree.unique_ancestors(ids[5], ids[3]).unwrap(), vec![ids[5], ids[4]]);
        assert_eq!(tree.common_ancestor(ids[5], ids[3]).unwrap(), Some(ids[1]));
        assert!(tree.unique_ancestors(ids[3], ids[3]).unwrap().is_empty());
    }

    #[test]
    fn test_leaf_navigation() {
        let (tree, ids) = sample();
        assert_eq!(tree.first_leaf(ids[0]), ids[3]);
        assert_eq!(tree.last_leaf(ids[0]), ids[6]);
        assert_eq!(tree.next_leaf(ids[3], Direction::Forward), Some(ids[5]));
        assert_eq!(tree.next_leaf(ids[5], Direction::Forward), Some(ids[6]));
        assert_eq!(tree.next_leaf(ids[6], Direction::Forward), None);
        assert_eq!(tree.next_leaf(ids[6], Direction::Backward), Some(ids[5]));
    }

    #[test]
    fn test_pre_order_navigation() {
        let (tree, ids) = sample();
        let mut forward = vec![ids[0]];
        while let Some(next) = tree.next_in_order(*forward.last().unwrap(), Direction::Forward) {
            forward.push(next);
        }
        assert_eq!(forward, ids);

        let mut backward = vec![ids[6]];
        while let Some(prev) = tree.next_in_order(*backward.last().unwrap(), Direction::Backward) {
            backward.push(prev);
        }
        backward.reverse();
        assert_eq!(backward, ids);
    }

    #[test]
    fn test_compare_order() {
        let (tree, ids) = sample();
        assert_eq!(tree.compare_order(ids[3], ids[6]).unwrap(), Ordering::Less);
        assert_eq!(tree.compare_order(ids[6], ids[5]).unwrap(), Ordering::Greater);
        assert_eq!(tree.compare_order(ids[1], ids[3]).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_text_prefers_value_for_editable() {
        let field = AccessibilityNode::new(Role::TextField)
            .with_attr("name", "Search")
            .with_attr("value", "rust");
        assert_eq!(field.text(), "rust");
        let run = AccessibilityNode::new(Role::StaticText).with_attr("name", "Hello");
        assert_eq!(run.text(), "Hello");
    }
}
