//! Cursors and Ranges
//!
//! Positions within the accessibility tree. A cursor without an index
//! covers its whole node; a range whose cursors share one node and both
//! carry an index selects characters of that node's text.

use std::cmp::Ordering;

use crate::tree::{AccessibilityTree, NodeId};
use crate::A11yError;

/// Movement direction in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// A node plus an optional character offset into its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    node: NodeId,
    index: Option<usize>,
}

impl Cursor {
    /// Cursor at a character offset
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index: Some(index) }
    }

    /// Cursor covering a whole node
    pub fn at_node(node: NodeId) -> Self {
        Self { node, index: None }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Text of the node under the cursor
    pub fn text(&self, tree: &AccessibilityTree) -> String {
        tree.get(self.node).map(|n| n.text()).unwrap_or_default()
    }

    /// Step to the next node in document order, containers included
    pub fn move_by_node(&self, tree: &AccessibilityTree, dir: Direction) -> Option<Cursor> {
        tree.next_in_order(self.node, dir).map(Cursor::at_node)
    }
}

/// Ordered pair of cursors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: Cursor,
    end: Cursor,
}

impl Range {
    pub fn new(start: Cursor, end: Cursor) -> Self {
        Self { start, end }
    }

    /// Range covering exactly one node
    pub fn from_node(node: NodeId) -> Self {
        Self::new(Cursor::at_node(node), Cursor::at_node(node))
    }

    pub fn start(&self) -> Cursor {
        self.start
    }

    pub fn end(&self) -> Cursor {
        self.end
    }

    /// Both ends inside the text of a single node
    pub fn is_sub_node(&self) -> bool {
        self.start.node == self.end.node && self.start.index.is_some() && self.end.index.is_some()
    }

    /// The leading cursor when moving in `dir`
    pub fn bound(&self, dir: Direction) -> Cursor {
        match dir {
            Direction::Forward => self.end,
            Direction::Backward => self.start,
        }
    }

    /// Direction of travel from `prev` to `next`
    pub fn direction(prev: &Range, next: &Range, tree: &AccessibilityTree) -> Result<Direction, A11yError> {
        let order = match tree.compare_order(prev.start.node, next.start.node)? {
            Ordering::Equal => prev.start.index.cmp(&next.start.index),
            other => other,
        };
        Ok(match order {
            Ordering::Greater => Direction::Backward,
            _ => Direction::Forward,
        })
    }
}
