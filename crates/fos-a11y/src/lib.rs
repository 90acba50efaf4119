//! fOS Accessibility
//!
//! Accessibility tree consumed by the fOS output renderer.
//!
//! Features:
//! - Arena-allocated accessibility tree with typed attributes and states
//! - Automation roles
//! - Ancestor chains and ancestry diffing between two tree positions
//! - Cursors and ranges, document-order leaf navigation
//! - JSON descendant queries

pub mod attributes;
pub mod query;
pub mod range;
pub mod role;
pub mod tree;

pub use attributes::AttrValue;
pub use query::FindQuery;
pub use range::{Cursor, Direction, Range};
pub use role::Role;
pub use tree::{AccessibilityNode, AccessibilityTree, NodeBounds, NodeId, MAX_TREE_DEPTH};

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Unknown node: {0}")]
    UnknownNode(u32),

    #[error("Ancestor chain deeper than {0} nodes")]
    DepthExceeded(usize),

    #[error("Invalid node query: {0}")]
    InvalidQuery(#[from] serde_json::Error),
}
