//! Ancestry Diff
//!
//! Announces the containers left, entered and still surrounding focus when
//! it moves from one node to another.

use std::collections::HashSet;

use fos_a11y::NodeId;

use crate::buffer::OutputBuffer;
use crate::format::{Renderer, Template};
use crate::rules::EventType;
use crate::OutputError;

impl Renderer<'_> {
    /// Render `leave`, `enter` and `stay` templates for the move `prev` -> `node`
    pub(crate) fn ancestry(
        &mut self,
        node: NodeId,
        prev: NodeId,
        event: &EventType,
        buff: &mut OutputBuffer,
        exclude: &[&str],
    ) -> Result<(), OutputError> {
        let (tree, rules) = (self.tree, self.rules);
        let block = rules.block(event);

        let prev_only = tree.unique_ancestors(prev, node)?;
        let cur_only = tree.unique_ancestors(node, prev)?;

        for &left in &prev_only {
            let n = tree.node(left)?;
            if let Some(leave) = block.rule(&n.role).leave.as_deref() {
                self.format(Some(left), Template::Text(leave), buff, exclude)?;
            }
        }

        // Outermost container first; the node itself is spoken separately
        let mut entered = HashSet::new();
        let mut enter_outputs = Vec::new();
        for &ancestor in cur_only.iter().skip(1).rev() {
            let n = tree.node(ancestor)?;
            if let Some(enter) = block.rule(&n.role).enter.as_deref() {
                if entered.insert(n.role.clone()) {
                    let mut temp = OutputBuffer::new();
                    self.format(Some(ancestor), Template::Text(enter), &mut temp, exclude)?;
                    enter_outputs.push(temp);
                }
            }
            if self.config.is_boundary(&n.role) {
                break;
            }
        }
        for temp in enter_outputs {
            buff.extend(temp);
        }

        if exclude.contains(&"stay") {
            return Ok(());
        }
        let mut current = match tree.common_ancestor(node, prev)? {
            Some(common) if common == node => tree.parent(node),
            other => other,
        };
        while let Some(id) = current {
            let n = tree.node(id)?;
            if let Some(stay) = block.rule(&n.role).stay.as_deref() {
                self.format(Some(id), Template::Text(stay), buff, exclude)?;
            }
            current = tree.parent(id);
        }
        tracing::trace!("Ancestry {} -> {}: {} left, {} entered", prev.index(), node.index(), prev_only.len(), entered.len());
        Ok(())
    }
}
