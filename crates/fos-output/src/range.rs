//! Range Rendering
//!
//! Walks a range node by node in document order, rendering each node's ancestry diff and its
//! own `speak` template. Ranges inside a single node's text render the
//! selected characters instead.

use std::cmp::Ordering;

use fos_a11y::{Cursor, Direction, NodeId, Range};

use crate::buffer::{AppendOptions, OutputBuffer};
use crate::format::{Renderer, Template};
use crate::rules::EventType;
use crate::OutputError;

/// Tokens rendered from the text slice rather than the node
const SUB_NODE_EXCLUDE: &[&str] = &["stay", "name", "value"];

impl Renderer<'_> {
    /// Render `range`, diffing ancestry against `prev`
    pub(crate) fn render_range(
        &mut self,
        range: &Range,
        prev: Option<&Range>,
        event: &EventType,
        buff: &mut OutputBuffer,
    ) -> Result<(), OutputError> {
        if range.is_sub_node() {
            self.render_sub_node(range, prev, event, buff)
        } else {
            self.render_nodes(range, prev, event, buff)
        }
    }

    fn render_nodes(
        &mut self,
        range: &Range,
        prev: Option<&Range>,
        event: &EventType,
        buff: &mut OutputBuffer,
    ) -> Result<(), OutputError> {
        let tree = self.tree;
        let end = range.end().node();
        let mut current = range.start().node();
        let mut prev_node = match prev {
            Some(prev) => prev.start().node(),
            // Without a previous position everything from the root is entered
            None => *tree.ancestors(current)?.last().unwrap_or(&current),
        };

        loop {
            let mut node_buff = OutputBuffer::new();
            self.ancestry(current, prev_node, event, &mut node_buff, &[])?;
            self.render_node(current, event, &mut node_buff)?;
            if self.options.location {
                self.locations.push(tree.node(current)?.bounds);
            }
            buff.extend(node_buff);

            if current == end {
                break;
            }
            prev_node = current;
            match Cursor::at_node(current).move_by_node(tree, Direction::Forward) {
                Some(next) if tree.compare_order(next.node(), end)? != Ordering::Greater => current = next.node(),
                _ => {
                    tracing::debug!("Range end {} lies before node {}", end.index(), current.index());
                    break;
                }
            }
        }
        Ok(())
    }

    fn render_sub_node(
        &mut self,
        range: &Range,
        prev: Option<&Range>,
        event: &EventType,
        buff: &mut OutputBuffer,
    ) -> Result<(), OutputError> {
        let tree = self.tree;
        let prev = prev.unwrap_or(range);
        let dir = Range::direction(prev, range, tree)?;
        let prev_node = prev.bound(dir).node();
        let node = range.start().node();
        self.ancestry(node, prev_node, event, buff, SUB_NODE_EXCLUDE)?;

        let text: Vec<char> = range.start().text(tree).chars().collect();
        let a = range.start().index().unwrap_or(0).min(text.len());
        let b = range.end().index().unwrap_or(0).min(text.len());
        let start = a.min(b);
        let mut end = a.max(b);
        if start == end {
            end = (end + 1).min(text.len());
        }
        let slice: String = text[start..end].iter().collect();
        buff.append(&slice, AppendOptions::default());
        Ok(())
    }

    /// Render the `speak` template of `node`
    fn render_node(&mut self, node: NodeId, event: &EventType, buff: &mut OutputBuffer) -> Result<(), OutputError> {
        let (tree, rules) = (self.tree, self.rules);
        let role = &tree.node(node)?.role;
        match rules.block(event).speak(role) {
            Some(speak) => self.format(Some(node), Template::Text(speak), buff, &[]),
            None => {
                tracing::debug!("No speak template for {} under {}", role, event);
                Ok(())
            }
        }
    }
}
