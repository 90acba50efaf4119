//! Template Token Parser
//!
//! Turns one template token such as `@describe_index($a,$b)` into a tree of
//! function-call nodes. The root holds the operator, its first child the
//! first argument, and further arguments hang off `next_sibling`. Commas
//! inside `{...}` belong to the literal and do not split arguments.
//!
//! Nodes live in an arena and link to each other by index.

use crate::OutputError;

/// One parsed token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseNode {
    pub value: String,
    pub first_child: Option<usize>,
    pub next_sibling: Option<usize>,
    pub parent: Option<usize>,
}

/// Arena of parse nodes; index 0 is the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
}

impl ParseTree {
    /// Parse a single token
    pub fn parse(input: &str) -> Result<Self, OutputError> {
        let mut nodes = vec![ParseNode::default()];
        let mut current = 0usize;
        let mut brace_nesting = 0usize;

        for c in input.chars() {
            match c {
                '(' => {
                    let child = nodes.len();
                    nodes.push(ParseNode { parent: Some(current), ..Default::default() });
                    nodes[current].first_child = Some(child);
                    current = child;
                }
                ')' => {
                    current = nodes[current]
                        .parent
                        .ok_or_else(|| OutputError::UnbalancedParens(input.to_string()))?;
                }
                '{' => {
                    brace_nesting += 1;
                    nodes[current].value.push(c);
                }
                '}' => {
                    brace_nesting = brace_nesting.saturating_sub(1);
                    nodes[current].value.push(c);
                }
                ',' if brace_nesting == 0 => {
                    let sibling = nodes.len();
                    let parent = nodes[current].parent;
                    nodes.push(ParseNode { parent, ..Default::default() });
                    nodes[current].next_sibling = Some(sibling);
                    current = sibling;
                }
                _ => nodes[current].value.push(c),
            }
        }

        if current != 0 {
            return Err(OutputError::UnbalancedParens(input.to_string()));
        }
        Ok(Self { nodes })
    }

    pub fn root(&self) -> ParseRef<'_> {
        ParseRef { tree: self, idx: 0 }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Borrowed handle to a node inside a [`ParseTree`]
#[derive(Debug, Clone, Copy)]
pub struct ParseRef<'t> {
    tree: &'t ParseTree,
    idx: usize,
}

impl<'t> ParseRef<'t> {
    pub fn value(&self) -> &'t str {
        &self.tree.nodes[self.idx].value
    }

    pub fn first_child(&self) -> Option<ParseRef<'t>> {
        self.tree.nodes[self.idx].first_child.map(|idx| ParseRef { tree: self.tree, idx })
    }

    pub fn next_sibling(&self) -> Option<ParseRef<'t>> {
        self.tree.nodes[self.idx].next_sibling.map(|idx| ParseRef { tree: self.tree, idx })
    }

    /// Call arguments in order
    pub fn args(&self) -> impl Iterator<Item = ParseRef<'t>> + use<'t> {
        std::iter::successors(self.first_child(), |arg| arg.next_sibling())
    }

    /// The `n`th argument
    pub fn arg(&self, n: usize) -> Option<ParseRef<'t>> {
        self.args().nth(n)
    }
}
