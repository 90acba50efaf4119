//! Template Evaluation
//!
//! Evaluates output templates against accessibility nodes and appends the
//! resulting units to an [`OutputBuffer`].

use fos_a11y::{AccessibilityNode, AccessibilityTree, AttrValue, Cursor, FindQuery, NodeBounds, NodeId, Range};

use crate::buffer::{AppendOptions, Annotation, OutputBuffer, SelectionSpan};
use crate::config::OutputConfig;
use crate::earcon::Earcon;
use crate::messages::{self, MessageCatalog};
use crate::output::FormatOptions;
use crate::parse::{ParseRef, ParseTree};
use crate::rules::{self, EventType, RuleTable};
use crate::sink::SpeechProperties;
use crate::OutputError;

/// A template token, classified by prefix and name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'t> {
    /// `$value`: the node's value, with its text selection
    Value,
    /// `$indexInParent`: 1-based position among siblings
    IndexInParent,
    /// `$parentChildCount`: number of siblings including the node
    ParentChildCount,
    /// `$state`: every active state flag
    State,
    /// `$find(query, template)`
    Find,
    /// `$descendants`: render the leaves below the node
    Descendants,
    /// `$role`: localized role description
    Role,
    /// `$if(cond, then, else)`
    If,
    /// `$earcon(ID)`: play an earcon with the previous unit
    Earcon,
    /// `$name` for any other name: an attribute or a state with metadata
    Attribute(&'t str),
    /// `@msg_id`
    Message(&'t str),
    /// `!flag`
    Property(&'t str),
    /// Tokens without a known prefix produce no output
    Ignored(&'t str),
}

impl<'t> Token<'t> {
    pub fn classify(prefix: Option<char>, name: &'t str) -> Self {
        match prefix {
            Some('$') => match name {
                "value" => Self::Value,
                "indexInParent" => Self::IndexInParent,
                "parentChildCount" => Self::ParentChildCount,
                "state" => Self::State,
                "find" => Self::Find,
                "descendants" => Self::Descendants,
                "role" => Self::Role,
                "if" => Self::If,
                "earcon" => Self::Earcon,
                _ => Self::Attribute(name),
            },
            Some('@') => Self::Message(name),
            Some('!') => Self::Property(name),
            _ => Self::Ignored(name),
        }
    }
}

/// A template as written in a rule, or a subtree of an already parsed one
#[derive(Debug, Clone, Copy)]
pub enum Template<'t> {
    Text(&'t str),
    Parsed(ParseRef<'t>),
}

/// Rendering state shared by one pass over one output buffer
pub(crate) struct Renderer<'a> {
    pub(crate) tree: &'a AccessibilityTree,
    pub(crate) rules: &'a RuleTable,
    pub(crate) catalog: &'a dyn MessageCatalog,
    pub(crate) config: &'a OutputConfig,
    pub(crate) options: FormatOptions,
    pub(crate) properties: &'a mut SpeechProperties,
    pub(crate) locations: &'a mut Vec<NodeBounds>,
    depth: usize,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(
        tree: &'a AccessibilityTree,
        rules: &'a RuleTable,
        catalog: &'a dyn MessageCatalog,
        config: &'a OutputConfig,
        options: FormatOptions,
        properties: &'a mut SpeechProperties,
        locations: &'a mut Vec<NodeBounds>,
    ) -> Self {
        Self { tree, rules, catalog, config, options, properties, locations, depth: 0 }
    }

    /// Run `f` one nesting level deeper, failing past the configured depth
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, OutputError>,
    ) -> Result<T, OutputError> {
        if self.depth >= self.config.max_depth {
            return Err(OutputError::DepthExceeded(self.config.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Evaluate `template` against `node`, skipping tokens named in `exclude`
    pub(crate) fn format(
        &mut self,
        node: Option<NodeId>,
        template: Template<'_>,
        buff: &mut OutputBuffer,
        exclude: &[&str],
    ) -> Result<(), OutputError> {
        self.nested(|this| match template {
            Template::Text(text) => {
                for token in normalize(text).split_whitespace() {
                    let tree = ParseTree::parse(token)?;
                    this.format_token(node, tree.root(), buff, exclude)?;
                }
                Ok(())
            }
            Template::Parsed(tree) => this.format_token(node, tree, buff, exclude),
        })
    }

    fn format_token(
        &mut self,
        node: Option<NodeId>,
        tree: ParseRef<'_>,
        buff: &mut OutputBuffer,
        exclude: &[&str],
    ) -> Result<(), OutputError> {
        let mut token = tree.value();
        let unique = token.ends_with('=');
        if unique {
            token = &token[..token.len() - 1];
        }

        let mut chars = token.chars();
        let prefix = chars.next();
        let name = chars.as_str();
        if exclude.contains(&name) {
            return Ok(());
        }

        let options = AppendOptions::new(unique);
        let tree_ref = self.tree;
        let target = match node {
            Some(id) => Some((id, tree_ref.node(id)?)),
            None => None,
        };

        match Token::classify(prefix, name) {
            Token::Value => {
                let Some((id, n)) = target else { return Ok(()) };
                self.format_value(id, n, buff, options);
            }
            Token::IndexInParent => {
                let Some((id, _)) = target else { return Ok(()) };
                if let Some(index) = tree_ref.index_in_parent(id) {
                    buff.append(&(index + 1).to_string(), options.annotate(Annotation::tag(name)));
                }
            }
            Token::ParentChildCount => {
                let Some((id, _)) = target else { return Ok(()) };
                if let Some(parent) = tree_ref.parent(id) {
                    let count = tree_ref.children(parent).len();
                    buff.append(&count.to_string(), options.annotate(Annotation::tag(name)));
                }
            }
            Token::State => {
                let Some((_, n)) = target else { return Ok(()) };
                let options = options.annotate(Annotation::tag("state"));
                for (flag, _) in n.state.iter().filter(|(_, on)| **on) {
                    buff.append(flag, options.clone());
                }
            }
            Token::Find => {
                let Some((id, _)) = target else { return Ok(()) };
                let Some(query) = tree.first_child() else { return Ok(()) };
                let query = FindQuery::from_json(query.value())?;
                if let (Some(found), Some(sub)) = (tree_ref.find(id, &query), tree.arg(1)) {
                    self.format(Some(found), Template::Parsed(sub), buff, &[])?;
                }
            }
            Token::Descendants => {
                let Some((id, _)) = target else { return Ok(()) };
                if tree_ref.is_leaf(id) {
                    return Ok(());
                }
                let leftmost = tree_ref.first_leaf(id);
                let rightmost = tree_ref.last_leaf(id);
                let subrange = Range::new(
                    Cursor::at_node(leftmost),
                    Cursor::at_node(rightmost),
                );
                self.nested(|this| this.render_range(&subrange, None, &EventType::Navigate, buff))?;
            }
            Token::Role => {
                let Some((_, n)) = target else { return Ok(()) };
                self.format_role(n, buff, options);
            }
            Token::If => {
                let Some(cond) = tree.first_child() else {
                    tracing::debug!("Ignoring $if without condition");
                    return Ok(());
                };
                let attrib = cond.value().get(1..).unwrap_or_default();
                let truthy = target.is_some_and(|(_, n)| {
                    n.attr(attrib).is_some_and(AttrValue::is_truthy) || n.has_state(attrib)
                });
                let branch = if truthy { cond.next_sibling() } else { cond.next_sibling().and_then(|t| t.next_sibling()) };
                if let Some(branch) = branch {
                    self.format(node, Template::Parsed(branch), buff, &[])?;
                }
            }
            Token::Earcon => {
                let Some(arg) = tree.first_child() else { return Ok(()) };
                match Earcon::parse(arg.value()) {
                    Some(earcon) => {
                        buff.annotate_last(Annotation::Earcon(earcon));
                    }
                    None => tracing::warn!("Unknown earcon: {}", arg.value()),
                }
            }
            Token::Attribute(attr) => {
                let Some((_, n)) = target else { return Ok(()) };
                self.format_attribute(n, attr, buff, options);
            }
            Token::Message(msg) => self.format_message(target, msg, tree, buff, options)?,
            Token::Property(flag) => self.properties.set(flag),
            Token::Ignored(_) => tracing::debug!("Ignoring template token without prefix: {}", token),
        }
        Ok(())
    }

    fn format_value(&self, id: NodeId, node: &AccessibilityNode, buff: &mut OutputBuffer, mut options: AppendOptions) {
        let text = node.attr("value").map(|v| v.to_string());
        if text.is_some() {
            if let Some(start) = node.attr("textSelStart").and_then(AttrValue::as_int) {
                let end = node.attr("textSelEnd").and_then(AttrValue::as_int).unwrap_or(start);
                let span = SelectionSpan::new(start.max(0) as usize, end.max(0) as usize);
                options = options.annotate(Annotation::Selection(span));
            }
        }
        // Text runs report their value as the name, so ancestors' `$name=`
        // does not repeat it
        let tag = if node.role.is_text_run() && self.tree.is_leaf(id) { "name" } else { "value" };
        buff.append(text.as_deref().unwrap_or_default(), options.annotate(Annotation::tag(tag)));
    }

    fn format_role(&self, node: &AccessibilityNode, buff: &mut OutputBuffer, mut options: AppendOptions) {
        options = options.annotate(Annotation::tag("role"));
        let msg = match rules::role_info(&node.role) {
            Some(info) => {
                if let Some(earcon) = info.earcon {
                    options = options.annotate(Annotation::Earcon(earcon));
                }
                self.message(info.msg_id, &[]).unwrap_or_else(|| {
                    tracing::warn!("Missing message {} for role {}", info.msg_id, node.role);
                    node.role.to_string()
                })
            }
            None => {
                tracing::error!("Missing role info for {}", node.role);
                node.role.to_string()
            }
        };
        buff.append(&msg, options);
    }

    fn format_attribute(&self, node: &AccessibilityNode, attr: &str, buff: &mut OutputBuffer, options: AppendOptions) {
        if let Some(value) = node.attr(attr) {
            buff.append(&value.to_string(), options.annotate(Annotation::tag(attr)));
        } else if let Some(info) = rules::state_info(attr) {
            let resolved = info.resolve(node.has_state(attr));
            let options = options
                .annotate(Annotation::tag("state"))
                .annotate(Annotation::Earcon(resolved.earcon));
            match self.message(resolved.msg_id, &[]) {
                Some(msg) => {
                    buff.append(&msg, options);
                }
                None => tracing::warn!("Missing message {} for state {}", resolved.msg_id, attr),
            }
        } else {
            tracing::trace!("Ignoring unknown attribute {} on {}", attr, node.role);
        }
    }

    fn format_message(
        &mut self,
        target: Option<(NodeId, &AccessibilityNode)>,
        msg: &str,
        tree: ParseRef<'_>,
        buff: &mut OutputBuffer,
        options: AppendOptions,
    ) -> Result<(), OutputError> {
        // Message ids can splice in attributes: `@tag_h+$hierarchicalLevel`
        let mut msg_id = String::new();
        for piece in msg.split('+') {
            match piece.strip_prefix('$') {
                Some(attr) => match target.and_then(|(_, n)| n.attr(attr)) {
                    Some(value) => msg_id.push_str(&value.to_string()),
                    None => {
                        tracing::debug!("Skipping message {}: no attribute {}", msg, attr);
                        return Ok(());
                    }
                },
                None => msg_id.push_str(piece),
            }
        }

        let node_id = target.map(|(id, _)| id);
        let mut args = Vec::new();
        for arg in tree.args() {
            if !arg.value().starts_with('$') {
                tracing::warn!("Unexpected message argument {} in {}", arg.value(), msg);
                return Ok(());
            }
            let mut msg_buff = OutputBuffer::new();
            self.format(node_id, Template::Parsed(arg), &mut msg_buff, &[])?;
            args.extend(msg_buff.iter().map(|u| u.text().to_string()));
        }

        match self.message(&msg_id, &args) {
            Some(text) => {
                buff.append(&text, options);
            }
            None => tracing::warn!("Missing message {}", msg_id),
        }
        Ok(())
    }

    /// Resolve a message for the active output channel
    fn message(&self, id: &str, args: &[String]) -> Option<String> {
        messages::resolve(self.catalog, id, args, self.options.braille, &self.config.braille_suffix)
    }
}

/// Drop whitespace after `,` and `:` so arguments stay within one token
fn normalize(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut after_separator = false;
    for c in template.chars() {
        if after_separator && c.is_whitespace() {
            continue;
        }
        after_separator = c == ',' || c == ':';
        out.push(c);
    }
    out
}
