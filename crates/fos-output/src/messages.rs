//! Message Catalog
//!
//! Localized message lookup. Braille variants live under the speech id plus
//! a suffix (`_brl` by default) and fall back to the speech message.

use std::collections::HashMap;

use crate::OutputError;

/// Localized message source
pub trait MessageCatalog {
    /// Resolve `id`, substituting positional `args`; `None` if unknown
    fn get_message(&self, id: &str, args: &[String]) -> Option<String>;
}

/// Resolve a message for speech or braille output
///
/// Braille lookups try `id + suffix` first; a missing braille variant is not
/// an error.
pub fn resolve(
    catalog: &dyn MessageCatalog,
    id: &str,
    args: &[String],
    braille: bool,
    braille_suffix: &str,
) -> Option<String> {
    if braille {
        let brl_id = format!("{}{}", id, braille_suffix);
        if let Some(msg) = catalog.get_message(&brl_id, args) {
            return Some(msg);
        }
        tracing::trace!("No braille variant for {}, using speech message", id);
    }
    catalog.get_message(id, args)
}

/// In-memory catalog with `$1`..`$n` placeholders
///
/// Ids are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct MessageTable {
    messages: HashMap<String, String>,
}

impl MessageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, text: &str) {
        self.messages.insert(id.to_ascii_lowercase(), text.to_string());
    }

    pub fn with(mut self, id: &str, text: &str) -> Self {
        self.insert(id, text);
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Load `{"id": "text", ...}` pairs
    pub fn from_json(json: &str) -> Result<Self, OutputError> {
        let raw: HashMap<String, String> =
            serde_json::from_str(json).map_err(OutputError::InvalidMessages)?;
        let mut table = Self::new();
        for (id, text) in &raw {
            table.insert(id, text);
        }
        Ok(table)
    }

    /// English strings for the built-in rule table
    pub fn english() -> Self {
        const MESSAGES: &[(&str, &str)] = &[
            ("aria_role_alert", "Alert"),
            ("aria_role_alert_brl", "alrt"),
            ("tag_button", "Button"),
            ("tag_button_brl", "btn"),
            ("input_type_checkbox", "Check box"),
            ("input_type_checkbox_brl", "chk"),
            ("checkbox_checked_state", "checked"),
            ("checkbox_checked_state_brl", "x"),
            ("checkbox_unchecked_state", "not checked"),
            ("checkbox_unchecked_state_brl", " "),
            ("dialog", "Dialog"),
            ("aria_role_heading", "Heading"),
            ("tag_h1", "Heading 1"),
            ("tag_h2", "Heading 2"),
            ("tag_h3", "Heading 3"),
            ("tag_h4", "Heading 4"),
            ("tag_h5", "Heading 5"),
            ("tag_h6", "Heading 6"),
            ("tag_link", "Link"),
            ("tag_link_brl", "lnk"),
            ("aria_role_list", "List"),
            ("list_with_items", "with $1 items"),
            ("aria_role_listitem", "List item"),
            ("aria_role_menuitem", "Menu item"),
            ("aria_role_toolbar", "Tool bar"),
            ("input_type_radio", "Radio button"),
            ("input_type_text", "Edit text"),
            ("input_type_text_brl", "ed"),
            ("describe_index", "$1 of $2"),
            ("describe_menu_item", "$1, menu item"),
            ("describe_menu_item_with_submenu", "$1, menu item with submenu"),
            ("describe_radio_selected", "$1, radio button selected"),
            ("describe_radio_unselected", "$1, radio button unselected"),
            ("describe_slider", "$1, $2, slider"),
            ("describe_tab", "$1, tab"),
            ("describe_window", "$1"),
            ("aria_has_popup", "has pop up"),
            ("aria_expanded_true", "Expanded"),
            ("aria_expanded_false", "Collapsed"),
            ("chrome_menu_opened", "$1 menu opened"),
            ("chrome_menu_closed", "Menu closed"),
        ];
        let mut table = Self::new();
        for (id, text) in MESSAGES {
            table.insert(id, text);
        }
        table
    }
}

impl MessageCatalog for MessageTable {
    fn get_message(&self, id: &str, args: &[String]) -> Option<String> {
        let template = self.messages.get(&id.to_ascii_lowercase())?;
        Some(substitute(template, args))
    }
}

/// Replace `$n` placeholders (1-based) with `args`
fn substitute(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let mut digits = String::new();
        while let Some(&(_, d)) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            digits.push(d);
            chars.next();
        }
        match digits.parse::<usize>().ok().and_then(|n| n.checked_sub(1)).and_then(|i| args.get(i)) {
            Some(arg) => out.push_str(arg),
            None => {
                out.push('$');
                out.push_str(&digits);
            }
        }
    }
    out
}
