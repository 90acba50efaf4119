//! Output Rules
//!
//! Format templates indexed by event type and role, plus role and state
//! metadata used by `$role` and state substitutions.
//!
//! Template syntax (tokens separated by spaces):
//! - `$name` substitutes an attribute or a specialized value (`$role`,
//!   `$value`, `$state`, `$indexInParent`, ...) of the node
//! - `@msg_id` substitutes a localized message; `@tag_h+$level` builds the
//!   id from attributes and `@describe_index($a,$b)` passes arguments
//! - `!flag` sets a speech property for the whole utterance
//! - a trailing `=` only outputs the token if nothing with the same
//!   annotation was output before

use std::collections::HashMap;
use std::fmt;

use fos_a11y::Role;
use serde::Deserialize;

use crate::earcon::Earcon;
use crate::OutputError;

/// Kind of UI transition being announced
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EventType {
    #[default]
    Navigate,
    MenuStart,
    MenuEnd,
    MenuListValueChanged,
    Alert,
    Other(String),
}

impl EventType {
    pub fn parse(s: &str) -> Self {
        match s {
            "navigate" => Self::Navigate,
            "menuStart" => Self::MenuStart,
            "menuEnd" => Self::MenuEnd,
            "menuListValueChanged" => Self::MenuListValueChanged,
            "alert" => Self::Alert,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Navigate => "navigate",
            Self::MenuStart => "menuStart",
            Self::MenuEnd => "menuEnd",
            Self::MenuListValueChanged => "menuListValueChanged",
            Self::Alert => "alert",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Templates for one role under one event type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rule {
    /// Output when focus moves into a node of this role
    pub enter: Option<String>,
    /// Output while focus stays inside a node of this role
    pub stay: Option<String>,
    /// Output when focus leaves a node of this role
    pub leave: Option<String>,
    /// Output for the node itself
    pub speak: Option<String>,
}

static EMPTY_RULE: Rule = Rule { enter: None, stay: None, leave: None, speak: None };

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(mut self, template: &str) -> Self {
        self.enter = Some(template.to_string());
        self
    }

    pub fn stay(mut self, template: &str) -> Self {
        self.stay = Some(template.to_string());
        self
    }

    pub fn leave(mut self, template: &str) -> Self {
        self.leave = Some(template.to_string());
        self
    }

    pub fn speak(mut self, template: &str) -> Self {
        self.speak = Some(template.to_string());
        self
    }

    fn merge(&mut self, other: Rule) {
        if other.enter.is_some() {
            self.enter = other.enter;
        }
        if other.stay.is_some() {
            self.stay = other.stay;
        }
        if other.leave.is_some() {
            self.leave = other.leave;
        }
        if other.speak.is_some() {
            self.speak = other.speak;
        }
    }
}

/// Rules for one event type, keyed by role identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct EventBlock {
    roles: HashMap<String, Rule>,
}

impl EventBlock {
    /// Rule for `role`, falling back to the `default` entry
    pub fn rule(&self, role: &Role) -> &Rule {
        self.roles
            .get(role.as_str())
            .or_else(|| self.roles.get("default"))
            .unwrap_or(&EMPTY_RULE)
    }

    /// Template for the node itself, falling back to `default.speak`
    pub fn speak(&self, role: &Role) -> Option<&str> {
        self.rule(role)
            .speak
            .as_deref()
            .or_else(|| self.roles.get("default").and_then(|r| r.speak.as_deref()))
    }

    fn insert(&mut self, role: &str, rule: Rule) {
        self.roles.insert(role.to_string(), rule);
    }
}

/// Rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    blocks: HashMap<String, EventBlock>,
}

impl RuleTable {
    /// Block for `event`, falling back to `navigate`
    pub fn block(&self, event: &EventType) -> &EventBlock {
        self.blocks
            .get(event.as_str())
            .or_else(|| self.blocks.get(EventType::Navigate.as_str()))
            .unwrap_or_else(|| empty_block())
    }

    /// Replace or extend rules from `{"event": {"role": {"speak": ...}}}`
    ///
    /// Fields present in the JSON override the existing rule field by field.
    pub fn merge_json(&mut self, json: &str) -> Result<(), OutputError> {
        let overrides: HashMap<String, HashMap<String, Rule>> =
            serde_json::from_str(json).map_err(OutputError::InvalidRules)?;
        for (event, roles) in overrides {
            let block = self.blocks.entry(event).or_default();
            for (role, rule) in roles {
                block.roles.entry(role).or_default().merge(rule);
            }
        }
        tracing::debug!("Merged rule overrides, {} event blocks", self.blocks.len());
        Ok(())
    }

    fn insert(&mut self, event: EventType, role: &str, rule: Rule) {
        self.blocks.entry(event.as_str().to_string()).or_default().insert(role, rule);
    }
}

fn empty_block() -> &'static EventBlock {
    static EMPTY: std::sync::OnceLock<EventBlock> = std::sync::OnceLock::new();
    EMPTY.get_or_init(EventBlock::default)
}

impl Default for RuleTable {
    fn default() -> Self {
        use EventType::*;

        let mut table = Self { blocks: HashMap::new() };

        table.insert(Navigate, "default", Rule::new().speak("$name $value $role"));
        table.insert(Navigate, "alert", Rule::new().speak("!doNotInterrupt $role $descendants"));
        table.insert(Navigate, "checkBox", Rule::new().speak("$name $role $checked"));
        table.insert(Navigate, "dialog", Rule::new().enter("$name $role"));
        table.insert(
            Navigate,
            "heading",
            Rule::new().enter("@tag_h+$hierarchicalLevel").speak("@tag_h+$hierarchicalLevel $name="),
        );
        table.insert(Navigate, "inlineTextBox", Rule::new().speak("$value="));
        table.insert(
            Navigate,
            "link",
            Rule::new()
                .enter("$name $visited $role")
                .stay("$name= $visited $role")
                .speak("$name= $visited $role"),
        );
        table.insert(
            Navigate,
            "list",
            Rule::new().enter("@aria_role_list @list_with_items($parentChildCount)"),
        );
        table.insert(Navigate, "listItem", Rule::new().enter("$role"));
        table.insert(
            Navigate,
            "menuItem",
            Rule::new().speak(
                "$if($haspopup, @describe_menu_item_with_submenu($name), @describe_menu_item($name)) \
                 @describe_index($indexInParent, $parentChildCount)",
            ),
        );
        table.insert(
            Navigate,
            "menuListOption",
            Rule::new().speak("$name $value @aria_role_menuitem @describe_index($indexInParent, $parentChildCount)"),
        );
        table.insert(Navigate, "paragraph", Rule::new().speak("$value"));
        table.insert(
            Navigate,
            "popUpButton",
            Rule::new().speak(
                "$value $name $role @aria_has_popup $if($collapsed, @aria_expanded_false, @aria_expanded_true)",
            ),
        );
        table.insert(
            Navigate,
            "radioButton",
            Rule::new()
                .speak("$if($checked, @describe_radio_selected($name), @describe_radio_unselected($name))"),
        );
        table.insert(Navigate, "slider", Rule::new().speak("@describe_slider($value, $name)"));
        table.insert(Navigate, "staticText", Rule::new().speak("$value $name"));
        table.insert(Navigate, "tab", Rule::new().speak("@describe_tab($name)"));
        table.insert(Navigate, "toolbar", Rule::new().enter("$name $role"));
        table.insert(
            Navigate,
            "window",
            Rule::new().enter("$name").speak("@describe_window($name) $earcon(OBJECT_OPEN)"),
        );

        table.insert(MenuStart, "default", Rule::new().speak("@chrome_menu_opened($name)  $earcon(OBJECT_OPEN)"));
        table.insert(MenuEnd, "default", Rule::new().speak("@chrome_menu_closed $earcon(OBJECT_CLOSE)"));
        table.insert(
            MenuListValueChanged,
            "default",
            Rule::new().speak(
                r#"$value $name $find({"state": {"selected": true, "invisible": false}}, @describe_index($indexInParent, $parentChildCount)) "#,
            ),
        );
        table.insert(
            Alert,
            "default",
            Rule::new().speak("!doNotInterrupt @aria_role_alert $name $earcon(ALERT_NONMODAL) $descendants"),
        );

        table
    }
}

/// Message and earcon for a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleInfo {
    pub msg_id: &'static str,
    pub earcon: Option<Earcon>,
}

/// Role metadata used by `$role`
pub fn role_info(role: &Role) -> Option<RoleInfo> {
    let (msg_id, earcon) = match role {
        Role::Alert => ("aria_role_alert", Some(Earcon::AlertNonmodal)),
        Role::Button => ("tag_button", Some(Earcon::Button)),
        Role::CheckBox => ("input_type_checkbox", None),
        Role::Dialog => ("dialog", None),
        Role::Heading => ("aria_role_heading", None),
        Role::Link => ("tag_link", Some(Earcon::Link)),
        Role::ListItem => ("aria_role_listitem", Some(Earcon::ListItem)),
        Role::MenuListOption => ("aria_role_menuitem", None),
        Role::PopUpButton => ("tag_button", None),
        Role::RadioButton => ("input_type_radio", None),
        Role::TextBox | Role::TextField => ("input_type_text", Some(Earcon::EditableText)),
        Role::Toolbar => ("aria_role_toolbar", None),
        _ => return None,
    };
    Some(RoleInfo { msg_id, earcon })
}

/// Message and earcon for one side of a boolean state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMessage {
    pub msg_id: &'static str,
    pub earcon: Earcon,
}

/// On/off metadata for a boolean state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    pub on: StateMessage,
    pub off: StateMessage,
}

impl StateInfo {
    pub fn resolve(&self, on: bool) -> StateMessage {
        if on { self.on } else { self.off }
    }
}

/// State metadata used by state substitutions such as `$checked`
pub fn state_info(name: &str) -> Option<StateInfo> {
    match name {
        "checked" => Some(StateInfo {
            on: StateMessage { msg_id: "checkbox_checked_state", earcon: Earcon::CheckOn },
            off: StateMessage { msg_id: "checkbox_unchecked_state", earcon: Earcon::CheckOff },
        }),
        _ => None,
    }
}
