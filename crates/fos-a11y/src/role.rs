//! Automation Roles
//!
//! Semantic categories of accessibility nodes. Role names use the
//! camelCase identifiers the output rules are keyed by.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Automation role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    // Top-level containers
    Desktop,
    Window,
    RootWebArea,
    Dialog,
    Alert,

    // Widgets
    Button,
    CheckBox,
    Link,
    MenuItem,
    MenuListOption,
    MenuListPopup,
    PopUpButton,
    RadioButton,
    Slider,
    Tab,
    TextBox,
    TextField,

    // Document structure
    GenericContainer,
    Group,
    Heading,
    List,
    ListItem,
    Menu,
    Paragraph,
    Toolbar,

    // Text runs
    StaticText,
    InlineTextBox,

    /// A role the renderer has no dedicated handling for
    Other(String),
}

impl Role {
    /// Parse from an automation role identifier
    pub fn parse(s: &str) -> Self {
        match s {
            "desktop" => Self::Desktop,
            "window" => Self::Window,
            "rootWebArea" => Self::RootWebArea,
            "dialog" => Self::Dialog,
            "alert" => Self::Alert,
            "button" => Self::Button,
            "checkBox" => Self::CheckBox,
            "link" => Self::Link,
            "menuItem" => Self::MenuItem,
            "menuListOption" => Self::MenuListOption,
            "menuListPopup" => Self::MenuListPopup,
            "popUpButton" => Self::PopUpButton,
            "radioButton" => Self::RadioButton,
            "slider" => Self::Slider,
            "tab" => Self::Tab,
            "textBox" => Self::TextBox,
            "textField" => Self::TextField,
            "genericContainer" => Self::GenericContainer,
            "group" => Self::Group,
            "heading" => Self::Heading,
            "list" => Self::List,
            "listItem" => Self::ListItem,
            "menu" => Self::Menu,
            "paragraph" => Self::Paragraph,
            "toolbar" => Self::Toolbar,
            "staticText" => Self::StaticText,
            "inlineTextBox" => Self::InlineTextBox,
            other => Self::Other(other.to_string()),
        }
    }

    /// Automation role identifier
    pub fn as_str(&self) -> &str {
        match self {
            Self::Desktop => "desktop",
            Self::Window => "window",
            Self::RootWebArea => "rootWebArea",
            Self::Dialog => "dialog",
            Self::Alert => "alert",
            Self::Button => "button",
            Self::CheckBox => "checkBox",
            Self::Link => "link",
            Self::MenuItem => "menuItem",
            Self::MenuListOption => "menuListOption",
            Self::MenuListPopup => "menuListPopup",
            Self::PopUpButton => "popUpButton",
            Self::RadioButton => "radioButton",
            Self::Slider => "slider",
            Self::Tab => "tab",
            Self::TextBox => "textBox",
            Self::TextField => "textField",
            Self::GenericContainer => "genericContainer",
            Self::Group => "group",
            Self::Heading => "heading",
            Self::List => "list",
            Self::ListItem => "listItem",
            Self::Menu => "menu",
            Self::Paragraph => "paragraph",
            Self::Toolbar => "toolbar",
            Self::StaticText => "staticText",
            Self::InlineTextBox => "inlineTextBox",
            Self::Other(s) => s,
        }
    }

    /// Check if role is a text run carrying its own characters
    pub fn is_text_run(&self) -> bool {
        matches!(self, Self::StaticText | Self::InlineTextBox)
    }

    /// Check if role is editable text
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::TextBox | Self::TextField)
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
