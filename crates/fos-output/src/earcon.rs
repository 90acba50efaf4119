//! Earcons
//!
//! Short non-speech sound cues. Identifiers match the upper-case names used
//! in templates, e.g. `$earcon(OBJECT_OPEN)`.

use std::fmt;

/// Audio icon identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Earcon {
    AlertModal,
    AlertNonmodal,
    Button,
    CheckOff,
    CheckOn,
    EditableText,
    InvalidKeypress,
    Link,
    Listbox,
    ListItem,
    LongDesc,
    ObjectClose,
    ObjectEnter,
    ObjectExit,
    ObjectOpen,
    ObjectSelect,
    PageFinishLoading,
    PageStartLoading,
    PopUpButton,
    RecoverFocus,
    Selection,
    SelectionReverse,
    Skip,
    Slider,
    TaskSuccess,
    Wrap,
    WrapEdge,
}

impl Earcon {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "ALERT_MODAL" => Self::AlertModal,
            "ALERT_NONMODAL" => Self::AlertNonmodal,
            "BUTTON" => Self::Button,
            "CHECK_OFF" => Self::CheckOff,
            "CHECK_ON" => Self::CheckOn,
            "EDITABLE_TEXT" => Self::EditableText,
            "INVALID_KEYPRESS" => Self::InvalidKeypress,
            "LINK" => Self::Link,
            "LISTBOX" => Self::Listbox,
            "LIST_ITEM" => Self::ListItem,
            "LONG_DESC" => Self::LongDesc,
            "OBJECT_CLOSE" => Self::ObjectClose,
            "OBJECT_ENTER" => Self::ObjectEnter,
            "OBJECT_EXIT" => Self::ObjectExit,
            "OBJECT_OPEN" => Self::ObjectOpen,
            "OBJECT_SELECT" => Self::ObjectSelect,
            "PAGE_FINISH_LOADING" => Self::PageFinishLoading,
            "PAGE_START_LOADING" => Self::PageStartLoading,
            "POP_UP_BUTTON" => Self::PopUpButton,
            "RECOVER_FOCUS" => Self::RecoverFocus,
            "SELECTION" => Self::Selection,
            "SELECTION_REVERSE" => Self::SelectionReverse,
            "SKIP" => Self::Skip,
            "SLIDER" => Self::Slider,
            "TASK_SUCCESS" => Self::TaskSuccess,
            "WRAP" => Self::Wrap,
            "WRAP_EDGE" => Self::WrapEdge,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlertModal => "ALERT_MODAL",
            Self::AlertNonmodal => "ALERT_NONMODAL",
            Self::Button => "BUTTON",
            Self::CheckOff => "CHECK_OFF",
            Self::CheckOn => "CHECK_ON",
            Self::EditableText => "EDITABLE_TEXT",
            Self::InvalidKeypress => "INVALID_KEYPRESS",
            Self::Link => "LINK",
            Self::Listbox => "LISTBOX",
            Self::ListItem => "LIST_ITEM",
            Self::LongDesc => "LONG_DESC",
            Self::ObjectClose => "OBJECT_CLOSE",
            Self::ObjectEnter => "OBJECT_ENTER",
            Self::ObjectExit => "OBJECT_EXIT",
            Self::ObjectOpen => "OBJECT_OPEN",
            Self::ObjectSelect => "OBJECT_SELECT",
            Self::PageFinishLoading => "PAGE_FINISH_LOADING",
            Self::PageStartLoading => "PAGE_START_LOADING",
            Self::PopUpButton => "POP_UP_BUTTON",
            Self::RecoverFocus => "RECOVER_FOCUS",
            Self::Selection => "SELECTION",
            Self::SelectionReverse => "SELECTION_REVERSE",
            Self::Skip => "SKIP",
            Self::Slider => "SLIDER",
            Self::TaskSuccess => "TASK_SUCCESS",
            Self::Wrap => "WRAP",
            Self::WrapEdge => "WRAP_EDGE",
        }
    }
}

impl fmt::Display for Earcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
