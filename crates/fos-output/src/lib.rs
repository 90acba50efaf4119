//! fOS Output
//!
//! Renders accessibility tree positions into speech, braille, earcons and
//! focus-ring rectangles.
//!
//! Features:
//! - Rule table of output templates per event type and role
//! - Template language with attribute, message and property tokens
//! - Ancestry diff announcing containers entered and left
//! - Annotated output buffers with once-per-buffer deduplication
//! - Speech and braille realisation with completion notification

pub mod buffer;
pub mod config;
pub mod earcon;
pub mod format;
pub mod messages;
pub mod output;
pub mod parse;
pub mod rules;
pub mod sink;

mod ancestry;
mod range;

pub use buffer::{AnnotatedUnit, Annotation, AppendOptions, OutputBuffer, SelectionSpan};
pub use config::OutputConfig;
pub use earcon::Earcon;
pub use format::{Template, Token};
pub use messages::{MessageCatalog, MessageTable};
pub use output::{FormatOptions, Output};
pub use parse::{ParseRef, ParseTree};
pub use rules::{EventBlock, EventType, Rule, RuleTable};
pub use sink::{
    BrailleSink, EarconSink, FocusRingSink, NavBraille, OutputSinks, QueueMode, Sinks, SpeechCompletion,
    SpeechProperties, SpeechSink, Utterance,
};
#[cfg(any(test, feature = "testing"))]
pub use sink::RecordingSink;

use fos_a11y::A11yError;

/// Output error
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Unbalanced parentheses in template token: {0}")]
    UnbalancedParens(String),

    #[error("Template nesting deeper than {0}")]
    DepthExceeded(usize),

    #[error("Invalid output rules: {0}")]
    InvalidRules(serde_json::Error),

    #[error("Invalid message table: {0}")]
    InvalidMessages(serde_json::Error),

    #[error(transparent)]
    Tree(#[from] A11yError),
}
