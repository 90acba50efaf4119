//! Output Sinks
//!
//! Interfaces to the speech engine, braille display, earcon player and focus
//! ring. The renderer only hands realised output over; queueing, playback
//! and hardware I/O belong to the implementations.

use std::collections::BTreeSet;

use fos_a11y::NodeBounds;
use smol::channel::{Receiver, Sender};

use crate::buffer::SelectionSpan;
use crate::earcon::Earcon;

/// How an utterance interacts with queued speech
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueMode {
    /// Drop pending speech and speak now
    Flush,
    /// Speak after pending speech
    Queue,
}

/// Speech properties applying to a whole render, set by `!flag` tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechProperties {
    flags: BTreeSet<String>,
}

impl SpeechProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, flag: &str) {
        self.flags.insert(flag.to_string());
    }

    pub fn is_set(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Set by `!doNotInterrupt`
    pub fn do_not_interrupt(&self) -> bool {
        self.is_set("doNotInterrupt")
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }
}

/// One speech request
#[derive(Debug, Clone)]
pub struct Utterance {
    pub text: String,
    pub queue_mode: QueueMode,
    pub properties: SpeechProperties,
    on_start: Option<Sender<()>>,
    on_end: Option<Sender<()>>,
}

impl Utterance {
    pub fn new(text: &str, queue_mode: QueueMode, properties: SpeechProperties) -> Self {
        Self { text: text.to_string(), queue_mode, properties, on_start: None, on_end: None }
    }

    /// Whether the caller waits for this utterance to start
    pub fn wants_start(&self) -> bool {
        self.on_start.is_some()
    }

    /// Whether the caller waits for this utterance to end
    pub fn wants_end(&self) -> bool {
        self.on_end.is_some()
    }

    /// Report that speech of this utterance started
    pub fn notify_start(&self) {
        if let Some(tx) = &self.on_start {
            let _ = tx.try_send(());
        }
    }

    /// Report that speech of this utterance finished
    pub fn notify_end(&self) {
        if let Some(tx) = &self.on_end {
            let _ = tx.try_send(());
        }
    }

    pub(crate) fn with_start(mut self, tx: Sender<()>) -> Self {
        self.on_start = Some(tx);
        self
    }

    pub(crate) fn with_end(mut self, tx: Sender<()>) -> Self {
        self.on_end = Some(tx);
        self
    }
}

/// Combined braille line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavBraille {
    pub text: String,
    /// Extent of the unit carrying the selection
    pub value_span: Option<(usize, usize)>,
    /// Selection in absolute offsets of `text`
    pub selection: Option<SelectionSpan>,
}

/// Text-to-speech engine
pub trait SpeechSink {
    fn speak(&mut self, utterance: Utterance);
}

/// Braille display
pub trait BrailleSink {
    fn write(&mut self, braille: NavBraille);
}

/// Earcon player
pub trait EarconSink {
    fn play(&mut self, earcon: Earcon);
}

/// On-screen focus highlight
pub trait FocusRingSink {
    fn set_rects(&mut self, rects: &[NodeBounds]);
}

/// Collaborators an [`Output`](crate::Output) executes against
pub trait OutputSinks {
    fn speech(&mut self) -> &mut dyn SpeechSink;
    fn braille(&mut self) -> &mut dyn BrailleSink;
    fn earcons(&mut self) -> &mut dyn EarconSink;
    fn focus_ring(&mut self) -> &mut dyn FocusRingSink;
}

/// Four separate collaborators bundled for [`OutputSinks`]
pub struct Sinks<'s> {
    pub speech: &'s mut dyn SpeechSink,
    pub braille: &'s mut dyn BrailleSink,
    pub earcons: &'s mut dyn EarconSink,
    pub focus_ring: &'s mut dyn FocusRingSink,
}

impl OutputSinks for Sinks<'_> {
    fn speech(&mut self) -> &mut dyn SpeechSink {
        &mut *self.speech
    }

    fn braille(&mut self) -> &mut dyn BrailleSink {
        &mut *self.braille
    }

    fn earcons(&mut self) -> &mut dyn EarconSink {
        &mut *self.earcons
    }

    fn focus_ring(&mut self) -> &mut dyn FocusRingSink {
        &mut *self.focus_ring
    }
}

/// Start/end notifications for the speech of one output
///
/// Resolves to `false` if the speech sink dropped the utterance without
/// notifying.
#[derive(Debug)]
pub struct SpeechCompletion {
    started: Receiver<()>,
    finished: Receiver<()>,
}

impl SpeechCompletion {
    pub(crate) fn channel() -> (Sender<()>, Sender<()>, Self) {
        let (start_tx, started) = smol::channel::bounded(1);
        let (end_tx, finished) = smol::channel::bounded(1);
        (start_tx, end_tx, Self { started, finished })
    }

    /// Wait for the first utterance to start
    pub async fn started(&self) -> bool {
        self.started.recv().await.is_ok()
    }

    /// Wait for the last utterance to finish
    pub async fn finished(&self) -> bool {
        self.finished.recv().await.is_ok()
    }

    /// Non-blocking check for the finish notification
    pub fn try_finished(&self) -> bool {
        self.finished.try_recv().is_ok()
    }
}

#[cfg(any(test, feature = "testing"))]
/// Sink recording everything it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub utterances: Vec<Utterance>,
    pub braille: Vec<NavBraille>,
    pub earcons: Vec<Earcon>,
    pub rects: Vec<NodeBounds>,
}

#[cfg(any(test, feature = "testing"))]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spoken texts in order
    pub fn spoken(&self) -> Vec<&str> {
        self.utterances.iter().map(|u| u.text.as_str()).collect()
    }
}

#[cfg(any(test, feature = "testing"))]
impl SpeechSink for RecordingSink {
    fn speak(&mut self, utterance: Utterance) {
        self.utterances.push(utterance);
    }
}

#[cfg(any(test, feature = "testing"))]
impl BrailleSink for RecordingSink {
    fn write(&mut self, braille: NavBraille) {
        self.braille.push(braille);
    }
}

#[cfg(any(test, feature = "testing"))]
impl EarconSink for RecordingSink {
    fn play(&mut self, earcon: Earcon) {
        self.earcons.push(earcon);
    }
}

#[cfg(any(test, feature = "testing"))]
impl FocusRingSink for RecordingSink {
    fn set_rects(&mut self, rects: &[NodeBounds]) {
        self.rects = rects.to_vec();
    }
}

#[cfg(any(test, feature = "testing"))]
impl OutputSinks for RecordingSink {
    fn speech(&mut self) -> &mut dyn SpeechSink {
        self
    }

    fn braille(&mut self) -> &mut dyn BrailleSink {
        self
    }

    fn earcons(&mut self) -> &mut dyn EarconSink {
        self
    }

    fn focus_ring(&mut self) -> &mut dyn FocusRingSink {
        self
    }
}
