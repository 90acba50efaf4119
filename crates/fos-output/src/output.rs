//! Output
//!
//! Collects speech and braille for one announcement and hands it to the
//! output sinks.
//!
//! ```ignore
//! let mut output = Output::new(&tree, &rules, &messages);
//! output.with_speech_and_braille(&range, Some(&prev), &EventType::Navigate)?;
//! let completion = output.go(&mut sinks);
//! ```

use fos_a11y::{AccessibilityTree, NodeBounds, Range};

use crate::buffer::{OutputBuffer, SelectionSpan};
use crate::config::OutputConfig;
use crate::format::{Renderer, Template};
use crate::messages::MessageCatalog;
use crate::rules::{EventType, RuleTable};
use crate::sink::{NavBraille, OutputSinks, QueueMode, SpeechCompletion, SpeechProperties, Utterance};
use crate::OutputError;

/// Channel a render pass produces output for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub speech: bool,
    pub braille: bool,
    /// Record the bounds of rendered nodes for the focus ring
    pub location: bool,
}

impl FormatOptions {
    pub const SPEECH: Self = Self { speech: true, braille: false, location: true };
    pub const BRAILLE: Self = Self { speech: false, braille: true, location: false };
}

/// Rendered output for one announcement
///
/// Every render either completes or leaves the buffers untouched.
pub struct Output<'a> {
    tree: &'a AccessibilityTree,
    rules: &'a RuleTable,
    catalog: &'a dyn MessageCatalog,
    config: OutputConfig,
    speech: OutputBuffer,
    braille: OutputBuffer,
    locations: Vec<NodeBounds>,
    properties: SpeechProperties,
}

impl<'a> Output<'a> {
    pub fn new(tree: &'a AccessibilityTree, rules: &'a RuleTable, catalog: &'a dyn MessageCatalog) -> Self {
        Self {
            tree,
            rules,
            catalog,
            config: OutputConfig::default(),
            speech: OutputBuffer::new(),
            braille: OutputBuffer::new(),
            locations: Vec::new(),
            properties: SpeechProperties::new(),
        }
    }

    pub fn with_config(mut self, config: OutputConfig) -> Self {
        self.config = config;
        self
    }

    /// Render `range` for speech
    pub fn with_speech(
        &mut self,
        range: &Range,
        prev: Option<&Range>,
        event: &EventType,
    ) -> Result<&mut Self, OutputError> {
        self.render(FormatOptions::SPEECH, |r, buff| r.render_range(range, prev, event, buff))?;
        Ok(self)
    }

    /// Render `range` for braille
    pub fn with_braille(
        &mut self,
        range: &Range,
        prev: Option<&Range>,
        event: &EventType,
    ) -> Result<&mut Self, OutputError> {
        self.render(FormatOptions::BRAILLE, |r, buff| r.render_range(range, prev, event, buff))?;
        Ok(self)
    }

    pub fn with_speech_and_braille(
        &mut self,
        range: &Range,
        prev: Option<&Range>,
        event: &EventType,
    ) -> Result<&mut Self, OutputError> {
        self.atomically(|this| {
            this.with_speech(range, prev, event)?;
            this.with_braille(range, prev, event)?;
            Ok(())
        })?;
        Ok(self)
    }

    /// Apply `template` to both channels without a node
    pub fn format(&mut self, template: &str) -> Result<&mut Self, OutputError> {
        self.atomically(|this| {
            this.render(FormatOptions::SPEECH, |r, buff| r.format(None, Template::Text(template), buff, &[]))?;
            this.render(FormatOptions::BRAILLE, |r, buff| r.format(None, Template::Text(template), buff, &[]))
        })?;
        Ok(self)
    }

    /// Run `job`, restoring both buffers if any of its renders fails
    fn atomically(&mut self, job: impl FnOnce(&mut Self) -> Result<(), OutputError>) -> Result<(), OutputError> {
        let speech = self.speech.clone();
        let braille = self.braille.clone();
        let properties = self.properties.clone();
        let saved_locations = self.locations.len();

        let result = job(self);
        if result.is_err() {
            self.speech = speech;
            self.braille = braille;
            self.properties = properties;
            self.locations.truncate(saved_locations);
        }
        result
    }

    fn render(
        &mut self,
        options: FormatOptions,
        job: impl FnOnce(&mut Renderer<'_>, &mut OutputBuffer) -> Result<(), OutputError>,
    ) -> Result<(), OutputError> {
        let mut buff = if options.braille { self.braille.clone() } else { self.speech.clone() };
        let mut properties = self.properties.clone();
        let saved_locations = self.locations.len();

        let mut renderer = Renderer::new(
            self.tree,
            self.rules,
            self.catalog,
            &self.config,
            options,
            &mut properties,
            &mut self.locations,
        );
        if let Err(err) = job(&mut renderer, &mut buff) {
            tracing::debug!("Render failed, discarding partial output: {}", err);
            self.locations.truncate(saved_locations);
            return Err(err);
        }

        if options.braille {
            self.braille = buff;
        } else {
            self.speech = buff;
        }
        self.properties = properties;
        Ok(())
    }

    pub fn speech_buffer(&self) -> &OutputBuffer {
        &self.speech
    }

    pub fn braille_buffer(&self) -> &OutputBuffer {
        &self.braille
    }

    pub fn locations(&self) -> &[NodeBounds] {
        &self.locations
    }

    pub fn properties(&self) -> &SpeechProperties {
        &self.properties
    }

    /// Speech units joined by spaces
    pub fn speech_text(&self) -> String {
        self.speech.joined(" ")
    }

    /// Combined braille line with the selection in absolute offsets
    pub fn nav_braille(&self) -> NavBraille {
        let delimiter = self.config.braille_delimiter.as_str();
        let mut braille = NavBraille::default();
        let mut len = 0;
        for unit in &self.braille {
            let text = unit.text();
            if !text.is_empty() && !braille.text.is_empty() {
                braille.text.push_str(delimiter);
                len += delimiter.chars().count();
            }
            let start = len;
            braille.text.push_str(text);
            len += text.chars().count();

            if braille.selection.is_none() {
                if let Some(sel) = unit.selection() {
                    braille.value_span = Some((start, len));
                    braille.selection = Some(SelectionSpan::new(start + sel.start, start + sel.end));
                }
            }
        }
        braille
    }

    /// Send the rendered output to `sinks`
    ///
    /// The first spoken unit flushes pending speech, the rest are queued.
    /// Earcons attached to speech units are played as their unit is reached.
    pub fn go(self, sinks: &mut dyn OutputSinks) -> SpeechCompletion {
        let (start_tx, end_tx, completion) = SpeechCompletion::channel();

        let spoken: Vec<usize> = self
            .speech
            .iter()
            .enumerate()
            .filter(|(_, unit)| !unit.text().is_empty())
            .map(|(i, _)| i)
            .collect();
        let first = spoken.first().copied();
        let last = spoken.last().copied();

        let mut queue_mode = QueueMode::Flush;
        for (i, unit) in self.speech.iter().enumerate() {
            if !unit.text().is_empty() {
                let mut utterance = Utterance::new(unit.text(), queue_mode, self.properties.clone());
                if Some(i) == first {
                    utterance = utterance.with_start(start_tx.clone());
                }
                if Some(i) == last {
                    utterance = utterance.with_end(end_tx.clone());
                }
                sinks.speech().speak(utterance);
                queue_mode = QueueMode::Queue;
            }
            for earcon in unit.earcons() {
                sinks.earcons().play(earcon);
            }
        }

        if !self.braille.is_empty() {
            sinks.braille().write(self.nav_braille());
        }

        sinks.focus_ring().set_rects(&self.locations);

        tracing::debug!(
            "Output: {} utterances, {} braille units, {} locations",
            spoken.len(),
            self.braille.len(),
            self.locations.len()
        );
        completion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{AppendOptions, Annotation};
    use crate::messages::MessageTable;
    use crate::sink::RecordingSink;
    use fos_a11y::{AccessibilityNode, Role};

    fn button_tree() -> (AccessibilityTree, fos_a11y::NodeId) {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root(Role::Window);
        let button = tree
            .insert(root, AccessibilityNode::new(Role::Button).with_attr("name", "OK"))
            .unwrap();
        (tree, button)
    }

    #[test]
    fn test_format_without_node() {
        let (tree, _) = button_tree();
        let rules = RuleTable::default();
        let messages = MessageTable::english();

        let mut output = Output::new(&tree, &rules, &messages);
        output.format("@chrome_menu_closed $earcon(OBJECT_CLOSE)").unwrap();

        assert_eq!(output.speech_buffer().texts(), vec!["Menu closed"]);
        assert_eq!(output.braille_buffer().texts(), vec!["Menu closed"]);
        assert!(output.locations().is_empty());
    }

    #[test]
    fn test_failed_render_leaves_buffers() {
        let (tree, button) = button_tree();
        let rules = RuleTable::default();
        let messages = MessageTable::english();

        let mut output = Output::new(&tree, &rules, &messages);
        output.with_speech(&Range::from_node(button), None, &EventType::Navigate).unwrap();
        let before = output.speech_buffer().clone();
        let locations = output.locations().len();

        assert!(output.format("$name @describe_index($a").is_err());
        assert_eq!(output.speech_buffer(), &before);
        assert_eq!(output.locations().len(), locations);
    }

    #[test]
    fn test_late_failure_rolls_back_both_channels() {
        let (tree, button) = button_tree();
        let rules = RuleTable::default();
        let messages = MessageTable::english();
        let range = Range::from_node(button);

        let mut output = Output::new(&tree, &rules, &messages);
        let result = output.atomically(|this| {
            this.with_speech_and_braille(&range, None, &EventType::Navigate)?;
            this.format("!doNotInterrupt $if($a")?;
            Ok(())
        });

        assert!(matches!(result, Err(OutputError::UnbalancedParens(_))));
        assert!(output.speech_buffer().is_empty());
        assert!(output.braille_buffer().is_empty());
        assert!(output.locations().is_empty());
        assert_eq!(output.properties(), &SpeechProperties::new());
    }

    #[test]
    fn test_queue_modes_and_empty_units() {
        let (tree, button) = button_tree();
        let rules = RuleTable::default();
        let messages = MessageTable::english();

        let mut output = Output::new(&tree, &rules, &messages);
        output.with_speech(&Range::from_node(button), None, &EventType::Navigate).unwrap();
        output.speech.append("", AppendOptions::default().annotate(Annotation::tag("value")));

        let mut sink = RecordingSink::new();
        output.go(&mut sink);

        let modes: Vec<QueueMode> = sink.utterances.iter().map(|u| u.queue_mode).collect();
        assert_eq!(sink.spoken(), vec!["OK", "Button"]);
        assert_eq!(modes, vec![QueueMode::Flush, QueueMode::Queue]);
        assert!(sink.utterances[0].wants_start());
        assert!(!sink.utterances[0].wants_end());
        assert!(sink.utterances[1].wants_end());
        assert_eq!(sink.earcons, vec![crate::Earcon::Button]);
        // Nothing rendered for braille
        assert!(sink.braille.is_empty());
    }

    #[test]
    fn test_nav_braille_delimits_non_empty_units() {
        let (tree, _) = button_tree();
        let rules = RuleTable::default();
        let messages = MessageTable::english();

        let mut output = Output::new(&tree, &rules, &messages);
        output.braille.append("ed", AppendOptions::default());
        output.braille.append("", AppendOptions::default().annotate(Annotation::tag("state")));
        output.braille.append(
            "hello",
            AppendOptions::default().annotate(Annotation::Selection(SelectionSpan::new(1, 3))),
        );

        let braille = output.nav_braille();
        assert_eq!(braille.text, "ed hello");
        assert_eq!(braille.value_span, Some((3, 8)));
        assert_eq!(braille.selection, Some(SelectionSpan::new(4, 6)));
    }
}
