//! Output Buffer
//!
//! Ordered, annotated units of rendered output. Buffers are append-only for
//! the duration of a render pass.

use crate::earcon::Earcon;

/// Selected character span inside a unit's text, always ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSpan {
    pub start: usize,
    pub end: usize,
}

impl SelectionSpan {
    pub fn new(a: usize, b: usize) -> Self {
        Self { start: a.min(b), end: a.max(b) }
    }
}

/// Annotation attached to a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Semantic tag such as `name`, `role` or `state`
    Tag(String),
    Selection(SelectionSpan),
    /// Earcon to play when the unit is output
    Earcon(Earcon),
}

impl Annotation {
    pub fn tag(name: &str) -> Self {
        Self::Tag(name.to_string())
    }
}

/// One piece of rendered output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedUnit {
    text: String,
    annotations: Vec<Annotation>,
}

impl AnnotatedUnit {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| matches!(a, Annotation::Tag(t) if t == name))
    }

    pub fn earcons(&self) -> impl Iterator<Item = Earcon> + '_ {
        self.annotations.iter().filter_map(|a| match a {
            Annotation::Earcon(e) => Some(*e),
            _ => None,
        })
    }

    pub fn selection(&self) -> Option<SelectionSpan> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Selection(s) => Some(*s),
            _ => None,
        })
    }
}

/// Options for a single append
#[derive(Debug, Clone, Default)]
pub struct AppendOptions {
    /// Drop the unit if an annotation it carries is already in the buffer
    pub unique: bool,
    pub annotations: Vec<Annotation>,
}

impl AppendOptions {
    pub fn new(unique: bool) -> Self {
        Self { unique, annotations: Vec::new() }
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Ordered output units for one channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    units: Vec<AnnotatedUnit>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value`, returning whether a unit was added
    ///
    /// Empty values without annotations are rejected, as are unique units
    /// whose annotations were already output.
    pub fn append(&mut self, value: &str, options: AppendOptions) -> bool {
        if value.is_empty() && options.annotations.is_empty() {
            return false;
        }

        if options.unique {
            let already_annotated = self
                .units
                .iter()
                .any(|unit| options.annotations.iter().any(|a| unit.annotations.contains(a)));
            if already_annotated {
                return false;
            }
        }

        self.units.push(AnnotatedUnit {
            text: value.to_string(),
            annotations: options.annotations,
        });
        true
    }

    /// Attach an annotation to the most recent unit; no-op on an empty buffer
    pub fn annotate_last(&mut self, annotation: Annotation) -> bool {
        match self.units.last_mut() {
            Some(unit) => {
                unit.annotations.push(annotation);
                true
            }
            None => false,
        }
    }

    /// Move all units of `other` to the end of this buffer
    pub fn extend(&mut self, other: OutputBuffer) {
        self.units.extend(other.units);
    }

    pub fn units(&self) -> &[AnnotatedUnit] {
        &self.units
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnnotatedUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit texts joined by `delimiter`, skipping empty units
    pub fn joined(&self, delimiter: &str) -> String {
        let mut out = String::new();
        for unit in self.units.iter().filter(|u| !u.text.is_empty()) {
            if !out.is_empty() {
                out.push_str(delimiter);
            }
            out.push_str(&unit.text);
        }
        out
    }

    /// Texts of all units
    pub fn texts(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.text.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a OutputBuffer {
    type Item = &'a AnnotatedUnit;
    type IntoIter = std::slice::Iter<'a, AnnotatedUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_rejected() {
        let mut buff = OutputBuffer::new();
        assert!(!buff.append("", AppendOptions::default()));
        assert_eq!(buff.len(), 0);

        // Annotated empty values are kept
        assert!(buff.append("", AppendOptions::default().annotate(Annotation::tag("value"))));
        assert_eq!(buff.len(), 1);
    }

    #[test]
    fn test_unique_dedup() {
        let mut buff = OutputBuffer::new();
        let opts = || AppendOptions::new(true).annotate(Annotation::tag("name"));
        assert!(buff.append("Enable", opts()));
        assert!(!buff.append("Enable", opts()));
        assert_eq!(buff.len(), 1);

        // Non-unique appends are never deduplicated
        assert!(buff.append("Enable", AppendOptions::default().annotate(Annotation::tag("name"))));
        assert_eq!(buff.len(), 2);
    }

    #[test]
    fn test_unique_against_existing_annotation() {
        let mut buff = OutputBuffer::new();
        buff.append("OK", AppendOptions::default().annotate(Annotation::tag("name")));
        assert!(!buff.append("Cancel", AppendOptions::new(true).annotate(Annotation::tag("name"))));
        assert!(buff.append("Button", AppendOptions::new(true).annotate(Annotation::tag("role"))));
        assert_eq!(buff.texts(), vec!["OK", "Button"]);
    }

    #[test]
    fn test_annotate_last() {
        let mut buff = OutputBuffer::new();
        assert!(!buff.annotate_last(Annotation::Earcon(Earcon::ObjectOpen)));
        buff.append("Settings", AppendOptions::default());
        assert!(buff.annotate_last(Annotation::Earcon(Earcon::ObjectOpen)));
        assert_eq!(buff.units()[0].earcons().collect::<Vec<_>>(), vec![Earcon::ObjectOpen]);
    }

    #[test]
    fn test_selection_span_ordered() {
        assert_eq!(SelectionSpan::new(5, 3), SelectionSpan { start: 3, end: 5 });
    }

    #[test]
    fn test_joined() {
        let mut buff = OutputBuffer::new();
        buff.append("a", AppendOptions::default());
        buff.append("", AppendOptions::default().annotate(Annotation::tag("value")));
        buff.append("b", AppendOptions::default());
        assert_eq!(buff.joined(" "), "a b");
    }
}
