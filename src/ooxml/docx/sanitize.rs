//! Repairs applied to a Word body before it is handed to the template parser.
//!
//! Word-authored templates carry two known artifacts:
//!
//! - the first character of the body is sometimes stored as the entity `&lt;`
//!   instead of a literal `<`, which turns the XML declaration into text;
//! - a `{{ ... }}` action typed in one go is often split over several runs
//!   (spell checking, revision tracking, formatting changes), leaving run
//!   markup inside the action.
//!
//! Each repair is a [`SanitizeStep`] and a [`Sanitizer`] runs a list of them in
//! order, so either can be switched off without touching extraction or
//! templating.

use memchr::memmem;
use serde::{Deserialize, Serialize};

/// Entity the authoring tool writes in place of the leading `<`.
pub const LEADING_ENTITY: &str = "&lt;";

const ACTION_OPEN: &[u8] = b"{{";
const ACTION_CLOSE: &[u8] = b"}}";

/// A single named repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SanitizeStep {
    /// Turn a leading `&lt;` back into `<`
    LeadingEntity,
    /// Strip run markup found inside `{{ ... }}` actions
    MergeSplitActions,
}

impl SanitizeStep {
    /// Stable name, as used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            SanitizeStep::LeadingEntity => "leading_entity",
            SanitizeStep::MergeSplitActions => "merge_split_actions",
        }
    }

    /// Apply this step to `text`.
    pub fn apply(self, text: String) -> String {
        match self {
            SanitizeStep::LeadingEntity => fix_leading_entity(text),
            SanitizeStep::MergeSplitActions => merge_split_actions(&text),
        }
    }
}

/// Ordered list of repairs applied to an extracted body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitizer {
    steps: Vec<SanitizeStep>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(vec![SanitizeStep::LeadingEntity, SanitizeStep::MergeSplitActions])
    }
}

impl Sanitizer {
    pub fn new(steps: Vec<SanitizeStep>) -> Self {
        Self { steps }
    }

    /// A sanitizer that leaves text untouched.
    pub fn none() -> Self {
        Self { steps: Vec::new() }
    }

    #[inline]
    pub fn steps(&self) -> &[SanitizeStep] {
        &self.steps
    }

    /// Run every step in order.
    pub fn sanitize(&self, text: String) -> String {
        self.steps.iter().fold(text, |text, step| step.apply(text))
    }
}

/// Replace a leading `&lt;` with `<`.
///
/// Only the very start of the text is inspected; every other entity reference
/// is left as it is.
pub fn fix_leading_entity(mut text: String) -> String {
    if text.starts_with(LEADING_ENTITY) {
        text.replace_range(..LEADING_ENTITY.len(), "<");
    }
    text
}

/// Remove XML markup between each `{{` and the next `}}`.
///
/// Text outside actions is copied verbatim. An opening `{{` without a closing
/// `}}` after it stops the scan and the remainder is copied unchanged. An
/// action whose fragments would join into a new `{{` or `}}` is left as is.
pub fn merge_split_actions(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(open) = memmem::find(&bytes[pos..], ACTION_OPEN) {
        let inner_start = pos + open + ACTION_OPEN.len();
        let Some(close) = memmem::find(&bytes[inner_start..], ACTION_CLOSE) else {
            break;
        };
        let inner_end = inner_start + close;

        out.push_str(&text[pos..inner_start]);
        let action = &text[inner_start..inner_end];
        let stripped = strip_markup(action);
        // Joining fragments must not create new delimiters
        if stripped.contains("{{") || stripped.contains("}}") {
            out.push_str(action);
        } else {
            out.push_str(&stripped);
        }
        pos = inner_end;
    }

    out.push_str(&text[pos..]);
    out
}

fn strip_markup(action: &str) -> String {
    let mut out = String::with_capacity(action.len());
    let mut rest = action;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        match rest[start..].find('>') {
            Some(end) => rest = &rest[start + end + 1..],
            // Unterminated tag, keep it
            None => break,
        }
    }
    out.push_str(rest);
    out
}
