//! Rendering configuration.

use crate::ooxml::docx::sanitize::{SanitizeStep, Sanitizer};
use serde::{Deserialize, Serialize};

/// How substituted values are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeMode {
    /// Escape `& < > " '` so values can't break the surrounding XML
    #[default]
    Xml,
    /// Insert values verbatim
    None,
}

/// Action syntax accepted in document bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSyntax {
    /// Go-style actions (`{{.Name}}`, `{{range .Items}}...{{end}}`) are
    /// rewritten into handlebars; handlebars actions are accepted as-is
    #[default]
    Go,
    /// Plain handlebars; `{{if}}`, `{{end}}` and `.Field` get no special meaning
    Handlebars,
}

/// Options controlling how a template is loaded and rendered.
///
/// Every field has a default, so partial configurations deserialize:
///
/// ```
/// use litchi_template::{EscapeMode, TemplateOptions};
///
/// let options = TemplateOptions::default()
///     .with_strict(false)
///     .with_escape(EscapeMode::None);
/// assert!(!options.strict);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOptions {
    /// Fail on references to fields missing from the data
    pub strict: bool,
    /// Escaping applied to substituted values
    pub escape: EscapeMode,
    /// Action syntax of the body
    pub syntax: TemplateSyntax,
    /// Repairs applied to the body when the document is loaded
    pub sanitize: Vec<SanitizeStep>,
    /// Handlebars dev mode (templates are not cached)
    pub dev_mode: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            strict: true,
            escape: EscapeMode::default(),
            syntax: TemplateSyntax::default(),
            sanitize: Sanitizer::default().steps().to_vec(),
            dev_mode: false,
        }
    }
}

impl TemplateOptions {
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.escape = escape;
        self
    }

    pub fn with_syntax(mut self, syntax: TemplateSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_sanitize(mut self, steps: Vec<SanitizeStep>) -> Self {
        self.sanitize = steps;
        self
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Sanitizer built from [`TemplateOptions::sanitize`].
    pub fn sanitizer(&self) -> Sanitizer {
        Sanitizer::new(self.sanitize.clone())
    }
}
