//! Template rendering for archive-backed documents.
//!
//! - [`TemplateEngine`]: handlebars adapter (functions, parse, execute)
//! - [`DocTemplate`]: loads a document, parses its body and writes rendered output
//! - [`TemplateOptions`]: strictness, escaping, syntax and sanitizing configuration
//! - [`go_syntax`]: rewriting of Go-style actions into handlebars
pub mod doc_template;
pub mod engine;
pub mod go_syntax;
pub mod options;

pub use doc_template::DocTemplate;
pub use engine::{Function, TemplateEngine, escape_xml};
pub use options::{EscapeMode, TemplateOptions, TemplateSyntax};
