//! Litchi Template - render Word documents from templates
//!
//! This library treats the body of a `.docx` file as a handlebars template.
//! It substitutes caller data into the body and writes a new package in which
//! every other part (styles, media, relationships, metadata) is copied
//! byte for byte.
//!
//! # Features
//!
//! - **Path, byte and base64 input**: load templates from disk or from memory
//! - **Raw-copy rewriting**: untouched parts keep their compressed bytes and order
//! - **Body repair**: fixes authoring-tool artifacts before parsing
//! - **Custom functions**: register handlebars helpers for use in templates
//!
//! # Example - Rendering to a file
//!
//! ```no_run
//! use litchi_template::DocTemplate;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut template = DocTemplate::from_path("invoice.docx")?;
//! template.parse()?;
//! template.execute("invoice-42.docx", &json!({ "Customer": "Ada", "Total": "42.00" }))?;
//! template.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Rendering in memory
//!
//! ```no_run
//! use litchi_template::DocTemplate;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("invoice.docx")?;
//! let mut template = DocTemplate::from_bytes(data)?;
//! template.parse()?;
//! let bytes = template.execute_to_bytes(&json!({ "Customer": "Ada" }))?;
//! println!("Rendered {} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```

/// Format-independent document trait and format selection
pub mod document;

/// Error types
pub mod error;

/// OOXML (Office Open XML) package handling
///
/// This module provides the ZIP-level reader/rewriter and the Word (.docx)
/// document implementation.
pub mod ooxml;

/// Template engine adapter and orchestration
pub mod template;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use document::{Document, FileFormat};
pub use error::{Error, Result};
pub use ooxml::docx::{DocxDocument, SanitizeStep, Sanitizer};
pub use template::{DocTemplate, EscapeMode, TemplateEngine, TemplateOptions, TemplateSyntax};
