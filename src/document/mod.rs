//! Format-independent document API.
//!
//! A [`Document`] is an archive-backed file whose body is exposed as template
//! text. Concrete formats implement the trait and are registered in the
//! extension table used by [`FileFormat::from_path`], so the template layer
//! never needs to know which format it is rendering.
//!
//! # Example
//!
//! ```no_run
//! use litchi_template::document::{Document, FileFormat};
//! use litchi_template::Sanitizer;
//! use std::path::Path;
//!
//! let path = Path::new("template.docx");
//! let mut document = FileFormat::from_path(path)?.new_document(Sanitizer::default());
//! document.read_file(path)?;
//! println!("{}", document.content());
//! document.close()?;
//! # Ok::<(), litchi_template::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::ooxml::docx::DocxDocument;
use crate::ooxml::docx::sanitize::Sanitizer;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use tracing::error;

/// Capabilities shared by every archive-backed document format.
///
/// Lifecycle: a document is created empty, populated by one load call
/// (`read_file`, `load_from_bytes` or `load_from_base64`), optionally updated,
/// written any number of times and finally released with [`Document::close`]
/// (or by dropping it).
pub trait Document: Send {
    /// Load the document from a file on disk.
    fn read_file(&mut self, path: &Path) -> Result<()>;

    /// Load the document from raw archive bytes.
    fn load_from_bytes(&mut self, data: Vec<u8>) -> Result<()>;

    /// Load the document from base64-encoded archive bytes.
    ///
    /// ASCII whitespace (line breaks from MIME-style wrapping) is ignored.
    fn load_from_base64(&mut self, encoded: &str) -> Result<()> {
        let compact: Vec<u8> = encoded
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        let data = STANDARD.decode(compact).map_err(|e| {
            error!(error = %e, "failed to decode base64 document");
            Error::InvalidEncoding(e.to_string())
        })?;
        self.load_from_bytes(data)
    }

    /// The (sanitized) body text.
    fn content(&self) -> &str;

    /// Replace the body text.
    fn update_content(&mut self, content: String);

    /// Write a copy of the package to `path` with the body replaced by `rendered`.
    fn write_to_file(&mut self, path: &Path, rendered: &str) -> Result<()>;

    /// Same as [`Document::write_to_file`], into memory.
    fn write_to_bytes(&mut self, rendered: &str) -> Result<Vec<u8>>;

    /// Release the underlying archive. Writes fail afterwards.
    fn close(&mut self) -> Result<()>;
}

/// Document formats that can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Microsoft Word Document (OOXML format, .docx)
    Docx,
}

/// Extension table used for path-based selection.
const FORMATS: &[(&str, FileFormat)] = &[("docx", FileFormat::Docx)];

impl FileFormat {
    /// Look up a format by file extension (without the dot, case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        FORMATS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(ext))
            .map(|(_, format)| *format)
    }

    /// Select a format from the extension of `path`. Nothing is read from disk.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedType`] for a missing or unknown extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        Self::from_extension(ext).ok_or_else(|| {
            error!(path = %path.display(), "unsupported document type");
            Error::UnsupportedType(if ext.is_empty() {
                path.display().to_string()
            } else {
                format!(".{}", ext)
            })
        })
    }

    /// Canonical extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Docx => "docx",
        }
    }

    /// Construct an empty document of this format.
    pub fn new_document(self, sanitizer: Sanitizer) -> Box<dyn Document> {
        match self {
            FileFormat::Docx => Box::new(DocxDocument::with_sanitizer(sanitizer)),
        }
    }
}
