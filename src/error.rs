//! Error types for template rendering.
//!
//! Every stage of the pipeline (opening the package, extracting the body,
//! parsing and executing the template, rewriting the package) reports its own
//! variant so callers can tell exactly which step failed.
use thiserror::Error;

/// Main error type for template operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The package container could not be opened (bad signature, truncated
    /// central directory, unreadable file)
    #[error("Cannot open file: {0}")]
    CannotOpen(String),

    /// The body part is missing or could not be decoded
    #[error("Cannot read file: {0}")]
    CannotRead(String),

    /// The body part exists but is empty
    #[error("File has no content")]
    NoContent,

    /// No document format is registered for the given extension
    #[error("Unsupported document type: {0}")]
    UnsupportedType(String),

    /// Base64 input could not be decoded
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// The body text is not a valid template
    #[error("Template parse error: {0}")]
    Parse(String),

    /// The template failed while rendering against the supplied data
    #[error("Template execution error: {0}")]
    Execution(String),

    /// The output package could not be written
    #[error("Write error: {0}")]
    Write(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, Error>;
