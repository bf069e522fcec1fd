/// Word (.docx) document support.
///
/// A `.docx` file is an OPC package whose main body lives in
/// `word/document.xml`. This module extracts that body as template text,
/// repairs known authoring artifacts, and writes rendered copies of the
/// package.
///
/// # Example
///
/// ```rust,no_run
/// use litchi_template::document::Document;
/// use litchi_template::ooxml::docx::DocxDocument;
///
/// let mut doc = DocxDocument::open("template.docx")?;
/// println!("{} parts", doc.part_names().len());
/// let body = doc.content().to_string();
/// let bytes = doc.write_to_bytes(&body)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod body;
pub mod document;
pub mod sanitize;

pub use body::{extract_body, read_body};
pub use document::DocxDocument;
pub use sanitize::{SanitizeStep, Sanitizer};
