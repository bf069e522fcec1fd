//! Orchestration of document loading, template execution and output.

use crate::document::{Document, FileFormat};
use crate::error::Result;
use crate::template::engine::{Function, TemplateEngine};
use crate::template::options::TemplateOptions;
use handlebars::HelperDef;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// A document together with the template program built from its body.
///
/// # Examples
///
/// ```rust,no_run
/// use litchi_template::DocTemplate;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Letter {
///     name: String,
/// }
///
/// let mut template = DocTemplate::from_path("letter.docx")?;
/// template.parse()?;
/// template.execute("letter-ada.docx", &Letter { name: "Ada".into() })?;
/// # Ok::<(), litchi_template::Error>(())
/// ```
pub struct DocTemplate {
    engine: TemplateEngine,
    document: Box<dyn Document>,
}

impl DocTemplate {
    /// Load a template file, selecting the format from its extension.
    ///
    /// Unknown extensions fail with [`crate::Error::UnsupportedType`] before the
    /// file is opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path_with_options(path, &TemplateOptions::default())
    }

    pub fn from_path_with_options<P: AsRef<Path>>(path: P, options: &TemplateOptions) -> Result<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;

        let mut document = format.new_document(options.sanitizer());
        document.read_file(path)?;
        Ok(Self::with_document(document, options))
    }

    /// Load a .docx template from base64-encoded bytes.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        Self::from_base64_with_options(encoded, &TemplateOptions::default())
    }

    pub fn from_base64_with_options(encoded: &str, options: &TemplateOptions) -> Result<Self> {
        let mut document = FileFormat::Docx.new_document(options.sanitizer());
        document.load_from_base64(encoded)?;
        Ok(Self::with_document(document, options))
    }

    /// Load a .docx template from raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_options(data, &TemplateOptions::default())
    }

    pub fn from_bytes_with_options(data: Vec<u8>, options: &TemplateOptions) -> Result<Self> {
        let mut document = FileFormat::Docx.new_document(options.sanitizer());
        document.load_from_bytes(data)?;
        Ok(Self::with_document(document, options))
    }

    /// Wrap an already loaded document.
    pub fn with_document(document: Box<dyn Document>, options: &TemplateOptions) -> Self {
        Self {
            engine: TemplateEngine::with_options(options),
            document,
        }
    }

    #[inline]
    pub fn document(&self) -> &dyn Document {
        self.document.as_ref()
    }

    /// Mutable access to the document, e.g. to edit the body before parsing.
    ///
    /// Body changes only take effect after the next [`DocTemplate::parse`].
    #[inline]
    pub fn document_mut(&mut self) -> &mut dyn Document {
        self.document.as_mut()
    }

    #[inline]
    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    /// Register a single function for use in template expressions.
    pub fn register_function<H>(&mut self, name: &str, helper: H)
    where
        H: HelperDef + Send + Sync + 'static,
    {
        self.engine.register_function(name, helper);
    }

    /// Register a table of functions for use in template expressions.
    pub fn add_functions<I, S>(&mut self, functions: I)
    where
        I: IntoIterator<Item = (S, Function)>,
        S: AsRef<str>,
    {
        self.engine.add_functions(functions);
    }

    /// Parse the current document body as the template.
    ///
    /// A failed parse keeps the previously parsed template.
    pub fn parse(&mut self) -> Result<()> {
        self.engine.parse(self.document.content())
    }

    /// Render the body against `data` without writing anything.
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        self.engine.execute(data)
    }

    /// Render against `data` and write the resulting document to `export_path`.
    pub fn execute<P: AsRef<Path>, T: Serialize>(&mut self, export_path: P, data: &T) -> Result<()> {
        let export_path = export_path.as_ref();
        let rendered = self.render(data)?;
        self.document.write_to_file(export_path, &rendered)?;
        info!(path = %export_path.display(), "rendered document");
        Ok(())
    }

    /// Render against `data` and return the resulting document bytes.
    pub fn execute_to_bytes<T: Serialize>(&mut self, data: &T) -> Result<Vec<u8>> {
        let rendered = self.render(data)?;
        self.document.write_to_bytes(&rendered)
    }

    /// Release the underlying document.
    pub fn close(&mut self) -> Result<()> {
        self.document.close()
    }
}
