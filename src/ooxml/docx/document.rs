//! Archive-backed Word document.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::ooxml::docx::body::extract_body;
use crate::ooxml::docx::sanitize::Sanitizer;
use crate::ooxml::opc::constants::part_name;
use crate::ooxml::opc::{PackageReader, PackageWriter};
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

/// A Word (.docx) document whose `word/document.xml` body is used as template text.
///
/// The package stays open until [`Document::close`] is called or the document
/// is dropped, so every other part can be copied into rendered output.
///
/// # Examples
///
/// ```rust,no_run
/// use litchi_template::document::Document;
/// use litchi_template::ooxml::docx::DocxDocument;
///
/// let mut doc = DocxDocument::open("template.docx")?;
/// let body = doc.content().replace("DRAFT", "FINAL");
/// doc.write_to_file("final.docx".as_ref(), &body)?;
/// doc.close()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Default)]
pub struct DocxDocument {
    package: Option<PackageReader>,
    content: String,
    sanitizer: Sanitizer,
}

impl DocxDocument {
    /// Create an empty document that uses the default sanitizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with a custom sanitizer.
    pub fn with_sanitizer(sanitizer: Sanitizer) -> Self {
        Self {
            package: None,
            content: String::new(),
            sanitizer,
        }
    }

    /// Open a .docx file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut doc = Self::new();
        doc.read_file(path.as_ref())?;
        Ok(doc)
    }

    /// Load a .docx package from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut doc = Self::new();
        doc.load_from_bytes(data)?;
        Ok(doc)
    }

    /// Whether a package is currently loaded.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.package.is_some()
    }

    /// Member names of the loaded package, in archive order.
    pub fn part_names(&self) -> Vec<String> {
        self.package
            .as_ref()
            .map(PackageReader::part_names)
            .unwrap_or_default()
    }

    /// Replace the current package; the body is extracted before anything is
    /// swapped, so a failed load leaves the document as it was.
    fn load(&mut self, mut package: PackageReader) -> Result<()> {
        let content = extract_body(&mut package, part_name::WORD_DOCUMENT, &self.sanitizer)?;
        self.package = Some(package);
        self.content = content;
        Ok(())
    }

    fn package_mut(&mut self) -> Result<&mut PackageReader> {
        self.package.as_mut().ok_or_else(|| {
            error!("write requested on a document that is not loaded");
            Error::Write("document is not loaded or has been closed".to_string())
        })
    }

    fn write<W: Write + Seek>(&mut self, rendered: &str, sink: W) -> Result<W> {
        let package = self.package_mut()?;
        PackageWriter::rewrite(package, part_name::WORD_DOCUMENT, rendered.as_bytes(), sink)
    }
}

impl Document for DocxDocument {
    fn read_file(&mut self, path: &Path) -> Result<()> {
        let package = PackageReader::open(path)?;
        self.load(package)?;
        info!(path = %path.display(), "read file");
        Ok(())
    }

    fn load_from_bytes(&mut self, data: Vec<u8>) -> Result<()> {
        let package = PackageReader::from_bytes(data)?;
        self.load(package)?;
        debug!(bytes = self.content.len(), "loaded document from memory");
        Ok(())
    }

    #[inline]
    fn content(&self) -> &str {
        &self.content
    }

    #[inline]
    fn update_content(&mut self, content: String) {
        self.content = content;
    }

    fn write_to_file(&mut self, path: &Path, rendered: &str) -> Result<()> {
        // Fail before touching the filesystem when nothing is loaded
        self.package_mut()?;

        // The package may be reading from `path` itself, so output goes to a
        // sibling temporary file that only replaces `path` once it is complete.
        let mut staged = staging_file(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to create output file");
            Error::Write(format!("{}: {}", path.display(), e))
        })?;

        let result = self.write(rendered, BufWriter::new(&mut staged)).and_then(|mut sink| {
            sink.flush()
                .map_err(|e| Error::Write(format!("{}: {}", path.display(), e)))
        });

        if let Err(e) = result {
            warn!(path = %staged.path().display(), "removing incomplete output file");
            if let Err(cleanup) = staged.close() {
                warn!(error = %cleanup, "failed to remove incomplete output file");
            }
            return Err(e);
        }

        staged.persist(path).map_err(|e| {
            error!(path = %path.display(), error = %e.error, "failed to move output into place");
            Error::Write(format!("{}: {}", path.display(), e.error))
        })?;

        info!(path = %path.display(), "wrote file");
        Ok(())
    }

    fn write_to_bytes(&mut self, rendered: &str) -> Result<Vec<u8>> {
        let sink = self.write(rendered, Cursor::new(Vec::new()))?;
        Ok(sink.into_inner())
    }

    fn close(&mut self) -> Result<()> {
        if self.package.take().is_some() {
            debug!("closed document package");
        }
        Ok(())
    }
}

/// Temporary file next to `path`, created with the permissions a plain
/// `File::create` would use.
fn staging_file(path: &Path) -> std::io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".litchi-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{raw_members, read_member, sample_package};

    const BODY: &str = "<w:document><w:t>Hello</w:t></w:document>";

    #[test]
    fn test_load_and_content() {
        let mut doc = DocxDocument::from_bytes(sample_package(BODY)).unwrap();
        assert!(doc.is_open());
        assert_eq!(doc.content(), BODY);
        assert_eq!(doc.part_names().len(), 6);

        doc.update_content("<w:document/>".to_string());
        assert_eq!(doc.content(), "<w:document/>");
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let mut doc = DocxDocument::from_bytes(sample_package(BODY)).unwrap();

        let err = doc.load_from_bytes(sample_package("")).unwrap_err();
        assert!(matches!(err, Error::NoContent));
        assert_eq!(doc.content(), BODY);
        assert!(doc.is_open());
    }

    #[test]
    fn test_write_to_bytes_replaces_body() {
        let original = sample_package(BODY);
        let mut doc = DocxDocument::from_bytes(original.clone()).unwrap();

        let output = doc.write_to_bytes("<w:document>rendered</w:document>").unwrap();
        assert_eq!(
            read_member(&output, part_name::WORD_DOCUMENT),
            b"<w:document>rendered</w:document>"
        );
        assert_eq!(raw_members(&output).len(), raw_members(&original).len());

        // The source package stays usable for further writes
        let again = doc.write_to_bytes(BODY).unwrap();
        assert_eq!(read_member(&again, part_name::WORD_DOCUMENT), BODY.as_bytes());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("template.docx");
        let target = dir.path().join("out.docx");
        std::fs::write(&source, sample_package(BODY)).unwrap();

        let mut doc = DocxDocument::open(&source).unwrap();
        doc.write_to_file(&target, "<w:document>done</w:document>").unwrap();
        doc.close().unwrap();

        let written = std::fs::read(&target).unwrap();
        assert_eq!(
            read_member(&written, part_name::WORD_DOCUMENT),
            b"<w:document>done</w:document>"
        );
    }

    #[test]
    fn test_write_over_source_path_keeps_package_usable() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("template.docx");
        let original = sample_package(BODY);
        std::fs::write(&source, &original).unwrap();

        let mut doc = DocxDocument::open(&source).unwrap();
        doc.write_to_file(&source, "<w:document>first</w:document>").unwrap();

        let written = std::fs::read(&source).unwrap();
        assert_eq!(
            read_member(&written, part_name::WORD_DOCUMENT),
            b"<w:document>first</w:document>"
        );
        assert_eq!(raw_members(&written).len(), raw_members(&original).len());

        // The open handle still reads the package it was loaded from
        let again = doc.write_to_bytes("<w:document>second</w:document>").unwrap();
        assert_eq!(
            read_member(&again, part_name::WORD_DOCUMENT),
            b"<w:document>second</w:document>"
        );
        doc.close().unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.docx");
        std::fs::write(&target, b"previous").unwrap();

        // A package without a body can't be rewritten
        let data = crate::test_support::build_package(&[(
            part_name::CONTENT_TYPES,
            b"<Types/>".as_slice(),
            zip::CompressionMethod::Deflated,
        )]);
        let mut doc = DocxDocument {
            package: Some(PackageReader::from_bytes(data).unwrap()),
            ..DocxDocument::default()
        };

        let err = doc.write_to_file(&target, BODY).unwrap_err();
        assert!(matches!(err, Error::Write(_)));
        assert_eq!(std::fs::read(&target).unwrap(), b"previous");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_after_close_fails_without_creating_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.docx");

        let mut doc = DocxDocument::from_bytes(sample_package(BODY)).unwrap();
        doc.close().unwrap();
        doc.close().unwrap();
        assert!(!doc.is_open());

        assert!(matches!(doc.write_to_bytes(BODY), Err(Error::Write(_))));
        assert!(matches!(doc.write_to_file(&target, BODY), Err(Error::Write(_))));
        assert!(!target.exists());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.docx");

        let mut doc = DocxDocument::from_bytes(sample_package(BODY)).unwrap();
        let err = doc.write_to_file(&target, BODY).unwrap_err();
        assert!(matches!(err, Error::Write(_)));
    }

    #[test]
    fn test_custom_sanitizer() {
        let mut doc = DocxDocument::with_sanitizer(Sanitizer::none());
        doc.load_from_bytes(sample_package("&lt;w:document/>")).unwrap();
        assert_eq!(doc.content(), "&lt;w:document/>");
    }
}
