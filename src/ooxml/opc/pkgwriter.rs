//! Package writer for rendered OPC packages.
//!
//! The writer rebuilds a package member by member from an open
//! [`PackageReader`]. Every member except the replaced one is copied in its
//! raw compressed form, so its bytes, CRC and compression method are carried
//! over untouched and the member order is kept.

use crate::error::{Error, Result};
use crate::ooxml::opc::phys_pkg::PackageReader;
use std::io::{Read, Seek, Write};
use tracing::{debug, error, warn};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Writer that serializes a package to any seekable sink.
///
/// Files, `Cursor<Vec<u8>>` buffers and `BufWriter`s all go through the same
/// code path.
///
/// # Example
///
/// ```no_run
/// use litchi_template::ooxml::opc::{PackageReader, PackageWriter};
/// use std::io::Cursor;
///
/// let mut reader = PackageReader::open("template.docx")?;
/// let sink = PackageWriter::rewrite(
///     &mut reader,
///     "word/document.xml",
///     b"<w:document/>",
///     Cursor::new(Vec::new()),
/// )?;
/// let bytes = sink.into_inner();
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
}

impl<W: Write + Seek> PackageWriter<W> {
    /// Create a new package writer over `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            zip_writer: ZipWriter::new(sink),
        }
    }

    /// Copy a source member without decompressing it.
    pub fn raw_copy<R: Read + Seek>(
        &mut self,
        source: &mut PackageReader<R>,
        index: usize,
    ) -> Result<()> {
        let file = source.archive.by_index_raw(index).map_err(|e| {
            error!(index, error = %e, "failed to reopen source member");
            Error::Write(format!("source member {}: {}", index, e))
        })?;
        let name = file.name().to_string();

        self.zip_writer.raw_copy_file(file).map_err(|e| {
            error!(part = %name, error = %e, "failed to copy member");
            Error::Write(format!("{}: {}", name, e))
        })
    }

    /// Write a member from uncompressed content.
    pub fn write_part(&mut self, name: &str, content: &[u8], options: SimpleFileOptions) -> Result<()> {
        self.zip_writer
            .start_file(name, options)
            .map_err(|e| Error::Write(format!("{}: {}", name, e)))?;
        self.zip_writer
            .write_all(content)
            .map_err(|e| Error::Write(format!("{}: {}", name, e)))
    }

    /// Finish the archive (writes the central directory) and hand back the sink.
    pub fn finish(self) -> Result<W> {
        self.zip_writer.finish().map_err(|e| {
            error!(error = %e, "failed to finalize package");
            Error::Write(e.to_string())
        })
    }

    /// Rebuild `source` into `sink`, replacing the content of `part_name`.
    ///
    /// The replaced member keeps its name, position, modification time and
    /// (where the writer supports it) its compression method.
    ///
    /// # Errors
    /// Returns [`Error::Write`] if a source member can't be reopened, the sink
    /// fails, or `part_name` doesn't exist in `source`.
    pub fn rewrite<R: Read + Seek>(
        source: &mut PackageReader<R>,
        part_name: &str,
        replacement: &[u8],
        sink: W,
    ) -> Result<W> {
        let mut writer = Self::new(sink);
        let mut replaced = false;

        for index in 0..source.len() {
            let options = {
                let file = source.archive.by_index_raw(index).map_err(|e| {
                    error!(index, error = %e, "failed to reopen source member");
                    Error::Write(format!("source member {}: {}", index, e))
                })?;
                if file.name() != part_name {
                    None
                } else {
                    let mut options = SimpleFileOptions::default()
                        .compression_method(writable_method(file.name(), file.compression()));
                    if let Some(modified) = file.last_modified() {
                        options = options.last_modified_time(modified);
                    }
                    if let Some(mode) = file.unix_mode() {
                        options = options.unix_permissions(mode);
                    }
                    Some(options)
                }
            };

            match options {
                Some(options) => {
                    writer.write_part(part_name, replacement, options)?;
                    replaced = true;
                },
                None => writer.raw_copy(source, index)?,
            }
        }

        if !replaced {
            error!(part = %part_name, "replacement target missing from source package");
            return Err(Error::Write(format!("part not found: {}", part_name)));
        }

        debug!(parts = source.len(), part = %part_name, "rewrote package");
        writer.finish()
    }
}

/// Compression method used for a rewritten member.
///
/// Stored and deflated members keep their method; anything the writer can't
/// produce falls back to deflate.
fn writable_method(name: &str, method: CompressionMethod) -> CompressionMethod {
    match method {
        CompressionMethod::Stored => CompressionMethod::Stored,
        CompressionMethod::Deflated => CompressionMethod::Deflated,
        other => {
            warn!(part = %name, method = ?other, "unsupported compression method, writing deflate");
            CompressionMethod::Deflated
        },
    }
}
