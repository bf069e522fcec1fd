//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! This module handles the low-level reading of OPC packages from ZIP archives.
//! The reader keeps the archive open for the lifetime of the document so that
//! every member can be copied again when the rendered package is written.

use crate::error::{Error, Result};
use crate::ooxml::opc::constants::ZIP_SIGNATURE;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, error};
use zip::ZipArchive;
use zip::result::ZipError;

/// Backing storage of an opened package.
///
/// Packages opened from a path keep the file handle open; packages created
/// from decoded bytes own their buffer.
pub enum PackageSource {
    File(BufReader<File>),
    Memory(Cursor<Vec<u8>>),
}

impl Read for PackageSource {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            PackageSource::File(reader) => reader.read(buf),
            PackageSource::Memory(cursor) => cursor.read(buf),
        }
    }
}

impl Seek for PackageSource {
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        match self {
            PackageSource::File(reader) => reader.seek(pos),
            PackageSource::Memory(cursor) => cursor.seek(pos),
        }
    }
}

/// Physical package reader that provides access to parts in a ZIP-based OPC package.
///
/// Member order is the order of the archive's central directory, which is
/// also the order used when the package is rewritten.
pub struct PackageReader<R: Read + Seek = PackageSource> {
    pub(crate) archive: ZipArchive<R>,
}

impl PackageReader<PackageSource> {
    /// Open an OPC package from a file path.
    ///
    /// # Errors
    /// Returns [`Error::CannotOpen`] if the file doesn't exist, can't be read,
    /// or isn't a valid ZIP archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to open package file");
            Error::CannotOpen(format!("{}: {}", path.display(), e))
        })?;

        let reader = Self::from_source(PackageSource::File(BufReader::new(file)))?;
        debug!(path = %path.display(), parts = reader.len(), "opened package");
        Ok(reader)
    }

    /// Create a package reader over an owned, already decoded byte buffer.
    ///
    /// Buffers that don't start with a local file header are rejected with
    /// [`Error::CannotOpen`] before the central directory is searched.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if !data.starts_with(ZIP_SIGNATURE) {
            error!(bytes = data.len(), "buffer is not a ZIP archive");
            return Err(Error::CannotOpen("missing ZIP local file header signature".to_string()));
        }
        Self::from_source(PackageSource::Memory(Cursor::new(data)))
    }
}

impl<R: Read + Seek> PackageReader<R> {
    /// Parse the ZIP central directory of `reader`.
    pub fn from_source(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader).map_err(|e| {
            error!(error = %e, "failed to parse package container");
            Error::CannotOpen(e.to_string())
        })?;
        Ok(Self { archive })
    }

    /// Number of members in the package, directories included.
    #[inline]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Member names in archive order.
    pub fn part_names(&self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|index| self.archive.name_for_index(index))
            .map(String::from)
            .collect()
    }

    /// Check if a specific member exists in the package.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read and decompress a member.
    ///
    /// Stored and deflated members are both handled transparently; the CRC is
    /// verified by the underlying reader.
    ///
    /// # Errors
    /// Returns [`Error::CannotRead`] if the member is missing, its data
    /// cannot be decompressed, or its length disagrees with the archive header.
    pub fn read_part(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(Error::CannotRead(format!("part not found: {}", name)));
            },
            Err(e) => return Err(Error::CannotRead(format!("{}: {}", name, e))),
        };

        // The declared size comes from the archive and is not trusted for allocation
        let declared = file.size();
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| Error::CannotRead(format!("{}: {}", name, e)))?;

        if data.len() as u64 != declared {
            error!(part = %name, declared, actual = data.len(), "part size does not match its header");
            return Err(Error::CannotRead(format!(
                "{}: declared size {} but read {} bytes",
                name,
                declared,
                data.len()
            )));
        }
        Ok(data)
    }
}
