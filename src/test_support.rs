//! Fixture packages shared by unit tests.

use crate::ooxml::opc::constants::part_name;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// PNG signature plus the start of an IHDR chunk; stored uncompressed.
pub(crate) const IMAGE_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

const CONTENT_TYPES_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const STYLES_XML: &[u8] = br#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:styleId="Normal"/></w:styles>"#;

const CORE_XML: &[u8] = br#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"><dc:title xmlns:dc="http://purl.org/dc/elements/1.1/">Template &amp; Co</dc:title></cp:coreProperties>"#;

/// Build a ZIP archive with the given members, in order.
pub(crate) fn build_package(parts: &[(&str, &[u8], CompressionMethod)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content, method) in parts {
        writer
            .start_file(*name, SimpleFileOptions::default().compression_method(*method))
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A minimal Word package with `body` as `word/document.xml`.
pub(crate) fn sample_package(body: &str) -> Vec<u8> {
    build_package(&[
        (part_name::CONTENT_TYPES, CONTENT_TYPES_XML, CompressionMethod::Deflated),
        (part_name::PACKAGE_RELS, PACKAGE_RELS_XML, CompressionMethod::Deflated),
        (part_name::WORD_DOCUMENT, body.as_bytes(), CompressionMethod::Deflated),
        ("word/styles.xml", STYLES_XML, CompressionMethod::Deflated),
        ("word/media/image1.png", IMAGE_BYTES, CompressionMethod::Stored),
        ("docProps/core.xml", CORE_XML, CompressionMethod::Deflated),
    ])
}

/// A single stored member whose zip64 central-directory record declares an
/// uncompressed size of `u64::MAX`.
pub(crate) fn oversized_member_package(name: &str, content: &[u8]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(true);
    writer.start_file(name, options).unwrap();
    writer.write_all(content).unwrap();
    let mut data = writer.finish().unwrap().into_inner();

    let central = data
        .windows(4)
        .position(|w| w == [0x50, 0x4B, 0x01, 0x02])
        .unwrap();
    let name_len = u16::from_le_bytes([data[central + 28], data[central + 29]]) as usize;
    let extra = central + 46 + name_len;
    assert_eq!(&data[extra..extra + 2], &[0x01, 0x00], "expected a zip64 extra field");
    // Original size comes first in the zip64 record
    data[extra + 4..extra + 12].copy_from_slice(&u64::MAX.to_le_bytes());
    data
}

/// A member as stored in the archive, before decompression.
pub(crate) struct RawMember {
    pub name: String,
    pub compression: CompressionMethod,
    pub crc32: u32,
    pub raw: Vec<u8>,
}

pub(crate) fn raw_members(data: &[u8]) -> Vec<RawMember> {
    let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
    (0..archive.len())
        .map(|index| {
            let mut file = archive.by_index_raw(index).unwrap();
            let mut raw = Vec::new();
            file.read_to_end(&mut raw).unwrap();
            RawMember {
                name: file.name().to_string(),
                compression: file.compression(),
                crc32: file.crc32(),
                raw,
            }
        })
        .collect()
}

/// Decompressed content of member `name`.
pub(crate) fn read_member(data: &[u8], name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut content = Vec::new();
    file.read_to_end(&mut content).unwrap();
    content
}
