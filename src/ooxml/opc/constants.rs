/// Constant values related to the Open Packaging Convention.
///
/// This module contains the well-known member names of a WordprocessingML
/// package and the ZIP signature used to recognise one.

/// Well-known ZIP member names inside an OOXML package.
///
/// Member names never carry the leading slash used by pack URIs.
pub mod part_name {
    /// The content types stream present in every OPC package
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    /// Package-level relationships
    pub const PACKAGE_RELS: &str = "_rels/.rels";
    /// Main body of a Word document
    pub const WORD_DOCUMENT: &str = "word/document.xml";
}

/// Local file header signature that starts every ZIP archive (`PK\x03\x04`).
pub const ZIP_SIGNATURE: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
