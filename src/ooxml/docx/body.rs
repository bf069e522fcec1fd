//! Extraction of the main document body (`word/document.xml`).

use crate::error::{Error, Result};
use crate::ooxml::docx::sanitize::Sanitizer;
use crate::ooxml::opc::PackageReader;
use std::io::{Read, Seek};
use tracing::{debug, error};

/// Read `part_name` from `package` as UTF-8 text, without sanitizing it.
///
/// # Errors
/// - [`Error::CannotRead`] if the part is missing, can't be decompressed or
///   isn't valid UTF-8
/// - [`Error::NoContent`] if the part exists but is empty
pub fn read_body<R: Read + Seek>(package: &mut PackageReader<R>, part_name: &str) -> Result<String> {
    let data = package.read_part(part_name).inspect_err(|e| {
        error!(part = %part_name, error = %e, "failed to read document body");
    })?;

    if data.is_empty() {
        error!(part = %part_name, "document body is empty");
        return Err(Error::NoContent);
    }

    let text = String::from_utf8(data).map_err(|e| {
        error!(part = %part_name, error = %e, "document body is not valid UTF-8");
        Error::CannotRead(format!("{}: {}", part_name, e))
    })?;

    debug!(part = %part_name, bytes = text.len(), "read document body");
    Ok(text)
}

/// Read `part_name` and run it through `sanitizer`.
pub fn extract_body<R: Read + Seek>(
    package: &mut PackageReader<R>,
    part_name: &str,
    sanitizer: &Sanitizer,
) -> Result<String> {
    read_body(package, part_name).map(|text| sanitizer.sanitize(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::part_name;
    use crate::test_support::{build_package, sample_package};
    use zip::CompressionMethod;

    #[test]
    fn test_extract_sanitizes_leading_entity() {
        let mut package =
            PackageReader::from_bytes(sample_package("&lt;w:document>a &amp; b</w:document>")).unwrap();

        let body = extract_body(&mut package, part_name::WORD_DOCUMENT, &Sanitizer::default()).unwrap();
        assert_eq!(body, "<w:document>a &amp; b</w:document>");
    }

    #[test]
    fn test_extract_is_idempotent() {
        let mut package = PackageReader::from_bytes(sample_package("&lt;w:document/>")).unwrap();
        let sanitizer = Sanitizer::default();

        let first = extract_body(&mut package, part_name::WORD_DOCUMENT, &sanitizer).unwrap();
        let second = extract_body(&mut package, part_name::WORD_DOCUMENT, &sanitizer).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_body_is_no_content() {
        let mut package = PackageReader::from_bytes(sample_package("")).unwrap();

        let err = read_body(&mut package, part_name::WORD_DOCUMENT).unwrap_err();
        assert!(matches!(err, Error::NoContent));
    }

    #[test]
    fn test_missing_body_is_cannot_read() {
        let data = build_package(&[(
            part_name::CONTENT_TYPES,
            b"<Types/>".as_slice(),
            CompressionMethod::Deflated,
        )]);
        let mut package = PackageReader::from_bytes(data).unwrap();

        let err = read_body(&mut package, part_name::WORD_DOCUMENT).unwrap_err();
        assert!(matches!(err, Error::CannotRead(_)));
    }

    #[test]
    fn test_invalid_utf8_is_cannot_read() {
        let data = build_package(&[(
            part_name::WORD_DOCUMENT,
            [0xFFu8, 0xFE, 0x00, 0x3C].as_slice(),
            CompressionMethod::Stored,
        )]);
        let mut package = PackageReader::from_bytes(data).unwrap();

        let err = read_body(&mut package, part_name::WORD_DOCUMENT).unwrap_err();
        assert!(matches!(err, Error::CannotRead(_)));
    }
}
