/// Open Packaging Conventions (OPC) physical layer.
///
/// This module reads the ZIP container of an OOXML package and writes it back
/// out with one part replaced:
///
/// - [`PackageReader`]: ordered, random access to every member
/// - [`PackageWriter`]: raw-copy rewriting into any seekable sink
pub mod constants;
pub mod phys_pkg;
pub mod pkgwriter;

// Re-export commonly used types
pub use phys_pkg::{PackageReader, PackageSource};
pub use pkgwriter::PackageWriter;
