//! Office Open XML (OOXML) format implementation.
//!
//! The module is organized into two layers:
//!
//! 1. **OPC Layer** (`opc`): low-level package handling (ZIP reading and
//!    raw-copy rewriting)
//! 2. **Format-Specific Modules**:
//!    - `docx`: Word documents
pub mod docx;
pub mod opc;

// Re-export commonly used types from OPC layer
pub use opc::{PackageReader, PackageWriter};
