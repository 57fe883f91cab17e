// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Weaver
//!
//! Minimal single-pass PDF generator: text pages in the 14 standard fonts,
//! written as a classic PDF 1.x file with an uncompressed cross-reference
//! table and zlib-compressed content streams.
//!
//! ## Features
//!
//! - **Object table**: contiguous object numbering, catalog at 1 and page tree at 2
//! - **Text**: `BT`/`Tf`/`Td`/`Tj`/`ET` emission with automatic pagination
//! - **Fonts**: base-14 Type1 font resources, no embedding
//! - **Compression**: FlateDecode content streams with fail-open fallback
//! - **Output**: deterministic bytes, exact xref offsets, atomic file save
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdf_weaver::PdfDocument;
//!
//! # fn main() -> pdf_weaver::Result<()> {
//! let mut doc = PdfDocument::new();
//! doc.add_standard_font("Helvetica", "F1");
//! let page = doc.add_page();
//! {
//!     let mut cursor = doc.text_cursor(page)?;
//!     cursor.set_font("F1", 12.0);
//!     cursor.show_text("Hello, World!");
//! }
//! doc.save("hello.pdf")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Core object model
pub mod object;

// Configuration
pub mod config;

// PDF generation
pub mod writer;

// Re-exports
pub use config::{PageMetrics, PdfWriterConfig};
pub use error::{Error, Result, StructuralError};
pub use object::{DictValue, ObjectRef, PdfDictionary};
pub use writer::{
    FontRef, PageRef, PdfDocument, PdfWriter, Placement, SerializedPdf, StandardFont, TextCursor,
};
