//! PDF writing module for generating PDF files.
//!
//! ## Architecture
//!
//! ```text
//! PdfDocument (object arena: catalog, page tree, fonts, pages, streams)
//!     ↓
//! [TextCursor] (BT/Tf/Td/Tj/ET into a page's ContentStream)
//!     ↓
//! [PdfWriter] (emission order, validation, offsets, xref, trailer)
//!     ↓
//! [ObjectSerializer] (dictionaries and indirect objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use pdf_weaver::writer::{PdfDocument, PdfWriter};
//!
//! let mut doc = PdfDocument::new();
//! doc.add_standard_font("Helvetica", "F1");
//! let page = doc.add_page();
//! {
//!     let mut cursor = doc.text_cursor(page)?;
//!     cursor.set_font("F1", 12.0);
//!     cursor.show_text("Hello, World!");
//! }
//! let bytes = PdfWriter::new().serialize(&doc)?.bytes;
//! ```

mod checksum;
mod content_stream;
mod document;
mod font_manager;
mod object_serializer;
mod pdf_writer;
mod text_cursor;
mod xref_table;

pub use checksum::{adler32, Adler32};
pub use content_stream::{
    escape_text, zlib_frame, ContentStream, ContentStreamOp, FinalizedStream, ZLIB_HEADER,
};
pub use document::{
    FontRef, IndirectObject, PageObject, PageRef, PdfDocument, PdfObjectKind,
    CATALOG_OBJECT_NUMBER, PAGE_TREE_OBJECT_NUMBER,
};
pub use font_manager::{unicode_to_winansi, FontResource, StandardFont, FONT_RESOURCE_TYPE};
pub use object_serializer::{ObjectSerializer, STREAM_TAIL};
pub use pdf_writer::{validate_object_numbers, PdfWriter, SerializedPdf, BINARY_MARKER};
pub use text_cursor::{Placement, TextCursor, TextState, DEFAULT_FONT_SIZE};
pub use xref_table::{XrefEntry, XrefTable, FREE_HEAD_GENERATION};
