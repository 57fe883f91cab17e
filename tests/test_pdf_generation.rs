//! End-to-end tests for document construction and serialization.
//!
//! Generated files are inspected at the byte level: header, object layout,
//! decompressed content streams, xref offsets and trailer.

use flate2::read::ZlibDecoder;
use pdf_weaver::writer::{PdfWriter, SerializedPdf};
use pdf_weaver::{PageMetrics, PdfDocument, PdfWriterConfig};
use std::io::Read;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Returns the raw payload of stream object `id`.
fn stream_payload(pdf: &[u8], id: u32) -> (String, Vec<u8>) {
    let start = find(pdf, format!("{} 0 obj\n", id).as_bytes()).expect("stream object present");
    let rest = &pdf[start..];
    let dict_end = find(rest, b"\nstream\n").expect("stream keyword");
    let header = String::from_utf8_lossy(&rest[..dict_end]).to_string();

    let length: usize = header
        .split("/Length ")
        .nth(1)
        .and_then(|s| s.split_whitespace().next())
        .and_then(|s| s.parse().ok())
        .expect("stream length");
    let data_start = dict_end + "\nstream\n".len();
    let data = rest[data_start..data_start + length].to_vec();
    assert_eq!(&rest[data_start + length..data_start + length + 10], b"\nendstream");
    (header, data)
}

fn inflate(data: &[u8]) -> String {
    let mut out = String::new();
    ZlibDecoder::new(data)
        .read_to_string(&mut out)
        .expect("valid zlib stream");
    out
}

fn hello_world() -> SerializedPdf {
    let mut doc = PdfDocument::new();
    doc.add_standard_font("Helvetica", "F1");
    let page = doc.add_page();
    {
        let mut cursor = doc.text_cursor(page).expect("page exists");
        cursor.set_font("F1", 12.0);
        cursor.show_text("Hello");
        cursor.end();
    }
    PdfWriter::new().serialize(&doc).expect("serializes")
}

#[test]
fn test_hello_world_document() {
    init_logging();
    let pdf = hello_world();
    let text = String::from_utf8_lossy(&pdf.bytes).to_string();

    assert!(pdf.bytes.starts_with(b"%PDF-1.6\n%\xD3\xEB\xE9\xE1\n"));
    assert!(text.contains("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>"));
    assert!(text.contains("<< /Type /Pages /Count 1 /Kids [4 0 R] >>"));
    assert!(text.contains(
        "3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
    ));
    assert!(text.contains("trailer\n<< /Size 6 /Root 1 0 R >>"));

    let (header, data) = stream_payload(&pdf.bytes, 5);
    assert!(header.contains("/Filter /FlateDecode"));
    assert_eq!(&data[..2], &[0x78, 0xDA]);
    assert_eq!(inflate(&data), "BT\n/F1 12.00 Tf\n56.69 785.89 Td\n(Hello) Tj\nET\n");
}

#[test]
fn test_xref_is_contiguous_and_exact() {
    let pdf = hello_world();
    let text = String::from_utf8_lossy(&pdf.bytes).to_string();
    assert!(text.contains("xref\n0 6\n0000000000 65535 f \n"));

    let entries = pdf.xref.entries();
    let numbers: Vec<u32> = entries.iter().map(|e| e.object_number).collect();
    assert_eq!(numbers, vec![0, 1, 2, 3, 4, 5]);

    for entry in entries.iter().skip(1) {
        let marker = format!("{} 0 obj", entry.object_number);
        let offset = entry.offset as usize;
        assert_eq!(&pdf.bytes[offset..offset + marker.len()], marker.as_bytes());
        let line = format!("{:010} 00000 n \n", entry.offset);
        assert!(text.contains(&line), "missing xref line {:?}", line);
    }

    let tail = format!("startxref\n{}\n%%EOF\n", pdf.startxref);
    assert!(pdf.bytes.ends_with(tail.as_bytes()));
}

#[test]
fn test_text_escaping() {
    let config = PdfWriterConfig::default().with_compress(false);
    let mut doc = PdfDocument::with_config(config).expect("valid config");
    doc.add_standard_font("Courier", "F1");
    let page = doc.add_page();
    {
        let mut cursor = doc.text_cursor(page).expect("page exists");
        cursor.set_font("F1", 10.0);
        cursor.show_text("A (test) \\ value");
    }
    let bytes = doc.to_bytes().expect("serializes");
    assert!(find(&bytes, b"(A \\(test\\) \\\\ value) Tj").is_some());
}

#[test]
fn test_pages_in_creation_order() {
    let mut doc = PdfDocument::new();
    doc.add_standard_font("Times-Roman", "F1");
    let pages: Vec<_> = (0..3).map(|_| doc.add_page()).collect();
    let kids = pages
        .iter()
        .map(|p| p.object_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let bytes = doc.to_bytes().expect("serializes");
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains(&format!("/Type /Pages /Count 3 /Kids [{}]", kids)));
    assert_eq!(kids, "4 0 R 6 0 R 8 0 R");
}

#[test]
fn test_long_text_paginates() {
    init_logging();
    let mut doc = PdfDocument::new();
    doc.add_standard_font("Helvetica", "F1");
    let first = doc.add_page();
    let mut last = first;
    {
        let mut cursor = doc.text_cursor(first).expect("page exists");
        cursor.set_font("F1", 12.0);
        for i in 0..100 {
            let placement = cursor.show_text(&format!("Line {}", i));
            assert!(!placement.overflow);
            last = placement.page;
        }
    }

    // (785.89 - 56.69) / 14.4 rounds up to 51 lines per page.
    assert_eq!(doc.page_count(), 2);
    assert_ne!(first, last);

    let pdf = PdfWriter::new().serialize(&doc).expect("serializes");
    let first_body = inflate(&stream_payload(&pdf.bytes, 5).1);
    let second_body = inflate(&stream_payload(&pdf.bytes, 7).1);
    assert!(first_body.starts_with("BT\n/F1 12.00 Tf\n56.69 785.89 Td\n(Line 0) Tj\n"));
    assert!(first_body.ends_with("(Line 50) Tj\nET\n"));
    assert!(second_body.starts_with("BT\n/F1 12.00 Tf\n56.69 785.89 Td\n(Line 51) Tj\n"));
    assert!(second_body.ends_with("(Line 99) Tj\nET\n"));
}

#[test]
fn test_font_added_after_pages_is_not_attached() {
    let mut doc = PdfDocument::new();
    doc.add_standard_font("Helvetica", "F1");
    let page = doc.add_page();
    doc.add_standard_font("Courier", "F2");

    let bytes = doc.to_bytes().expect("trailing font keeps numbering contiguous");
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Resources << /Font << /F1 3 0 R >> >>"));
    assert!(text.contains("6 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Courier"));
    assert_eq!(doc.page(page).expect("page").font_names().count(), 1);
}

#[test]
fn test_uncompressed_output() {
    let config = PdfWriterConfig::default().with_compress(false);
    let mut doc = PdfDocument::with_config(config).expect("valid config");
    let page = doc.add_page();
    {
        let mut cursor = doc.text_cursor(page).expect("page exists");
        cursor.show_text("plain");
    }
    let bytes = doc.to_bytes().expect("serializes");
    let (header, data) = stream_payload(&bytes, 4);
    assert!(!header.contains("Filter"));
    assert_eq!(String::from_utf8(data).expect("ascii"), "BT\n56.69 785.89 Td\n(plain) Tj\nET\n");
}

#[test]
fn test_letter_page_metrics() {
    let config = PdfWriterConfig::default().with_page(PageMetrics::letter());
    let mut doc = PdfDocument::with_config(config).expect("valid config");
    doc.add_page();
    let bytes = doc.to_bytes().expect("serializes");
    assert!(find(&bytes, b"/MediaBox [0 0 612.00 792.00]").is_some());
}

#[test]
fn test_config_json_round_trip() {
    let config = PdfWriterConfig::default()
        .with_version("1.4")
        .with_compress(false);
    let json = serde_json::to_string(&config).expect("serializes");
    let back: PdfWriterConfig = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(back, config);

    let partial: PdfWriterConfig =
        serde_json::from_str(r#"{"compress": false}"#).expect("defaults fill the rest");
    assert_eq!(partial.version, "1.6");
    assert!(!partial.compress);
    assert_eq!(partial.page, PageMetrics::a4());
}
