//! PDF content streams.
//!
//! A content stream buffers page-drawing operators in call order and, when
//! the document is written, produces its payload either verbatim or wrapped
//! in a hand-framed zlib container: the `78 DA` header, a raw DEFLATE body,
//! and the big-endian Adler-32 of the uncompressed bytes.

use super::checksum::adler32;
use super::font_manager::unicode_to_winansi;
use crate::object::{DictValue, PdfDictionary};
use bytes::{Bytes, BytesMut};
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::Write;

/// zlib CMF/FLG pair: deflate, 32K window, maximum compression.
pub const ZLIB_HEADER: [u8; 2] = [0x78, 0xDA];

/// Text operators emitted into a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font and size (Tf)
    SetFont(String, f32),
    /// Move to the start of the next line, offset from the current line start (Td)
    MoveText(f32, f32),
    /// Show text (Tj) - literal string
    ShowText(String),
    /// Raw operator (for extensibility)
    Raw(String),
}

impl ContentStreamOp {
    /// Write the operator without a trailing newline.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        match self {
            ContentStreamOp::BeginText => write!(w, "BT"),
            ContentStreamOp::EndText => write!(w, "ET"),
            ContentStreamOp::SetFont(name, size) => write!(w, "/{} {:.2} Tf", name, size),
            ContentStreamOp::MoveText(tx, ty) => write!(w, "{:.2} {:.2} Td", tx, ty),
            ContentStreamOp::ShowText(text) => {
                write!(w, "(")?;
                w.write_all(&escape_text(text))?;
                write!(w, ") Tj")
            },
            ContentStreamOp::Raw(raw) => write!(w, "{}", raw),
        }
    }
}

/// Escape text for a literal string operand.
///
/// Backslash and both parentheses are escaped, as are the whitespace
/// controls a reader would otherwise normalize (`\n`, `\r`, `\t`, `\b`,
/// `\f`). Characters are encoded for WinAnsiEncoding; anything it cannot
/// represent becomes `?`.
pub fn escape_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '\\' => out.extend_from_slice(b"\\\\"),
            '(' => out.extend_from_slice(b"\\("),
            ')' => out.extend_from_slice(b"\\)"),
            '\n' => out.extend_from_slice(b"\\n"),
            '\r' => out.extend_from_slice(b"\\r"),
            '\t' => out.extend_from_slice(b"\\t"),
            '\u{08}' => out.extend_from_slice(b"\\b"),
            '\u{0C}' => out.extend_from_slice(b"\\f"),
            c => out.push(unicode_to_winansi(c as u32).unwrap_or(b'?')),
        }
    }
    out
}

/// The bytes that go between `stream` and `endstream`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedStream {
    /// Payload as written to the file
    pub data: Bytes,
    /// Whether `data` is a zlib stream
    pub compressed: bool,
}

impl FinalizedStream {
    /// Stream dictionary: `Length` of the written payload, plus `Filter`
    /// when compressed.
    pub fn dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        dict.insert("Length", self.data.len() as i64);
        dict.insert_opt("Filter", self.compressed.then(|| DictValue::name("FlateDecode")));
        dict
    }
}

/// Append-only buffer of content stream bytes.
#[derive(Debug, Clone, Default)]
pub struct ContentStream {
    /// Chunks in append order
    chunks: Vec<Bytes>,
    /// Whether `finalize` should compress
    use_compression: bool,
}

impl ContentStream {
    /// Create an empty stream.
    pub fn new(use_compression: bool) -> Self {
        Self {
            chunks: Vec::new(),
            use_compression,
        }
    }

    /// Whether the stream will be compressed.
    pub fn use_compression(&self) -> bool {
        self.use_compression
    }

    /// Enable or disable compression.
    pub fn set_compression(&mut self, enabled: bool) {
        self.use_compression = enabled;
    }

    /// Append raw bytes. No interpretation is performed.
    pub fn append(&mut self, data: &[u8]) {
        if !data.is_empty() {
            self.chunks.push(Bytes::copy_from_slice(data));
        }
    }

    /// Append text followed by a newline.
    pub fn append_line(&mut self, line: &str) {
        let mut buf = BytesMut::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.extend_from_slice(b"\n");
        self.chunks.push(buf.freeze());
    }

    /// Append one operator on its own line.
    pub fn op(&mut self, op: &ContentStreamOp) {
        let mut line = Vec::with_capacity(32);
        // Writing into a Vec cannot fail.
        let _ = op.write_to(&mut line);
        line.push(b'\n');
        self.chunks.push(Bytes::from(line));
    }

    /// Total uncompressed length.
    pub fn raw_len(&self) -> usize {
        self.chunks.iter().map(Bytes::len).sum()
    }

    /// True if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Concatenation of all chunks.
    pub fn raw_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.raw_len());
        for chunk in &self.chunks {
            buf.extend_from_slice(chunk);
        }
        buf.freeze()
    }

    /// Produce the payload written to the file.
    ///
    /// If compression fails the stream is written uncompressed and the
    /// dictionary omits `Filter`.
    pub fn finalize(&self) -> FinalizedStream {
        let raw = self.raw_bytes();
        if !self.use_compression {
            return FinalizedStream {
                data: raw,
                compressed: false,
            };
        }

        match zlib_frame(&raw) {
            Ok(framed) => {
                log::trace!("Compressed content stream {} -> {} bytes", raw.len(), framed.len());
                FinalizedStream {
                    data: Bytes::from(framed),
                    compressed: true,
                }
            },
            Err(e) => {
                log::warn!("Content stream compression failed, writing uncompressed: {}", e);
                FinalizedStream {
                    data: raw,
                    compressed: false,
                }
            },
        }
    }
}

/// Wrap raw DEFLATE output in a zlib container.
pub fn zlib_frame(raw: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(raw.len() / 2 + 8);
    out.extend_from_slice(&ZLIB_HEADER);

    let mut encoder = DeflateEncoder::new(out, Compression::best());
    encoder.write_all(raw)?;
    let mut out = encoder.finish()?;

    out.extend_from_slice(&adler32(raw).to_be_bytes());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("A (test) \\ value"), b"A \\(test\\) \\\\ value".to_vec());
        assert_eq!(escape_text("line1\nline2"), b"line1\\nline2".to_vec());
    }

    #[test]
    fn test_escape_text_encoding() {
        assert_eq!(escape_text("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(escape_text("\u{2603}"), b"?".to_vec());
    }

    #[test]
    fn test_escape_text_winansi_punctuation() {
        assert_eq!(
            escape_text("\u{201C}Hi\u{201D} \u{2013} \u{20AC}5"),
            vec![0x93, b'H', b'i', 0x94, b' ', 0x96, b' ', 0x80, b'5']
        );
        assert_eq!(escape_text("\u{2018}ok\u{2019}\u{2026}"), vec![0x91, b'o', b'k', 0x92, 0x85]);
    }

    #[test]
    fn test_escape_text_control_characters() {
        assert_eq!(escape_text("a\rb"), b"a\\rb".to_vec());
        assert_eq!(escape_text("col1\tcol2"), b"col1\\tcol2".to_vec());
        assert_eq!(escape_text("\u{08}\u{0C}"), b"\\b\\f".to_vec());
        assert!(!escape_text("x\r\n\ty").iter().any(|b| matches!(b, b'\r' | b'\n' | b'\t')));
    }

    #[test]
    fn test_op_formatting() {
        let mut stream = ContentStream::new(false);
        stream.op(&ContentStreamOp::BeginText);
        stream.op(&ContentStreamOp::SetFont("F1".to_string(), 12.0));
        stream.op(&ContentStreamOp::MoveText(56.69, 785.89));
        stream.op(&ContentStreamOp::ShowText("Hi (there)".to_string()));
        stream.op(&ContentStreamOp::EndText);
        assert_eq!(
            stream.raw_bytes().as_ref(),
            b"BT\n/F1 12.00 Tf\n56.69 785.89 Td\n(Hi \\(there\\)) Tj\nET\n"
        );
    }

    #[test]
    fn test_uncompressed_is_concatenation() {
        let mut stream = ContentStream::new(false);
        stream.append(b"BT\n");
        stream.append(b"");
        stream.append_line("ET");
        let finalized = stream.finalize();
        assert!(!finalized.compressed);
        assert_eq!(finalized.data.as_ref(), b"BT\nET\n");

        let dict = finalized.dictionary();
        assert_eq!(dict.get("Length").and_then(DictValue::as_integer), Some(6));
        assert!(dict.get("Filter").is_none());
    }

    #[test]
    fn test_compressed_framing() {
        let mut stream = ContentStream::new(true);
        stream.append(b"BT\n/F1 12.00 Tf\n56.69 785.89 Td\n(Hello) Tj\nET\n");
        let raw = stream.raw_bytes();
        let finalized = stream.finalize();

        assert!(finalized.compressed);
        assert_eq!(&finalized.data[..2], &ZLIB_HEADER);
        let trailer = &finalized.data[finalized.data.len() - 4..];
        assert_eq!(trailer, &adler32(&raw).to_be_bytes());
        assert_eq!(inflate(&finalized.data), raw.to_vec());

        let dict = finalized.dictionary();
        assert_eq!(
            dict.get("Length").and_then(DictValue::as_integer),
            Some(finalized.data.len() as i64)
        );
        assert_eq!(dict.get("Filter").and_then(DictValue::as_name), Some("FlateDecode"));
    }

    #[test]
    fn test_empty_compressed_stream_inflates() {
        let stream = ContentStream::new(true);
        let finalized = stream.finalize();
        assert!(finalized.compressed);
        assert!(inflate(&finalized.data).is_empty());
        assert_eq!(&finalized.data[finalized.data.len() - 4..], &[0, 0, 0, 1]);
    }

    #[test]
    fn test_header_is_valid_zlib() {
        let cmf_flg = u16::from_be_bytes(ZLIB_HEADER);
        assert_eq!(cmf_flg % 31, 0);
        assert_eq!(ZLIB_HEADER[0] & 0x0F, 8);
    }

    #[test]
    fn test_large_stream_roundtrip() {
        let mut stream = ContentStream::new(true);
        for i in 0..2_000 {
            stream.append_line(&format!("({}) Tj", i));
        }
        let finalized = stream.finalize();
        assert!(finalized.data.len() < stream.raw_len());
        assert_eq!(inflate(&finalized.data), stream.raw_bytes().to_vec());
    }
}
