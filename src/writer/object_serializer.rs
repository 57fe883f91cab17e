//! PDF object serialization.
//!
//! Serializes dictionaries and indirect objects to their byte
//! representation according to PDF specification ISO 32000-1:2008.
//!
//! Dictionaries are written on a single line as `<< /Key value ... >>`.

use crate::error::{Error, Result};
use crate::object::{DictValue, ObjectRef, PdfDictionary};
use std::io::Write;

/// Bytes that close a stream object after its payload.
pub const STREAM_TAIL: &[u8] = b"\nendstream\nendobj\n";

/// Serializer for PDF dictionaries and indirect objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Create a new object serializer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize a dictionary to bytes.
    pub fn serialize_dict(&self, dict: &PdfDictionary) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_dictionary(&mut buf, dict)?;
        Ok(buf)
    }

    /// Serialize a dictionary to a string (for debugging).
    pub fn serialize_to_string(&self, dict: &PdfDictionary) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.serialize_dict(dict)?).to_string())
    }

    /// Serialize a single value as it would appear after `key`.
    pub fn serialize_value(&self, key: &str, value: &DictValue) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_value(&mut buf, key, value)?;
        Ok(buf)
    }

    /// Serialize an indirect object definition.
    ///
    /// Format: `{id} {gen} obj\n{dict}\nendobj\n`
    pub fn serialize_indirect(&self, id: u32, gen: u16, dict: &PdfDictionary) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        writeln!(buf, "{} {} obj", id, gen)?;
        self.write_dictionary(&mut buf, dict)?;
        buf.extend_from_slice(b"\nendobj\n");
        Ok(buf)
    }

    /// Serialize the text that precedes a stream payload.
    ///
    /// Format: `{id} {gen} obj\n{dict}\nstream\n`. The payload follows
    /// verbatim, then [`STREAM_TAIL`].
    pub fn serialize_stream_head(&self, id: u32, gen: u16, dict: &PdfDictionary) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        writeln!(buf, "{} {} obj", id, gen)?;
        self.write_dictionary(&mut buf, dict)?;
        buf.extend_from_slice(b"\nstream\n");
        Ok(buf)
    }

    /// Write a PDF dictionary.
    pub fn write_dictionary<W: Write>(&self, w: &mut W, dict: &PdfDictionary) -> Result<()> {
        write!(w, "<<")?;
        for (key, value) in dict.iter() {
            write!(w, " ")?;
            self.write_name(w, key, key)?;
            write!(w, " ")?;
            self.write_value(w, key, value)?;
        }
        write!(w, " >>")?;
        Ok(())
    }

    /// Write a value. `key` is only used for error reporting.
    fn write_value<W: Write>(&self, w: &mut W, key: &str, value: &DictValue) -> Result<()> {
        match value {
            DictValue::Ref(r) => self.write_reference(w, r)?,
            DictValue::Integer(i) => write!(w, "{}", i)?,
            DictValue::IntArray(items) => {
                write!(w, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(w, " ")?;
                    }
                    write!(w, "{}", item)?;
                }
                write!(w, "]")?;
            },
            DictValue::FloatArray(items) => {
                if let Some(bad) = items.iter().find(|v| !v.is_finite()) {
                    return Err(Error::unsupported(key, format!("non-finite number {}", bad)));
                }
                write!(w, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(w, " ")?;
                    }
                    write!(w, "{:.2}", item)?;
                }
                write!(w, "]")?;
            },
            DictValue::RefArray(refs) => {
                write!(w, "[")?;
                for (i, r) in refs.iter().enumerate() {
                    if i > 0 {
                        write!(w, " ")?;
                    }
                    self.write_reference(w, r)?;
                }
                write!(w, "]")?;
            },
            DictValue::Name(name) => self.write_name(w, key, name)?,
            DictValue::RawArray(raw) => {
                let trimmed = raw.trim();
                if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
                    return Err(Error::unsupported(
                        key,
                        format!("raw array literal '{}' is not bracketed", raw),
                    ));
                }
                w.write_all(raw.as_bytes())?;
            },
            DictValue::Dict(dict) => self.write_dictionary(w, dict)?,
        }
        Ok(())
    }

    fn write_reference<W: Write>(&self, w: &mut W, r: &ObjectRef) -> Result<()> {
        write!(w, "{} {} R", r.id, r.gen)?;
        Ok(())
    }

    /// Write a PDF name.
    ///
    /// Names start with `/` and escape special characters with `#xx`.
    /// NUL cannot be represented and empty names are rejected.
    fn write_name<W: Write>(&self, w: &mut W, key: &str, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::unsupported(key, "empty name"));
        }
        if name.bytes().any(|b| b == 0) {
            return Err(Error::unsupported(key, format!("name '{}' contains NUL", name.escape_default())));
        }
        write!(w, "/")?;
        for byte in name.bytes() {
            match byte {
                // Delimiters and the escape character itself
                b'#' | b'%' | b'(' | b')' | b'/' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' => {
                    write!(w, "#{:02X}", byte)?;
                },
                // Regular characters (no escaping needed)
                b'!'..=b'~' => {
                    w.write_all(&[byte])?;
                },
                // Whitespace and non-ASCII
                _ => {
                    write!(w, "#{:02X}", byte)?;
                },
            }
        }
        Ok(())
    }
}
