//! Font resources for PDF generation.
//!
//! Only references to the PDF Base-14 fonts are supported; nothing is
//! embedded. Per PDF spec Section 9.6.2.2 every conforming reader ships
//! these fonts.

use crate::object::{DictValue, PdfDictionary};

/// Resource category key used in a page's `/Resources` dictionary.
pub const FONT_RESOURCE_TYPE: &str = "Font";

/// The 14 standard Type 1 fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    /// Helvetica
    Helvetica,
    /// Helvetica-Bold
    HelveticaBold,
    /// Helvetica-Oblique
    HelveticaOblique,
    /// Helvetica-BoldOblique
    HelveticaBoldOblique,
    /// Times-Roman
    TimesRoman,
    /// Times-Bold
    TimesBold,
    /// Times-Italic
    TimesItalic,
    /// Times-BoldItalic
    TimesBoldItalic,
    /// Courier
    Courier,
    /// Courier-Bold
    CourierBold,
    /// Courier-Oblique
    CourierOblique,
    /// Courier-BoldOblique
    CourierBoldOblique,
    /// Symbol
    Symbol,
    /// ZapfDingbats
    ZapfDingbats,
}

impl StandardFont {
    /// All base-14 fonts.
    pub const ALL: [StandardFont; 14] = [
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
        StandardFont::HelveticaBoldOblique,
        StandardFont::TimesRoman,
        StandardFont::TimesBold,
        StandardFont::TimesItalic,
        StandardFont::TimesBoldItalic,
        StandardFont::Courier,
        StandardFont::CourierBold,
        StandardFont::CourierOblique,
        StandardFont::CourierBoldOblique,
        StandardFont::Symbol,
        StandardFont::ZapfDingbats,
    ];

    /// PostScript name used as `/BaseFont`.
    pub fn as_base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::TimesItalic => "Times-Italic",
            StandardFont::TimesBoldItalic => "Times-BoldItalic",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
            StandardFont::Symbol => "Symbol",
            StandardFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Look up a base-14 font by PostScript name.
    pub fn from_base_font(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_base_font() == name)
    }

    /// Symbol and ZapfDingbats use their built-in encoding.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, StandardFont::Symbol | StandardFont::ZapfDingbats)
    }
}

/// Map a Unicode code point to its WinAnsiEncoding byte.
///
/// 0x00-0x7F and 0xA0-0xFF map directly; 0x80-0x9F hold the typographic
/// characters Windows-1252 adds over Latin-1.
pub fn unicode_to_winansi(codepoint: u32) -> Option<u8> {
    if codepoint < 0x80 || (0xA0..=0xFF).contains(&codepoint) {
        return Some(codepoint as u8);
    }

    match codepoint {
        0x20AC => Some(0x80), // Euro sign
        0x201A => Some(0x82), // Single low-9 quotation mark
        0x0192 => Some(0x83), // Latin small letter f with hook
        0x201E => Some(0x84), // Double low-9 quotation mark
        0x2026 => Some(0x85), // Horizontal ellipsis
        0x2020 => Some(0x86), // Dagger
        0x2021 => Some(0x87), // Double dagger
        0x02C6 => Some(0x88), // Modifier letter circumflex accent
        0x2030 => Some(0x89), // Per mille sign
        0x0160 => Some(0x8A), // Latin capital letter S with caron
        0x2039 => Some(0x8B), // Single left-pointing angle quotation mark
        0x0152 => Some(0x8C), // Latin capital ligature OE
        0x017D => Some(0x8E), // Latin capital letter Z with caron
        0x2018 => Some(0x91), // Left single quotation mark
        0x2019 => Some(0x92), // Right single quotation mark
        0x201C => Some(0x93), // Left double quotation mark
        0x201D => Some(0x94), // Right double quotation mark
        0x2022 => Some(0x95), // Bullet
        0x2013 => Some(0x96), // En dash
        0x2014 => Some(0x97), // Em dash
        0x02DC => Some(0x98), // Small tilde
        0x2122 => Some(0x99), // Trade mark sign
        0x0161 => Some(0x9A), // Latin small letter s with caron
        0x203A => Some(0x9B), // Single right-pointing angle quotation mark
        0x0153 => Some(0x9C), // Latin small ligature oe
        0x017E => Some(0x9E), // Latin small letter z with caron
        0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
        _ => None,
    }
}

/// A font resource object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontResource {
    /// Key in the page's `/Font` dictionary (e.g. "F1")
    pub resource_name: String,
    /// `/BaseFont`
    pub base_font: String,
    /// `/Subtype`
    pub subtype: String,
    /// `/Encoding`, omitted when `None`
    pub encoding: Option<String>,
}

impl FontResource {
    /// A Type1 font with WinAnsiEncoding, or its built-in encoding for the
    /// symbolic base-14 fonts.
    pub fn standard(base_font: impl Into<String>, resource_name: impl Into<String>) -> Self {
        let base_font = base_font.into();
        let encoding = match StandardFont::from_base_font(&base_font) {
            Some(font) if font.is_symbolic() => None,
            _ => Some("WinAnsiEncoding".to_string()),
        };
        Self {
            resource_name: resource_name.into(),
            base_font,
            subtype: "Type1".to_string(),
            encoding,
        }
    }

    /// Override the subtype.
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = subtype.into();
        self
    }

    /// Override the encoding; `None` omits the key.
    pub fn with_encoding(mut self, encoding: Option<String>) -> Self {
        self.encoding = encoding;
        self
    }

    /// Resource category key.
    pub fn resource_type(&self) -> &'static str {
        FONT_RESOURCE_TYPE
    }

    /// Font dictionary.
    pub fn dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        dict.insert("Type", DictValue::name(FONT_RESOURCE_TYPE));
        dict.insert("Subtype", DictValue::name(self.subtype.as_str()));
        dict.insert("BaseFont", DictValue::name(self.base_font.as_str()));
        dict.insert_opt("Encoding", self.encoding.as_deref().map(DictValue::name));
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ObjectSerializer;

    #[test]
    fn test_standard_font_names() {
        assert_eq!(StandardFont::TimesBoldItalic.as_base_font(), "Times-BoldItalic");
        assert_eq!(StandardFont::from_base_font("Courier-Oblique"), Some(StandardFont::CourierOblique));
        assert_eq!(StandardFont::from_base_font("Arial"), None);
        assert_eq!(StandardFont::ALL.len(), 14);
    }

    #[test]
    fn test_font_dictionary() {
        let font = FontResource::standard("Helvetica", "F1");
        let s = ObjectSerializer::new();
        assert_eq!(
            s.serialize_to_string(&font.dictionary()).unwrap(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
        );
    }

    #[test]
    fn test_symbolic_font_omits_encoding() {
        let font = FontResource::standard("ZapfDingbats", "F9");
        assert!(font.encoding.is_none());
        assert!(font.dictionary().get("Encoding").is_none());
    }

    #[test]
    fn test_winansi_mapping() {
        assert_eq!(unicode_to_winansi('A' as u32), Some(0x41));
        assert_eq!(unicode_to_winansi(0xE9), Some(0xE9));
        assert_eq!(unicode_to_winansi(0x20AC), Some(0x80));
        assert_eq!(unicode_to_winansi(0x2014), Some(0x97));
        // C1 controls and code points WinAnsi leaves undefined
        assert_eq!(unicode_to_winansi(0x81), None);
        assert_eq!(unicode_to_winansi(0x2603), None);
    }

    #[test]
    fn test_overrides() {
        let font = FontResource::standard("Times-Roman", "F2")
            .with_subtype("TrueType")
            .with_encoding(Some("MacRomanEncoding".to_string()));
        let dict = font.dictionary();
        assert_eq!(dict.get("Subtype").and_then(DictValue::as_name), Some("TrueType"));
        assert_eq!(dict.get("Encoding").and_then(DictValue::as_name), Some("MacRomanEncoding"));
        assert_eq!(font.resource_type(), "Font");
    }
}
