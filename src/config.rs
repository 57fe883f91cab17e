//! Configuration for PDF generation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Page geometry and text margins, in points.
///
/// Defaults describe an A4 page with 2cm margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMetrics {
    /// Page width (MediaBox upper-right x)
    pub width: f32,
    /// Page height (MediaBox upper-right y)
    pub height: f32,
    /// Baseline of the first line on a fresh page
    pub top_margin: f32,
    /// Lines at or below this y trigger a page break
    pub bottom_margin: f32,
    /// Starting x of every line on a fresh page
    pub left_margin: f32,
    /// Right text edge (informational; no wrapping is performed)
    pub right_margin: f32,
    /// Line advance as a multiple of the font size
    pub line_spacing: f32,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageMetrics {
    /// A4 (210mm x 297mm) with 2cm margins.
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            top_margin: 785.89,
            bottom_margin: 56.69,
            left_margin: 56.69,
            right_margin: 538.59,
            line_spacing: 1.2,
        }
    }

    /// US Letter (8.5" x 11") with 2cm margins.
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            top_margin: 735.31,
            bottom_margin: 56.69,
            left_margin: 56.69,
            right_margin: 555.31,
            line_spacing: 1.2,
        }
    }

    /// True if a line at `y` would sit on or below the bottom margin.
    pub fn is_at_bottom(&self, y: f32) -> bool {
        y <= self.bottom_margin
    }

    /// The MediaBox array, pre-rendered.
    pub fn media_box(&self) -> String {
        format!("[0 0 {:.2} {:.2}]", self.width, self.height)
    }

    /// Check that the geometry is usable.
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.width,
            self.height,
            self.top_margin,
            self.bottom_margin,
            self.left_margin,
            self.right_margin,
            self.line_spacing,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfig("page metrics must be finite".to_string()));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "page size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.top_margin > self.height || self.bottom_margin < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "vertical margins {}..{} fall outside the page",
                self.bottom_margin, self.top_margin
            )));
        }
        if self.left_margin < 0.0 || self.right_margin > self.width {
            return Err(Error::InvalidConfig(format!(
                "horizontal margins {}..{} fall outside the page",
                self.left_margin, self.right_margin
            )));
        }
        if self.line_spacing <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "line spacing must be positive, got {}",
                self.line_spacing
            )));
        }
        Ok(())
    }
}

/// Configuration for PDF generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfWriterConfig {
    /// PDF version written in the header (e.g., "1.6")
    pub version: String,
    /// Whether new content streams are FlateDecode-compressed
    pub compress: bool,
    /// Geometry shared by every page
    pub page: PageMetrics,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.6".to_string(),
            compress: true,
            page: PageMetrics::default(),
        }
    }
}

impl PdfWriterConfig {
    /// Set the header version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set page geometry.
    pub fn with_page(mut self, page: PageMetrics) -> Self {
        self.page = page;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        let valid_version = self
            .version
            .split_once('.')
            .map(|(major, minor)| {
                !major.is_empty()
                    && !minor.is_empty()
                    && major.bytes().all(|b| b.is_ascii_digit())
                    && minor.bytes().all(|b| b.is_ascii_digit())
            })
            .unwrap_or(false);
        if !valid_version {
            return Err(Error::InvalidConfig(format!("bad PDF version '{}'", self.version)));
        }
        self.page.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_a4() {
        let metrics = PageMetrics::default();
        assert_eq!(metrics.media_box(), "[0 0 595.28 841.89]");
        assert!(metrics.validate().is_ok());
    }

    #[test]
    fn test_is_at_bottom_is_inclusive() {
        let metrics = PageMetrics::default();
        assert!(metrics.is_at_bottom(56.69));
        assert!(metrics.is_at_bottom(10.0));
        assert!(!metrics.is_at_bottom(57.0));
    }

    #[test]
    fn test_letter_validates() {
        assert!(PageMetrics::letter().validate().is_ok());
        assert_eq!(PageMetrics::letter().media_box(), "[0 0 612.00 792.00]");
    }

    #[test]
    fn test_rejects_bad_metrics() {
        let mut metrics = PageMetrics::default();
        metrics.line_spacing = 0.0;
        assert!(metrics.validate().is_err());

        let mut metrics = PageMetrics::default();
        metrics.top_margin = 900.0;
        assert!(metrics.validate().is_err());

        let mut metrics = PageMetrics::default();
        metrics.width = f32::NAN;
        assert!(metrics.validate().is_err());
    }

    #[test]
    fn test_version_validation() {
        assert!(PdfWriterConfig::default().validate().is_ok());
        assert!(PdfWriterConfig::default().with_version("1.7").validate().is_ok());
        assert!(PdfWriterConfig::default().with_version("seven").validate().is_err());
        assert!(PdfWriterConfig::default().with_version("1.").validate().is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = PdfWriterConfig::default()
            .with_compress(false)
            .with_page(PageMetrics::letter());
        assert!(!config.compress);
        assert_eq!(config.page.width, 612.0);
        assert_eq!(config.version, "1.6");
    }
}
