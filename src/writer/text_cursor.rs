//! Stateful text emission with automatic pagination.
//!
//! A [`TextCursor`] writes `BT`/`Tf`/`Td`/`Tj`/`ET` operators into a page's
//! content stream. It opens a text object lazily on the first glyph run and
//! always closes it again: on [`TextCursor::end`], before a page break, and
//! when dropped.
//!
//! One [`TextCursor::show_text`] call is one visual line. When the cursor
//! has reached the bottom margin the line moves to a fresh page; if it
//! still does not fit there it is written anyway.

use super::content_stream::ContentStreamOp;
use super::document::{PageRef, PdfDocument};

/// Font size used for line advance before any font is set.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Whether a text object (`BT ... ET`) is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextState {
    /// No text object open
    Closed,
    /// Inside `BT`
    Open,
}

/// Where a line of text ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Page the line was written to
    pub page: PageRef,
    /// Baseline x
    pub x: f32,
    /// Baseline y
    pub y: f32,
    /// True if the line caused a page break
    pub new_page: bool,
    /// True if the line sits at or below the bottom margin even after a break
    pub overflow: bool,
}

/// Text writer bound to one page at a time.
pub struct TextCursor<'a> {
    doc: &'a mut PdfDocument,
    page: PageRef,
    state: TextState,
    font: Option<String>,
    font_size: f32,
    x: f32,
    y: f32,
    /// Start of the current line as written, in hundredths of a point.
    /// `Td` operands are relative to it. Reset to the origin by `BT`.
    line_origin: (i64, i64),
}

impl<'a> TextCursor<'a> {
    pub(crate) fn new(doc: &'a mut PdfDocument, page: PageRef) -> Self {
        let (x, y) = doc
            .page(page)
            .map(|p| (p.cursor_x, p.cursor_y))
            .unwrap_or((doc.page_metrics().left_margin, doc.page_metrics().top_margin));
        Self {
            doc,
            page,
            state: TextState::Closed,
            font: None,
            font_size: DEFAULT_FONT_SIZE,
            x,
            y,
            line_origin: (0, 0),
        }
    }

    /// Page currently written to.
    pub fn page(&self) -> PageRef {
        self.page
    }

    /// Current text state.
    pub fn state(&self) -> TextState {
        self.state
    }

    /// Current font resource name and size.
    pub fn font(&self) -> Option<(&str, f32)> {
        self.font.as_deref().map(|name| (name, self.font_size))
    }

    /// Current baseline position.
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Set the font. Emitted immediately only inside an open text object;
    /// otherwise applied when the next text object opens.
    ///
    /// Sizes that are not finite and positive are ignored with a warning.
    pub fn set_font(&mut self, name: &str, size: f32) -> &mut Self {
        if !size.is_finite() || size <= 0.0 {
            log::warn!("Ignoring font /{} with unusable size {}", name, size);
            return self;
        }
        if self.font.as_deref() == Some(name) && self.font_size == size {
            return self;
        }
        self.font = Some(name.to_string());
        self.font_size = size;

        let known = self
            .doc
            .page(self.page)
            .map(|p| p.font_names().any(|n| n == name))
            .unwrap_or(false);
        if !known {
            log::warn!(
                "Font /{} is not in the resources of page {}",
                name,
                self.page.object_ref()
            );
        }

        if self.state == TextState::Open {
            self.emit(ContentStreamOp::SetFont(name.to_string(), size));
        }
        self
    }

    /// Move the cursor. Emits `Td` inside an open text object.
    pub fn set_text_position(&mut self, x: f32, y: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self.sync_page_cursor();
        if self.state == TextState::Open {
            self.emit_position();
        }
        self
    }

    /// Write one line of text and advance to the next line.
    ///
    /// Empty strings write nothing.
    pub fn show_text(&mut self, text: &str) -> Placement {
        let mut new_page = false;
        if !text.is_empty() && self.doc.page_metrics().is_at_bottom(self.y) {
            self.new_page();
            new_page = true;
        }

        let overflow = self.doc.page_metrics().is_at_bottom(self.y);
        if overflow {
            log::warn!(
                "Line at y={:.2} does not fit on page {}, writing it anyway",
                self.y,
                self.page.object_ref()
            );
        }

        let placement = Placement {
            page: self.page,
            x: self.x,
            y: self.y,
            new_page,
            overflow,
        };
        if text.is_empty() {
            return placement;
        }

        self.ensure_open();
        if centipoints(self.x, self.y) != self.line_origin {
            self.emit_position();
        }
        self.emit(ContentStreamOp::ShowText(text.to_string()));

        // The move itself is emitted before the next glyph run.
        self.y -= self.font_size * self.doc.page_metrics().line_spacing;
        self.sync_page_cursor();
        placement
    }

    /// Close the current text object, add a page, and continue at the top
    /// left margin of the new page.
    pub fn new_page(&mut self) -> PageRef {
        self.end();
        let page = self.doc.add_page();
        self.page = page;
        let metrics = *self.doc.page_metrics();
        self.x = metrics.left_margin;
        self.y = metrics.top_margin;
        self.sync_page_cursor();
        log::debug!("Text continues on page {}", page.object_ref());
        page
    }

    /// Close the text object if one is open.
    pub fn end(&mut self) {
        if self.state == TextState::Open {
            self.emit(ContentStreamOp::EndText);
            self.state = TextState::Closed;
        }
        self.sync_page_cursor();
    }

    fn ensure_open(&mut self) {
        if self.state == TextState::Open {
            return;
        }
        self.emit(ContentStreamOp::BeginText);
        self.state = TextState::Open;
        self.line_origin = (0, 0);

        if let Some(font) = self.font.clone() {
            self.emit(ContentStreamOp::SetFont(font, self.font_size));
        }
        self.emit_position();
    }

    /// Move to the cursor. Operands are differences of the rounded absolute
    /// positions, so they sum exactly to the written position and rounding
    /// never accumulates down the page.
    fn emit_position(&mut self) {
        let (ox, oy) = self.line_origin;
        let (tx, ty) = centipoints(self.x, self.y);
        self.emit(ContentStreamOp::MoveText(
            (tx - ox) as f32 / 100.0,
            (ty - oy) as f32 / 100.0,
        ));
        self.line_origin = (tx, ty);
    }

    fn emit(&mut self, op: ContentStreamOp) {
        if let Some(stream) = self.doc.content_stream_mut(self.page) {
            stream.op(&op);
        }
    }

    fn sync_page_cursor(&mut self) {
        let (x, y) = (self.x, self.y);
        if let Some(page) = self.doc.page_mut(self.page) {
            page.cursor_x = x;
            page.cursor_y = y;
        }
    }
}

/// A position rounded to the two decimals operators are written with.
fn centipoints(x: f32, y: f32) -> (i64, i64) {
    (
        (f64::from(x) * 100.0).round() as i64,
        (f64::from(y) * 100.0).round() as i64,
    )
}

impl Drop for TextCursor<'_> {
    fn drop(&mut self) {
        self.end();
    }
}

impl std::fmt::Debug for TextCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCursor")
            .field("page", &self.page)
            .field("state", &self.state)
            .field("font", &self.font)
            .field("font_size", &self.font_size)
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}
