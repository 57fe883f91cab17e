//! Document object table.
//!
//! [`PdfDocument`] owns every indirect object in an arena indexed by object
//! number. Objects refer to each other by [`ObjectRef`], never by pointer,
//! and callers hold typed handles ([`PageRef`], [`FontRef`]) rather than
//! borrowed objects.
//!
//! The table is append-only while the document is being built. Serialization
//! borrows the document immutably, so no mutation can happen while a file is
//! being written.
//!
//! A document is not synchronized. Callers that share one across threads
//! must wrap it in a single mutex around every mutating call.

use super::content_stream::ContentStream;
use super::font_manager::{FontResource, StandardFont, FONT_RESOURCE_TYPE};
use super::text_cursor::TextCursor;
use crate::config::{PageMetrics, PdfWriterConfig};
use crate::error::{Result, StructuralError};
use crate::object::{DictValue, ObjectRef, PdfDictionary};
use indexmap::IndexMap;

/// Object number of the catalog.
pub const CATALOG_OBJECT_NUMBER: u32 = 1;
/// Object number of the root page tree.
pub const PAGE_TREE_OBJECT_NUMBER: u32 = 2;

/// Handle to a page in a [`PdfDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageRef(ObjectRef);

impl PageRef {
    /// The page's indirect reference.
    pub fn object_ref(&self) -> ObjectRef {
        self.0
    }
}

/// Handle to a font resource in a [`PdfDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontRef(ObjectRef);

impl FontRef {
    /// The font's indirect reference.
    pub fn object_ref(&self) -> ObjectRef {
        self.0
    }
}

/// A page object.
#[derive(Debug, Clone, PartialEq)]
pub struct PageObject {
    /// Root page tree
    pub parent: ObjectRef,
    /// Pre-rendered `/MediaBox` array
    pub media_box: String,
    /// Resources grouped by type, then by resource name
    pub resources: IndexMap<String, IndexMap<String, ObjectRef>>,
    /// Content stream
    pub contents: ObjectRef,
    /// Text cursor x, construction-time only
    pub cursor_x: f32,
    /// Text cursor y, construction-time only
    pub cursor_y: f32,
}

impl PageObject {
    /// Page dictionary. `/Resources` is omitted when the page has none.
    pub fn dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        dict.insert("Type", DictValue::name("Page"));
        dict.insert("Parent", self.parent);
        dict.insert("MediaBox", DictValue::RawArray(self.media_box.clone()));
        dict.insert("Contents", self.contents);

        let resources = if self.resources.is_empty() {
            None
        } else {
            let mut resource_dict = PdfDictionary::new();
            for (resource_type, entries) in &self.resources {
                let mut type_dict = PdfDictionary::new();
                for (name, obj_ref) in entries {
                    type_dict.insert(name.as_str(), *obj_ref);
                }
                resource_dict.insert(resource_type.as_str(), type_dict);
            }
            Some(DictValue::Dict(resource_dict))
        };
        dict.insert_opt("Resources", resources);
        dict
    }

    /// Font resource names visible to this page.
    pub fn font_names(&self) -> impl Iterator<Item = &str> {
        self.resources
            .get(FONT_RESOURCE_TYPE)
            .into_iter()
            .flat_map(|fonts| fonts.keys().map(String::as_str))
    }
}

/// The payload of an indirect object.
#[derive(Debug, Clone)]
pub enum PdfObjectKind {
    /// Document catalog
    Catalog {
        /// Root page tree
        pages: ObjectRef,
    },
    /// Root page tree
    PageTree {
        /// Pages in creation order
        kids: Vec<ObjectRef>,
    },
    /// A page
    Page(PageObject),
    /// A font resource
    Font(FontResource),
    /// A page content stream
    ContentStream(ContentStream),
}

impl PdfObjectKind {
    /// Human-readable kind name.
    pub fn type_name(&self) -> &'static str {
        match self {
            PdfObjectKind::Catalog { .. } => "Catalog",
            PdfObjectKind::PageTree { .. } => "PageTree",
            PdfObjectKind::Page(_) => "Page",
            PdfObjectKind::Font(_) => "Font",
            PdfObjectKind::ContentStream(_) => "ContentStream",
        }
    }

    /// Dictionary for non-stream objects. Content streams build theirs from
    /// the finalized payload and return `None` here.
    pub fn dictionary(&self) -> Option<PdfDictionary> {
        match self {
            PdfObjectKind::Catalog { pages } => Some(
                PdfDictionary::new()
                    .with("Type", DictValue::name("Catalog"))
                    .with("Pages", *pages),
            ),
            PdfObjectKind::PageTree { kids } => Some(
                PdfDictionary::new()
                    .with("Type", DictValue::name("Pages"))
                    .with("Count", kids.len() as i64)
                    .with("Kids", DictValue::RefArray(kids.clone())),
            ),
            PdfObjectKind::Page(page) => Some(page.dictionary()),
            PdfObjectKind::Font(font) => Some(font.dictionary()),
            PdfObjectKind::ContentStream(_) => None,
        }
    }

    /// Indirect references held by this object.
    pub fn references(&self) -> Vec<ObjectRef> {
        let mut refs = Vec::new();
        if let Some(dict) = self.dictionary() {
            dict.collect_refs(&mut refs);
        }
        refs
    }
}

/// An indirect object and its identity.
#[derive(Debug, Clone)]
pub struct IndirectObject {
    /// Object number, `>= 1`
    pub object_number: u32,
    /// Generation number, always 0 for new objects
    pub generation: u16,
    /// Payload
    pub kind: PdfObjectKind,
}

impl IndirectObject {
    /// Reference to this object.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.object_number, self.generation)
    }
}

/// A PDF document under construction.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    config: PdfWriterConfig,
    /// Arena; index `i` holds object number `i + 1`
    objects: Vec<IndirectObject>,
    /// Counter, one past the last allocated number
    next_object_number: u32,
    /// Document-level resources by resource name
    fonts: IndexMap<String, FontRef>,
    /// Most recently added page
    current_page: Option<PageRef>,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    /// Create a document with default config.
    pub fn new() -> Self {
        Self::build(PdfWriterConfig::default())
    }

    /// Create a document with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PdfWriterConfig) -> Self {
        let mut doc = Self {
            config,
            objects: Vec::new(),
            next_object_number: 1,
            fonts: IndexMap::new(),
            current_page: None,
        };

        let catalog_id = doc.next_object_number();
        let pages_id = doc.next_object_number();
        debug_assert_eq!(catalog_id, CATALOG_OBJECT_NUMBER);
        debug_assert_eq!(pages_id, PAGE_TREE_OBJECT_NUMBER);

        doc.register(
            catalog_id,
            PdfObjectKind::Catalog {
                pages: ObjectRef::new(pages_id, 0),
            },
        );
        doc.register(pages_id, PdfObjectKind::PageTree { kids: Vec::new() });
        doc
    }

    /// Writer configuration.
    pub fn config(&self) -> &PdfWriterConfig {
        &self.config
    }

    /// Page geometry.
    pub fn page_metrics(&self) -> &PageMetrics {
        &self.config.page
    }

    /// Allocate the next object number.
    ///
    /// Every construction method calls this. A number taken here but never
    /// bound to an object leaves a gap, which serialization rejects.
    pub fn next_object_number(&mut self) -> u32 {
        let id = self.next_object_number;
        self.next_object_number += 1;
        id
    }

    /// Bind an object to a freshly allocated number.
    fn register(&mut self, object_number: u32, kind: PdfObjectKind) -> ObjectRef {
        log::trace!("Allocated object {} ({})", object_number, kind.type_name());
        let obj = IndirectObject {
            object_number,
            generation: 0,
            kind,
        };
        let obj_ref = obj.object_ref();
        self.objects.push(obj);
        obj_ref
    }

    /// Catalog reference (object 1).
    pub fn catalog_ref(&self) -> ObjectRef {
        ObjectRef::new(CATALOG_OBJECT_NUMBER, 0)
    }

    /// Root page tree reference (object 2).
    pub fn page_tree_ref(&self) -> ObjectRef {
        ObjectRef::new(PAGE_TREE_OBJECT_NUMBER, 0)
    }

    /// Register a base-14 font under `resource_name`.
    ///
    /// Idempotent per `resource_name`: re-adding an existing key returns the
    /// existing font and ignores `base_font_name`.
    pub fn add_standard_font(&mut self, base_font_name: &str, resource_name: &str) -> FontRef {
        self.add_font(FontResource::standard(base_font_name, resource_name))
    }

    /// Register one of the [`StandardFont`]s.
    pub fn add_base14_font(&mut self, font: StandardFont, resource_name: &str) -> FontRef {
        self.add_standard_font(font.as_base_font(), resource_name)
    }

    /// Register a font resource. Idempotent per `resource_name`.
    pub fn add_font(&mut self, font: FontResource) -> FontRef {
        if let Some(existing) = self.fonts.get(&font.resource_name) {
            return *existing;
        }
        let name = font.resource_name.clone();
        let id = self.next_object_number();
        let font_ref = FontRef(self.register(id, PdfObjectKind::Font(font)));
        log::debug!("Added font /{} as object {}", name, id);
        self.fonts.insert(name, font_ref);
        font_ref
    }

    /// Look up a registered font by resource name.
    pub fn font_by_name(&self, resource_name: &str) -> Option<FontRef> {
        self.fonts.get(resource_name).copied()
    }

    /// Font resource for a handle.
    pub fn font(&self, font: FontRef) -> Option<&FontResource> {
        match self.object(font.0.id).map(|o| &o.kind) {
            Some(PdfObjectKind::Font(f)) => Some(f),
            _ => None,
        }
    }

    /// Create an empty content stream object.
    fn create_content_stream(&mut self) -> ObjectRef {
        let id = self.next_object_number();
        let stream = ContentStream::new(self.config.compress);
        self.register(id, PdfObjectKind::ContentStream(stream))
    }

    /// Add a page.
    ///
    /// The page's resources are a snapshot of the fonts registered so far;
    /// fonts added later are not attached to it. A fresh content stream is
    /// allocated right after the page. The returned handle is the only page
    /// change notification: callers holding a cursor retarget it themselves.
    pub fn add_page(&mut self) -> PageRef {
        let page_id = self.next_object_number();
        let metrics = self.config.page;

        let mut resources: IndexMap<String, IndexMap<String, ObjectRef>> = IndexMap::new();
        for (name, font) in &self.fonts {
            resources
                .entry(FONT_RESOURCE_TYPE.to_string())
                .or_default()
                .insert(name.clone(), font.0);
        }

        // Page object is registered first so its slot matches its number.
        let page_ref = self.register(
            page_id,
            PdfObjectKind::Page(PageObject {
                parent: self.page_tree_ref(),
                media_box: metrics.media_box(),
                resources,
                contents: ObjectRef::new(0, 0),
                cursor_x: metrics.left_margin,
                cursor_y: metrics.top_margin,
            }),
        );
        let contents = self.create_content_stream();
        if let Some(PdfObjectKind::Page(page)) = self.kind_mut(page_id) {
            page.contents = contents;
        }

        if let Some(PdfObjectKind::PageTree { kids }) = self.kind_mut(PAGE_TREE_OBJECT_NUMBER) {
            kids.push(page_ref);
        }

        let page = PageRef(page_ref);
        self.current_page = Some(page);
        log::debug!("Added page {} with contents {}", page_ref, contents);
        page
    }

    /// Most recently added page.
    pub fn current_page(&self) -> Option<PageRef> {
        self.current_page
    }

    /// Pages in creation order.
    pub fn pages(&self) -> Vec<PageRef> {
        match self.object(PAGE_TREE_OBJECT_NUMBER).map(|o| &o.kind) {
            Some(PdfObjectKind::PageTree { kids }) => kids.iter().copied().map(PageRef).collect(),
            _ => Vec::new(),
        }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages().len()
    }

    /// Page object for a handle.
    pub fn page(&self, page: PageRef) -> Option<&PageObject> {
        match self.object(page.0.id).map(|o| &o.kind) {
            Some(PdfObjectKind::Page(p)) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn page_mut(&mut self, page: PageRef) -> Option<&mut PageObject> {
        match self.kind_mut(page.0.id) {
            Some(PdfObjectKind::Page(p)) => Some(p),
            _ => None,
        }
    }

    /// Content stream bound to a page.
    pub fn content_stream(&self, page: PageRef) -> Option<&ContentStream> {
        let contents = self.page(page)?.contents;
        match self.object(contents.id).map(|o| &o.kind) {
            Some(PdfObjectKind::ContentStream(s)) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn content_stream_mut(&mut self, page: PageRef) -> Option<&mut ContentStream> {
        let contents = self.page(page)?.contents;
        match self.kind_mut(contents.id) {
            Some(PdfObjectKind::ContentStream(s)) => Some(s),
            _ => None,
        }
    }

    /// Open a text cursor on `page`, starting at the page's stored cursor
    /// position.
    pub fn text_cursor(&mut self, page: PageRef) -> Result<TextCursor<'_>> {
        if self.content_stream(page).is_none() {
            return Err(StructuralError::DanglingReference(page.0).into());
        }
        Ok(TextCursor::new(self, page))
    }

    /// Look up an object by number.
    pub fn object(&self, object_number: u32) -> Option<&IndirectObject> {
        self.slot(object_number).map(|i| &self.objects[i])
    }

    fn kind_mut(&mut self, object_number: u32) -> Option<&mut PdfObjectKind> {
        let index = self.slot(object_number)?;
        Some(&mut self.objects[index].kind)
    }

    /// Arena index of an object. Slots line up with numbers unless a number
    /// was allocated without an object.
    fn slot(&self, object_number: u32) -> Option<usize> {
        let index = object_number.checked_sub(1)? as usize;
        match self.objects.get(index) {
            Some(o) if o.object_number == object_number => Some(index),
            _ => self.objects.iter().position(|o| o.object_number == object_number),
        }
    }

    /// All objects in allocation order.
    pub fn objects(&self) -> &[IndirectObject] {
        &self.objects
    }

    /// Highest object number allocated so far.
    pub fn max_object_number(&self) -> u32 {
        self.next_object_number - 1
    }
}
