//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer.
//!
//! The whole file is staged in memory and only handed to the sink once
//! every object has serialized, so a structural error never leaves a
//! truncated file behind.

use super::document::{IndirectObject, PdfDocument, PdfObjectKind};
use super::object_serializer::{ObjectSerializer, STREAM_TAIL};
use super::xref_table::{XrefEntry, XrefTable};
use crate::error::{Result, StructuralError};
use crate::object::PdfDictionary;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Binary marker comment following the header line.
pub const BINARY_MARKER: [u8; 6] = [0x25, 0xD3, 0xEB, 0xE9, 0xE1, 0x0A];

/// A fully serialized document.
#[derive(Debug, Clone)]
pub struct SerializedPdf {
    /// File contents
    pub bytes: Vec<u8>,
    /// Cross-reference table as written
    pub xref: XrefTable,
    /// Byte offset of the `xref` keyword
    pub startxref: u64,
}

/// Serializes a [`PdfDocument`] in a single pass.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    serializer: ObjectSerializer,
}

impl PdfWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects in emission order: catalog, page tree, fonts, content
    /// streams, pages. Each group is sorted by object number.
    pub fn emission_order(doc: &PdfDocument) -> Vec<&IndirectObject> {
        let mut catalog = Vec::new();
        let mut page_tree = Vec::new();
        let mut fonts = Vec::new();
        let mut streams = Vec::new();
        let mut pages = Vec::new();

        for obj in doc.objects() {
            match obj.kind {
                PdfObjectKind::Catalog { .. } => catalog.push(obj),
                PdfObjectKind::PageTree { .. } => page_tree.push(obj),
                PdfObjectKind::Font(_) => fonts.push(obj),
                PdfObjectKind::ContentStream(_) => streams.push(obj),
                PdfObjectKind::Page(_) => pages.push(obj),
            }
        }
        for group in [&mut fonts, &mut streams, &mut pages] {
            group.sort_by_key(|o| o.object_number);
        }

        let mut order = Vec::with_capacity(doc.objects().len());
        order.extend(catalog);
        order.extend(page_tree);
        order.extend(fonts);
        order.extend(streams);
        order.extend(pages);
        order
    }

    /// Check that an emission list is consistent with the document.
    ///
    /// Every object reachable from the catalog must be listed, and object
    /// numbers must be exactly `1..=N`, where `N` is the highest number the
    /// document has allocated. Reachability is checked first so a missing
    /// referenced object reports as [`StructuralError::UnlistedObject`]
    /// rather than as a numbering gap.
    pub fn validate(doc: &PdfDocument, order: &[&IndirectObject]) -> Result<()> {
        let numbers: Vec<u32> = order.iter().map(|o| o.object_number).collect();
        let listed: HashSet<u32> = numbers.iter().copied().collect();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([doc.catalog_ref()]);
        while let Some(obj_ref) = queue.pop_front() {
            if !seen.insert(obj_ref.id) {
                continue;
            }
            let obj = doc
                .object(obj_ref.id)
                .ok_or(StructuralError::DanglingReference(obj_ref))?;
            if !listed.contains(&obj_ref.id) {
                return Err(StructuralError::UnlistedObject(obj_ref).into());
            }
            queue.extend(obj.kind.references());
        }

        validate_object_numbers(&numbers, doc.max_object_number())
    }

    /// Serialize the document.
    pub fn serialize(&self, doc: &PdfDocument) -> Result<SerializedPdf> {
        let order = Self::emission_order(doc);
        Self::validate(doc, &order)?;

        let mut output = Vec::new();
        let mut xref = XrefTable::new();

        writeln!(output, "%PDF-{}", doc.config().version)?;
        output.extend_from_slice(&BINARY_MARKER);

        for obj in &order {
            let offset = output.len() as u64;
            xref.push(XrefEntry::in_use(obj.object_number, obj.generation, offset));
            log::trace!("Object {} at offset {}", obj.object_number, offset);
            self.write_object(&mut output, obj)?;
        }

        let startxref = output.len() as u64;
        xref.write_to(&mut output)?;

        let trailer = PdfDictionary::new()
            .with("Size", xref.len() as i64)
            .with("Root", doc.catalog_ref());
        writeln!(output, "trailer")?;
        self.serializer.write_dictionary(&mut output, &trailer)?;
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", startxref)?;
        writeln!(output, "%%EOF")?;

        log::debug!(
            "Serialized {} objects, {} bytes, xref at {}",
            order.len(),
            output.len(),
            startxref
        );

        Ok(SerializedPdf {
            bytes: output,
            xref,
            startxref,
        })
    }

    fn write_object(&self, output: &mut Vec<u8>, obj: &IndirectObject) -> Result<()> {
        match &obj.kind {
            PdfObjectKind::ContentStream(stream) => {
                // The payload never passes through text formatting.
                let finalized = stream.finalize();
                let head = self.serializer.serialize_stream_head(
                    obj.object_number,
                    obj.generation,
                    &finalized.dictionary(),
                )?;
                output.extend_from_slice(&head);
                output.extend_from_slice(&finalized.data);
                output.extend_from_slice(STREAM_TAIL);
            },
            kind => {
                let dict = kind.dictionary().unwrap_or_default();
                output.extend_from_slice(&self.serializer.serialize_indirect(
                    obj.object_number,
                    obj.generation,
                    &dict,
                )?);
            },
        }
        Ok(())
    }

    /// Serialize and write to `sink`. Returns the number of bytes written.
    ///
    /// Nothing reaches the sink if serialization fails.
    pub fn write_to<W: Write>(&self, doc: &PdfDocument, sink: &mut W) -> Result<u64> {
        let serialized = self.serialize(doc)?;
        sink.write_all(&serialized.bytes)?;
        sink.flush()?;
        Ok(serialized.bytes.len() as u64)
    }

    /// Save to a file.
    ///
    /// Bytes are written to a hidden sibling file which is then renamed over
    /// `path`, so readers never observe a partial file.
    pub fn save(&self, doc: &PdfDocument, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let serialized = self.serialize(doc)?;
        let staging = staging_path(path);

        let published = std::fs::write(&staging, &serialized.bytes)
            .and_then(|_| std::fs::rename(&staging, path));
        if let Err(e) = published {
            let _ = std::fs::remove_file(&staging);
            return Err(e.into());
        }
        log::debug!("Saved {} bytes to {}", serialized.bytes.len(), path.display());
        Ok(())
    }
}

/// Check that `numbers` is exactly `1..=max(allocated, largest listed)`.
pub fn validate_object_numbers(numbers: &[u32], allocated: u32) -> Result<()> {
    let mut seen = BTreeSet::new();
    for &n in numbers {
        if n == 0 {
            return Err(StructuralError::InvalidObjectNumber(n).into());
        }
        if !seen.insert(n) {
            return Err(StructuralError::DuplicateObjectNumber(n).into());
        }
    }

    let max = seen.iter().next_back().copied().unwrap_or(0).max(allocated);
    let missing: Vec<u32> = (1..=max).filter(|n| !seen.contains(n)).collect();
    if !missing.is_empty() {
        return Err(StructuralError::ObjectNumberGap { missing }.into());
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.pdf".to_string());
    path.with_file_name(format!(".{}.partial", name))
}

impl PdfDocument {
    /// Serialize to bytes with a default [`PdfWriter`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(PdfWriter::new().serialize(self)?.bytes)
    }

    /// Save to a file with a default [`PdfWriter`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        PdfWriter::new().save(self, path)
    }
}
