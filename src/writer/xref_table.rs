//! Classic cross-reference table.
//!
//! Each entry is a fixed 20-byte line: `{offset:010} {generation:05} {n|f} `
//! followed by a line feed.

use std::io::Write;

/// Generation number of the free-list head (object 0).
pub const FREE_HEAD_GENERATION: u16 = 65535;

/// One row of the cross-reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XrefEntry {
    /// Absolute byte offset of `N G obj`
    pub offset: u64,
    /// Object number
    pub object_number: u32,
    /// Generation number
    pub generation: u16,
    /// `n` when true, `f` when false
    pub in_use: bool,
}

impl XrefEntry {
    /// The sentinel entry for object 0.
    pub fn free_head() -> Self {
        Self {
            offset: 0,
            object_number: 0,
            generation: FREE_HEAD_GENERATION,
            in_use: false,
        }
    }

    /// An in-use entry.
    pub fn in_use(object_number: u32, generation: u16, offset: u64) -> Self {
        Self {
            offset,
            object_number,
            generation,
            in_use: true,
        }
    }
}

impl std::fmt::Display for XrefEntry {
    // Trailing space is part of the format.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:010} {:05} {} ",
            self.offset,
            self.generation,
            if self.in_use { 'n' } else { 'f' }
        )
    }
}

/// Cross-reference table with a single subsection starting at object 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefTable {
    entries: Vec<XrefEntry>,
}

impl Default for XrefTable {
    fn default() -> Self {
        Self::new()
    }
}

impl XrefTable {
    /// Create a table holding only the object 0 sentinel.
    pub fn new() -> Self {
        Self {
            entries: vec![XrefEntry::free_head()],
        }
    }

    /// Record an in-use object.
    pub fn push(&mut self, entry: XrefEntry) {
        self.entries.push(entry);
    }

    /// Entries sorted by object number, sentinel first.
    pub fn entries(&self) -> Vec<XrefEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|e| e.object_number);
        sorted
    }

    /// Number of entries including the sentinel (the trailer `Size`).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true; the sentinel is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offset recorded for an object number.
    pub fn offset_of(&self, object_number: u32) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.in_use && e.object_number == object_number)
            .map(|e| e.offset)
    }

    /// Write `xref`, the subsection header, and every entry.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "xref")?;
        writeln!(w, "0 {}", self.entries.len())?;
        for entry in self.entries() {
            writeln!(w, "{}", entry)?;
        }
        Ok(())
    }
}
