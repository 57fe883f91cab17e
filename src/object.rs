//! PDF object types used when building a document.
//!
//! Dictionaries are built from a closed set of value variants. Anything
//! outside that set cannot be constructed, and the few values that are
//! representable but not valid PDF are rejected at serialization time.

use indexmap::IndexMap;

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

/// A value stored under a dictionary key.
#[derive(Debug, Clone, PartialEq)]
pub enum DictValue {
    /// Indirect reference, written as `n 0 R`
    Ref(ObjectRef),
    /// Integer value
    Integer(i64),
    /// Array of integers
    IntArray(Vec<i64>),
    /// Array of reals, each written with two decimals
    FloatArray(Vec<f32>),
    /// Array of indirect references (e.g. page `Kids`)
    RefArray(Vec<ObjectRef>),
    /// Name, written as `/Value`
    Name(String),
    /// Pre-rendered bracketed array, written verbatim
    RawArray(String),
    /// Nested dictionary
    Dict(PdfDictionary),
}

impl DictValue {
    /// Create a Name value.
    pub fn name(s: impl Into<String>) -> Self {
        DictValue::Name(s.into())
    }

    /// Get the type name of this value (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            DictValue::Ref(_) => "Reference",
            DictValue::Integer(_) => "Integer",
            DictValue::IntArray(_) => "IntArray",
            DictValue::FloatArray(_) => "FloatArray",
            DictValue::RefArray(_) => "RefArray",
            DictValue::Name(_) => "Name",
            DictValue::RawArray(_) => "RawArray",
            DictValue::Dict(_) => "Dictionary",
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            DictValue::Ref(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            DictValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            DictValue::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Try to cast to dictionary.
    pub fn as_dict(&self) -> Option<&PdfDictionary> {
        match self {
            DictValue::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Collect every indirect reference held by this value, recursively.
    pub fn collect_refs(&self, out: &mut Vec<ObjectRef>) {
        match self {
            DictValue::Ref(r) => out.push(*r),
            DictValue::RefArray(refs) => out.extend_from_slice(refs),
            DictValue::Dict(d) => d.collect_refs(out),
            DictValue::Integer(_)
            | DictValue::IntArray(_)
            | DictValue::FloatArray(_)
            | DictValue::Name(_)
            | DictValue::RawArray(_) => {},
        }
    }
}

impl From<ObjectRef> for DictValue {
    fn from(r: ObjectRef) -> Self {
        DictValue::Ref(r)
    }
}

impl From<i64> for DictValue {
    fn from(i: i64) -> Self {
        DictValue::Integer(i)
    }
}

impl From<PdfDictionary> for DictValue {
    fn from(d: PdfDictionary) -> Self {
        DictValue::Dict(d)
    }
}

/// Insertion-ordered PDF dictionary.
///
/// A key mapped to `None` is kept in the map but omitted on output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDictionary {
    entries: IndexMap<String, Option<DictValue>>,
}

impl PdfDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Replacing keeps the original key position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DictValue>) -> &mut Self {
        self.entries.insert(key.into(), Some(value.into()));
        self
    }

    /// Insert an optional value; `None` suppresses the key on output.
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<DictValue>) -> &mut Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DictValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a present value.
    pub fn get(&self, key: &str) -> Option<&DictValue> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    /// Number of keys that will be written.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|v| v.is_some()).count()
    }

    /// True if no key will be written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over written entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DictValue)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// Collect every indirect reference in this dictionary, recursively.
    pub fn collect_refs(&self, out: &mut Vec<ObjectRef>) {
        for (_, value) in self.iter() {
            value.collect_refs(out);
        }
    }
}
