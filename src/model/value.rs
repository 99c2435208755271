//! Recursive value tree and ordered sections

use super::scalar::Scalar;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

/// Reserved key identifying a named section inside a list
pub const NAME_KEY: &str = "name";

/// Reserved key identifying a typed section inside a list or typed context
pub const TYPE_KEY: &str = "type";

/// A node of the configuration tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Value {
    Scalar(Scalar),
    Scalars(Vec<Scalar>),
    Sections(Vec<Section>),
    Section(Section),
}

impl Value {
    /// Whether this value is one of the two sequence shapes
    #[must_use]
    #[inline]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Scalars(_) | Self::Sections(_))
    }

    /// Number of elements of a sequence, `None` for scalars and sections
    #[must_use]
    #[inline]
    pub fn sequence_len(&self) -> Option<usize> {
        match self {
            Self::Scalars(items) => Some(items.len()),
            Self::Sections(items) => Some(items.len()),
            Self::Scalar(_) | Self::Section(_) => None,
        }
    }

    #[must_use]
    #[inline]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    #[must_use]
    #[inline]
    pub const fn as_section(&self) -> Option<&Section> {
        match self {
            Self::Section(section) => Some(section),
            _ => None,
        }
    }

    #[inline]
    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Self::Section(section) => Some(section),
            _ => None,
        }
    }

    #[must_use]
    #[inline]
    pub fn as_sections(&self) -> Option<&[Section]> {
        match self {
            Self::Sections(sections) => Some(sections),
            _ => None,
        }
    }

    /// Short name of the value shape, used in diagnostics
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Scalars(_) => "list of scalars",
            Self::Sections(_) => "list of sections",
            Self::Section(_) => "section",
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Section> for Value {
    fn from(value: Section) -> Self {
        Self::Section(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::Str(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Int(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

/// Insertion-ordered mapping from key to value
///
/// Keys are unique. Inserting an existing key replaces its value in place,
/// keeping the original position, so textual output stays stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Section {
    entries: IndexMap<String, Value>,
}

impl Section {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for constructing fixtures
    #[must_use]
    #[inline]
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an entry, returning the previous value
    #[inline]
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Insert an entry at the front of the section
    #[inline]
    pub fn insert_first<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.entries.shift_insert(0, key.into(), value.into());
    }

    /// Remove an entry, preserving the order of the remaining entries
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    #[must_use]
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Mutable access to an entry, creating it from `default` when missing
    #[inline]
    pub fn entry_or_insert_with<F: FnOnce() -> Value>(
        &mut self,
        key: &str,
        default: F,
    ) -> &mut Value {
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    #[must_use]
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.entries.iter_mut()
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Move every entry out, leaving the section empty
    #[inline]
    pub fn take_entries(&mut self) -> Vec<(String, Value)> {
        core::mem::take(&mut self.entries).into_iter().collect()
    }

    /// The identifier of a list element: `name`, or `type` when there is no name
    #[must_use]
    #[inline]
    pub fn identifier(&self) -> Option<&Scalar> {
        self.get(NAME_KEY)
            .or_else(|| self.get(TYPE_KEY))
            .and_then(Value::as_scalar)
    }

    /// Follow a path of section keys
    #[must_use]
    #[inline]
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        let mut section = self;
        for key in parents {
            section = section.get(key)?.as_section()?;
        }
        section.get(last)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Section {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut section = Self::new();
        for (key, value) in iter {
            section.insert(key, value);
        }
        section
    }
}

impl IntoIterator for Section {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
