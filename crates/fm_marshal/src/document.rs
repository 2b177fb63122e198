use std::borrow::Cow;
use std::fmt;

use crate::hash::{FIXED_STATE, FixedHashMap};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Document

/// An ordered field-name → [`Value`] mapping.
///
/// `Document` is the output of marshalling one struct: iteration yields the
/// entries in insertion order (the resolved field order), while [`get`] stays
/// O(1) through an internal name → index table.
///
/// Equality is order-insensitive: two documents are equal when they hold the
/// same names mapped to equal values.
///
/// # Examples
///
/// ```
/// use fm_marshal::{Document, Value};
///
/// let mut doc = Document::new();
/// doc.insert("id", Value::from(7));
/// doc.insert("name", Value::from("Ada"));
///
/// assert_eq!(doc.len(), 2);
/// assert_eq!(doc.get("id"), Some(&Value::Int(7)));
/// assert_eq!(doc.keys().collect::<Vec<_>>(), ["id", "name"]);
/// ```
///
/// [`get`]: Document::get
#[derive(Clone)]
pub struct Document {
    values: Vec<Value>,
    keys: Vec<Cow<'static, str>>,
    indices: FixedHashMap<Cow<'static, str>, usize>,
}

impl Document {
    /// Creates an empty `Document`.
    #[inline]
    pub const fn new() -> Self {
        Self {
            values: Vec::new(),
            keys: Vec::new(),
            indices: FixedHashMap::with_hasher(FIXED_STATE),
        }
    }

    /// Creates an empty `Document` with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
            indices: FixedHashMap::with_capacity_and_hasher(capacity, FIXED_STATE),
        }
    }

    /// Appends an entry to the end of the document.
    ///
    /// If the key already exists, its value is overwritten in place and the
    /// original position is kept.
    pub fn insert(&mut self, key: impl Into<Cow<'static, str>>, value: Value) {
        let key: Cow<'static, str> = key.into();
        if let Some(&index) = self.indices.get(&key) {
            self.values[index] = value;
        } else {
            self.values.push(value);
            self.indices.insert(key.clone(), self.values.len() - 1);
            self.keys.push(key);
        }
    }

    /// Returns the value for the given key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.indices.get(key).map(|&index| &self.values[index])
    }

    /// Returns `true` if the document holds the given key.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.indices.contains_key(key)
    }

    /// Returns the position of the given key in insertion order.
    #[inline]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.indices.get(key).copied()
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the document holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over the keys in insertion order.
    #[inline]
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.keys.iter().map(AsRef::as_ref)
    }

    /// Returns an iterator over the values in insertion order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.values.iter()
    }

    /// Returns an iterator over `(key, value)` pairs in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.keys.iter().map(AsRef::as_ref).zip(self.values.iter())
    }
}

impl Default for Document {
    /// See [`Document::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<Cow<'static, str>>> FromIterator<(K, Value)> for Document {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(entries: T) -> Self {
        let mut doc = Document::new();
        for (key, value) in entries {
            doc.insert(key, value);
        }
        doc
    }
}

impl IntoIterator for Document {
    type Item = (Cow<'static, str>, Value);
    type IntoIter = std::iter::Zip<
        std::vec::IntoIter<Cow<'static, str>>,
        std::vec::IntoIter<Value>,
    >;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter().zip(self.values)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Document, Value};

    #[test]
    fn insertion_order_is_preserved() {
        let doc: Document = [
            ("b", Value::from(1)),
            ("a", Value::from(2)),
            ("c", Value::from(3)),
        ]
        .into_iter()
        .collect();

        assert_eq!(doc.keys().collect::<Vec<_>>(), ["b", "a", "c"]);
        assert_eq!(doc.index_of("c"), Some(2));
    }

    #[test]
    fn reinserting_a_key_overwrites_in_place() {
        let mut doc = Document::new();
        doc.insert("a", Value::from(1));
        doc.insert("b", Value::from(2));
        doc.insert("a", Value::from(3));

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("a"), Some(&Value::Int(3)));
        assert_eq!(doc.index_of("a"), Some(0));
    }

    #[test]
    fn equality_ignores_entry_order() {
        let left: Document = [("a", Value::from(1)), ("b", Value::from(2))]
            .into_iter()
            .collect();
        let right: Document = [("b", Value::from(2)), ("a", Value::from(1))]
            .into_iter()
            .collect();
        let different: Document = [("a", Value::from(1))].into_iter().collect();

        assert_eq!(left, right);
        assert_ne!(left, different);
    }
}
