//! Ordered key/value fields of a descriptor section.

/// A single `key=value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub value: String,
}

impl Field {
    /// Create a new field.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered list of fields.
///
/// Duplicate keys may coexist. Lookups return the first match and
/// [`FieldList::upsert`] updates the first match in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList(Vec<Field>);

impl FieldList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, keeping any earlier field with the same key.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push(Field::new(key, value));
    }

    /// Value of the first field named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|field| field.key == key)
            .map(|field| field.value.as_str())
    }

    /// Like [`FieldList::get`], but a missing key reads as the empty string.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Update the first field named `key`, or append one if absent.
    pub fn upsert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|field| field.key == key) {
            Some(field) => field.value = value,
            None => self.0.push(Field::new(key, value)),
        }
    }

    /// Number of fields, duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list holds no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the fields in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| Field::new(k, v)).collect())
    }
}
