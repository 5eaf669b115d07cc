//! Insertion-ordered mapping keyed by property id.

use std::fmt;

/// A read-only mapping from property id to `T` that preserves the order in
/// which properties were inserted.
///
/// Wikidata records carry explicit order arrays (`qualifiers-order`,
/// `snaks-order`); decoders insert in that order so iteration reproduces it.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> PropertyMap<T> {
    /// Create an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace the value for `property_id`.
    ///
    /// Replacing keeps the original position.
    pub(crate) fn insert(&mut self, property_id: impl Into<String>, value: T) {
        let property_id = property_id.into();
        match self.entries.iter_mut().find(|(key, _)| *key == property_id) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((property_id, value)),
        }
    }

    /// Look up the value stored for `property_id`.
    #[must_use]
    pub fn get(&self, property_id: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(key, _)| key == property_id)
            .map(|(_, value)| value)
    }

    /// Report whether `property_id` is present.
    #[must_use]
    pub fn contains_key(&self, property_id: &str) -> bool {
        self.get(property_id).is_some()
    }

    /// Property ids in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of properties.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether the mapping is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for PropertyMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(String, T)> for PropertyMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<T> IntoIterator for PropertyMap<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Render `{P1: [a, b], P2: [c]}` for mappings of displayable lists.
pub(crate) fn fmt_grouped<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    map: &PropertyMap<Vec<T>>,
) -> fmt::Result {
    f.write_str("{")?;
    for (index, (property_id, values)) in map.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{property_id}: ")?;
        fmt_list(f, values)?;
    }
    f.write_str("}")
}

/// Render `[a, b]` for displayable slices.
pub(crate) fn fmt_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value}")?;
    }
    f.write_str("]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn iteration_follows_insertion_order() {
        let map: PropertyMap<u8> = [("P2".to_owned(), 2), ("P1".to_owned(), 1)]
            .into_iter()
            .collect();

        assert_eq!(map.keys().collect::<Vec<_>>(), ["P2", "P1"]);
        assert_eq!(map.get("P1"), Some(&1));
        assert!(!map.contains_key("P3"));
    }

    #[rstest]
    fn insert_replaces_in_place() {
        let mut map = PropertyMap::new();
        map.insert("P2", 'a');
        map.insert("P1", 'b');
        map.insert("P2", 'c');

        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().collect::<Vec<_>>(), [("P2", &'c'), ("P1", &'b')]);
    }
}
