//! Ordered attribute storage.

/// Attributes of one element: unique names, insertion order preserved.
///
/// Markup attribute lists are short, so a vector with linear lookup beats a
/// hash map and keeps the author's order for serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributesMap {
    entries: Vec<(String, String)>,
}

impl AttributesMap {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Value for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// True when `name` is present, even with an empty value.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Set `name` to `value`, returning the previous value.
    ///
    /// An existing name keeps its position; a new one is appended.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == name) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((name, value));
        None
    }

    /// Remove `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Copy every entry of `other` into `self`, overwriting shared names.
    pub fn extend_from(&mut self, other: &Self) {
        for (k, v) in &other.entries {
            let _ = self.insert(k.clone(), v.clone());
        }
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributesMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            let _ = map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut attrs = AttributesMap::new();
        let _ = attrs.insert("padding", "10px");
        let _ = attrs.insert("color", "red");
        assert_eq!(attrs.insert("padding", "0"), Some("10px".to_string()));
        let names: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["padding", "color"]);
        assert_eq!(attrs.get("padding"), Some("0"));
    }

    #[test]
    fn test_remove_and_extend() {
        let mut attrs: AttributesMap = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(attrs.remove("a"), Some("1".to_string()));
        assert_eq!(attrs.remove("a"), None);
        let other: AttributesMap = [("b", "3"), ("c", "4")].into_iter().collect();
        attrs.extend_from(&other);
        assert_eq!(attrs.get("b"), Some("3"));
        assert_eq!(attrs.len(), 2);
    }
}
