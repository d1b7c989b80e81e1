use serde::{Deserialize, Serialize};

/// Insertion-ordered collection of unique item ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FavoritesSet {
    ids: Vec<String>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from ids, keeping the first occurrence of each.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        set.extend(ids);
        set
    }

    /// Append `id` unless present. Returns true if it was added.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id`. Returns true if it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Append every id not yet present, in iteration order.
    pub fn extend<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            self.insert(id);
        }
    }

    /// This set followed by the ids of `other` it does not already hold.
    pub fn union(&self, other: &FavoritesSet) -> FavoritesSet {
        let mut merged = self.clone();
        merged.extend(other.iter().cloned());
        merged
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ids
    }
}

impl From<Vec<String>> for FavoritesSet {
    fn from(ids: Vec<String>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<FavoritesSet> for Vec<String> {
    fn from(set: FavoritesSet) -> Self {
        set.ids
    }
}

impl<'a> IntoIterator for &'a FavoritesSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
