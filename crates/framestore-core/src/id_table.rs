//! Collection-id tables.
//!
//! Each category stores a table mapping its collection names to small stable
//! integer ids. Objects in one collection refer to objects in another by
//! `(collection id, index)`, so the table must outlive every frame built from
//! a read. The reader hands the same table out behind an `Arc` to every
//! [`crate::reader::FrameData`] it produces.

/// Bidirectional mapping between collection names and collection ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectionIdTable {
    ids: Vec<u32>,
    names: Vec<String>,
}

impl CollectionIdTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(id, name)` pairs, keeping their order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, String)>) -> Self {
        let (ids, names) = pairs.into_iter().unzip();
        Self { ids, names }
    }

    /// The id of the collection called `name`.
    pub fn collection_id(&self, name: &str) -> Option<u32> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|pos| self.ids[pos])
    }

    /// The name of the collection with id `id`.
    pub fn name(&self, id: u32) -> Option<&str> {
        self.ids
            .iter()
            .position(|&i| i == id)
            .map(|pos| self.names[pos].as_str())
    }

    /// Whether a collection called `name` is in the table.
    pub fn is_present(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// All ids, parallel to [`Self::names`].
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// All names, parallel to [`Self::ids`].
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over `(id, name)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.ids
            .iter()
            .copied()
            .zip(self.names.iter().map(String::as_str))
    }

    /// Number of collections in the table.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_both_directions() {
        let table = CollectionIdTable::from_pairs([
            (0x1234, "hits".to_string()),
            (0x9abc, "clusters".to_string()),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.collection_id("clusters"), Some(0x9abc));
        assert_eq!(table.name(0x1234), Some("hits"));
        assert_eq!(table.collection_id("tracks"), None);
        assert_eq!(table.name(1), None);
        assert!(table.is_present("hits"));
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            vec![(0x1234, "hits"), (0x9abc, "clusters")]
        );
    }

    #[test]
    fn empty_table() {
        let table = CollectionIdTable::new();
        assert!(table.is_empty());
        assert!(table.ids().is_empty());
        assert!(table.names().is_empty());
    }
}
