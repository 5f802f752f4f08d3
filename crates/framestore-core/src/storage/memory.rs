use std::collections::BTreeMap;

use bytes::Bytes;

/// An in-memory store directory: named byte objects laid out exactly like the
/// files of a store directory on disk.
///
/// The directory is owned by the caller and handed to a reader behind an
/// `Arc`; objects are `Bytes`, so segments read from it share the underlying
/// buffers instead of copying them.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory {
    objects: BTreeMap<String, Bytes>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the object stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Bytes>) {
        self.objects.insert(name.into(), contents.into());
    }

    /// A cheap clone of the object stored under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Bytes> {
        self.objects.get(name).cloned()
    }

    /// Whether an object is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Object names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the directory holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_and_lists_sorted() {
        let mut dir = MemoryDirectory::new();
        assert!(dir.is_empty());

        dir.insert("runs.parquet", vec![1u8, 2]);
        dir.insert("events.parquet", vec![3u8]);
        dir.insert("runs.parquet", vec![4u8]);

        assert_eq!(dir.len(), 2);
        assert!(dir.contains("events.parquet"));
        assert_eq!(dir.get("runs.parquet").as_deref(), Some(&[4u8][..]));
        assert_eq!(
            dir.names().collect::<Vec<_>>(),
            vec!["events.parquet", "runs.parquet"]
        );
    }
}
