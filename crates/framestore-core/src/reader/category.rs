//! Category store and lazy category initialization.

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use log::debug;
use snafu::prelude::*;

use crate::{
    id_table::CollectionIdTable,
    layout,
    metadata::{CategoryStructure, SchemaVersion, error::MissingStructureSnafu},
    reader::{
        branches::{CollectionBranches, ParameterBranches},
        chain::Chain,
        error::{MetadataSnafu, ReaderResult},
    },
};

/// Immutable type information of one stored collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionInfo {
    /// Fully qualified collection type name.
    pub type_name: String,
    /// Whether the collection only references objects of another collection.
    pub is_subset: bool,
    /// Schema version the collection was written with.
    pub schema_version: SchemaVersion,
    /// Position of the collection's accessors in the category's branch cache.
    pub branch_index: usize,
}

/// Mutable read state of one category.
///
/// Owned by the [`CategoryStore`] and only handed out by `&mut`.
#[derive(Debug)]
pub(crate) struct CategoryInfo {
    pub(crate) name: String,
    /// `None` for categories that no source provides.
    pub(crate) chain: Option<Chain>,
    /// Next entry to read.
    pub(crate) entry: u64,
    /// Stored collections, in stored order.
    pub(crate) stored: Vec<(String, CollectionInfo)>,
    /// Branch cache, parallel to `stored`.
    pub(crate) branches: Vec<CollectionBranches>,
    pub(crate) params: ParameterBranches,
    /// Segment the branch cache is currently resolved against.
    pub(crate) bound_segment: Option<usize>,
    pub(crate) id_table: Arc<CollectionIdTable>,
}

impl CategoryInfo {
    fn new(name: &str, chain: Option<Chain>, layout: CategoryLayout) -> Self {
        Self {
            name: name.to_string(),
            chain,
            entry: 0,
            stored: layout.stored,
            branches: layout.branches,
            params: ParameterBranches::default(),
            bound_segment: None,
            id_table: Arc::new(layout.id_table),
        }
    }

    /// Number of entries over the whole chain.
    pub(crate) fn entries(&self) -> u64 {
        self.chain.as_ref().map_or(0, Chain::entries)
    }
}

/// What a category's structural metadata yields.
#[derive(Debug, Default)]
pub(crate) struct CategoryLayout {
    pub(crate) stored: Vec<(String, CollectionInfo)>,
    pub(crate) branches: Vec<CollectionBranches>,
    pub(crate) id_table: CollectionIdTable,
}

/// Read the structural metadata of `name` from the first segment of `chain`.
///
/// A missing chain, or a chain without segments, yields an empty layout.
pub(crate) fn init_category(name: &str, chain: Option<&Chain>) -> ReaderResult<CategoryLayout> {
    let Some(first) = chain.and_then(Chain::first) else {
        debug!("category {name}: no data, initialized empty");
        return Ok(CategoryLayout::default());
    };

    let path = &first.path;
    let json = first
        .footer_value(layout::COLLECTIONS_METADATA_KEY)
        .context(MissingStructureSnafu { path })
        .context(MetadataSnafu)?;
    let structure = CategoryStructure::from_json(json, path).context(MetadataSnafu)?;
    let id_table = structure.id_table(path).context(MetadataSnafu)?;
    let resolved = structure
        .resolve_collections(&id_table, path)
        .context(MetadataSnafu)?;

    let mut stored = Vec::with_capacity(resolved.len());
    let mut branches = Vec::with_capacity(resolved.len());
    for (branch_index, collection) in resolved.iter().enumerate() {
        branches.push(CollectionBranches::for_collection(collection.name, collection.info));
        stored.push((
            collection.name.to_string(),
            CollectionInfo {
                type_name: collection.info.type_name.clone(),
                is_subset: collection.info.is_subset,
                schema_version: collection.info.schema_version,
                branch_index,
            },
        ));
    }

    debug!(
        "category {name}: initialized {} collections from {path}",
        stored.len()
    );
    Ok(CategoryLayout {
        stored,
        branches,
        id_table,
    })
}

/// All categories of a reader: chains built at open, and the categories
/// initialized from them so far.
#[derive(Debug, Default)]
pub(crate) struct CategoryStore {
    pending: HashMap<String, Chain>,
    categories: HashMap<String, CategoryInfo>,
}

impl CategoryStore {
    pub(crate) fn new(chains: impl IntoIterator<Item = (String, Chain)>) -> Self {
        Self {
            pending: chains.into_iter().collect(),
            categories: HashMap::new(),
        }
    }

    /// The state of `name`, initializing it on first access.
    ///
    /// If initialization fails the chain stays pending and the next access
    /// tries again.
    pub(crate) fn get_or_init(&mut self, name: &str) -> ReaderResult<&mut CategoryInfo> {
        match self.categories.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let layout = init_category(name, self.pending.get(name))?;
                let chain = self.pending.remove(name);
                Ok(entry.insert(CategoryInfo::new(name, chain, layout)))
            }
        }
    }

    /// Number of entries of `name`, without initializing it.
    pub(crate) fn entries(&self, name: &str) -> u64 {
        match self.categories.get(name) {
            Some(info) => info.entries(),
            None => self.pending.get(name).map_or(0, Chain::entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        reader::{ReaderOptions, chain::ChainSegment},
        storage::SourceLocation,
        test_util::{GOOD_HITS_ID, HITS_ID, StoreFixture, TestResult, memory_store},
    };

    fn events_chain(entries: usize) -> Result<Chain, Box<dyn std::error::Error>> {
        let dir = Arc::new(memory_store(&StoreFixture::events(entries))?);
        let segment = ChainSegment::open(
            &SourceLocation::memory(dir),
            "events",
            &ReaderOptions::default(),
        )?;
        Ok(Chain::new(vec![segment]))
    }

    #[test]
    fn initializes_stored_collections_in_order() -> TestResult {
        let chain = events_chain(2)?;
        let layout = init_category("events", Some(&chain))?;

        let names: Vec<_> = layout.stored.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["hits", "good_hits", "clusters"]);
        assert_eq!(layout.branches.len(), 3);
        assert!(layout.branches.iter().all(|b| !b.is_resolved()));

        let (_, good_hits) = &layout.stored[1];
        assert!(good_hits.is_subset);
        assert_eq!(good_hits.branch_index, 1);
        assert_eq!(layout.id_table.collection_id("hits"), Some(HITS_ID));
        assert_eq!(layout.id_table.name(GOOD_HITS_ID), Some("good_hits"));
        Ok(())
    }

    #[test]
    fn unknown_category_is_empty_and_initialized_once() -> TestResult {
        let mut store = CategoryStore::new([("events".to_string(), events_chain(4)?)]);

        assert_eq!(store.entries("events"), 4);
        assert_eq!(store.entries("runs"), 0);

        let runs = store.get_or_init("runs")?;
        assert!(runs.chain.is_none());
        assert!(runs.stored.is_empty());
        assert_eq!(runs.entries(), 0);

        let events = store.get_or_init("events")?;
        events.entry = 2;
        let events = store.get_or_init("events")?;
        assert_eq!(events.entry, 2);
        assert_eq!(events.entries(), 4);
        assert_eq!(store.entries("events"), 4);
        Ok(())
    }
}
