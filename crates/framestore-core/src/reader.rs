//! Categorized, multi-file sequential reader.
//!
//! A [`FrameReader`] is opened over one or more stores that together form
//! one logical dataset. At open time it reads the global metadata of the
//! first store (file version, datamodel definitions, category names) and
//! chains, per category, the category files of every store in the order
//! given. Nothing else is read up front:
//!
//! - A category is initialized on first access from the structural metadata
//!   of its first file; every later file must use the same layout.
//! - Column accessors are resolved per physical file and re-resolved when a
//!   read crosses from one file into the next.
//! - Each read touches one row group of one file and decodes only the
//!   columns of the requested collections plus the parameter block.
//!
//! Every category keeps its own cursor for [`FrameReader::read_next_entry`].
//! Entries past the end and categories no store provides are not errors:
//! reads return `Ok(None)` and [`FrameReader::entries`] returns `0`.

mod assemble;
mod branches;
mod category;
mod chain;
pub mod error;
mod frame_data;
mod source;


use std::{path::PathBuf, sync::Arc};

pub use category::CollectionInfo;
pub use error::{ReaderError, ReaderResult};
pub use frame_data::{CollectionReadBuffers, FrameData};

use crate::{
    metadata::{DatamodelRegistry, Version},
    storage::{MemoryDirectory, SourceLocation},
};
use category::CategoryStore;

/// Options applied when opening a reader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Load the Parquet page index together with each file footer, so
    /// single-entry reads can skip pages inside a row group.
    pub page_index: bool,
}

/// Reader over one or more chained stores.
///
/// Not safe for concurrent use: every read takes `&mut self`. Separate
/// readers over the same stores are independent.
#[derive(Debug)]
pub struct FrameReader {
    sources: Vec<SourceLocation>,
    version: Version,
    datamodels: DatamodelRegistry,
    category_names: Vec<String>,
    store: CategoryStore,
}

impl FrameReader {
    /// Open a single store directory.
    pub fn open_file(path: impl Into<PathBuf>) -> ReaderResult<Self> {
        Self::open_files([path])
    }

    /// Open several store directories as one chain, in the given order.
    pub fn open_files<P: Into<PathBuf>>(paths: impl IntoIterator<Item = P>) -> ReaderResult<Self> {
        Self::open_files_with(paths, ReaderOptions::default())
    }

    /// Like [`Self::open_files`], with explicit options.
    pub fn open_files_with<P: Into<PathBuf>>(
        paths: impl IntoIterator<Item = P>,
        options: ReaderOptions,
    ) -> ReaderResult<Self> {
        let sources = paths.into_iter().map(SourceLocation::local).collect();
        Self::open_locations(sources, options)
    }

    /// Open a store held in an externally owned in-memory directory.
    ///
    /// The directory is shared, not copied; its objects must stay unchanged
    /// for the lifetime of the reader.
    pub fn open_external(dir: Arc<MemoryDirectory>) -> ReaderResult<Self> {
        Self::open_locations(vec![SourceLocation::memory(dir)], ReaderOptions::default())
    }

    /// Open an arbitrary list of sources as one chain.
    pub fn open_locations(
        sources: Vec<SourceLocation>,
        options: ReaderOptions,
    ) -> ReaderResult<Self> {
        let bound = source::bind_sources(&sources, &options)?;
        let metadata = bound.metadata;

        Ok(Self {
            sources,
            version: metadata.version,
            datamodels: DatamodelRegistry::new(metadata.datamodels),
            category_names: metadata.categories,
            store: CategoryStore::new(bound.chains),
        })
    }

    /// Read the next entry of `category` and advance its cursor.
    pub fn read_next_entry(&mut self, category: &str) -> ReaderResult<Option<FrameData>> {
        let info = self.store.get_or_init(category)?;
        let entry = info.entry;
        info.read(entry, None)
    }

    /// Read entry `index` of `category`.
    ///
    /// The next call to [`Self::read_next_entry`] continues at `index + 1`.
    /// An out-of-range `index` returns `None` and leaves the cursor alone.
    pub fn read_entry(&mut self, category: &str, index: u64) -> ReaderResult<Option<FrameData>> {
        self.store.get_or_init(category)?.read(index, None)
    }

    /// Like [`Self::read_next_entry`], reading only the named collections.
    ///
    /// Naming a collection the category does not store is an error.
    pub fn read_next_entry_with<S: AsRef<str>>(
        &mut self,
        category: &str,
        collections: &[S],
    ) -> ReaderResult<Option<FrameData>> {
        let info = self.store.get_or_init(category)?;
        let entry = info.entry;
        Self::read_selected(info, entry, collections)
    }

    /// Like [`Self::read_entry`], reading only the named collections.
    pub fn read_entry_with<S: AsRef<str>>(
        &mut self,
        category: &str,
        index: u64,
        collections: &[S],
    ) -> ReaderResult<Option<FrameData>> {
        let info = self.store.get_or_init(category)?;
        Self::read_selected(info, index, collections)
    }

    fn read_selected<S: AsRef<str>>(
        info: &mut category::CategoryInfo,
        entry: u64,
        collections: &[S],
    ) -> ReaderResult<Option<FrameData>> {
        if info.chain.is_none() {
            return Ok(None);
        }
        let selection = info.select(collections)?;
        info.read(entry, Some(&selection))
    }

    /// Number of entries of `category` over all chained stores; `0` if no
    /// store provides it.
    pub fn entries(&self, category: &str) -> u64 {
        self.store.entries(category)
    }

    /// Category names in the order of the first store's global metadata.
    pub fn available_categories(&self) -> Vec<&str> {
        self.category_names.iter().map(String::as_str).collect()
    }

    /// Version the first store was written with.
    pub fn current_file_version(&self) -> Version {
        self.version
    }

    /// Definition text of datamodel `name`, or `"{}"` if unknown.
    pub fn datamodel_definition(&self, name: &str) -> &str {
        self.datamodels.definition(name)
    }

    /// Names of all datamodels with stored definitions.
    pub fn available_datamodels(&self) -> Vec<String> {
        self.datamodels.available()
    }

    /// Stored collections of `category` with their type information, in
    /// stored order. Initializes the category if needed.
    pub fn collections(&mut self, category: &str) -> ReaderResult<Vec<(String, CollectionInfo)>> {
        Ok(self.store.get_or_init(category)?.stored.clone())
    }

    /// The sources this reader was opened over, in chain order.
    pub fn sources(&self) -> &[SourceLocation] {
        &self.sources
    }
}
