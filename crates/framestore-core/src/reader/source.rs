//! Binding a reader to its sources at open time.

use std::collections::HashSet;

use log::{debug, warn};
use snafu::prelude::*;

use crate::{
    layout,
    metadata::GlobalMetadata,
    reader::{
        ReaderOptions,
        chain::{Chain, ChainSegment},
        error::{
            InvalidCategoryNameSnafu, MetadataSnafu, NoSourcesSnafu, ReaderResult, StorageSnafu,
        },
    },
    storage::{self, SourceLocation},
};

/// Everything known after open: the first source's global metadata and one
/// chain per category.
#[derive(Debug)]
pub(crate) struct BoundSources {
    pub(crate) metadata: GlobalMetadata,
    pub(crate) chains: Vec<(String, Chain)>,
}

/// Read the global metadata of the first source and open the segment of
/// every category in every source, in source order.
pub(crate) fn bind_sources(
    sources: &[SourceLocation],
    options: &ReaderOptions,
) -> ReaderResult<BoundSources> {
    let first = sources.first().context(NoSourcesSnafu)?;

    let metadata_path = first.describe(layout::METADATA_FILE);
    let bytes = storage::read_all_bytes(first, layout::METADATA_FILE).context(StorageSnafu)?;
    let mut metadata =
        GlobalMetadata::from_json_slice(&bytes, &metadata_path).context(MetadataSnafu)?;

    if let Some(name) = metadata
        .categories
        .iter()
        .find(|name| !layout::is_valid_category_name(name))
    {
        return InvalidCategoryNameSnafu {
            path: metadata_path,
            name: name.as_str(),
        }
        .fail();
    }

    let mut seen = HashSet::with_capacity(metadata.categories.len());
    metadata.categories.retain(|name| {
        let fresh = seen.insert(name.clone());
        if !fresh {
            warn!("{first}: category {name} listed twice, ignoring duplicate");
        }
        fresh
    });

    let mut chains = Vec::with_capacity(metadata.categories.len());
    for category in &metadata.categories {
        let segments = sources
            .iter()
            .map(|source| ChainSegment::open(source, category, options))
            .collect::<ReaderResult<Vec<_>>>()?;
        let chain = Chain::new(segments);
        debug!(
            "category {category}: {} entries over {} sources",
            chain.entries(),
            sources.len()
        );
        chains.push((category.clone(), chain));
    }

    debug!(
        "opened {} sources, version {}, categories {:?}",
        sources.len(),
        metadata.version,
        metadata.categories
    );
    Ok(BoundSources { metadata, chains })
}
