//! Chains of physical segments forming one logical category.
//!
//! Opening several stores together concatenates, per category, their
//! category files end to end. Entry `N` of the chain lives in segment `k` at
//! local entry `N - offset(k)`, where `offset(k)` is the number of entries in
//! all segments before `k`.

use std::sync::Arc;

use arrow::{
    array::RecordBatch,
    datatypes::{Schema, SchemaRef},
};
use parquet::arrow::{
    ProjectionMask,
    arrow_reader::{
        ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReaderBuilder, RowSelection,
        RowSelector,
    },
};
use snafu::prelude::*;

use crate::{
    layout,
    reader::{
        ReaderOptions,
        error::{ArrowReadSnafu, ParquetReadSnafu, ReaderResult, ShortReadSnafu, StorageSnafu},
    },
    storage::{self, SegmentHandle, SourceLocation},
};

/// One category file of one store, with its footer loaded.
#[derive(Debug)]
pub(crate) struct ChainSegment {
    pub(crate) path: String,
    handle: SegmentHandle,
    metadata: ArrowReaderMetadata,
    entries: u64,
    /// First entry of every row group, relative to the segment.
    row_group_starts: Vec<u64>,
}

impl ChainSegment {
    /// Open the file of `category` in `location` and load its footer.
    pub(crate) fn open(
        location: &SourceLocation,
        category: &str,
        options: &ReaderOptions,
    ) -> ReaderResult<Self> {
        let rel = layout::category_file(category);
        let path = location.describe(&rel);
        let handle = storage::open_segment(location, &rel).context(StorageSnafu)?;

        let reader_options = ArrowReaderOptions::new().with_page_index(options.page_index);
        let metadata = ArrowReaderMetadata::load(&handle, reader_options)
            .context(ParquetReadSnafu { path: &path })?;

        let mut row_group_starts = Vec::with_capacity(metadata.metadata().num_row_groups());
        let mut entries = 0u64;
        for rg in metadata.metadata().row_groups() {
            row_group_starts.push(entries);
            entries += u64::try_from(rg.num_rows()).unwrap_or(0);
        }

        Ok(Self {
            path,
            handle,
            metadata,
            entries,
            row_group_starts,
        })
    }

    pub(crate) fn entries(&self) -> u64 {
        self.entries
    }

    /// Arrow schema of the segment; its top-level field positions are the
    /// Parquet root column indices used for projection.
    pub(crate) fn schema(&self) -> &SchemaRef {
        self.metadata.schema()
    }

    /// Footer key-value metadata entry stored under `key`.
    pub(crate) fn footer_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .metadata()
            .file_metadata()
            .key_value_metadata()?
            .iter()
            .find(|kv| kv.key == key)?
            .value
            .as_deref()
    }

    /// Row group holding `local` and the row offset within it.
    fn row_group_of(&self, local: u64) -> (usize, u64) {
        let rg = self
            .row_group_starts
            .partition_point(|&start| start <= local)
            .saturating_sub(1);
        let start = self.row_group_starts.get(rg).copied().unwrap_or(0);
        (rg, local - start)
    }

    /// Read the given root columns of local entry `local` as a one-row batch.
    ///
    /// Only the row group holding the entry is touched, and only the
    /// requested columns are decoded.
    pub(crate) fn read_row(&self, local: u64, roots: &[usize]) -> ReaderResult<RecordBatch> {
        if roots.is_empty() {
            return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
        }

        let (rg, row) = self.row_group_of(local);
        let mut selectors = Vec::with_capacity(2);
        if row > 0 {
            selectors.push(RowSelector::skip(row as usize));
        }
        selectors.push(RowSelector::select(1));

        let builder =
            ParquetRecordBatchReaderBuilder::new_with_metadata(self.handle.clone(), self.metadata.clone());
        let mask = ProjectionMask::roots(builder.parquet_schema(), roots.iter().copied());
        let mut reader = builder
            .with_row_groups(vec![rg])
            .with_projection(mask)
            .with_row_selection(RowSelection::from(selectors))
            .with_batch_size(1)
            .build()
            .context(ParquetReadSnafu { path: &self.path })?;

        match reader.next() {
            Some(batch) => batch.context(ArrowReadSnafu { path: &self.path }),
            None => ShortReadSnafu {
                path: &self.path,
                entry: local,
            }
            .fail(),
        }
    }
}

/// The segments of one category, in open order.
#[derive(Debug)]
pub(crate) struct Chain {
    segments: Vec<ChainSegment>,
    /// First chain entry of every segment.
    offsets: Vec<u64>,
    entries: u64,
}

impl Chain {
    pub(crate) fn new(segments: Vec<ChainSegment>) -> Self {
        let mut offsets = Vec::with_capacity(segments.len());
        let mut entries = 0u64;
        for segment in &segments {
            offsets.push(entries);
            entries += segment.entries();
        }

        Self {
            segments,
            offsets,
            entries,
        }
    }

    /// Total number of entries over all segments.
    pub(crate) fn entries(&self) -> u64 {
        self.entries
    }

    /// The first segment, whose structural metadata is authoritative.
    pub(crate) fn first(&self) -> Option<&ChainSegment> {
        self.segments.first()
    }

    pub(crate) fn segment(&self, index: usize) -> &ChainSegment {
        &self.segments[index]
    }

    /// Map a chain entry to `(segment index, local entry)`.
    ///
    /// Empty segments are never returned; entries at or past the end yield
    /// `None`.
    pub(crate) fn locate(&self, entry: u64) -> Option<(usize, u64)> {
        if entry >= self.entries {
            return None;
        }
        let index = self.offsets.partition_point(|&start| start <= entry) - 1;
        Some((index, entry - self.offsets[index]))
    }
}
