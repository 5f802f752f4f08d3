//! Error types and SNAFU context selectors for `reader`.
//!
//! Ordinary end-of-data conditions (unknown category, entry past the end) are
//! not errors: the read operations return `Ok(None)` for them. Everything in
//! this enum is a failure that the reader does not recover from internally.

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use snafu::{Backtrace, prelude::*};

use crate::{metadata::MetadataError, storage::StorageError};

/// Errors from opening stores and reading entries.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReaderError {
    /// An open was requested with an empty list of sources.
    #[snafu(display("No sources given; at least one store is required"))]
    NoSources,

    /// A source, its global metadata, or one of its segments could not be
    /// accessed.
    #[snafu(display("Storage error: {source}"))]
    Storage {
        /// Underlying storage error.
        #[snafu(source, backtrace)]
        source: StorageError,
    },

    /// Global or structural metadata could not be decoded or is inconsistent.
    #[snafu(display("Metadata error: {source}"))]
    Metadata {
        /// Underlying metadata error.
        source: MetadataError,
    },

    /// Parquet footer or page decoding failed.
    #[snafu(display("Parquet read error in {path}: {source}"))]
    ParquetRead {
        /// The segment being read.
        path: String,
        /// Underlying parquet error.
        source: ParquetError,
        /// Diagnostic backtrace for this error.
        backtrace: Backtrace,
    },

    /// Arrow decoding of an entry failed.
    #[snafu(display("Arrow read error in {path}: {source}"))]
    ArrowRead {
        /// The segment being read.
        path: String,
        /// Underlying Arrow error.
        source: ArrowError,
        /// Diagnostic backtrace for this error.
        backtrace: Backtrace,
    },

    /// A column required by a stored collection or by the parameter block is
    /// absent from a segment.
    #[snafu(display("Missing column {column} in {path}"))]
    MissingColumn {
        /// The segment missing the column.
        path: String,
        /// Name of the missing column.
        column: String,
    },

    /// A column exists but is not a list column.
    #[snafu(display("Column {column} in {path} has unexpected type {datatype}"))]
    UnexpectedColumnType {
        /// The segment holding the column.
        path: String,
        /// Name of the column.
        column: String,
        /// The Arrow data type found.
        datatype: String,
    },

    /// The keys and values of one parameter kind disagree in length.
    #[snafu(display(
        "Parameter block of kind {kind} in {path} has {keys} keys but {values} value vectors"
    ))]
    ParameterShape {
        /// The segment holding the parameters.
        path: String,
        /// Parameter value kind (`int`, `float`, `double`, `string`).
        kind: String,
        /// Number of keys.
        keys: usize,
        /// Number of value vectors.
        values: usize,
    },

    /// A parameter value vector holds a null value.
    #[snafu(display("Parameter {key} of kind {kind} in {path} holds a null value"))]
    NullParameterValue {
        /// The segment holding the parameters.
        path: String,
        /// Parameter value kind.
        kind: String,
        /// The parameter key.
        key: String,
    },

    /// A category name from the global metadata cannot name a file inside a
    /// store.
    #[snafu(display("Invalid category name {name:?} in {path}"))]
    InvalidCategoryName {
        /// Where the category list was read from.
        path: String,
        /// The rejected name.
        name: String,
    },

    /// A selective read named a collection the category does not store.
    #[snafu(display("Collection {collection} is not stored in category {category}"))]
    UnknownCollection {
        /// The category being read.
        category: String,
        /// The requested collection.
        collection: String,
    },

    /// The storage engine returned no row for an entry within bounds.
    #[snafu(display("No row returned for local entry {entry} of {path}"))]
    ShortRead {
        /// The segment being read.
        path: String,
        /// The local entry within the segment.
        entry: u64,
    },
}

/// Convenience alias for reader results.
#[allow(clippy::result_large_err)]
pub type ReaderResult<T> = Result<T, ReaderError>;
