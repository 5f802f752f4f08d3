//! Errors raised while decoding or validating store metadata.

use snafu::prelude::*;

/// Errors that can occur while decoding global or structural metadata.
///
/// This enum contains **no storage backend errors**; IO failures are wrapped
/// at the reader boundary.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MetadataError {
    /// The metadata object is not valid JSON for the expected model.
    #[snafu(display("Invalid metadata JSON in {path}: {source}"))]
    InvalidJson {
        /// Where the metadata was read from.
        path: String,
        /// Underlying decode error.
        source: serde_json::Error,
    },

    /// A category file carries no structural metadata in its footer.
    #[snafu(display("Category file {path} has no structural metadata"))]
    MissingStructure {
        /// The category file.
        path: String,
    },

    /// The id table's id and name lists differ in length.
    #[snafu(display(
        "Collection id table in {path} is inconsistent: {ids} ids for {names} names"
    ))]
    IdTableShape {
        /// Where the id table was read from.
        path: String,
        /// Number of ids.
        ids: usize,
        /// Number of names.
        names: usize,
    },

    /// A stored collection refers to an id that is not in the id table.
    #[snafu(display("Collection id {id} in {path} is not present in the id table"))]
    UnknownCollectionId {
        /// Where the structural metadata was read from.
        path: String,
        /// The unresolvable collection id.
        id: u32,
    },
}

/// Convenience alias for metadata decoding results.
pub type MetadataResult<T> = Result<T, MetadataError>;
