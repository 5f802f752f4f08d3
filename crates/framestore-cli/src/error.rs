use arrow::error::ArrowError;
use framestore_core::ReaderError;

use snafu::Snafu;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(display(
        "Failed to open store(s) {stores}. \
         Ensure each path is a store directory with metadata.json and one file per category."
    ))]
    OpenStore {
        stores: String,
        #[snafu(source(from(ReaderError, Box::new)))]
        source: Box<ReaderError>,
    },

    #[snafu(display("Category '{category}' not found. Available categories: {available}"))]
    UnknownCategory { category: String, available: String },

    #[snafu(display("Datamodel '{name}' not found. Available datamodels: {available}"))]
    UnknownDatamodel { name: String, available: String },

    #[snafu(display("Failed to read entry {entry} of category '{category}': {source}"))]
    ReadEntry {
        category: String,
        entry: u64,
        #[snafu(source(from(ReaderError, Box::new)))]
        source: Box<ReaderError>,
    },

    #[snafu(display("Failed to list collections of category '{category}': {source}"))]
    ListCollections {
        category: String,
        #[snafu(source(from(ReaderError, Box::new)))]
        source: Box<ReaderError>,
    },

    #[snafu(display("Failed to format values of collection '{collection}': {source}"))]
    FormatValues {
        collection: String,
        source: ArrowError,
    },
}

/// Join names for error messages; `(none)` when empty.
pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    if names.is_empty() {
        return "(none)".to_string();
    }
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}
