//! # framestore
//!
//! Read categorized event frames from one or more chained columnar stores.
//!
//! This crate is the supported public entry point and provides a small, stable surface.
//!
//! ## Example
//!
//! ```rust,no_run
//! use framestore::prelude::*;
//!
//! # fn main() -> Result<(), ReaderError> {
//! let mut reader = FrameReader::open_files(["run1", "run2"])?;
//! while let Some(mut frame) = reader.read_next_entry("events")? {
//!     if let Some(hits) = frame.take_collection_buffers("hits") {
//!         println!("{} hits of type {}", hits.len(), hits.type_name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Convenience prelude with the stable, supported surface.
pub mod prelude;

/// Storage namespace (wrapper-only).
pub mod storage {
    pub use framestore_core::storage::{BackendError, MemoryDirectory, SourceLocation, StorageError};
}

/// Metadata namespace (wrapper-only).
pub mod metadata {
    pub use framestore_core::metadata::{
        DatamodelDefinition, DatamodelRegistry, MetadataError, ParseVersionError, SchemaVersion,
        Version,
    };
}

pub use framestore_core::id_table::CollectionIdTable;
pub use framestore_core::metadata::Version;
pub use framestore_core::parameters::{GenericParameters, ParameterValue};
pub use framestore_core::reader::{
    CollectionInfo, CollectionReadBuffers, FrameData, FrameReader, ReaderError, ReaderOptions,
    ReaderResult,
};
pub use framestore_core::storage::{MemoryDirectory, SourceLocation};
