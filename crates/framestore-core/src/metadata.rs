//! Metadata models for stores.
//!
//! This module contains **pure** data types and non-IO validation errors:
//!
//! - [`Version`]: the three-component version tag a store was written with.
//! - [`DatamodelRegistry`]: datamodel definition texts keyed by name.
//! - [`GlobalMetadata`]: the once-per-store `metadata.json` object.
//! - [`CategoryStructure`]: the per-category structural metadata (stored
//!   collections and collection-id table) kept in each category file footer.
//!
//! Anything that touches a storage backend lives in `storage` or `reader`.

pub mod datamodel;
pub mod error;
pub mod global;
pub mod structure;
pub mod version;

pub use datamodel::{DatamodelDefinition, DatamodelRegistry};
pub use error::{MetadataError, MetadataResult};
pub use global::GlobalMetadata;
pub use structure::{CategoryStructure, CollectionTypeInfo, IdTableRecord};
pub use version::{ParseVersionError, Version};

/// Schema version of a collection type as recorded on file.
pub type SchemaVersion = u32;
