//! Core reader for categorized, columnar event-frame stores.
//!
//! This crate provides the read path of `framestore`:
//!
//! - Storage binding for local store directories and externally owned
//!   in-memory directories (`storage` module).
//! - The on-disk naming conventions of a store (`layout` module).
//! - Serde models for the global metadata and the per-category structural
//!   metadata, plus the datamodel definition registry and the file version
//!   (`metadata` module).
//! - The shared collection-id table (`id_table` module) and the generic
//!   key/value parameter block read with every entry (`parameters` module).
//! - `FrameReader`, which discovers categories, binds per-category column
//!   accessors lazily, tracks per-category read cursors across chained
//!   files, and assembles the raw buffer set for one entry (`reader` module).
//!
//! Deserializing the raw buffers into typed collections and bundling them
//! into frames is left to higher layers, which consume [`reader::FrameData`].
#![deny(missing_docs)]
pub mod id_table;
pub mod layout;
pub mod metadata;
pub mod parameters;
pub mod reader;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_util;

pub use id_table::CollectionIdTable;
pub use metadata::{DatamodelRegistry, Version};
pub use parameters::{GenericParameters, ParameterValue};
pub use reader::{
    CollectionInfo, CollectionReadBuffers, FrameData, FrameReader, ReaderError, ReaderOptions,
    ReaderResult,
};
pub use storage::{MemoryDirectory, SourceLocation, StorageError};
