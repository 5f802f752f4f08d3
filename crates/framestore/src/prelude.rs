//! Wrapper prelude.
//!
//! The `framestore` crate is the supported public entry point.
//! Downstream code should prefer importing from this prelude instead of
//! depending on internal core module paths.

pub use crate::{
    CollectionIdTable, CollectionInfo, CollectionReadBuffers, FrameData, FrameReader,
    GenericParameters, MemoryDirectory, ParameterValue, ReaderError, ReaderOptions, ReaderResult,
    SourceLocation, Version,
};
