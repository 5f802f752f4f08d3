//! Storage binding for store sources.
//!
//! This module centralizes all source access for `framestore-core`. A store
//! is either a directory on the local filesystem or an externally owned
//! [`MemoryDirectory`] of named byte objects (for example, a store received
//! over a stream and never written to disk). Both are addressed through
//! [`SourceLocation`], and higher layers only ever ask for:
//!
//! - the raw bytes of a small object (the global metadata), and
//! - a [`SegmentHandle`] for a per-category Parquet file, which implements
//!   `parquet`'s `ChunkReader` so footers and single entries can be read
//!   without loading the whole file.
//!
//! All access is synchronous and blocking. No retries are performed here;
//! transient I/O errors surface to the caller as [`StorageError`].

mod error;
mod memory;
mod segment;

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use bytes::Bytes;
use snafu::{Backtrace, prelude::*};

pub use error::{BackendError, StorageError};
pub use memory::MemoryDirectory;
pub use segment::SegmentHandle;

use error::{NotFoundSnafu, OtherIoSnafu};

/// General result type used by storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Where a single store lives.
///
/// A reader opened over several locations treats them as one logical chain,
/// in the order given.
#[derive(Clone, Debug)]
pub enum SourceLocation {
    /// A store directory on the local filesystem.
    Local(PathBuf),
    /// An in-memory directory owned by the caller and shared with the reader.
    Memory(Arc<MemoryDirectory>),
}

impl SourceLocation {
    /// Creates a new `SourceLocation` for a local store directory.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        SourceLocation::Local(root.into())
    }

    /// Creates a new `SourceLocation` bound to a shared in-memory directory.
    pub fn memory(dir: Arc<MemoryDirectory>) -> Self {
        SourceLocation::Memory(dir)
    }

    /// Human-readable path of `rel_path` inside this location, used in errors
    /// and logs.
    pub fn describe(&self, rel_path: &str) -> String {
        match self {
            SourceLocation::Local(root) => root.join(rel_path).display().to_string(),
            SourceLocation::Memory(_) => format!("memory://{rel_path}"),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Local(root) => write!(f, "{}", root.display()),
            SourceLocation::Memory(dir) => write!(f, "memory ({} objects)", dir.len()),
        }
    }
}

fn join_local(root: &Path, rel_path: &str) -> PathBuf {
    root.join(rel_path)
}

fn missing_object(path: String) -> StorageError {
    StorageError::NotFound {
        path,
        source: BackendError::MissingObject,
        backtrace: Backtrace::capture(),
    }
}

/// Read the full contents of the object at `rel_path` within `location`.
///
/// Errors:
/// - If the object does not exist this returns `StorageError::NotFound`.
/// - On any other I/O error this returns `StorageError::OtherIo`.
pub fn read_all_bytes(location: &SourceLocation, rel_path: &str) -> StorageResult<Bytes> {
    match location {
        SourceLocation::Local(root) => {
            let abs = join_local(root, rel_path);
            let path_str = abs.display().to_string();

            match fs::read(&abs) {
                Ok(bytes) => Ok(Bytes::from(bytes)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    Err(BackendError::Local(e)).context(NotFoundSnafu { path: path_str })
                }
                Err(e) => Err(BackendError::Local(e)).context(OtherIoSnafu { path: path_str }),
            }
        }
        SourceLocation::Memory(dir) => dir
            .get(rel_path)
            .ok_or_else(|| missing_object(location.describe(rel_path))),
    }
}

/// Open the segment at `rel_path` within `location` for columnar reads.
///
/// Local files are opened, not read; the returned handle reads byte ranges on
/// demand. In-memory objects are shared by reference count, never copied.
///
/// Semantics:
/// - On missing file or object: `StorageError::NotFound`.
/// - A local path that exists but is not a regular file is also reported as
///   `StorageError::NotFound`.
/// - On other I/O problems: `StorageError::OtherIo`.
pub fn open_segment(location: &SourceLocation, rel_path: &str) -> StorageResult<SegmentHandle> {
    match location {
        SourceLocation::Local(root) => {
            let abs = join_local(root, rel_path);
            let path_str = abs.display().to_string();

            let meta = match fs::metadata(&abs) {
                Ok(m) => m,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(BackendError::Local(e)).context(NotFoundSnafu { path: path_str });
                }
                Err(e) => {
                    return Err(BackendError::Local(e)).context(OtherIoSnafu { path: path_str });
                }
            };

            if !meta.is_file() {
                let synthetic = io::Error::other("not a regular file");
                return Err(BackendError::Local(synthetic)).context(NotFoundSnafu { path: path_str });
            }

            let file = fs::File::open(&abs)
                .map_err(BackendError::Local)
                .context(OtherIoSnafu { path: path_str })?;

            Ok(SegmentHandle::local(file))
        }
        SourceLocation::Memory(dir) => dir
            .get(rel_path)
            .map(SegmentHandle::memory)
            .ok_or_else(|| missing_object(location.describe(rel_path))),
    }
}
