use std::{fs::File, io::Read, sync::Arc};

use bytes::Bytes;
use parquet::{
    errors::Result as ParquetResult,
    file::reader::{ChunkReader, Length},
};

#[derive(Debug)]
enum SegmentData {
    Local(File),
    Memory(Bytes),
}

/// A cheaply cloneable handle to one physical per-category Parquet file.
///
/// Implements `ChunkReader`, so it can be handed to
/// `ParquetRecordBatchReaderBuilder` once per read without reopening the
/// file. Local files are read by byte range on demand; in-memory segments
/// hand out slices of the shared buffer.
#[derive(Clone, Debug)]
pub struct SegmentHandle {
    inner: Arc<SegmentData>,
}

impl SegmentHandle {
    pub(crate) fn local(file: File) -> Self {
        Self {
            inner: Arc::new(SegmentData::Local(file)),
        }
    }

    pub(crate) fn memory(bytes: Bytes) -> Self {
        Self {
            inner: Arc::new(SegmentData::Memory(bytes)),
        }
    }
}

impl Length for SegmentHandle {
    fn len(&self) -> u64 {
        match self.inner.as_ref() {
            SegmentData::Local(file) => Length::len(file),
            SegmentData::Memory(bytes) => bytes.len() as u64,
        }
    }
}

impl ChunkReader for SegmentHandle {
    type T = Box<dyn Read + Send>;

    fn get_read(&self, start: u64) -> ParquetResult<Self::T> {
        match self.inner.as_ref() {
            SegmentData::Local(file) => Ok(Box::new(ChunkReader::get_read(file, start)?)),
            SegmentData::Memory(bytes) => Ok(Box::new(ChunkReader::get_read(bytes, start)?)),
        }
    }

    fn get_bytes(&self, start: u64, length: usize) -> ParquetResult<Bytes> {
        match self.inner.as_ref() {
            SegmentData::Local(file) => ChunkReader::get_bytes(file, start, length),
            SegmentData::Memory(bytes) => ChunkReader::get_bytes(bytes, start, length),
        }
    }
}
