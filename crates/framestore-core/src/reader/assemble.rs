//! Assembles the buffer set of one entry of a category.

use std::sync::Arc;

use log::debug;
use snafu::prelude::*;

use crate::reader::{
    category::CategoryInfo,
    error::{ReaderResult, UnknownCollectionSnafu},
    frame_data::FrameData,
};

impl CategoryInfo {
    /// Stored indices of the collections named in `names`, in stored order.
    pub(crate) fn select<S: AsRef<str>>(&self, names: &[S]) -> ReaderResult<Vec<usize>> {
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let index = self
                .stored
                .iter()
                .position(|(stored, _)| stored == name)
                .context(UnknownCollectionSnafu {
                    category: &self.name,
                    collection: name,
                })?;
            selected.push(index);
        }
        selected.sort_unstable();
        selected.dedup();
        Ok(selected)
    }

    /// Read `entry`, or return `None` if it is past the end.
    ///
    /// `selection` restricts the read to the given stored indices; `None`
    /// reads every stored collection. On success the cursor moves to
    /// `entry + 1`; otherwise it is left untouched.
    pub(crate) fn read(
        &mut self,
        entry: u64,
        selection: Option<&[usize]>,
    ) -> ReaderResult<Option<FrameData>> {
        let Some(chain) = &self.chain else {
            return Ok(None);
        };
        let Some((segment_index, local)) = chain.locate(entry) else {
            return Ok(None);
        };
        let segment = chain.segment(segment_index);

        if self.bound_segment != Some(segment_index) {
            debug!(
                "category {}: binding branches to {} at entry {entry}",
                self.name, segment.path
            );
            for branches in &mut self.branches {
                branches.invalidate();
            }
            self.params.invalidate();
            self.bound_segment = Some(segment_index);
        }

        let indices: Vec<usize> = match selection {
            Some(indices) => indices.to_vec(),
            None => (0..self.stored.len()).collect(),
        };

        let mut roots = Vec::new();
        for &index in &indices {
            let branch_index = self.stored[index].1.branch_index;
            roots.extend_from_slice(self.branches[branch_index].resolve(segment)?);
        }
        roots.extend(self.params.resolve(segment)?);
        roots.sort_unstable();
        roots.dedup();

        let batch = segment.read_row(local, &roots)?;

        let mut buffers = Vec::with_capacity(indices.len());
        for &index in &indices {
            let (name, info) = &self.stored[index];
            let collection =
                self.branches[info.branch_index].read_buffers(&batch, info, &segment.path)?;
            buffers.push((name.clone(), collection));
        }
        let parameters = self.params.decode(&batch, &segment.path)?;

        self.entry = entry + 1;
        Ok(Some(FrameData::new(
            buffers,
            Arc::clone(&self.id_table),
            parameters,
        )))
    }
}
