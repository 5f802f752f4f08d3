//! The raw buffer set of one entry.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef};

use crate::{
    id_table::CollectionIdTable, metadata::SchemaVersion, parameters::GenericParameters,
};

/// Undeserialized column data of one collection in one entry.
///
/// Every array holds the values of one list column for the entry being read:
/// `data` the collection's objects, `references` one array per relation (or,
/// for a subset collection, its object ids), and `vector_members` one array
/// per vector member. Turning these into typed objects is up to the caller,
/// guided by `type_name` and `schema_version`.
#[derive(Clone, Debug)]
pub struct CollectionReadBuffers {
    /// Fully qualified collection type name.
    pub type_name: String,
    /// Schema version the collection was written with.
    pub schema_version: SchemaVersion,
    /// Whether the collection only references objects of another collection.
    pub is_subset: bool,
    /// Object data; `None` for subset collections.
    pub data: Option<ArrayRef>,
    /// Relation object ids, in relation order; for subsets the object ids.
    pub references: Vec<ArrayRef>,
    /// `(member name, values)` for every vector member.
    pub vector_members: Vec<(String, ArrayRef)>,
}

impl CollectionReadBuffers {
    /// Number of objects in the collection for this entry.
    pub fn len(&self) -> usize {
        match (&self.data, self.references.first()) {
            (Some(data), _) => data.len(),
            (None, Some(ids)) => ids.len(),
            (None, None) => 0,
        }
    }

    /// Whether the collection holds no objects for this entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything read for one entry of one category.
///
/// Holds the buffers of every read collection in stored order, the
/// category's collection-id table (shared with the reader and with every
/// other `FrameData` of the category) and the entry's parameters.
#[derive(Debug)]
pub struct FrameData {
    buffers: Vec<(String, CollectionReadBuffers)>,
    id_table: Arc<CollectionIdTable>,
    parameters: GenericParameters,
}

impl FrameData {
    pub(crate) fn new(
        buffers: Vec<(String, CollectionReadBuffers)>,
        id_table: Arc<CollectionIdTable>,
        parameters: GenericParameters,
    ) -> Self {
        Self {
            buffers,
            id_table,
            parameters,
        }
    }

    /// Buffers of the collection called `name`, if read and not yet taken.
    pub fn collection_buffers(&self, name: &str) -> Option<&CollectionReadBuffers> {
        self.buffers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, buffers)| buffers)
    }

    /// Move the buffers of `name` out of this frame.
    ///
    /// A second call for the same name returns `None`.
    pub fn take_collection_buffers(&mut self, name: &str) -> Option<CollectionReadBuffers> {
        let pos = self.buffers.iter().position(|(n, _)| n == name)?;
        Some(self.buffers.remove(pos).1)
    }

    /// Names of the collections still held, in stored order.
    ///
    /// Only names present in the collection-id table are listed.
    pub fn available_collections(&self) -> Vec<&str> {
        self.buffers
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| self.id_table.is_present(name))
            .collect()
    }

    /// The shared collection-id table of the category.
    pub fn id_table(&self) -> Arc<CollectionIdTable> {
        Arc::clone(&self.id_table)
    }

    /// Parameters of the entry.
    pub fn parameters(&self) -> &GenericParameters {
        &self.parameters
    }

    /// Move the parameters out, leaving an empty block behind.
    pub fn take_parameters(&mut self) -> GenericParameters {
        std::mem::take(&mut self.parameters)
    }

    /// Iterate over `(name, buffers)` in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CollectionReadBuffers)> {
        self.buffers.iter().map(|(name, b)| (name.as_str(), b))
    }

    /// Split into buffers, id table and parameters.
    pub fn into_parts(
        self,
    ) -> (
        Vec<(String, CollectionReadBuffers)>,
        Arc<CollectionIdTable>,
        GenericParameters,
    ) {
        (self.buffers, self.id_table, self.parameters)
    }
}
