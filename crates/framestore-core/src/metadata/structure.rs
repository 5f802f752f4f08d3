//! Per-category structural metadata.
//!
//! Every category file carries, in its Parquet footer, a JSON document that
//! lists the collections stored in that category (type, subset flag, schema
//! version, relation and vector-member names) together with the category's
//! collection-id table. When several files are chained, the first file's
//! document is authoritative for all of them.

use std::collections::HashSet;

use log::warn;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::{
    id_table::CollectionIdTable,
    metadata::{
        SchemaVersion,
        error::{IdTableShapeSnafu, InvalidJsonSnafu, MetadataResult, UnknownCollectionIdSnafu},
    },
};

/// On-file form of a collection-id table: parallel id and name lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTableRecord {
    /// Collection ids.
    pub ids: Vec<u32>,
    /// Collection names, parallel to `ids`.
    pub names: Vec<String>,
}

/// Type information of one stored collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionTypeInfo {
    /// Collection id; the name is resolved through the id table.
    pub id: u32,

    /// Fully qualified collection type name.
    pub type_name: String,

    /// Whether the collection only references objects of another collection.
    #[serde(default)]
    pub is_subset: bool,

    /// Schema version the collection was written with.
    pub schema_version: SchemaVersion,

    /// Names of the relations of the collection type, in column order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<String>,

    /// Names of the vector members of the collection type, in column order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vector_members: Vec<String>,
}

/// Structural metadata of one category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStructure {
    /// The collection-id table of the category.
    pub id_table: IdTableRecord,

    /// Stored collections, in stored order.
    #[serde(default)]
    pub collections: Vec<CollectionTypeInfo>,
}

/// A stored collection with its name resolved through the id table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCollection<'a> {
    /// Collection name.
    pub name: &'a str,
    /// Type information as stored.
    pub info: &'a CollectionTypeInfo,
}

impl CategoryStructure {
    /// Decode structural metadata from its JSON text.
    ///
    /// `path` is only used for error messages.
    pub fn from_json(json: &str, path: &str) -> MetadataResult<Self> {
        serde_json::from_str(json).context(InvalidJsonSnafu { path })
    }

    /// Build the shared collection-id table of the category.
    pub fn id_table(&self, path: &str) -> MetadataResult<CollectionIdTable> {
        let IdTableRecord { ids, names } = &self.id_table;
        ensure!(
            ids.len() == names.len(),
            IdTableShapeSnafu {
                path,
                ids: ids.len(),
                names: names.len(),
            }
        );

        Ok(CollectionIdTable::from_pairs(
            ids.iter().copied().zip(names.iter().cloned()),
        ))
    }

    /// Resolve every stored collection's name, keeping stored order.
    ///
    /// A collection id listed more than once is kept at its first position.
    pub fn resolve_collections<'a>(
        &'a self,
        table: &'a CollectionIdTable,
        path: &str,
    ) -> MetadataResult<Vec<ResolvedCollection<'a>>> {
        let mut seen = HashSet::with_capacity(self.collections.len());
        let mut resolved = Vec::with_capacity(self.collections.len());

        for info in &self.collections {
            if !seen.insert(info.id) {
                warn!("{path}: collection id {} listed twice, ignoring duplicate", info.id);
                continue;
            }
            let name = table
                .name(info.id)
                .context(UnknownCollectionIdSnafu { path, id: info.id })?;
            resolved.push(ResolvedCollection { name, info });
        }

        Ok(resolved)
    }
}
