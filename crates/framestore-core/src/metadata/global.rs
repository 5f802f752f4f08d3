//! The global metadata object of a store.

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::metadata::{
    datamodel::DatamodelDefinition,
    error::{InvalidJsonSnafu, MetadataResult},
    version::Version,
};

/// Contents of `metadata.json`, read once per reader from the first source.
///
/// JSON layout example:
///
/// ```json
/// {
///   "version": {"major": 1, "minor": 0, "patch": 0},
///   "datamodels": [{"name": "edm", "definition": "{}"}],
///   "categories": ["events", "runs"]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalMetadata {
    /// Version of the software that wrote the store.
    pub version: Version,

    /// Datamodel definitions available in this store.
    #[serde(default)]
    pub datamodels: Vec<DatamodelDefinition>,

    /// Names of all categories in the store, in their stored order.
    pub categories: Vec<String>,
}

impl GlobalMetadata {
    /// Decode the global metadata from its JSON bytes.
    ///
    /// `path` is only used for error messages.
    pub fn from_json_slice(bytes: &[u8], path: &str) -> MetadataResult<Self> {
        serde_json::from_slice(bytes).context(InvalidJsonSnafu { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataError;

    #[test]
    fn decodes_without_datamodels() {
        let json = br#"{"version":{"major":0,"minor":17,"patch":1},"categories":["events"]}"#;
        let meta = GlobalMetadata::from_json_slice(json, "metadata.json").expect("valid json");

        assert_eq!(meta.version, Version::new(0, 17, 1));
        assert!(meta.datamodels.is_empty());
        assert_eq!(meta.categories, vec!["events"]);
    }

    #[test]
    fn rejects_missing_categories() {
        let json = br#"{"version":{"major":1,"minor":0,"patch":0}}"#;
        let err = GlobalMetadata::from_json_slice(json, "metadata.json").expect_err("invalid");
        assert!(matches!(err, MetadataError::InvalidJson { .. }));
    }
}
