//! Registry of datamodel definition texts.

use serde::{Deserialize, Serialize};

/// Definition text returned for datamodels that are not in the registry.
pub const EMPTY_DEFINITION: &str = "{}";

/// One datamodel definition as stored in the global metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatamodelDefinition {
    /// Name of the datamodel.
    pub name: String,
    /// Raw definition text (JSON-encoded schema of the datamodel).
    pub definition: String,
}

/// Datamodel definitions keyed by name.
///
/// A pure lookup table: filled once from the first source's global metadata
/// and never mutated afterwards. The definition texts are not parsed here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatamodelRegistry {
    definitions: Vec<DatamodelDefinition>,
}

impl DatamodelRegistry {
    /// Build a registry from stored definitions, keeping their order.
    pub fn new(definitions: Vec<DatamodelDefinition>) -> Self {
        Self { definitions }
    }

    /// The definition text stored for `name`, or [`EMPTY_DEFINITION`] if the
    /// datamodel is unknown.
    pub fn definition(&self, name: &str) -> &str {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.definition.as_str())
            .unwrap_or(EMPTY_DEFINITION)
    }

    /// Names of all stored datamodels, in stored order.
    pub fn available(&self) -> Vec<String> {
        self.definitions.iter().map(|d| d.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_by_name() {
        let registry = DatamodelRegistry::new(vec![
            DatamodelDefinition {
                name: "edm".to_string(),
                definition: r#"{"components":{}}"#.to_string(),
            },
            DatamodelDefinition {
                name: "extension".to_string(),
                definition: r#"{"datatypes":{}}"#.to_string(),
            },
        ]);

        assert_eq!(registry.definition("edm"), r#"{"components":{}}"#);
        assert_eq!(registry.definition("missing"), EMPTY_DEFINITION);
        assert_eq!(registry.available(), vec!["edm", "extension"]);
    }
}
