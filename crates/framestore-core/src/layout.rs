//! Naming conventions of a store.
//!
//! A store is a directory (or an in-memory directory) holding:
//!
//! - `metadata.json`: the global metadata (file version, datamodel
//!   definitions, category names).
//! - `<category>.parquet`: one Parquet file per category, one row per entry.
//!
//! Inside a category file, each collection occupies one or more list columns
//! whose names are derived here, and the per-entry parameter block occupies a
//! fixed set of `__params_*` columns. The category's structural metadata is
//! stored as JSON in the file footer under [`COLLECTIONS_METADATA_KEY`].
//!
//! Keeping these conventions in one place lets the reader and the test
//! fixtures agree without hard-coded string concatenation.

/// Name of the global metadata object at the root of a store.
pub const METADATA_FILE: &str = "metadata.json";

/// Footer key-value key holding a category's structural metadata.
pub const COLLECTIONS_METADATA_KEY: &str = "framestore.collections";

/// Extension of per-category segment files.
pub const SEGMENT_EXTENSION: &str = "parquet";

/// Relative path of the segment holding `category` inside a store.
pub fn category_file(category: &str) -> String {
    format!("{category}.{SEGMENT_EXTENSION}")
}

/// Whether `category` can name a segment file directly inside a store.
///
/// Empty names, `.`, `..` and names containing a path separator are rejected.
pub fn is_valid_category_name(category: &str) -> bool {
    !category.is_empty()
        && category != "."
        && category != ".."
        && !category.contains(['/', '\\'])
}

/// Column holding the object data of a full (non-subset) collection.
pub fn data_column(collection: &str) -> String {
    collection.to_string()
}

/// Column holding the object ids of a subset collection.
pub fn subset_column(collection: &str) -> String {
    format!("{collection}_objIdx")
}

/// Column holding one relation or one vector member of a collection.
pub fn member_column(collection: &str, member: &str) -> String {
    format!("_{collection}_{member}")
}

/// Value kinds of the generic parameter block, in column order.
pub const PARAMETER_KINDS: [&str; 4] = ["int", "float", "double", "string"];

/// Column holding the keys of the parameters of one value kind.
pub fn parameter_keys_column(kind: &str) -> String {
    format!("__params_{kind}_keys")
}

/// Column holding the value vectors of the parameters of one value kind.
pub fn parameter_values_column(kind: &str) -> String {
    format!("__params_{kind}_values")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_follow_conventions() {
        assert_eq!(category_file("events"), "events.parquet");
        assert_eq!(data_column("hits"), "hits");
        assert_eq!(subset_column("good_hits"), "good_hits_objIdx");
        assert_eq!(member_column("hits", "parent"), "_hits_parent");
        assert_eq!(parameter_keys_column("int"), "__params_int_keys");
        assert_eq!(parameter_values_column("string"), "__params_string_values");
    }

    #[test]
    fn category_names_stay_inside_the_store() {
        assert!(is_valid_category_name("events"));
        assert!(is_valid_category_name("run.info"));
        assert!(!is_valid_category_name(""));
        assert!(!is_valid_category_name(".."));
        assert!(!is_valid_category_name("../events"));
        assert!(!is_valid_category_name("sub/events"));
        assert!(!is_valid_category_name("sub\\events"));
    }
}
