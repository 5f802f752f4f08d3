#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use arrow::array::{ArrayRef, Float64Builder, ListArray, ListBuilder, RecordBatch, StringBuilder};
use arrow::datatypes::Float64Type;
use framestore_core::{
    layout,
    metadata::{
        CategoryStructure, CollectionTypeInfo, DatamodelDefinition, GlobalMetadata,
        IdTableRecord, Version,
    },
};
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub const HITS_ID: u32 = 0x2a;
pub const DATAMODEL: &str = r#"{"datatypes":{"Hit":{"Members":["double energy"]}}}"#;

fn events_file(entries: usize, base: f64) -> TestResult<Vec<u8>> {
    let structure = CategoryStructure {
        id_table: IdTableRecord {
            ids: vec![HITS_ID],
            names: vec!["hits".to_string()],
        },
        collections: vec![CollectionTypeInfo {
            id: HITS_ID,
            type_name: "HitCollection".to_string(),
            is_subset: false,
            schema_version: 3,
            relations: Vec::new(),
            vector_members: Vec::new(),
        }],
    };

    // entry i holds i + 1 hits starting at base + i
    let hits = ListArray::from_iter_primitive::<Float64Type, _, _>((0..entries).map(|i| {
        let first = base + i as f64;
        Some((0..=i).map(move |k| Some(first + 0.25 * k as f64)))
    }));

    let mut keys = ListBuilder::new(StringBuilder::new());
    let mut values = ListBuilder::new(ListBuilder::new(Float64Builder::new()));
    for i in 0..entries {
        keys.values().append_value("marker");
        keys.append(true);
        values.values().values().append_value(base + i as f64);
        values.values().append(true);
        values.append(true);
    }

    let batch = RecordBatch::try_from_iter([
        (layout::data_column("hits"), Arc::new(hits) as ArrayRef),
        (
            layout::parameter_keys_column("double"),
            Arc::new(keys.finish()) as ArrayRef,
        ),
        (
            layout::parameter_values_column("double"),
            Arc::new(values.finish()) as ArrayRef,
        ),
    ])?;

    let props = WriterProperties::builder()
        .set_key_value_metadata(Some(vec![KeyValue::new(
            layout::COLLECTIONS_METADATA_KEY.to_string(),
            serde_json::to_string(&structure)?,
        )]))
        .build();
    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(buf)
}

/// Write a store with an `events` category of `entries` entries.
pub fn write_events_store(root: &Path, entries: usize, base: f64) -> TestResult {
    std::fs::create_dir_all(root)?;

    let meta = GlobalMetadata {
        version: Version::new(0, 4, 1),
        datamodels: vec![DatamodelDefinition {
            name: "hitdm".to_string(),
            definition: DATAMODEL.to_string(),
        }],
        categories: vec!["events".to_string()],
    };
    std::fs::write(root.join(layout::METADATA_FILE), serde_json::to_vec(&meta)?)?;
    std::fs::write(
        root.join(layout::category_file("events")),
        events_file(entries, base)?,
    )?;
    Ok(())
}
