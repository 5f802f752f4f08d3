use std::{error::Error, path::Path, sync::Arc};

use arrow::array::{
    ArrayRef, Float32Builder, Float64Builder, Int32Array, Int32Builder, ListArray, ListBuilder,
    RecordBatch, StringBuilder, StructArray, UInt32Array,
};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{DataType, Field, Fields, Float32Type, Float64Type, Int64Type};
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;

use crate::layout;
use crate::metadata::{
    CategoryStructure, CollectionTypeInfo, DatamodelDefinition, GlobalMetadata, IdTableRecord,
    Version,
};
use crate::storage::MemoryDirectory;

pub(crate) type TestResult = Result<(), Box<dyn Error>>;

pub(crate) const HITS_ID: u32 = 0xA1;
pub(crate) const GOOD_HITS_ID: u32 = 0xB2;
pub(crate) const CLUSTERS_ID: u32 = 0xC3;

/// Layout of one category in a fixture store.
///
/// Entry `i` of a category is tagged with the marker `base + i`: the first
/// hit energy, the first cluster value, and the `marker` double parameter all
/// carry it, so tests can tell which file and entry a buffer came from.
#[derive(Clone, Debug)]
pub(crate) struct CategoryFixture {
    pub(crate) name: String,
    pub(crate) entries: usize,
    pub(crate) base: f64,
    pub(crate) collections: bool,
    pub(crate) reverse_columns: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct StoreFixture {
    pub(crate) version: Version,
    pub(crate) datamodels: Vec<DatamodelDefinition>,
    pub(crate) categories: Vec<CategoryFixture>,
    pub(crate) row_group_size: usize,
}

impl StoreFixture {
    /// A store with a single `events` category holding collections.
    pub(crate) fn events(entries: usize) -> Self {
        Self {
            version: Version::new(1, 2, 3),
            datamodels: vec![DatamodelDefinition {
                name: "exampledm".to_string(),
                definition: r#"{"datatypes":{"ExampleHit":{}}}"#.to_string(),
            }],
            categories: vec![CategoryFixture {
                name: "events".to_string(),
                entries,
                base: 0.0,
                collections: true,
                reverse_columns: false,
            }],
            row_group_size: 1024,
        }
    }

    /// Add a parameter-only category.
    pub(crate) fn with_parameter_category(mut self, name: &str, entries: usize) -> Self {
        self.categories.push(CategoryFixture {
            name: name.to_string(),
            entries,
            base: 0.0,
            collections: false,
            reverse_columns: false,
        });
        self
    }

    pub(crate) fn with_base(mut self, base: f64) -> Self {
        for category in &mut self.categories {
            category.base = base;
        }
        self
    }

    pub(crate) fn with_reversed_columns(mut self) -> Self {
        for category in &mut self.categories {
            category.reverse_columns = true;
        }
        self
    }

    pub(crate) fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub(crate) fn with_row_group_size(mut self, rows: usize) -> Self {
        self.row_group_size = rows;
        self
    }
}

pub(crate) fn marker(category: &CategoryFixture, entry: usize) -> f64 {
    category.base + entry as f64
}

fn object_ids(rows: &[Vec<(i32, u32)>]) -> ListArray {
    let index = Int32Array::from_iter_values(rows.iter().flatten().map(|(i, _)| *i));
    let collection = UInt32Array::from_iter_values(rows.iter().flatten().map(|(_, c)| *c));
    let fields = Fields::from(vec![
        Field::new("index", DataType::Int32, false),
        Field::new("collectionID", DataType::UInt32, false),
    ]);
    let values = StructArray::new(
        fields.clone(),
        vec![Arc::new(index) as ArrayRef, Arc::new(collection)],
        None,
    );
    let offsets = OffsetBuffer::from_lengths(rows.iter().map(Vec::len));
    ListArray::new(
        Arc::new(Field::new("item", DataType::Struct(fields), false)),
        offsets,
        Arc::new(values),
        None,
    )
}

fn structure() -> CategoryStructure {
    CategoryStructure {
        id_table: IdTableRecord {
            ids: vec![HITS_ID, GOOD_HITS_ID, CLUSTERS_ID],
            names: vec![
                "hits".to_string(),
                "good_hits".to_string(),
                "clusters".to_string(),
            ],
        },
        collections: vec![
            CollectionTypeInfo {
                id: HITS_ID,
                type_name: "ExampleHitCollection".to_string(),
                is_subset: false,
                schema_version: 2,
                relations: vec!["parent".to_string()],
                vector_members: vec!["weights".to_string()],
            },
            CollectionTypeInfo {
                id: GOOD_HITS_ID,
                type_name: "ExampleHitCollection".to_string(),
                is_subset: true,
                schema_version: 2,
                relations: Vec::new(),
                vector_members: Vec::new(),
            },
            CollectionTypeInfo {
                id: CLUSTERS_ID,
                type_name: "ExampleClusterCollection".to_string(),
                is_subset: false,
                schema_version: 1,
                relations: Vec::new(),
                vector_members: Vec::new(),
            },
        ],
    }
}

fn collection_columns(category: &CategoryFixture) -> Vec<(String, ArrayRef)> {
    let hits_per_entry = |i: usize| i % 3 + 1;

    let hits = ListArray::from_iter_primitive::<Float64Type, _, _>((0..category.entries).map(|i| {
        let m = marker(category, i);
        Some((0..hits_per_entry(i)).map(move |k| Some(m + 0.5 * k as f64)))
    }));
    let parents: Vec<Vec<(i32, u32)>> = (0..category.entries)
        .map(|i| (0..hits_per_entry(i) as i32).map(|k| (k, HITS_ID)).collect())
        .collect();
    let weights = ListArray::from_iter_primitive::<Float32Type, _, _>(
        (0..category.entries).map(|i| Some((0..hits_per_entry(i)).map(|_| Some(1.0f32)))),
    );
    let good_hits: Vec<Vec<(i32, u32)>> = (0..category.entries).map(|_| vec![(0, HITS_ID)]).collect();
    let clusters = ListArray::from_iter_primitive::<Int64Type, _, _>(
        (0..category.entries).map(|i| Some(vec![Some(marker(category, i) as i64)])),
    );

    vec![
        (layout::data_column("hits"), Arc::new(hits) as ArrayRef),
        (layout::member_column("hits", "parent"), Arc::new(object_ids(&parents))),
        (layout::member_column("hits", "weights"), Arc::new(weights)),
        (layout::subset_column("good_hits"), Arc::new(object_ids(&good_hits))),
        (layout::data_column("clusters"), Arc::new(clusters)),
    ]
}

fn parameter_columns(category: &CategoryFixture) -> Vec<(String, ArrayRef)> {
    let mut int_keys = ListBuilder::new(StringBuilder::new());
    let mut int_values = ListBuilder::new(ListBuilder::new(Int32Builder::new()));
    let mut float_keys = ListBuilder::new(StringBuilder::new());
    let mut float_values = ListBuilder::new(ListBuilder::new(Float32Builder::new()));
    let mut double_keys = ListBuilder::new(StringBuilder::new());
    let mut double_values = ListBuilder::new(ListBuilder::new(Float64Builder::new()));
    let mut string_keys = ListBuilder::new(StringBuilder::new());
    let mut string_values = ListBuilder::new(ListBuilder::new(StringBuilder::new()));

    for i in 0..category.entries {
        int_keys.values().append_value("entry");
        int_keys.append(true);
        int_values.values().values().append_value(i as i32);
        int_values.values().append(true);
        int_values.append(true);

        // no float parameters
        float_keys.append(true);
        float_values.append(true);

        double_keys.values().append_value("marker");
        double_keys.append(true);
        double_values.values().values().append_value(marker(category, i));
        double_values.values().append(true);
        double_values.append(true);

        string_keys.values().append_value("category");
        string_keys.append(true);
        string_values.values().values().append_value(&category.name);
        string_values.values().values().append_value("fixture");
        string_values.values().append(true);
        string_values.append(true);
    }

    vec![
        (layout::parameter_keys_column("int"), Arc::new(int_keys.finish()) as ArrayRef),
        (layout::parameter_values_column("int"), Arc::new(int_values.finish())),
        (layout::parameter_keys_column("float"), Arc::new(float_keys.finish())),
        (layout::parameter_values_column("float"), Arc::new(float_values.finish())),
        (layout::parameter_keys_column("double"), Arc::new(double_keys.finish())),
        (layout::parameter_values_column("double"), Arc::new(double_values.finish())),
        (layout::parameter_keys_column("string"), Arc::new(string_keys.finish())),
        (layout::parameter_values_column("string"), Arc::new(string_values.finish())),
    ]
}

/// Encode one category file as Parquet bytes.
pub(crate) fn category_bytes(
    category: &CategoryFixture,
    row_group_size: usize,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let (structure, mut columns) = if category.collections {
        (structure(), collection_columns(category))
    } else {
        (CategoryStructure::default(), Vec::new())
    };
    columns.extend(parameter_columns(category));
    if category.reverse_columns {
        columns.reverse();
    }

    segment_bytes(columns, Some(serde_json::to_string(&structure)?), row_group_size)
}

/// Encode arbitrary columns as a category file, with `footer` stored as the
/// raw structural metadata value when given.
pub(crate) fn segment_bytes(
    columns: Vec<(String, ArrayRef)>,
    footer: Option<String>,
    row_group_size: usize,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let batch = RecordBatch::try_from_iter(columns)?;
    let props = WriterProperties::builder()
        .set_max_row_group_size(row_group_size)
        .set_key_value_metadata(footer.map(|value| {
            vec![KeyValue::new(
                layout::COLLECTIONS_METADATA_KEY.to_string(),
                value,
            )]
        }))
        .build();

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(buf)
}

/// Encode the global metadata object of a store.
pub(crate) fn metadata_bytes(fixture: &StoreFixture) -> Result<Vec<u8>, Box<dyn Error>> {
    let meta = GlobalMetadata {
        version: fixture.version,
        datamodels: fixture.datamodels.clone(),
        categories: fixture.categories.iter().map(|c| c.name.clone()).collect(),
    };
    Ok(serde_json::to_vec(&meta)?)
}

/// Write a store directory at `root`.
pub(crate) fn write_store(root: &Path, fixture: &StoreFixture) -> TestResult {
    std::fs::create_dir_all(root)?;
    std::fs::write(root.join(layout::METADATA_FILE), metadata_bytes(fixture)?)?;
    for category in &fixture.categories {
        std::fs::write(
            root.join(layout::category_file(&category.name)),
            category_bytes(category, fixture.row_group_size)?,
        )?;
    }
    Ok(())
}

/// Build the same store as an in-memory directory.
pub(crate) fn memory_store(fixture: &StoreFixture) -> Result<MemoryDirectory, Box<dyn Error>> {
    let mut dir = MemoryDirectory::new();
    dir.insert(layout::METADATA_FILE, metadata_bytes(fixture)?);
    for category in &fixture.categories {
        dir.insert(
            layout::category_file(&category.name),
            category_bytes(category, fixture.row_group_size)?,
        );
    }
    Ok(dir)
}
