//! Plain-text rendering of reader output.

use arrow::{
    array::Array,
    error::ArrowError,
    util::display::{ArrayFormatter, FormatOptions},
};
use framestore_core::{FrameData, GenericParameters, ParameterValue};
use snafu::ResultExt;
use tabled::{builder::Builder, settings::Style};

use crate::error::{CliResult, FormatValuesSnafu};

/// Number of values shown per collection before eliding the rest.
const PREVIEW_VALUES: usize = 3;

pub fn render_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().copied());
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn push_parameter_rows<T: ParameterValue + ToString>(
    params: &GenericParameters,
    rows: &mut Vec<Vec<String>>,
) {
    for key in params.keys::<T>() {
        let values = params
            .get::<T>(key)
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        rows.push(vec![T::KIND.to_string(), key.to_string(), values]);
    }
}

/// One row per parameter key: kind, key, values.
pub fn parameter_rows(params: &GenericParameters) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(params.len());
    push_parameter_rows::<i32>(params, &mut rows);
    push_parameter_rows::<f32>(params, &mut rows);
    push_parameter_rows::<f64>(params, &mut rows);
    push_parameter_rows::<String>(params, &mut rows);
    rows
}

/// The first few values of `array`, comma separated.
pub fn preview(array: &dyn Array) -> Result<String, ArrowError> {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array, &options)?;

    let shown = array.len().min(PREVIEW_VALUES);
    let mut values = (0..shown)
        .map(|i| formatter.value(i).try_to_string())
        .collect::<Result<Vec<_>, _>>()?;
    if array.len() > shown {
        values.push("...".to_string());
    }
    Ok(values.join(", "))
}

pub const COLLECTION_COLUMNS: [&str; 7] =
    ["collection", "id", "type", "subset", "schema", "len", "values"];

/// One row per read collection, in stored order.
pub fn collection_rows(frame: &FrameData) -> CliResult<Vec<Vec<String>>> {
    let id_table = frame.id_table();
    let mut rows = Vec::new();

    for (name, buffers) in frame.iter() {
        let id = id_table
            .collection_id(name)
            .map_or_else(|| "-".to_string(), |id| format!("{id:#x}"));
        let shown = buffers
            .data
            .as_ref()
            .or_else(|| buffers.references.first())
            .map(|array| preview(array.as_ref()))
            .transpose()
            .context(FormatValuesSnafu { collection: name })?
            .unwrap_or_default();

        rows.push(vec![
            name.to_string(),
            id,
            buffers.type_name.clone(),
            if buffers.is_subset { "yes" } else { "no" }.to_string(),
            buffers.schema_version.to_string(),
            buffers.len().to_string(),
            shown,
        ]);
    }

    Ok(rows)
}
