//! Branch cache: per-collection column accessors bound to one segment.
//!
//! A collection's data lives in one or more list columns of its category
//! file. Before an entry can be read, every column a collection needs is
//! resolved to its root column index in the segment being read. The resolved
//! indices are only valid for that one segment: files in a chain may order
//! their columns differently, so crossing a segment boundary invalidates every
//! resolved entry and they are resolved again against the new segment.

use arrow::{
    array::{Array, ArrayRef, AsArray, GenericListArray, OffsetSizeTrait, RecordBatch, new_empty_array},
    datatypes::DataType,
};
use arrow_array::types::{Float32Type, Float64Type, Int32Type};
use snafu::prelude::*;

use crate::{
    layout,
    metadata::CollectionTypeInfo,
    parameters::{GenericParameters, ParameterValue},
    reader::{
        CollectionInfo,
        chain::ChainSegment,
        error::{
            MissingColumnSnafu, NullParameterValueSnafu, ParameterShapeSnafu, ReaderResult,
            UnexpectedColumnTypeSnafu,
        },
        frame_data::CollectionReadBuffers,
    },
};

/// Resolve `column` to its root index in `segment`, checking it is a list
/// column.
pub(crate) fn resolve_list_column(segment: &ChainSegment, column: &str) -> ReaderResult<usize> {
    let schema = segment.schema();
    let index = schema.index_of(column).ok().context(MissingColumnSnafu {
        path: &segment.path,
        column,
    })?;

    match schema.field(index).data_type() {
        DataType::List(_) | DataType::LargeList(_) => Ok(index),
        other => UnexpectedColumnTypeSnafu {
            path: &segment.path,
            column,
            datatype: other.to_string(),
        }
        .fail(),
    }
}

fn first_list_value<O: OffsetSizeTrait>(list: &GenericListArray<O>) -> ArrayRef {
    if list.is_empty() || list.is_null(0) {
        new_empty_array(&list.value_type())
    } else {
        list.value(0)
    }
}

/// The value of the single row of `column` in a one-row batch.
pub(crate) fn row_value(batch: &RecordBatch, column: &str, path: &str) -> ReaderResult<ArrayRef> {
    let array = batch
        .column_by_name(column)
        .context(MissingColumnSnafu { path, column })?;

    match array.data_type() {
        DataType::List(_) => Ok(first_list_value(array.as_list::<i32>())),
        DataType::LargeList(_) => Ok(first_list_value(array.as_list::<i64>())),
        other => UnexpectedColumnTypeSnafu {
            path,
            column,
            datatype: other.to_string(),
        }
        .fail(),
    }
}

#[derive(Debug)]
struct ResolvedBranches {
    roots: Vec<usize>,
}

/// Column accessors of one stored collection.
#[derive(Debug)]
pub(crate) struct CollectionBranches {
    /// Data column; `None` for subset collections.
    data: Option<String>,
    /// Relation columns, or the single object-id column of a subset collection.
    refs: Vec<String>,
    /// `(member name, column)` for every vector member.
    vecs: Vec<(String, String)>,
    resolved: Option<ResolvedBranches>,
}

impl CollectionBranches {
    pub(crate) fn for_collection(name: &str, info: &CollectionTypeInfo) -> Self {
        if info.is_subset {
            return Self {
                data: None,
                refs: vec![layout::subset_column(name)],
                vecs: Vec::new(),
                resolved: None,
            };
        }

        Self {
            data: Some(layout::data_column(name)),
            refs: info
                .relations
                .iter()
                .map(|rel| layout::member_column(name, rel))
                .collect(),
            vecs: info
                .vector_members
                .iter()
                .map(|member| (member.clone(), layout::member_column(name, member)))
                .collect(),
            resolved: None,
        }
    }

    fn columns(&self) -> impl Iterator<Item = &str> {
        self.data
            .iter()
            .chain(self.refs.iter())
            .chain(self.vecs.iter().map(|(_, column)| column))
            .map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub(crate) fn invalidate(&mut self) {
        self.resolved = None;
    }

    /// Resolve against `segment` unless already bound, and return the root
    /// column indices to project.
    pub(crate) fn resolve(&mut self, segment: &ChainSegment) -> ReaderResult<&[usize]> {
        if self.resolved.is_none() {
            let roots = self
                .columns()
                .map(|column| resolve_list_column(segment, column))
                .collect::<ReaderResult<Vec<_>>>()?;
            self.resolved = Some(ResolvedBranches { roots });
        }

        Ok(self.resolved.as_ref().map(|r| r.roots.as_slice()).unwrap_or_default())
    }

    /// Extract this collection's buffers from a one-row batch that includes
    /// every resolved column.
    pub(crate) fn read_buffers(
        &self,
        batch: &RecordBatch,
        info: &CollectionInfo,
        path: &str,
    ) -> ReaderResult<CollectionReadBuffers> {
        let data = self
            .data
            .as_deref()
            .map(|column| row_value(batch, column, path))
            .transpose()?;
        let references = self
            .refs
            .iter()
            .map(|column| row_value(batch, column, path))
            .collect::<ReaderResult<Vec<_>>>()?;
        let vector_members = self
            .vecs
            .iter()
            .map(|(member, column)| Ok((member.clone(), row_value(batch, column, path)?)))
            .collect::<ReaderResult<Vec<_>>>()?;

        Ok(CollectionReadBuffers {
            type_name: info.type_name.clone(),
            schema_version: info.schema_version,
            is_subset: info.is_subset,
            data,
            references,
            vector_members,
        })
    }
}

/// Decodes the parameters of one value kind from a one-row batch.
type KindDecoder = fn(&mut GenericParameters, &RecordBatch, &str) -> ReaderResult<()>;

/// One decoder per parameter value kind, in column order.
const PARAMETER_DECODERS: [(&str, KindDecoder); 4] = [
    (<i32 as ParameterValue>::KIND, decode_kind::<i32>),
    (<f32 as ParameterValue>::KIND, decode_kind::<f32>),
    (<f64 as ParameterValue>::KIND, decode_kind::<f64>),
    (<String as ParameterValue>::KIND, decode_kind::<String>),
];

#[derive(Debug)]
struct ResolvedParameters {
    /// Root indices of the keys and values columns, and the decoder, for
    /// every kind present in the segment.
    kinds: Vec<(usize, usize, KindDecoder)>,
}

/// Column accessors of the per-entry parameter block.
///
/// Parameter columns are optional: a segment without any of them yields empty
/// parameters. A kind with only one of its two columns is an error.
#[derive(Debug, Default)]
pub(crate) struct ParameterBranches {
    resolved: Option<ResolvedParameters>,
}

impl ParameterBranches {
    pub(crate) fn invalidate(&mut self) {
        self.resolved = None;
    }

    pub(crate) fn resolve(&mut self, segment: &ChainSegment) -> ReaderResult<Vec<usize>> {
        if self.resolved.is_none() {
            let schema = segment.schema();
            let mut kinds = Vec::with_capacity(PARAMETER_DECODERS.len());
            for (kind, decoder) in PARAMETER_DECODERS {
                let keys = layout::parameter_keys_column(kind);
                let values = layout::parameter_values_column(kind);
                match (schema.index_of(&keys).is_ok(), schema.index_of(&values).is_ok()) {
                    (false, false) => continue,
                    _ => kinds.push((
                        resolve_list_column(segment, &keys)?,
                        resolve_list_column(segment, &values)?,
                        decoder,
                    )),
                }
            }
            self.resolved = Some(ResolvedParameters { kinds });
        }

        Ok(self
            .resolved
            .iter()
            .flat_map(|r| r.kinds.iter().flat_map(|&(k, v, _)| [k, v]))
            .collect())
    }

    /// Decode the parameter block from a one-row batch that includes every
    /// resolved parameter column.
    pub(crate) fn decode(&self, batch: &RecordBatch, path: &str) -> ReaderResult<GenericParameters> {
        let mut params = GenericParameters::new();
        let Some(resolved) = &self.resolved else {
            return Ok(params);
        };

        for &(_, _, decode) in &resolved.kinds {
            decode(&mut params, batch, path)?;
        }

        Ok(params)
    }
}

/// Parameter value types that can be extracted from a null-free Arrow array.
trait ArrowParameter: ParameterValue + Sized {
    fn extract(array: &dyn Array) -> Option<Vec<Self>>;
}

impl ArrowParameter for i32 {
    fn extract(array: &dyn Array) -> Option<Vec<Self>> {
        Some(array.as_primitive_opt::<Int32Type>()?.values().to_vec())
    }
}

impl ArrowParameter for f32 {
    fn extract(array: &dyn Array) -> Option<Vec<Self>> {
        Some(array.as_primitive_opt::<Float32Type>()?.values().to_vec())
    }
}

impl ArrowParameter for f64 {
    fn extract(array: &dyn Array) -> Option<Vec<Self>> {
        Some(array.as_primitive_opt::<Float64Type>()?.values().to_vec())
    }
}

impl ArrowParameter for String {
    fn extract(array: &dyn Array) -> Option<Vec<Self>> {
        let strings = array.as_string_opt::<i32>()?;
        Some(
            (0..strings.len())
                .map(|i| strings.value(i).to_string())
                .collect(),
        )
    }
}

fn decode_kind<T: ArrowParameter>(
    params: &mut GenericParameters,
    batch: &RecordBatch,
    path: &str,
) -> ReaderResult<()> {
    let keys_column = layout::parameter_keys_column(T::KIND);
    let values_column = layout::parameter_values_column(T::KIND);
    let keys = row_value(batch, &keys_column, path)?;
    let values = row_value(batch, &values_column, path)?;

    let keys = keys.as_string_opt::<i32>().context(UnexpectedColumnTypeSnafu {
        path,
        column: &keys_column,
        datatype: keys.data_type().to_string(),
    })?;
    let values = values.as_list_opt::<i32>().context(UnexpectedColumnTypeSnafu {
        path,
        column: &values_column,
        datatype: values.data_type().to_string(),
    })?;
    ensure!(
        keys.len() == values.len(),
        ParameterShapeSnafu {
            path,
            kind: T::KIND,
            keys: keys.len(),
            values: values.len(),
        }
    );

    for (i, key) in keys.iter().enumerate() {
        let Some(key) = key else { continue };
        let inner = values.value(i);
        ensure!(
            inner.null_count() == 0,
            NullParameterValueSnafu {
                path,
                kind: T::KIND,
                key,
            }
        );
        let decoded = T::extract(inner.as_ref()).context(UnexpectedColumnTypeSnafu {
            path,
            column: &values_column,
            datatype: inner.data_type().to_string(),
        })?;
        params.set::<T>(key, decoded);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_parameter_kind_has_a_decoder() {
        let kinds: Vec<_> = PARAMETER_DECODERS.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, layout::PARAMETER_KINDS);
    }
}
