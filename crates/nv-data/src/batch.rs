//! Arrow conversion of page windows

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use nv_core::{FieldValue, PageWindow};

use crate::design::{ColumnSpec, ViewSchema};
use crate::DataError;

/// Name of the leading column holding each entry's position key
pub const POSITION_COLUMN: &str = "position";

/// Convert a window into a record batch with one row per entry.
///
/// The first column holds the position key (null for category totals). Every
/// schema column follows in order: `Float64` when each non-empty value is a
/// number, `Utf8` otherwise, with lists joined by the column's separator.
pub fn window_to_record_batch(schema: &ViewSchema, window: &PageWindow) -> Result<RecordBatch, DataError> {
    let mut fields = Vec::with_capacity(schema.columns().len() + 1);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(schema.columns().len() + 1);

    let mut positions = StringBuilder::new();
    for entry in &window.entries {
        match &entry.position {
            Some(key) => positions.append_value(key.to_string()),
            None => positions.append_null(),
        }
    }
    fields.push(Field::new(POSITION_COLUMN, DataType::Utf8, true));
    arrays.push(Arc::new(positions.finish()));

    for column in schema.columns() {
        let values: Vec<Option<&FieldValue>> = window
            .entries
            .iter()
            .map(|e| e.field(&column.name).filter(|v| !v.is_empty()))
            .collect();

        let (data_type, array) = column_array(column, &values);
        fields.push(Field::new(&column.name, data_type, true));
        arrays.push(array);
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

fn column_array(column: &ColumnSpec, values: &[Option<&FieldValue>]) -> (DataType, ArrayRef) {
    let numeric = values.iter().flatten().all(|v| v.as_number().is_some());

    if numeric {
        let mut builder = Float64Builder::with_capacity(values.len());
        for value in values {
            builder.append_option(value.and_then(|v| v.as_number()));
        }
        (DataType::Float64, Arc::new(builder.finish()))
    } else {
        let separator = column.list_separator.as_str();
        let mut builder = StringBuilder::new();
        for value in values {
            builder.append_option(value.map(|v| v.display_with(separator)));
        }
        (DataType::Utf8, Arc::new(builder.finish()))
    }
}
