//! Row extraction from Arrow record batches
//!
//! Each attendance is materialised as a fixed-layout row of owned optional
//! strings so that classification never touches the source batch.

use crate::config::AttendanceColumns;
use crate::error::{AttendanceError, Result};
use arrow::array::{Array, LargeStringArray, StringArray, StringViewArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::debug;

/// Positions of the fixed fields in a row
pub const TYPE_ED: usize = 0;
pub const DISPOSAL: usize = 1;
pub const CATEGORY: usize = 2;
pub const ARRIVAL_MODE: usize = 3;
/// Number of fixed fields preceding the investigation columns
pub const FIXED_FIELDS: usize = 4;

/// Widths of the variable column groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowLayout {
    pub investigations: usize,
    pub treatments: usize,
}

impl RowLayout {
    #[must_use]
    pub const fn width(&self) -> usize {
        FIXED_FIELDS + self.investigations + self.treatments
    }
}

/// One attendance record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRow {
    /// 1-based position in the source
    pub id: u64,
    values: Vec<Option<String>>,
}

impl AttendanceRow {
    #[must_use]
    pub const fn new(id: u64, values: Vec<Option<String>>) -> Self {
        Self { id, values }
    }

    /// Value at a row position; `None` when absent
    #[inline]
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&str> {
        self.values.get(position).and_then(Option::as_deref)
    }

    /// Investigation values in column order
    pub fn investigations(&self, layout: RowLayout) -> impl Iterator<Item = Option<&str>> {
        self.group(FIXED_FIELDS, layout.investigations)
    }

    /// Treatment values in column order
    pub fn treatments(&self, layout: RowLayout) -> impl Iterator<Item = Option<&str>> {
        self.group(FIXED_FIELDS + layout.investigations, layout.treatments)
    }

    fn group(&self, start: usize, len: usize) -> impl Iterator<Item = Option<&str>> {
        self.values
            .get(start..start + len)
            .unwrap_or_default()
            .iter()
            .map(Option::as_deref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Rows of one classification run, in source order
#[derive(Debug, Clone, Default)]
pub struct AttendanceRows {
    pub layout: RowLayout,
    pub rows: Vec<AttendanceRow>,
}

impl AttendanceRows {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Borrowed view of a string-typed Arrow column
enum StringColumn<'a> {
    Utf8(&'a StringArray),
    LargeUtf8(&'a LargeStringArray),
    Utf8View(&'a StringViewArray),
}

impl StringColumn<'_> {
    #[inline]
    fn value(&self, row: usize) -> Option<&str> {
        match self {
            Self::Utf8(a) => (!a.is_null(row)).then(|| a.value(row)),
            Self::LargeUtf8(a) => (!a.is_null(row)).then(|| a.value(row)),
            Self::Utf8View(a) => (!a.is_null(row)).then(|| a.value(row)),
        }
    }
}

/// Resolve a column by name and check it holds strings
fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<StringColumn<'a>> {
    let index = batch
        .schema()
        .index_of(name)
        .map_err(|_| AttendanceError::ColumnNotFound {
            column: name.to_string(),
        })?;

    let array = batch.column(index);
    let any = array.as_any();
    let column = match array.data_type() {
        DataType::Utf8 => any.downcast_ref::<StringArray>().map(StringColumn::Utf8),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(StringColumn::LargeUtf8),
        DataType::Utf8View => any
            .downcast_ref::<StringViewArray>()
            .map(StringColumn::Utf8View),
        _ => None,
    };

    column.ok_or_else(|| AttendanceError::ColumnType {
        column: name.to_string(),
        index,
        data_type: array.data_type().clone(),
    })
}

/// Materialise one row per record of `batch`.
///
/// All columns are resolved and type checked before any row is built.
/// Identifiers are the 1-based row positions in `batch`.
pub fn extract_rows(batch: &RecordBatch, columns: &AttendanceColumns) -> Result<AttendanceRows> {
    let layout = RowLayout {
        investigations: columns.investigations.len(),
        treatments: columns.treatments.len(),
    };

    let resolved = columns
        .ordered_names()
        .map(|name| string_column(batch, name))
        .collect::<Result<Vec<_>>>()?;
    debug_assert_eq!(resolved.len(), layout.width());

    let n_rows = batch.num_rows();
    debug!(
        "Extracting {n_rows} rows across {} columns ({} investigation, {} treatment)",
        resolved.len(),
        layout.investigations,
        layout.treatments
    );

    let rows = (0..n_rows)
        .map(|i| {
            let values = resolved
                .iter()
                .map(|col| col.value(i).map(str::to_owned))
                .collect();
            AttendanceRow::new(i as u64 + 1, values)
        })
        .collect();

    Ok(AttendanceRows { layout, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int32Array};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn columns() -> AttendanceColumns {
        AttendanceColumns::new("type", "disp", "cat", "arr")
            .with_investigations(["inv1", "inv2"])
            .with_treatments(["trt1"])
    }

    fn utf8(values: Vec<Option<&str>>) -> ArrayRef {
        Arc::new(StringArray::from(values))
    }

    fn batch(arrival: ArrayRef) -> RecordBatch {
        let arrival_type = arrival.data_type().clone();
        let schema = Schema::new(vec![
            Field::new("type", DataType::Utf8, true),
            Field::new("disp", DataType::Utf8, true),
            Field::new("cat", DataType::Utf8, true),
            Field::new("arr", arrival_type, true),
            Field::new("inv1", DataType::Utf8, true),
            Field::new("inv2", DataType::Utf8, true),
            Field::new("trt1", DataType::Utf8, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                utf8(vec![Some("01"), Some("1")]),
                utf8(vec![Some("02"), None]),
                utf8(vec![Some("1"), Some("")]),
                arrival,
                utf8(vec![None, Some("06")]),
                utf8(vec![Some("24"), None]),
                utf8(vec![None, Some("99")]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rows_follow_column_layout() {
        let rows = extract_rows(&batch(utf8(vec![Some("2"), Some("1")])), &columns()).unwrap();
        assert_eq!(rows.layout, RowLayout { investigations: 2, treatments: 1 });
        assert_eq!(rows.len(), 2);

        let first = &rows.rows[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.len(), 7);
        assert_eq!(first.get(TYPE_ED), Some("01"));
        assert_eq!(first.get(DISPOSAL), Some("02"));
        assert_eq!(first.get(CATEGORY), Some("1"));
        assert_eq!(first.get(ARRIVAL_MODE), Some("2"));
        let inv: Vec<_> = first.investigations(rows.layout).collect();
        assert_eq!(inv, vec![None, Some("24")]);
        let trt: Vec<_> = first.treatments(rows.layout).collect();
        assert_eq!(trt, vec![None]);

        let second = &rows.rows[1];
        assert_eq!(second.id, 2);
        assert_eq!(second.get(DISPOSAL), None);
        assert_eq!(second.get(CATEGORY), Some(""));
    }

    #[test]
    fn test_large_and_view_strings_are_accepted() {
        let large: ArrayRef = Arc::new(LargeStringArray::from(vec![Some("2"), None]));
        let rows = extract_rows(&batch(large), &columns()).unwrap();
        assert_eq!(rows.rows[0].get(ARRIVAL_MODE), Some("2"));
        assert_eq!(rows.rows[1].get(ARRIVAL_MODE), None);

        let view: ArrayRef = Arc::new(StringViewArray::from(vec![Some("3"), Some("4")]));
        let rows = extract_rows(&batch(view), &columns()).unwrap();
        assert_eq!(rows.rows[1].get(ARRIVAL_MODE), Some("4"));
    }

    #[test]
    fn test_non_string_column_is_reported() {
        let ints: ArrayRef = Arc::new(Int32Array::from(vec![Some(1), Some(2)]));
        let err = extract_rows(&batch(ints), &columns()).unwrap_err();
        match err {
            AttendanceError::ColumnType { column, index, data_type } => {
                assert_eq!(column, "arr");
                assert_eq!(index, 3);
                assert_eq!(data_type, DataType::Int32);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column_is_reported() {
        let cols = columns().with_treatments(["trt1", "trt2"]);
        let err = extract_rows(&batch(utf8(vec![None, None])), &cols).unwrap_err();
        assert!(matches!(err, AttendanceError::ColumnNotFound { ref column } if column == "trt2"));
    }

    #[test]
    fn test_zero_width_groups() {
        let cols = AttendanceColumns::new("type", "disp", "cat", "arr");
        let rows = extract_rows(&batch(utf8(vec![None, None])), &cols).unwrap();
        assert_eq!(rows.layout.width(), FIXED_FIELDS);
        assert_eq!(rows.rows[0].investigations(rows.layout).count(), 0);
        assert_eq!(rows.rows[0].treatments(rows.layout).count(), 0);
    }
}
