//! Series table types shared by every query mode.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sgraph_common::{RefId, Result, SGraphError};

/// Name of the timestamp column.
pub const TIME_FIELD: &str = "Time";
/// Name of the value column in constant mode.
pub const VALUE_FIELD: &str = "Value";
/// Name of the value column in history mode.
pub const PLAYS_FIELD: &str = "Plays";

/// Type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Epoch milliseconds.
    Time,
    /// Floating point values.
    Number,
}

/// Column values, typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum FieldValues {
    /// Epoch-millisecond instants.
    Time(Vec<i64>),
    /// Numbers.
    Number(Vec<f64>),
}

impl FieldValues {
    /// Number of values in the column.
    pub fn len(&self) -> usize {
        match self {
            Self::Time(values) => values.len(),
            Self::Number(values) => values.len(),
        }
    }

    /// Whether the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The column's type.
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::Time(_) => FieldType::Time,
            Self::Number(_) => FieldType::Number,
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// Column name, e.g. `Time` or `Plays`.
    pub name: String,
    /// Typed column values.
    #[serde(flatten)]
    pub values: FieldValues,
}

impl Field {
    /// A time column.
    pub fn time(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            values: FieldValues::Time(values),
        }
    }

    /// A number column.
    pub fn number(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: FieldValues::Number(values),
        }
    }

    /// Time values, if this is a time column.
    pub fn as_time(&self) -> Option<&[i64]> {
        match &self.values {
            FieldValues::Time(values) => Some(values),
            FieldValues::Number(_) => None,
        }
    }

    /// Number values, if this is a number column.
    pub fn as_number(&self) -> Option<&[f64]> {
        match &self.values {
            FieldValues::Number(values) => Some(values),
            FieldValues::Time(_) => None,
        }
    }
}

/// Ordered named columns of equal length answering one query target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesTable {
    ref_id: RefId,
    fields: Vec<Field>,
}

impl SeriesTable {
    /// Builds a table, rejecting columns of unequal length.
    pub fn new(ref_id: RefId, fields: Vec<Field>) -> Result<Self> {
        if let Some(first) = fields.first() {
            let expected = first.values.len();
            if let Some(ragged) = fields.iter().find(|f| f.values.len() != expected) {
                return Err(SGraphError::validation_field(
                    format!(
                        "Column '{}' has {} values, expected {}",
                        ragged.name,
                        ragged.values.len(),
                        expected
                    ),
                    ragged.name.clone(),
                ));
            }
        }
        Ok(Self { ref_id, fields })
    }

    /// Builds a table whose columns the caller has already aligned.
    pub(crate) fn from_aligned(ref_id: RefId, fields: Vec<Field>) -> Self {
        debug_assert!(fields
            .windows(2)
            .all(|pair| pair[0].values.len() == pair[1].values.len()));
        Self { ref_id, fields }
    }

    /// A `Time` column paired with one number column.
    pub fn time_series(
        ref_id: RefId,
        times: Vec<i64>,
        value_name: &str,
        values: Vec<f64>,
    ) -> Result<Self> {
        Self::new(
            ref_id,
            vec![Field::time(TIME_FIELD, times), Field::number(value_name, values)],
        )
    }

    /// The query target this table answers.
    pub fn ref_id(&self) -> &RefId {
        &self.ref_id
    }

    /// Columns in order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Column by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.fields.first().map_or(0, |f| f.values.len())
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(time, value)` pairs for a time table with one number column.
    pub fn rows(&self, value_name: &str) -> Vec<(i64, f64)> {
        match (
            self.field(TIME_FIELD).and_then(Field::as_time),
            self.field(value_name).and_then(Field::as_number),
        ) {
            (Some(times), Some(values)) => times.iter().copied().zip(values.iter().copied()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Dashboard time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Range start, inclusive.
    pub from: DateTime<Utc>,
    /// Range end, inclusive.
    pub to: DateTime<Utc>,
}

impl TimeRange {
    /// A range, requiring `from <= to`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
        if from > to {
            return Err(SGraphError::validation_field(
                format!("Range start {} is after range end {}", from, to),
                "range",
            ));
        }
        Ok(Self { from, to })
    }

    /// A range from epoch milliseconds.
    pub fn from_millis(from_ms: i64, to_ms: i64) -> Result<Self> {
        let from = DateTime::from_timestamp_millis(from_ms)
            .ok_or_else(|| SGraphError::validation_field("Range start out of bounds", "range"))?;
        let to = DateTime::from_timestamp_millis(to_ms)
            .ok_or_else(|| SGraphError::validation_field("Range end out of bounds", "range"))?;
        Self::new(from, to)
    }
}
