//! Query result parsing.
//!
//! SQL endpoints answer with a tabular envelope:
//!
//! ```json
//! {
//!   "columns": [{"name": "day", "type": "date"}, {"name": "orders", "type": "integer"}],
//!   "rows": [["2024-01-02", 14], ["2024-01-03", null]]
//! }
//! ```
//!
//! [`parse_query_result`] turns this into a [`QueryResult`]. Cells of
//! temporal columns are parsed strictly when [`QueryOptions::parse_dates`]
//! is set; every other cell keeps its JSON value.
//!
//! # Example
//!
//! ```rust
//! use contiamo::rest::{parse_query_result, Cell, QueryOptions, Row};
//! use serde_json::json;
//!
//! let body = json!({
//!     "columns": [{"name": "day", "type": "date"}],
//!     "rows": [["2024-01-02"]]
//! });
//! let result = parse_query_result(&body, &QueryOptions::default()).unwrap();
//!
//! let Row::Named(row) = &result.rows[0] else { unreachable!() };
//! assert!(matches!(row["day"], Cell::Date(_)));
//! ```

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::rest::resource::JsonReply;
use crate::rest::{HttpContext, ResourceError};

/// Column metadata from a query result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Column {
    /// The column name.
    pub name: String,
    /// The declared scalar type, as sent by the server.
    #[serde(rename = "type")]
    pub data_type: String,
}

/// Temporal shape of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalType {
    /// Calendar date without time.
    Date,
    /// Date and time, with or without an offset.
    DateTime,
}

impl Column {
    /// Returns the temporal shape declared for this column, if any.
    #[must_use]
    pub fn temporal_type(&self) -> Option<TemporalType> {
        match self.data_type.trim().to_ascii_lowercase().as_str() {
            "date" => Some(TemporalType::Date),
            "datetime"
            | "timestamp"
            | "timestamptz"
            | "timestamp with time zone"
            | "timestamp without time zone" => Some(TemporalType::DateTime),
            _ => None,
        }
    }

    /// Returns `true` for date and date-time columns.
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        self.temporal_type().is_some()
    }
}

/// One cell of a parsed row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// The wire value, untouched.
    Value(Value),
    /// A parsed `date` value.
    Date(NaiveDate),
    /// A parsed date-time without offset.
    DateTime(NaiveDateTime),
    /// A parsed date-time with offset.
    Timestamp(DateTime<FixedOffset>),
}

impl Cell {
    /// Returns `true` for null wire values.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Returns the wire value, if the cell was not parsed.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// One parsed row.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Cells keyed by column name.
    Named(HashMap<String, Cell>),
    /// Cells in column order.
    Positional(Vec<Cell>),
}

impl Row {
    /// Returns the cell for `column`, by name or position depending on the
    /// row layout.
    #[must_use]
    pub fn get(&self, columns: &[Column], column: &str) -> Option<&Cell> {
        match self {
            Self::Named(cells) => cells.get(column),
            Self::Positional(cells) => columns
                .iter()
                .position(|c| c.name == column)
                .and_then(|index| cells.get(index)),
        }
    }
}

/// Options for [`parse_query_result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Parse cells of temporal columns into chrono values.
    pub parse_dates: bool,
    /// Key rows by column name instead of position.
    pub use_column_names: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            parse_dates: true,
            use_column_names: true,
        }
    }
}

/// A parsed query result. Column `i` describes cell `i` of every row.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Column metadata in wire order.
    pub columns: Vec<Column>,
    /// Parsed rows in wire order.
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Parses a tabular query response.
///
/// # Errors
///
/// - [`ResourceError::ResponseShape`] if `columns` or `rows` is missing or
///   malformed, a row's length differs from the column count, or rows are
///   keyed by name and two columns share a name
/// - [`ResourceError::DataFormat`] if a temporal cell does not parse
pub fn parse_query_result(
    body: &Value,
    options: &QueryOptions,
) -> Result<QueryResult, ResourceError> {
    parse_rows(body, options, None)
}

/// Parses the body of a SQL response, attaching the response to any
/// shape error.
pub(crate) fn parse_query_reply(
    reply: &JsonReply,
    options: &QueryOptions,
) -> Result<QueryResult, ResourceError> {
    parse_rows(&reply.body, options, Some(&reply.context))
}

fn parse_rows(
    body: &Value,
    options: &QueryOptions,
    response: Option<&HttpContext>,
) -> Result<QueryResult, ResourceError> {
    let shape_error = |cause: &str| {
        ResourceError::invalid_response(cause, HttpContext::for_body(response, body))
    };

    let columns: Vec<Column> = match body.get("columns") {
        Some(columns) => serde_json::from_value(columns.clone())
            .map_err(|e| shape_error(&e.to_string()))?,
        None => return Err(shape_error("missing field 'columns'")),
    };
    let Some(raw_rows) = body.get("rows").and_then(Value::as_array) else {
        return Err(shape_error("expected an array in field 'rows'"));
    };
    if options.use_column_names {
        let mut seen = HashSet::with_capacity(columns.len());
        if let Some(duplicate) = columns.iter().find(|c| !seen.insert(c.name.as_str())) {
            return Err(shape_error(&format!(
                "column name '{}' appears more than once; rows cannot be keyed by name",
                duplicate.name
            )));
        }
    }

    let temporal: Vec<Option<TemporalType>> = columns
        .iter()
        .map(|column| {
            if options.parse_dates {
                column.temporal_type()
            } else {
                None
            }
        })
        .collect();

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (index, raw_row) in raw_rows.iter().enumerate() {
        let Some(raw_cells) = raw_row.as_array() else {
            return Err(shape_error(&format!("row {index} is not an array")));
        };
        if raw_cells.len() != columns.len() {
            return Err(shape_error(&format!(
                "row {index} has {} values but there are {} columns",
                raw_cells.len(),
                columns.len()
            )));
        }

        let cells = raw_cells
            .iter()
            .zip(&columns)
            .zip(&temporal)
            .map(|((value, column), temporal)| parse_cell(value, column, *temporal, index))
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(if options.use_column_names {
            Row::Named(
                columns
                    .iter()
                    .map(|column| column.name.clone())
                    .zip(cells)
                    .collect(),
            )
        } else {
            Row::Positional(cells)
        });
    }

    Ok(QueryResult { columns, rows })
}

fn parse_cell(
    value: &Value,
    column: &Column,
    temporal: Option<TemporalType>,
    row: usize,
) -> Result<Cell, ResourceError> {
    let Some(temporal) = temporal else {
        return Ok(Cell::Value(value.clone()));
    };
    if value.is_null() {
        return Ok(Cell::Value(Value::Null));
    }

    let data_format = |message: String| ResourceError::DataFormat {
        column: column.name.clone(),
        row,
        value: value.to_string(),
        message,
    };
    let Some(text) = value.as_str() else {
        return Err(data_format(format!(
            "expected a string for a {} column",
            column.data_type
        )));
    };

    match temporal {
        TemporalType::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Cell::Date)
            .map_err(|e| data_format(e.to_string())),
        TemporalType::DateTime => parse_date_time(text).map_err(data_format),
    }
}

fn parse_date_time(text: &str) -> Result<Cell, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(Cell::Timestamp(timestamp));
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(Cell::DateTime)
        .map_err(|e| e.to_string())
}
