//! In-memory, column-oriented table.
//!
//! The table is the container every instruction reads from and writes to.
//! Columns keep their insertion order (which is what `ALL` expands to) and
//! every column holds exactly `row_count()` cells.
//!
//! Cells are typed: most start life as [`Cell::Text`] when loaded from CSV,
//! and instructions such as `EXTRACT_REGEX_PATTERN` or
//! `CONVERT_TO_DATE_OR_DATETIME` turn them into numbers, dates or lists.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::io::Write;

use crate::error::TableError;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Free text (the default for loaded data)
    Text(String),
    /// Integer produced by an extraction
    Int(i64),
    /// Float produced by an extraction
    Float(f64),
    /// Calendar date
    Date(NaiveDate),
    /// Date with a time of day
    DateTime(NaiveDateTime),
    /// Several extracted matches
    List(Vec<String>),
    /// Missing value, also the sentinel for per-cell failures
    Null,
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Render the cell as the text a text function sees.
    ///
    /// Returns `None` for [`Cell::Null`], which text functions leave alone.
    pub fn render(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Convert into a JSON value for record output.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Int(n) => Value::Number((*n).into()),
            Cell::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            Cell::DateTime(dt) => Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Cell::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            Cell::Null => Value::Null,
        }
    }

    /// Text used when writing CSV (`Null` becomes an empty field).
    fn csv_field(&self) -> String {
        match self {
            Cell::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Cell::List(items) => {
                let quoted: Vec<String> = items.iter().map(|s| format!("'{}'", s)).collect();
                write!(f, "[{}]", quoted.join(", "))
            }
            Cell::Null => write!(f, "None"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// Column-oriented table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { columns: Vec::new() }
    }

    /// Build a table from text columns.
    ///
    /// ```ignore
    /// let table = Table::from_text_columns(&[("a", &["x12y"]), ("b", &["no digits"])])?;
    /// ```
    pub fn from_text_columns(columns: &[(&str, &[&str])]) -> Result<Self, TableError> {
        let mut table = Table::new();
        for (name, cells) in columns {
            table.add_column(*name, cells.iter().map(|c| Cell::from(*c)).collect())?;
        }
        Ok(table)
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (0 for a table without columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Cells of a column.
    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.cells.as_slice())
    }

    /// Mutable cells of a column. The length must not be changed.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut [Cell]> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .map(|c| c.cells.as_mut_slice())
    }

    /// Append a new column at the end of the table.
    pub fn add_column(&mut self, name: impl Into<String>, cells: Vec<Cell>) -> Result<(), TableError> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        self.check_length(&name, cells.len())?;
        self.columns.push(Column { name, cells });
        Ok(())
    }

    /// Replace a column's cells, or append the column if it does not exist.
    pub fn set_column(&mut self, name: &str, cells: Vec<Cell>) -> Result<(), TableError> {
        self.check_length(name, cells.len())?;
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.cells = cells,
            None => self.columns.push(Column {
                name: name.to_string(),
                cells,
            }),
        }
        Ok(())
    }

    fn check_length(&self, name: &str, len: usize) -> Result<(), TableError> {
        if !self.columns.is_empty() && len != self.row_count() {
            return Err(TableError::RaggedColumn {
                column: name.to_string(),
                expected: self.row_count(),
                found: len,
            });
        }
        Ok(())
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_records(&self) -> Vec<Value> {
        (0..self.row_count())
            .map(|row| {
                let mut obj = Map::new();
                for column in &self.columns {
                    let value = column.cells.get(row).map(Cell::to_json).unwrap_or(Value::Null);
                    obj.insert(column.name.clone(), value);
                }
                Value::Object(obj)
            })
            .collect()
    }

    /// Write the table as CSV with a header line.
    pub fn write_csv<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        wtr.write_record(self.columns.iter().map(|c| c.name.as_str()))?;
        for row in 0..self.row_count() {
            let fields: Vec<String> = self
                .columns
                .iter()
                .map(|c| c.cells.get(row).map(Cell::csv_field).unwrap_or_default())
                .collect();
            wtr.write_record(&fields)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
