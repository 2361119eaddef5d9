//! The spreadsheet seam: cell values plus the [`Sheet`] and [`Workbook`] traits
//! a host implements to expose its configuration workbook.

use crate::error::{NegativeKeywordError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single cell as read from the workbook.
///
/// The serialized form is untagged so JSON snapshots stay readable:
/// `null`, `true`, `3`, `"2024-05-01T09:00:00Z"` and `"red shoes"`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    DateTime(DateTime<Utc>),
    Text(String),
}

impl CellValue {
    /// Spreadsheet truthiness: blank cells, empty strings, zero and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Bool(b) => *b,
            CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CellValue::DateTime(_) => true,
            CellValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.is_truthy()
    }

    /// Renders the cell the way it reads on the sheet. Whole numbers print without `.0`.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::DateTime(dt) => dt.to_rfc3339(),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// Numeric view of the cell. Text is parsed after trimming; anything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::DateTime(value)
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// One tab of the configuration workbook. Rows and columns are 1-indexed.
pub trait Sheet {
    fn name(&self) -> &str;

    /// Last used `(row, column)`. A blank sheet reports `(0, 0)`.
    fn dimensions(&self) -> Result<(u32, u32)>;

    fn cell(&self, row: u32, column: u32) -> Result<CellValue>;

    /// Reads a `rows` x `columns` block starting at `(row, column)`.
    ///
    /// The default reads cell by cell; adapters backed by a remote grid should
    /// override it with a single bulk read.
    fn range(&self, row: u32, column: u32, rows: u32, columns: u32) -> Result<Vec<Vec<CellValue>>> {
        (row..row + rows)
            .map(|r| {
                (column..column + columns)
                    .map(|c| self.cell(r, c))
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }

    fn set_cell(&mut self, row: u32, column: u32, value: CellValue) -> Result<()>;
}

pub trait Workbook {
    type Sheet: Sheet;

    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Result<Vec<String>>;

    fn sheet_mut(&mut self, name: &str) -> Result<Option<&mut Self::Sheet>>;
}

impl<T: Workbook + ?Sized> Workbook for &mut T {
    type Sheet = T::Sheet;

    fn sheet_names(&self) -> Result<Vec<String>> {
        (**self).sheet_names()
    }

    fn sheet_mut(&mut self, name: &str) -> Result<Option<&mut Self::Sheet>> {
        (**self).sheet_mut(name)
    }
}

pub(crate) fn check_coordinates(row: u32, column: u32) -> Result<()> {
    if row == 0 || column == 0 {
        return Err(NegativeKeywordError::Workbook(format!(
            "cell ({}, {}) is out of range: rows and columns start at 1",
            row, column
        )));
    }
    Ok(())
}
