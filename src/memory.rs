//! Grid-backed [`Workbook`] kept entirely in memory.
//!
//! Useful as a JSON snapshot of a configuration workbook, and as the fixture
//! the test suites drive the pipeline with.

use crate::error::Result;
use crate::sheet::{check_coordinates, CellValue, Sheet, Workbook};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemorySheet {
    pub name: String,
    /// Row-major cells; `rows[0][0]` is A1. Ragged rows are allowed.
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

impl InMemorySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Coordinates are 1-indexed. Writes at row or column 0 are ignored; the
    /// [`Sheet`] methods reject them with an error instead.
    pub fn with_cell(mut self, row: u32, column: u32, value: impl Into<CellValue>) -> Self {
        self.put(row, column, value.into());
        self
    }

    /// Writes `values` left to right starting at `(row, column)`.
    pub fn with_row<V: Into<CellValue>>(
        mut self,
        row: u32,
        column: u32,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        for (offset, value) in values.into_iter().enumerate() {
            self.put(row, column + offset as u32, value.into());
        }
        self
    }

    /// Writes `values` top to bottom starting at `(row, column)`.
    pub fn with_column<V: Into<CellValue>>(
        mut self,
        row: u32,
        column: u32,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        for (offset, value) in values.into_iter().enumerate() {
            self.put(row + offset as u32, column, value.into());
        }
        self
    }

    fn get(&self, row: u32, column: u32) -> CellValue {
        let (Some(r), Some(c)) = (row.checked_sub(1), column.checked_sub(1)) else {
            return CellValue::Empty;
        };
        self.rows
            .get(r as usize)
            .and_then(|cells| cells.get(c as usize))
            .cloned()
            .unwrap_or_default()
    }

    fn put(&mut self, row: u32, column: u32, value: CellValue) {
        let (Some(r), Some(c)) = (row.checked_sub(1), column.checked_sub(1)) else {
            return;
        };
        let (r, c) = (r as usize, c as usize);
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let cells = &mut self.rows[r];
        if cells.len() <= c {
            cells.resize_with(c + 1, CellValue::default);
        }
        cells[c] = value;
    }
}

impl Sheet for InMemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimensions(&self) -> Result<(u32, u32)> {
        let last_row = self
            .rows
            .iter()
            .rposition(|cells| cells.iter().any(|c| *c != CellValue::Empty))
            .map(|i| i as u32 + 1)
            .unwrap_or(0);
        let last_column = self
            .rows
            .iter()
            .filter_map(|cells| cells.iter().rposition(|c| *c != CellValue::Empty))
            .max()
            .map(|i| i as u32 + 1)
            .unwrap_or(0);
        Ok((last_row, last_column))
    }

    fn cell(&self, row: u32, column: u32) -> Result<CellValue> {
        check_coordinates(row, column)?;
        Ok(self.get(row, column))
    }

    fn range(&self, row: u32, column: u32, rows: u32, columns: u32) -> Result<Vec<Vec<CellValue>>> {
        check_coordinates(row, column)?;
        Ok((row..row + rows)
            .map(|r| (column..column + columns).map(|c| self.get(r, c)).collect())
            .collect())
    }

    fn set_cell(&mut self, row: u32, column: u32, value: CellValue) -> Result<()> {
        check_coordinates(row, column)?;
        self.put(row, column, value);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryWorkbook {
    pub sheets: Vec<InMemorySheet>,
}

impl InMemoryWorkbook {
    pub fn new(sheets: Vec<InMemorySheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&InMemorySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl Workbook for InMemoryWorkbook {
    type Sheet = InMemorySheet;

    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.sheets.iter().map(|s| s.name.clone()).collect())
    }

    fn sheet_mut(&mut self, name: &str) -> Result<Option<&mut InMemorySheet>> {
        Ok(self.sheets.iter_mut().find(|s| s.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_and_reads() {
        let sheet = InMemorySheet::new("Shoes")
            .with_row(2, 1, ["Shoes", "5"])
            .with_column(7, 2, ["red", "shoes"])
            .with_cell(1, 7, 3.0);

        assert_eq!(sheet.cell(2, 1).unwrap(), CellValue::from("Shoes"));
        assert_eq!(sheet.cell(8, 2).unwrap(), CellValue::from("shoes"));
        assert_eq!(sheet.cell(50, 50).unwrap(), CellValue::Empty);
        assert_eq!(sheet.dimensions().unwrap(), (8, 7));

        let block = sheet.range(7, 2, 3, 1).unwrap();
        assert_eq!(
            block,
            vec![
                vec![CellValue::from("red")],
                vec![CellValue::from("shoes")],
                vec![CellValue::Empty],
            ]
        );
    }

    #[test]
    fn test_zero_coordinates_do_not_panic() {
        let mut sheet = InMemorySheet::new("Edges")
            .with_cell(0, 1, "ignored")
            .with_row(1, 0, ["also ignored", "kept"]);

        assert_eq!(sheet.cell(1, 1).unwrap(), CellValue::from("kept"));
        assert_eq!(sheet.dimensions().unwrap(), (1, 1));
        assert!(sheet.cell(0, 1).is_err());
        assert!(sheet.set_cell(1, 0, CellValue::from("x")).is_err());
        assert!(sheet.range(0, 0, 1, 1).is_err());
    }

    #[test]
    fn test_blank_sheet_dimensions() {
        let sheet = InMemorySheet::new("Empty").with_cell(3, 3, CellValue::Empty);
        assert_eq!(sheet.dimensions().unwrap(), (0, 0));
    }

    #[test]
    fn test_workbook_json_snapshot() {
        let json = r#"{
            "sheets": [
                { "name": "First", "rows": [[null, "a"], [1, true]] },
                { "name": "Second" }
            ]
        }"#;
        let mut workbook = InMemoryWorkbook::from_json_str(json).unwrap();
        assert_eq!(workbook.sheet_names().unwrap(), vec!["First", "Second"]);

        let first = workbook.sheet_mut("First").unwrap().unwrap();
        assert_eq!(first.cell(2, 1).unwrap(), CellValue::Number(1.0));
        first.set_cell(4, 4, CellValue::from("x")).unwrap();
        assert_eq!(first.cell(4, 4).unwrap(), CellValue::from("x"));

        assert!(workbook.sheet_mut("Missing").unwrap().is_none());
    }
}
