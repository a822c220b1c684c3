//! The tabular backend seen from the core: read everything, read the header,
//! write one cell.

use crate::record::{cell_text, Row};
use async_trait::async_trait;
use quotebot_common::{QuotebotError, Result};
use serde_json::Value;
use std::sync::Mutex;

/// A 1-indexed table whose first row holds the column names.
#[async_trait]
pub trait TabularSource: Send + Sync {
    /// Every data row (row 2 onwards) keyed by header name, in table order.
    /// Empty rows must be kept so positions line up with table rows.
    async fn read_all_rows(&self) -> Result<Vec<Row>>;

    /// Row 1, left to right.
    async fn read_header_row(&self) -> Result<Vec<String>>;

    /// Overwrite the cell at `row`/`column` (both 1-based).
    async fn write_cell(&self, row: usize, column: usize, value: &str) -> Result<()>;
}

/// Turn a header-first grid into keyed rows.
///
/// Short rows are padded with `""`, blank header cells are skipped and a
/// repeated header keeps its first column.
pub fn rows_from_grid(grid: &[Vec<Value>]) -> Vec<Row> {
    let Some((header, data)) = grid.split_first() else {
        return Vec::new();
    };
    let names: Vec<Option<String>> = header
        .iter()
        .map(|c| cell_text(c).filter(|s| !s.trim().is_empty()))
        .collect();

    data.iter()
        .map(|cells| {
            let mut row = Row::with_capacity(names.len());
            for (idx, name) in names.iter().enumerate() {
                let Some(name) = name else { continue };
                let value = cells
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new()));
                row.entry(name.clone()).or_insert(value);
            }
            row
        })
        .collect()
}

/// In-memory table, handy offline and in tests.
#[derive(Debug, Default)]
pub struct MemoryTable {
    grid: Mutex<Vec<Vec<Value>>>,
}

impl MemoryTable {
    /// Build from a header-first grid.
    pub fn from_grid(grid: Vec<Vec<Value>>) -> Self {
        Self {
            grid: Mutex::new(grid),
        }
    }

    /// Build from keyed rows. Columns are laid out in order of first
    /// appearance.
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut header: Vec<String> = Vec::new();
        for row in rows {
            for k in row.keys() {
                if !header.contains(k) {
                    header.push(k.clone());
                }
            }
        }

        let mut grid = Vec::with_capacity(rows.len() + 1);
        grid.push(header.iter().cloned().map(Value::String).collect());
        for row in rows {
            grid.push(
                header
                    .iter()
                    .map(|h| row.get(h).cloned().unwrap_or(Value::String(String::new())))
                    .collect(),
            );
        }
        Self::from_grid(grid)
    }

    /// Copy of the current grid.
    pub fn snapshot(&self) -> Vec<Vec<Value>> {
        self.lock().clone()
    }

    /// Cell at `row`/`column` (1-based) as a string, if set.
    pub fn cell(&self, row: usize, column: usize) -> Option<String> {
        let grid = self.lock();
        let value = grid.get(row.checked_sub(1)?)?.get(column.checked_sub(1)?)?;
        cell_text(value)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<Value>>> {
        // A poisoned lock only means a writer panicked mid-update; the grid is
        // still a valid Vec.
        self.grid.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TabularSource for MemoryTable {
    async fn read_all_rows(&self) -> Result<Vec<Row>> {
        Ok(rows_from_grid(&self.lock()))
    }

    async fn read_header_row(&self) -> Result<Vec<String>> {
        Ok(self
            .lock()
            .first()
            .map(|h| h.iter().map(|c| cell_text(c).unwrap_or_default()).collect())
            .unwrap_or_default())
    }

    async fn write_cell(&self, row: usize, column: usize, value: &str) -> Result<()> {
        if row == 0 || column == 0 {
            return Err(QuotebotError::WriteBack(format!(
                "cell ({row}, {column}) is out of range; rows and columns start at 1"
            )));
        }
        let mut grid = self.lock();
        if grid.len() < row {
            grid.resize_with(row, Vec::new);
        }
        let cells = &mut grid[row - 1];
        if cells.len() < column {
            cells.resize(column, Value::String(String::new()));
        }
        cells[column - 1] = Value::String(value.to_string());
        Ok(())
    }
}
