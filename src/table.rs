//! String-celled table handed to the CSV writer, plus a small shape summary.

use crate::record::{FlatRow, FLAT_COLUMNS};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Shape of a table: dimensions, column names, and empty cells per column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub empty_counts: Vec<(String, usize)>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { headers: headers.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    /// Detail table: one row per `FlatRow`, columns in `FLAT_COLUMNS` order.
    pub fn from_rows(rows: &[FlatRow]) -> Self {
        let mut t = Self::new(FLAT_COLUMNS);
        t.rows = rows.iter().map(FlatRow::cells).collect();
        t
    }

    /// Append a row; short rows are padded with empty cells, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn summary(&self) -> TableSummary {
        let empty_counts = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let n = self.rows.iter().filter(|r| r.get(i).map_or(true, |c| c.is_empty())).count();
                (h.clone(), n)
            })
            .collect();
        TableSummary {
            rows: self.rows.len(),
            columns: self.headers.len(),
            column_names: self.headers.clone(),
            empty_counts,
        }
    }
}
