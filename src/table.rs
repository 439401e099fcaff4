use std::ops::Index;

use crate::domain::HEADERSTEXT;
use crate::loader::Record;

/// Row-major display table, flattened once from the loaded records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedTable {
    rows: Vec<Vec<String>>,
}

impl ProjectedTable {
    pub fn project(records: &[Record]) -> Self {
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    r.region_name.clone(),
                    r.region_alpha_code.clone(),
                    r.value.clone(),
                    r.ref_date.clone(),
                ]
            })
            .collect();
        Self { rows }
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncolumns(&self) -> usize {
        HEADERSTEXT.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&[String]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Copy of one column, top to bottom.
    pub fn column(&self, column: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.get(column).cloned().unwrap_or_default())
            .collect()
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: String) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = value;
        }
    }
}

/// The editable column titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLabels {
    labels: Vec<String>,
}

impl Default for HeaderLabels {
    fn default() -> Self {
        Self {
            labels: HEADERSTEXT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl HeaderLabels {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.labels.get(idx).map(String::as_str)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut String> {
        self.labels.get_mut(idx)
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.labels.swap(a, b);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.labels.clone()
    }
}

impl Index<usize> for HeaderLabels {
    type Output = str;

    fn index(&self, idx: usize) -> &str {
        &self.labels[idx]
    }
}
