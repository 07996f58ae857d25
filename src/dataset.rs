//! # Datasets
//!
//! [`RawDataset`] holds the real-valued input with its row and column names.
//! [`Dataset`] is its itemized form: every cell is an item from a bounded
//! alphabet, or `None` once missing or removed.

/**
 * File: /src/dataset.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Raw and itemized datasets
 */

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt;

use ndarray::{Array2, Axis};

use crate::bicluster::Bicluster;
use crate::matrix::Matrix;

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    ShapeMismatch {
        rows: usize,
        cols: usize,
        row_ids: usize,
        columns: usize,
    },
    BiclusterOutOfRange {
        max_row: usize,
        max_col: usize,
        rows: usize,
        cols: usize,
    },
    EmptyBicluster,
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::ShapeMismatch {
                rows,
                cols,
                row_ids,
                columns,
            } => write!(
                f,
                "Matrix is {}x{} but {} row ids and {} column names were given",
                rows, cols, row_ids, columns
            ),
            DatasetError::BiclusterOutOfRange {
                max_row,
                max_col,
                rows,
                cols,
            } => write!(
                f,
                "Bicluster reaches ({}, {}) in a {}x{} dataset",
                max_row, max_col, rows, cols
            ),
            DatasetError::EmptyBicluster => write!(f, "Bicluster has no rows or no columns"),
        }
    }
}

impl Error for DatasetError {}

/// Real-valued input matrix; `NaN` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    row_ids: Vec<String>,
    columns: Vec<String>,
    values: Array2<f64>,
}

impl RawDataset {
    pub fn new(
        row_ids: Vec<String>,
        columns: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self, DatasetError> {
        let (rows, cols) = values.dim();
        if rows != row_ids.len() || cols != columns.len() {
            return Err(DatasetError::ShapeMismatch {
                rows,
                cols,
                row_ids: row_ids.len(),
                columns: columns.len(),
            });
        }
        Ok(Self {
            row_ids,
            columns,
            values,
        })
    }

    /// Names rows `0..n` and columns `C0..Cm`.
    pub fn from_values(values: Array2<f64>) -> Self {
        let (rows, cols) = values.dim();
        Self {
            row_ids: (0..rows).map(|i| i.to_string()).collect(),
            columns: (0..cols).map(|j| format!("C{}", j)).collect(),
            values,
        }
    }

    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.row_ids.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Derived dataset without the named column; a plain copy if it is absent.
    pub fn without_column(&self, name: &str) -> RawDataset {
        match self.column_index(name) {
            Some(idx) => {
                let kept: Vec<usize> = (0..self.ncols()).filter(|&j| j != idx).collect();
                RawDataset {
                    row_ids: self.row_ids.clone(),
                    columns: kept.iter().map(|&j| self.columns[j].clone()).collect(),
                    values: self.values.select(Axis(1), &kept),
                }
            }
            None => self.clone(),
        }
    }
}

/// Summary printed before and after item removal.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStatistics {
    pub rows: usize,
    pub columns: usize,
    pub missing: usize,
    pub item_counts: BTreeMap<i32, usize>,
}

impl fmt::Display for DatasetStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements = self.rows * self.columns;
        let missing_pct = if elements == 0 {
            0.0
        } else {
            100.0 * self.missing as f64 / elements as f64
        };
        writeln!(f, "#rows = {}", self.rows)?;
        writeln!(f, "#columns = {}", self.columns)?;
        writeln!(f, "#elements = {}", elements)?;
        writeln!(f, "#missing = {} ({:.2}%)", self.missing, missing_pct)?;
        let histogram: Vec<String> = self
            .item_counts
            .iter()
            .map(|(item, count)| format!("{}:{}", item, count))
            .collect();
        write!(f, "items = {{{}}}", histogram.join(", "))
    }
}

/// Itemized dataset handed to the miner.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    row_ids: Vec<String>,
    columns: Vec<String>,
    original_columns: Vec<String>,
    items: Matrix<Option<i32>>,
    nr_items: usize,
}

impl Dataset {
    pub fn new(
        row_ids: Vec<String>,
        columns: Vec<String>,
        original_columns: Vec<String>,
        items: Array2<Option<i32>>,
        nr_items: usize,
    ) -> Result<Self, DatasetError> {
        let (rows, cols) = items.dim();
        if rows != row_ids.len() || cols != columns.len() {
            return Err(DatasetError::ShapeMismatch {
                rows,
                cols,
                row_ids: row_ids.len(),
                columns: columns.len(),
            });
        }
        Ok(Self {
            row_ids,
            columns,
            original_columns,
            items: Matrix::new(items),
            nr_items,
        })
    }

    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    /// Active columns, after any scalability reduction.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column names before reduction.
    pub fn original_columns(&self) -> &[String] {
        &self.original_columns
    }

    pub fn items(&self) -> &Matrix<Option<i32>> {
        &self.items
    }

    pub fn item(&self, row: usize, col: usize) -> Option<i32> {
        self.items.get(row, col).copied().flatten()
    }

    pub fn nrows(&self) -> usize {
        self.items.rows
    }

    pub fn ncols(&self) -> usize {
        self.items.cols
    }

    pub fn nr_items(&self) -> usize {
        self.nr_items
    }

    pub fn statistics(&self) -> DatasetStatistics {
        let mut item_counts = BTreeMap::new();
        let mut missing = 0;
        for cell in self.items.data.iter() {
            match cell {
                Some(item) => *item_counts.entry(*item).or_insert(0) += 1,
                None => missing += 1,
            }
        }
        DatasetStatistics {
            rows: self.nrows(),
            columns: self.ncols(),
            missing,
            item_counts,
        }
    }

    /// Blanks every cell holding one of `items`; returns how many were blanked.
    pub fn remove_items(&mut self, items: &BTreeSet<i32>) -> usize {
        if items.is_empty() {
            return 0;
        }
        let mut removed = 0;
        for cell in self.items.data.iter_mut() {
            if cell.map_or(false, |v| items.contains(&v)) {
                *cell = None;
                removed += 1;
            }
        }
        removed
    }

    /// Blanks `fraction` of the covered elements, most-covered first.
    /// Ties keep row-major order. Returns how many were blanked.
    pub fn remove_elements(&mut self, counts: &Array2<usize>, fraction: f64) -> usize {
        let mut covered: Vec<((usize, usize), usize)> = counts
            .indexed_iter()
            .filter(|&((r, c), &n)| n > 0 && self.item(r, c).is_some())
            .map(|(idx, &n)| (idx, n))
            .collect();
        if covered.is_empty() {
            return 0;
        }
        // stable sort keeps row-major order among equal counts
        covered.sort_by(|a, b| b.1.cmp(&a.1));

        let fraction = fraction.clamp(0.0, 1.0);
        let target = ((covered.len() as f64) * fraction).ceil() as usize;
        for &((r, c), _) in covered.iter().take(target) {
            self.items[(r, c)] = None;
        }
        target.min(covered.len())
    }

    pub fn validate_bicluster(&self, bic: &Bicluster) -> Result<(), DatasetError> {
        let (max_row, max_col) = match (bic.rows.last(), bic.columns.last()) {
            (Some(&r), Some(&c)) => (r, c),
            _ => return Err(DatasetError::EmptyBicluster),
        };
        if max_row >= self.nrows() || max_col >= self.ncols() {
            return Err(DatasetError::BiclusterOutOfRange {
                max_row,
                max_col,
                rows: self.nrows(),
                cols: self.ncols(),
            });
        }
        Ok(())
    }

    /// Relative frequency of each item per column, over present cells.
    pub fn column_item_frequencies(&self) -> Vec<BTreeMap<i32, f64>> {
        (0..self.ncols())
            .map(|j| {
                let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
                let mut present = 0usize;
                for item in self.items.data.column(j).iter().flatten() {
                    *counts.entry(*item).or_insert(0) += 1;
                    present += 1;
                }
                counts
                    .into_iter()
                    .map(|(item, n)| (item, n as f64 / present as f64))
                    .collect()
            })
            .collect()
    }
}
