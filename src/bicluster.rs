//! # Biclusters
//!
//! A bicluster is a co-selected set of rows and columns. Solutions are kept as an
//! ordered collection so that p-value ordering and report numbering are stable.

/**
 * File: /src/bicluster.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Bicluster and ordered bicluster collection
 */

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A bicluster over an item matrix. Rows and columns are never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BiclusterFields")]
pub struct Bicluster {
    pub(crate) rows: BTreeSet<usize>,
    pub(crate) columns: BTreeSet<usize>,
    /// Significance of the pattern; 1.0 until scored
    pub pvalue: f64,
    /// Representative item per column (or per row for column orientation)
    pub pattern: Option<Vec<Option<i32>>>,
}

impl Bicluster {
    /// Returns `None` when either index set is empty.
    pub fn new<R, C>(rows: R, columns: C) -> Option<Self>
    where
        R: IntoIterator<Item = usize>,
        C: IntoIterator<Item = usize>,
    {
        let rows: BTreeSet<usize> = rows.into_iter().collect();
        let columns: BTreeSet<usize> = columns.into_iter().collect();
        if rows.is_empty() || columns.is_empty() {
            return None;
        }
        Some(Self {
            rows,
            columns,
            pvalue: 1.0,
            pattern: None,
        })
    }

    pub fn rows(&self) -> &BTreeSet<usize> {
        &self.rows
    }

    pub fn columns(&self) -> &BTreeSet<usize> {
        &self.columns
    }

    pub fn with_pvalue(mut self, pvalue: f64) -> Self {
        self.pvalue = pvalue;
        self
    }

    pub fn area(&self) -> usize {
        self.rows.len() * self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn row_indices(&self) -> Vec<usize> {
        self.rows.iter().copied().collect()
    }

    pub fn col_indices(&self) -> Vec<usize> {
        self.columns.iter().copied().collect()
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.rows.contains(&row) && self.columns.contains(&col)
    }
}

#[derive(Deserialize)]
struct BiclusterFields {
    rows: BTreeSet<usize>,
    columns: BTreeSet<usize>,
    pvalue: f64,
    #[serde(default)]
    pattern: Option<Vec<Option<i32>>>,
}

impl TryFrom<BiclusterFields> for Bicluster {
    type Error = &'static str;

    fn try_from(fields: BiclusterFields) -> Result<Self, Self::Error> {
        let bic = Bicluster::new(fields.rows, fields.columns)
            .ok_or("Bicluster needs at least one row and one column")?;
        Ok(Bicluster {
            pvalue: fields.pvalue,
            pattern: fields.pattern,
            ..bic
        })
    }
}

impl fmt::Display for Bicluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bicluster({}x{}, rows={:?}, cols={:?}, p={:e})",
            self.rows.len(),
            self.columns.len(),
            self.rows,
            self.columns,
            self.pvalue
        )
    }
}

/// Ordered collection of biclusters. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Biclusters(Vec<Bicluster>);

impl Biclusters {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bicluster> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bicluster> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Bicluster> {
        self.0.iter_mut()
    }


    /// Appends every bicluster of `other`, keeping order.
    pub fn union(&mut self, other: Biclusters) {
        self.0.extend(other.0);
    }

    /// Stable ascending sort by p-value. NaN sorts last.
    pub fn order_by_pvalue(&mut self) {
        self.0.sort_by(|a, b| match (a.pvalue.is_nan(), b.pvalue.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => a.pvalue.partial_cmp(&b.pvalue).unwrap_or(Ordering::Equal),
        });
    }

    /// How many biclusters cover each cell of a `rows x cols` matrix.
    pub fn element_counts(&self, rows: usize, cols: usize) -> Array2<usize> {
        let mut counts = Array2::<usize>::zeros((rows, cols));
        for bic in &self.0 {
            for &r in bic.rows.iter().filter(|&&r| r < rows) {
                for &c in bic.columns.iter().filter(|&&c| c < cols) {
                    counts[(r, c)] += 1;
                }
            }
        }
        counts
    }

    pub fn total_rows(&self) -> usize {
        self.0.iter().map(Bicluster::num_rows).sum()
    }
}

impl From<Vec<Bicluster>> for Biclusters {
    fn from(v: Vec<Bicluster>) -> Self {
        Self(v)
    }
}

impl FromIterator<Bicluster> for Biclusters {
    fn from_iter<I: IntoIterator<Item = Bicluster>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Biclusters {
    type Item = Bicluster;
    type IntoIter = std::vec::IntoIter<Bicluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Biclusters {
    type Item = &'a Bicluster;
    type IntoIter = std::slice::Iter<'a, Bicluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
