//! # Bicluster Evaluation
//!
//! Class-discriminative quality of a biclustering solution against a target
//! class column.
//!
//! ## Measures
//! - Probability matrix: `p[i][j]` is the fraction of bicluster i's rows in category j
//! - Entropy: `-Σ p log2 p` per bicluster, row-weighted over the solution
//! - Purity: `max_j p[i][j]` per bicluster, row-weighted over the solution
//! - Precision `p[i][j]`, recall `count_ij / count_j`, and their harmonic mean
//!
//! Categories are kept in lexicographic order, so column j of every table refers
//! to the same category.

/**
 * File: /src/evaluation/mod.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Created evaluation engine
 */

pub mod metrics;

pub use metrics::{MetricsExperiment, PurityLadder};

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;

use ndarray::Array2;

use crate::bicluster::Biclusters;

/// Missing class values are counted under this category.
pub const MISSING_CATEGORY: &str = "?";

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationError {
    CategoryOutOfRange { index: usize, categories: usize },
    BiclusterOutOfRange { index: usize, biclusters: usize },
    UnknownTargetClass(String),
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::CategoryOutOfRange { index, categories } => write!(
                f,
                "Category index {} out of range ({} categories)",
                index, categories
            ),
            EvaluationError::BiclusterOutOfRange { index, biclusters } => write!(
                f,
                "Bicluster index {} out of range ({} biclusters)",
                index, biclusters
            ),
            EvaluationError::UnknownTargetClass(name) => {
                write!(f, "Target class '{}' has no label column", name)
            }
        }
    }
}

impl Error for EvaluationError {}

/// Per-row category of the target class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassLabels {
    values: Vec<String>,
}

impl ClassLabels {
    /// Missing or blank values become [`MISSING_CATEGORY`].
    pub fn new(values: Vec<Option<String>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| match v {
                Some(s) if !s.trim().is_empty() => s,
                _ => MISSING_CATEGORY.to_string(),
            })
            .collect();
        Self { values }
    }

    pub fn from_strs(values: &[&str]) -> Self {
        Self::new(values.iter().map(|s| Some(s.to_string())).collect())
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        self.values.get(row).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn categories(&self) -> BTreeSet<String> {
        self.values.iter().cloned().collect()
    }
}

/// Evaluates one solution. Borrows the biclusters and labels it was built from.
pub struct BiclusterEvaluator<'a> {
    biclusters: &'a Biclusters,
    labels: &'a ClassLabels,
    categories: Vec<String>,
    /// rows of bicluster i in category j
    counts: Array2<usize>,
    probabilities: Array2<f64>,
    /// rows of the whole dataset in category j
    category_totals: Vec<usize>,
}

impl<'a> BiclusterEvaluator<'a> {
    pub fn new(biclusters: &'a Biclusters, labels: &'a ClassLabels) -> Self {
        let categories: Vec<String> = labels.categories().into_iter().collect();
        let n_bics = biclusters.len();
        let n_cats = categories.len();

        let mut category_totals = vec![0usize; n_cats];
        for row in 0..labels.len() {
            if let Some(j) = labels.get(row).and_then(|v| categories.binary_search_by(|c| c.as_str().cmp(v)).ok()) {
                category_totals[j] += 1;
            }
        }

        let mut counts = Array2::<usize>::zeros((n_bics, n_cats));
        let mut probabilities = Array2::<f64>::zeros((n_bics, n_cats));
        for (i, bic) in biclusters.iter().enumerate() {
            // rows without a label are an unseen category and add nothing
            for &r in &bic.rows {
                if let Some(j) = labels
                    .get(r)
                    .and_then(|v| categories.binary_search_by(|c| c.as_str().cmp(v)).ok())
                {
                    counts[(i, j)] += 1;
                }
            }
            if bic.num_rows() == 0 {
                continue;
            }
            let n_rows = bic.num_rows() as f64;
            for j in 0..n_cats {
                probabilities[(i, j)] = counts[(i, j)] as f64 / n_rows;
            }
        }

        Self {
            biclusters,
            labels,
            categories,
            counts,
            probabilities,
            category_totals,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn num_biclusters(&self) -> usize {
        self.biclusters.len()
    }

    pub fn category_index(&self, value: &str) -> Option<usize> {
        self.categories.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }

    pub fn category(&self, index: usize) -> Result<&str, EvaluationError> {
        self.categories
            .get(index)
            .map(String::as_str)
            .ok_or(EvaluationError::CategoryOutOfRange {
                index,
                categories: self.categories.len(),
            })
    }

    pub fn probability_matrix(&self) -> &Array2<f64> {
        &self.probabilities
    }

    fn check_bicluster(&self, i: usize) -> Result<(), EvaluationError> {
        if i >= self.biclusters.len() {
            return Err(EvaluationError::BiclusterOutOfRange {
                index: i,
                biclusters: self.biclusters.len(),
            });
        }
        Ok(())
    }

    fn check_category(&self, j: usize) -> Result<(), EvaluationError> {
        if j >= self.categories.len() {
            return Err(EvaluationError::CategoryOutOfRange {
                index: j,
                categories: self.categories.len(),
            });
        }
        Ok(())
    }

    pub fn probability(&self, i: usize, j: usize) -> Result<f64, EvaluationError> {
        self.check_bicluster(i)?;
        self.check_category(j)?;
        Ok(self.probabilities[(i, j)])
    }

    pub fn entropy(&self, i: usize) -> Result<f64, EvaluationError> {
        self.check_bicluster(i)?;
        Ok(self
            .probabilities
            .row(i)
            .iter()
            .filter(|&&p| p > 0.0)
            .map(|&p| -p * p.log2())
            .sum())
    }

    pub fn purity(&self, i: usize) -> Result<f64, EvaluationError> {
        self.check_bicluster(i)?;
        Ok(self
            .probabilities
            .row(i)
            .iter()
            .fold(0.0, |acc: f64, &p| acc.max(p)))
    }

    /// Row-weighted mean of `per_bicluster`; 0 for an empty solution.
    fn row_weighted<F>(&self, per_bicluster: F) -> f64
    where
        F: Fn(usize) -> Result<f64, EvaluationError>,
    {
        let total = self.biclusters.total_rows();
        if total == 0 {
            return 0.0;
        }
        self.biclusters
            .iter()
            .enumerate()
            .map(|(i, b)| b.num_rows() as f64 / total as f64 * per_bicluster(i).unwrap_or(0.0))
            .sum()
    }

    pub fn solution_entropy(&self) -> f64 {
        self.row_weighted(|i| self.entropy(i))
    }

    pub fn solution_purity(&self) -> f64 {
        self.row_weighted(|i| self.purity(i))
    }

    pub fn precision(&self, i: usize, j: usize) -> Result<f64, EvaluationError> {
        self.probability(i, j)
    }

    pub fn recall(&self, i: usize, j: usize) -> Result<f64, EvaluationError> {
        self.check_bicluster(i)?;
        self.check_category(j)?;
        let count = self.counts[(i, j)];
        if count == 0 || self.category_totals[j] == 0 {
            return Ok(0.0);
        }
        Ok(count as f64 / self.category_totals[j] as f64)
    }

    pub fn f_measure(&self, i: usize, j: usize) -> Result<f64, EvaluationError> {
        let p = self.precision(i, j)?;
        let r = self.recall(i, j)?;
        if p + r > 0.0 {
            Ok(2.0 * p * r / (p + r))
        } else {
            Ok(0.0)
        }
    }

    /// Precision for a category value; 0 when the value is not a category.
    pub fn precision_for(&self, i: usize, value: &str) -> Result<f64, EvaluationError> {
        self.check_bicluster(i)?;
        match self.category_index(value) {
            Some(j) => self.precision(i, j),
            None => Ok(0.0),
        }
    }

    pub fn recall_for(&self, i: usize, value: &str) -> Result<f64, EvaluationError> {
        self.check_bicluster(i)?;
        match self.category_index(value) {
            Some(j) => self.recall(i, j),
            None => Ok(0.0),
        }
    }

    pub fn f_measure_for(&self, i: usize, value: &str) -> Result<f64, EvaluationError> {
        self.check_bicluster(i)?;
        match self.category_index(value) {
            Some(j) => self.f_measure(i, j),
            None => Ok(0.0),
        }
    }

    /// Row counts of bicluster `i` per category.
    pub fn category_counts(&self, i: usize) -> Result<Vec<(String, usize)>, EvaluationError> {
        self.check_bicluster(i)?;
        Ok(self
            .categories
            .iter()
            .enumerate()
            .map(|(j, c)| (c.clone(), self.counts[(i, j)]))
            .collect())
    }

    /// One-line class breakdown for logs.
    pub fn class_stats(&self, i: usize) -> Result<String, EvaluationError> {
        let parts: Vec<String> = self
            .category_counts(i)?
            .into_iter()
            .map(|(c, n)| format!("{}={}", c, n))
            .collect();
        Ok(format!(
            "Bic_{:02}: rows={} [{}] purity={:.3} entropy={:.3}",
            i + 1,
            self.biclusters.get(i).map_or(0, |b| b.num_rows()),
            parts.join(", "),
            self.purity(i)?,
            self.entropy(i)?
        ))
    }

    /// CSV membership table for classifiers: one line per dataset row, a 0/1
    /// column per bicluster and the target class last.
    pub fn membership_table(&self, row_ids: &[String], target_class: &str) -> String {
        let mut out = String::from("Subject ID,");
        for i in 0..self.biclusters.len() {
            out.push_str(&format!("Bic_{:02},", i + 1));
        }
        out.push_str(target_class);
        out.push('\n');

        for (r, id) in row_ids.iter().enumerate() {
            out.push_str(id);
            out.push(',');
            for bic in self.biclusters.iter() {
                out.push_str(if bic.rows.contains(&r) { "1," } else { "0," });
            }
            out.push_str(self.labels.get(r).unwrap_or(MISSING_CATEGORY));
            out.push('\n');
        }
        out
    }

    /// Snapshot of every measure.
    pub fn metrics(&self) -> MetricsExperiment {
        let n = self.biclusters.len();
        let per_category = |f: &dyn Fn(usize, usize) -> Result<f64, EvaluationError>| -> Vec<Vec<f64>> {
            (0..n)
                .map(|i| {
                    (0..self.categories.len())
                        .map(|j| f(i, j).unwrap_or(0.0))
                        .collect()
                })
                .collect()
        };

        MetricsExperiment {
            categories: self.categories.clone(),
            solution_entropy: self.solution_entropy(),
            solution_purity: self.solution_purity(),
            pvalues: self.biclusters.iter().map(|b| b.pvalue).collect(),
            row_counts: self.biclusters.iter().map(|b| b.num_rows()).collect(),
            entropies: (0..n).map(|i| self.entropy(i).unwrap_or(0.0)).collect(),
            purities: (0..n).map(|i| self.purity(i).unwrap_or(0.0)).collect(),
            precision: per_category(&|i, j| self.precision(i, j)),
            recall: per_category(&|i, j| self.recall(i, j)),
            f_measure: per_category(&|i, j| self.f_measure(i, j)),
        }
    }
}
