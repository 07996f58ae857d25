//! Per-experiment metrics snapshot and the summaries written to the metrics sheets.

/**
 * File: /src/evaluation/metrics.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Metrics snapshot, purity ladder and purest biclusters
 */

use std::fmt;

use serde::{Deserialize, Serialize};

/// Immutable metrics of one solution. Row i of the per-category tables belongs
/// to bicluster i; column j to `categories[j]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsExperiment {
    pub categories: Vec<String>,
    pub solution_entropy: f64,
    pub solution_purity: f64,
    pub pvalues: Vec<f64>,
    pub row_counts: Vec<usize>,
    pub entropies: Vec<f64>,
    pub purities: Vec<f64>,
    pub precision: Vec<Vec<f64>>,
    pub recall: Vec<Vec<f64>>,
    pub f_measure: Vec<Vec<f64>>,
}

/// Purity thresholds reported as bicluster counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurityLadder {
    levels: Vec<f64>,
}

impl Default for PurityLadder {
    fn default() -> Self {
        Self {
            levels: vec![0.5, 0.75, 0.8, 0.85, 0.9, 0.95, 1.0],
        }
    }
}

impl PurityLadder {
    /// Levels are sorted ascending and deduplicated.
    pub fn new(mut levels: Vec<f64>) -> Self {
        levels.retain(|l| !l.is_nan());
        levels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        levels.dedup();
        Self { levels }
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Column header for a level.
    pub fn label(level: f64) -> String {
        if level == 1.0 {
            format!("No. Pure Bics (= {:.1})", level)
        } else {
            format!("No. Pure Bics (> {})", level)
        }
    }
}

/// A bicluster whose dominant category is precise enough.
#[derive(Debug, Clone, PartialEq)]
pub struct PurestBicluster {
    /// 1-based position in the solution
    pub ordinal: usize,
    pub category: String,
    pub precision: f64,
}

impl fmt::Display for PurestBicluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.ordinal)
    }
}

impl MetricsExperiment {
    pub fn num_biclusters(&self) -> usize {
        self.purities.len()
    }

    pub fn count_significant(&self, alpha: f64) -> usize {
        self.pvalues.iter().filter(|&&p| p < alpha).count()
    }

    /// Number of biclusters with purity at or above each level.
    pub fn purity_ladder_counts(&self, ladder: &PurityLadder) -> Vec<(f64, usize)> {
        ladder
            .levels()
            .iter()
            .map(|&level| (level, self.purities.iter().filter(|&&p| p >= level).count()))
            .collect()
    }

    /// Biclusters with purity >= `threshold` whose most precise category also
    /// reaches it. The first category wins ties.
    pub fn purest_biclusters(&self, threshold: f64) -> Vec<PurestBicluster> {
        self.purities
            .iter()
            .enumerate()
            .filter(|&(_, &purity)| purity >= threshold)
            .filter_map(|(i, _)| {
                let row = self.precision.get(i)?;
                let (best, precision) = row.iter().enumerate().fold(
                    None,
                    |best: Option<(usize, f64)>, (j, &p)| match best {
                        Some((_, q)) if q >= p => best,
                        _ => Some((j, p)),
                    },
                )?;
                if precision >= threshold {
                    Some(PurestBicluster {
                        ordinal: i + 1,
                        category: self.categories.get(best)?.clone(),
                        precision,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Biclusters with purity >= `threshold`.
    pub fn purest_count(&self, threshold: f64) -> usize {
        self.purities.iter().filter(|&&p| p >= threshold).count()
    }

    /// Perfectly pure biclusters made only of `category`.
    pub fn pure_count_for(&self, category: &str) -> usize {
        let Some(j) = self.categories.iter().position(|c| c == category) else {
            return 0;
        };
        self.purities
            .iter()
            .zip(&self.precision)
            .filter(|&(&purity, row)| purity == 1.0 && row.get(j).copied() == Some(1.0))
            .count()
    }

    pub fn average_rows(&self) -> f64 {
        if self.row_counts.is_empty() {
            return 0.0;
        }
        self.row_counts.iter().sum::<usize>() as f64 / self.row_counts.len() as f64
    }

    /// Mean fraction of the dataset's rows covered by one bicluster.
    pub fn average_row_fraction(&self, total_rows: usize) -> f64 {
        if total_rows == 0 {
            return 0.0;
        }
        self.average_rows() / total_rows as f64
    }
}
