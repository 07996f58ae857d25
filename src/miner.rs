//! # Bicluster Mining
//!
//! The [`Miner`] trait is the seam to the pattern mining engine. [`ItemClosureMiner`]
//! is a small baseline: every present (column, item) pair seeds a row set, whose
//! closure is the set of columns those rows agree on. It treats every pattern
//! family as constant coherence, which is enough to drive the experiment pipeline.

/**
 * File: /src/miner.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Miner trait and closure-based baseline miner
 */

use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt;

use log::debug;

use crate::bicluster::{Bicluster, Biclusters};
use crate::dataset::{Dataset, DatasetError};
use crate::experiment::types::{
    ClosingConfig, FilteringCriteria, Orientation, PatternConfig, StoppingCriterion,
};

#[derive(Debug, Clone, PartialEq)]
pub enum MiningError {
    /// The engine gave up
    Failed(String),
    InvalidDataset(DatasetError),
}

impl fmt::Display for MiningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiningError::Failed(msg) => write!(f, "Mining failed: {}", msg),
            MiningError::InvalidDataset(e) => write!(f, "Mining produced an invalid bicluster: {}", e),
        }
    }
}

impl Error for MiningError {}

impl From<DatasetError> for MiningError {
    fn from(e: DatasetError) -> Self {
        MiningError::InvalidDataset(e)
    }
}

/// Pattern mining engine
pub trait Miner: Send + Sync {
    fn mine(
        &self,
        dataset: &Dataset,
        orientation: Orientation,
        pattern: &PatternConfig,
        stopping: &StoppingCriterion,
    ) -> Result<Biclusters, MiningError>;

    fn name(&self) -> &str;
}

/// Closure-based constant pattern miner.
#[derive(Debug, Clone, Default)]
pub struct ItemClosureMiner {
    /// Smallest row support ever considered
    pub min_rows: usize,
}

impl ItemClosureMiner {
    pub fn new(min_rows: usize) -> Self {
        Self {
            min_rows: min_rows.max(1),
        }
    }

    /// Candidate biclusters as (support set, pattern set) in dataset coordinates.
    fn closed_candidates(&self, data: &Dataset, orientation: Orientation, min_pattern: usize) -> Vec<Bicluster> {
        // work in (support, pattern) space so both orientations share the code
        let (n_support, n_pattern) = match orientation {
            Orientation::PatternOnRows => (data.nrows(), data.ncols()),
            Orientation::PatternOnColumns => (data.ncols(), data.nrows()),
        };
        let item = |s: usize, p: usize| match orientation {
            Orientation::PatternOnRows => data.item(s, p),
            Orientation::PatternOnColumns => data.item(p, s),
        };

        let min_rows = self.min_rows.max(2);
        let mut seen: HashSet<(Vec<usize>, Vec<usize>)> = HashSet::new();
        let mut out = Vec::new();

        for seed in 0..n_pattern {
            let values: BTreeSet<i32> = (0..n_support).filter_map(|s| item(s, seed)).collect();
            for v in values {
                let support: Vec<usize> = (0..n_support).filter(|&s| item(s, seed) == Some(v)).collect();
                if support.len() < min_rows {
                    continue;
                }
                // closure: every pattern position where the support agrees
                let pattern: Vec<usize> = (0..n_pattern)
                    .filter(|&p| {
                        let first = item(support[0], p);
                        first.is_some() && support.iter().all(|&s| item(s, p) == first)
                    })
                    .collect();
                if pattern.len() < min_pattern || !seen.insert((support.clone(), pattern.clone())) {
                    continue;
                }
                let bic = match orientation {
                    Orientation::PatternOnRows => Bicluster::new(support, pattern),
                    Orientation::PatternOnColumns => Bicluster::new(pattern, support),
                };
                if let Some(bic) = bic {
                    out.push(bic);
                }
            }
        }
        out
    }
}

fn support_size(bic: &Bicluster, orientation: Orientation) -> usize {
    match orientation {
        Orientation::PatternOnRows => bic.num_rows(),
        Orientation::PatternOnColumns => bic.num_cols(),
    }
}

/// Applies the stopping criterion to candidates sorted by decreasing support.
fn apply_stopping(
    mut candidates: Vec<Bicluster>,
    data: &Dataset,
    orientation: Orientation,
    stopping: &StoppingCriterion,
) -> Vec<Bicluster> {
    candidates.sort_by(|a, b| support_size(b, orientation).cmp(&support_size(a, orientation)));
    match *stopping {
        StoppingCriterion::MinBicsBeforeMerging(n) => {
            // lower the support level until at least n biclusters are found
            let mut taken = 0;
            while taken < candidates.len() {
                let level = support_size(&candidates[taken], orientation);
                while taken < candidates.len() && support_size(&candidates[taken], orientation) == level {
                    taken += 1;
                }
                if taken >= n {
                    break;
                }
            }
            candidates.truncate(taken);
            candidates
        }
        StoppingCriterion::MinAreaPercentage(fraction) => {
            let total = (data.nrows() * data.ncols()) as f64;
            let mut covered: HashSet<(usize, usize)> = HashSet::new();
            let mut kept = Vec::new();
            for bic in candidates {
                if total > 0.0 && covered.len() as f64 / total >= fraction {
                    break;
                }
                for &r in &bic.rows {
                    for &c in &bic.columns {
                        covered.insert((r, c));
                    }
                }
                kept.push(bic);
            }
            kept
        }
        StoppingCriterion::MinRowSupport(fraction) => {
            let n_support = match orientation {
                Orientation::PatternOnRows => data.nrows(),
                Orientation::PatternOnColumns => data.ncols(),
            };
            let min_support = (fraction * n_support as f64).ceil() as usize;
            candidates.retain(|b| support_size(b, orientation) >= min_support);
            candidates
        }
    }
}

fn overlap(a: &Bicluster, b: &Bicluster) -> f64 {
    let shared = a.rows.intersection(&b.rows).count() * a.columns.intersection(&b.columns).count();
    let smaller = a.area().min(b.area());
    if smaller == 0 {
        0.0
    } else {
        shared as f64 / smaller as f64
    }
}

/// Merges biclusters whose overlap reaches the threshold, then drops biclusters
/// mostly contained in a larger one.
fn close(mut bics: Vec<Bicluster>, closing: &ClosingConfig) -> Vec<Bicluster> {
    if closing.merge_overlap <= 1.0 {
        let mut merged: Vec<Bicluster> = Vec::with_capacity(bics.len());
        for bic in bics {
            match merged.iter_mut().find(|m| overlap(m, &bic) >= closing.merge_overlap) {
                Some(target) => {
                    target.rows.extend(bic.rows);
                    target.columns.extend(bic.columns);
                }
                None => merged.push(bic),
            }
        }
        bics = merged;
    }

    let contained = |small: &Bicluster, large: &Bicluster| -> f64 {
        match closing.filter {
            FilteringCriteria::Overall => overlap(small, large),
            FilteringCriteria::Rows => {
                small.rows.intersection(&large.rows).count() as f64 / small.num_rows() as f64
            }
            FilteringCriteria::Columns => {
                small.columns.intersection(&large.columns).count() as f64 / small.num_cols() as f64
            }
        }
    };
    let keep: Vec<bool> = bics
        .iter()
        .enumerate()
        .map(|(i, b)| {
            !bics.iter().enumerate().any(|(j, other)| {
                i != j
                    && (other.area() > b.area() || (other.area() == b.area() && j < i))
                    && contained(b, other) > closing.filter_threshold
            })
        })
        .collect();
    bics.into_iter()
        .zip(keep)
        .filter_map(|(b, k)| if k { Some(b) } else { None })
        .collect()
}

impl Miner for ItemClosureMiner {
    fn mine(
        &self,
        dataset: &Dataset,
        orientation: Orientation,
        pattern: &PatternConfig,
        stopping: &StoppingCriterion,
    ) -> Result<Biclusters, MiningError> {
        let candidates = self.closed_candidates(dataset, orientation, pattern.min_columns());
        debug!("{} closed candidates before stopping criterion", candidates.len());
        let selected = apply_stopping(candidates, dataset, orientation, stopping);
        let closed = close(selected, pattern.closing());
        for bic in &closed {
            dataset.validate_bicluster(bic)?;
        }
        Ok(closed.into())
    }

    fn name(&self) -> &str {
        "ItemClosure"
    }
}
