/**
 * File: ./src/significance.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026 3:20:05 pm
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	p-value scoring and significance filter
**/
// src/significance.rs
use std::collections::BTreeMap;

use statrs::distribution::{Binomial, DiscreteCDF};

use crate::bicluster::{Bicluster, Biclusters};
use crate::dataset::Dataset;
use crate::experiment::types::PatternType;
use crate::miner::MiningError;

/// Assigns a p-value to every bicluster.
pub trait SignificanceTest: Send + Sync {
    fn score(
        &self,
        dataset: &Dataset,
        biclusters: Biclusters,
        pattern_type: PatternType,
    ) -> Result<Biclusters, MiningError>;
}

/// Binomial tail test: how likely are at least |rows| dataset rows to show the
/// bicluster's pattern by chance.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinomialSignificance;

impl BinomialSignificance {
    pub fn new() -> Self {
        Self
    }

    /// `P(X >= k)` for `X ~ Binomial(n, p)`.
    pub fn upper_tail(p: f64, n: u64, k: u64) -> Result<f64, MiningError> {
        if k == 0 {
            return Ok(1.0);
        }
        if k > n {
            return Ok(0.0);
        }
        let dist = Binomial::new(p.clamp(0.0, 1.0), n)
            .map_err(|e| MiningError::Failed(format!("binomial({}, {}): {}", n, p, e)))?;
        Ok(dist.sf(k - 1).clamp(0.0, 1.0))
    }

    /// Chance that a random row repeats the bicluster's per-column items, with
    /// each column's own item distribution.
    fn constant_freq_column_probability(
        dataset: &Dataset,
        frequencies: &[BTreeMap<i32, f64>],
        bic: &Bicluster,
    ) -> f64 {
        bic.columns
            .iter()
            .map(|&c| match dominant_item(dataset, bic, c) {
                Some(item) => frequencies[c].get(&item).copied().unwrap_or(0.0),
                None => 1.0,
            })
            .product()
    }

    /// Chance that a random row orders the bicluster's columns the same way.
    fn order_preserving_probability(bic: &Bicluster) -> f64 {
        (1..=bic.num_cols()).fold(1.0, |acc, k| acc / k as f64)
    }
}

/// Most frequent present item of column `col` within the bicluster's rows.
/// Ties go to the smaller item.
pub fn dominant_item(dataset: &Dataset, bic: &Bicluster, col: usize) -> Option<i32> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for &r in &bic.rows {
        if let Some(item) = dataset.item(r, col) {
            *counts.entry(item).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(i32, usize)>, (item, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((item, n)),
        })
        .map(|(item, _)| item)
}

impl SignificanceTest for BinomialSignificance {
    fn score(
        &self,
        dataset: &Dataset,
        mut biclusters: Biclusters,
        pattern_type: PatternType,
    ) -> Result<Biclusters, MiningError> {
        let frequencies = dataset.column_item_frequencies();
        let n = dataset.nrows() as u64;
        for bic in biclusters.iter_mut() {
            dataset.validate_bicluster(bic)?;
            let p = match pattern_type {
                PatternType::OrderPreserving => Self::order_preserving_probability(bic),
                _ => Self::constant_freq_column_probability(dataset, &frequencies, bic),
            };
            bic.pvalue = Self::upper_tail(p, n, bic.num_rows() as u64)?;
        }
        Ok(biclusters)
    }
}

/// Biclusters with `pvalue < alpha`, in input order.
pub fn filter_significant(biclusters: &Biclusters, alpha: f64) -> Biclusters {
    biclusters
        .iter()
        .filter(|b| b.pvalue < alpha)
        .cloned()
        .collect()
}
