//! # Itemization
//!
//! Equal-width discretization of a [`RawDataset`] into a bounded item alphabet,
//! plus the rule deciding which items are removed before mining.

/**
 * File: /src/itemizer.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Discretization, column selection and removal rule
 */

use std::collections::BTreeSet;

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use statrs::statistics::Statistics;

use crate::dataset::{Dataset, DatasetError, RawDataset};
use crate::experiment::types::{
    ColumnSelection, ItemizationConfig, MissingsHandler, Orientation, RemoveCriteria,
};

pub struct Itemizer {
    config: ItemizationConfig,
}

impl Itemizer {
    pub fn new(config: ItemizationConfig) -> Self {
        Self { config }
    }

    pub fn itemize(&self, raw: &RawDataset) -> Result<Dataset, DatasetError> {
        let cfg = &self.config;
        let kept = match cfg.scalability {
            Some(ColumnSelection::TopVariance(perc)) => top_variance_columns(raw.values(), perc),
            Some(ColumnSelection::All) | None => (0..raw.ncols()).collect(),
        };
        debug!(
            "Itemizing {}x{} matrix into {} items ({} columns kept)",
            raw.nrows(),
            raw.ncols(),
            cfg.nr_items,
            kept.len()
        );

        let mut values = raw.values().select(Axis(1), &kept);
        if cfg.missings == MissingsHandler::Replace {
            fill_with_column_mean(&mut values);
        }

        let offset = if cfg.symmetric {
            (cfg.nr_items / 2) as i32
        } else {
            0
        };
        let mut items = Array2::<Option<i32>>::from_elem(values.dim(), None);
        let axis = match cfg.orientation {
            Orientation::PatternOnRows => Axis(1),
            Orientation::PatternOnColumns => Axis(0),
        };
        for (lane, mut out) in values.axis_iter(axis).zip(items.axis_iter_mut(axis)) {
            let bins = discretize(lane, cfg.nr_items);
            for (cell, bin) in out.iter_mut().zip(bins) {
                *cell = bin.map(|b| b as i32 - offset);
            }
        }

        let columns: Vec<String> = kept.iter().map(|&j| raw.columns()[j].clone()).collect();
        Dataset::new(
            raw.row_ids().to_vec(),
            columns,
            raw.columns().to_vec(),
            items,
            cfg.nr_items,
        )
    }
}

/// Equal-width bins over the lane's observed range. Missing values stay `None`;
/// a constant lane maps to the middle bin.
fn discretize(lane: ArrayView1<f64>, nr_items: usize) -> Vec<Option<usize>> {
    let present = lane.iter().filter(|v| !v.is_nan());
    let (min, max) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    let width = max - min;
    lane.iter()
        .map(|&v| {
            if v.is_nan() {
                None
            } else if !(width > 0.0) {
                Some(nr_items / 2)
            } else {
                let bin = ((v - min) / width * nr_items as f64).floor() as usize;
                Some(bin.min(nr_items - 1))
            }
        })
        .collect()
}

fn fill_with_column_mean(values: &mut Array2<f64>) {
    for mut column in values.axis_iter_mut(Axis(1)) {
        let present: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
        if present.is_empty() {
            continue;
        }
        let mean = present.iter().mean();
        column.mapv_inplace(|v| if v.is_nan() { mean } else { v });
    }
}

/// Indices of the `max(1, round(perc * ncols))` highest-variance columns, in
/// original order. Equal variances prefer the earlier column.
fn top_variance_columns(values: &Array2<f64>, perc: f64) -> Vec<usize> {
    let ncols = values.ncols();
    if ncols == 0 {
        return Vec::new();
    }
    let keep = ((perc * ncols as f64).round() as usize).clamp(1, ncols);

    let variances: Array1<f64> = values
        .axis_iter(Axis(1))
        .map(|col| {
            let present: Vec<f64> = col.iter().copied().filter(|v| !v.is_nan()).collect();
            let var = present.iter().variance();
            if var.is_nan() {
                0.0
            } else {
                var
            }
        })
        .collect();

    let mut order: Vec<usize> = (0..ncols).collect();
    order.sort_by(|&a, &b| {
        variances[b]
            .partial_cmp(&variances[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut kept: Vec<usize> = order.into_iter().take(keep).collect();
    kept.sort_unstable();
    kept
}

/// Items blanked before mining. Zero-entry and non-differential removal share
/// one rule: `{-1, 0, 1}` for symmetric alphabets above 5 items, `{0, 1}` for
/// asymmetric ones above 4, otherwise `{0}`.
pub fn items_to_remove(nr_items: usize, removal: RemoveCriteria, symmetric: bool) -> BTreeSet<i32> {
    match removal {
        RemoveCriteria::RemoveNone => BTreeSet::new(),
        RemoveCriteria::RemoveZeroEntries | RemoveCriteria::RemoveNonDiffEntries => {
            if symmetric && nr_items > 5 {
                [-1, 0, 1].into_iter().collect()
            } else if !symmetric && nr_items > 4 {
                [0, 1].into_iter().collect()
            } else {
                [0].into_iter().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn config(nr_items: usize, symmetric: bool) -> ItemizationConfig {
        ItemizationConfig {
            nr_items,
            symmetric,
            missings: MissingsHandler::RemoveValue,
            removal: RemoveCriteria::RemoveZeroEntries,
            orientation: Orientation::PatternOnRows,
            scalability: None,
        }
    }

    #[test]
    fn test_discretize_equal_width() {
        let lane = array![0.0, 2.5, 5.0, 7.5, 10.0, f64::NAN];
        let bins = discretize(lane.view(), 4);
        assert_eq!(bins, vec![Some(0), Some(1), Some(2), Some(3), Some(3), None]);
    }

    #[test]
    fn test_constant_lane_middle_bin() {
        let lane = array![3.0, 3.0];
        assert_eq!(discretize(lane.view(), 5), vec![Some(2), Some(2)]);
    }

    #[test]
    fn test_symmetric_alphabet_centered() {
        let raw = RawDataset::from_values(array![[0.0], [5.0], [10.0]]);
        let data = Itemizer::new(config(5, true)).itemize(&raw).unwrap();
        assert_eq!(data.item(0, 0), Some(-2));
        assert_eq!(data.item(1, 0), Some(0));
        assert_eq!(data.item(2, 0), Some(2));
    }

    #[test]
    fn test_replace_missing_with_mean() {
        let raw = RawDataset::from_values(array![[0.0], [f64::NAN], [10.0]]);
        let mut cfg = config(3, false);
        cfg.missings = MissingsHandler::Replace;
        let data = Itemizer::new(cfg).itemize(&raw).unwrap();
        assert_eq!(data.item(1, 0), Some(1));

        let kept_missing = Itemizer::new(config(3, false)).itemize(&raw).unwrap();
        assert_eq!(kept_missing.item(1, 0), None);
    }

    #[test]
    fn test_scalability_keeps_high_variance_columns() {
        let raw = RawDataset::from_values(array![
            [1.0, 0.0, 5.0, 1.0],
            [1.0, 9.0, 5.0, 2.0],
            [1.0, 0.0, 6.0, 3.0]
        ]);
        let mut cfg = config(3, false);
        cfg.scalability = Some(ColumnSelection::TopVariance(0.5));
        let data = Itemizer::new(cfg).itemize(&raw).unwrap();
        assert_eq!(data.columns(), &["C1".to_string(), "C3".to_string()]);
        assert_eq!(data.original_columns().len(), 4);

        let mut cfg = config(3, false);
        cfg.scalability = Some(ColumnSelection::TopVariance(0.0));
        let data = Itemizer::new(cfg).itemize(&raw).unwrap();
        assert_eq!(data.ncols(), 1);
    }

    #[test]
    fn test_column_orientation_bins_rows() {
        let raw = RawDataset::from_values(array![[0.0, 10.0], [100.0, 100.0]]);
        let mut cfg = config(2, false);
        cfg.orientation = Orientation::PatternOnColumns;
        let data = Itemizer::new(cfg).itemize(&raw).unwrap();
        assert_eq!(data.item(0, 0), Some(0));
        assert_eq!(data.item(0, 1), Some(1));
        // constant row
        assert_eq!(data.item(1, 0), Some(1));
    }

    #[test]
    fn test_items_to_remove() {
        let set = |v: &[i32]| v.iter().copied().collect::<BTreeSet<i32>>();
        assert!(items_to_remove(6, RemoveCriteria::RemoveNone, true).is_empty());
        assert_eq!(items_to_remove(6, RemoveCriteria::RemoveZeroEntries, true), set(&[-1, 0, 1]));
        assert_eq!(items_to_remove(5, RemoveCriteria::RemoveZeroEntries, true), set(&[0]));
        assert_eq!(items_to_remove(5, RemoveCriteria::RemoveZeroEntries, false), set(&[0, 1]));
        assert_eq!(items_to_remove(4, RemoveCriteria::RemoveNonDiffEntries, false), set(&[0]));
    }
}
