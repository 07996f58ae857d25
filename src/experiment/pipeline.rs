//! # Experiment Pipeline
//!
//! Drives one experiment through
//! `Created -> Itemized -> Cleaned -> Mined -> Aggregated -> Scored -> Filtered`
//! and finally produces an [`ExperimentOutcome`]. Every step is callable on its
//! own; calling one out of order is an [`PipelineError::InvalidTransition`].
//!
//! Mining iterations run against a working copy of the cleaned dataset. The
//! cleaned snapshot itself is never touched, so patterns and p-values are
//! computed on the data as it was before any iteration removed elements.

/**
 * File: /src/experiment/pipeline.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Created experiment pipeline state machine
 */

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::bicluster::Biclusters;
use crate::dataset::{Dataset, DatasetError, DatasetStatistics, RawDataset};
use crate::evaluation::EvaluationError;
use crate::itemizer::{items_to_remove, Itemizer};
use crate::miner::{Miner, MiningError};
use crate::report::{experiment_report, ReportSections};
use crate::significance::{filter_significant, SignificanceTest};
use crate::submatrix::Submatrix;

use super::types::{ConfigurationError, ExperimentConfig, Orientation};

/// Tunables that are not part of the swept parameter space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Fraction of covered elements removed between mining iterations
    pub removal_fraction: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            removal_fraction: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Created,
    Itemized,
    Cleaned,
    Mined,
    Aggregated,
    Scored,
    Filtered,
    Finalized,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    InvalidTransition {
        from: PipelineStage,
        to: PipelineStage,
    },
    Dataset(DatasetError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidTransition { from, to } => {
                write!(f, "Cannot move pipeline from {} to {}", from, to)
            }
            PipelineError::Dataset(e) => write!(f, "Dataset error: {}", e),
        }
    }
}

impl Error for PipelineError {}

impl From<DatasetError> for PipelineError {
    fn from(e: DatasetError) -> Self {
        PipelineError::Dataset(e)
    }
}

/// Anything that makes a single experiment fail.
#[derive(Debug)]
pub enum ExperimentError {
    Configuration(ConfigurationError),
    Mining(MiningError),
    Pipeline(PipelineError),
    Evaluation(EvaluationError),
    Io(io::Error),
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::Configuration(e) => write!(f, "Configuration error: {}", e),
            ExperimentError::Mining(e) => write!(f, "{}", e),
            ExperimentError::Pipeline(e) => write!(f, "Pipeline error: {}", e),
            ExperimentError::Evaluation(e) => write!(f, "Evaluation error: {}", e),
            ExperimentError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl Error for ExperimentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExperimentError::Configuration(e) => Some(e),
            ExperimentError::Mining(e) => Some(e),
            ExperimentError::Pipeline(e) => Some(e),
            ExperimentError::Evaluation(e) => Some(e),
            ExperimentError::Io(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for ExperimentError {
    fn from(e: ConfigurationError) -> Self {
        ExperimentError::Configuration(e)
    }
}

impl From<MiningError> for ExperimentError {
    fn from(e: MiningError) -> Self {
        ExperimentError::Mining(e)
    }
}

impl From<PipelineError> for ExperimentError {
    fn from(e: PipelineError) -> Self {
        ExperimentError::Pipeline(e)
    }
}

impl From<DatasetError> for ExperimentError {
    fn from(e: DatasetError) -> Self {
        ExperimentError::Pipeline(PipelineError::Dataset(e))
    }
}

impl From<EvaluationError> for ExperimentError {
    fn from(e: EvaluationError) -> Self {
        ExperimentError::Evaluation(e)
    }
}

impl From<io::Error> for ExperimentError {
    fn from(e: io::Error) -> Self {
        ExperimentError::Io(e)
    }
}

/// Timings and counts of one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    pub itemizing_duration: Duration,
    pub mining_duration: Duration,
    pub scoring_duration: Duration,
    pub total_duration: Duration,
    pub iterations: usize,
    pub removed_elements: usize,
    pub total_found: usize,
    pub significant: usize,
}

impl PipelineStats {
    pub fn summary(&self) -> String {
        format!(
            "Found {} biclusters ({} significant) in {} iteration(s)\n  itemizing: {:?}, mining: {:?}, scoring: {:?}, total: {:?}",
            self.total_found,
            self.significant,
            self.iterations,
            self.itemizing_duration,
            self.mining_duration,
            self.scoring_duration,
            self.total_duration
        )
    }
}

/// Result of a finished pipeline.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    pub config: ExperimentConfig,
    /// Cleaned dataset the solution refers to
    pub dataset: Dataset,
    /// Significant biclusters, by ascending p-value
    pub biclusters: Biclusters,
    pub total_found: usize,
    pub report: String,
    pub stats: PipelineStats,
}

pub struct ExperimentPipeline<'a> {
    config: ExperimentConfig,
    options: PipelineOptions,
    miner: &'a dyn Miner,
    significance: &'a dyn SignificanceTest,
    raw: RawDataset,
    stage: PipelineStage,
    original_stats: Option<DatasetStatistics>,
    removed_items: BTreeSet<i32>,
    dataset: Option<Dataset>,
    biclusters: Biclusters,
    stats: PipelineStats,
    started: Instant,
}

impl<'a> ExperimentPipeline<'a> {
    pub fn new(
        config: ExperimentConfig,
        raw: RawDataset,
        miner: &'a dyn Miner,
        significance: &'a dyn SignificanceTest,
    ) -> Self {
        Self {
            config,
            options: PipelineOptions::default(),
            miner,
            significance,
            raw,
            stage: PipelineStage::Created,
            original_stats: None,
            removed_items: BTreeSet::new(),
            dataset: None,
            biclusters: Biclusters::new(),
            stats: PipelineStats::default(),
            started: Instant::now(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Cleaned snapshot, once available.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn biclusters(&self) -> &Biclusters {
        &self.biclusters
    }

    fn expect_stage(&self, expected: PipelineStage, next: PipelineStage) -> Result<(), PipelineError> {
        if self.stage != expected {
            return Err(PipelineError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }
        Ok(())
    }

    fn snapshot(&self) -> Result<&Dataset, PipelineError> {
        self.dataset.as_ref().ok_or(PipelineError::InvalidTransition {
            from: self.stage,
            to: PipelineStage::Cleaned,
        })
    }

    pub fn itemize(&mut self) -> Result<(), ExperimentError> {
        self.expect_stage(PipelineStage::Created, PipelineStage::Itemized)?;
        let start = Instant::now();
        let dataset = Itemizer::new(self.config.itemization).itemize(&self.raw)?;
        self.original_stats = Some(dataset.statistics());
        self.dataset = Some(dataset);
        self.stats.itemizing_duration = start.elapsed();
        info!(
            "[{}] Itemization completed in {:?}",
            self.config.id, self.stats.itemizing_duration
        );
        self.stage = PipelineStage::Itemized;
        Ok(())
    }

    pub fn clean(&mut self) -> Result<(), ExperimentError> {
        self.expect_stage(PipelineStage::Itemized, PipelineStage::Cleaned)?;
        let cfg = self.config.itemization;
        self.removed_items = items_to_remove(cfg.nr_items, cfg.removal, cfg.symmetric);
        if let Some(dataset) = self.dataset.as_mut() {
            let removed = dataset.remove_items(&self.removed_items);
            debug!(
                "[{}] Removed {} elements holding items {:?}",
                self.config.id, removed, self.removed_items
            );
        }
        self.stage = PipelineStage::Cleaned;
        Ok(())
    }

    pub fn mine(&mut self) -> Result<(), ExperimentError> {
        self.expect_stage(PipelineStage::Cleaned, PipelineStage::Mined)?;
        let start = Instant::now();
        let snapshot = self.snapshot()?;
        let iterations = self.config.nr_iterations.max(1);

        let mut solution = Biclusters::new();
        if iterations > 1 {
            let mut working = snapshot.clone();
            for i in 0..iterations {
                debug!("[{}] Mining biclusters for iteration {}", self.config.id, i);
                let found = self.miner.mine(
                    &working,
                    self.config.orientation,
                    &self.config.pattern,
                    &self.config.stopping,
                )?;
                let counts = found.element_counts(working.nrows(), working.ncols());
                self.stats.removed_elements +=
                    working.remove_elements(&counts, self.options.removal_fraction);
                solution.union(found);
            }
        } else {
            solution = self.miner.mine(
                snapshot,
                self.config.orientation,
                &self.config.pattern,
                &self.config.stopping,
            )?;
        }

        self.stats.iterations = iterations;
        self.stats.mining_duration = start.elapsed();
        info!(
            "[{}] Mining with {} completed in {:?}, found {} biclusters",
            self.config.id,
            self.miner.name(),
            self.stats.mining_duration,
            solution.len()
        );
        self.biclusters = solution;
        self.stage = PipelineStage::Mined;
        Ok(())
    }

    /// Materializes each bicluster's pattern from the snapshot: the most frequent
    /// item per column (per row for column orientation).
    pub fn aggregate(&mut self) -> Result<(), ExperimentError> {
        self.expect_stage(PipelineStage::Mined, PipelineStage::Aggregated)?;
        let snapshot = self.dataset.as_ref().ok_or(PipelineError::InvalidTransition {
            from: self.stage,
            to: PipelineStage::Aggregated,
        })?;
        for bic in self.biclusters.iter_mut() {
            snapshot.validate_bicluster(bic)?;
            let view = Submatrix::from_bicluster(snapshot.items(), bic);
            bic.pattern = view.map(|v| {
                let (rows, cols) = v.shape();
                match self.config.orientation {
                    Orientation::PatternOnRows => (0..cols).map(|j| most_frequent(v.column(j))).collect(),
                    Orientation::PatternOnColumns => (0..rows).map(|i| most_frequent(v.row(i))).collect(),
                }
            });
        }
        self.stage = PipelineStage::Aggregated;
        Ok(())
    }

    pub fn score(&mut self) -> Result<(), ExperimentError> {
        self.expect_stage(PipelineStage::Aggregated, PipelineStage::Scored)?;
        let start = Instant::now();
        let mined = std::mem::take(&mut self.biclusters);
        let snapshot = self.snapshot()?;
        let mut scored = self
            .significance
            .score(snapshot, mined, self.config.pattern.pattern_type())?;
        scored.order_by_pvalue();
        self.biclusters = scored;
        self.stats.scoring_duration = start.elapsed();
        info!(
            "[{}] Scoring completed in {:?}",
            self.config.id, self.stats.scoring_duration
        );
        self.stage = PipelineStage::Scored;
        Ok(())
    }

    pub fn filter(&mut self) -> Result<(), ExperimentError> {
        self.expect_stage(PipelineStage::Scored, PipelineStage::Filtered)?;
        self.stats.total_found = self.biclusters.len();
        self.biclusters = filter_significant(&self.biclusters, self.config.significance_level);
        self.stats.significant = self.biclusters.len();
        debug!(
            "[{}] {} of {} biclusters below alpha = {}",
            self.config.id,
            self.stats.significant,
            self.stats.total_found,
            self.config.significance_level
        );
        self.stage = PipelineStage::Filtered;
        Ok(())
    }

    pub fn finalize(mut self) -> Result<ExperimentOutcome, ExperimentError> {
        self.expect_stage(PipelineStage::Filtered, PipelineStage::Finalized)?;
        let dataset = self.dataset.take().ok_or(PipelineError::InvalidTransition {
            from: self.stage,
            to: PipelineStage::Finalized,
        })?;
        let original = self.original_stats.take().unwrap_or_else(|| dataset.statistics());
        let report = experiment_report(&ReportSections {
            config: &self.config,
            original: &original,
            removed_items: &self.removed_items,
            dataset: &dataset,
            total_found: self.stats.total_found,
            biclusters: &self.biclusters,
        });
        self.stats.total_duration = self.started.elapsed();
        info!(
            "[{}] Pipeline completed in {:?}, {} biclusters retained",
            self.config.id, self.stats.total_duration, self.stats.significant
        );

        Ok(ExperimentOutcome {
            config: self.config,
            dataset,
            biclusters: self.biclusters,
            total_found: self.stats.total_found,
            report,
            stats: self.stats,
        })
    }

    /// Runs every remaining step.
    pub fn run(mut self) -> Result<ExperimentOutcome, ExperimentError> {
        self.itemize()?;
        self.clean()?;
        self.mine()?;
        self.aggregate()?;
        self.score()?;
        self.filter()?;
        self.finalize()
    }
}

/// Most frequent present item; ties go to the smaller item.
fn most_frequent(values: Vec<&Option<i32>>) -> Option<i32> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for v in values.into_iter().flatten() {
        *counts.entry(*v).or_insert(0) += 1;
    }
    let mut best: Option<(i32, usize)> = None;
    for (item, n) in counts {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((item, n));
        }
    }
    best.map(|(item, _)| item)
}
