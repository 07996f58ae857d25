//! # Experiment Set Runner
//!
//! Expands a [`ParameterSpace`], runs one [`ExperimentPipeline`] per combination
//! and writes the per-experiment artifacts:
//!
//! - `{id}_output.txt`, the text report
//! - `{id}_translated_categories.txt` / `{id}_translated_labels.txt` when a
//!   translation mode and tables are configured
//! - `{id}_CSV_classifier_{date}.csv` for discriminative experiments, whose
//!   metrics also go to the [`MetricsSink`]
//!
//! A failing experiment is logged and skipped and the sweep carries on. Failing to
//! write an artifact aborts the sweep with [`RunnerError::Io`].

/**
 * File: /src/experiment/runner.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Sweep runner with builder and per-experiment artifacts
 */

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::RawDataset;
use crate::evaluation::{BiclusterEvaluator, ClassLabels, EvaluationError, PurityLadder};
use crate::miner::Miner;
use crate::report::{translated_report, write_file, ExperimentSummary, MetricsSink};
use crate::significance::SignificanceTest;
use crate::translator::{expand_mode, TranslatorChain};

use super::pipeline::{ExperimentError, ExperimentOutcome, ExperimentPipeline, PipelineOptions};
use super::space::{ExperimentParams, ParameterSpace};
use super::types::{ConfigurationError, ExperimentConfig, TranslationMode};

/// Per-row labels of each class column, `None` for unknown.
pub type ClassColumns = BTreeMap<String, Vec<Option<String>>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerOptions {
    pub parallel: bool,
    pub purity_ladder: PurityLadder,
    pub purest_threshold: f64,
    pub translation_mode: Option<TranslationMode>,
    pub pipeline: PipelineOptions,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            purity_ladder: PurityLadder::default(),
            purest_threshold: 0.75,
            translation_mode: None,
            pipeline: PipelineOptions::default(),
        }
    }
}

#[derive(Debug)]
pub enum RunnerError {
    Configuration(ConfigurationError),
    Io(io::Error),
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::Configuration(e) => write!(f, "Invalid parameter space: {}", e),
            RunnerError::Io(e) => write!(f, "Failed to write sweep output: {}", e),
        }
    }
}

impl Error for RunnerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RunnerError::Configuration(e) => Some(e),
            RunnerError::Io(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for RunnerError {
    fn from(e: ConfigurationError) -> Self {
        RunnerError::Configuration(e)
    }
}

impl From<io::Error> for RunnerError {
    fn from(e: io::Error) -> Self {
        RunnerError::Io(e)
    }
}

/// Shared inputs of one sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepContext<'a> {
    pub raw: &'a RawDataset,
    pub class_columns: &'a ClassColumns,
    pub translator: Option<&'a TranslatorChain>,
    pub output_dir: &'a Path,
    /// Stamp used in classifier file names
    pub date: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub experiments: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    pub discriminative: usize,
    /// Every file written, in experiment order
    pub outputs: Vec<PathBuf>,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} experiments: {} succeeded, {} failed, {} discriminative",
            self.experiments,
            self.succeeded.len(),
            self.failed.len(),
            self.discriminative
        )
    }
}

struct ExperimentRecord {
    outputs: Vec<PathBuf>,
    summary: Option<ExperimentSummary>,
}

pub struct ExperimentSetRunner {
    miner: Box<dyn Miner>,
    significance: Box<dyn SignificanceTest>,
    options: RunnerOptions,
}

impl ExperimentSetRunner {
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Expands `space` and runs every combination.
    pub fn run(
        &self,
        space: &ParameterSpace,
        ctx: SweepContext<'_>,
        sink: &mut dyn MetricsSink,
    ) -> Result<RunSummary, RunnerError> {
        let params = space.expand()?;
        info!("Expanded parameter space into {} experiments", params.len());
        self.run_params(&params, ctx, sink)
    }

    /// Runs explicit combinations; ids are `Exp_1..` in the given order.
    pub fn run_params(
        &self,
        params: &[ExperimentParams],
        ctx: SweepContext<'_>,
        sink: &mut dyn MetricsSink,
    ) -> Result<RunSummary, RunnerError> {
        let start = Instant::now();
        let ids: Vec<String> = (1..=params.len()).map(|i| format!("Exp_{}", i)).collect();

        let results: Vec<Result<ExperimentRecord, ExperimentError>> = if self.options.parallel {
            ids.par_iter()
                .zip(params.par_iter())
                .map(|(id, p)| self.run_one(id, p, ctx))
                .collect()
        } else {
            ids.iter()
                .zip(params)
                .map(|(id, p)| self.run_one(id, p, ctx))
                .collect()
        };

        let mut summary = RunSummary {
            experiments: params.len(),
            ..RunSummary::default()
        };
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(record) => {
                    summary.outputs.extend(record.outputs);
                    if let Some(metrics) = record.summary {
                        sink.append(&metrics)?;
                        summary.discriminative += 1;
                    }
                    summary.succeeded.push(id);
                }
                Err(ExperimentError::Io(e)) => {
                    warn!("Experiment with Id {} could not write its output. {}", id, e);
                    return Err(RunnerError::Io(e));
                }
                Err(e) => {
                    warn!("Experiment with Id {} failed. {}", id, e);
                    summary.failed.push(id);
                }
            }
        }
        sink.finish()?;

        info!("Sweep completed in {:?}: {}", start.elapsed(), summary.summary());
        Ok(summary)
    }

    fn run_one(
        &self,
        id: &str,
        params: &ExperimentParams,
        ctx: SweepContext<'_>,
    ) -> Result<ExperimentRecord, ExperimentError> {
        let config = ExperimentConfig::new(id, params.clone())?;
        debug!("{}", config);

        let raw = match &config.target_class {
            Some(target) => ctx.raw.without_column(target),
            None => ctx.raw.clone(),
        };
        let outcome = ExperimentPipeline::new(config, raw, self.miner.as_ref(), self.significance.as_ref())
            .with_options(self.options.pipeline.clone())
            .run()?;
        info!("[{}] {}", id, outcome.stats.summary());

        let mut outputs = Vec::new();
        let report_path = ctx.output_dir.join(outcome.config.output_filename());
        write_file(&report_path, &outcome.report)?;
        outputs.push(report_path);

        if let (Some(mode), Some(translator)) = (self.options.translation_mode, ctx.translator) {
            for (mode, suffix) in expand_mode(mode) {
                let text = translated_report(
                    &outcome.config,
                    &outcome.dataset,
                    &outcome.biclusters,
                    translator,
                    mode,
                );
                let path = ctx.output_dir.join(format!("{}{}", id, suffix));
                write_file(&path, &text)?;
                outputs.push(path);
            }
        }

        let summary = match outcome.config.target_class.clone() {
            Some(target) => {
                let (path, summary) = self.evaluate(&outcome, &target, ctx)?;
                outputs.push(path);
                Some(summary)
            }
            None => None,
        };

        Ok(ExperimentRecord { outputs, summary })
    }

    fn evaluate(
        &self,
        outcome: &ExperimentOutcome,
        target: &str,
        ctx: SweepContext<'_>,
    ) -> Result<(PathBuf, ExperimentSummary), ExperimentError> {
        let labels = class_labels(ctx, target)?;
        let evaluator = BiclusterEvaluator::new(&outcome.biclusters, &labels);
        for i in 0..evaluator.num_biclusters() {
            debug!("[{}] {}", outcome.config.id, evaluator.class_stats(i)?);
        }

        let path = ctx.output_dir.join(format!(
            "{}_CSV_classifier_{}.csv",
            outcome.config.id, ctx.date
        ));
        write_file(&path, &evaluator.membership_table(outcome.dataset.row_ids(), target))?;

        let metrics = evaluator.metrics();
        info!(
            "[{}] Solution purity {:.3}, entropy {:.3}",
            outcome.config.id, metrics.solution_purity, metrics.solution_entropy
        );
        Ok((
            path,
            ExperimentSummary {
                config: outcome.config.clone(),
                dataset_rows: outcome.dataset.nrows(),
                columns: outcome.dataset.columns().to_vec(),
                original_columns: outcome.dataset.original_columns().to_vec(),
                metrics,
            },
        ))
    }
}

/// Labels of `target`: the class column when given, else the raw column
/// rendered as text.
fn class_labels(ctx: SweepContext<'_>, target: &str) -> Result<ClassLabels, EvaluationError> {
    if let Some(values) = ctx.class_columns.get(target) {
        return Ok(ClassLabels::new(values.clone()));
    }
    let j = ctx
        .raw
        .column_index(target)
        .ok_or_else(|| EvaluationError::UnknownTargetClass(target.to_string()))?;
    Ok(ClassLabels::new(
        ctx.raw
            .values()
            .column(j)
            .iter()
            .map(|v| if v.is_nan() { None } else { Some(v.to_string()) })
            .collect(),
    ))
}

pub struct RunnerBuilder {
    miner: Option<Box<dyn Miner>>,
    significance: Option<Box<dyn SignificanceTest>>,
    options: RunnerOptions,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        Self {
            miner: None,
            significance: None,
            options: RunnerOptions::default(),
        }
    }

    pub fn with_miner(mut self, miner: Box<dyn Miner>) -> Self {
        self.miner = Some(miner);
        self
    }

    pub fn with_significance(mut self, significance: Box<dyn SignificanceTest>) -> Self {
        self.significance = Some(significance);
        self
    }

    pub fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.options.parallel = parallel;
        self
    }

    pub fn translation_mode(mut self, mode: TranslationMode) -> Self {
        self.options.translation_mode = Some(mode);
        self
    }

    pub fn build(self) -> Result<ExperimentSetRunner, &'static str> {
        let miner = self.miner.ok_or("Miner not set")?;
        let significance = self.significance.ok_or("Significance test not set")?;

        Ok(ExperimentSetRunner {
            miner,
            significance,
            options: self.options,
        })
    }
}

impl Default for RunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
