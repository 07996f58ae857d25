//! # Experiments
//!
//! One experiment is one combination of hyperparameters run through the
//! itemize, mine, score and filter pipeline. A sweep runs every combination of a
//! [`ParameterSpace`].

/**
 * File: /src/experiment/mod.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Experiment module layout
 */

pub mod pipeline;
pub mod runner;
pub mod space;
pub mod types;

pub use pipeline::{
    ExperimentError, ExperimentOutcome, ExperimentPipeline, PipelineError, PipelineOptions,
    PipelineStage, PipelineStats,
};
pub use runner::{
    ClassColumns, ExperimentSetRunner, RunSummary, RunnerBuilder, RunnerError, RunnerOptions,
    SweepContext,
};
pub use space::{ExperimentParams, Odometer, ParameterSpace};
pub use types::{ConfigurationError, ExperimentConfig, TranslationMode};
