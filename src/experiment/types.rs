//! # Experiment Data Structures
//!
//! Hyperparameter enums, the validated per-experiment configuration and the
//! errors raised while building or running one experiment.

/**
 * File: /src/experiment/types.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Created experiment configuration types
 */

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use super::space::ExperimentParams;

/// Which quantity bounds the mining search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoppingKind {
    MinBicsBeforeMerging,
    MinAreaPercentageElements,
    MinSupportPercentageRowsPerBic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilteringCriteria {
    Overall,
    Rows,
    Columns,
}

/// Policy for missing values during itemization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingsHandler {
    /// Keep the cell empty
    RemoveValue,
    /// Fill with the column mean
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoveCriteria {
    RemoveNone,
    RemoveZeroEntries,
    RemoveNonDiffEntries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternType {
    Constant,
    Additive,
    Multiplicative,
    Symmetric,
    ConstantOverall,
    OrderPreserving,
}

/// Closed itemset implementation handed to the miner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosedImplementation {
    DCharm,
    Charm,
    AprioriTid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    PatternOnRows,
    PatternOnColumns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationMode {
    ToCategories,
    ToLabels,
    Both,
}

macro_rules! display_as_debug {
    ($($t:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $t {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Debug::fmt(self, f)
                }
            }
        )+
    };
}

display_as_debug!(
    StoppingKind,
    FilteringCriteria,
    MissingsHandler,
    RemoveCriteria,
    PatternType,
    ClosedImplementation,
    Orientation,
    TranslationMode,
);

/// Stopping criterion with its own value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoppingCriterion {
    MinBicsBeforeMerging(usize),
    /// Fraction of matrix elements
    MinAreaPercentage(f64),
    /// Fraction of rows per bicluster
    MinRowSupport(f64),
}

/// Merging and filtering applied to mined biclusters before they are returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosingConfig {
    pub merge_overlap: f64,
    pub filter: FilteringCriteria,
    /// `1 - min_filtering_value / 100`
    pub filter_threshold: f64,
}

/// Closed frequent itemset mining setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FimConfig {
    pub implementation: ClosedImplementation,
    pub min_columns: usize,
    pub closing: ClosingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderPreservingConfig {
    pub min_columns: usize,
    pub closing: ClosingConfig,
}

/// Pattern family with the settings only that family uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternConfig {
    Constant(FimConfig),
    Additive(FimConfig),
    Multiplicative(FimConfig),
    Symmetric(FimConfig),
    ConstantOverall(FimConfig),
    OrderPreserving(OrderPreservingConfig),
}

impl PatternConfig {
    pub fn pattern_type(&self) -> PatternType {
        match self {
            PatternConfig::Constant(_) => PatternType::Constant,
            PatternConfig::Additive(_) => PatternType::Additive,
            PatternConfig::Multiplicative(_) => PatternType::Multiplicative,
            PatternConfig::Symmetric(_) => PatternType::Symmetric,
            PatternConfig::ConstantOverall(_) => PatternType::ConstantOverall,
            PatternConfig::OrderPreserving(_) => PatternType::OrderPreserving,
        }
    }

    pub fn min_columns(&self) -> usize {
        match self {
            PatternConfig::OrderPreserving(op) => op.min_columns,
            PatternConfig::Constant(fim)
            | PatternConfig::Additive(fim)
            | PatternConfig::Multiplicative(fim)
            | PatternConfig::Symmetric(fim)
            | PatternConfig::ConstantOverall(fim) => fim.min_columns,
        }
    }

    pub fn closing(&self) -> &ClosingConfig {
        match self {
            PatternConfig::OrderPreserving(op) => &op.closing,
            PatternConfig::Constant(fim)
            | PatternConfig::Additive(fim)
            | PatternConfig::Multiplicative(fim)
            | PatternConfig::Symmetric(fim)
            | PatternConfig::ConstantOverall(fim) => &fim.closing,
        }
    }
}

/// Column reduction applied before itemization when scalability is on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnSelection {
    /// Legacy path: every column is kept
    All,
    /// Keep this fraction of the highest-variance columns
    TopVariance(f64),
}

/// Settings consumed by the itemizer and the cleaning step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemizationConfig {
    pub nr_items: usize,
    pub symmetric: bool,
    pub missings: MissingsHandler,
    pub removal: RemoveCriteria,
    pub orientation: Orientation,
    pub scalability: Option<ColumnSelection>,
}

/// Validated, immutable configuration of one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    pub id: String,
    pub stopping: StoppingCriterion,
    pub nr_iterations: usize,
    pub itemization: ItemizationConfig,
    pub pattern: PatternConfig,
    pub orientation: Orientation,
    pub significance_level: f64,
    pub target_class: Option<String>,
    pub print_patterns_only: bool,
    params: ExperimentParams,
}

impl ExperimentConfig {
    /// Validate a raw parameter tuple.
    pub fn new(id: impl Into<String>, params: ExperimentParams) -> Result<Self, ConfigurationError> {
        let id = id.into();

        if params.nr_items < 2 {
            return Err(ConfigurationError::InvalidValue {
                parameter: "nrItems",
                reason: format!("need at least 2 items, got {}", params.nr_items),
            });
        }
        if params.min_nr_columns == 0 {
            return Err(ConfigurationError::InvalidValue {
                parameter: "minNrColumns",
                reason: "must be at least 1".to_string(),
            });
        }
        if params.nr_iterations == 0 {
            return Err(ConfigurationError::InvalidValue {
                parameter: "nrIterations",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&params.significance_level) {
            return Err(ConfigurationError::InvalidValue {
                parameter: "significanceLevel",
                reason: format!("{} is outside [0, 1]", params.significance_level),
            });
        }
        if !(0.0..=100.0).contains(&params.min_filtering_value) {
            return Err(ConfigurationError::InvalidValue {
                parameter: "minFilteringValue",
                reason: format!("{} is outside [0, 100]", params.min_filtering_value),
            });
        }
        if !(params.stopping_criteria_value >= 0.0) {
            return Err(ConfigurationError::InvalidValue {
                parameter: "stoppingCriteriaValue",
                reason: format!("{} is negative", params.stopping_criteria_value),
            });
        }

        let target_class = params
            .target_class_name
            .clone()
            .filter(|name| !name.trim().is_empty());
        match (params.discriminative, &target_class) {
            (true, None) => return Err(ConfigurationError::MissingTargetClass(id)),
            (false, Some(name)) => {
                return Err(ConfigurationError::UnexpectedTargetClass(id, name.clone()))
            }
            _ => {}
        }

        let stopping = match params.stopping_criteria {
            StoppingKind::MinBicsBeforeMerging => {
                StoppingCriterion::MinBicsBeforeMerging(params.stopping_criteria_value.round() as usize)
            }
            StoppingKind::MinAreaPercentageElements => {
                StoppingCriterion::MinAreaPercentage(params.stopping_criteria_value)
            }
            StoppingKind::MinSupportPercentageRowsPerBic => {
                StoppingCriterion::MinRowSupport(params.stopping_criteria_value)
            }
        };

        let closing = ClosingConfig {
            merge_overlap: params.min_overlap_merging,
            filter: params.filter,
            filter_threshold: 1.0 - params.min_filtering_value / 100.0,
        };
        let fim = FimConfig {
            implementation: params.closed_implementation,
            min_columns: params.min_nr_columns,
            closing,
        };
        let pattern = match params.pattern_type {
            PatternType::Constant => PatternConfig::Constant(fim),
            PatternType::Additive => PatternConfig::Additive(fim),
            PatternType::Multiplicative => PatternConfig::Multiplicative(fim),
            PatternType::Symmetric => PatternConfig::Symmetric(fim),
            PatternType::ConstantOverall => PatternConfig::ConstantOverall(fim),
            PatternType::OrderPreserving => PatternConfig::OrderPreserving(OrderPreservingConfig {
                min_columns: params.min_nr_columns,
                closing,
            }),
        };

        let scalability = if params.scalability {
            if params.column_filtering_perc < 0.0 {
                Some(ColumnSelection::All)
            } else {
                Some(ColumnSelection::TopVariance(params.column_filtering_perc.min(1.0)))
            }
        } else {
            None
        };

        Ok(Self {
            id,
            stopping,
            nr_iterations: params.nr_iterations,
            itemization: ItemizationConfig {
                nr_items: params.nr_items,
                symmetric: params.symmetric,
                missings: params.missings_handler,
                removal: params.remove_elements,
                orientation: params.orientation,
                scalability,
            },
            pattern,
            orientation: params.orientation,
            significance_level: params.significance_level,
            target_class,
            print_patterns_only: params.print_patterns_only,
            params,
        })
    }

    pub fn is_discriminative(&self) -> bool {
        self.target_class.is_some()
    }

    pub fn uses_scalability(&self) -> bool {
        self.itemization.scalability.is_some()
    }

    pub fn params(&self) -> &ExperimentParams {
        &self.params
    }

    pub fn output_filename(&self) -> String {
        format!("{}_output.txt", self.id)
    }

    /// Label/value pairs describing the experiment, in report order.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let p = &self.params;
        vec![
            ("Stopping Criteria", p.stopping_criteria.to_string()),
            ("Stopping Criteria Value", p.stopping_criteria_value.to_string()),
            ("Min Nr Columns", p.min_nr_columns.to_string()),
            ("Nr Iterations", p.nr_iterations.to_string()),
            ("Nr Items", p.nr_items.to_string()),
            ("Symmetric", p.symmetric.to_string()),
            ("Min Overlap Merging", p.min_overlap_merging.to_string()),
            ("Filter", p.filter.to_string()),
            ("Missings Handler", p.missings_handler.to_string()),
            ("Remove Elements", p.remove_elements.to_string()),
            ("Min Filtering Value", p.min_filtering_value.to_string()),
            ("Pattern Type", p.pattern_type.to_string()),
            ("Closed Implementation", p.closed_implementation.to_string()),
            ("Orientation", p.orientation.to_string()),
            ("Significance Level", p.significance_level.to_string()),
            ("Scalability", p.scalability.to_string()),
            ("Column Filtering %", (p.column_filtering_perc * 100.0).to_string()),
            ("Discriminative", p.discriminative.to_string()),
            (
                "Target Class Name",
                self.target_class.clone().unwrap_or_else(|| "null".to_string()),
            ),
            ("Print patterns only", p.print_patterns_only.to_string()),
        ]
    }
}

impl fmt::Display for ExperimentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Experiment ID: {}", self.id)?;
        for (label, value) in self.describe() {
            writeln!(f, "\t{}: {}", label, value)?;
        }
        write!(f, "\tOutput Filename: {}", self.output_filename())
    }
}

/// Errors in the parameter space or in one experiment's parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    EmptyDimension(&'static str),
    MissingTargetClass(String),
    UnexpectedTargetClass(String, String),
    InvalidValue { parameter: &'static str, reason: String },
    TooManyCombinations,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::EmptyDimension(name) => {
                write!(f, "Parameter dimension '{}' has no candidate values", name)
            }
            ConfigurationError::MissingTargetClass(id) => {
                write!(f, "Experiment {} is discriminative but names no target class", id)
            }
            ConfigurationError::UnexpectedTargetClass(id, name) => write!(
                f,
                "Experiment {} is not discriminative but names target class '{}'",
                id, name
            ),
            ConfigurationError::InvalidValue { parameter, reason } => {
                write!(f, "Invalid value for {}: {}", parameter, reason)
            }
            ConfigurationError::TooManyCombinations => {
                write!(f, "Parameter space has more combinations than fit in usize")
            }
        }
    }
}

impl Error for ConfigurationError {}
