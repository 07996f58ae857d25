//! Hyperparameter sweeps for pattern-based biclustering: itemize a real-valued
//! matrix, mine biclusters, keep the significant ones and evaluate them against
//! a class column.

/**
 * File: /src/lib.rs
 * Created Date: Monday, January 22nd 2024
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Bicluster sweep modules replace co-clustering
 */

pub mod bicluster;
pub mod config;
pub mod dataset;
pub mod evaluation;
pub mod experiment;
pub mod itemizer;
pub mod matrix;
pub mod miner;
pub mod report;
pub mod significance;
pub mod submatrix;
pub mod translator;

pub use bicluster::{Bicluster, Biclusters};
pub use dataset::{Dataset, RawDataset};
pub use experiment::{ExperimentSetRunner, ParameterSpace};
