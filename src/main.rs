/*
 * File: /main.rs
 * Created Date: Tuesday November 21st 2023
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Run a bicluster sweep from the command line
 */

use std::env;
use std::error::Error;
use std::fs;

use chrono::Local;
use log::{info, LevelFilter};

use bic_sweep::config::Config;
use bic_sweep::experiment::{ExperimentSetRunner, RunnerOptions, SweepContext};
use bic_sweep::miner::ItemClosureMiner;
use bic_sweep::report::TsvMetricsSink;
use bic_sweep::significance::BinomialSignificance;

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()?;

    let config = Config::new(env::args())?;
    let date = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    fs::create_dir_all(config.get_output_dir())?;

    let options = RunnerOptions {
        translation_mode: config.get_translation_mode(),
        ..RunnerOptions::default()
    };
    let mut sink = TsvMetricsSink::new(
        config.get_output_dir(),
        date.as_str(),
        options.purity_ladder.clone(),
        options.purest_threshold,
    );
    let runner = ExperimentSetRunner::builder()
        .with_miner(Box::new(ItemClosureMiner::new(2)))
        .with_significance(Box::new(BinomialSignificance::new()))
        .with_options(options)
        .build()?;

    info!(
        "Running {} experiments on a {}x{} matrix",
        config.get_space().num_experiments()?,
        config.get_raw().nrows(),
        config.get_raw().ncols()
    );
    let ctx = SweepContext {
        raw: config.get_raw(),
        class_columns: config.get_class_columns(),
        translator: config.get_translator(),
        output_dir: config.get_output_dir(),
        date: &date,
    };
    let summary = runner.run(config.get_space(), ctx, &mut sink)?;
    info!("{}", summary.summary());
    Ok(())
}
