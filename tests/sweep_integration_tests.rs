//! Integration tests for bicluster sweeps
//!
//! Runs whole parameter sweeps through the runner:
//! 1. Itemization and item removal
//! 2. Mining, scoring and significance filtering
//! 3. Reports, translated reports, classifier tables and metrics sheets

use bic_sweep::bicluster::Biclusters;
use bic_sweep::dataset::{Dataset, RawDataset};
use bic_sweep::evaluation::{BiclusterEvaluator, ClassLabels};
use bic_sweep::experiment::types::{Orientation, PatternConfig, StoppingCriterion, TranslationMode};
use bic_sweep::experiment::{ClassColumns, ExperimentSetRunner, ParameterSpace, RunnerOptions, SweepContext};
use bic_sweep::miner::{ItemClosureMiner, Miner, MiningError};
use bic_sweep::report::{MemorySink, MetricsSink, TsvMetricsSink};
use bic_sweep::significance::BinomialSignificance;
use bic_sweep::translator::{TranslationTables, TranslatorChain};
use bic_sweep::Bicluster;
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::seq::SliceRandom;
use std::fs;
use std::path::Path;

const PLANTED_ROWS: usize = 10;
const PLANTED_COLS: usize = 4;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 40x8 matrix with a constant block on rows 0..10, columns 0..4. Every other
/// cell cycles through 0..7 so no other row repeats the block's value.
fn create_planted_matrix() -> RawDataset {
    let (rows, cols) = (40, 8);
    let values = Array2::from_shape_fn((rows, cols), |(i, j)| {
        if i < PLANTED_ROWS && j < PLANTED_COLS {
            9.0
        } else {
            ((i * 3 + j * 5) % 7) as f64
        }
    });
    RawDataset::new(
        (0..rows).map(|i| format!("s{:02}", i)).collect(),
        (0..cols).map(|j| format!("g{}", j)).collect(),
        values,
    )
    .unwrap()
}

/// Random matrix with planted co-cluster structure
fn create_test_matrix(n_rows: usize, n_cols: usize, n_clusters: usize) -> RawDataset {
    let mut matrix = Array2::random((n_rows, n_cols), Uniform::new(0.0, 1.0));

    let rows_per_cluster = n_rows / n_clusters;
    let cols_per_cluster = n_cols / n_clusters;
    for k in 0..n_clusters {
        for i in k * rows_per_cluster..((k + 1) * rows_per_cluster).min(n_rows) {
            for j in k * cols_per_cluster..((k + 1) * cols_per_cluster).min(n_cols) {
                matrix[[i, j]] += 2.0;
            }
        }
    }
    RawDataset::from_values(matrix)
}

fn planted_labels() -> ClassColumns {
    let labels = (0..40)
        .map(|i| Some(if i < PLANTED_ROWS { "P" } else { "C" }.to_string()))
        .collect();
    let mut classes = ClassColumns::new();
    classes.insert("label".to_string(), labels);
    classes
}

fn discriminative_space() -> ParameterSpace {
    let mut space = ParameterSpace::default();
    space.nr_iterations = vec![1, 2];
    space.discriminative = vec![true];
    space.target_class_name = vec![Some("label".to_string())];
    space
}

fn runner(options: RunnerOptions) -> ExperimentSetRunner {
    ExperimentSetRunner::builder()
        .with_miner(Box::new(ItemClosureMiner::new(2)))
        .with_significance(Box::new(BinomialSignificance::new()))
        .with_options(options)
        .build()
        .unwrap()
}

fn context<'a>(
    raw: &'a RawDataset,
    classes: &'a ClassColumns,
    translator: Option<&'a TranslatorChain>,
    dir: &'a Path,
) -> SweepContext<'a> {
    SweepContext {
        raw,
        class_columns: classes,
        translator,
        output_dir: dir,
        date: "2026-10-19",
    }
}

#[test]
fn test_discriminative_sweep_end_to_end() {
    init_logger();
    let raw = create_planted_matrix();
    let classes = planted_labels();
    let dir = tempfile::tempdir().unwrap();

    let mut sink = MemorySink::default();
    let summary = runner(RunnerOptions::default())
        .run(&discriminative_space(), context(&raw, &classes, None, dir.path()), &mut sink)
        .unwrap();

    assert_eq!(summary.experiments, 2);
    assert!(summary.failed.is_empty(), "failed: {:?}", summary.failed);
    assert_eq!(summary.discriminative, 2);
    assert!(sink.finished);

    // metrics arrive in experiment order
    let ids: Vec<&str> = sink.summaries.iter().map(|s| s.config.id.as_str()).collect();
    assert_eq!(ids, vec!["Exp_1", "Exp_2"]);

    // the planted block is found and is pure
    let metrics = &sink.summaries[0].metrics;
    let p = metrics.categories.iter().position(|c| c == "P").unwrap();
    let planted = (0..metrics.num_biclusters())
        .find(|&i| metrics.row_counts[i] == PLANTED_ROWS && metrics.purities[i] == 1.0)
        .expect("planted bicluster missing");
    assert_eq!(metrics.entropies[planted], 0.0);
    assert_eq!(metrics.precision[planted][p], 1.0);
    assert_eq!(metrics.recall[planted][p], 1.0);

    for id in ["Exp_1", "Exp_2"] {
        assert!(dir.path().join(format!("{}_output.txt", id)).exists());
        assert!(dir
            .path()
            .join(format!("{}_CSV_classifier_2026-10-19.csv", id))
            .exists());
    }

    let report = fs::read_to_string(dir.path().join("Exp_1_output.txt")).unwrap();
    assert!(report.starts_with("EXPERIENCE PARAMETERS:\nExperiment ID: Exp_1"));
    assert!(report.contains("ORIGINAL DATASET:"));
    assert!(report.contains("WITHOUT SCALABILITY - USED COLUMNS: \ng0\n"));
    assert!(report.contains("BICLUSTER #1:\np-value = "));

    let csv = fs::read_to_string(dir.path().join("Exp_1_CSV_classifier_2026-10-19.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 41);
    assert!(lines[0].starts_with("Subject ID,Bic_01,"));
    assert!(lines[0].ends_with(",label"));
    assert!(lines[1].starts_with("s00,"));
    assert!(lines[1].ends_with(",P"));
}

#[test]
fn test_parallel_run_matches_sequential() {
    let raw = create_planted_matrix();
    let classes = planted_labels();
    let sequential = tempfile::tempdir().unwrap();
    let parallel = tempfile::tempdir().unwrap();

    let mut seq_sink = MemorySink::default();
    runner(RunnerOptions::default())
        .run(&discriminative_space(), context(&raw, &classes, None, sequential.path()), &mut seq_sink)
        .unwrap();

    let options = RunnerOptions {
        parallel: true,
        ..RunnerOptions::default()
    };
    let mut par_sink = MemorySink::default();
    runner(options)
        .run(&discriminative_space(), context(&raw, &classes, None, parallel.path()), &mut par_sink)
        .unwrap();

    for id in ["Exp_1", "Exp_2"] {
        let name = format!("{}_output.txt", id);
        assert_eq!(
            fs::read_to_string(sequential.path().join(&name)).unwrap(),
            fs::read_to_string(parallel.path().join(&name)).unwrap()
        );
    }
    let seq_ids: Vec<&str> = seq_sink.summaries.iter().map(|s| s.config.id.as_str()).collect();
    let par_ids: Vec<&str> = par_sink.summaries.iter().map(|s| s.config.id.as_str()).collect();
    assert_eq!(seq_ids, par_ids);
}

#[test]
fn test_translated_reports_for_both_modes() {
    let raw = create_planted_matrix();
    let classes = ClassColumns::new();
    let dir = tempfile::tempdir().unwrap();
    let tables: TranslationTables = serde_json::from_str(
        r#"{
            "categories": { "g0": { "5": "high" } },
            "labels": { "g0": { "high": "Strongly expressed" } }
        }"#,
    )
    .unwrap();
    let translator = TranslatorChain::new(tables);

    let options = RunnerOptions {
        translation_mode: Some(TranslationMode::Both),
        ..RunnerOptions::default()
    };
    let mut sink = MemorySink::default();
    let summary = runner(options)
        .run(
            &ParameterSpace::default(),
            context(&raw, &classes, Some(&translator), dir.path()),
            &mut sink,
        )
        .unwrap();
    assert_eq!(summary.succeeded, vec!["Exp_1".to_string()]);
    // non-discriminative experiments produce no metrics
    assert!(sink.summaries.is_empty());

    let categories = fs::read_to_string(dir.path().join("Exp_1_translated_categories.txt")).unwrap();
    let labels = fs::read_to_string(dir.path().join("Exp_1_translated_labels.txt")).unwrap();
    assert!(categories.starts_with("EXPERIENCE PARAMETERS:\n"));
    assert!(categories.contains("DATASET:\n"));
    assert!(categories.contains("\thigh"));
    assert!(labels.contains("\tStrongly expressed"));
    // columns without a table render the miss
    assert!(categories.contains("Not found (key: 5 for category g1 )"));
}

#[test]
fn test_failing_experiment_is_skipped() {
    /// Fails on 4-item alphabets, delegates otherwise.
    struct PickyMiner(ItemClosureMiner);

    impl Miner for PickyMiner {
        fn mine(
            &self,
            dataset: &Dataset,
            orientation: Orientation,
            pattern: &PatternConfig,
            stopping: &StoppingCriterion,
        ) -> Result<Biclusters, MiningError> {
            if dataset.nr_items() == 4 {
                return Err(MiningError::Failed("alphabet too small".to_string()));
            }
            self.0.mine(dataset, orientation, pattern, stopping)
        }

        fn name(&self) -> &str {
            "Picky"
        }
    }

    let raw = create_planted_matrix();
    let classes = planted_labels();
    let dir = tempfile::tempdir().unwrap();
    let mut space = discriminative_space();
    space.nr_iterations = vec![1];
    space.nr_items = vec![4, 6];

    let runner = ExperimentSetRunner::builder()
        .with_miner(Box::new(PickyMiner(ItemClosureMiner::new(2))))
        .with_significance(Box::new(BinomialSignificance::new()))
        .build()
        .unwrap();
    let mut sink = MemorySink::default();
    let summary = runner
        .run(&space, context(&raw, &classes, None, dir.path()), &mut sink)
        .unwrap();

    assert_eq!(summary.failed, vec!["Exp_1".to_string()]);
    assert_eq!(summary.succeeded, vec!["Exp_2".to_string()]);
    assert_eq!(sink.summaries.len(), 1);
    assert_eq!(sink.summaries[0].config.id, "Exp_2");
    assert!(!dir.path().join("Exp_1_output.txt").exists());
}

#[test]
fn test_empty_dimension_aborts_sweep() {
    let raw = create_planted_matrix();
    let classes = ClassColumns::new();
    let dir = tempfile::tempdir().unwrap();
    let mut space = ParameterSpace::default();
    space.pattern_type = Vec::new();

    let mut sink = MemorySink::default();
    let result = runner(RunnerOptions::default()).run(&space, context(&raw, &classes, None, dir.path()), &mut sink);
    assert!(result.is_err());
    assert!(!sink.finished);
}

#[test]
fn test_metrics_sheets_written() {
    let raw = create_planted_matrix();
    let classes = planted_labels();
    let dir = tempfile::tempdir().unwrap();
    let options = RunnerOptions::default();
    let mut sink = TsvMetricsSink::new(
        dir.path(),
        "2026-10-19",
        options.purity_ladder.clone(),
        options.purest_threshold,
    );

    runner(options)
        .run(&discriminative_space(), context(&raw, &classes, None, dir.path()), &mut sink)
        .unwrap();

    for path in sink.paths() {
        assert!(path.exists(), "{} missing", path.display());
    }
    let calculations = fs::read_to_string(&sink.paths()[1]).unwrap();
    let rows: Vec<&str> = calculations.lines().filter(|l| l.starts_with("Exp_")).collect();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_metrics_sink_untouched_without_discriminative_runs() {
    let raw = create_planted_matrix();
    let classes = ClassColumns::new();
    let dir = tempfile::tempdir().unwrap();
    let mut sink = TsvMetricsSink::new(dir.path(), "d", Default::default(), 0.75);
    runner(RunnerOptions::default())
        .run(&ParameterSpace::default(), context(&raw, &classes, None, dir.path()), &mut sink)
        .unwrap();
    assert!(sink.paths().iter().all(|p| !p.exists()));
    // finishing twice stays a no-op
    sink.finish().unwrap();
}

#[test]
fn test_random_matrix_smoke() {
    init_logger();
    let raw = create_test_matrix(60, 12, 3);
    let classes = ClassColumns::new();
    let dir = tempfile::tempdir().unwrap();
    let mut space = ParameterSpace::default();
    space.nr_items = vec![4, 6];
    space.symmetric = vec![false, true];

    let mut sink = MemorySink::default();
    let summary = runner(RunnerOptions::default())
        .run(&space, context(&raw, &classes, None, dir.path()), &mut sink)
        .unwrap();
    assert_eq!(summary.experiments, 4);
    assert!(summary.failed.is_empty(), "failed: {:?}", summary.failed);
    for id in &summary.succeeded {
        let report = fs::read_to_string(dir.path().join(format!("{}_output.txt", id))).unwrap();
        assert!(report.contains("NUMBER OF FOUND BICS (total): "));
    }
}

#[test]
fn test_probabilities_bounded_for_shuffled_labels() {
    let mut values: Vec<&str> = (0..30).map(|i| ["A", "B", "C"][i % 3]).collect();
    values.shuffle(&mut rand::rng());
    let mut with_unknowns: Vec<Option<String>> = values.iter().map(|s| Some(s.to_string())).collect();
    with_unknowns[0] = None;
    let labels = ClassLabels::new(with_unknowns);

    // rows past the labels count as an unseen category
    let biclusters: Biclusters = vec![
        Bicluster::new(25..35, 0..2).unwrap(),
        Bicluster::new(0..30, 0..3).unwrap(),
    ]
    .into();
    let evaluator = BiclusterEvaluator::new(&biclusters, &labels);
    for row in evaluator.probability_matrix().rows() {
        assert!(row.sum() <= 1.0 + 1e-12);
    }
    assert!((evaluator.probability_matrix().row(0).sum() - 0.5).abs() < 1e-12);
    assert!((evaluator.probability_matrix().row(1).sum() - 1.0).abs() < 1e-12);
}
