//! # Reports
//!
//! Plain-text experiment reports and the tab-separated metrics sheets shared by
//! all experiments of a sweep.

/**
 * File: /src/report.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Text reports and metrics sinks
 */

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::bicluster::{Bicluster, Biclusters};
use crate::dataset::{Dataset, DatasetStatistics};
use crate::evaluation::{MetricsExperiment, PurityLadder};
use crate::experiment::types::{ExperimentConfig, PatternType, TranslationMode};
use crate::submatrix::{render_item, Submatrix};
use crate::translator::TranslatorChain;

/// Formats one cell given its column name.
pub type CellRenderer<'a> = &'a dyn Fn(&str, &Option<i32>) -> String;

fn plain_cell(_column: &str, item: &Option<i32>) -> String {
    render_item(item)
}

/// ` (cols,rows) Y=[..] X=[..]` header followed by one tab-separated line per row.
pub fn render_bicluster(dataset: &Dataset, bic: &Bicluster, cell: CellRenderer) -> String {
    let mut out = String::new();
    let _ = write!(out, " ({},{}) Y=[", bic.num_cols(), bic.num_rows());
    for &c in &bic.columns {
        let _ = write!(out, "{},", column_name(dataset, c));
    }
    out.push_str("] X=[");
    for &r in &bic.rows {
        let _ = write!(out, "{},", row_name(dataset, r));
    }
    out.push(']');

    if let Some(view) = Submatrix::from_bicluster(dataset.items(), bic) {
        for (i, &r) in view.row_indices().iter().enumerate() {
            let _ = write!(out, "\n{}", row_name(dataset, r));
            for (j, &c) in view.col_indices().iter().enumerate() {
                if let Some(item) = view.get(i, j) {
                    let _ = write!(out, "\t{}", cell(column_name(dataset, c), item));
                }
            }
        }
    }
    out
}

/// Column names and the first row's items.
pub fn render_pattern(dataset: &Dataset, bic: &Bicluster, cell: CellRenderer) -> String {
    let mut out = String::from("pattern: \n");
    for &c in &bic.columns {
        let _ = write!(out, "{}\t", column_name(dataset, c));
    }
    out.push('\n');
    if let Some(&first) = bic.rows.iter().next() {
        for &c in &bic.columns {
            let item = dataset.item(first, c);
            let _ = write!(out, "{}\t", cell(column_name(dataset, c), &item));
        }
    }
    out.push('\n');
    out
}

fn column_name(dataset: &Dataset, c: usize) -> &str {
    dataset.columns().get(c).map(String::as_str).unwrap_or("?")
}

fn row_name(dataset: &Dataset, r: usize) -> &str {
    dataset.row_ids().get(r).map(String::as_str).unwrap_or("?")
}

fn render_individual(
    out: &mut String,
    config: &ExperimentConfig,
    dataset: &Dataset,
    biclusters: &Biclusters,
    cell: CellRenderer,
) {
    out.push_str("\nINDIVIDUAL BICLUSTERS:\n");
    for (i, bic) in biclusters.iter().enumerate() {
        let _ = write!(out, "\nBICLUSTER #{}:\n", i + 1);
        let _ = writeln!(out, "p-value = {}", bic.pvalue);
        let _ = write!(out, "area = {}\n\n", bic.area());
        if config.print_patterns_only && config.pattern.pattern_type() == PatternType::Constant {
            out.push_str(&render_pattern(dataset, bic, cell));
        } else {
            out.push_str(&render_bicluster(dataset, bic, cell));
            out.push('\n');
        }
    }
}

/// Everything the per-experiment text report is built from.
pub struct ReportSections<'a> {
    pub config: &'a ExperimentConfig,
    pub original: &'a DatasetStatistics,
    pub removed_items: &'a BTreeSet<i32>,
    pub dataset: &'a Dataset,
    pub total_found: usize,
    pub biclusters: &'a Biclusters,
}

pub fn experiment_report(sections: &ReportSections) -> String {
    let ReportSections {
        config,
        original,
        removed_items,
        dataset,
        total_found,
        biclusters,
    } = sections;

    let mut out = String::new();
    let _ = write!(out, "EXPERIENCE PARAMETERS:\n{}\n\n", config);
    let _ = write!(out, "ORIGINAL DATASET:\n{}\n", original);

    if config.uses_scalability() {
        out.push_str("\nWITH SCALABILITY - ORIGINAL COLUMNS: \n");
        for c in dataset.original_columns() {
            let _ = writeln!(out, "{}", c);
        }
        out.push_str("\nWITH SCALABILITY - REMAINING COLUMNS: \n");
    } else {
        out.push_str("\nWITHOUT SCALABILITY - USED COLUMNS: \n");
    }
    for c in dataset.columns() {
        let _ = writeln!(out, "{}", c);
    }

    let removed: Vec<i32> = removed_items.iter().copied().collect();
    let _ = write!(
        out,
        "\nALTERED DATASET (after {:?} removal):\n{}\n\n",
        removed,
        dataset.statistics()
    );
    let _ = writeln!(out, "NUMBER OF FOUND BICS (total): {}", total_found);
    let _ = write!(out, "NUMBER OF FOUND BICS (significant): {}", biclusters.len());
    render_individual(&mut out, config, dataset, biclusters, &plain_cell);
    out
}

/// Report with every item translated through `translator`.
pub fn translated_report(
    config: &ExperimentConfig,
    dataset: &Dataset,
    biclusters: &Biclusters,
    translator: &TranslatorChain,
    mode: TranslationMode,
) -> String {
    let mut out = String::new();
    let _ = write!(out, "EXPERIENCE PARAMETERS:\n{}\n\n", config);
    let _ = writeln!(out, "DATASET:\n{}", dataset.statistics());
    let cell = |column: &str, item: &Option<i32>| -> String {
        match item {
            Some(v) => translator.translate(mode, column, &v.to_string()),
            None => render_item(item),
        }
    };
    render_individual(&mut out, config, dataset, biclusters, &cell);
    out
}

pub fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// Metrics of one discriminative experiment, as handed to a sink.
#[derive(Debug, Clone)]
pub struct ExperimentSummary {
    pub config: ExperimentConfig,
    pub dataset_rows: usize,
    /// Active columns of the mined dataset
    pub columns: Vec<String>,
    /// Columns before scalability reduction
    pub original_columns: Vec<String>,
    pub metrics: MetricsExperiment,
}

/// Receives experiment metrics in experiment order.
pub trait MetricsSink {
    fn append(&mut self, summary: &ExperimentSummary) -> io::Result<()>;
    fn finish(&mut self) -> io::Result<()>;
}

/// Keeps summaries in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub summaries: Vec<ExperimentSummary>,
    pub finished: bool,
}

impl MetricsSink for MemorySink {
    fn append(&mut self, summary: &ExperimentSummary) -> io::Result<()> {
        self.summaries.push(summary.clone());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Three tab-separated sheets: per-bicluster experiment tables, one calculation
/// row per experiment, and the purest biclusters. Nothing is written if no
/// experiment was appended.
pub struct TsvMetricsSink {
    folder: PathBuf,
    date: String,
    ladder: PurityLadder,
    purest_threshold: f64,
    experiments: String,
    calculations: String,
    purest: String,
    appended: usize,
}

impl TsvMetricsSink {
    pub fn new(folder: impl Into<PathBuf>, date: impl Into<String>, ladder: PurityLadder, purest_threshold: f64) -> Self {
        Self {
            folder: folder.into(),
            date: date.into(),
            ladder,
            purest_threshold,
            experiments: String::new(),
            calculations: String::new(),
            purest: String::new(),
            appended: 0,
        }
    }

    pub fn paths(&self) -> [PathBuf; 3] {
        let base = format!("ClassMetrics_{}", self.date);
        [
            self.folder.join(format!("{}_experiments.tsv", base)),
            self.folder.join(format!("{}_calculations.tsv", base)),
            self.folder.join(format!("{}_purest.tsv", base)),
        ]
    }

    fn calculations_header(&self, first_category: &str) -> String {
        let mut cols: Vec<String> = [
            "Experiment Id",
            "Stopping Criteria Value",
            "Stopping Criteria Value (%)",
            "Quality",
            "Min. Nr. Columns",
            "Biclustering Purity",
            "Avg. Nr. Bic. Lines",
            "Avg. % Bic. Lines",
            "No. Found Bics",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        cols.push(format!("No. Purest Bics (purity >= {})", self.purest_threshold));
        cols.extend(self.ladder.levels().iter().map(|&l| PurityLadder::label(l)));
        cols.push(format!("No. Pure {} Bics (= 1.0)", first_category));
        cols.join("\t")
    }

    fn experiment_block(&self, summary: &ExperimentSummary) -> String {
        let ExperimentSummary {
            config,
            dataset_rows,
            columns,
            original_columns,
            metrics,
        } = summary;
        let mut out = String::new();
        let _ = writeln!(out, "Experiment {}", config.id);
        let (labels, values): (Vec<&str>, Vec<String>) = config.describe().into_iter().unzip();
        let _ = writeln!(out, "{}", labels.join("\t"));
        let _ = writeln!(out, "{}", values.join("\t"));
        if config.uses_scalability() {
            let _ = writeln!(out, "Original Columns\t{}", original_columns.join("\t"));
            let _ = writeln!(out, "Remaining Columns\t{}", columns.join("\t"));
        }

        let _ = writeln!(
            out,
            "Bicluster ID\tEntropy\tPurity\tp-value\tNumber Rows\t% of Dataset Rows\tPrecision"
        );
        let _ = writeln!(out, "\t\t\t\t\tCategories ->\t{}", metrics.categories.join("\t"));
        for i in 0..metrics.num_biclusters() {
            let pct = if *dataset_rows == 0 {
                0.0
            } else {
                metrics.row_counts[i] as f64 / *dataset_rows as f64
            };
            let precision: Vec<String> = metrics.precision[i].iter().map(|p| p.to_string()).collect();
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{:.2}\t{}",
                i + 1,
                metrics.entropies[i],
                metrics.purities[i],
                metrics.pvalues[i],
                metrics.row_counts[i],
                pct,
                precision.join("\t")
            );
        }
        let _ = writeln!(
            out,
            "Solution\t{}\t{}",
            metrics.solution_entropy, metrics.solution_purity
        );
        let _ = writeln!(
            out,
            "No. Sig. Bics (< {})\t{}",
            config.significance_level,
            metrics.count_significant(config.significance_level)
        );
        for (level, count) in metrics.purity_ladder_counts(&self.ladder) {
            let _ = writeln!(out, "{}\t{}", PurityLadder::label(level), count);
        }
        out.push('\n');
        out
    }

    fn calculation_row(&self, summary: &ExperimentSummary) -> String {
        let ExperimentSummary {
            config,
            dataset_rows,
            metrics,
            ..
        } = summary;
        let params = config.params();
        let mut cols: Vec<String> = vec![
            config.id.clone(),
            params.stopping_criteria_value.to_string(),
            (params.stopping_criteria_value * 100.0).to_string(),
            params.min_overlap_merging.to_string(),
            params.min_nr_columns.to_string(),
            metrics.solution_purity.to_string(),
            metrics.average_rows().to_string(),
            metrics.average_row_fraction(*dataset_rows).to_string(),
            metrics.num_biclusters().to_string(),
            metrics.purest_count(self.purest_threshold).to_string(),
        ];
        cols.extend(
            metrics
                .purity_ladder_counts(&self.ladder)
                .into_iter()
                .map(|(_, n)| n.to_string()),
        );
        let first = metrics.categories.first().map(String::as_str).unwrap_or("");
        cols.push(metrics.pure_count_for(first).to_string());
        cols.join("\t")
    }
}

impl MetricsSink for TsvMetricsSink {
    fn append(&mut self, summary: &ExperimentSummary) -> io::Result<()> {
        if self.appended == 0 {
            let first = summary.metrics.categories.first().cloned().unwrap_or_default();
            let header = self.calculations_header(&first);
            let _ = writeln!(self.calculations, "{}", header);
        }
        let block = self.experiment_block(summary);
        self.experiments.push_str(&block);
        let row = self.calculation_row(summary);
        let _ = writeln!(self.calculations, "{}", row);

        let purest: Vec<String> = summary
            .metrics
            .purest_biclusters(self.purest_threshold)
            .iter()
            .map(|p| p.to_string())
            .collect();
        let _ = writeln!(self.purest, "{}\t{}", summary.config.id, purest.join("\t"));

        self.appended += 1;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.appended == 0 {
            return Ok(());
        }
        let [experiments, calculations, purest] = self.paths();
        write_file(&experiments, &self.experiments)?;
        write_file(&calculations, &self.calculations)?;
        write_file(&purest, &self.purest)?;
        info!(
            "Metrics for {} experiments written to {}",
            self.appended,
            self.folder.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::space::ExperimentParams;
    use ndarray::array;

    fn dataset() -> Dataset {
        let items = array![[Some(1), Some(2), None], [Some(1), Some(2), Some(0)]];
        Dataset::new(
            vec!["s1".into(), "s2".into()],
            vec!["a".into(), "b".into(), "c".into()],
            vec!["a".into(), "b".into(), "c".into()],
            items,
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_render_bicluster() {
        let bic = Bicluster::new(vec![0, 1], vec![0, 2]).unwrap();
        let text = render_bicluster(&dataset(), &bic, &plain_cell);
        assert_eq!(text, " (2,2) Y=[a,c,] X=[s1,s2,]\ns1\t1\t?\ns2\t1\t0");
    }

    #[test]
    fn test_render_pattern() {
        let bic = Bicluster::new(vec![0, 1], vec![0, 1]).unwrap();
        let text = render_pattern(&dataset(), &bic, &plain_cell);
        assert_eq!(text, "pattern: \na\tb\t\n1\t2\t\n");
    }

    #[test]
    fn test_experiment_report_sections() {
        let config = ExperimentConfig::new("Exp_1", ExperimentParams::default()).unwrap();
        let data = dataset();
        let bics: Biclusters = vec![Bicluster::new(vec![0, 1], vec![0, 1]).unwrap().with_pvalue(0.001)].into();
        let removed: BTreeSet<i32> = [0, 1].into_iter().collect();
        let original = data.statistics();
        let text = experiment_report(&ReportSections {
            config: &config,
            original: &original,
            removed_items: &removed,
            dataset: &data,
            total_found: 3,
            biclusters: &bics,
        });
        assert!(text.starts_with("EXPERIENCE PARAMETERS:\nExperiment ID: Exp_1"));
        assert!(text.contains("WITHOUT SCALABILITY - USED COLUMNS: \na\nb\nc\n"));
        assert!(text.contains("ALTERED DATASET (after [0, 1] removal):"));
        assert!(text.contains("NUMBER OF FOUND BICS (total): 3"));
        assert!(text.contains("NUMBER OF FOUND BICS (significant): 1"));
        assert!(text.contains("BICLUSTER #1:\np-value = 0.001\narea = 4\n"));
    }

    #[test]
    fn test_pattern_only_for_constant() {
        let mut params = ExperimentParams::default();
        params.print_patterns_only = true;
        let config = ExperimentConfig::new("Exp_2", params).unwrap();
        let data = dataset();
        let bics: Biclusters = vec![Bicluster::new(vec![0, 1], vec![0, 1]).unwrap()].into();
        let removed = BTreeSet::new();
        let original = data.statistics();
        let text = experiment_report(&ReportSections {
            config: &config,
            original: &original,
            removed_items: &removed,
            dataset: &data,
            total_found: 1,
            biclusters: &bics,
        });
        assert!(text.contains("pattern: \na\tb\t\n1\t2\t\n"));
        assert!(!text.contains("Y=["));
    }

    #[test]
    fn test_scalability_lists_original_columns() {
        let mut params = ExperimentParams::default();
        params.scalability = true;
        let config = ExperimentConfig::new("Exp_3", params).unwrap();
        let items = array![[Some(1), None], [Some(1), Some(0)]];
        let data = Dataset::new(
            vec!["s1".into(), "s2".into()],
            vec!["a".into(), "c".into()],
            vec!["a".into(), "b".into(), "c".into()],
            items,
            3,
        )
        .unwrap();
        let bics = Biclusters::new();
        let removed = BTreeSet::new();
        let original = data.statistics();
        let text = experiment_report(&ReportSections {
            config: &config,
            original: &original,
            removed_items: &removed,
            dataset: &data,
            total_found: 0,
            biclusters: &bics,
        });
        assert!(text.contains("WITH SCALABILITY - ORIGINAL COLUMNS: \na\nb\nc\n"));
        assert!(text.contains("WITH SCALABILITY - REMAINING COLUMNS: \na\nc\n"));

        let summary = ExperimentSummary {
            config,
            dataset_rows: 2,
            columns: data.columns().to_vec(),
            original_columns: data.original_columns().to_vec(),
            metrics: MetricsExperiment::default(),
        };
        let block = TsvMetricsSink::new("out", "2026", PurityLadder::default(), 0.75).experiment_block(&summary);
        assert!(block.contains("\nOriginal Columns\ta\tb\tc\nRemaining Columns\ta\tc\n"));
    }

    #[test]
    fn test_memory_sink() {
        let config = ExperimentConfig::new("Exp_1", ExperimentParams::default()).unwrap();
        let summary = ExperimentSummary {
            config,
            dataset_rows: 2,
            columns: vec!["a".into()],
            original_columns: vec!["a".into()],
            metrics: MetricsExperiment {
                categories: vec!["A".into()],
                solution_entropy: 0.0,
                solution_purity: 1.0,
                pvalues: vec![0.01],
                row_counts: vec![2],
                entropies: vec![0.0],
                purities: vec![1.0],
                precision: vec![vec![1.0]],
                recall: vec![vec![1.0]],
                f_measure: vec![vec![1.0]],
            },
        };
        let mut sink = MemorySink::default();
        sink.append(&summary).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.summaries.len(), 1);
        assert!(sink.finished);

        let tsv = TsvMetricsSink::new("out", "2026", PurityLadder::default(), 0.75);
        let row = tsv.calculation_row(&summary);
        assert!(row.starts_with("Exp_1\t50\t5000\t0.8\t4\t1\t2\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1"));
        let header = tsv.calculations_header("A");
        assert!(header.ends_with("No. Pure Bics (= 1.0)\tNo. Pure A Bics (= 1.0)"));
    }
}
