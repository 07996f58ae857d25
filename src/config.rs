//! Command-line configuration: a sweep description in JSON plus the raw matrix in
//! `.npy` format.

/**
 * File: /src/config.rs
 * Created Date: Friday, January 26th 2024
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Read sweep file and matrix instead of co-cluster counts
 */
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use ndarray_npy::ReadNpyExt;
use serde::{Deserialize, Serialize};

use crate::dataset::RawDataset;
use crate::experiment::runner::ClassColumns;
use crate::experiment::space::ParameterSpace;
use crate::experiment::types::TranslationMode;
use crate::translator::{TranslationTables, TranslatorChain};

/// Contents of the sweep file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepFile {
    #[serde(default)]
    pub parameters: ParameterSpace,
    /// Row identifiers; defaults to `0..` when empty
    #[serde(default)]
    pub row_ids: Vec<String>,
    /// Column names; defaults to `C0..` when empty
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub class_columns: ClassColumns,
    #[serde(default)]
    pub translation_mode: Option<TranslationMode>,
    #[serde(default)]
    pub translations: Option<TranslationTables>,
}

impl SweepFile {
    pub fn from_path(path: &Path) -> Result<SweepFile, Box<dyn Error>> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

pub struct Config {
    space: ParameterSpace,
    raw: RawDataset,
    class_columns: ClassColumns,
    translation_mode: Option<TranslationMode>,
    translator: Option<TranslatorChain>,
    output_dir: PathBuf,
}

impl Config {
    /// constructor
    ///
    /// # Examples
    /// ```bash
    /// $ cargo run -- sweep.json data/matrix.npy results/
    /// ```
    pub fn new(mut args: impl Iterator<Item = String>) -> Result<Config, Box<dyn Error>> {
        // args:
        // 0: program name
        // 1: sweep file
        // 2: matrix path
        // 3: output folder
        args.next();
        let sweep_path = args.next().ok_or("Missing sweep file argument")?;
        let matrix_path = args.next().ok_or("Missing matrix argument")?;
        let output_dir = args.next().ok_or("Missing output folder argument")?;

        let sweep = SweepFile::from_path(Path::new(&sweep_path))?;
        let reader = File::open(matrix_path)?;
        let matrix = Array2::<f64>::read_npy(reader)?;
        Config::from_parts(sweep, matrix, PathBuf::from(output_dir))
    }

    pub fn from_parts(
        sweep: SweepFile,
        matrix: Array2<f64>,
        output_dir: PathBuf,
    ) -> Result<Config, Box<dyn Error>> {
        let (rows, cols) = matrix.dim();
        let row_ids = if sweep.row_ids.is_empty() {
            (0..rows).map(|i| i.to_string()).collect()
        } else {
            sweep.row_ids
        };
        let columns = if sweep.columns.is_empty() {
            (0..cols).map(|j| format!("C{}", j)).collect()
        } else {
            sweep.columns
        };
        let raw = RawDataset::new(row_ids, columns, matrix)?;

        Ok(Config {
            space: sweep.parameters,
            raw,
            class_columns: sweep.class_columns,
            translation_mode: sweep.translation_mode,
            translator: sweep
                .translations
                .map(TranslatorChain::new)
                .filter(|t| !t.is_empty()),
            output_dir,
        })
    }

    pub fn get_space(&self) -> &ParameterSpace {
        &self.space
    }

    pub fn get_raw(&self) -> &RawDataset {
        &self.raw
    }

    pub fn get_class_columns(&self) -> &ClassColumns {
        &self.class_columns
    }

    pub fn get_translation_mode(&self) -> Option<TranslationMode> {
        self.translation_mode
    }

    pub fn get_translator(&self) -> Option<&TranslatorChain> {
        self.translator.as_ref()
    }

    pub fn get_output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use ndarray_npy::WriteNpyExt;

    #[test]
    fn test_new_config() {
        let dir = tempfile::tempdir().unwrap();
        let sweep_path = dir.path().join("sweep.json");
        let matrix_path = dir.path().join("matrix.npy");
        std::fs::write(
            &sweep_path,
            r#"{
                "parameters": { "nrItems": [4, 6], "patternType": ["Constant"] },
                "row_ids": ["a", "b"],
                "class_columns": { "y": ["P", null] },
                "translation_mode": "ToLabels",
                "translations": { "categories": { "C0": { "0": "low" } } }
            }"#,
        )
        .unwrap();
        array![[1.0, 2.0], [3.0, f64::NAN]]
            .write_npy(File::create(&matrix_path).unwrap())
            .unwrap();

        let args = vec![
            "target/debug/bic_sweep".to_string(),
            sweep_path.to_string_lossy().into_owned(),
            matrix_path.to_string_lossy().into_owned(),
            "out".to_string(),
        ];
        let config = Config::new(args.into_iter()).unwrap();
        assert_eq!(config.get_space().num_experiments().unwrap(), 2);
        assert_eq!(config.get_raw().row_ids(), &["a".to_string(), "b".to_string()]);
        assert_eq!(config.get_raw().columns(), &["C0".to_string(), "C1".to_string()]);
        assert!(config.get_raw().values()[[1, 1]].is_nan());
        assert_eq!(config.get_class_columns()["y"], vec![Some("P".to_string()), None]);
        assert_eq!(config.get_translation_mode(), Some(TranslationMode::ToLabels));
        assert!(config.get_translator().is_some());
        assert_eq!(config.get_output_dir(), Path::new("out"));
    }

    #[test]
    fn test_missing_arguments() {
        let args = vec!["target/debug/bic_sweep".to_string()];
        assert!(Config::new(args.into_iter()).is_err());
    }

    #[test]
    fn test_empty_translations_disable_translator() {
        let sweep: SweepFile = serde_json::from_str(
            r#"{ "translation_mode": "Both", "translations": { "categories": {}, "labels": {} } }"#,
        )
        .unwrap();
        let config = Config::from_parts(sweep, Array2::zeros((1, 1)), PathBuf::from(".")).unwrap();
        assert_eq!(config.get_translation_mode(), Some(TranslationMode::Both));
        assert!(config.get_translator().is_none());
    }

    #[test]
    fn test_shape_mismatch_is_error() {
        let sweep = SweepFile {
            row_ids: vec!["only".into()],
            ..SweepFile::default()
        };
        assert!(Config::from_parts(sweep, Array2::zeros((2, 2)), PathBuf::from(".")).is_err());
    }
}
