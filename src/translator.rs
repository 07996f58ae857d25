//! # Translation Tables
//!
//! Maps item indexes back to the categories they were discretized from, and
//! categories to human-readable labels, per column.

/**
 * File: /src/translator.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Index -> category -> label translation chain
 */

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::experiment::types::TranslationMode;

/// Key inserted into every label table.
pub const NOT_APPLICABLE_KEY: &str = "NA";
pub const NOT_APPLICABLE_LABEL: &str = "Not Applicable";

type ColumnTable = BTreeMap<String, BTreeMap<String, String>>;

/// Raw translation tables as read from a sweep file: column -> key -> value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationTables {
    #[serde(default)]
    pub categories: ColumnTable,
    #[serde(default)]
    pub labels: ColumnTable,
}

/// No entry for `key` in `column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupMiss {
    pub column: String,
    pub key: String,
}

impl fmt::Display for LookupMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Not found (key: {} for category {} )", self.key, self.column)
    }
}

impl Error for LookupMiss {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslatorChain {
    index_to_category: ColumnTable,
    category_to_label: ColumnTable,
}

impl TranslatorChain {
    pub fn new(tables: TranslationTables) -> Self {
        let mut category_to_label = tables.labels;
        for table in category_to_label.values_mut() {
            table
                .entry(NOT_APPLICABLE_KEY.to_string())
                .or_insert_with(|| NOT_APPLICABLE_LABEL.to_string());
        }
        Self {
            index_to_category: tables.categories,
            category_to_label,
        }
    }

    fn lookup_in(table: &ColumnTable, column: &str, key: &str) -> Result<String, LookupMiss> {
        table
            .get(column)
            .and_then(|entries| entries.get(key))
            .cloned()
            .ok_or_else(|| LookupMiss {
                column: column.to_string(),
                key: key.to_string(),
            })
    }

    /// `ToCategories` reads the first table; `ToLabels` and `Both` chain both.
    pub fn lookup(&self, mode: TranslationMode, column: &str, key: &str) -> Result<String, LookupMiss> {
        let category = Self::lookup_in(&self.index_to_category, column, key)?;
        match mode {
            TranslationMode::ToCategories => Ok(category),
            TranslationMode::ToLabels | TranslationMode::Both => {
                Self::lookup_in(&self.category_to_label, column, &category)
            }
        }
    }

    /// Label lookup for an already translated category.
    pub fn label(&self, column: &str, category: &str) -> Result<String, LookupMiss> {
        Self::lookup_in(&self.category_to_label, column, category)
    }

    /// Like [`lookup`](Self::lookup), rendering a miss as its sentinel text.
    pub fn translate(&self, mode: TranslationMode, column: &str, key: &str) -> String {
        self.lookup(mode, column, key)
            .unwrap_or_else(|miss| miss.to_string())
    }

    /// No column in either table.
    pub fn is_empty(&self) -> bool {
        self.index_to_category.is_empty() && self.category_to_label.is_empty()
    }
}

/// Concrete modes a setting expands to, with the file suffix each one writes.
pub fn expand_mode(mode: TranslationMode) -> Vec<(TranslationMode, &'static str)> {
    match mode {
        TranslationMode::ToCategories => vec![(TranslationMode::ToCategories, "_translated_categories.txt")],
        TranslationMode::ToLabels => vec![(TranslationMode::ToLabels, "_translated_labels.txt")],
        TranslationMode::Both => vec![
            (TranslationMode::ToCategories, "_translated_categories.txt"),
            (TranslationMode::ToLabels, "_translated_labels.txt"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> TranslatorChain {
        let json = r#"{
            "categories": { "age": { "0": "young", "1": "old" } },
            "labels": { "age": { "young": "Under 40", "old": "40 or over" } }
        }"#;
        let tables: TranslationTables = serde_json::from_str(json).unwrap();
        TranslatorChain::new(tables)
    }

    #[test]
    fn test_to_categories() {
        assert_eq!(chain().lookup(TranslationMode::ToCategories, "age", "1").unwrap(), "old");
    }

    #[test]
    fn test_to_labels_chains_tables() {
        let t = chain();
        let category = t.lookup(TranslationMode::ToCategories, "age", "0").unwrap();
        let label = t.label("age", &category).unwrap();
        assert_eq!(t.lookup(TranslationMode::ToLabels, "age", "0").unwrap(), label);
        assert_eq!(t.translate(TranslationMode::Both, "age", "0"), "Under 40");
    }

    #[test]
    fn test_not_applicable_label() {
        assert_eq!(chain().label("age", "NA").unwrap(), "Not Applicable");
    }

    #[test]
    fn test_miss_is_error_until_rendered() {
        let t = chain();
        let miss = t.lookup(TranslationMode::ToCategories, "height", "3").unwrap_err();
        assert_eq!(miss.column, "height");
        assert_eq!(
            t.translate(TranslationMode::ToCategories, "height", "3"),
            "Not found (key: 3 for category height )"
        );
    }

    #[test]
    fn test_is_empty_checks_both_tables() {
        assert!(TranslatorChain::new(TranslationTables::default()).is_empty());
        assert!(!chain().is_empty());

        let labels_only: TranslationTables =
            serde_json::from_str(r#"{ "labels": { "age": { "young": "Under 40" } } }"#).unwrap();
        let t = TranslatorChain::new(labels_only);
        assert!(!t.is_empty());
        assert_eq!(t.label("age", "young").unwrap(), "Under 40");
    }

    #[test]
    fn test_expand_mode() {
        let modes: Vec<TranslationMode> = expand_mode(TranslationMode::Both).into_iter().map(|(m, _)| m).collect();
        assert_eq!(modes, vec![TranslationMode::ToCategories, TranslationMode::ToLabels]);
    }
}
