//! # Parameter Space
//!
//! A sweep lists candidate values for each of the 20 hyperparameters. Expanding it
//! yields the cartesian product as one [`ExperimentParams`] per experiment, in
//! odometer order: the last declared dimension varies fastest.

/**
 * File: /src/experiment/space.rs
 * Created Date: Monday, October 19th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Parameter space and cartesian expansion
 */

use serde::{Deserialize, Serialize};

use super::types::{
    ClosedImplementation, ConfigurationError, FilteringCriteria, MissingsHandler, Orientation,
    PatternType, RemoveCriteria, StoppingKind,
};

/// Declares every dimension once; generates the per-experiment tuple, the sweep
/// struct and the by-name assignment of a combination.
macro_rules! parameter_space {
    ($( $(#[$attr:meta])* $field:ident : $ty:ty = $default:expr ),+ $(,)?) => {
        /// One combination of hyperparameter values.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct ExperimentParams {
            $( $(#[$attr])* pub $field: $ty, )+
        }

        impl Default for ExperimentParams {
            fn default() -> Self {
                Self { $( $field: $default, )+ }
            }
        }

        /// Candidate values per hyperparameter. Dimensions missing from a sweep
        /// file fall back to their single default value.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct ParameterSpace {
            $( $(#[$attr])* pub $field: Vec<$ty>, )+
        }

        impl Default for ParameterSpace {
            fn default() -> Self {
                Self { $( $field: vec![$default], )+ }
            }
        }

        impl ParameterSpace {
            /// Dimension names in declaration order.
            pub const DIMENSIONS: &'static [&'static str] = &[ $( stringify!($field), )+ ];

            fn dimension_sizes(&self) -> Vec<(&'static str, usize)> {
                vec![ $( (stringify!($field), self.$field.len()), )+ ]
            }

            fn combination(&self, digits: &[usize]) -> ExperimentParams {
                let mut dim = 0usize;
                $(
                    let $field = self.$field[digits[dim]].clone();
                    dim += 1;
                )+
                debug_assert_eq!(dim, digits.len());
                ExperimentParams { $( $field, )+ }
            }
        }
    };
}

parameter_space! {
    stopping_criteria: StoppingKind = StoppingKind::MinBicsBeforeMerging,
    stopping_criteria_value: f64 = 50.0,
    min_nr_columns: usize = 4,
    nr_iterations: usize = 2,
    nr_items: usize = 6,
    symmetric: bool = false,
    min_overlap_merging: f64 = 0.8,
    filter: FilteringCriteria = FilteringCriteria::Overall,
    missings_handler: MissingsHandler = MissingsHandler::RemoveValue,
    #[serde(alias = "removeMissings")]
    remove_elements: RemoveCriteria = RemoveCriteria::RemoveZeroEntries,
    min_filtering_value: f64 = 50.0,
    pattern_type: PatternType = PatternType::Constant,
    closed_implementation: ClosedImplementation = ClosedImplementation::DCharm,
    orientation: Orientation = Orientation::PatternOnRows,
    significance_level: f64 = 0.05,
    scalability: bool = false,
    column_filtering_perc: f64 = 0.0,
    discriminative: bool = false,
    target_class_name: Option<String> = None,
    print_patterns_only: bool = false,
}

impl ParameterSpace {
    /// Number of combinations, without expanding.
    pub fn num_experiments(&self) -> Result<usize, ConfigurationError> {
        self.dimension_sizes()
            .iter()
            .try_fold(1usize, |acc, &(_, n)| acc.checked_mul(n))
            .ok_or(ConfigurationError::TooManyCombinations)
    }

    /// Full cartesian product. Fails if any dimension is empty.
    pub fn expand(&self) -> Result<Vec<ExperimentParams>, ConfigurationError> {
        let sizes = self.dimension_sizes();
        if let Some(&(name, _)) = sizes.iter().find(|&&(_, n)| n == 0) {
            return Err(ConfigurationError::EmptyDimension(name));
        }
        self.num_experiments()?;
        let radices: Vec<usize> = sizes.iter().map(|&(_, n)| n).collect();
        Ok(Odometer::new(radices)
            .map(|digits| self.combination(&digits))
            .collect())
    }
}

/// Mixed-radix counter over dimension sizes; the last digit turns fastest.
#[derive(Debug, Clone)]
pub struct Odometer {
    radices: Vec<usize>,
    digits: Vec<usize>,
    exhausted: bool,
}

impl Odometer {
    pub fn new(radices: Vec<usize>) -> Self {
        let exhausted = radices.iter().any(|&r| r == 0);
        let digits = vec![0; radices.len()];
        Self {
            radices,
            digits,
            exhausted,
        }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current = self.digits.clone();

        // carry from the last position
        let mut pos = self.digits.len();
        loop {
            if pos == 0 {
                self.exhausted = true;
                break;
            }
            pos -= 1;
            self.digits[pos] += 1;
            if self.digits[pos] < self.radices[pos] {
                break;
            }
            self.digits[pos] = 0;
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_odometer_order() {
        let combos: Vec<Vec<usize>> = Odometer::new(vec![2, 3]).collect();
        assert_eq!(
            combos,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
    }

    #[test]
    fn test_odometer_zero_dimensions() {
        // the empty product has exactly one element
        let combos: Vec<Vec<usize>> = Odometer::new(Vec::new()).collect();
        assert_eq!(combos, vec![Vec::<usize>::new()]);
        assert_eq!(Odometer::new(vec![3, 0]).count(), 0);
    }

    #[test]
    fn test_default_space_has_one_experiment() {
        let space = ParameterSpace::default();
        let params = space.expand().unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0], ExperimentParams::default());
        assert_eq!(ParameterSpace::DIMENSIONS.len(), 20);
    }

    #[test]
    fn test_expand_last_dimension_fastest() {
        let mut space = ParameterSpace::default();
        space.nr_items = vec![4, 6];
        space.print_patterns_only = vec![false, true];
        let params = space.expand().unwrap();
        assert_eq!(params.len(), 4);
        let seen: Vec<(usize, bool)> = params
            .iter()
            .map(|p| (p.nr_items, p.print_patterns_only))
            .collect();
        assert_eq!(seen, vec![(4, false), (4, true), (6, false), (6, true)]);
    }

    #[test]
    fn test_expand_is_distinct_and_complete() {
        let mut space = ParameterSpace::default();
        space.stopping_criteria_value = vec![0.1, 0.2, 0.3];
        space.symmetric = vec![false, true];
        space.pattern_type = vec![PatternType::Constant, PatternType::OrderPreserving];
        assert_eq!(space.num_experiments().unwrap(), 12);

        let params = space.expand().unwrap();
        assert_eq!(params.len(), 12);
        let distinct: HashSet<String> = params.iter().map(|p| format!("{:?}", p)).collect();
        assert_eq!(distinct.len(), 12);
    }

    #[test]
    fn test_empty_dimension_fails() {
        let mut space = ParameterSpace::default();
        space.orientation = Vec::new();
        match space.expand() {
            Err(ConfigurationError::EmptyDimension(name)) => assert_eq!(name, "orientation"),
            other => panic!("Expected EmptyDimension, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_space_fails() {
        let mut space = ParameterSpace::default();
        space.nr_items = (0..1usize << 16).collect();
        space.min_nr_columns = (0..1usize << 16).collect();
        space.nr_iterations = (0..1usize << 16).collect();
        space.min_overlap_merging = vec![0.8; 1 << 16];
        space.significance_level = vec![0.05; 1 << 16];
        assert!(matches!(
            space.num_experiments(),
            Err(ConfigurationError::TooManyCombinations)
        ));
        assert!(matches!(space.expand(), Err(ConfigurationError::TooManyCombinations)));
    }

    #[test]
    fn test_space_deserializes_with_defaults() {
        let json = r#"{
            "stoppingCriteriaValue": [0.1, 0.5],
            "removeMissings": ["RemoveNone"],
            "discriminative": [true],
            "targetClassName": ["Class"]
        }"#;
        let space: ParameterSpace = serde_json::from_str(json).unwrap();
        assert_eq!(space.num_experiments().unwrap(), 2);
        assert_eq!(space.remove_elements, vec![RemoveCriteria::RemoveNone]);
        assert_eq!(space.nr_items, vec![6]);
        assert_eq!(space.target_class_name, vec![Some("Class".to_string())]);
    }
}
