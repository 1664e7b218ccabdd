//! Assertions for scenario validation.
//!
//! Scenarios return `ProbeResult<()>`; these helpers turn a failed check into
//! [`ProbeError::AssertionFailed`] so it propagates with `?`.

use crate::result::{ProbeError, ProbeResult};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Assertion helpers for scenarios
#[derive(Debug, Clone, Copy)]
pub struct Assertion;

impl Assertion {
    /// Assert a condition is true
    pub fn is_true(condition: bool, message: impl Into<String>) -> ProbeResult<()> {
        if condition {
            Ok(())
        } else {
            Err(ProbeError::assertion(message))
        }
    }

    /// Assert a condition is false
    pub fn is_false(condition: bool, message: impl Into<String>) -> ProbeResult<()> {
        Self::is_true(!condition, message)
    }

    /// Assert two values are equal
    pub fn equals<T: PartialEq + Debug + ?Sized>(
        expected: &T,
        actual: &T,
        context: &str,
    ) -> ProbeResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(ProbeError::assertion(format!(
                "{context}: expected {expected:?}, got {actual:?}"
            )))
        }
    }

    /// Assert two strings are equal ignoring ASCII and Unicode case
    pub fn equals_ignore_case(expected: &str, actual: &str, context: &str) -> ProbeResult<()> {
        if expected.to_lowercase() == actual.to_lowercase() {
            Ok(())
        } else {
            Err(ProbeError::assertion(format!(
                "{context}: expected {expected:?} (any case), got {actual:?}"
            )))
        }
    }

    /// Assert two floats are within `tolerance` of each other
    pub fn approx_eq(expected: f64, actual: f64, tolerance: f64, context: &str) -> ProbeResult<()> {
        if (expected - actual).abs() < tolerance {
            Ok(())
        } else {
            Err(ProbeError::assertion(format!(
                "{context}: expected {expected} ± {tolerance}, got {actual}"
            )))
        }
    }

    /// Assert two collections contain the same items, ignoring order
    pub fn same_items<T: Ord + Debug + Clone>(
        expected: &[T],
        actual: &[T],
        context: &str,
    ) -> ProbeResult<()> {
        if counts(expected) == counts(actual) {
            Ok(())
        } else {
            let mut expected = expected.to_vec();
            let mut actual = actual.to_vec();
            expected.sort();
            actual.sort();
            Err(ProbeError::assertion(format!(
                "{context}: expected {expected:?}, got {actual:?}"
            )))
        }
    }

    /// Assert a slice is sorted by `cmp`
    pub fn sorted_by<T: Debug>(
        values: &[T],
        cmp: impl Fn(&T, &T) -> std::cmp::Ordering,
        context: &str,
    ) -> ProbeResult<()> {
        let ok = values
            .windows(2)
            .all(|pair| cmp(&pair[0], &pair[1]) != std::cmp::Ordering::Greater);
        if ok {
            Ok(())
        } else {
            Err(ProbeError::assertion(format!("{context}: not sorted: {values:?}")))
        }
    }
}

fn counts<T: Ord + Clone>(items: &[T]) -> BTreeMap<T, usize> {
    let mut map = BTreeMap::new();
    for item in items {
        *map.entry(item.clone()).or_insert(0) += 1;
    }
    map
}
