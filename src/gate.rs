//! Threshold gating and the coupling ratio
//!
//! Each tool keeps its own comparison direction: coupling fails when a value
//! is strictly above the threshold, coverage fails when a value is strictly
//! below it. Equality always passes.

use serde::Serialize;

/// Default coupling threshold, in percent
pub const DEFAULT_COUPLING_THRESHOLD: f64 = 13.37;

/// Default minimum line coverage, in percent
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 90.0;

/// Which side of the threshold counts as a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Fails when `value > threshold`
    Above,
    /// Fails when `value < threshold`
    Below,
}

/// A single scalar cutoff
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold {
    pub value: f64,
    pub direction: Direction,
}

impl Threshold {
    pub fn above(value: f64) -> Self {
        Self {
            value,
            direction: Direction::Above,
        }
    }

    pub fn below(value: f64) -> Self {
        Self {
            value,
            direction: Direction::Below,
        }
    }

    /// Check whether `measured` violates this threshold
    pub fn is_violated_by(&self, measured: f64) -> bool {
        match self.direction {
            Direction::Above => measured > self.value,
            Direction::Below => measured < self.value,
        }
    }
}

/// Run-wide tally of threshold violations. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureCounter(usize);

impl FailureCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one gate decision; returns `failed` for chaining
    pub fn record(&mut self, failed: bool) -> bool {
        if failed {
            self.0 += 1;
        }
        failed
    }

    pub fn add(&mut self, failures: usize) {
        self.0 += failures;
    }

    pub fn total(&self) -> usize {
        self.0
    }
}

/// Coupling ratio of one file, in percent.
///
/// `total_files` must be non-zero; callers short-circuit empty scans before
/// computing any ratio. The result is not clamped and may exceed 100.
pub fn coupling_percentage(local_includes: usize, total_files: usize) -> f64 {
    debug_assert!(total_files > 0, "coupling ratio needs at least one source");
    100.0 * local_includes as f64 / total_files as f64
}

/// Format a threshold the way it is echoed in report headings (`15.0`, `13.37`)
pub fn format_threshold(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupling_self_ratio() {
        assert_eq!(coupling_percentage(1, 1), 100.0);
    }

    #[test]
    fn test_coupling_zero_includes() {
        assert_eq!(coupling_percentage(0, 10), 0.0);
    }

    #[test]
    fn test_coupling_not_clamped() {
        assert_eq!(coupling_percentage(6, 3), 200.0);
    }

    #[test]
    fn test_coupling_ratio() {
        assert_eq!(coupling_percentage(1, 5), 20.0);
    }

    #[test]
    fn test_above_is_strict() {
        let t = Threshold::above(15.0);
        assert!(!t.is_violated_by(15.0));
        assert!(t.is_violated_by(15.01));
        assert!(!t.is_violated_by(0.0));
    }

    #[test]
    fn test_below_is_strict() {
        let t = Threshold::below(90.0);
        assert!(!t.is_violated_by(90.0));
        assert!(t.is_violated_by(89.99));
        assert!(!t.is_violated_by(100.0));
    }

    #[test]
    fn test_failure_counter() {
        let mut counter = FailureCounter::new();
        assert!(counter.record(true));
        assert!(!counter.record(false));
        counter.add(2);
        assert_eq!(counter.total(), 3);
    }

    #[test]
    fn test_format_threshold() {
        assert_eq!(format_threshold(15.0), "15.0");
        assert_eq!(format_threshold(13.37), "13.37");
        assert_eq!(format_threshold(DEFAULT_COVERAGE_THRESHOLD), "90.0");
    }
}
