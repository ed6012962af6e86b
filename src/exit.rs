//! Process exit codes shared by all checks.
//!
//! A check's exit status is its failure count, so `0` always means the gate
//! passed. Counts saturate below [`FATAL_CODE`] so that a large number of
//! failures can neither wrap around to `0` nor be mistaken for an aborted run.

use std::process::{ExitCode, Termination};

/// Exit status of a run that aborted (unreadable file, malformed input)
pub const FATAL_CODE: u8 = 255;

/// Highest failure count that can be reported exactly
pub const MAX_FAILURE_CODE: u8 = FATAL_CODE - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateExit {
    /// No violations.
    Passed,
    /// This many threshold violations.
    Failures(usize),
    /// The run could not complete.
    Fatal,
}

impl GateExit {
    pub fn from_failures(failures: usize) -> Self {
        if failures == 0 {
            Self::Passed
        } else {
            Self::Failures(failures)
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Passed => 0,
            Self::Failures(n) => {
                u8::try_from(n).map_or(MAX_FAILURE_CODE, |c| c.min(MAX_FAILURE_CODE))
            }
            Self::Fatal => FATAL_CODE,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Passed
    }
}

impl Termination for GateExit {
    fn report(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}
