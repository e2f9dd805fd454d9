/// Message module for the Mersenne pipeline
///
/// This module defines the data structures passed between the sieve, the
/// worker pool and the reporters.
use crate::error::WorkerFailure;
use std::fmt;

/// A prime exponent `p` produced by the sieve, tagged with its position in
/// the sieve output.
///
/// # Fields
/// * `index` - Position of the exponent in the submitted sequence
/// * `exponent` - The exponent `p` of the Mersenne number `2^p - 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub index: usize,
    pub exponent: u64,
}

/// Classification of a Mersenne number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Prime,
    Composite,
}

impl From<bool> for Verdict {
    fn from(is_prime: bool) -> Self {
        if is_prime { Verdict::Prime } else { Verdict::Composite }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Prime => write!(f, "prime"),
            Verdict::Composite => write!(f, "composite"),
        }
    }
}

/// Verdict of a single Lucas-Lehmer run.
///
/// # Fields
/// * `exponent` - The tested exponent `p`
/// * `verdict` - Whether `2^p - 1` is prime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestResult {
    pub exponent: u64,
    pub verdict: Verdict,
}

impl TestResult {
    pub fn is_prime(&self) -> bool {
        self.verdict == Verdict::Prime
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M_{p} = 2^{p} - 1: {}",
            self.verdict,
            p = self.exponent
        )
    }
}

/// What the worker pool hands back for one candidate.
pub type Outcome = Result<TestResult, WorkerFailure>;

/// Formats an outcome as a single report line, without the trailing newline.
///
/// Failed candidates still get a line so the output keeps one line per
/// exponent.
pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Ok(result) => result.to_string(),
        Err(WorkerFailure { exponent, reason }) => {
            format!("M_{p} = 2^{p} - 1: error ({reason})", p = exponent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_result_line_format() {
        let prime = TestResult {
            exponent: 7,
            verdict: Verdict::Prime,
        };
        let composite = TestResult {
            exponent: 11,
            verdict: Verdict::Composite,
        };
        assert_eq!(prime.to_string(), "M_7 = 2^7 - 1: prime");
        assert_eq!(composite.to_string(), "M_11 = 2^11 - 1: composite");
    }

    #[test]
    fn test_failed_outcome_still_names_exponent() {
        let outcome: Outcome = Err(WorkerFailure {
            exponent: 13,
            reason: "out of memory".to_string(),
        });
        assert_eq!(format_outcome(&outcome), "M_13 = 2^13 - 1: error (out of memory)");
    }
}
