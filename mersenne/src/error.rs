use thiserror::Error;

/// Errors rejecting the run before any exponent is tested.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MersenneError {
    /// The sieve limit cannot be used, e.g. it is negative.
    #[error("invalid sieve limit {limit}: {reason}")]
    InvalidArgument { limit: i64, reason: String },
}

/// A worker did not produce a verdict for this exponent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("worker failed while testing exponent {exponent}: {reason}")]
pub struct WorkerFailure {
    pub exponent: u64,
    pub reason: String,
}
