mod line;

use crate::message::Outcome;
use anyhow::Result;
use async_trait::async_trait;

pub use line::LineReporter;

/// Trait for the sinks receiving test outcomes.
///
/// Outcomes are handed over one at a time, in the order the candidates were
/// produced by the sieve.
#[async_trait]
pub trait Reporter: Send {
    async fn report(&mut self, outcome: &Outcome) -> Result<()>;

    /// Flushes anything buffered once the last outcome has been reported.
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Returns the name of this reporter for logging purposes.
    fn name(&self) -> &'static str;
}

/// Reports every outcome in sequence order, then finishes the reporter.
pub async fn report_all<R>(reporter: &mut R, outcomes: &[Outcome]) -> Result<()>
where
    R: Reporter + ?Sized,
{
    for outcome in outcomes {
        reporter.report(outcome).await?;
    }
    reporter.finish().await
}
