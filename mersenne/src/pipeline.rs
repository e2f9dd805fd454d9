use crate::{
    Config,
    lucas_lehmer::{LucasLehmer, Tester},
    message::Outcome,
    reporters::{Reporter, report_all},
    sieve::sieve,
    worker_pool::{WorkerPool, test_all},
};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Totals gathered from one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub tested: usize,
    pub mersenne_primes: Vec<u64>,
    pub failures: usize,
}

impl Summary {
    fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let mut summary = Summary {
            tested: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                Ok(result) if result.is_prime() => summary.mersenne_primes.push(result.exponent),
                Ok(_) => {}
                Err(_) => summary.failures += 1,
            }
        }
        summary
    }
}

/// Sieve, dispatch and report, in that order.
pub struct Pipeline {
    conf: Config,
    tester: Arc<dyn Tester>,
    num_workers: usize,
}

impl Pipeline {
    pub fn new(conf: Config) -> Self {
        Self {
            conf,
            tester: Arc::new(LucasLehmer),
            num_workers: WorkerPool::default_size(),
        }
    }

    pub fn with_tester(mut self, tester: Arc<dyn Tester>) -> Self {
        self.tester = tester;
        self
    }

    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// Runs the whole pipeline, handing every outcome to `reporter` in
    /// ascending exponent order.
    pub async fn run<R>(&self, reporter: &mut R) -> Result<Summary>
    where
        R: Reporter + ?Sized,
    {
        self.conf.validate()?;

        let candidates = sieve(self.conf.limit)?;
        tracing::info!(
            "Sieve produced {} candidates up to {}",
            candidates.len(),
            self.conf.limit
        );

        let outcomes = test_all(self.tester.clone(), self.num_workers, &candidates).await;

        report_all(reporter, &outcomes)
            .await
            .with_context(|| format!("Reporter '{}' failed", reporter.name()))?;

        let summary = Summary::from_outcomes(&outcomes);
        tracing::info!(
            "Tested {} exponents, {} Mersenne primes, {} failures",
            summary.tested,
            summary.mersenne_primes.len(),
            summary.failures
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MersenneError, WorkerFailure};
    use crate::reporters::LineReporter;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_run_limit_below_two_reports_nothing() {
        let mut reporter = LineReporter::new(Vec::new());
        let summary = Pipeline::new(Config::new(1)).run(&mut reporter).await.unwrap();

        assert_eq!(summary, Summary::default());
        assert!(reporter.into_inner().is_empty());
    }

    #[tokio::test]
    async fn test_run_rejects_negative_limit_before_reporting() {
        let mut reporter = LineReporter::new(Vec::new());
        let err = Pipeline::new(Config::new(-3))
            .run(&mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MersenneError>(),
            Some(MersenneError::InvalidArgument { limit: -3, .. })
        ));
        assert_eq!(reporter.lines(), 0);
    }

    #[tokio::test]
    async fn test_run_rejects_unallocatable_limit() {
        let mut reporter = LineReporter::new(Vec::new());
        let err = Pipeline::new(Config::new(i64::MAX))
            .run(&mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MersenneError>(),
            Some(MersenneError::InvalidArgument { limit: i64::MAX, .. })
        ));
        assert_eq!(reporter.lines(), 0);
    }

    struct FailOnEleven;

    impl Tester for FailOnEleven {
        fn is_mersenne_prime(&self, exponent: u64) -> bool {
            assert_ne!(exponent, 11, "refusing exponent 11");
            LucasLehmer.is_mersenne_prime(exponent)
        }

        fn name(&self) -> &'static str {
            "fail-on-eleven"
        }
    }

    #[tokio::test]
    async fn test_run_keeps_a_line_for_failed_exponent() {
        let mut reporter = LineReporter::new(Vec::new());
        let summary = Pipeline::new(Config::new(13))
            .with_tester(Arc::new(FailOnEleven))
            .with_workers(2)
            .run(&mut reporter)
            .await
            .unwrap();

        assert_eq!(summary.tested, 6);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.mersenne_primes, vec![2, 3, 5, 7, 13]);

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[4].starts_with("M_11 = 2^11 - 1: error ("));
        assert!(lines[4].contains("refusing exponent 11"));
        assert_eq!(lines[5], "M_13 = 2^13 - 1: prime");
    }

    #[test]
    fn test_summary_counts_failures() {
        use crate::message::{TestResult, Verdict};

        let outcomes: Vec<Outcome> = vec![
            Ok(TestResult {
                exponent: 2,
                verdict: Verdict::Prime,
            }),
            Ok(TestResult {
                exponent: 11,
                verdict: Verdict::Composite,
            }),
            Err(WorkerFailure {
                exponent: 13,
                reason: "boom".to_string(),
            }),
        ];
        let summary = Summary::from_outcomes(&outcomes);
        assert_eq!(summary.tested, 3);
        assert_eq!(summary.mersenne_primes, vec![2]);
        assert_eq!(summary.failures, 1);
    }
}
