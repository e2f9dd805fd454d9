use clap::Parser;
use mersenne::{Config, Pipeline, Summary, logger, reporters::LineReporter};
use std::path::PathBuf;

/// Tests 2^p - 1 for every prime p up to a limit with the Lucas-Lehmer test
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Upper bound for the prime exponents (default 1000)
    #[arg(short, long, env = "MERSENNE_LIMIT", allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Optional TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "MERSENNE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let guard = logger::init();

    let cli = Cli::parse();
    tracing::debug!("Command line: {:?}", cli);

    let code = run(cli).await;

    // flush buffered log lines before exiting
    drop(guard);
    if code != 0 {
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> i32 {
    let conf = match Config::resolve(cli.config.as_deref(), cli.limit) {
        Ok(conf) => conf,
        Err(e) => {
            eprintln!("Failed to initialize configuration: {:#}", e);
            return 1;
        }
    };

    let mut reporter = LineReporter::stdout();
    let result = Pipeline::new(conf).run(&mut reporter).await;
    exit_code(&result)
}

/// Exit status once the pipeline has finished.
///
/// Failed exponents already have their own report line, so only a run that
/// could not report at all exits non-zero.
fn exit_code(result: &anyhow::Result<Summary>) -> i32 {
    match result {
        Ok(summary) => {
            if summary.failures > 0 {
                tracing::error!("{} exponents could not be tested", summary.failures);
            }
            0
        }
        Err(e) => {
            eprintln!("{:#}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mersenne::MersenneError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exit_code_is_zero_even_with_failed_exponents() {
        let summary = Summary {
            tested: 3,
            mersenne_primes: vec![2, 3],
            failures: 1,
        };
        assert_eq!(exit_code(&Ok(summary)), 0);
        assert_eq!(exit_code(&Ok(Summary::default())), 0);
    }

    #[test]
    fn test_exit_code_is_one_when_run_is_rejected() {
        let err = anyhow::Error::new(MersenneError::InvalidArgument {
            limit: -1,
            reason: "limit must not be negative".to_string(),
        });
        assert_eq!(exit_code(&Err(err)), 1);
    }
}
