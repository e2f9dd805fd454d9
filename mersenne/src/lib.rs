//! Searches for Mersenne primes `2^p - 1` among the prime exponents up to a
//! limit, testing every exponent with the Lucas-Lehmer test on a worker pool.
pub mod config;
pub mod error;
pub mod logger;
pub mod lucas_lehmer;
pub mod message;
pub mod pipeline;
pub mod reporters;
pub mod sieve;
pub mod worker_pool;

pub use config::Config;
pub use error::{MersenneError, WorkerFailure};
pub use lucas_lehmer::{LucasLehmer, Tester, is_mersenne_prime};
pub use pipeline::{Pipeline, Summary};
pub use sieve::sieve;
pub use worker_pool::{WorkerPool, test_all};
