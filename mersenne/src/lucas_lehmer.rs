//! Lucas-Lehmer primality test for Mersenne numbers.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// A primality test applied by the worker pool to one exponent at a time.
///
/// Implementations must be pure: the same exponent always yields the same
/// verdict.
pub trait Tester: Send + Sync {
    fn is_mersenne_prime(&self, exponent: u64) -> bool;

    /// Returns the name of this tester for logging purposes.
    fn name(&self) -> &'static str;
}

/// Deterministic Lucas-Lehmer test over arbitrary-precision integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LucasLehmer;

impl Tester for LucasLehmer {
    fn is_mersenne_prime(&self, exponent: u64) -> bool {
        is_mersenne_prime(exponent)
    }

    fn name(&self) -> &'static str {
        "lucas-lehmer"
    }
}

/// Returns `2^p - 1`.
pub fn mersenne_number(p: u64) -> BigUint {
    (BigUint::one() << p) - BigUint::one()
}

/// Decides whether `2^p - 1` is prime.
///
/// `p` is expected to be prime itself; composite exponents are still
/// well-defined and come out composite. `p = 2` short-circuits to `true`
/// since the recurrence needs `p > 2`. Exponents below 2 give `M_0 = 0` and
/// `M_1 = 1`, neither of which is prime.
pub fn is_mersenne_prime(p: u64) -> bool {
    if p == 2 {
        return true;
    }
    if p < 2 {
        return false;
    }

    let m = mersenne_number(p);
    let mut s = BigUint::from(4u32);

    for _ in 0..p - 2 {
        // add m before subtracting so s*s - 2 cannot underflow when s < 2
        s = (&s * &s + &m - 2u32) % &m;
    }

    s.is_zero()
}
