//! Sieve of Eratosthenes producing the candidate exponents.

use crate::error::MersenneError;

/// Returns every prime `p` with `2 <= p <= limit`, in ascending order.
///
/// A limit below 2 yields an empty list. A negative limit, or one whose
/// table cannot be allocated, is rejected with
/// [`MersenneError::InvalidArgument`] before any sieving starts.
pub fn sieve(limit: i64) -> Result<Vec<u64>, MersenneError> {
    if limit < 0 {
        return Err(MersenneError::InvalidArgument {
            limit,
            reason: "limit must not be negative".to_string(),
        });
    }

    let size = usize::try_from(limit)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| MersenneError::InvalidArgument {
            limit,
            reason: "limit does not fit in memory on this platform".to_string(),
        })?;

    if size < 3 {
        return Ok(Vec::new());
    }

    let mut is_prime: Vec<bool> = Vec::new();
    is_prime
        .try_reserve_exact(size)
        .map_err(|e| MersenneError::InvalidArgument {
            limit,
            reason: format!("sieve table of {} entries cannot be allocated: {}", size, e),
        })?;
    is_prime.resize(size, true);
    is_prime[0] = false;
    is_prime[1] = false;

    let last = size - 1;
    let mut i = 2;
    while i <= last / i {
        if is_prime[i] {
            for multiple in (i * i..=last).step_by(i) {
                is_prime[multiple] = false;
            }
        }
        i += 1;
    }

    Ok(is_prime
        .iter()
        .enumerate()
        .filter(|(_, prime)| **prime)
        .map(|(n, _)| n as u64)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sieve_small_limits() {
        assert_eq!(sieve(10).unwrap(), vec![2, 3, 5, 7]);
        assert_eq!(sieve(1).unwrap(), Vec::<u64>::new());
        assert_eq!(sieve(0).unwrap(), Vec::<u64>::new());
        assert_eq!(sieve(2).unwrap(), vec![2]);
    }

    #[test]
    fn test_sieve_includes_limit_when_prime() {
        assert_eq!(sieve(20).unwrap(), vec![2, 3, 5, 7, 11, 13, 17, 19]);
        assert_eq!(sieve(19).unwrap(), vec![2, 3, 5, 7, 11, 13, 17, 19]);
        // perfect square bound
        assert_eq!(sieve(25).unwrap(), vec![2, 3, 5, 7, 11, 13, 17, 19, 23]);
    }

    #[test]
    fn test_sieve_count_up_to_1000() {
        let primes = sieve(1000).unwrap();
        assert_eq!(primes.len(), 168);
        assert_eq!(primes.last(), Some(&997));
        assert!(primes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sieve_rejects_negative_limit() {
        let err = sieve(-1).unwrap_err();
        assert!(matches!(err, MersenneError::InvalidArgument { limit: -1, .. }));
    }

    #[test]
    fn test_sieve_rejects_limit_beyond_addressable_memory() {
        let err = sieve(i64::MAX).unwrap_err();
        assert!(matches!(
            err,
            MersenneError::InvalidArgument {
                limit: i64::MAX,
                ..
            }
        ));
    }
}
