//! Integer hash functions for the hash-table engines.
//!
//! Collision counts are sensitive to the exact hash, so a table is generic
//! over its [`KeyHasher`] and keeps the same one for its whole lifetime.

use crate::Key;

/// Deterministic hash of an integer key.
pub trait KeyHasher {
    fn hash(&self, key: Key) -> u64;
}

/// `hash(k) = k` (two's complement reinterpretation for negative keys).
///
/// Non-negative keys hash to themselves, so `index = key mod size` and
/// collision counts can be worked out by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityHasher;

impl KeyHasher for IdentityHasher {
    #[inline]
    fn hash(&self, key: Key) -> u64 {
        key as u64
    }
}

/// Multiplicative (Fibonacci) hash folded to mix the high bits down.
///
/// Spreads sequential and clustered keys across buckets, which the identity
/// hash does not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FibonacciHasher;

impl FibonacciHasher {
    const MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;
}

impl KeyHasher for FibonacciHasher {
    #[inline]
    fn hash(&self, key: Key) -> u64 {
        let h = (key as u64).wrapping_mul(Self::MULTIPLIER);
        h ^ (h >> 32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        assert_eq!(IdentityHasher.hash(0), 0);
        assert_eq!(IdentityHasher.hash(17), 17);
        assert_eq!(IdentityHasher.hash(-1), u64::MAX);
    }

    #[test]
    fn test_fibonacci_spreads_sequential_keys() {
        let size = 64u64;
        let mut used = [false; 64];
        for k in 0..64 {
            used[(FibonacciHasher.hash(k * 64) % size) as usize] = true;
        }
        // Identity would put all of these in bucket 0.
        assert!(used.iter().filter(|&&u| u).count() > 16);
    }

    #[test]
    fn test_fibonacci_deterministic() {
        assert_eq!(FibonacciHasher.hash(12345), FibonacciHasher.hash(12345));
        assert_ne!(FibonacciHasher.hash(1), FibonacciHasher.hash(2));
    }
}
