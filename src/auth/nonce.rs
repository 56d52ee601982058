//! Nonce generation for signed requests.
//!
//! Kraken rejects a signed request whose nonce is not greater than the last
//! one it saw for the same API key. Generators here serialize issuance with an
//! atomic, so one instance can be shared by concurrent callers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of nonces for authenticated requests.
pub trait NonceProvider: Send + Sync {
    /// Generate the next nonce value.
    ///
    /// Must be greater than any value previously returned by this provider.
    fn next_nonce(&self) -> u64;
}

/// Time-based nonces: microseconds since the UNIX epoch, bumped by one when
/// two requests land in the same microsecond or the clock steps back.
#[derive(Debug, Default)]
pub struct IncreasingNonce {
    last: AtomicU64,
}

impl IncreasingNonce {
    /// Create a new increasing nonce provider.
    pub fn new() -> Self {
        Self::default()
    }

    fn now_micros() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as u64
    }
}

impl NonceProvider for IncreasingNonce {
    fn next_nonce(&self) -> u64 {
        let now = Self::now_micros();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

/// A plain counter starting after `seed`.
///
/// Useful when the nonce window has to be controlled, and in tests.
#[derive(Debug)]
pub struct CounterNonce {
    next: AtomicU64,
}

impl CounterNonce {
    /// The first nonce handed out is `seed + 1`.
    pub fn starting_after(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed + 1),
        }
    }
}

impl NonceProvider for CounterNonce {
    fn next_nonce(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_nonce_strictly_increasing() {
        let provider = IncreasingNonce::new();

        let mut last = 0u64;
        for _ in 0..1000 {
            let nonce = provider.next_nonce();
            assert!(nonce > last, "Nonce must be strictly increasing");
            last = nonce;
        }
    }

    #[test]
    fn test_nonce_unique_across_threads() {
        let provider = Arc::new(IncreasingNonce::new());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = provider.clone();
                thread::spawn(move || (0..1000).map(|_| p.next_nonce()).collect::<Vec<_>>())
            })
            .collect();

        let mut all_nonces = HashSet::new();
        for handle in handles {
            for nonce in handle.join().unwrap() {
                assert!(all_nonces.insert(nonce), "Nonce must be unique across threads");
            }
        }
    }

    #[test]
    fn test_counter_nonce_sequence() {
        let provider = CounterNonce::starting_after(1616492376593);
        assert_eq!(provider.next_nonce(), 1616492376594);
        assert_eq!(provider.next_nonce(), 1616492376595);
    }
}
