//! # Nonce Sequencing
//!
//! Local nonce assignment for a burst of transactions to one network.
//!
//! The sequence starts at the account's on-chain transaction count and
//! increments by exactly one per transaction, whether or not the previous
//! transaction broadcast successfully. It is never re-queried mid-burst;
//! this is safe only because execution is single-threaded and nothing else
//! uses the same key concurrently.

/// Strictly increasing, gap-free nonce sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceSequence {
    next: u64,
}

impl NonceSequence {
    /// Creates a sequence starting at the given nonce.
    #[must_use]
    pub const fn starting_at(nonce: u64) -> Self {
        Self { next: nonce }
    }

    /// Returns the next nonce and advances the sequence.
    pub const fn next(&mut self) -> u64 {
        let nonce = self.next;
        self.next += 1;
        nonce
    }

    /// Returns the nonce the next call to [`Self::next`] will yield.
    #[must_use]
    pub const fn peek(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_gap_free() {
        let mut seq = NonceSequence::starting_at(7);
        let nonces: Vec<u64> = (0..5).map(|_| seq.next()).collect();
        assert_eq!(nonces, vec![7, 8, 9, 10, 11]);
        assert_eq!(seq.peek(), 12);
    }

    #[test]
    fn sequence_starts_at_given_nonce() {
        let mut seq = NonceSequence::starting_at(0);
        assert_eq!(seq.next(), 0);
        assert_eq!(seq.next(), 1);
    }
}
