//! The design philosophy underlying `compact_ledger` is austere, yet cryptographically strict.
//! Every value entering the ledger is validated once at the boundary, so the
//! append-only sequences never hold an operand outside the ambient field.
//!
//! Challenge registry.
//!
//! An owned, growable sequence of client commitments.  Indices are 1-based
//! and equal the registry length at the time of the append, so they are
//! strictly increasing with no gaps and no reuse.  Entries are never mutated
//! or removed.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::policy::Principal;
use crate::predicate::Commitment;

/// An immutable registered challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// 1-based position in the registry.
    pub index: u64,
    /// The commitment supplied by the client.
    pub commitment: Commitment,
    /// Identity of the submitting caller.
    pub submitter: Principal,
}

/// Append-only sequence of challenges.
#[derive(Debug, Default)]
pub struct ChallengeRegistry {
    entries: Vec<Challenge>,
}

impl ChallengeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a challenge and returns its assigned index.
    pub fn submit(&mut self, commitment: Commitment, submitter: Principal) -> u64 {
        let index = self.entries.len() as u64 + 1;
        self.entries.push(Challenge {
            index,
            commitment,
            submitter,
        });
        index
    }

    /// Returns the challenge at the 1-based index.
    pub fn get(&self, index: u64) -> Result<&Challenge, LedgerError> {
        if index == 0 || index > self.entries.len() as u64 {
            return Err(LedgerError::NotFound { index });
        }
        Ok(&self.entries[(index - 1) as usize])
    }

    /// Returns the most recently registered challenge, if any.
    pub fn latest(&self) -> Option<&Challenge> {
        self.entries.last()
    }

    /// Returns the number of stored challenges.
    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Returns true when no challenge has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a read-only view of all entries in submission order.
    pub fn entries(&self) -> &[Challenge] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldElement;

    fn point(x: u64, y: u64) -> Commitment {
        Commitment::Point {
            x: FieldElement::from_u64(x),
            y: FieldElement::from_u64(y),
        }
    }

    #[test]
    fn test_indices_are_sequential_from_one() {
        let mut registry = ChallengeRegistry::new();
        for expected in 1..=5u64 {
            let index = registry.submit(point(expected, expected), Principal::from("client"));
            assert_eq!(index, expected);
        }
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_bounds() {
        let mut registry = ChallengeRegistry::new();
        assert_eq!(registry.get(0), Err(LedgerError::NotFound { index: 0 }));
        assert_eq!(registry.get(1), Err(LedgerError::NotFound { index: 1 }));
        registry.submit(point(467, 491), Principal::from("client"));
        assert!(registry.get(1).is_ok());
        assert_eq!(registry.get(2), Err(LedgerError::NotFound { index: 2 }));
    }

    #[test]
    fn test_entries_are_immutable_across_later_submissions() {
        let mut registry = ChallengeRegistry::new();
        registry.submit(point(467, 491), Principal::from("client"));
        let before = registry.get(1).unwrap().clone();
        for extra in 0..10u64 {
            registry.submit(point(extra, extra), Principal::from("client"));
        }
        assert_eq!(registry.get(1).unwrap(), &before);
    }

    #[test]
    fn test_latest_tracks_most_recent() {
        let mut registry = ChallengeRegistry::new();
        assert!(registry.latest().is_none());
        registry.submit(point(1, 2), Principal::from("client"));
        registry.submit(point(3, 4), Principal::from("client"));
        assert_eq!(registry.latest().unwrap().index, 2);
    }
}
