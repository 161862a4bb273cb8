//! The design philosophy underlying `compact_ledger` is austere, yet cryptographically strict.
//! Every value entering the ledger is validated once at the boundary, so the
//! append-only sequences never hold an operand outside the ambient field.
//!
//! Proof ledger.
//!
//! The verification outcome for a submitted response is computed exactly
//! once, at submission time, and stored alongside the response under the
//! next sequential index.  The ledger never re-runs verification: replaying
//! reads yields the same bytes forever.  Its index sequence is independent
//! from the challenge registry's.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::policy::Principal;
use crate::predicate::Response;

/// An immutable recorded proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    /// 1-based position in the proof ledger.
    pub index: u64,
    /// Index of the challenge this proof answered.
    pub challenge_index: u64,
    /// The response supplied by the server.
    pub response: Response,
    /// Outcome of the verification predicate, fixed at submission time.
    pub valid: bool,
    /// Identity of the submitting caller.
    pub submitter: Principal,
}

/// Append-only sequence of proof records.
#[derive(Debug, Default)]
pub struct ProofLedger {
    entries: Vec<ProofRecord>,
}

impl ProofLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a verified proof record and returns its assigned index.
    pub fn submit(
        &mut self,
        challenge_index: u64,
        response: Response,
        valid: bool,
        submitter: Principal,
    ) -> u64 {
        let index = self.entries.len() as u64 + 1;
        self.entries.push(ProofRecord {
            index,
            challenge_index,
            response,
            valid,
            submitter,
        });
        index
    }

    /// Returns the proof record at the 1-based index.
    pub fn get(&self, index: u64) -> Result<&ProofRecord, LedgerError> {
        if index == 0 || index > self.entries.len() as u64 {
            return Err(LedgerError::NotFound { index });
        }
        Ok(&self.entries[(index - 1) as usize])
    }

    /// Returns the number of stored proof records.
    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Returns true when no proof has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a read-only view of all entries in submission order.
    pub fn entries(&self) -> &[ProofRecord] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldElement;

    fn response(a: u64, b: u64) -> Response {
        Response {
            a: FieldElement::from_u64(a),
            b: FieldElement::from_u64(b),
        }
    }

    #[test]
    fn test_indices_are_sequential_from_one() {
        let mut ledger = ProofLedger::new();
        for expected in 1..=4u64 {
            let index = ledger.submit(1, response(expected, expected), true, "server".into());
            assert_eq!(index, expected);
        }
        assert_eq!(ledger.len(), 4);
    }

    #[test]
    fn test_bounds() {
        let mut ledger = ProofLedger::new();
        assert_eq!(ledger.get(0), Err(LedgerError::NotFound { index: 0 }));
        ledger.submit(1, response(9, 9), false, "server".into());
        assert!(ledger.get(1).is_ok());
        assert_eq!(ledger.get(2), Err(LedgerError::NotFound { index: 2 }));
    }

    #[test]
    fn test_valid_flag_is_never_recomputed() {
        let mut ledger = ProofLedger::new();
        ledger.submit(1, response(5, 6), false, "server".into());
        let before = ledger.get(1).unwrap().clone();
        ledger.submit(1, response(5, 6), true, "server".into());
        let stored = ledger.get(1).unwrap();
        assert_eq!(stored, &before);
        assert!(!stored.valid);
        assert!(ledger.get(2).unwrap().valid);
    }
}
