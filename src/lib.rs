#![deny(missing_docs)]

//! The design philosophy underlying `compact_ledger` is austere, yet cryptographically strict.
//! Every value entering the ledger is validated once at the boundary, so the
//! append-only sequences never hold an operand outside the ambient field.
//! # compact_ledger
//!
//! **compact_ledger** is an append-only challenge/proof verification ledger
//! over BN254 finite-field arithmetic.  Clients register *challenges*
//! (commitments); servers submit *proofs* (responses) that are checked
//! against a recorded challenge by a pure verification predicate, and the
//! outcome is stored immutably under its own sequential index.  Verification
//! happens exactly once, at submission time: replaying the ledger never
//! re-runs cryptography.
//!
//! ## Features
//!
//! * **Validated field elements** via the [`FieldElement`] type: every
//!   operand is checked into `[0, q)` for the BN254 base field before it can
//!   reach either sequence.
//! * **Append-only sequences**: the [`ChallengeRegistry`] and the
//!   [`ProofLedger`] assign strictly increasing 1-based indices with no gaps
//!   and no reuse, and entries are never mutated or deleted.
//! * **Pluggable verification**: the [`VerificationPredicate`] trait is the
//!   seam where the algebraic relation plugs in; the
//!   [`schnorr`](schnorr/index.html) module ships a Schnorr-style reference
//!   predicate over BN254 G1 together with the prescribed response
//!   generation procedures.
//! * **Audit transcripts**: every accepted submission renders to a
//!   deterministic ASCII record closed by a domain-separated BLAKE2b-256
//!   digest, optionally persisted as a numbered text series.
//! * **Anchor reconciliation**: replicas exchange [`LedgerAnchor`]
//!   structures and agree (unanimously or by quorum) that they hold
//!   byte-identical append-only state.
//!
//! ## Usage
//!
//! ```rust
//! use compact_ledger::{schnorr, ChallengeRef, Compact, SchnorrPredicate};
//!
//! let ledger = Compact::new(Box::new(SchnorrPredicate));
//!
//! // A client registers a point commitment.
//! let (secret, commitment) = schnorr::keypair(1);
//! ledger.submit_challenge(commitment, "client".into()).unwrap();
//!
//! // The server answers the most recent challenge.
//! let index = ledger
//!     .submit_proof(schnorr::respond(&secret), ChallengeRef::Latest, "server".into())
//!     .unwrap();
//! assert!(ledger.get_proof(index).unwrap().valid);
//! ```

mod anchor;
mod audit;
mod compact;
mod error;
mod field;
mod ledger;
mod policy;
mod predicate;
mod registry;
pub mod schnorr;

pub use anchor::{reconcile_anchors, reconcile_anchors_with_quorum, EntryAnchor, LedgerAnchor};
pub use audit::{
    challenge_digest, parse_record as parse_audit_record, proof_digest,
    verify_record_lines as verify_audit_lines, write_challenge_record, write_proof_record,
    write_text_series, AuditRecord, EntryDigest,
};
pub use compact::Compact;
pub use error::LedgerError;
pub use field::FieldElement;
pub use ledger::{ProofLedger, ProofRecord};
pub use policy::{Principal, SubmitterPolicy};
pub use predicate::{ChallengeRef, Commitment, Response, VerificationPredicate};
pub use registry::{Challenge, ChallengeRegistry};
pub use schnorr::SchnorrPredicate;
