//! Error taxonomy shared by the registry, the ledger and the facade.

use thiserror::Error;

/// Errors surfaced by ledger operations.
///
/// Every variant is local and non-retryable: the core performs no internal
/// retries and a failed operation leaves both sequences untouched.  A
/// verification predicate returning `false` is *not* an error; it is a valid
/// outcome recorded in the proof ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("field element out of range: {0}")]
    /// An operand does not lie in `[0, q)` for the ambient prime field.
    InvalidFieldElement(String),
    #[error("no entry at index {index}")]
    /// An explicit index is 0 or exceeds the current sequence length.
    NotFound {
        /// The offending index as supplied by the caller.
        index: u64,
    },
    #[error("no challenge has been registered")]
    /// A proof referenced the most recent challenge of an empty registry.
    NoChallenge,
    #[error("submitter {0} is not permitted")]
    /// The submitting principal was rejected by the access policy.
    Unauthorized(String),
    #[error("policy error: {0}")]
    /// An allowlist file could not be loaded or parsed.
    Policy(String),
    #[error("audit record error: {0}")]
    /// An audit record could not be written, parsed or re-verified.
    Audit(String),
}
