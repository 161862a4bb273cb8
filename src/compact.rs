//! The design philosophy underlying `compact_ledger` is austere, yet cryptographically strict.
//! Every value entering the ledger is validated once at the boundary, so the
//! append-only sequences never hold an operand outside the ambient field.
//!
//! The `Compact` facade.
//!
//! This is the boundary surface of the crate: clients register challenges,
//! servers answer them, and everyone reads back immutable entries by index.
//! Each sequence sits behind its own lock so index assignment is serialized
//! per sequence while reads proceed concurrently against the latest
//! committed append.  A submission either fully commits (index assigned,
//! entry stored, audit record emitted) or fully fails with no index
//! consumed.

use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use crate::anchor::{EntryAnchor, LedgerAnchor};
use crate::audit::{
    challenge_digest, proof_digest, write_challenge_record, write_proof_record, write_text_series,
};
use crate::error::LedgerError;
use crate::ledger::{ProofLedger, ProofRecord};
use crate::policy::{Principal, SubmitterPolicy};
use crate::predicate::{ChallengeRef, Commitment, Response, VerificationPredicate};
use crate::registry::{Challenge, ChallengeRegistry};

struct AuditSink {
    dir: PathBuf,
    counter: usize,
    last_error: Option<String>,
}

/// Append-only challenge/proof verification ledger.
pub struct Compact {
    challenges: RwLock<ChallengeRegistry>,
    proofs: RwLock<ProofLedger>,
    predicate: Box<dyn VerificationPredicate>,
    policy: SubmitterPolicy,
    audit_sink: Mutex<Option<AuditSink>>,
}

impl Compact {
    /// Creates a ledger with the given predicate and an allow-all policy.
    pub fn new(predicate: Box<dyn VerificationPredicate>) -> Self {
        Self::with_policy(predicate, SubmitterPolicy::allow_all())
    }

    /// Creates a ledger gated by an explicit submitter policy.
    pub fn with_policy(
        predicate: Box<dyn VerificationPredicate>,
        policy: SubmitterPolicy,
    ) -> Self {
        Self {
            challenges: RwLock::new(ChallengeRegistry::new()),
            proofs: RwLock::new(ProofLedger::new()),
            predicate,
            policy,
            audit_sink: Mutex::new(None),
        }
    }

    /// Enables on-disk audit records and resets the series counter.
    pub fn enable_logging<P: Into<PathBuf>>(&self, log_dir: P) {
        let mut sink = self.audit_sink.lock().expect("audit sink lock poisoned");
        *sink = Some(AuditSink {
            dir: log_dir.into(),
            counter: 0,
            last_error: None,
        });
    }

    /// Returns the most recent audit persistence error, if any.
    ///
    /// Audit output never fails a committed submission; failures are
    /// retained here for the operator instead.
    pub fn audit_error(&self) -> Option<String> {
        self.audit_sink
            .lock()
            .expect("audit sink lock poisoned")
            .as_ref()
            .and_then(|sink| sink.last_error.clone())
    }

    /// Registers a client commitment and returns its assigned index.
    pub fn submit_challenge(
        &self,
        commitment: Commitment,
        submitter: Principal,
    ) -> Result<u64, LedgerError> {
        self.authorize(&submitter)?;
        let entry = {
            let mut registry = self
                .challenges
                .write()
                .expect("challenge registry lock poisoned");
            let index = registry.submit(commitment, submitter);
            registry.entries()[(index - 1) as usize].clone()
        };
        self.log_challenge(&entry);
        Ok(entry.index)
    }

    /// Verifies a server response against the referenced challenge and
    /// records the outcome.
    ///
    /// The referenced challenge is resolved and captured under the registry
    /// read guard, so a concurrent registration cannot change which
    /// commitment this proof is checked against.  A `false` verification is
    /// recorded, not rejected.
    pub fn submit_proof(
        &self,
        response: Response,
        reference: ChallengeRef,
        submitter: Principal,
    ) -> Result<u64, LedgerError> {
        self.authorize(&submitter)?;
        let challenge = {
            let registry = self
                .challenges
                .read()
                .expect("challenge registry lock poisoned");
            match reference {
                ChallengeRef::ByIndex(index) => registry.get(index)?.clone(),
                ChallengeRef::Latest => {
                    registry.latest().cloned().ok_or(LedgerError::NoChallenge)?
                }
            }
        };
        let valid = self.predicate.verify(&challenge.commitment, &response);
        let entry = {
            let mut ledger = self.proofs.write().expect("proof ledger lock poisoned");
            let index = ledger.submit(challenge.index, response, valid, submitter);
            ledger.entries()[(index - 1) as usize].clone()
        };
        self.log_proof(&entry);
        Ok(entry.index)
    }

    /// Returns the challenge stored at the 1-based index.
    pub fn get_challenge(&self, index: u64) -> Result<Challenge, LedgerError> {
        self.challenges
            .read()
            .expect("challenge registry lock poisoned")
            .get(index)
            .map(|entry| entry.clone())
    }

    /// Returns the number of registered challenges.
    pub fn challenges_len(&self) -> u64 {
        self.challenges
            .read()
            .expect("challenge registry lock poisoned")
            .len()
    }

    /// Returns the proof record stored at the 1-based index.
    pub fn get_proof(&self, index: u64) -> Result<ProofRecord, LedgerError> {
        self.proofs
            .read()
            .expect("proof ledger lock poisoned")
            .get(index)
            .map(|entry| entry.clone())
    }

    /// Returns the number of recorded proofs.
    pub fn proofs_len(&self) -> u64 {
        self.proofs.read().expect("proof ledger lock poisoned").len()
    }

    /// Returns the current anchor: digests of every entry in both sequences.
    pub fn anchor(&self) -> LedgerAnchor {
        let challenges = self
            .challenges
            .read()
            .expect("challenge registry lock poisoned");
        let proofs = self.proofs.read().expect("proof ledger lock poisoned");
        let mut entries = Vec::with_capacity(challenges.entries().len() + proofs.entries().len());
        for challenge in challenges.entries() {
            entries.push(EntryAnchor {
                entry: format!("challenge:{}", challenge.index),
                digest: hex::encode(challenge_digest(challenge)),
            });
        }
        for proof in proofs.entries() {
            entries.push(EntryAnchor {
                entry: format!("proof:{}", proof.index),
                digest: hex::encode(proof_digest(proof)),
            });
        }
        LedgerAnchor { entries }
    }

    fn authorize(&self, submitter: &Principal) -> Result<(), LedgerError> {
        if self.policy.permits(submitter) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(submitter.to_string()))
        }
    }

    fn log_challenge(&self, entry: &Challenge) {
        self.write_audit(|lines| {
            write_challenge_record(
                |line| {
                    lines.push(line.to_string());
                    Ok(())
                },
                entry,
            )
        });
    }

    fn log_proof(&self, entry: &ProofRecord) {
        self.write_audit(|lines| {
            write_proof_record(
                |line| {
                    lines.push(line.to_string());
                    Ok(())
                },
                entry,
            )
        });
    }

    fn write_audit<F>(&self, render: F)
    where
        F: FnOnce(&mut Vec<String>) -> std::io::Result<()>,
    {
        let mut guard = self.audit_sink.lock().expect("audit sink lock poisoned");
        let sink = match guard.as_mut() {
            Some(sink) => sink,
            None => return,
        };
        let mut lines = Vec::new();
        if let Err(err) = render(&mut lines) {
            sink.last_error = Some(err.to_string());
            return;
        }
        match write_text_series(&sink.dir, "ledger", sink.counter, &lines) {
            Ok(_) => sink.counter += 1,
            Err(err) => sink.last_error = Some(err.to_string()),
        }
    }
}
