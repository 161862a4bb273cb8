//! Deterministic audit records for ledger entries.
//!
//! Every accepted submission can be rendered as a newline-delimited,
//! ASCII-only record closed by a domain-separated BLAKE2b-256 digest.  The
//! records are stable: re-rendering an entry always produces the same bytes,
//! so an auditor can re-verify a log file against a live ledger without any
//! side information.

use blake2::digest::{consts::U32, Digest};
use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::LedgerError;
use crate::field::FieldElement;
use crate::ledger::ProofRecord;
use crate::policy::Principal;
use crate::predicate::{Commitment, Response};
use crate::registry::Challenge;

type Blake2b256 = blake2::Blake2b<U32>;

const AUDIT_DOMAIN: &[u8] = b"COMPACT_AUDIT";

/// 32-byte digest of a single audit record.
pub type EntryDigest = [u8; 32];

/// A parsed audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditRecord {
    /// A registered challenge.
    Challenge(Challenge),
    /// A recorded proof.
    Proof(ProofRecord),
}

/// Computes the deterministic digest of a challenge entry.
pub fn challenge_digest(challenge: &Challenge) -> EntryDigest {
    let mut hasher = Blake2b256::new();
    hasher.update(AUDIT_DOMAIN);
    hasher.update([0u8]); // challenge marker
    hasher.update(challenge.index.to_be_bytes());
    absorb_principal(&mut hasher, &challenge.submitter);
    match &challenge.commitment {
        Commitment::Point { x, y } => {
            hasher.update([0u8]);
            hasher.update(x.to_be_bytes());
            hasher.update(y.to_be_bytes());
        }
        Commitment::Scalar { value } => {
            hasher.update([1u8]);
            hasher.update(value.to_be_bytes());
        }
    }
    finish(hasher)
}

/// Computes the deterministic digest of a proof entry.
pub fn proof_digest(record: &ProofRecord) -> EntryDigest {
    let mut hasher = Blake2b256::new();
    hasher.update(AUDIT_DOMAIN);
    hasher.update([1u8]); // proof marker
    hasher.update(record.index.to_be_bytes());
    hasher.update(record.challenge_index.to_be_bytes());
    absorb_principal(&mut hasher, &record.submitter);
    hasher.update(record.response.a.to_be_bytes());
    hasher.update(record.response.b.to_be_bytes());
    hasher.update([record.valid as u8]);
    finish(hasher)
}

fn absorb_principal(hasher: &mut Blake2b256, principal: &Principal) {
    let bytes = principal.as_str().as_bytes();
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

fn finish(hasher: Blake2b256) -> EntryDigest {
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Writes a challenge record using the provided writer function.
pub fn write_challenge_record<W>(mut write_line: W, challenge: &Challenge) -> io::Result<()>
where
    W: FnMut(&str) -> io::Result<()>,
{
    write_line("kind:challenge")?;
    write_line(&format!("index:{}", challenge.index))?;
    write_line(&format!("submitter:{}", challenge.submitter))?;
    match &challenge.commitment {
        Commitment::Point { x, y } => write_line(&format!("commitment:point {x} {y}"))?,
        Commitment::Scalar { value } => write_line(&format!("commitment:scalar {value}"))?,
    }
    write_line(&format!("hash:{}", hex::encode(challenge_digest(challenge))))
}

/// Writes a proof record using the provided writer function.
pub fn write_proof_record<W>(mut write_line: W, record: &ProofRecord) -> io::Result<()>
where
    W: FnMut(&str) -> io::Result<()>,
{
    write_line("kind:proof")?;
    write_line(&format!("index:{}", record.index))?;
    write_line(&format!("submitter:{}", record.submitter))?;
    write_line(&format!("challenge:{}", record.challenge_index))?;
    write_line(&format!(
        "response:{} {}",
        record.response.a, record.response.b
    ))?;
    write_line(&format!("valid:{}", record.valid))?;
    write_line(&format!("hash:{}", hex::encode(proof_digest(record))))
}

fn tail<'a>(line: &'a str, prefix: &str) -> Result<&'a str, LedgerError> {
    line.strip_prefix(prefix)
        .ok_or_else(|| LedgerError::Audit(format!("missing {prefix} prefix")))
}

fn parse_index(line: &str, prefix: &str) -> Result<u64, LedgerError> {
    tail(line, prefix)?
        .trim()
        .parse::<u64>()
        .map_err(|_| LedgerError::Audit(format!("invalid integer in {prefix}")))
}

fn parse_element(token: &str) -> Result<FieldElement, LedgerError> {
    FieldElement::from_decimal(token)
        .map_err(|_| LedgerError::Audit(format!("invalid field element {token}")))
}

fn parse_commitment(line: &str) -> Result<Commitment, LedgerError> {
    let body = tail(line, "commitment:")?.trim();
    let mut tokens = body.split_whitespace();
    match tokens.next() {
        Some("point") => {
            let x = parse_element(
                tokens
                    .next()
                    .ok_or_else(|| LedgerError::Audit("missing point x".to_string()))?,
            )?;
            let y = parse_element(
                tokens
                    .next()
                    .ok_or_else(|| LedgerError::Audit("missing point y".to_string()))?,
            )?;
            Ok(Commitment::Point { x, y })
        }
        Some("scalar") => {
            let value = parse_element(
                tokens
                    .next()
                    .ok_or_else(|| LedgerError::Audit("missing scalar value".to_string()))?,
            )?;
            Ok(Commitment::Scalar { value })
        }
        _ => Err(LedgerError::Audit("unknown commitment shape".to_string())),
    }
}

fn parse_digest(line: &str) -> Result<EntryDigest, LedgerError> {
    let text = tail(line, "hash:")?.trim();
    let bytes = hex::decode(text).map_err(|err| LedgerError::Audit(err.to_string()))?;
    if bytes.len() != 32 {
        return Err(LedgerError::Audit("digest must be 32 bytes".to_string()));
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Parses an audit record and returns it with its stored digest.
pub fn parse_record<'a, I>(lines: I) -> Result<(AuditRecord, EntryDigest), LedgerError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut iter = lines.into_iter();
    let mut next_line = |label: &str| {
        iter.next()
            .ok_or_else(|| LedgerError::Audit(format!("missing {label} line")))
    };
    let kind = tail(next_line("kind")?, "kind:")?.trim().to_string();
    match kind.as_str() {
        "challenge" => {
            let index = parse_index(next_line("index")?, "index:")?;
            let submitter = Principal::new(tail(next_line("submitter")?, "submitter:")?);
            let commitment = parse_commitment(next_line("commitment")?)?;
            let stored = parse_digest(next_line("hash")?)?;
            Ok((
                AuditRecord::Challenge(Challenge {
                    index,
                    commitment,
                    submitter,
                }),
                stored,
            ))
        }
        "proof" => {
            let index = parse_index(next_line("index")?, "index:")?;
            let submitter = Principal::new(tail(next_line("submitter")?, "submitter:")?);
            let challenge_index = parse_index(next_line("challenge")?, "challenge:")?;
            let body = tail(next_line("response")?, "response:")?.trim();
            let mut tokens = body.split_whitespace();
            let a = parse_element(
                tokens
                    .next()
                    .ok_or_else(|| LedgerError::Audit("missing response a".to_string()))?,
            )?;
            let b = parse_element(
                tokens
                    .next()
                    .ok_or_else(|| LedgerError::Audit("missing response b".to_string()))?,
            )?;
            let valid = match tail(next_line("valid")?, "valid:")?.trim() {
                "true" => true,
                "false" => false,
                other => {
                    return Err(LedgerError::Audit(format!("invalid valid flag {other}")));
                }
            };
            let stored = parse_digest(next_line("hash")?)?;
            Ok((
                AuditRecord::Proof(ProofRecord {
                    index,
                    challenge_index,
                    response: Response { a, b },
                    valid,
                    submitter,
                }),
                stored,
            ))
        }
        other => Err(LedgerError::Audit(format!("unknown record kind {other}"))),
    }
}

/// Verifies that an audit record matches its stored digest.
pub fn verify_record_lines<'a, I>(lines: I) -> Result<(), LedgerError>
where
    I: IntoIterator<Item = &'a str>,
{
    let (record, stored) = parse_record(lines)?;
    let computed = match &record {
        AuditRecord::Challenge(challenge) => challenge_digest(challenge),
        AuditRecord::Proof(proof) => proof_digest(proof),
    };
    if computed == stored {
        Ok(())
    } else {
        Err(LedgerError::Audit("digest mismatch".to_string()))
    }
}

/// Writes a text file to `base_dir/prefix_index.txt` using the provided lines.
pub fn write_text_series(
    base_dir: impl AsRef<Path>,
    prefix: &str,
    index: usize,
    lines: &[String],
) -> io::Result<PathBuf> {
    let dir = base_dir.as_ref();
    create_dir_all(dir)?;
    let filename = format!("{}_{:04}.txt", prefix, index);
    let path = dir.join(filename);
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(path)
}
