//! Ledger anchors and replica reconciliation.
//!
//! An anchor is the ordered list of entry digests for both append-only
//! sequences.  Because entries are immutable and digests are deterministic,
//! two replicas that processed the same submissions produce byte-identical
//! anchors; [`reconcile_anchors`] enforces this and
//! [`reconcile_anchors_with_quorum`] relaxes it to a quorum of agreeing
//! replicas.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Digest of a single ledger entry, labelled by sequence and index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryAnchor {
    /// Entry label, e.g. `challenge:3` or `proof:1`.
    pub entry: String,
    /// Hex-encoded BLAKE2b-256 digest of the audit record.
    pub digest: String,
}

/// Anchor aggregation for an entire ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerAnchor {
    /// Ordered entry anchors: all challenges, then all proofs.
    pub entries: Vec<EntryAnchor>,
}

/// Ensures that a collection of ledger anchors agree on every entry digest.
pub fn reconcile_anchors(anchors: &[LedgerAnchor]) -> Result<(), String> {
    if anchors.is_empty() {
        return Ok(());
    }
    let reference = &anchors[0];
    for (idx, anchor) in anchors.iter().enumerate().skip(1) {
        if anchor.entries.len() != reference.entries.len() {
            return Err(format!(
                "anchor {} entry count {} mismatch reference {}",
                idx,
                anchor.entries.len(),
                reference.entries.len()
            ));
        }
        for (entry_idx, (left, right)) in reference.entries.iter().zip(&anchor.entries).enumerate()
        {
            if left.entry != right.entry {
                return Err(format!("anchor {} entry {} label mismatch", idx, entry_idx));
            }
            if left.digest != right.digest {
                return Err(format!(
                    "anchor {} entry {} digest mismatch",
                    idx, entry_idx
                ));
            }
        }
    }
    Ok(())
}

/// Ensures that at least `quorum` anchors agree on every entry digest.
pub fn reconcile_anchors_with_quorum(
    anchors: &[LedgerAnchor],
    quorum: usize,
) -> Result<(), String> {
    if anchors.is_empty() {
        return Ok(());
    }
    if quorum == 0 || quorum > anchors.len() {
        return Err("invalid quorum".to_string());
    }
    let mut counts: HashMap<&LedgerAnchor, usize> = HashMap::new();
    for anchor in anchors {
        *counts.entry(anchor).or_insert(0) += 1;
    }
    if let Some((winner, count)) = counts.into_iter().max_by_key(|(_, c)| *c) {
        if count >= quorum {
            let matching: Vec<LedgerAnchor> =
                anchors.iter().filter(|a| *a == winner).cloned().collect();
            return reconcile_anchors(&matching);
        }
    }
    Err("no anchor reached required quorum".to_string())
}
