//! Caller identity and the submission access policy.
//!
//! The core does not authenticate anyone; the host environment supplies the
//! caller identity and the ledger merely records it.  An optional allowlist
//! gates who may append at all.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::LedgerError;

/// Opaque identity of a submitting caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Wraps a host-supplied identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Principal(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Principal::new(id)
    }
}

/// Governs which principals are permitted to submit challenges and proofs.
#[derive(Debug, Clone)]
pub struct SubmitterPolicy {
    allow_all: bool,
    allowed: HashSet<Principal>,
}

impl SubmitterPolicy {
    /// Returns a policy that accepts every principal.
    pub fn allow_all() -> Self {
        Self {
            allow_all: true,
            allowed: HashSet::new(),
        }
    }

    /// Builds a policy from an explicit set of permitted principals.
    pub fn allowlist<I: IntoIterator<Item = Principal>>(principals: I) -> Self {
        Self {
            allow_all: false,
            allowed: principals.into_iter().collect(),
        }
    }

    /// Loads a policy from a JSON allowlist file.
    ///
    /// The expected format is:
    ///
    /// ```json
    /// { "allowed": ["<principal-id>", "..."] }
    /// ```
    pub fn from_allowlist_path(path: &Path) -> Result<Self, LedgerError> {
        let contents =
            fs::read_to_string(path).map_err(|err| LedgerError::Policy(err.to_string()))?;
        let parsed: AllowListFile =
            serde_json::from_str(&contents).map_err(|err| LedgerError::Policy(err.to_string()))?;
        Ok(Self::allowlist(
            parsed.allowed.into_iter().map(Principal::new),
        ))
    }

    /// Returns true if the principal is permitted by this policy.
    pub fn permits(&self, principal: &Principal) -> bool {
        self.allow_all || self.allowed.contains(principal)
    }
}

impl Default for SubmitterPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AllowListFile {
    allowed: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn allow_all_accepts_everything() {
        let policy = SubmitterPolicy::allow_all();
        assert!(policy.permits(&Principal::from("anyone")));
    }

    #[test]
    fn allowlist_accepts_only_listed_principals() {
        let policy = SubmitterPolicy::allowlist([Principal::from("client")]);
        assert!(policy.permits(&Principal::from("client")));
        assert!(!policy.permits(&Principal::from("server")));
    }

    #[test]
    fn allowlist_file_accepts_only_listed_principals() {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!("submitters_{nanos}.json"));
        fs::write(&path, "{\"allowed\":[\"client\",\"server\"]}").unwrap();
        let policy = SubmitterPolicy::from_allowlist_path(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(policy.permits(&Principal::from("client")));
        assert!(!policy.permits(&Principal::from("stranger")));
    }
}
