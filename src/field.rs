//! The design philosophy underlying `compact_ledger` is austere, yet cryptographically strict.
//! Every value entering the ledger is validated once at the boundary, so the
//! append-only sequences never hold an operand outside the ambient field.
//!
//! Finite field elements.
//!
//! This module provides the [`FieldElement`] type: a 256-bit integer
//! validated into `[0, q)` where `q` is the BN254 base-field modulus.  The
//! constructors are the only place range checking happens; once a value is a
//! `FieldElement` it is in range by construction and every later read
//! returns it unchanged.

use ark_bn254::Fq;
use ark_ff::{BigInt, BigInteger, PrimeField};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::LedgerError;

/// Number of 64-bit limbs in a field element representation.
const LIMBS: usize = 4;

/// An element of the BN254 base field, guaranteed to lie in `[0, q)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(Fq);

impl FieldElement {
    /// Builds a field element from a small integer.
    pub fn from_u64(value: u64) -> Self {
        FieldElement(Fq::from(value))
    }

    /// Parses a decimal string, rejecting values at or above the modulus.
    pub fn from_decimal(text: &str) -> Result<Self, LedgerError> {
        let limbs = parse_decimal_limbs(text)
            .ok_or_else(|| LedgerError::InvalidFieldElement(text.to_string()))?;
        Self::from_bigint(BigInt::new(limbs))
            .ok_or_else(|| LedgerError::InvalidFieldElement(text.to_string()))
    }

    /// Interprets 32 big-endian bytes as an integer, rejecting out-of-range values.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Result<Self, LedgerError> {
        let mut limbs = [0u64; LIMBS];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[32 - 8 * (i + 1)..32 - 8 * i]);
            *limb = u64::from_be_bytes(chunk);
        }
        Self::from_bigint(BigInt::new(limbs))
            .ok_or_else(|| LedgerError::InvalidFieldElement(hex::encode(bytes)))
    }

    /// Returns the canonical 32-byte big-endian encoding.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        out
    }

    /// Returns the canonical decimal representation.
    pub fn to_decimal(&self) -> String {
        decimal_from_limbs(self.0.into_bigint().0)
    }

    pub(crate) fn from_bigint(value: BigInt<LIMBS>) -> Option<Self> {
        Fq::from_bigint(value).map(FieldElement)
    }

    pub(crate) fn from_fq(value: Fq) -> Self {
        FieldElement(value)
    }

    pub(crate) fn fq(&self) -> Fq {
        self.0
    }

    pub(crate) fn to_bigint(&self) -> BigInt<LIMBS> {
        self.0.into_bigint()
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        FieldElement::from_u64(value)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_decimal())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        FieldElement::from_decimal(&text).map_err(D::Error::custom)
    }
}

/// Parses an ASCII decimal string into little-endian limbs.
///
/// Returns `None` for empty input, non-digit characters, or values that do
/// not fit in 256 bits.
fn parse_decimal_limbs(text: &str) -> Option<[u64; LIMBS]> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut limbs = [0u64; LIMBS];
    for digit in text.bytes() {
        let mut carry = (digit - b'0') as u128;
        for limb in limbs.iter_mut() {
            let wide = (*limb as u128) * 10 + carry;
            *limb = wide as u64;
            carry = wide >> 64;
        }
        if carry != 0 {
            return None;
        }
    }
    Some(limbs)
}

/// Renders little-endian limbs as a decimal string.
fn decimal_from_limbs(mut limbs: [u64; LIMBS]) -> String {
    if limbs == [0u64; LIMBS] {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while limbs != [0u64; LIMBS] {
        let mut rem = 0u64;
        for limb in limbs.iter_mut().rev() {
            let wide = ((rem as u128) << 64) | *limb as u128;
            *limb = (wide / 10) as u64;
            rem = (wide % 10) as u64;
        }
        digits.push((b'0' + rem as u8) as char);
    }
    digits.iter().rev().collect()
}
