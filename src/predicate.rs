//! Commitment, response and the verification predicate seam.
//!
//! The ledger never interprets operands itself; it hands the stored
//! [`Commitment`] and the submitted [`Response`] to a
//! [`VerificationPredicate`] and records the boolean that comes back.  The
//! predicate is the pluggable cryptographic core: implementations must be
//! total and deterministic so that replaying a submission can never change
//! history.

use serde::{Deserialize, Serialize};

use crate::field::FieldElement;

/// A client-submitted commitment.
///
/// The protocol evolved through two shapes: a curve point given by two
/// affine coordinates, and a single scalar.  Both are carried verbatim; the
/// predicate decides what relation they participate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Commitment {
    /// A point commitment with affine coordinates `(x, y)`.
    Point {
        /// Affine x coordinate.
        x: FieldElement,
        /// Affine y coordinate.
        y: FieldElement,
    },
    /// A scalar commitment.
    Scalar {
        /// The committed scalar.
        value: FieldElement,
    },
}

/// A server-submitted response: two field elements whose semantics are
/// fixed by the active predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// First response component.
    pub a: FieldElement,
    /// Second response component.
    pub b: FieldElement,
}

/// How a proof submission names the challenge it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeRef {
    /// An explicit challenge index.
    ByIndex(u64),
    /// The most recently registered challenge.
    Latest,
}

/// The pure boolean relation between a stored commitment and a submitted
/// response.
///
/// Implementations must be **total** (never panic on in-range field
/// elements) and **deterministic** (no randomness, no external state).  A
/// `false` result is a recorded outcome, not an error.
pub trait VerificationPredicate: Send + Sync {
    /// Evaluates the relation.
    fn verify(&self, commitment: &Commitment, response: &Response) -> bool;

    /// Human-friendly label used in audit records.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::{Commitment, Response};
    use crate::field::FieldElement;

    #[test]
    fn test_commitment_serde_is_tagged() {
        let point = Commitment::Point {
            x: FieldElement::from_u64(467),
            y: FieldElement::from_u64(491),
        };
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, "{\"kind\":\"point\",\"x\":\"467\",\"y\":\"491\"}");
        let back: Commitment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, point);

        let scalar = Commitment::Scalar {
            value: FieldElement::from_u64(418),
        };
        let json = serde_json::to_string(&scalar).unwrap();
        assert_eq!(json, "{\"kind\":\"scalar\",\"value\":\"418\"}");
    }

    #[test]
    fn test_response_round_trip() {
        let response = Response {
            a: FieldElement::from_decimal(
                "19008947739600984228044157580001253402267228866197661222896813637769210210538",
            )
            .unwrap(),
            b: FieldElement::from_decimal(
                "12063506687536463007474726253078490541120193933064005433064625988901485573508",
            )
            .unwrap(),
        };
        let json = serde_json::to_string(&response).unwrap();
        let back: Response = serde_json::from_str(&json).unwrap();
        assert_eq!(back, response);
    }
}
