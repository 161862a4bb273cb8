//! The design philosophy underlying `compact_ledger` is austere, yet cryptographically strict.
//! Every value entering the ledger is validated once at the boundary, so the
//! append-only sequences never hold an operand outside the ambient field.
//!
//! Reference verification predicate over BN254.
//!
//! Two commitment shapes are supported:
//!
//! * **Point** `(x, y)`: the prover's public point `P`.  A response `(e, s)`
//!   verifies iff `P` is on the curve, both components are scalars, and
//!   `e == H(P || s·G − e·P)` for the domain-separated BLAKE2b-256 challenge
//!   hash, i.e. the Schnorr identity with the nonce point recomputed from
//!   the response.
//! * **Scalar** `c`: a response verifies iff it carries exactly the affine
//!   coordinates of `c·G`.
//!
//! The module also exposes the prescribed generation procedures
//! ([`keypair`], [`respond`], [`respond_to_scalar`]) that honest servers use
//! to derive accepting responses; completeness tests are built on them.

use ark_bn254::{Fr, G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ff::{PrimeField, UniformRand, Zero};
use ark_serialize::CanonicalSerialize;
use blake2::digest::{consts::U32, Digest};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::Sha256;

use crate::field::FieldElement;
use crate::predicate::{Commitment, Response, VerificationPredicate};

type Blake2b256 = blake2::Blake2b<U32>;

const CHALLENGE_DOMAIN: &[u8] = b"COMPACT_SCHNORR_CHALLENGE";
const NONCE_DOMAIN: &[u8] = b"COMPACT_SCHNORR_NONCE";
const KEY_DOMAIN: &[u8] = b"COMPACT_SCHNORR_KEY";

/// Schnorr-style verification predicate over the BN254 G1 group.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchnorrPredicate;

impl VerificationPredicate for SchnorrPredicate {
    fn verify(&self, commitment: &Commitment, response: &Response) -> bool {
        match commitment {
            Commitment::Point { x, y } => verify_point(x, y, response),
            Commitment::Scalar { value } => verify_scalar(value, response),
        }
    }

    fn name(&self) -> &'static str {
        "schnorr-bn254"
    }
}

fn verify_point(x: &FieldElement, y: &FieldElement, response: &Response) -> bool {
    let public = match decode_point(x, y) {
        Some(point) => point,
        None => return false,
    };
    let e = match scalar_from(&response.a) {
        Some(scalar) => scalar,
        None => return false,
    };
    let s = match scalar_from(&response.b) {
        Some(scalar) => scalar,
        None => return false,
    };
    let nonce_point = (G1Projective::generator() * s) - (public.into_group() * e);
    challenge_scalar(&public, &nonce_point.into_affine()) == e
}

fn verify_scalar(value: &FieldElement, response: &Response) -> bool {
    let scalar = match scalar_from(value) {
        Some(scalar) if !scalar.is_zero() => scalar,
        _ => return false,
    };
    let expected = (G1Projective::generator() * scalar).into_affine();
    expected.x == response.a.fq() && expected.y == response.b.fq()
}

/// Decodes affine coordinates into a G1 point, rejecting the identity and
/// anything off the curve.
fn decode_point(x: &FieldElement, y: &FieldElement) -> Option<G1Affine> {
    let point = G1Affine::new_unchecked(x.fq(), y.fq());
    if point.is_zero()
        || !point.is_on_curve()
        || !point.is_in_correct_subgroup_assuming_on_curve()
    {
        return None;
    }
    Some(point)
}

/// Reads a response component as a scalar, rejecting values at or above the
/// group order.
fn scalar_from(component: &FieldElement) -> Option<Fr> {
    Fr::from_bigint(component.to_bigint())
}

/// Derives the Fiat–Shamir challenge from the public and nonce points.
fn challenge_scalar(public: &G1Affine, nonce_point: &G1Affine) -> Fr {
    let mut hasher = Blake2b256::new();
    hasher.update(CHALLENGE_DOMAIN);
    hasher.update(point_bytes(public));
    hasher.update(point_bytes(nonce_point));
    Fr::from_le_bytes_mod_order(&hasher.finalize())
}

fn point_bytes(point: &G1Affine) -> Vec<u8> {
    let mut out = Vec::new();
    point.serialize_compressed(&mut out).expect("serialize point");
    out
}

fn scalar_bytes(scalar: &Fr) -> Vec<u8> {
    let mut out = Vec::new();
    scalar.serialize_compressed(&mut out).expect("serialize scalar");
    out
}

/// Lifts a scalar into the base field; always possible since `r < q`.
fn field_from_scalar(scalar: &Fr) -> FieldElement {
    FieldElement::from_bigint(scalar.into_bigint()).expect("scalar fits in base field")
}

/// Deterministically derives a secret scalar and its point commitment from a
/// seed.
pub fn keypair(seed: u64) -> (Fr, Commitment) {
    let mut hasher = Sha256::new();
    hasher.update(KEY_DOMAIN);
    hasher.update(seed.to_be_bytes());
    let seed_bytes: [u8; 32] = hasher.finalize().into();
    let mut rng = StdRng::from_seed(seed_bytes);
    let secret = Fr::rand(&mut rng);
    let public = (G1Projective::generator() * secret).into_affine();
    let commitment = Commitment::Point {
        x: FieldElement::from_fq(public.x),
        y: FieldElement::from_fq(public.y),
    };
    (secret, commitment)
}

/// Produces the accepting response for a point commitment derived from
/// `secret`.
///
/// The nonce is derived deterministically from the secret and the public
/// point, so repeated calls yield the same response.
pub fn respond(secret: &Fr) -> Response {
    let public = (G1Projective::generator() * *secret).into_affine();
    let nonce = derive_nonce(secret, &public);
    let nonce_point = (G1Projective::generator() * nonce).into_affine();
    let e = challenge_scalar(&public, &nonce_point);
    let s = nonce + e * *secret;
    Response {
        a: field_from_scalar(&e),
        b: field_from_scalar(&s),
    }
}

/// Produces the accepting response for a scalar commitment: the affine
/// coordinates of `value·G`.
///
/// Returns `None` when no accepting response exists (zero, or a value at or
/// above the group order).
pub fn respond_to_scalar(value: &FieldElement) -> Option<Response> {
    let scalar = match scalar_from(value) {
        Some(scalar) if !scalar.is_zero() => scalar,
        _ => return None,
    };
    let point = (G1Projective::generator() * scalar).into_affine();
    Some(Response {
        a: FieldElement::from_fq(point.x),
        b: FieldElement::from_fq(point.y),
    })
}

fn derive_nonce(secret: &Fr, public: &G1Affine) -> Fr {
    let mut hasher = Sha256::new();
    hasher.update(NONCE_DOMAIN);
    hasher.update(scalar_bytes(secret));
    hasher.update(point_bytes(public));
    let seed: [u8; 32] = hasher.finalize().into();
    Fr::rand(&mut StdRng::from_seed(seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::BigInt;
    use proptest::prelude::*;

    fn flip_bit(component: &FieldElement, bit: usize) -> Option<FieldElement> {
        let mut limbs = component.to_bigint().0;
        limbs[bit / 64] ^= 1u64 << (bit % 64);
        FieldElement::from_bigint(BigInt::new(limbs))
    }

    #[test]
    fn test_honest_point_response_verifies() {
        let (secret, commitment) = keypair(7);
        let response = respond(&secret);
        assert!(SchnorrPredicate.verify(&commitment, &response));
    }

    #[test]
    fn test_verify_is_deterministic() {
        let (secret, commitment) = keypair(11);
        let response = respond(&secret);
        let first = SchnorrPredicate.verify(&commitment, &response);
        let second = SchnorrPredicate.verify(&commitment, &response);
        assert_eq!(first, second);
    }

    #[test]
    fn test_honest_scalar_response_verifies() {
        let value = FieldElement::from_u64(418);
        let commitment = Commitment::Scalar { value };
        let response = respond_to_scalar(&value).unwrap();
        assert!(SchnorrPredicate.verify(&commitment, &response));
    }

    #[test]
    fn test_wrong_scalar_response_fails() {
        let commitment = Commitment::Scalar {
            value: FieldElement::from_u64(418),
        };
        let response = respond_to_scalar(&FieldElement::from_u64(419)).unwrap();
        assert!(!SchnorrPredicate.verify(&commitment, &response));
    }

    #[test]
    fn test_zero_scalar_commitment_never_verifies() {
        let zero = FieldElement::from_u64(0);
        assert!(respond_to_scalar(&zero).is_none());
        let commitment = Commitment::Scalar { value: zero };
        let response = respond_to_scalar(&FieldElement::from_u64(1)).unwrap();
        assert!(!SchnorrPredicate.verify(&commitment, &response));
    }

    #[test]
    fn test_off_curve_commitment_is_rejected_without_panic() {
        let commitment = Commitment::Point {
            x: FieldElement::from_u64(103464),
            y: FieldElement::from_u64(92926),
        };
        let response = Response {
            a: FieldElement::from_u64(1),
            b: FieldElement::from_u64(2),
        };
        assert!(!SchnorrPredicate.verify(&commitment, &response));
    }

    #[test]
    fn test_bit_flips_break_point_responses() {
        let (secret, commitment) = keypair(42);
        let response = respond(&secret);
        assert!(SchnorrPredicate.verify(&commitment, &response));
        for bit in 0..254 {
            if let Some(tampered) = flip_bit(&response.a, bit) {
                let flipped = Response {
                    a: tampered,
                    b: response.b,
                };
                assert!(
                    !SchnorrPredicate.verify(&commitment, &flipped),
                    "flipping bit {bit} of a still verified"
                );
            }
            if let Some(tampered) = flip_bit(&response.b, bit) {
                let flipped = Response {
                    a: response.a,
                    b: tampered,
                };
                assert!(
                    !SchnorrPredicate.verify(&commitment, &flipped),
                    "flipping bit {bit} of b still verified"
                );
            }
        }
    }

    #[test]
    fn test_bit_flips_break_scalar_responses() {
        let value = FieldElement::from_u64(418);
        let commitment = Commitment::Scalar { value };
        let response = respond_to_scalar(&value).unwrap();
        for bit in 0..254 {
            if let Some(tampered) = flip_bit(&response.a, bit) {
                let flipped = Response {
                    a: tampered,
                    b: response.b,
                };
                assert!(!SchnorrPredicate.verify(&commitment, &flipped));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_honest_responses_verify(seed in any::<u64>()) {
            let (secret, commitment) = keypair(seed);
            let response = respond(&secret);
            prop_assert!(SchnorrPredicate.verify(&commitment, &response));
        }

        #[test]
        fn prop_random_responses_fail(seed in any::<u64>(), a in any::<u64>(), b in any::<u64>()) {
            let (_, commitment) = keypair(seed);
            let response = Response {
                a: FieldElement::from_u64(a),
                b: FieldElement::from_u64(b),
            };
            prop_assert!(!SchnorrPredicate.verify(&commitment, &response));
        }
    }
}
