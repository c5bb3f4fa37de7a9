// crypto/recovery.rs
//! ECDSA public-key recovery on secp256k1.

use num_bigint::BigUint;
use num_traits::Zero;

use super::curve::{decompress, multi_scalar_multiply, AffinePoint, CurvePoint, CURVE_N, CURVE_P};
use super::signature::RecoverableSignature;
use crate::error::VerifyError;

/// Recovers the public key Q = r⁻¹ · (s·R − e·G) for the signature over
/// `message_hash`.
///
/// r⁻¹ is folded into both scalars, so Q = (−e·r⁻¹)·G + (s·r⁻¹)·R is one
/// Strauss-Shamir pass plus a single inversion back to affine form.
pub fn recover_public_key(
    signature: &RecoverableSignature,
    message_hash: &[u8; 32],
) -> Result<AffinePoint, VerifyError> {
    let order = &*CURVE_N;
    let RecoverableSignature { r, s, recovery_id } = signature;

    if *recovery_id > 3 {
        return Err(VerifyError::InvalidRecoveryId(*recovery_id));
    }
    if r.is_zero() || !order.contains(r) || s.is_zero() || !order.contains(s) {
        return Err(VerifyError::ScalarOutOfRange);
    }

    // ids 2 and 3 mean R.x was >= n and got reduced when r was formed
    let mut x = r.clone();
    if signature.is_x_reduced() {
        x += order.modulus();
    }
    if !CURVE_P.contains(&x) {
        return Err(VerifyError::CandidateOutOfField);
    }

    let big_r = decompress(&x, signature.y_is_odd()).ok_or(VerifyError::NotOnCurve)?;
    let r_inv = order.inverse(r).ok_or(VerifyError::NoInverse)?;

    let e = BigUint::from_bytes_be(message_hash);
    let u1 = order.mul(&order.neg(&e), &r_inv);
    let u2 = order.mul(s, &r_inv);

    match multi_scalar_multiply(&u1, &CurvePoint::generator(), &u2, &CurvePoint::Affine(big_r)) {
        CurvePoint::Affine(q) => Ok(q),
        CurvePoint::Infinity => Err(VerifyError::PointAtInfinity),
    }
}
