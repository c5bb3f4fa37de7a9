// crypto/signature.rs
use std::str::FromStr;

use num_bigint::BigUint;

use crate::error::VerifyError;

/// Hex length of `r ‖ s ‖ v`.
pub const SIGNATURE_HEX_LEN: usize = 130;

/// 65-byte `r ‖ s ‖ v` signature as produced by `personal_sign`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: BigUint,
    pub s: BigUint,
    /// Normalised to 0..=3.
    pub recovery_id: u8,
}

impl RecoverableSignature {
    /// Accepts raw ids 0-3 and Ethereum-style 27-30.
    pub fn normalize_recovery_id(v: u8) -> Result<u8, VerifyError> {
        match v {
            0..=3 => Ok(v),
            27..=30 => Ok(v - 27),
            other => Err(VerifyError::InvalidRecoveryId(other)),
        }
    }

    /// Whether R's x-coordinate was reduced modulo n (ids 2 and 3).
    pub fn is_x_reduced(&self) -> bool {
        self.recovery_id >= 2
    }

    pub fn y_is_odd(&self) -> bool {
        self.recovery_id & 1 == 1
    }
}

impl FromStr for RecoverableSignature {
    type Err = VerifyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.to_ascii_lowercase();
        let digits = lowered.strip_prefix("0x").unwrap_or(&lowered);
        if digits.len() != SIGNATURE_HEX_LEN {
            return Err(VerifyError::MalformedSignature);
        }

        let mut bytes = [0u8; SIGNATURE_HEX_LEN / 2];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| VerifyError::MalformedSignature)?;

        Ok(RecoverableSignature {
            r: BigUint::from_bytes_be(&bytes[..32]),
            s: BigUint::from_bytes_be(&bytes[32..64]),
            recovery_id: Self::normalize_recovery_id(bytes[64])?,
        })
    }
}
