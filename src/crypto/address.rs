// crypto/address.rs
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::curve::AffinePoint;
use super::keccak::keccak256;
use crate::error::VerifyError;

pub const ADDRESS_BYTES: usize = 20;

static ADDRESS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-f]{40}$").expect("address pattern compiles"));

/// 20-byte Ethereum account address. Equality is byte equality, so two
/// textual forms differing only in letter case compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EthereumAddress([u8; ADDRESS_BYTES]);

impl EthereumAddress {
    pub fn from_bytes(bytes: [u8; ADDRESS_BYTES]) -> Self {
        EthereumAddress(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// Last 20 bytes of keccak256(x ‖ y).
    pub fn from_public_key(public_key: &AffinePoint) -> Self {
        let hash = keccak256(&public_key.to_uncompressed_xy());
        let mut address = [0u8; ADDRESS_BYTES];
        address.copy_from_slice(&hash[32 - ADDRESS_BYTES..]);
        EthereumAddress(address)
    }

    /// Lowercase, `0x`-prefixed.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for EthereumAddress {
    type Err = VerifyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.to_ascii_lowercase();
        if !ADDRESS_PATTERN.is_match(&lowered) {
            return Err(VerifyError::MalformedAddress);
        }

        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(&lowered[2..], &mut bytes)
            .map_err(|_| VerifyError::MalformedAddress)?;
        Ok(EthereumAddress(bytes))
    }
}

impl fmt::Display for EthereumAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
