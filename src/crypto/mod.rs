// crypto/mod.rs
pub mod address;
pub mod curve;
pub mod field;
pub mod keccak;
pub mod recovery;
pub mod signature;

pub use address::EthereumAddress;
pub use signature::RecoverableSignature;

/// Prefix wallets prepend in `personal_sign` (EIP-191 version 0x45).
pub const EIP191_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// keccak256("\x19Ethereum Signed Message:\n" + byte length + message).
///
/// The length is the decimal byte count, not the character count, which
/// matters for non-ASCII messages.
pub fn eip191_hash(message: &[u8]) -> [u8; 32] {
    let mut hasher = keccak::Keccak256::new();
    hasher.update(EIP191_PREFIX);
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize()
}
