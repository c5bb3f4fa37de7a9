//! Ethereum `personal_sign` verification for the admin wallet login.
//!
//! Signature recovery is done by hand on secp256k1 with arbitrary precision
//! integers; no elliptic curve library is involved at runtime.

pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod service;

pub use crypto::EthereumAddress;
pub use error::{AuthError, VerifyError};
pub use service::admin_auth::AdminWalletAuth;
pub use service::wallet_verification::WalletSignatureVerifier;

/// True when `signature` is a valid `personal_sign` of `message` by
/// `address`. Any malformed input yields false.
pub fn verify(address: &str, message: &str, signature: &str) -> bool {
    WalletSignatureVerifier::verify(address, message, signature)
}
