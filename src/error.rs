// error.rs
use thiserror::Error;

/// Why a signature failed to verify. Only ever logged; callers of
/// `verify` see a plain `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Address is not a 0x-prefixed 40 hex digit string")]
    MalformedAddress,

    #[error("Signature must be 130 hex characters (r, s, v)")]
    MalformedSignature,

    #[error("Invalid recovery id {0}")]
    InvalidRecoveryId(u8),

    #[error("Signature scalar out of range")]
    ScalarOutOfRange,

    #[error("Candidate x-coordinate exceeds the field prime")]
    CandidateOutOfField,

    #[error("Point is not on the curve")]
    NotOnCurve,

    #[error("Value has no modular inverse")]
    NoInverse,

    #[error("Recovered point at infinity")]
    PointAtInfinity,

    #[error("Recovered address {recovered} does not match {claimed}")]
    AddressMismatch { recovered: String, claimed: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Too many login attempts, try again later")]
    TooManyAttempts,

    #[error("Invalid wallet credentials")]
    Unauthorized,
}

impl AuthError {
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 400,
            AuthError::Unauthorized => 401,
            AuthError::TooManyAttempts => 429,
        }
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::Validation(errors.to_string())
    }
}
