// models/walletmodels.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct WalletVerificationRequest {
    #[validate(length(min = 1, max = 132, message = "Signature must be between 1 and 132 characters"))]
    pub signature: String,

    #[validate(length(min = 1, max = 1024, message = "Message must be between 1 and 1024 characters"))]
    pub message: String,

    #[validate(length(min = 1, max = 42, message = "Wallet address must be between 1 and 42 characters"))]
    pub wallet_address: String,
}

/// One line of the binary's input: a login request plus an optional
/// identifier of the caller that throttling is scoped to.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(flatten)]
    pub request: WalletVerificationRequest,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginData {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AdminLoginData>,
}

impl AdminLoginResponse {
    pub fn success(address: String) -> Self {
        AdminLoginResponse {
            status: "success".to_string(),
            message: None,
            data: Some(AdminLoginData { address }),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        AdminLoginResponse {
            status: "fail".to_string(),
            message: Some(message.into()),
            data: None,
        }
    }
}
