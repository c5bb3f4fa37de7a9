pub mod admin_auth;
pub mod rate_limit;
pub mod wallet_verification;
