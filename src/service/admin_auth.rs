// service/admin_auth.rs
use std::collections::HashSet;
use std::time::Duration;

use validator::Validate;

use crate::{
    config::Config,
    crypto::EthereumAddress,
    error::AuthError,
    models::walletmodels::WalletVerificationRequest,
    service::{rate_limit::RateLimiter, wallet_verification::WalletSignatureVerifier},
};

/// Gate for the admin panel: a wallet may log in when it signs the issued
/// nonce and is on the configured allowlist.
#[derive(Debug)]
pub struct AdminWalletAuth {
    admin_wallets: HashSet<EthereumAddress>,
    limiter: RateLimiter,
}

impl AdminWalletAuth {
    pub fn new(config: &Config) -> Self {
        if config.admin_wallets.is_empty() {
            tracing::warn!("AdminWalletAuth: no admin wallets configured, every login will be rejected");
        }
        Self {
            admin_wallets: config.admin_wallets.iter().copied().collect(),
            limiter: RateLimiter::new(
                config.max_login_attempts,
                Duration::from_secs(config.login_window_secs),
            ),
        }
    }

    pub fn is_admin(&self, address: &EthereumAddress) -> bool {
        self.admin_wallets.contains(address)
    }

    pub fn authenticate(
        &self,
        request: &WalletVerificationRequest,
    ) -> Result<EthereumAddress, AuthError> {
        self.authenticate_from(None, request)
    }

    /// Same as [`authenticate`](Self::authenticate), with attempts counted
    /// per `(client, wallet)` pair. The outer layer passes whatever
    /// identifies the caller (IP address, session id). Without a client,
    /// attempts are counted per wallet alone, so repeated junk signatures for
    /// an admin address lock that admin out until the window passes.
    pub fn authenticate_from(
        &self,
        client: Option<&str>,
        request: &WalletVerificationRequest,
    ) -> Result<EthereumAddress, AuthError> {
        request.validate()?;

        let claimed: EthereumAddress = request.wallet_address.parse().map_err(|_| {
            tracing::debug!("AdminWalletAuth: malformed wallet address in login request");
            AuthError::Unauthorized
        })?;

        let limiter_key = match client {
            Some(client) => format!("client:{}:{}", client, claimed),
            None => format!("wallet:{}", claimed),
        };
        if !self.limiter.is_allowed(&limiter_key) {
            tracing::warn!("AdminWalletAuth: too many login attempts for {}", limiter_key);
            return Err(AuthError::TooManyAttempts);
        }

        let address = WalletSignatureVerifier::verify_detailed(
            &request.wallet_address,
            &request.message,
            &request.signature,
        )
        .map_err(|e| {
            tracing::debug!("AdminWalletAuth: signature rejected for {}: {}", claimed, e);
            AuthError::Unauthorized
        })?;

        if !self.is_admin(&address) {
            tracing::warn!("AdminWalletAuth: {} signed correctly but is not an admin wallet", address);
            return Err(AuthError::Unauthorized);
        }

        self.limiter.reset(&limiter_key);
        tracing::info!("AdminWalletAuth: admin {} authenticated", address);
        Ok(address)
    }

    /// Keys the limiter is holding attempts for.
    pub fn throttled_keys(&self) -> usize {
        self.limiter.tracked_keys()
    }
}
