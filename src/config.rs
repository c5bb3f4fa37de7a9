// config.rs
use crate::crypto::EthereumAddress;

#[derive(Debug, Clone)]
pub struct Config {
    pub admin_wallets: Vec<EthereumAddress>,
    pub max_login_attempts: usize,
    pub login_window_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            admin_wallets: Vec::new(),
            max_login_attempts: 5,
            login_window_secs: 300,
        }
    }
}

impl Config {
    pub fn init() -> Config {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or unparsable values
    /// fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let admin_wallets = lookup("ADMIN_WALLET_ADDRESSES")
            .map(|raw| parse_admin_wallets(&raw))
            .unwrap_or_default();
        let max_login_attempts = lookup("ADMIN_LOGIN_MAX_ATTEMPTS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(defaults.max_login_attempts);
        let login_window_secs = lookup("ADMIN_LOGIN_WINDOW_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults.login_window_secs);

        Config {
            admin_wallets,
            max_login_attempts,
            login_window_secs,
        }
    }
}

/// Comma separated list of admin wallet addresses. Malformed entries are
/// logged and skipped.
pub fn parse_admin_wallets(raw: &str) -> Vec<EthereumAddress> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<EthereumAddress>() {
            Ok(address) => Some(address),
            Err(_) => {
                tracing::warn!("Ignoring malformed admin wallet address: {}", entry);
                None
            }
        })
        .collect()
}
