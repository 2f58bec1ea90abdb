use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::currency::Network;
use crate::errors::{WalletError, WalletResult};

const KEY_ENVIRONMENT: &str = "POCKET_WALLET_ENV";
const KEY_PIN_VERIFY_DELAY_MS: &str = "POCKET_WALLET_PIN_VERIFY_DELAY_MS";
const KEY_BACKEND_TIMEOUT_SECS: &str = "POCKET_WALLET_BACKEND_TIMEOUT_SECS";
const KEY_PAYMENT_WINDOW_SECS: &str = "POCKET_WALLET_PAYMENT_WINDOW_SECS";

/// Simulated backend timing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    /// Artificial processing delay applied to every simulated call
    pub simulated_delay_ms: u64,
    /// Upper bound before a call resolves as a connection timeout
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

/// Deposit flow parameters: the fixed deposit asset and the payment window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepositConfig {
    pub asset_symbol: String,
    pub network: Network,
    pub deposit_address: String,
    pub payment_window_secs: u64,
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            asset_symbol: "USDT".to_string(),
            network: Network::Trc20,
            deposit_address: "TQn9Y2khEsLJW1ChVWFMSMeRDow5KcbLSE".to_string(),
            payment_window_secs: 2 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletConfig {
    pub backend: BackendConfig,
    pub deposit: DepositConfig,
    pub environment: String,
}

impl WalletConfig {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            backend: BackendConfig::default(),
            deposit: DepositConfig::default(),
            environment: environment.into(),
        }
    }

    /// Build a configuration from defaults plus environment-variable overrides.
    pub fn from_env() -> WalletResult<Self> {
        let environment =
            std::env::var(KEY_ENVIRONMENT).unwrap_or_else(|_| "development".to_string());
        let mut config = Self::new(environment);

        if let Some(delay) = read_env_u64(KEY_PIN_VERIFY_DELAY_MS)? {
            config.backend.simulated_delay_ms = delay;
        }
        if let Some(timeout) = read_env_u64(KEY_BACKEND_TIMEOUT_SECS)? {
            config.backend.request_timeout_secs = timeout.max(1);
        }
        if let Some(window) = read_env_u64(KEY_PAYMENT_WINDOW_SECS)? {
            config.deposit.payment_window_secs = window.max(1);
        }

        Ok(config)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.backend.simulated_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    pub fn payment_window(&self) -> Duration {
        Duration::from_secs(self.deposit.payment_window_secs)
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self::new("development")
    }
}

fn read_env_u64(key: &str) -> WalletResult<Option<u64>> {
    match std::env::var(key) {
        Ok(raw) => {
            let parsed = raw.parse::<u64>().map_err(|_| {
                WalletError::ValidationError(format!("{} must be an integer, got '{}'", key, raw))
            })?;
            Ok(Some(parsed))
        }
        Err(_) => Ok(None),
    }
}

static WALLET_CONFIG: OnceCell<WalletConfig> = OnceCell::new();

/// Resolve the process-wide configuration once; later calls return the first result.
pub fn init_wallet_config() -> WalletResult<&'static WalletConfig> {
    if let Some(config) = WALLET_CONFIG.get() {
        return Ok(config);
    }
    let config = WalletConfig::from_env()?;
    log::info!(
        "Wallet configuration initialized for environment '{}'",
        config.environment
    );
    Ok(WALLET_CONFIG.get_or_init(|| config))
}
