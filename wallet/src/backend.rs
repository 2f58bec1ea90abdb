/// Simulated backend client for the pocket wallet
///
/// This module is the seam where a real credential-verification and
/// settlement API would plug in. Calls are modeled as asynchronous
/// operations with a fixed artificial processing delay and an explicit
/// request timeout, so service failures (timeout, rejection) surface as
/// error kinds distinct from form validation.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time;
use uuid::Uuid;

use crate::config::WalletConfig;
use crate::currency::{Amount, Network};
use crate::errors::{WalletError, WalletResult};
use crate::pin::PinCode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub currency: String,
    pub network: Network,
    pub address: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalReceipt {
    pub request_id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequest {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: Amount,
    pub converted_amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeReceipt {
    pub request_id: Uuid,
    pub settled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositIntent {
    pub intent_id: Uuid,
    pub amount: Amount,
    pub registered_at: DateTime<Utc>,
}

/// In-process stand-in for the wallet service.
///
/// Accepts everything after its artificial delay; the timeout still applies
/// so callers exercise the same cancellation paths a real client would.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
    timeout: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration, timeout: Duration) -> Self {
        Self { delay, timeout }
    }

    pub fn from_config(config: &WalletConfig) -> Self {
        Self::new(config.simulated_delay(), config.request_timeout())
    }

    /// Verify a PIN code against the credential service.
    ///
    /// The simulation accepts any complete code; a real implementation would
    /// perform a constant-time comparison against a stored credential hash.
    pub async fn verify_pin(&self, _code: &PinCode) -> WalletResult<()> {
        self.simulate_processing("verify_pin").await
    }

    /// Submit a withdrawal for settlement.
    pub async fn submit_withdrawal(
        &self,
        request: &WithdrawalRequest,
    ) -> WalletResult<WithdrawalReceipt> {
        self.simulate_processing("submit_withdrawal").await?;
        let receipt = WithdrawalReceipt {
            request_id: Uuid::new_v4(),
            submitted_at: Utc::now(),
        };
        log::info!(
            "Withdrawal {} accepted: {} {} to {} via {}",
            receipt.request_id,
            request.amount,
            request.currency,
            request.address,
            request.network
        );
        Ok(receipt)
    }

    /// Settle an exchange between two currencies.
    pub async fn submit_exchange(
        &self,
        request: &ExchangeRequest,
    ) -> WalletResult<ExchangeReceipt> {
        self.simulate_processing("submit_exchange").await?;
        let receipt = ExchangeReceipt {
            request_id: Uuid::new_v4(),
            settled_at: Utc::now(),
        };
        log::info!(
            "Exchange {} settled: {} {} -> {} {}",
            receipt.request_id,
            request.amount,
            request.from_currency,
            request.converted_amount,
            request.to_currency
        );
        Ok(receipt)
    }

    /// Register a deposit intent so the payment window can open.
    pub async fn register_deposit(&self, amount: Amount) -> WalletResult<DepositIntent> {
        self.simulate_processing("register_deposit").await?;
        Ok(DepositIntent {
            intent_id: Uuid::new_v4(),
            amount,
            registered_at: Utc::now(),
        })
    }

    async fn simulate_processing(&self, operation: &str) -> WalletResult<()> {
        time::timeout(self.timeout, time::sleep(self.delay))
            .await
            .map_err(|_| {
                log::warn!("Backend operation {} timed out", operation);
                WalletError::ConnectionTimeout
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::PinChallenge;

    fn complete_code() -> PinCode {
        let mut challenge = PinChallenge::new();
        for d in [1, 2, 3, 4] {
            challenge.press_digit(d).unwrap();
        }
        challenge.code().unwrap()
    }

    #[tokio::test]
    async fn verify_accepts_complete_code() {
        let backend = SimulatedBackend::new(Duration::ZERO, Duration::from_secs(5));
        assert!(backend.verify_pin(&complete_code()).await.is_ok());
    }

    #[tokio::test]
    async fn delay_beyond_timeout_maps_to_connection_timeout() {
        let backend =
            SimulatedBackend::new(Duration::from_secs(60), Duration::from_millis(100));
        let result = backend.verify_pin(&complete_code()).await;
        assert!(matches!(result, Err(WalletError::ConnectionTimeout)));
    }

    #[tokio::test]
    async fn receipts_carry_fresh_request_ids() {
        let backend = SimulatedBackend::new(Duration::ZERO, Duration::from_secs(5));
        let request = WithdrawalRequest {
            currency: "USDT".to_string(),
            network: Network::Trc20,
            address: "TQn9Y2khEsLJW1ChVWFMSMeRDow5KcbLSE".to_string(),
            amount: Amount::from_whole(100).unwrap(),
        };
        let first = backend.submit_withdrawal(&request).await.unwrap();
        let second = backend.submit_withdrawal(&request).await.unwrap();
        assert_ne!(first.request_id, second.request_id);
    }
}
