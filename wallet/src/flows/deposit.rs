use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::backend::{DepositIntent, SimulatedBackend};
use crate::config::DepositConfig;
use crate::currency::{Amount, Network};
use crate::errors::{WalletError, WalletResult};
use crate::notify::Notification;
use crate::validation::InputValidator;
use crate::wizard::{StepDef, WizardEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositStep {
    AmountEntry,
    WaitingForPayment,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositFields {
    pub amount: String,
}

/// Time left to pay into the deposit address.
///
/// Modeled as a monotonic deadline queried on demand rather than a ticking
/// task, so dropping the owning flow cancels it. Remaining time never goes
/// negative; an elapsed window reports [`PaymentStatus::Expired`] instead of
/// freezing at zero.
#[derive(Debug, Clone)]
pub struct PaymentWindow {
    opened_at: Instant,
    duration: Duration,
}

impl PaymentWindow {
    pub fn open(duration: Duration) -> Self {
        Self {
            opened_at: Instant::now(),
            duration,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.opened_at.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// HH:MM:SS rendering of the remaining time, clamped at 00:00:00.
    pub fn format_remaining(&self) -> String {
        let secs = self.remaining().as_secs();
        format!(
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Waiting { remaining: Duration },
    Expired,
}

fn validate_amount(fields: &DepositFields) -> WalletResult<()> {
    InputValidator::default().validate_amount(&fields.amount)?;
    Ok(())
}

fn clear_amount(fields: &mut DepositFields) {
    fields.amount.clear();
}

static DEPOSIT_STEPS: [StepDef<DepositFields>; 2] = [
    StepDef {
        name: "AmountEntry",
        validate: validate_amount,
        clear: clear_amount,
    },
    StepDef::passthrough("WaitingForPayment"),
];

/// The deposit dialog: amount entry, then a fixed deposit address with a
/// bounded payment window. The deposit asset is fixed by configuration; no
/// currency or network selection exists.
pub struct DepositFlow {
    engine: WizardEngine<DepositFields>,
    config: DepositConfig,
    intent: Option<DepositIntent>,
    window: Option<PaymentWindow>,
}

impl DepositFlow {
    pub fn new(config: DepositConfig) -> Self {
        Self {
            engine: WizardEngine::new(&DEPOSIT_STEPS, DepositFields::default()),
            config,
            intent: None,
            window: None,
        }
    }

    pub fn step(&self) -> DepositStep {
        match self.engine.step_index() {
            0 => DepositStep::AmountEntry,
            _ => DepositStep::WaitingForPayment,
        }
    }

    pub fn fields(&self) -> &DepositFields {
        self.engine.fields()
    }

    pub fn asset_symbol(&self) -> &str {
        &self.config.asset_symbol
    }

    pub fn network(&self) -> Network {
        self.config.network
    }

    pub fn deposit_address(&self) -> &str {
        &self.config.deposit_address
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        let amount = amount.into();
        self.engine.update(|mut fields| {
            fields.amount = amount;
            fields
        });
    }

    /// Validate the amount, register the intent, and open the payment window.
    pub async fn continue_to_payment(
        &mut self,
        backend: &SimulatedBackend,
    ) -> WalletResult<()> {
        if self.step() != DepositStep::AmountEntry {
            return Err(WalletError::Unknown(
                "Payment window is already open".to_string(),
            ));
        }
        self.engine.validate_current()?;

        let amount = Amount::from_string(&self.fields().amount)?;
        let intent = backend.register_deposit(amount).await?;
        log::info!(
            "Deposit intent {} registered for {} {}",
            intent.intent_id,
            amount,
            self.config.asset_symbol
        );

        self.engine.advance()?;
        self.intent = Some(intent);
        self.window = Some(PaymentWindow::open(Duration::from_secs(
            self.config.payment_window_secs,
        )));
        Ok(())
    }

    pub fn intent(&self) -> Option<&DepositIntent> {
        self.intent.as_ref()
    }

    /// Whether the payment window is still open, and how long remains.
    pub fn status(&self) -> WalletResult<PaymentStatus> {
        let window = self.window.as_ref().ok_or_else(|| {
            WalletError::Unknown("No payment window is open".to_string())
        })?;
        if window.is_expired() {
            Ok(PaymentStatus::Expired)
        } else {
            Ok(PaymentStatus::Waiting {
                remaining: window.remaining(),
            })
        }
    }

    /// Fails once the window has elapsed; the user must restart the flow.
    pub fn ensure_window_active(&self) -> WalletResult<Duration> {
        match self.status()? {
            PaymentStatus::Waiting { remaining } => Ok(remaining),
            PaymentStatus::Expired => Err(WalletError::PaymentWindowExpired),
        }
    }

    pub fn format_remaining(&self) -> WalletResult<String> {
        let window = self.window.as_ref().ok_or_else(|| {
            WalletError::Unknown("No payment window is open".to_string())
        })?;
        Ok(window.format_remaining())
    }

    /// The address string for the clipboard, with its confirmation notice.
    pub fn copy_address(&self) -> WalletResult<(String, Notification)> {
        if self.step() != DepositStep::WaitingForPayment {
            return Err(WalletError::Unknown(
                "No deposit address to copy yet".to_string(),
            ));
        }
        Ok((
            self.config.deposit_address.clone(),
            Notification::success("Copied", "Wallet address copied to clipboard"),
        ))
    }

    /// Reset everything to initial and cancel the payment window.
    pub fn close(&mut self) {
        self.engine.reset();
        self.intent = None;
        self.window = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> SimulatedBackend {
        SimulatedBackend::new(Duration::ZERO, Duration::from_secs(5))
    }

    fn flow() -> DepositFlow {
        DepositFlow::new(DepositConfig::default())
    }

    fn short_flow(window_secs: u64) -> DepositFlow {
        DepositFlow::new(DepositConfig {
            payment_window_secs: window_secs,
            ..DepositConfig::default()
        })
    }

    #[tokio::test]
    async fn continue_requires_a_positive_amount() {
        let mut deposit = flow();
        let err = deposit.continue_to_payment(&backend()).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));

        deposit.set_amount("0");
        let err = deposit.continue_to_payment(&backend()).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));
        assert_eq!(deposit.step(), DepositStep::AmountEntry);
    }

    #[tokio::test]
    async fn continue_opens_the_payment_window() {
        let mut deposit = flow();
        deposit.set_amount("5000");
        deposit.continue_to_payment(&backend()).await.unwrap();

        assert_eq!(deposit.step(), DepositStep::WaitingForPayment);
        assert!(deposit.intent().is_some());
        assert!(matches!(
            deposit.status().unwrap(),
            PaymentStatus::Waiting { .. }
        ));
        assert_eq!(deposit.deposit_address(), "TQn9Y2khEsLJW1ChVWFMSMeRDow5KcbLSE");
        assert_eq!(deposit.asset_symbol(), "USDT");
        assert_eq!(deposit.network(), Network::Trc20);
    }

    #[tokio::test]
    async fn window_expiry_signals_instead_of_freezing() {
        let mut deposit = short_flow(1);
        deposit.set_amount("100");
        deposit.continue_to_payment(&backend()).await.unwrap();

        // Force the deadline past by waiting out the 1-second window
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(deposit.status().unwrap(), PaymentStatus::Expired);
        assert_eq!(
            deposit.ensure_window_active().unwrap_err(),
            WalletError::PaymentWindowExpired
        );
        // Remaining time clamps at zero in the rendering too
        assert_eq!(deposit.format_remaining().unwrap(), "00:00:00");
    }

    #[test]
    fn remaining_time_formats_as_hms() {
        let window = PaymentWindow::open(Duration::from_secs(2 * 60 * 60));
        let formatted = window.format_remaining();
        assert!(formatted == "02:00:00" || formatted == "01:59:59");
        assert!(!window.is_expired());
    }

    #[tokio::test]
    async fn copy_address_only_after_amount_step() {
        let mut deposit = flow();
        assert!(deposit.copy_address().is_err());

        deposit.set_amount("100");
        deposit.continue_to_payment(&backend()).await.unwrap();
        let (address, notification) = deposit.copy_address().unwrap();
        assert_eq!(address, deposit.deposit_address());
        assert_eq!(notification.title, "Copied");
    }

    #[tokio::test]
    async fn close_cancels_the_window_and_resets() {
        let mut deposit = flow();
        deposit.set_amount("100");
        deposit.continue_to_payment(&backend()).await.unwrap();

        deposit.close();
        assert_eq!(deposit.step(), DepositStep::AmountEntry);
        assert_eq!(deposit.fields().amount, "");
        assert!(deposit.intent().is_none());
        assert!(deposit.status().is_err());
    }
}
