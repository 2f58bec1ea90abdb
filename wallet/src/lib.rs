// lib.rs - Core library structure for the wallet

pub mod address_book;
pub mod api;
pub mod app_state;
pub mod backend;
pub mod config;
pub mod currency;
pub mod errors;
pub mod flows;
pub mod notify;
pub mod pin;
pub mod portfolio;
pub mod validation;
pub mod wizard;

pub mod wallet {
    //! Wallet subsystem bootstrap

    use crate::config::init_wallet_config;
    use crate::errors::WalletResult;

    /// Initialize wallet subsystem
    pub fn init() -> WalletResult<()> {
        log::info!("Initializing wallet subsystem");

        let config = init_wallet_config()?;
        log::info!("Configuration resolved for '{}'", config.environment);

        Ok(())
    }
}

// Re-export common types
pub use address_book::{AddressBook, AddressDraft, AddressPatch, AddressRecord};
pub use api::types::{BalancesResponse, TransactionHistoryResponse, WalletInfoResponse};
pub use app_state::{SharedWalletContext, WalletContext};
pub use backend::{
    DepositIntent, ExchangeReceipt, ExchangeRequest, SimulatedBackend, WithdrawalReceipt,
    WithdrawalRequest,
};
pub use config::{BackendConfig, DepositConfig, WalletConfig};
pub use currency::{Amount, CurrencyCatalog, CurrencyInfo, Network, REFERENCE_SYMBOL};
pub use errors::{WalletError, WalletResult};
pub use flows::{
    DepositFlow, DepositStep, ExchangeFlow, ExchangeQuote, ExchangeStep, PaymentStatus,
    PaymentWindow, QuickFill, WithdrawFlow, WithdrawStep,
};
pub use notify::{Notification, NotificationCenter, Severity};
pub use pin::{ChangePinFlow, ChangePinProgress, PinChallenge, PinCode, PinPhase, PIN_LENGTH};
pub use portfolio::{AccountProfile, HoldEntry, Portfolio, TransactionEntry, TransactionKind};
pub use validation::InputValidator;
pub use wizard::{StepDef, WizardEngine};
