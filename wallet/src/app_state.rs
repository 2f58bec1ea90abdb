use std::sync::Arc;
use std::sync::RwLock;

use crate::address_book::AddressBook;
use crate::backend::SimulatedBackend;
use crate::config::{init_wallet_config, WalletConfig};
use crate::currency::CurrencyCatalog;
use crate::errors::{WalletError, WalletResult};
use crate::flows::{DepositFlow, ExchangeFlow, WithdrawFlow};
use crate::portfolio::Portfolio;

/// Everything the wallet session owns: the asset catalog, the address book,
/// the dashboard data, the simulated backend, and configuration.
#[derive(Debug)]
pub struct WalletContext {
    catalog: CurrencyCatalog,
    address_book: AddressBook,
    portfolio: Portfolio,
    backend: SimulatedBackend,
    config: WalletConfig,
}

impl WalletContext {
    pub fn initialize() -> WalletResult<Self> {
        let config = init_wallet_config()?.clone();
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: WalletConfig) -> Self {
        let backend = SimulatedBackend::from_config(&config);
        log::info!(
            "Wallet context initialized for environment '{}'",
            config.environment
        );
        Self {
            catalog: CurrencyCatalog::seeded(),
            address_book: AddressBook::seeded(),
            portfolio: Portfolio::seeded(),
            backend,
            config,
        }
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.catalog
    }

    pub fn address_book(&self) -> &AddressBook {
        &self.address_book
    }

    pub fn address_book_mut(&mut self) -> &mut AddressBook {
        &mut self.address_book
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn backend(&self) -> &SimulatedBackend {
        &self.backend
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// A fresh withdraw wizard over this session's catalog.
    pub fn withdraw_flow(&self) -> WithdrawFlow {
        WithdrawFlow::new()
    }

    /// A fresh exchange wizard over this session's catalog.
    pub fn exchange_flow(&self) -> ExchangeFlow {
        ExchangeFlow::new()
    }

    /// A fresh deposit wizard using the configured deposit asset.
    pub fn deposit_flow(&self) -> DepositFlow {
        DepositFlow::new(self.config.deposit.clone())
    }
}

/// Shared wallet context exposed to the presentation shell.
#[derive(Clone)]
pub struct SharedWalletContext(pub Arc<RwLock<WalletContext>>);

impl SharedWalletContext {
    pub fn new(inner: WalletContext) -> Self {
        Self(Arc::new(RwLock::new(inner)))
    }

    pub fn read<F, T>(&self, op: F) -> WalletResult<T>
    where
        F: FnOnce(&WalletContext) -> WalletResult<T>,
    {
        let guard = self
            .0
            .read()
            .map_err(|_| WalletError::Unknown("Poisoned wallet context".into()))?;
        op(&guard)
    }

    pub fn write<F, T>(&self, op: F) -> WalletResult<T>
    where
        F: FnOnce(&mut WalletContext) -> WalletResult<T>,
    {
        let mut guard = self
            .0
            .write()
            .map_err(|_| WalletError::Unknown("Poisoned wallet context".into()))?;
        op(&mut guard)
    }
}
