use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address_book::AddressRecord;
use crate::currency::{CurrencyInfo, Network};
use crate::errors::WalletResult;
use crate::portfolio::{AccountProfile, HoldEntry, HoldStatus, TransactionEntry, TransactionKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyView {
    pub symbol: String,
    pub display_name: String,
    pub balance: String,
    pub reference_balance: String,
    pub reference_rate: String,
    pub networks: Vec<Network>,
    pub default_network: Network,
}

impl CurrencyView {
    pub fn try_from_info(info: &CurrencyInfo) -> WalletResult<Self> {
        Ok(Self {
            symbol: info.symbol.clone(),
            display_name: info.display_name.clone(),
            balance: info.balance.as_string(),
            reference_balance: info.reference_balance()?.as_string(),
            reference_rate: info.reference_rate.as_string(),
            networks: info.networks.clone(),
            default_network: info.default_network(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancesResponse {
    pub reference_symbol: String,
    pub currencies: Vec<CurrencyView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfoResponse {
    pub profile: AccountProfile,
    pub total_balance: String,
    pub total_balance_usd: String,
    pub active_holds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub currency: String,
    pub amount: String,
    pub reference_amount: String,
    pub occurred_at: DateTime<Utc>,
}

impl From<&TransactionEntry> for TransactionView {
    fn from(entry: &TransactionEntry) -> Self {
        Self {
            id: entry.id,
            kind: entry.kind,
            currency: entry.currency.clone(),
            amount: entry.amount.as_string(),
            reference_amount: entry.reference_amount.as_string(),
            occurred_at: entry.occurred_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHistoryResponse {
    pub transactions: Vec<TransactionView>,
    pub total_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldView {
    pub id: Uuid,
    pub amount: String,
    pub profit_percent: String,
    pub ends_in_secs: u64,
    pub status: HoldStatus,
}

impl From<&HoldEntry> for HoldView {
    fn from(entry: &HoldEntry) -> Self {
        Self {
            id: entry.id,
            amount: entry.amount.as_string(),
            profit_percent: entry.profit_percent.as_string(),
            ends_in_secs: entry.ends_in_secs,
            status: entry.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveHoldsResponse {
    pub holds: Vec<HoldView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAddressesResponse {
    pub records: Vec<AddressRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAddressRequest {
    pub name: String,
    pub address: String,
    pub network: Network,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub address: Option<String>,
    pub network: Option<Network>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAddressResponse {
    pub address: String,
    /// The book dialog closes after a successful selection
    pub close_book: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeQuoteRequest {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeQuoteResponse {
    pub from_currency: String,
    pub to_currency: String,
    pub cross_rate: String,
    pub converted_amount: String,
}
