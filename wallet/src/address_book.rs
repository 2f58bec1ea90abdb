use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Network;
use crate::errors::{WalletError, WalletResult};
use crate::validation::InputValidator;

/// A saved counterparty address. Session lifetime only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub network: Network,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Input for [`AddressBook::add`]; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    pub name: String,
    pub address: String,
    pub network: Network,
    pub currency: String,
}

/// Partial update for [`AddressBook::update`]; absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub network: Option<Network>,
    pub currency: Option<String>,
}

/// In-memory address book, insertion-ordered.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    records: Vec<AddressRecord>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The records every fresh session starts with.
    pub fn seeded() -> Self {
        let drafts = [
            AddressDraft {
                name: "Main wallet".to_string(),
                address: "0x742d35Cc6635C0532925a3b8D400B41B354e8e8b".to_string(),
                network: Network::Bep20,
                currency: "USDT".to_string(),
            },
            AddressDraft {
                name: "Reserve wallet".to_string(),
                address: "0x8ba1f109551bD432803012645Hac136c49cEB1c".to_string(),
                network: Network::Bep20,
                currency: "USDT".to_string(),
            },
            AddressDraft {
                name: "Trading account".to_string(),
                address: "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984".to_string(),
                network: Network::Bep20,
                currency: "BNB".to_string(),
            },
        ];

        let mut book = Self::new();
        for draft in drafts {
            book.add(draft).expect("seeded address book data is valid");
        }
        book
    }

    /// Records in insertion order.
    pub fn list(&self) -> &[AddressRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a new record, assigning a fresh id.
    pub fn add(&mut self, draft: AddressDraft) -> WalletResult<&AddressRecord> {
        let validator = InputValidator::default();
        validator.validate_label(&draft.name)?;
        validate_record_address(&draft.address)?;

        let record = AddressRecord {
            id: Uuid::new_v4(),
            name: draft.name,
            address: draft.address,
            network: draft.network,
            currency: draft.currency,
            created_at: Utc::now(),
        };
        log::debug!("Address book: added record {}", record.id);
        self.records.push(record);
        Ok(self.records.last().expect("record was just pushed"))
    }

    /// Merge the provided fields into an existing record.
    pub fn update(&mut self, id: Uuid, patch: AddressPatch) -> WalletResult<&AddressRecord> {
        let validator = InputValidator::default();
        if let Some(name) = &patch.name {
            validator.validate_label(name)?;
        }
        if let Some(address) = &patch.address {
            validate_record_address(address)?;
        }

        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| WalletError::NotFound(format!("Address record {}", id)))?;

        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(address) = patch.address {
            record.address = address;
        }
        if let Some(network) = patch.network {
            record.network = network;
        }
        if let Some(currency) = patch.currency {
            record.currency = currency;
        }
        Ok(record)
    }

    /// Remove a record. Idempotent; an absent id is not an error.
    pub fn remove(&mut self, id: Uuid) {
        self.records.retain(|r| r.id != id);
    }

    /// The address string of a record, for filling a withdrawal form.
    /// The caller closes the book after a successful selection.
    pub fn select_for_use(&self, id: Uuid) -> WalletResult<String> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.address.clone())
            .ok_or_else(|| WalletError::NotFound(format!("Address record {}", id)))
    }
}

fn validate_record_address(address: &str) -> WalletResult<()> {
    if address.trim().is_empty() {
        return Err(WalletError::ValidationError(
            "Address is required".to_string(),
        ));
    }
    if address.len() > 100 {
        return Err(WalletError::ValidationError(
            "Address too long".to_string(),
        ));
    }
    Ok(())
}
