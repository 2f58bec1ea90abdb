use crate::currency::Amount;
use crate::errors::{WalletError, WalletResult};
use regex::Regex;

/// Input validation utilities for the wallet
pub struct InputValidator {
    // Compiled regex patterns for performance
    address_pattern: Regex,
    amount_pattern: Regex,
    label_pattern: Regex,

    // Blacklisted patterns for security
    malicious_patterns: Vec<Regex>,
}

impl InputValidator {
    pub fn new() -> WalletResult<Self> {
        // Addresses are opaque strings; only charset and length are checked
        let address_pattern = Regex::new(r"^[A-Za-z0-9]{10,100}$")
            .map_err(|e| WalletError::ValidationError(format!("Invalid address regex: {}", e)))?;

        let amount_pattern = Regex::new(r"^\d+(\.\d{1,8})?$")
            .map_err(|e| WalletError::ValidationError(format!("Invalid amount regex: {}", e)))?;

        let label_pattern = Regex::new(r"^[\w\s\-\.]{1,50}$")
            .map_err(|e| WalletError::ValidationError(format!("Invalid label regex: {}", e)))?;

        // Common malicious patterns to block
        let malicious_patterns = vec![
            Regex::new(r"<script").unwrap(),
            Regex::new(r"javascript:").unwrap(),
            Regex::new(r"data:text/html").unwrap(),
            Regex::new(r"vbscript:").unwrap(),
            Regex::new(r"onload=").unwrap(),
            Regex::new(r"onerror=").unwrap(),
        ];

        Ok(InputValidator {
            address_pattern,
            amount_pattern,
            label_pattern,
            malicious_patterns,
        })
    }

    /// Validate a counterparty wallet address
    pub fn validate_address(&self, address: &str) -> WalletResult<()> {
        self.check_basic_security(address)?;

        if address.is_empty() {
            return Err(WalletError::ValidationError(
                "Wallet address is required".to_string(),
            ));
        }

        if !self.address_pattern.is_match(address) {
            return Err(WalletError::ValidationError(
                "Address format is invalid".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate an amount string and return the parsed amount
    pub fn validate_amount(&self, amount: &str) -> WalletResult<Amount> {
        self.check_basic_security(amount)?;

        if amount.is_empty() {
            return Err(WalletError::InvalidAmount(
                "Amount is required".to_string(),
            ));
        }

        if !self.amount_pattern.is_match(amount) {
            return Err(WalletError::InvalidAmount(
                "Amount format is invalid".to_string(),
            ));
        }

        let parsed = Amount::from_string(amount)?;
        if parsed.is_zero() {
            return Err(WalletError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        Ok(parsed)
    }

    /// Validate an address-book record name
    pub fn validate_label(&self, label: &str) -> WalletResult<()> {
        self.check_basic_security(label)?;

        if label.trim().is_empty() {
            return Err(WalletError::ValidationError(
                "Name is required".to_string(),
            ));
        }

        if !self.label_pattern.is_match(label) {
            return Err(WalletError::ValidationError(
                "Name contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Check for basic security issues in any input
    fn check_basic_security(&self, input: &str) -> WalletResult<()> {
        if input.len() > 1000 {
            return Err(WalletError::ValidationError("Input too long".to_string()));
        }

        for pattern in &self.malicious_patterns {
            if pattern.is_match(&input.to_lowercase()) {
                return Err(WalletError::ValidationError(
                    "Input contains potentially malicious content".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new().expect("Failed to create InputValidator")
    }
}
