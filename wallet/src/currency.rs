/// Core currency types for the pocket wallet
///
/// This module defines the asset catalog the wallet operates on and the
/// fixed-point arithmetic used for every balance, rate, and conversion.
use crate::errors::{WalletError, WalletResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbol of the common reference currency all rates are expressed in.
pub const REFERENCE_SYMBOL: &str = "RUB";

/// Represents a monetary amount in the wallet.
///
/// Uses fixed-point arithmetic to avoid floating-point precision issues.
/// The base unit is the smallest displayable unit (8 fractional digits,
/// like satoshis in Bitcoin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    /// The amount in base units (1 whole unit = 100_000_000 base units)
    base_units: u128,
}

impl Amount {
    /// Number of fractional decimal places (8, like BTC)
    pub const DECIMALS: u8 = 8;
    /// Base units per whole unit (10^8)
    pub const UNITS_PER_WHOLE: u128 = 100_000_000;
    /// Maximum whole units any single amount may carry
    pub const MAX_WHOLE: u128 = 1_000_000_000_000;

    pub const ZERO: Amount = Amount { base_units: 0 };

    /// Create an amount from base units
    pub fn from_base_units(base_units: u128) -> WalletResult<Self> {
        let max_base_units = Self::MAX_WHOLE
            .checked_mul(Self::UNITS_PER_WHOLE)
            .ok_or_else(|| {
                WalletError::InvalidAmount("Maximum amount calculation overflow".to_string())
            })?;

        if base_units > max_base_units {
            return Err(WalletError::InvalidAmount("Amount too large".to_string()));
        }

        Ok(Amount { base_units })
    }

    /// Create an amount from whole units
    pub fn from_whole(whole: u128) -> WalletResult<Self> {
        if whole > Self::MAX_WHOLE {
            return Err(WalletError::InvalidAmount("Amount too large".to_string()));
        }

        let base_units = whole
            .checked_mul(Self::UNITS_PER_WHOLE)
            .ok_or_else(|| WalletError::InvalidAmount("Amount calculation overflow".to_string()))?;
        Self::from_base_units(base_units)
    }

    /// Create an amount from a decimal string such as "0.00234567"
    pub fn from_string(amount_str: &str) -> WalletResult<Self> {
        if amount_str.is_empty() {
            return Err(WalletError::InvalidAmount(
                "Amount cannot be empty".to_string(),
            ));
        }

        let parts: Vec<&str> = amount_str.split('.').collect();
        if parts.len() > 2 {
            return Err(WalletError::InvalidAmount(
                "Invalid decimal format".to_string(),
            ));
        }

        let whole_part: u128 = parts[0]
            .parse()
            .map_err(|_| WalletError::InvalidAmount("Invalid number format".to_string()))?;

        let fractional_units = if parts.len() == 2 {
            let fractional_str = parts[1];
            if fractional_str.is_empty() {
                return Err(WalletError::InvalidAmount(
                    "Invalid decimal format".to_string(),
                ));
            }
            if fractional_str.len() > Self::DECIMALS as usize {
                return Err(WalletError::InvalidAmount(
                    "Too many decimal places".to_string(),
                ));
            }

            // Pad with zeros to get full precision
            let padded = format!("{:0<8}", fractional_str);
            padded
                .parse::<u128>()
                .map_err(|_| WalletError::InvalidAmount("Invalid fractional part".to_string()))?
        } else {
            0
        };

        let total_base_units = whole_part
            .checked_mul(Self::UNITS_PER_WHOLE)
            .and_then(|w| w.checked_add(fractional_units))
            .ok_or_else(|| WalletError::InvalidAmount("Amount overflow".to_string()))?;

        Self::from_base_units(total_base_units)
    }

    /// Get base units
    pub fn base_units(&self) -> u128 {
        self.base_units
    }

    /// Check if amount is zero
    pub fn is_zero(&self) -> bool {
        self.base_units == 0
    }

    /// Get amount as string, trailing zeros trimmed
    pub fn as_string(&self) -> String {
        let whole = self.base_units / Self::UNITS_PER_WHOLE;
        let fractional = self.base_units % Self::UNITS_PER_WHOLE;

        if fractional == 0 {
            whole.to_string()
        } else {
            let frac_str = format!("{:08}", fractional)
                .trim_end_matches('0')
                .to_string();
            format!("{}.{}", whole, frac_str)
        }
    }

    /// Get amount as string with all 8 fractional digits, as quote displays use
    pub fn to_fixed_string(&self) -> String {
        let whole = self.base_units / Self::UNITS_PER_WHOLE;
        let fractional = self.base_units % Self::UNITS_PER_WHOLE;
        format!("{}.{:08}", whole, fractional)
    }

    /// Add two amounts
    pub fn checked_add(&self, other: &Amount) -> WalletResult<Amount> {
        self.base_units
            .checked_add(other.base_units)
            .and_then(|sum| Amount::from_base_units(sum).ok())
            .ok_or_else(|| WalletError::InvalidAmount("Amount overflow in addition".to_string()))
    }

    /// Subtract two amounts
    pub fn checked_sub(&self, other: &Amount) -> WalletResult<Amount> {
        if self.base_units < other.base_units {
            return Err(WalletError::InvalidAmount(
                "Insufficient amount for subtraction".to_string(),
            ));
        }

        Amount::from_base_units(self.base_units - other.base_units)
    }

    /// Half of this amount, rounded down to the base unit
    pub fn halved(&self) -> Amount {
        Amount {
            base_units: self.base_units / 2,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl FromStr for Amount {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::from_string(s)
    }
}

/// Transport network an asset can be moved over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Bitcoin,
    Erc20,
    Trc20,
    Bep20,
}

impl Network {
    pub fn label(&self) -> &'static str {
        match self {
            Network::Bitcoin => "Bitcoin",
            Network::Erc20 => "ERC20",
            Network::Trc20 => "TRC20",
            Network::Bep20 => "BEP20",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A supported asset: balance, reference rate, and the networks it moves over.
///
/// Immutable for the session; owned by the [`CurrencyCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub symbol: String,
    pub display_name: String,
    pub balance: Amount,
    /// Reference currency units per 1 unit of this currency
    pub reference_rate: Amount,
    /// Ordered, non-empty; the first entry is the default network
    pub networks: Vec<Network>,
}

impl CurrencyInfo {
    pub fn new(
        symbol: impl Into<String>,
        display_name: impl Into<String>,
        balance: &str,
        reference_rate: &str,
        networks: Vec<Network>,
    ) -> WalletResult<Self> {
        if networks.is_empty() {
            return Err(WalletError::ValidationError(
                "Currency must support at least one network".to_string(),
            ));
        }

        Ok(Self {
            symbol: symbol.into(),
            display_name: display_name.into(),
            balance: Amount::from_string(balance)?,
            reference_rate: Amount::from_string(reference_rate)?,
            networks,
        })
    }

    /// The network a fresh selection of this currency defaults to
    pub fn default_network(&self) -> Network {
        self.networks[0]
    }

    /// Balance expressed in the reference currency (balance x rate)
    pub fn reference_balance(&self) -> WalletResult<Amount> {
        let product = self
            .balance
            .base_units()
            .checked_mul(self.reference_rate.base_units())
            .ok_or_else(|| {
                WalletError::InvalidAmount("Reference balance overflow".to_string())
            })?;
        Amount::from_base_units(div_round_nearest(product, Amount::UNITS_PER_WHOLE))
    }
}

/// Convert an amount denominated in a source currency into a target currency:
/// `out = amount x from_rate / to_rate`, rounded to nearest at 8 decimals.
pub fn convert(amount: Amount, from_rate: Amount, to_rate: Amount) -> WalletResult<Amount> {
    if to_rate.is_zero() {
        return Err(WalletError::InvalidAmount(
            "Target rate must be non-zero".to_string(),
        ));
    }

    let numerator = amount
        .base_units()
        .checked_mul(from_rate.base_units())
        .ok_or_else(|| WalletError::InvalidAmount("Conversion overflow".to_string()))?;
    Amount::from_base_units(div_round_nearest(numerator, to_rate.base_units()))
}

fn div_round_nearest(numerator: u128, denominator: u128) -> u128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder * 2 >= denominator {
        quotient + 1
    } else {
        quotient
    }
}

/// The static set of assets the wallet knows about for the session.
#[derive(Debug, Clone)]
pub struct CurrencyCatalog {
    entries: Vec<CurrencyInfo>,
}

impl CurrencyCatalog {
    pub fn new(entries: Vec<CurrencyInfo>) -> WalletResult<Self> {
        for (index, entry) in entries.iter().enumerate() {
            if entries[..index].iter().any(|e| e.symbol == entry.symbol) {
                return Err(WalletError::ValidationError(format!(
                    "Duplicate currency symbol {}",
                    entry.symbol
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The production asset set.
    pub fn seeded() -> Self {
        let entries = vec![
            CurrencyInfo::new("BTC", "Bitcoin", "0.00234567", "4200000", vec![Network::Bitcoin]),
            CurrencyInfo::new("ETH", "Ethereum", "1.25", "280000", vec![Network::Erc20]),
            CurrencyInfo::new(
                "USDT",
                "Tether",
                "1250.00",
                "90",
                vec![Network::Trc20, Network::Bep20],
            ),
            CurrencyInfo::new("BNB", "BNB", "2.5", "27000", vec![Network::Bep20]),
        ];
        let entries = entries
            .into_iter()
            .collect::<WalletResult<Vec<_>>>()
            .expect("seeded catalog data is valid");
        Self { entries }
    }

    pub fn list(&self) -> &[CurrencyInfo] {
        &self.entries
    }

    pub fn get(&self, symbol: &str) -> Option<&CurrencyInfo> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    pub fn require(&self, symbol: &str) -> WalletResult<&CurrencyInfo> {
        self.get(symbol)
            .ok_or_else(|| WalletError::NotFound(format!("Unknown currency {}", symbol)))
    }

    /// Networks a picker may offer for the given currency
    pub fn networks_for(&self, symbol: &str) -> WalletResult<&[Network]> {
        Ok(&self.require(symbol)?.networks)
    }

    /// Convert between two catalog currencies
    pub fn convert(&self, amount: Amount, from: &str, to: &str) -> WalletResult<Amount> {
        let from_info = self.require(from)?;
        let to_info = self.require(to)?;
        convert(amount, from_info.reference_rate, to_info.reference_rate)
    }

    /// Units of `to` received per 1 unit of `from`, at 8 decimals
    pub fn cross_rate(&self, from: &str, to: &str) -> WalletResult<Amount> {
        self.convert(Amount::from_whole(1)?, from, to)
    }

    /// Total portfolio value in the reference currency
    pub fn total_reference_balance(&self) -> WalletResult<Amount> {
        let mut total = Amount::ZERO;
        for entry in &self.entries {
            total = total.checked_add(&entry.reference_balance()?)?;
        }
        Ok(total)
    }
}

impl Default for CurrencyCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_parsing_round_trip() {
        let amount = Amount::from_string("0.00234567").unwrap();
        assert_eq!(amount.base_units(), 234_567);
        assert_eq!(amount.as_string(), "0.00234567");

        let amount = Amount::from_string("1250.00").unwrap();
        assert_eq!(amount.base_units(), 1250 * Amount::UNITS_PER_WHOLE);
        assert_eq!(amount.as_string(), "1250");
    }

    #[test]
    fn amount_rejects_malformed_input() {
        assert!(Amount::from_string("").is_err());
        assert!(Amount::from_string("1.2.3").is_err());
        assert!(Amount::from_string("abc").is_err());
        assert!(Amount::from_string("1.").is_err());
        assert!(Amount::from_string("0.123456789").is_err());
        assert!(Amount::from_string("-5").is_err());
    }

    #[test]
    fn amount_arithmetic() {
        let a = Amount::from_whole(3).unwrap();
        let b = Amount::from_whole(2).unwrap();
        assert_eq!(a.checked_add(&b).unwrap(), Amount::from_whole(5).unwrap());
        assert_eq!(a.checked_sub(&b).unwrap(), Amount::from_whole(1).unwrap());
        assert!(b.checked_sub(&a).is_err());
        assert_eq!(a.halved(), Amount::from_string("1.5").unwrap());
    }

    #[test]
    fn btc_to_usdt_conversion_matches_quote() {
        let catalog = CurrencyCatalog::seeded();
        let out = catalog
            .convert(Amount::from_whole(1).unwrap(), "BTC", "USDT")
            .unwrap();
        // 1 x 4_200_000 / 90 at 8 decimals, rounded to nearest
        assert_eq!(out.to_fixed_string(), "46666.66666667");
    }

    #[test]
    fn conversion_round_trip_within_tolerance() {
        let catalog = CurrencyCatalog::seeded();
        let start = Amount::from_string("1.23456789").unwrap();
        let there = catalog.convert(start, "BTC", "USDT").unwrap();
        let back = catalog.convert(there, "USDT", "BTC").unwrap();
        let diff = if back >= start {
            back.checked_sub(&start).unwrap()
        } else {
            start.checked_sub(&back).unwrap()
        };
        // each hop rounds at the 8th decimal
        assert!(diff.base_units() <= 1);
    }

    #[test]
    fn conversion_rejects_zero_rate() {
        let result = convert(
            Amount::from_whole(1).unwrap(),
            Amount::from_whole(10).unwrap(),
            Amount::ZERO,
        );
        assert!(matches!(result, Err(WalletError::InvalidAmount(_))));
    }

    #[test]
    fn catalog_lookup_and_networks() {
        let catalog = CurrencyCatalog::seeded();
        assert_eq!(catalog.list().len(), 4);
        assert_eq!(catalog.require("USDT").unwrap().display_name, "Tether");
        assert!(matches!(
            catalog.require("DOGE"),
            Err(WalletError::NotFound(_))
        ));

        let networks = catalog.networks_for("USDT").unwrap();
        assert_eq!(networks, &[Network::Trc20, Network::Bep20]);
        assert_eq!(
            catalog.require("USDT").unwrap().default_network(),
            Network::Trc20
        );
    }

    #[test]
    fn catalog_rejects_duplicate_symbols() {
        let entries = vec![
            CurrencyInfo::new("BTC", "Bitcoin", "1", "100", vec![Network::Bitcoin]).unwrap(),
            CurrencyInfo::new("BTC", "Bitcoin Again", "2", "100", vec![Network::Bitcoin]).unwrap(),
        ];
        assert!(CurrencyCatalog::new(entries).is_err());
    }

    #[test]
    fn reference_balance_derivation() {
        let catalog = CurrencyCatalog::seeded();
        let usdt = catalog.require("USDT").unwrap();
        assert_eq!(
            usdt.reference_balance().unwrap(),
            Amount::from_whole(112_500).unwrap()
        );
    }
}
