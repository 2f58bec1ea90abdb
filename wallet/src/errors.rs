use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletError {
    // Form validation errors
    ValidationError(String),
    InvalidAmount(String),
    InsufficientFunds { requested: String, available: String },
    SameCurrencySelected,

    // PIN entry errors
    IncompletePin,
    PinMismatch,

    // Store errors
    NotFound(String),

    // Simulated backend errors
    NetworkError(String),
    ConnectionTimeout,
    ServiceRejected(String),

    // Flow lifecycle errors
    PaymentWindowExpired,

    // Generic errors
    Unknown(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WalletError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            WalletError::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),
            WalletError::InsufficientFunds {
                requested,
                available,
            } => write!(
                f,
                "Insufficient funds: requested {} but only {} is available",
                requested, available
            ),
            WalletError::SameCurrencySelected => {
                write!(f, "Source and target currency must differ")
            }

            WalletError::IncompletePin => write!(f, "PIN code requires all 4 digits"),
            WalletError::PinMismatch => write!(f, "PIN codes do not match"),

            WalletError::NotFound(msg) => write!(f, "Not found: {}", msg),

            WalletError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            WalletError::ConnectionTimeout => write!(f, "Connection timeout"),
            WalletError::ServiceRejected(msg) => write!(f, "Service rejected request: {}", msg),

            WalletError::PaymentWindowExpired => write!(f, "Payment window has expired"),

            WalletError::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for WalletError {}

pub type WalletResult<T> = Result<T, WalletError>;

// Conversion helpers
impl From<serde_json::Error> for WalletError {
    fn from(error: serde_json::Error) -> Self {
        WalletError::ValidationError(format!("JSON error: {}", error))
    }
}
