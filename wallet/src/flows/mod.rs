//! The transaction wizards, each an instance of the generic step engine.

pub mod deposit;
pub mod exchange;
pub mod withdraw;

pub use deposit::{DepositFlow, DepositStep, PaymentStatus, PaymentWindow};
pub use exchange::{ExchangeFlow, ExchangeQuote, ExchangeStep};
pub use withdraw::{QuickFill, WithdrawFlow, WithdrawStep};
