use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::currency::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

/// A settled wallet operation shown in the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEntry {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub currency: String,
    pub amount: Amount,
    pub reference_amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HoldStatus {
    Active,
    Ending,
}

/// A locked reference-currency position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldEntry {
    pub id: Uuid,
    pub amount: Amount,
    /// Percentage yield at maturity
    pub profit_percent: Amount,
    pub ends_in_secs: u64,
    pub status: HoldStatus,
}

impl HoldEntry {
    pub fn ends_in(&self) -> Duration {
        Duration::from_secs(self.ends_in_secs)
    }
}

/// Static facts about the account holder shown on the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub display_name: String,
    pub handle: String,
    pub account_id: u64,
    pub member_for_days: u32,
    pub turnover: Amount,
    /// Daily portfolio trend, percent
    pub trend_percent: Amount,
}

/// Session-scoped dashboard data: profile, history, active holds.
#[derive(Debug, Clone)]
pub struct Portfolio {
    profile: AccountProfile,
    transactions: Vec<TransactionEntry>,
    holds: Vec<HoldEntry>,
}

impl Portfolio {
    /// The mock data every fresh session starts with.
    pub fn seeded() -> Self {
        let amount = |s: &str| Amount::from_string(s).expect("seeded amount is valid");
        let at = |y, mo, d, h, mi| {
            Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
                .single()
                .expect("seeded timestamp is valid")
        };

        let profile = AccountProfile {
            display_name: "Alex Smirnov".to_string(),
            handle: "@alex_crypto".to_string(),
            account_id: 1_247_859,
            member_for_days: 285,
            turnover: amount("1245780"),
            trend_percent: amount("2.45"),
        };

        let transactions = vec![
            TransactionEntry {
                id: Uuid::new_v4(),
                kind: TransactionKind::Deposit,
                currency: "USDT".to_string(),
                amount: amount("500.00"),
                reference_amount: amount("45000.00"),
                occurred_at: at(2021, 1, 21, 13, 13),
            },
            TransactionEntry {
                id: Uuid::new_v4(),
                kind: TransactionKind::Withdraw,
                currency: "USDT".to_string(),
                amount: amount("250.00"),
                reference_amount: amount("22500.00"),
                occurred_at: at(2021, 1, 20, 10, 25),
            },
            TransactionEntry {
                id: Uuid::new_v4(),
                kind: TransactionKind::Deposit,
                currency: "USDT".to_string(),
                amount: amount("1000.00"),
                reference_amount: amount("90000.00"),
                occurred_at: at(2021, 1, 19, 16, 42),
            },
        ];

        let holds = vec![
            HoldEntry {
                id: Uuid::new_v4(),
                amount: amount("50000"),
                profit_percent: amount("12.5"),
                ends_in_secs: 2 * 3600 + 45 * 60,
                status: HoldStatus::Active,
            },
            HoldEntry {
                id: Uuid::new_v4(),
                amount: amount("25000"),
                profit_percent: amount("8.2"),
                ends_in_secs: 13 * 60,
                status: HoldStatus::Active,
            },
            HoldEntry {
                id: Uuid::new_v4(),
                amount: amount("75000"),
                profit_percent: amount("15.7"),
                ends_in_secs: 29 * 3600,
                status: HoldStatus::Ending,
            },
        ];

        Self {
            profile,
            transactions,
            holds,
        }
    }

    pub fn profile(&self) -> &AccountProfile {
        &self.profile
    }

    /// History entries, newest first.
    pub fn transactions(&self) -> &[TransactionEntry] {
        &self.transactions
    }

    pub fn holds(&self) -> &[HoldEntry] {
        &self.holds
    }

    pub fn active_hold_count(&self) -> usize {
        self.holds.len()
    }
}
