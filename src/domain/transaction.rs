use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Cents};

pub type TransactionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money added to the account
    Deposit,
    /// Money taken out of the account
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DEPOSIT" => Some(TransactionType::Deposit),
            "WITHDRAWAL" => Some(TransactionType::Withdrawal),
            _ => None,
        }
    }

    /// Signed effect of an amount of this type on the account balance.
    pub fn signed(&self, amount_cents: Cents) -> Cents {
        match self {
            TransactionType::Deposit => amount_cents,
            TransactionType::Withdrawal => -amount_cents,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable record of a single balance-changing event.
/// Transactions are append-only: they are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub transaction_type: TransactionType,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    /// Account balance right after this transaction was applied
    pub balance_after_cents: Cents,
    pub timestamp: DateTime<Utc>,
}
