use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{cents_to_decimal, Account, AccountId, Transaction, TransactionId, TransactionType};

/// POST /accounts/create
/// Request body: { "holder_name": "Ada", "initial_balance": 1000 }
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(alias = "account_holder_name")]
    pub holder_name: String,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision")]
    pub initial_balance: Decimal,
}

/// POST /accounts/deposit and /accounts/withdraw
/// Request body: { "account_id": 1, "amount": 50.25 }
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub account_id: AccountId,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account_id: AccountId,
    pub holder_name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.id,
            holder_name: account.holder_name,
            balance: cents_to_decimal(account.balance_cents),
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositResponse {
    pub message: String,
    pub account_id: AccountId,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount_deposited: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub new_balance: Decimal,
}

impl From<Transaction> for DepositResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            message: "Deposit successful".to_string(),
            account_id: tx.account_id,
            amount_deposited: cents_to_decimal(tx.amount_cents),
            new_balance: cents_to_decimal(tx.balance_after_cents),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub message: String,
    pub account_id: AccountId,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount_withdrawn: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub new_balance: Decimal,
}

impl From<Transaction> for WithdrawResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            message: "Withdrawal successful".to_string(),
            account_id: tx.account_id,
            amount_withdrawn: cents_to_decimal(tx.amount_cents),
            new_balance: cents_to_decimal(tx.balance_after_cents),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub transaction_type: TransactionType,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance_after: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            transaction_id: tx.id,
            account_id: tx.account_id,
            transaction_type: tx.transaction_type,
            amount: cents_to_decimal(tx.amount_cents),
            balance_after: cents_to_decimal(tx.balance_after_cents),
            timestamp: tx.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_request_accepts_legacy_field_name() {
        let request: CreateAccountRequest =
            serde_json::from_value(json!({ "account_holder_name": "Ada", "initial_balance": 12.5 }))
                .unwrap();
        assert_eq!(request.holder_name, "Ada");
        assert_eq!(request.initial_balance, dec!(12.5));
    }

    #[test]
    fn test_create_request_defaults_initial_balance() {
        let request: CreateAccountRequest =
            serde_json::from_value(json!({ "holder_name": "Ada" })).unwrap();
        assert_eq!(request.initial_balance, Decimal::ZERO);
    }

    #[test]
    fn test_transaction_response_shape() {
        let tx = Transaction {
            id: 7,
            account_id: 3,
            transaction_type: TransactionType::Withdrawal,
            amount_cents: 20000,
            balance_after_cents: 130000,
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(TransactionResponse::from(tx)).unwrap();
        assert_eq!(value["transaction_id"], json!(7));
        assert_eq!(value["transaction_type"], json!("WITHDRAWAL"));
        assert_eq!(value["amount"].to_string(), "200.00");
        assert_eq!(value["balance_after"].to_string(), "1300.00");
    }

    #[test]
    fn test_request_amount_keeps_every_digit() {
        let request: TransactionRequest =
            serde_json::from_str(r#"{ "account_id": 1, "amount": 90071992547409.91 }"#).unwrap();
        assert_eq!(request.amount, dec!(90071992547409.91));
    }
}
