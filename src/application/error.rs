use thiserror::Error;

use crate::domain::{format_cents, AccountId, Cents};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error(
        "Insufficient funds in account {account_id}: balance {}, requested {}",
        format_cents(*balance),
        format_cents(*requested)
    )]
    InsufficientFunds {
        account_id: AccountId,
        balance: Cents,
        requested: Cents,
    },

    #[error("Database error: {0}")]
    Store(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}
