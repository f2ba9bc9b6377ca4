use tracing::{info, warn};

use crate::domain::{
    balance_matches_history, normalize_holder_name, resolve_history_limit, Account, AccountId,
    Cents, IntegrityReport, Transaction, TransactionType,
};
use crate::storage::{BalanceUpdate, PoolSettings, Repository};

use super::AppError;

/// Application service providing the ledger operations.
/// This is the primary interface for any client (HTTP API, CLI).
///
/// The service keeps no mutable state of its own; all consistency comes from
/// the store, so a single instance can be shared across concurrent requests.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Connect to the database and create the schema if needed.
    pub async fn init(database_url: &str, settings: &PoolSettings) -> Result<Self, AppError> {
        let repo = Repository::init(database_url, settings).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self, AppError> {
        let repo = Repository::connect(database_url, settings).await?;
        Ok(Self::new(repo))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    // ========================
    // Account operations
    // ========================

    /// Open a new account.
    pub async fn create_account(
        &self,
        holder_name: &str,
        initial_balance: Cents,
    ) -> Result<Account, AppError> {
        let holder_name = normalize_holder_name(holder_name)
            .ok_or_else(|| AppError::validation("Holder name must not be empty"))?;

        if initial_balance < 0 {
            return Err(AppError::validation("Initial balance cannot be negative"));
        }

        let account = self.repo.create_account(&holder_name, initial_balance).await?;
        info!(
            account_id = account.id,
            balance = account.balance_cents,
            "account created"
        );
        Ok(account)
    }

    /// Get the current state of an account.
    pub async fn get_balance(&self, account_id: AccountId) -> Result<Account, AppError> {
        self.repo
            .get_account(account_id)
            .await?
            .ok_or(AppError::AccountNotFound(account_id))
    }

    // ========================
    // Balance mutations
    // ========================

    /// Add money to an account. Returns the recorded transaction.
    pub async fn deposit(
        &self,
        account_id: AccountId,
        amount_cents: Cents,
    ) -> Result<Transaction, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::validation("Deposit amount must be positive"));
        }

        match self
            .repo
            .apply_transaction(account_id, TransactionType::Deposit, amount_cents)
            .await?
        {
            BalanceUpdate::Applied(transaction) => {
                info!(
                    account_id,
                    amount = amount_cents,
                    balance_after = transaction.balance_after_cents,
                    "deposit recorded"
                );
                Ok(transaction)
            }
            BalanceUpdate::AccountNotFound => Err(AppError::AccountNotFound(account_id)),
            BalanceUpdate::Rejected { balance } => {
                warn!(account_id, balance, amount = amount_cents, "deposit overflows balance");
                Err(AppError::validation(
                    "Deposit would exceed the maximum account balance",
                ))
            }
        }
    }

    /// Take money out of an account. The overdraw check happens in the same
    /// atomic store operation as the update.
    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount_cents: Cents,
    ) -> Result<Transaction, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::validation("Withdrawal amount must be positive"));
        }

        match self
            .repo
            .apply_transaction(account_id, TransactionType::Withdrawal, amount_cents)
            .await?
        {
            BalanceUpdate::Applied(transaction) => {
                info!(
                    account_id,
                    amount = amount_cents,
                    balance_after = transaction.balance_after_cents,
                    "withdrawal recorded"
                );
                Ok(transaction)
            }
            BalanceUpdate::AccountNotFound => Err(AppError::AccountNotFound(account_id)),
            BalanceUpdate::Rejected { balance } => Err(AppError::InsufficientFunds {
                account_id,
                balance,
                requested: amount_cents,
            }),
        }
    }

    // ========================
    // History
    // ========================

    /// Most recent transactions for an account, newest first.
    /// `limit` defaults to 10 and is capped at 100.
    pub async fn transaction_history(
        &self,
        account_id: AccountId,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, AppError> {
        let limit = resolve_history_limit(limit).map_err(|e| AppError::validation(e.to_string()))?;

        // Resolve the account first so unknown ids are not mistaken for empty history
        self.get_balance(account_id).await?;

        Ok(self.repo.list_recent_transactions(account_id, limit).await?)
    }

    // ========================
    // Integrity
    // ========================

    /// Check every account's balance against its transaction history.
    pub async fn verify_integrity(&self) -> Result<IntegrityReport, AppError> {
        let accounts = self.repo.list_accounts().await?;
        let transaction_count = self.repo.count_transactions().await?;

        let mut mismatched_accounts = Vec::new();
        for account in &accounts {
            let history = self.repo.list_transactions_for_account(account.id).await?;
            if !balance_matches_history(account, &history) {
                warn!(
                    account_id = account.id,
                    balance = account.balance_cents,
                    "balance disagrees with transaction history"
                );
                mismatched_accounts.push(account.id);
            }
        }

        Ok(IntegrityReport {
            account_count: accounts.len() as i64,
            transaction_count,
            mismatched_accounts,
        })
    }
}
