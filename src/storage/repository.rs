use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyConnection, AnyPool, Row};

use crate::domain::{Account, AccountId, Cents, Transaction, TransactionType};

use super::Backend;

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Result of an attempted balance mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceUpdate {
    /// Balance changed and the history entry was appended.
    Applied(Transaction),
    /// No account with the given id.
    AccountNotFound,
    /// The account exists but the guard rejected the change
    /// (overdraw for withdrawals, overflow for deposits). Nothing was written.
    Rejected { balance: Cents },
}

/// Repository for persisting and querying accounts and their transactions.
pub struct Repository {
    pool: AnyPool,
    backend: Backend,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: AnyPool, backend: Backend) -> Self {
        Self { pool, backend }
    }

    /// Connect to the database at the given URL (`postgres://...` or `sqlite:...`).
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self> {
        let backend = Backend::from_url(database_url)
            .with_context(|| format!("Unsupported database URL scheme: {}", scheme(database_url)))?;

        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        Ok(Self::new(pool, backend))
    }

    /// Create tables and indexes if they don't exist yet.
    pub async fn migrate(&self) -> Result<()> {
        for statement in self.backend.migration_statements() {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to run migration statement: {}", statement))?;
        }
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str, settings: &PoolSettings) -> Result<Self> {
        let repo = Self::connect(database_url, settings).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ========================
    // Account operations
    // ========================

    /// Insert a new account. A positive opening balance is recorded as a
    /// DEPOSIT in the same database transaction.
    pub async fn create_account(&self, holder_name: &str, initial_balance: Cents) -> Result<Account> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let created_at = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (holder_name, balance, created_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(holder_name)
        .bind(initial_balance)
        .bind(created_at.to_rfc3339())
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert account")?;
        let id: AccountId = row.try_get("id").context("Invalid account ID")?;

        if initial_balance > 0 {
            Self::append_transaction(
                &mut tx,
                id,
                TransactionType::Deposit,
                initial_balance,
                initial_balance,
                created_at,
            )
            .await?;
        }

        tx.commit().await.context("Failed to commit account")?;

        Ok(Account {
            id,
            holder_name: holder_name.to_string(),
            balance_cents: initial_balance,
            created_at,
        })
    }

    /// Get an account by ID.
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, holder_name, balance, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    /// List all accounts, ordered by ID.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query("SELECT id, holder_name, balance, created_at FROM accounts ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    fn row_to_account(row: &AnyRow) -> Result<Account> {
        let created_at_str: String = row.try_get("created_at")?;

        Ok(Account {
            id: row.try_get("id").context("Invalid account ID")?,
            holder_name: row.try_get("holder_name")?,
            balance_cents: row.try_get("balance").context("Invalid balance")?,
            created_at: parse_timestamp(&created_at_str).context("Invalid created_at timestamp")?,
        })
    }

    // ========================
    // Balance mutations
    // ========================

    /// Apply a deposit or withdrawal and append its history entry atomically.
    ///
    /// The guard lives in the `WHERE` clause of a single `UPDATE`, so two
    /// concurrent withdrawals on the same row are serialized by the row lock
    /// and the second one sees the committed balance. If the update touches
    /// nothing, a read inside the same transaction tells a missing account
    /// apart from a rejected one, and the transaction is rolled back.
    pub async fn apply_transaction(
        &self,
        account_id: AccountId,
        transaction_type: TransactionType,
        amount_cents: Cents,
    ) -> Result<BalanceUpdate> {
        let (update_sql, guard) = match transaction_type {
            TransactionType::Deposit => (
                r#"
                UPDATE accounts
                SET balance = balance + $1
                WHERE id = $2 AND balance <= $3
                RETURNING balance
                "#,
                Cents::MAX - amount_cents,
            ),
            TransactionType::Withdrawal => (
                r#"
                UPDATE accounts
                SET balance = balance - $1
                WHERE id = $2 AND balance >= $3
                RETURNING balance
                "#,
                amount_cents,
            ),
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let updated = sqlx::query(update_sql)
            .bind(amount_cents)
            .bind(account_id)
            .bind(guard)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to update balance")?;

        let Some(row) = updated else {
            let current = sqlx::query("SELECT balance FROM accounts WHERE id = $1")
                .bind(account_id)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to fetch balance")?;
            tx.rollback().await.context("Failed to roll back")?;

            return match current {
                Some(row) => Ok(BalanceUpdate::Rejected {
                    balance: row.try_get("balance").context("Invalid balance")?,
                }),
                None => Ok(BalanceUpdate::AccountNotFound),
            };
        };

        let balance_after: Cents = row.try_get("balance").context("Invalid balance")?;
        let transaction = Self::append_transaction(
            &mut tx,
            account_id,
            transaction_type,
            amount_cents,
            balance_after,
            Utc::now(),
        )
        .await?;

        tx.commit()
            .await
            .context("Failed to commit balance update")?;

        Ok(BalanceUpdate::Applied(transaction))
    }

    async fn append_transaction(
        conn: &mut AnyConnection,
        account_id: AccountId,
        transaction_type: TransactionType,
        amount_cents: Cents,
        balance_after_cents: Cents,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions (account_id, type, amount, balance_after, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(account_id)
        .bind(transaction_type.as_str())
        .bind(amount_cents)
        .bind(balance_after_cents)
        .bind(timestamp.to_rfc3339())
        .fetch_one(&mut *conn)
        .await
        .context("Failed to append transaction")?;

        Ok(Transaction {
            id: row.try_get("id").context("Invalid transaction ID")?,
            account_id,
            transaction_type,
            amount_cents,
            balance_after_cents,
            timestamp,
        })
    }

    // ========================
    // History
    // ========================

    /// Most recent transactions for an account, newest first.
    pub async fn list_recent_transactions(
        &self,
        account_id: AccountId,
        limit: u32,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, type, amount, balance_after, timestamp
            FROM transactions
            WHERE account_id = $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(account_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Full history for an account, oldest first.
    pub async fn list_transactions_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, type, amount, balance_after, timestamp
            FROM transactions
            WHERE account_id = $1
            ORDER BY id
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions for account")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Total number of recorded transactions.
    pub async fn count_transactions(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM transactions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count transactions")?;

        Ok(row.try_get("count")?)
    }

    fn row_to_transaction(row: &AnyRow) -> Result<Transaction> {
        let type_str: String = row.try_get("type")?;
        let timestamp_str: String = row.try_get("timestamp")?;

        Ok(Transaction {
            id: row.try_get("id").context("Invalid transaction ID")?,
            account_id: row.try_get("account_id").context("Invalid account ID")?,
            transaction_type: TransactionType::from_str(&type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction type: {}", type_str))?,
            amount_cents: row.try_get("amount").context("Invalid amount")?,
            balance_after_cents: row
                .try_get("balance_after")
                .context("Invalid balance_after")?,
            timestamp: parse_timestamp(&timestamp_str).context("Invalid timestamp")?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

/// URL scheme only, so credentials never end up in error messages.
fn scheme(url: &str) -> &str {
    url.split_once(':').map_or(url, |(scheme, _)| scheme)
}
