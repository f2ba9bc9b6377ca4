// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use banking_ledger::application::LedgerService;
use banking_ledger::domain::Account;
use banking_ledger::storage::PoolSettings;
use tempfile::TempDir;

/// Helper to create a test service with a temporary SQLite database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let url = format!("sqlite:{}?mode=rwc", db_path.display());
    let service = LedgerService::init(&url, &PoolSettings::default()).await?;
    Ok((service, temp_dir))
}

/// Open an account with a balance given in whole currency units
pub async fn open_account(service: &LedgerService, name: &str, units: i64) -> Result<Account> {
    Ok(service.create_account(name, units * 100).await?)
}
