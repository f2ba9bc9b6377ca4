use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::api::create_router;
use crate::application::LedgerService;
use crate::config::Config;
use crate::domain::{cents_from_decimal, format_cents, AccountId};

/// Banking Ledger - accounts, deposits, withdrawals and history over SQL
#[derive(Parser)]
#[command(name = "banking-ledger")]
#[command(about = "A small banking REST service backed by a relational database")]
#[command(version)]
pub struct Cli {
    /// Database URL (postgres://... or sqlite:...); overrides DATABASE_URL and DB_* variables
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (overrides HOST and PORT)
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },

    /// Create the database tables if they don't exist
    Init,

    /// Open a new account
    Create {
        /// Account holder name
        holder_name: String,

        /// Opening balance (e.g., "1000" or "12.50")
        #[arg(short, long, default_value = "0")]
        initial_balance: Decimal,
    },

    /// Deposit money into an account
    Deposit {
        account_id: AccountId,
        amount: Decimal,
    },

    /// Withdraw money from an account
    Withdraw {
        account_id: AccountId,
        amount: Decimal,
    },

    /// Show the balance of an account
    Balance { account_id: AccountId },

    /// List the most recent transactions of an account
    History {
        account_id: AccountId,

        /// Maximum number of transactions to show (default 10, max 100)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Verify that every balance agrees with its transaction history
    Check,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::from_env().context("Invalid configuration")?;
        if let Some(url) = self.database_url {
            config.database.url = Some(url);
        }

        let database_url = config.database.url();
        let pool_settings = config.pool_settings();

        match self.command {
            Commands::Serve { listen } => {
                let listen_addr = match listen {
                    Some(addr) => addr,
                    None => config.listen_addr().await?,
                };
                info!("Database: {}", config.database.redacted_url());

                let service = LedgerService::init(&database_url, &pool_settings).await?;
                info!("Database ready");

                serve(Arc::new(service), listen_addr).await?;
            }

            Commands::Init => {
                LedgerService::init(&database_url, &pool_settings).await?;
                println!("Database initialized: {}", config.database.redacted_url());
            }

            Commands::Create {
                holder_name,
                initial_balance,
            } => {
                let service = LedgerService::init(&database_url, &pool_settings).await?;
                let initial_balance = cents_from_decimal(initial_balance)?;
                let account = service.create_account(&holder_name, initial_balance).await?;
                println!(
                    "Created account {} for {} with balance {}",
                    account.id,
                    account.holder_name,
                    format_cents(account.balance_cents)
                );
            }

            Commands::Deposit { account_id, amount } => {
                let service = LedgerService::connect(&database_url, &pool_settings).await?;
                let tx = service
                    .deposit(account_id, cents_from_decimal(amount)?)
                    .await?;
                println!(
                    "Deposited {} into account {}; new balance {}",
                    format_cents(tx.amount_cents),
                    account_id,
                    format_cents(tx.balance_after_cents)
                );
            }

            Commands::Withdraw { account_id, amount } => {
                let service = LedgerService::connect(&database_url, &pool_settings).await?;
                let tx = service
                    .withdraw(account_id, cents_from_decimal(amount)?)
                    .await?;
                println!(
                    "Withdrew {} from account {}; new balance {}",
                    format_cents(tx.amount_cents),
                    account_id,
                    format_cents(tx.balance_after_cents)
                );
            }

            Commands::Balance { account_id } => {
                let service = LedgerService::connect(&database_url, &pool_settings).await?;
                let account = service.get_balance(account_id).await?;
                println!(
                    "{:<6} {:<30} {:>15}  opened {}",
                    account.id,
                    account.holder_name,
                    format_cents(account.balance_cents),
                    account.created_at.format("%Y-%m-%d %H:%M")
                );
            }

            Commands::History { account_id, limit } => {
                let service = LedgerService::connect(&database_url, &pool_settings).await?;
                let history = service.transaction_history(account_id, limit).await?;

                if history.is_empty() {
                    println!("No transactions for account {}", account_id);
                    return Ok(());
                }

                println!(
                    "{:<8} {:<20} {:<12} {:>15} {:>15}",
                    "ID", "DATE", "TYPE", "AMOUNT", "BALANCE"
                );
                for tx in history {
                    println!(
                        "{:<8} {:<20} {:<12} {:>15} {:>15}",
                        tx.id,
                        tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        tx.transaction_type,
                        format_cents(tx.amount_cents),
                        format_cents(tx.balance_after_cents)
                    );
                }
            }

            Commands::Check => {
                let service = LedgerService::connect(&database_url, &pool_settings).await?;
                let report = service.verify_integrity().await?;

                println!("Accounts:     {}", report.account_count);
                println!("Transactions: {}", report.transaction_count);

                if !report.is_healthy() {
                    for id in &report.mismatched_accounts {
                        println!("  MISMATCH: account {}", id);
                    }
                    bail!(
                        "{} account(s) disagree with their transaction history",
                        report.mismatched_accounts.len()
                    );
                }
                println!("Ledger is consistent");
            }
        }

        Ok(())
    }
}

/// Serve the HTTP API until Ctrl-C.
pub async fn serve(service: Arc<LedgerService>, listen_addr: SocketAddr) -> Result<()> {
    let app = create_router(Arc::clone(&service));

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;
    info!("Banking ledger listening on {}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    service.repository().close().await;
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Graceful shutdown initiated");
}
