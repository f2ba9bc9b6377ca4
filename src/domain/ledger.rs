use super::{Account, AccountId, Cents, Transaction};

/// Number of history entries returned when the caller gives no limit.
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

/// Upper bound on a single history page.
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// Resolve the requested history page size.
/// Missing means the default; anything above the maximum is capped.
pub fn resolve_history_limit(requested: Option<u32>) -> Result<u32, HistoryLimitError> {
    match requested {
        None => Ok(DEFAULT_HISTORY_LIMIT),
        Some(0) => Err(HistoryLimitError::Zero),
        Some(n) => Ok(n.min(MAX_HISTORY_LIMIT)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryLimitError {
    Zero,
}

impl std::fmt::Display for HistoryLimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryLimitError::Zero => write!(f, "limit must be at least 1"),
        }
    }
}

impl std::error::Error for HistoryLimitError {}

/// Replay a transaction history and compute the resulting balance.
/// Balance = sum of deposits - sum of withdrawals
pub fn replay_balance(transactions: &[Transaction]) -> Cents {
    transactions.iter().fold(0, |balance, tx| {
        balance + tx.transaction_type.signed(tx.amount_cents)
    })
}

/// Check that an account's stored balance agrees with its history.
///
/// Two rules must hold: replaying the history gives the stored balance, and
/// the newest transaction's snapshot equals the stored balance.
/// `history` may be in any order.
pub fn balance_matches_history(account: &Account, history: &[Transaction]) -> bool {
    if replay_balance(history) != account.balance_cents {
        return false;
    }

    match history.iter().max_by_key(|tx| tx.id) {
        Some(newest) => newest.balance_after_cents == account.balance_cents,
        None => true,
    }
}

/// Summary of a full ledger integrity scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub account_count: i64,
    pub transaction_count: i64,
    pub mismatched_accounts: Vec<AccountId>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.mismatched_accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::TransactionType;

    fn make_tx(id: i64, tt: TransactionType, amount: Cents, after: Cents) -> Transaction {
        Transaction {
            id,
            account_id: 1,
            transaction_type: tt,
            amount_cents: amount,
            balance_after_cents: after,
            timestamp: Utc::now(),
        }
    }

    fn make_account(balance: Cents) -> Account {
        Account {
            id: 1,
            holder_name: "Ada".into(),
            balance_cents: balance,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_history_limit() {
        assert_eq!(resolve_history_limit(None), Ok(DEFAULT_HISTORY_LIMIT));
        assert_eq!(resolve_history_limit(Some(2)), Ok(2));
        assert_eq!(resolve_history_limit(Some(5000)), Ok(MAX_HISTORY_LIMIT));
        assert_eq!(resolve_history_limit(Some(0)), Err(HistoryLimitError::Zero));
    }

    #[test]
    fn test_replay_balance_empty() {
        assert_eq!(replay_balance(&[]), 0);
    }

    #[test]
    fn test_replay_balance_mixed() {
        let history = vec![
            make_tx(1, TransactionType::Deposit, 100000, 100000),
            make_tx(2, TransactionType::Deposit, 50000, 150000),
            make_tx(3, TransactionType::Withdrawal, 20000, 130000),
        ];
        assert_eq!(replay_balance(&history), 130000);
    }

    #[test]
    fn test_balance_matches_history() {
        // Newest first, the way history pages come back from the store
        let history = vec![
            make_tx(2, TransactionType::Withdrawal, 20000, 80000),
            make_tx(1, TransactionType::Deposit, 100000, 100000),
        ];
        assert!(balance_matches_history(&make_account(80000), &history));
        assert!(!balance_matches_history(&make_account(100000), &history));
    }

    #[test]
    fn test_stale_snapshot_is_a_mismatch() {
        // Sums agree but the newest snapshot does not
        let history = vec![
            make_tx(1, TransactionType::Deposit, 100000, 100000),
            make_tx(2, TransactionType::Withdrawal, 20000, 100000),
        ];
        assert!(!balance_matches_history(&make_account(80000), &history));
    }

    #[test]
    fn test_account_without_history() {
        assert!(balance_matches_history(&make_account(0), &[]));
        assert!(!balance_matches_history(&make_account(500), &[]));
    }
}
