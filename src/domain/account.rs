use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

/// Store-assigned account identity.
pub type AccountId = i64;

/// A named balance-holding entity.
///
/// The balance never drops below zero and is only changed by deposits and
/// withdrawals recorded in the transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub holder_name: String,
    pub balance_cents: Cents,
    pub created_at: DateTime<Utc>,
}

/// Validate and normalize a holder name. Returns `None` for blank names.
pub fn normalize_holder_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_holder_name_trims() {
        assert_eq!(
            normalize_holder_name("  Ada Lovelace "),
            Some("Ada Lovelace".to_string())
        );
    }

    #[test]
    fn test_normalize_holder_name_rejects_blank() {
        assert_eq!(normalize_holder_name(""), None);
        assert_eq!(normalize_holder_name("   \t"), None);
    }
}
