use std::fmt;

use rust_decimal::Decimal;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Number of fractional digits kept for every amount and balance.
pub const CURRENCY_SCALE: u32 = 2;

/// Format cents as a human-readable currency string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Convert a decimal amount into cents.
///
/// Amounts with more than two fractional digits are rejected rather than
/// rounded, so the stored value is always exactly what the caller sent.
pub fn cents_from_decimal(amount: Decimal) -> Result<Cents, MoneyError> {
    let normalized = amount.normalize();
    if normalized.scale() > CURRENCY_SCALE {
        return Err(MoneyError::TooPrecise(amount));
    }

    let cents = normalized
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(MoneyError::OutOfRange(amount))?;

    i64::try_from(cents).map_err(|_| MoneyError::OutOfRange(amount))
}

/// Convert cents back into a decimal with currency precision.
pub fn cents_to_decimal(cents: Cents) -> Decimal {
    Decimal::new(cents, CURRENCY_SCALE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    TooPrecise(Decimal),
    OutOfRange(Decimal),
}

impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyError::TooPrecise(amount) => {
                write!(f, "amount {} has more than two decimal places", amount)
            }
            MoneyError::OutOfRange(amount) => write!(f, "amount {} is out of range", amount),
        }
    }
}

impl std::error::Error for MoneyError {}
