//! Session-slot purchase rules: payment statuses, amounts, currencies.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const PAYMENT_PENDING: &str = "PENDING";
pub const PAYMENT_COMPLETED: &str = "COMPLETED";
pub const PAYMENT_DECLINED: &str = "DECLINED";
pub const PAYMENT_FAILED: &str = "FAILED";
pub const PAYMENT_CANCELLED: &str = "CANCELLED";
pub const PAYMENT_REFUNDED: &str = "REFUNDED";

/// Every status a payment record may carry.
pub const VALID_PAYMENT_STATUSES: &[&str] = &[
    PAYMENT_PENDING,
    PAYMENT_COMPLETED,
    PAYMENT_DECLINED,
    PAYMENT_FAILED,
    PAYMENT_CANCELLED,
    PAYMENT_REFUNDED,
];

/// Largest number of slots a single purchase may add.
pub const MAX_SLOTS_PER_PURCHASE: i32 = 100;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Normalise a provider status (`"completed"` -> `"COMPLETED"`) and check it
/// against [`VALID_PAYMENT_STATUSES`].
pub fn normalize_status(status: &str) -> Result<String, CoreError> {
    let upper = status.trim().to_ascii_uppercase();
    if VALID_PAYMENT_STATUSES.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(CoreError::Validation(format!(
            "Invalid payment status '{status}'. Must be one of: {VALID_PAYMENT_STATUSES:?}"
        )))
    }
}

/// Only `COMPLETED` payments raise the quota.
pub fn is_completed(status: &str) -> bool {
    status == PAYMENT_COMPLETED
}

/// A pending payment can still be confirmed; every other status is terminal.
pub fn is_pending(status: &str) -> bool {
    status == PAYMENT_PENDING
}

pub fn validate_slots(slots: i32) -> Result<(), CoreError> {
    if slots < 1 || slots > MAX_SLOTS_PER_PURCHASE {
        return Err(CoreError::Validation(format!(
            "Slots must be between 1 and {MAX_SLOTS_PER_PURCHASE}, got {slots}"
        )));
    }
    Ok(())
}

/// Normalise an ISO-4217 currency code (three ASCII letters) to upper case.
pub fn normalize_currency(currency: &str) -> Result<String, CoreError> {
    let code = currency.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::Validation(format!(
            "Invalid currency code '{currency}'"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

/// Parse a decimal amount as reported by the payment provider (`"20.00"`,
/// `"7.5"`, `"12"`) into minor units.
///
/// At most two fractional digits are accepted; negative amounts are rejected.
pub fn parse_amount_cents(amount: &str) -> Result<i64, CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid amount '{amount}'"));

    let trimmed = amount.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };

    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(cents))
        .ok_or_else(invalid)
}
