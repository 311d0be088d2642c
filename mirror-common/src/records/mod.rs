//! Legacy records: receipts, gifts and registrations
//!
//! Each record type is stored as one JSON array (see
//! [`RecordCollection`](crate::store::RecordCollection)). The services here
//! add id generation, input validation and status transitions on top.

pub mod gifts;
pub mod receipts;
pub mod registrations;

pub use gifts::{Gift, GiftService, GiftStatus, NewGift};
pub use receipts::{NewReceipt, Receipt, ReceiptService, ReceiptStatus};
pub use registrations::{NewRegistration, Registration, RegistrationService, RegistrationStatus};

use crate::{Error, Result};

/// Trim `value` and reject it if empty
pub fn require_non_empty(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Normalize an email address (trimmed, lowercase) after a shape check
///
/// Only checks for a non-empty local part and a domain containing a dot;
/// deliverability is not verified.
pub fn normalize_email(field: &str, value: &str) -> Result<String> {
    let email = value.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(Error::InvalidInput(format!(
            "{} is not a valid email address: '{}'",
            field, value
        )));
    }
    Ok(email)
}

pub fn validate_amount(amount_cents: i64) -> Result<i64> {
    if amount_cents < 0 {
        return Err(Error::InvalidInput(format!(
            "amount_cents must not be negative (got {})",
            amount_cents
        )));
    }
    Ok(amount_cents)
}
