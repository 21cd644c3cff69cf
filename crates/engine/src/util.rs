//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They run before a
//! transaction is opened, so a malformed request never touches the store.

use crate::{EngineError, ResultEngine};

/// Reject zero and negative amounts.
pub(crate) fn require_positive(amount: i64, label: &str) -> ResultEngine<i64> {
    if amount <= 0 {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(amount)
}

/// Trim a handle; blank handles name no account.
pub(crate) fn normalize_handle(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::AccountNotFound(
            "handle must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim a required name used when creating rows.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert!(require_positive(0, "amount").is_err());
        assert!(require_positive(-5, "amount").is_err());
        assert_eq!(require_positive(5, "amount"), Ok(5));
    }

    #[test]
    fn handles_are_trimmed() {
        assert_eq!(normalize_handle("  bob "), Ok("bob".to_string()));
        assert_eq!(
            normalize_handle("   "),
            Err(EngineError::AccountNotFound(
                "handle must not be empty".to_string()
            ))
        );
    }

    #[test]
    fn blank_names_are_invalid() {
        assert_eq!(
            normalize_required_name(" ", "item name"),
            Err(EngineError::InvalidInput(
                "item name must not be empty".to_string()
            ))
        );
        assert_eq!(
            normalize_required_name(" cup ", "item name"),
            Ok("cup".to_string())
        );
    }
}
