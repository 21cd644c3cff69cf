//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InsufficientFunds`] when a debit would leave a balance below zero.
//! - [`AccountNotFound`] / [`ItemNotFound`] when a referenced row is missing.
//! - [`AlreadyExists`] when a unique key (account handle, item name) collides.
//! - [`InvalidInput`] when a required name is blank.
//! - [`Storage`] for every other persistence failure.
//!
//! Every error aborts the enclosing transaction: no partial effect is ever
//! committed.
//!
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`AccountNotFound`]: EngineError::AccountNotFound
//!  [`ItemNotFound`]: EngineError::ItemNotFound
//!  [`AlreadyExists`]: EngineError::AlreadyExists
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`Storage`]: EngineError::Storage
use sea_orm::{DbErr, RuntimeErr, SqlErr, sqlx::error::ErrorKind};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("\"{0}\" already exists!")]
    AlreadyExists(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),
    #[error("Operation cancelled: {0}")]
    Cancelled(String),
    #[error(transparent)]
    Storage(#[from] DbErr),
}

impl EngineError {
    /// `true` for both account and item lookups that found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AccountNotFound(_) | Self::ItemNotFound(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::AccountNotFound(a), Self::AccountNotFound(b)) => a == b,
            (Self::ItemNotFound(a), Self::ItemNotFound(b)) => a == b,
            (Self::AlreadyExists(a), Self::AlreadyExists(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidTransfer(a), Self::InvalidTransfer(b)) => a == b,
            (Self::Cancelled(a), Self::Cancelled(b)) => a == b,
            (Self::Storage(a), Self::Storage(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// Returns `true` when the storage engine rejected a write because a `CHECK`
/// constraint failed.
///
/// The driver error kind is authoritative; the message match covers drivers
/// that report the violation without an extended code.
pub(crate) fn is_check_violation(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Exec(runtime) | DbErr::Query(runtime) => runtime,
        _ => return false,
    };

    if let RuntimeErr::SqlxError(sqlx_err) = runtime
        && let Some(db_err) = sqlx_err.as_database_error()
        && matches!(db_err.kind(), ErrorKind::CheckViolation)
    {
        return true;
    }

    runtime
        .to_string()
        .to_ascii_lowercase()
        .contains("check constraint")
}

/// Returns `true` when a unique index rejected the write.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Map a failed balance write onto the engine taxonomy: a check-constraint
/// violation becomes the error built by `on_check`, anything else stays a
/// [`EngineError::Storage`].
pub(crate) fn classify_check(err: DbErr, on_check: impl FnOnce() -> EngineError) -> EngineError {
    if is_check_violation(&err) {
        return on_check();
    }
    EngineError::Storage(err)
}

/// Map a failed insert onto the engine taxonomy: a unique-key collision
/// becomes the error built by `on_unique`.
pub(crate) fn classify_unique(
    err: DbErr,
    on_unique: impl FnOnce() -> EngineError,
) -> EngineError {
    if is_unique_violation(&err) {
        return on_unique();
    }
    EngineError::Storage(err)
}
