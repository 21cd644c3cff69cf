//! bcrypt password hashes.
//!
//! Hashing is CPU bound on purpose, so the async helpers move it off the
//! runtime with `spawn_blocking`.

pub use bcrypt::{BcryptError, DEFAULT_COST};

use crate::ServerError;

/// Hash `password` with `cost` rounds and a fresh random salt.
pub fn hash(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check `password` against a stored bcrypt hash. Malformed stored values
/// never verify.
#[must_use]
pub fn verify(password: &str, stored: &str) -> bool {
    match bcrypt::verify(password, stored) {
        Ok(matches) => matches,
        Err(err) => {
            tracing::warn!("unusable password hash: {err}");
            false
        }
    }
}

pub(crate) async fn hash_blocking(password: String, cost: u32) -> Result<String, ServerError> {
    tokio::task::spawn_blocking(move || hash(&password, cost))
        .await
        .map_err(|err| ServerError::Internal(format!("hashing task failed: {err}")))?
        .map_err(|err| ServerError::Internal(format!("cannot hash password: {err}")))
}

pub(crate) async fn verify_blocking(password: String, stored: String) -> Result<bool, ServerError> {
    tokio::task::spawn_blocking(move || verify(&password, &stored))
        .await
        .map_err(|err| ServerError::Internal(format!("verification task failed: {err}")))
}
