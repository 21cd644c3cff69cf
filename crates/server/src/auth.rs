//! `POST /api/auth`: log in, registering the account on first use.

use api_types::auth::{AuthRequest, AuthResponse};
use axum::{Json, extract::State};
use engine::{Account, EngineError};

use crate::{ServerError, password, server::ServerState};

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, ServerError> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(ServerError::Generic(
            "username and password are required".to_string(),
        ));
    }

    let ctx = state.op_context();
    let account = match state.engine.credentials(&ctx, username).await {
        Ok(credentials) => {
            let verified =
                password::verify_blocking(payload.password.clone(), credentials.password_hash)
                    .await?;
            if !verified {
                tracing::warn!(handle = %credentials.handle, "wrong password");
                return Err(ServerError::Unauthorized);
            }
            state.engine.account(&ctx, credentials.account_id).await?
        }
        Err(err) if err.is_not_found() => register(&state, username, &payload.password).await?,
        Err(err) => return Err(err.into()),
    };

    Ok(Json(AuthResponse {
        id: account.id,
        username: account.handle,
        coins: account.coins,
    }))
}

async fn register(
    state: &ServerState,
    username: &str,
    password: &str,
) -> Result<Account, ServerError> {
    let hash = password::hash_blocking(password.to_string(), state.config.password_cost).await?;
    let registered = state
        .engine
        .register_account(
            &state.op_context(),
            username,
            &hash,
            state.config.starting_coins,
        )
        .await;

    match registered {
        Ok(account) => {
            tracing::info!(account_id = account.id, handle = %account.handle, "account registered");
            Ok(account)
        }
        // Lost a registration race for the same handle.
        Err(EngineError::AlreadyExists(_)) => Err(ServerError::Unauthorized),
        Err(err) => Err(err.into()),
    }
}
