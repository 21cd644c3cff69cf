use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use tokio_util::sync::CancellationToken;

use std::{sync::Arc, time::Duration};

use crate::{ServerError, auth, info, password, payments};
use engine::{AccountId, Engine, OpContext, STARTING_COINS};

/// Knobs of the HTTP layer that come from configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Upper bound for each engine call made while serving a request.
    pub request_timeout: Duration,
    /// Opening balance of accounts registered through `/api/auth`.
    pub starting_coins: i64,
    /// bcrypt cost for passwords of newly registered accounts.
    pub password_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            starting_coins: STARTING_COINS,
            password_cost: password::DEFAULT_COST,
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub config: ServerConfig,
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// Context for one engine call: bounded by the request timeout and
    /// cancelled on server shutdown.
    pub fn op_context(&self) -> OpContext {
        OpContext::new()
            .with_cancellation(self.shutdown.child_token())
            .with_timeout(self.config.request_timeout)
    }
}

/// Identity attached to authenticated requests.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: AccountId,
    pub handle: String,
}

async fn authenticate(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(ServerError::Unauthorized);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(ServerError::Unauthorized);
    }

    let credentials = match state
        .engine
        .credentials(&state.op_context(), auth_header.username())
        .await
    {
        Ok(credentials) => credentials,
        Err(err) if err.is_not_found() => {
            tracing::warn!(handle = auth_header.username(), "unknown user");
            return Err(ServerError::Unauthorized);
        }
        Err(err) => return Err(err.into()),
    };

    let verified = password::verify_blocking(
        auth_header.password().to_string(),
        credentials.password_hash,
    )
    .await?;
    if !verified {
        tracing::warn!(handle = %credentials.handle, "wrong password");
        return Err(ServerError::Unauthorized);
    }

    request.extensions_mut().insert(AuthUser {
        id: credentials.account_id,
        handle: credentials.handle,
    });
    Ok(next.run(request).await)
}

async fn healthcheck() -> &'static str {
    "STATUS: OK"
}

/// Build the `/api` router over `engine`.
pub fn router(engine: Arc<Engine>, config: ServerConfig, shutdown: CancellationToken) -> Router {
    let state = ServerState {
        engine,
        config,
        shutdown,
    };

    let protected = Router::new()
        .route("/sendCoin", post(payments::send_coin))
        .route("/buy/{item}", get(payments::buy))
        .route("/info", get(info::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let api = Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/auth", post(auth::login))
        .merge(protected)
        .with_state(state);

    Router::new().nest("/api", api)
}

pub async fn run(engine: Engine, config: ServerConfig, addr: &str, shutdown: CancellationToken) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, config, listener, shutdown).await {
        tracing::error!("server failed: {err}");
    }
}

/// Serve until `shutdown` is cancelled. Cancelling it also cancels the
/// engine calls still in flight.
pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
    shutdown: CancellationToken,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let app = router(Arc::new(engine), config, shutdown.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

pub fn spawn_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
    shutdown: CancellationToken,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, config, listener, shutdown).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
