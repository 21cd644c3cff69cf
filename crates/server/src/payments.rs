use api_types::payments::SendCoinRequest;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{BuyItemCmd, ItemId, TransferCmd};

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

/// `POST /api/sendCoin`
pub async fn send_coin(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<SendCoinRequest>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .transfer(
            &state.op_context(),
            TransferCmd::new(user.id, payload.to_user, payload.amount),
        )
        .await?;

    Ok(StatusCode::OK)
}

/// `GET /api/buy/{item}`, where `item` is the catalog item id.
pub async fn buy(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(item): Path<String>,
) -> Result<StatusCode, ServerError> {
    let item_id: ItemId = item
        .parse()
        .map_err(|_| ServerError::Generic(format!("invalid item id: {item}")))?;

    state
        .engine
        .buy_item(&state.op_context(), BuyItemCmd::new(user.id, item_id))
        .await?;

    Ok(StatusCode::OK)
}
