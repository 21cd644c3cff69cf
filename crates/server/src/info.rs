use api_types::info::{CoinHistory, InfoResponse, InventoryEntry, Received, Sent};
use axum::{Extension, Json, extract::State};

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

/// `GET /api/info`: balance, inventory and coin history of the caller.
pub async fn get(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<InfoResponse>, ServerError> {
    let info = state.engine.user_info(&state.op_context(), user.id).await?;

    Ok(Json(InfoResponse {
        coins: info.coins,
        inventory: info
            .inventory
            .into_iter()
            .map(|item| InventoryEntry {
                kind: item.name,
                quantity: item.quantity,
            })
            .collect(),
        coin_history: CoinHistory {
            received: info
                .coin_history
                .received
                .into_iter()
                .map(|m| Received {
                    from_user: m.counterparty,
                    amount: m.amount,
                })
                .collect(),
            sent: info
                .coin_history
                .sent
                .into_iter()
                .map(|m| Sent {
                    to_user: m.counterparty,
                    amount: m.amount,
                })
                .collect(),
        },
    }))
}
