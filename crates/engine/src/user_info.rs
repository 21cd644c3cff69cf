//! Read model returned by `Engine::user_info`: balance, owned merch and the
//! coin history of one account.

use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub coins: i64,
    pub inventory: Vec<InventoryItem>,
    pub coin_history: CoinHistory,
}

/// How many units of one catalog item an account owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinHistory {
    /// Newest first.
    pub received: Vec<CoinMovement>,
    /// Newest first.
    pub sent: Vec<CoinMovement>,
}

/// One transfer seen from one side: `counterparty` is the sender for a
/// received movement and the recipient for a sent one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct CoinMovement {
    pub counterparty: String,
    pub amount: i64,
}
