//! JSON bodies exchanged with the merch store HTTP API.
//!
//! Field names follow the public wire format (`toUser`, `coinHistory`, ...),
//! so most structs carry a `rename_all = "camelCase"`.

use serde::{Deserialize, Serialize};

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthRequest {
        pub username: String,
        pub password: String,
    }

    /// Account returned after a successful login or registration.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub id: i32,
        pub username: String,
        pub coins: i64,
    }
}

pub mod payments {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SendCoinRequest {
        pub to_user: String,
        pub amount: i64,
    }
}

pub mod info {
    use super::*;

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InfoResponse {
        pub coins: i64,
        pub inventory: Vec<InventoryEntry>,
        pub coin_history: CoinHistory,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct InventoryEntry {
        /// Catalog item name.
        #[serde(rename = "type")]
        pub kind: String,
        pub quantity: i64,
    }

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CoinHistory {
        pub received: Vec<Received>,
        pub sent: Vec<Sent>,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Received {
        pub from_user: String,
        pub amount: i64,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Sent {
        pub to_user: String,
        pub amount: i64,
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: String,
}
