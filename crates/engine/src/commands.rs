//! Command structs for the ledger write operations.
//!
//! The actor is always an explicit field: the engine trusts the id it is
//! given and performs no authentication of its own.

use crate::{AccountId, ItemId};

/// Move `amount` coins from `actor_id` to the account named `to_handle`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferCmd {
    pub actor_id: AccountId,
    pub to_handle: String,
    pub amount: i64,
}

impl TransferCmd {
    #[must_use]
    pub fn new(actor_id: AccountId, to_handle: impl Into<String>, amount: i64) -> Self {
        Self {
            actor_id,
            to_handle: to_handle.into(),
            amount,
        }
    }
}

/// Buy one unit of `item_id` for `actor_id` at the item's catalog price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuyItemCmd {
    pub actor_id: AccountId,
    pub item_id: ItemId,
}

impl BuyItemCmd {
    #[must_use]
    pub fn new(actor_id: AccountId, item_id: ItemId) -> Self {
        Self { actor_id, item_id }
    }
}
