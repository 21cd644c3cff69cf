//! Coin ledger of the merch store.
//!
//! The engine owns every mutation of account balances. Two operations sit on
//! top of the balance store:
//!
//! - [`Engine::transfer`] moves coins between two accounts.
//! - [`Engine::buy_item`] charges an account the price of a catalog item and
//!   records the purchase.
//!
//! Each operation runs inside exactly one database transaction. The
//! non-negativity of balances is a `CHECK` constraint evaluated by the
//! storage engine at write time, so concurrent debits against the same
//! account can never both succeed past the balance.

pub use accounts::{Account, AccountId, Credentials, STARTING_COINS};
pub use catalog_items::{CatalogItem, ItemId};
pub use commands::{BuyItemCmd, TransferCmd};
pub use context::OpContext;
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder};
pub use purchases::PurchaseId;
pub use transfers::TransferId;
pub use user_info::{CoinHistory, CoinMovement, InventoryItem, UserInfo};

mod accounts;
mod catalog_items;
mod commands;
mod context;
mod error;
mod ops;
mod purchases;
mod store;
mod transfers;
mod user_info;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
