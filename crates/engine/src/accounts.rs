//! Accounts: the holders of coin balances.
//!
//! The `coins` column is owned by the balance store (see `store`): nothing
//! else in the engine writes it after registration.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub type AccountId = i32;

/// Coins granted to an account opened through the public login flow.
pub const STARTING_COINS: i64 = 1000;

/// A read-only snapshot of an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub handle: String,
    pub coins: i64,
}

/// What the delivery layer needs to authenticate a handle.
///
/// The engine never hashes or verifies passwords itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub account_id: AccountId,
    pub handle: String,
    pub password_hash: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub handle: String,
    pub password_hash: String,
    pub coins: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchases::Entity")]
    Purchases,
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            handle: model.handle,
            coins: model.coins,
        }
    }
}

impl From<Model> for Credentials {
    fn from(model: Model) -> Self {
        Self {
            account_id: model.id,
            handle: model.handle,
            password_hash: model.password_hash,
        }
    }
}
