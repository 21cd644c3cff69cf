//! Transfer records: one immutable row per successful coin transfer.
//!
//! A transfer references two accounts, so the relations are named by role
//! (`Sender` / `Recipient`) instead of by entity.

use chrono::Utc;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::AccountId;

pub type TransferId = i32;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub amount: i64,
    pub from_account_id: i32,
    pub to_account_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::FromAccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::ToAccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Recipient,
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn new_record(from: AccountId, to: AccountId, amount: i64) -> Self {
        Self {
            id: ActiveValue::NotSet,
            amount: ActiveValue::Set(amount),
            from_account_id: ActiveValue::Set(from),
            to_account_id: ActiveValue::Set(to),
            created_at: ActiveValue::Set(Utc::now()),
        }
    }
}
