//! Purchase records: one immutable row per successful `buy_item`.

use chrono::Utc;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{AccountId, ItemId};

pub type PurchaseId = i32;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account_id: i32,
    pub item_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::catalog_items::Entity",
        from = "Column::ItemId",
        to = "super::catalog_items::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    CatalogItems,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::catalog_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// A new purchase stamped with the current time.
    pub(crate) fn new_record(account_id: AccountId, item_id: ItemId) -> Self {
        Self {
            id: ActiveValue::NotSet,
            account_id: ActiveValue::Set(account_id),
            item_id: ActiveValue::Set(item_id),
            created_at: ActiveValue::Set(Utc::now()),
        }
    }
}
