use sea_orm::{
    DatabaseTransaction, JoinType, QueryFilter, QueryOrder, QuerySelect, prelude::*,
    sea_query::Expr,
};

use crate::{
    AccountId, CoinHistory, CoinMovement, InventoryItem, OpContext, ResultEngine, UserInfo,
    accounts, catalog_items, purchases, store, transfers,
};

use super::Engine;

impl Engine {
    /// Balance, inventory and coin history of one account.
    ///
    /// All four reads share one transaction, so the view is consistent with
    /// itself even while transfers and purchases run concurrently.
    pub async fn user_info(&self, ctx: &OpContext, account_id: AccountId) -> ResultEngine<UserInfo> {
        self.with_tx(ctx, "user_info", move |_engine, db_tx| {
            Box::pin(async move {
                let account = store::find_account(db_tx, account_id).await?;
                let inventory = inventory(db_tx, account_id).await?;
                let received = movements(db_tx, account_id, Direction::Received).await?;
                let sent = movements(db_tx, account_id, Direction::Sent).await?;

                Ok(UserInfo {
                    coins: account.coins,
                    inventory,
                    coin_history: CoinHistory { received, sent },
                })
            })
        })
        .await
    }
}

async fn inventory(
    db_tx: &DatabaseTransaction,
    account_id: AccountId,
) -> ResultEngine<Vec<InventoryItem>> {
    let items = purchases::Entity::find()
        .select_only()
        .column_as(catalog_items::Column::Name, "name")
        .column_as(Expr::cust("COUNT(purchases.id)"), "quantity")
        .join(JoinType::InnerJoin, purchases::Relation::CatalogItems.def())
        .filter(purchases::Column::AccountId.eq(account_id))
        .group_by(catalog_items::Column::Name)
        .order_by_asc(catalog_items::Column::Name)
        .into_model::<InventoryItem>()
        .all(db_tx)
        .await?;
    Ok(items)
}

#[derive(Clone, Copy)]
enum Direction {
    Received,
    Sent,
}

/// Transfers touching `account_id` on one side, joined with the handle of
/// the account on the other side. Newest first.
async fn movements(
    db_tx: &DatabaseTransaction,
    account_id: AccountId,
    direction: Direction,
) -> ResultEngine<Vec<CoinMovement>> {
    let (counterparty, own_side) = match direction {
        Direction::Received => (
            transfers::Relation::Sender,
            transfers::Column::ToAccountId,
        ),
        Direction::Sent => (
            transfers::Relation::Recipient,
            transfers::Column::FromAccountId,
        ),
    };

    let rows = transfers::Entity::find()
        .select_only()
        .column_as(accounts::Column::Handle, "counterparty")
        .column_as(transfers::Column::Amount, "amount")
        .join(JoinType::InnerJoin, counterparty.def())
        .filter(own_side.eq(account_id))
        .order_by_desc(transfers::Column::CreatedAt)
        .order_by_desc(transfers::Column::Id)
        .into_model::<CoinMovement>()
        .all(db_tx)
        .await?;
    Ok(rows)
}
