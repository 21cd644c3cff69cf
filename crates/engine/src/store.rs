//! Balance store primitives.
//!
//! Every function here takes a `&DatabaseTransaction`: none of them can run
//! (or commit) outside the transaction scope opened by `Engine::with_tx`.
//!
//! Debits are a single `UPDATE ... SET coins = coins - amount`. The storage
//! engine evaluates `CHECK (coins >= 0)` on that write, which is what makes
//! two concurrent debits against the same account safe. There is no
//! read-then-compare on the application side.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*, sea_query::Expr};

use crate::{
    AccountId, EngineError, ItemId, PurchaseId, ResultEngine, TransferId, accounts, catalog_items,
    error::classify_check, purchases, transfers,
};

/// Decrease the balance of `account_id` by `amount`.
///
/// Fails with `InsufficientFunds` when the storage constraint rejects the
/// resulting balance and with `AccountNotFound` when no row was touched.
pub(crate) async fn debit(
    db_tx: &DatabaseTransaction,
    account_id: AccountId,
    amount: i64,
) -> ResultEngine<()> {
    let result = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::Coins,
            Expr::col(accounts::Column::Coins).sub(amount),
        )
        .filter(accounts::Column::Id.eq(account_id))
        .exec(db_tx)
        .await
        .map_err(|err| {
            classify_check(err, || {
                EngineError::InsufficientFunds(format!(
                    "account {account_id} cannot cover {amount} coins"
                ))
            })
        })?;

    if result.rows_affected == 0 {
        return Err(EngineError::AccountNotFound(format!(
            "account {account_id} not exists"
        )));
    }
    Ok(())
}

/// Increase the balance of `account_id` by `amount`.
pub(crate) async fn credit(
    db_tx: &DatabaseTransaction,
    account_id: AccountId,
    amount: i64,
) -> ResultEngine<()> {
    let result = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::Coins,
            Expr::col(accounts::Column::Coins).add(amount),
        )
        .filter(accounts::Column::Id.eq(account_id))
        .exec(db_tx)
        .await?;

    if result.rows_affected == 0 {
        return Err(EngineError::AccountNotFound(format!(
            "account {account_id} not exists"
        )));
    }
    Ok(())
}

/// Price of a catalog item.
pub(crate) async fn read_price(db_tx: &DatabaseTransaction, item_id: ItemId) -> ResultEngine<i64> {
    let item = catalog_items::Entity::find_by_id(item_id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::ItemNotFound(format!("item {item_id} not exists")))?;
    Ok(item.price)
}

pub(crate) async fn record_purchase(
    db_tx: &DatabaseTransaction,
    account_id: AccountId,
    item_id: ItemId,
) -> ResultEngine<PurchaseId> {
    let model = purchases::ActiveModel::new_record(account_id, item_id)
        .insert(db_tx)
        .await?;
    Ok(model.id)
}

pub(crate) async fn record_transfer(
    db_tx: &DatabaseTransaction,
    from: AccountId,
    to: AccountId,
    amount: i64,
) -> ResultEngine<TransferId> {
    let model = transfers::ActiveModel::new_record(from, to, amount)
        .insert(db_tx)
        .await?;
    Ok(model.id)
}

pub(crate) async fn find_account_by_handle(
    db_tx: &DatabaseTransaction,
    handle: &str,
) -> ResultEngine<accounts::Model> {
    accounts::Entity::find()
        .filter(accounts::Column::Handle.eq(handle))
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::AccountNotFound(handle.to_string()))
}

pub(crate) async fn find_account(
    db_tx: &DatabaseTransaction,
    account_id: AccountId,
) -> ResultEngine<accounts::Model> {
    accounts::Entity::find_by_id(account_id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::AccountNotFound(format!("account {account_id} not exists")))
}
