use sea_orm::{ActiveValue, prelude::*};

use crate::{
    Account, AccountId, Credentials, EngineError, OpContext, ResultEngine, accounts,
    error::classify_unique, store,
    util::{normalize_handle, normalize_required_name},
};

use super::Engine;

impl Engine {
    /// Open a new account with `opening_coins` coins.
    ///
    /// `password_hash` is stored as given; hashing belongs to the caller.
    /// Fails with `AlreadyExists` when the handle is taken.
    pub async fn register_account(
        &self,
        ctx: &OpContext,
        handle: &str,
        password_hash: &str,
        opening_coins: i64,
    ) -> ResultEngine<Account> {
        let handle = normalize_required_name(handle, "handle")?;
        if opening_coins < 0 {
            return Err(EngineError::InvalidAmount(
                "opening balance must be >= 0".to_string(),
            ));
        }
        let password_hash = password_hash.to_string();

        let account = self
            .with_tx(ctx, "register_account", move |_engine, db_tx| {
                Box::pin(async move {
                    let model = accounts::ActiveModel {
                        id: ActiveValue::NotSet,
                        handle: ActiveValue::Set(handle.clone()),
                        password_hash: ActiveValue::Set(password_hash),
                        coins: ActiveValue::Set(opening_coins),
                    }
                    .insert(db_tx)
                    .await
                    .map_err(|err| classify_unique(err, || EngineError::AlreadyExists(handle)))?;
                    Ok(Account::from(model))
                })
            })
            .await?;

        tracing::debug!(account_id = account.id, handle = %account.handle, "account registered");
        Ok(account)
    }

    /// Look up the stored credentials of `handle`.
    pub async fn credentials(&self, ctx: &OpContext, handle: &str) -> ResultEngine<Credentials> {
        let handle = normalize_handle(handle)?;
        self.with_tx(ctx, "credentials", move |_engine, db_tx| {
            Box::pin(async move {
                let model = store::find_account_by_handle(db_tx, &handle).await?;
                Ok(Credentials::from(model))
            })
        })
        .await
    }

    /// Return an account snapshot from DB.
    pub async fn account(&self, ctx: &OpContext, account_id: AccountId) -> ResultEngine<Account> {
        self.with_tx(ctx, "account", move |_engine, db_tx| {
            Box::pin(async move {
                let model = store::find_account(db_tx, account_id).await?;
                Ok(Account::from(model))
            })
        })
        .await
    }
}
