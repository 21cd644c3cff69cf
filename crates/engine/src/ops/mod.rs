use std::{future::Future, pin::Pin};

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::{OpContext, ResultEngine};

mod accounts;
mod catalog;
mod purchases;
mod transfers;
mod user_info;

/// Future returned by the body of [`Engine::with_tx`]. It borrows the engine
/// and the open transaction for its whole lifetime.
pub(crate) type TxFuture<'a, T> = Pin<Box<dyn Future<Output = ResultEngine<T>> + Send + 'a>>;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Run `body` inside one database transaction.
    ///
    /// - commits when `body` returns `Ok`;
    /// - rolls back when `body` returns `Err`, or when `ctx` is cancelled or
    ///   its deadline elapses before `body` finishes;
    /// - on panic the transaction is dropped while unwinding, which rolls it
    ///   back.
    ///
    /// Acquiring the transaction is bounded by `ctx` too, so a saturated pool
    /// cannot outlive the caller's deadline. Commit itself is not raced.
    pub(crate) async fn with_tx<T, F>(&self, ctx: &OpContext, op: &str, body: F) -> ResultEngine<T>
    where
        F: for<'a> FnOnce(&'a Engine, &'a DatabaseTransaction) -> TxFuture<'a, T>,
    {
        let db_tx = ctx
            .run(async { Ok(self.database.begin().await?) })
            .await?;

        let outcome = ctx.run(body(self, &db_tx)).await;

        match outcome {
            Ok(value) => {
                db_tx.commit().await?;
                tracing::debug!(op, "transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = db_tx.rollback().await {
                    tracing::warn!(op, error = %rollback_err, "rollback failed");
                }
                tracing::debug!(op, error = %err, "transaction rolled back");
                Err(err)
            }
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
