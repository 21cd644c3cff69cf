use crate::{
    EngineError, OpContext, ResultEngine, TransferCmd, TransferId, store,
    util::{normalize_handle, require_positive},
};

use super::Engine;

impl Engine {
    /// Move `cmd.amount` coins from `cmd.actor_id` to the account named
    /// `cmd.to_handle`, recording the movement.
    ///
    /// Steps, all in one transaction: resolve recipient, debit sender,
    /// credit recipient, append the transfer record.
    ///
    /// The recipient is resolved before the debit so a self-transfer is
    /// refused without touching any balance. As a consequence an unknown
    /// recipient wins over a short balance: a sender who cannot cover
    /// `amount` and names a missing handle gets `AccountNotFound`, not
    /// `InsufficientFunds`.
    ///
    /// Errors:
    /// - `InvalidAmount` for `amount <= 0` (checked before any I/O);
    /// - `AccountNotFound` when the recipient handle does not exist;
    /// - `InvalidTransfer` when the recipient is the sender;
    /// - `InsufficientFunds` when the debit would leave a negative balance;
    /// - `Cancelled` / `Storage` otherwise.
    ///
    /// Any error leaves both balances and the transfer log untouched.
    ///
    /// Not idempotent: calling it twice with the same arguments moves the
    /// coins twice and writes two records.
    pub async fn transfer(&self, ctx: &OpContext, cmd: TransferCmd) -> ResultEngine<TransferId> {
        let TransferCmd {
            actor_id,
            to_handle,
            amount,
        } = cmd;
        let amount = require_positive(amount, "amount")?;
        let to_handle = normalize_handle(&to_handle)?;

        let transfer_id = self
            .with_tx(ctx, "transfer", move |_engine, db_tx| {
                Box::pin(async move {
                    let recipient = store::find_account_by_handle(db_tx, &to_handle).await?;
                    if recipient.id == actor_id {
                        return Err(EngineError::InvalidTransfer(
                            "cannot transfer coins to yourself".to_string(),
                        ));
                    }

                    store::debit(db_tx, actor_id, amount).await?;
                    store::credit(db_tx, recipient.id, amount).await?;
                    store::record_transfer(db_tx, actor_id, recipient.id, amount).await
                })
            })
            .await?;

        tracing::debug!(actor_id, transfer_id, amount, "coins transferred");
        Ok(transfer_id)
    }
}
