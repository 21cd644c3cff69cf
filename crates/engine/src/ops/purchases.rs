use crate::{BuyItemCmd, OpContext, PurchaseId, ResultEngine, store};

use super::Engine;

impl Engine {
    /// Charge `cmd.actor_id` the catalog price of `cmd.item_id` and record
    /// the purchase.
    ///
    /// Errors: `ItemNotFound`, `InsufficientFunds`, `AccountNotFound` (unknown
    /// actor), `Cancelled`, `Storage`. There is never a charge without a
    /// purchase row, nor a purchase row without a charge.
    pub async fn buy_item(&self, ctx: &OpContext, cmd: BuyItemCmd) -> ResultEngine<PurchaseId> {
        let BuyItemCmd { actor_id, item_id } = cmd;

        let purchase_id = self
            .with_tx(ctx, "buy_item", move |_engine, db_tx| {
                Box::pin(async move {
                    let price = store::read_price(db_tx, item_id).await?;
                    store::debit(db_tx, actor_id, price).await?;
                    store::record_purchase(db_tx, actor_id, item_id).await
                })
            })
            .await?;

        tracing::debug!(actor_id, item_id, purchase_id, "item bought");
        Ok(purchase_id)
    }
}
