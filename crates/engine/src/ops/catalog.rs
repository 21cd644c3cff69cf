use sea_orm::{ActiveValue, QueryOrder, prelude::*};

use crate::{
    CatalogItem, EngineError, OpContext, ResultEngine, catalog_items,
    error::classify_unique,
    util::{normalize_required_name, require_positive},
};

use super::Engine;

impl Engine {
    /// Add an item to the catalog. Names are unique.
    pub async fn add_item(
        &self,
        ctx: &OpContext,
        name: &str,
        price: i64,
    ) -> ResultEngine<CatalogItem> {
        let name = normalize_required_name(name, "item name")?;
        let price = require_positive(price, "price")?;

        self.with_tx(ctx, "add_item", move |_engine, db_tx| {
            Box::pin(async move {
                let model = catalog_items::ActiveModel {
                    id: ActiveValue::NotSet,
                    name: ActiveValue::Set(name.clone()),
                    price: ActiveValue::Set(price),
                }
                .insert(db_tx)
                .await
                .map_err(|err| classify_unique(err, || EngineError::AlreadyExists(name)))?;
                Ok(CatalogItem::from(model))
            })
        })
        .await
    }

    /// Every catalog item, ordered by id.
    pub async fn catalog(&self, ctx: &OpContext) -> ResultEngine<Vec<CatalogItem>> {
        self.with_tx(ctx, "catalog", |_engine, db_tx| {
            Box::pin(async move {
                let models = catalog_items::Entity::find()
                    .order_by_asc(catalog_items::Column::Id)
                    .all(db_tx)
                    .await?;
                Ok(models.into_iter().map(CatalogItem::from).collect())
            })
        })
        .await
    }
}
