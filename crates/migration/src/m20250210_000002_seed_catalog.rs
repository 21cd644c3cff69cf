//! Seeds the merch catalog.

use sea_orm::{ConnectionTrait, DbErr};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum CatalogItems {
    Table,
    Name,
    Price,
}

const CATALOG: [(&str, i64); 10] = [
    ("t-shirt", 80),
    ("cup", 20),
    ("book", 50),
    ("pen", 10),
    ("powerbank", 200),
    ("hoody", 300),
    ("umbrella", 200),
    ("socks", 10),
    ("wallet", 50),
    ("pink-hoody", 500),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let mut stmt = Query::insert()
            .into_table(CatalogItems::Table)
            .columns([CatalogItems::Name, CatalogItems::Price])
            .to_owned();
        for (name, price) in CATALOG {
            stmt.values([name.into(), price.into()])
                .map_err(|err| DbErr::Custom(format!("invalid seed row '{name}': {err}")))?;
        }

        db.execute(backend.build(&stmt)).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let stmt = Query::delete()
            .from_table(CatalogItems::Table)
            .and_where(Expr::col(CatalogItems::Name).is_in(CATALOG.map(|(name, _)| name)))
            .to_owned();
        db.execute(backend.build(&stmt)).await?;
        Ok(())
    }
}
