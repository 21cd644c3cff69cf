#![allow(dead_code)]

use std::path::Path;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{AccountId, Engine, ItemId, OpContext};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Engine over a migrated sqlite file under `dir`. Returns the url so a test
/// can open competing connections to the same file.
pub async fn engine_with_file_db(dir: &Path) -> (Engine, DatabaseConnection, String) {
    let url = format!("sqlite:{}?mode=rwc", dir.join("ledger.db").display());
    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db, url)
}

/// A single-connection pool, so statements issued one by one share a
/// session (and its open transaction).
pub async fn single_connection(url: &str) -> DatabaseConnection {
    let mut options = ConnectOptions::new(url.to_string());
    options.max_connections(1).min_connections(1);
    Database::connect(options).await.unwrap()
}

pub async fn open_account(engine: &Engine, handle: &str, coins: i64) -> AccountId {
    engine
        .register_account(&OpContext::new(), handle, "not-a-real-hash", coins)
        .await
        .unwrap()
        .id
}

pub async fn add_item(engine: &Engine, name: &str, price: i64) -> ItemId {
    engine
        .add_item(&OpContext::new(), name, price)
        .await
        .unwrap()
        .id
}

pub async fn coins(engine: &Engine, account_id: AccountId) -> i64 {
    engine
        .account(&OpContext::new(), account_id)
        .await
        .unwrap()
        .coins
}

pub async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

pub async fn count_purchases(db: &DatabaseConnection, account_id: AccountId, item_id: ItemId) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT COUNT(*) AS n FROM purchases WHERE account_id = ? AND item_id = ?",
            vec![account_id.into(), item_id.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}
