use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use server::ServerConfig;
use tokio_util::sync::CancellationToken;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "merch_store={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect(&settings.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let config = ServerConfig {
        request_timeout: Duration::from_millis(settings.server.request_timeout_ms),
        starting_coins: settings.server.starting_coins,
        password_cost: settings.server.password_cost,
    };

    let shutdown = CancellationToken::new();
    let mut tasks = tokio::task::JoinSet::new();

    let token = shutdown.clone();
    tasks.spawn(async move {
        if let Err(err) = server::run_with_listener(engine, config, listener, token).await {
            tracing::error!("server failed: {err}");
        }
    });

    let token = shutdown.clone();
    tasks.spawn(async move {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => tracing::info!("Shutting down..."),
                Err(err) => tracing::error!("failed to listen for ctrl-c: {err}"),
            },
            _ = token.cancelled() => {}
        }
        token.cancel();
    });

    while tasks.join_next().await.is_some() {
        shutdown.cancel();
    }

    Ok(())
}

async fn connect(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
