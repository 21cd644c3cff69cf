//! Settings of the merch store process.
//!
//! Read from `settings.toml` (optional) and then from `MERCH__*` environment
//! variables, e.g. `MERCH__SERVER__PORT=9000`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub request_timeout_ms: u64,
    pub starting_coins: i64,
    pub password_cost: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
    Url(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            // One shared connection keeps every query on the same in-memory db.
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
            Database::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    #[serde(default)]
    pub database: Database,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::with_prefix("MERCH").separator("__")),
        )
    }

    fn from_config(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.request_timeout_ms", 5000)?
            .set_default("server.starting_coins", engine::STARTING_COINS)?
            .set_default(
                "server.password_cost",
                i64::from(server::password::DEFAULT_COST),
            )?
            .build()?
            .try_deserialize()
    }
}
