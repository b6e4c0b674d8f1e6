//! Handles settings for the application. Configuration is written in
//! `settings.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level for the env filter (e.g. "info", "debug").
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    /// Sqlite file path; omit to run on an in-memory database.
    pub sqlite: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StockApi {
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Sync {
    /// How often to refresh transactions and categories from the stock API.
    pub interval_minutes: u64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub stock_api: StockApi,
    pub sync: Option<Sync>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
