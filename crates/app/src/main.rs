use std::time::Duration;

use engine::StockApiClient;
use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "stockyard={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect_database(settings.server.sqlite.as_deref()).await?;
    let stock_api = StockApiClient::new(&settings.stock_api.base_url);

    if let Some(sync) = settings.sync {
        let sync_engine = engine::Engine::builder()
            .database(db.clone())
            .stock_api(stock_api.clone())
            .build();
        tasks.spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_secs(sync.interval_minutes * 60));
            loop {
                ticker.tick().await;
                if let Err(err) = sync_engine.sync_categories().await {
                    tracing::warn!("category sync failed: {err}");
                }
                if let Err(err) = sync_engine.sync_transactions().await {
                    tracing::warn!("transaction sync failed: {err}");
                }
            }
        });
    }

    let engine = engine::Engine::builder()
        .database(db)
        .stock_api(stock_api)
        .build();
    let bind = settings.server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    tasks.spawn(async move {
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(err) => {
                tracing::error!("failed to bind server listener: {err}");
                return;
            }
        };
        if let Err(err) = server::run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn connect_database(
    sqlite_path: Option<&str>,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match sqlite_path {
        None => String::from("sqlite::memory:"),
        Some(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
