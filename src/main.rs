//! Cluster runner: loads configuration, opens storage, and runs the
//! leader-election loop that supervises the bot subprocess.

use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use enroll_funnel::adapters::process::CommandBotProcess;
use enroll_funnel::adapters::sqlite::{self, SqliteLockStore};
use enroll_funnel::application::LeaderElector;
use enroll_funnel::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    // The supervised bot consumes the funnel and catalog sections; a broken
    // pricing file should stop the runner here, not the first spawned bot.
    let pricing = config.catalog.load_pricing()?;
    if pricing.methods.is_empty() {
        warn!("no pricing configured; every payment choice will answer unavailable");
    }

    let pool = connect_with_retry(&config).await;
    sqlite::migrate(&pool).await?;
    info!(url = %config.database.url, "database ready");

    let locks = Arc::new(SqliteLockStore::new(pool));
    let bot = Box::new(CommandBotProcess::new(
        config.cluster.bot_command.clone(),
        config.cluster.stop_grace(),
    ));
    let elector = LeaderElector::new(config.cluster.elector_settings(), locks, bot);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            signal_token.cancel();
        }
    });

    elector.run(shutdown).await;
    info!("runner stopped");
    Ok(())
}

/// The runner outlives database hiccups: keep retrying with a fixed
/// backoff instead of exiting and losing the instance.
async fn connect_with_retry(config: &AppConfig) -> SqlitePool {
    let backoff = Duration::from_secs(config.cluster.error_backoff_secs);
    loop {
        let attempt = SqlitePoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(config.database.acquire_timeout())
            .connect(&config.database.url)
            .await;
        match attempt {
            Ok(pool) => return pool,
            Err(e) => {
                error!(error = %e, "database connection failed");
                warn!(backoff = ?backoff, "retrying");
                tokio::time::sleep(backoff).await;
            }
        }
    }
}
