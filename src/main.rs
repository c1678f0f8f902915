//! Campus Market - service entry point
//!
//! Boot sequence: config -> logging -> PostgreSQL (+ schema) -> gateway.

use std::sync::Arc;

use campus_market::config::AppConfig;
use campus_market::db::Database;
use campus_market::gateway;
use campus_market::logging::init_logging;
use campus_market::notify::LogNotifier;
use campus_market::storage::LocalFileStore;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = Arc::new(AppConfig::load(&env));
    let _log_guard = init_logging(&config);

    tracing::info!(env = %env, git = env!("GIT_HASH"), "campus_market starting");

    let db = Arc::new(Database::connect(&config.postgres_url).await?);
    db.init_schema().await?;

    let notifier = Arc::new(LogNotifier);
    let file_store = Arc::new(LocalFileStore::new(
        &config.storage.upload_dir,
        config.storage.max_upload_bytes,
    ));

    gateway::run_server(config, db, notifier, file_store).await;

    Ok(())
}
