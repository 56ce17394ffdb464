use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use wellkit_core::config::{NotifierBackend, WellkitConfig};
use wellkit_notify::{LogNotifier, Notifier, WebhookNotifier};
use wellkit_scheduler::{ReminderEngine, ReminderStore};

#[derive(Parser)]
#[command(name = "wellkit-daemon", about = "Habit & wellness reminder service")]
struct Cli {
    /// Path to wellkit.toml (default: ~/.wellkit/wellkit.toml).
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellkit_daemon=info,wellkit_scheduler=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // load config: explicit path > WELLKIT_CONFIG env > ~/.wellkit/wellkit.toml
    let config_path = cli.config.or_else(|| std::env::var("WELLKIT_CONFIG").ok());
    let config = WellkitConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        WellkitConfig::default()
    });

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    // run all schema migrations (idempotent)
    wellkit_scheduler::db::init_db(&db)?;
    wellkit_records::db::init_db(&db)?;
    info!("database migrations complete");

    // the engine gets its own connection so the web layer's record stores
    // never contend with timer firings
    let store = ReminderStore::new(rusqlite::Connection::open(db_path)?)?;

    let notifier: Arc<dyn Notifier> = match config.notifier.backend {
        NotifierBackend::Log => Arc::new(LogNotifier),
        NotifierBackend::Webhook => {
            let url = config.notifier.webhook_url.clone().unwrap_or_default();
            Arc::new(WebhookNotifier::new(
                url,
                Duration::from_secs(config.notifier.timeout_secs),
            )?)
        }
    };
    info!(backend = notifier.name(), "notifier ready");

    let engine = ReminderEngine::new(store, notifier);
    let recovered = engine.recover()?;
    info!(recovered, "reminder engine started");

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    engine.shutdown();

    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
}
