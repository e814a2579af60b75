//! DocShare Server: secure, revocable, audited sharing of vessel documents.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use docshare_api::AppState;
use docshare_auth::jwt::JwtDecoder;
use docshare_core::config::{AppConfig, StoreBackend};
use docshare_database::memory::{MemoryAccessLogStore, MemoryCatalog, MemoryShareStore};
use docshare_database::repositories::{AccessLogRepository, CatalogRepository, ShareRepository};
use docshare_database::store::{AccessLogStore, DocumentCatalog, ShareStore};
use docshare_database::{DatabasePool, migration};
use docshare_service::notification::build_dispatcher;
use docshare_service::share::{AccessLogger, ShareLifecycleService};

/// DocShare HTTP server.
#[derive(Debug, Parser)]
#[command(name = "docshare-server", version, about)]
struct Args {
    /// Directory holding `default.toml` and `{env}.toml`.
    #[arg(long, env = "DOCSHARE_CONFIG_DIR", default_value = "config")]
    config_dir: String,

    /// Environment overlay to merge over the defaults.
    #[arg(long, env = "DOCSHARE_ENV", default_value = "development")]
    env: String,

    /// Apply database migrations and exit.
    #[arg(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(&args.config_dir, &args.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, args.migrate_only).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

struct Stores {
    shares: Arc<dyn ShareStore>,
    access_logs: Arc<dyn AccessLogStore>,
    catalog: Arc<dyn DocumentCatalog>,
    pool: Option<DatabasePool>,
}

/// Main server run function
async fn run(config: AppConfig, migrate_only: bool) -> anyhow::Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting DocShare");

    // ── Step 1: Stores ───────────────────────────────────────────
    let stores = match config.database.backend {
        StoreBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = DatabasePool::connect(&config.database).await?;

            tracing::info!("Running database migrations...");
            migration::run_migrations(pool.pool()).await?;
            tracing::info!("Database migrations complete");

            if migrate_only {
                pool.close().await;
                return Ok(());
            }

            let pg = pool.pool().clone();
            Stores {
                shares: Arc::new(ShareRepository::new(pg.clone())),
                access_logs: Arc::new(AccessLogRepository::new(pg.clone())),
                catalog: Arc::new(CatalogRepository::new(pg)),
                pool: Some(pool),
            }
        }
        StoreBackend::Memory => {
            if migrate_only {
                tracing::warn!("Memory backend has no migrations to apply");
                return Ok(());
            }
            tracing::warn!("Using in-memory stores; shares and access logs are lost on restart");
            let catalog = match &config.database.memory_catalog_seed {
                Some(path) => MemoryCatalog::load_seed_file(path)?,
                None => {
                    tracing::warn!(
                        "database.memory_catalog_seed not set; the catalog is empty and every share request will be rejected"
                    );
                    MemoryCatalog::new()
                }
            };
            Stores {
                shares: Arc::new(MemoryShareStore::new()),
                access_logs: Arc::new(MemoryAccessLogStore::new()),
                catalog: Arc::new(catalog),
                pool: None,
            }
        }
    };

    // ── Step 2: Auth ─────────────────────────────────────────────
    if config.auth.jwt_secret == "CHANGE_ME_IN_PRODUCTION" {
        tracing::warn!("auth.jwt_secret is the built-in default; set DOCSHARE__AUTH__JWT_SECRET");
    }
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    // ── Step 3: Access logger and notifications ─────────────────
    let logger = AccessLogger::spawn(stores.access_logs, &config.access_log);
    let dispatcher = build_dispatcher(&config.notification)?;
    tracing::info!(provider = dispatcher.provider(), "Notification dispatcher ready");

    // ── Step 4: Services ─────────────────────────────────────────
    let share_service = Arc::new(ShareLifecycleService::new(
        stores.shares,
        stores.catalog,
        logger.clone(),
        dispatcher,
        config.share.clone(),
        &config.notification,
    ));

    // ── Step 5: HTTP server ──────────────────────────────────────
    let server_config = config.server.clone();
    let state = AppState {
        config: Arc::new(config),
        db_pool: stores.pool.clone(),
        jwt_decoder,
        share_service,
    };

    let app = docshare_api::build_app(state);
    docshare_api::serve(app, &server_config).await?;

    // ── Step 6: Drain queued access log entries ─────────────────
    let grace = Duration::from_secs(server_config.shutdown_grace_seconds);
    if tokio::time::timeout(grace, logger.flush()).await.is_err() {
        tracing::warn!("Access log queue not drained before shutdown deadline");
    }
    if let Some(pool) = stores.pool {
        pool.close().await;
    }

    tracing::info!("DocShare server shut down gracefully");
    Ok(())
}
