use std::sync::Arc;

use tracing::info;

use wicket::store::CredentialStore;
use wicket::{Config, MemoryStore, WebServer, WicketError};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = wicket::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        wicket::logging::init_console_only(&config.logging.level);
    }

    info!("wicket - session login and role gate");

    if let Err(e) = run(config).await {
        tracing::error!("Fatal: {e}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> wicket::Result<()> {
    config.validate()?;

    let store = build_store(&config).await?;

    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let server = WebServer::new(&config, store)?;
    server.run().await.map_err(WicketError::Io)
}

/// Open the configured backend and apply the seed users.
async fn build_store(config: &Config) -> wicket::Result<Arc<dyn CredentialStore>> {
    let seeds = config.seed_records()?;

    match config.store.backend.as_str() {
        "memory" => {
            let store = MemoryStore::new();
            for record in seeds {
                store.insert(record);
            }
            info!(
                user_count = store.len(),
                "In-memory credential store ready"
            );
            Ok(Arc::new(store))
        }
        #[cfg(feature = "sqlite")]
        _ => {
            let store = wicket::SqliteStore::open(&config.store.path).await?;
            for record in &seeds {
                store.upsert(record).await?;
            }
            info!(path = %config.store.path, "SQLite credential store ready");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        _ => Err(WicketError::Validation(
            "sqlite backend not compiled in; set store.backend = \"memory\"".to_string(),
        )),
    }
}
