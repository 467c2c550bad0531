use post_api::{
    AppState,
    config::{AppConfig, Env, StorageBackend},
    create_router,
    repository::{FileRepository, RepositoryState, SledRepository},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point, responsible for initializing configuration,
/// logging, the selected persistence backend, and the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (fail-fast)
    // Loads .env file settings before configuration can be read.
    dotenv::dotenv().ok();
    // AppConfig::load() panics on missing production secrets.
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Prioritizes RUST_LOG, falling back to sensible defaults for local work.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "post_api=debug,tower_http=info,axum=trace".into());

    // 3. Initialize logging based on environment: pretty output for humans
    // locally, JSON for log aggregators in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Persistence Initialization
    // Both backends satisfy the same repository contract; configuration picks
    // which one this process runs on.
    let repo: RepositoryState = match config.backend {
        StorageBackend::File => {
            tracing::info!(path = %config.data_file, "using file-backed post store");
            Arc::new(
                FileRepository::new(config.data_file.as_str())
                    .await
                    .expect("FATAL: failed to open the data file. Check DATA_FILE."),
            )
        }
        StorageBackend::Sled => {
            tracing::info!(path = %config.db_path, "using sled-backed post store");
            Arc::new(
                SledRepository::open(&config.db_path)
                    .expect("FATAL: failed to open the sled database. Check DB_PATH."),
            )
        }
    };

    // 5. Unified State Assembly
    let app_state = AppState {
        repo,
        config: config.clone(),
    };

    // 6. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("FATAL: failed to bind the listening port");

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on 0.0.0.0:{}", config.port);
    tracing::info!(
        "API Documentation (Swagger UI) available at: http://localhost:{}/swagger-ui",
        config.port
    );

    // The long-running Axum server process.
    axum::serve(listener, app).await.unwrap();
}
