use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use handlers::{generate_query_handler, health_check, list_fields_handler};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer,
};

use crate::config::ServerConfig;
use crate::field_catalog::{CatalogError, FieldCatalog};
use crate::query_generator::QueryGenerator;

pub mod handlers;
pub mod models;

/// Request bodies are a short description plus two scalars
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Shared, read-only state handed to every handler
pub struct AppState {
    pub generator: QueryGenerator,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(catalog: FieldCatalog, config: ServerConfig) -> Self {
        let generator = QueryGenerator::new(Arc::new(catalog), config.match_settings());
        AppState { generator, config }
    }

    /// Load the field catalog named by `config` and build the state around it
    pub fn load(config: ServerConfig) -> Result<Self, CatalogError> {
        let catalog = FieldCatalog::from_csv_path(&config.csv_path)?;
        Ok(Self::new(catalog, config))
    }
}

/// Build the HTTP router
pub fn router(app_state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(app_state.config.request_timeout_secs);

    let api = Router::new()
        .route("/generate-query", post(generate_query_handler))
        .route("/fields", get(list_fields_handler));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(TimeoutLayer::new(timeout))
        .layer(CatchPanicLayer::new())
        .with_state(app_state)
}

pub async fn run() {
    dotenv().ok();

    // Load server configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    run_with_config(config).await;
}

pub async fn run_with_config(config: ServerConfig) {
    log::info!(
        "Server configuration: http={}:{}, csv={}, threshold={}, max_matches={}, fuzzy={}",
        config.http_host,
        config.http_port,
        config.csv_path,
        config.match_threshold,
        config.max_matches,
        config.fuzzy_matching
    );

    // The catalog is the only state; without it there is nothing to serve
    let app_state = match AppState::load(config.clone()) {
        Ok(state) => state,
        Err(e) => {
            log::error!("✗ Failed to load field catalog: {}", e);
            log::error!("  Server cannot start without a field mapping file.");
            std::process::exit(1);
        }
    };

    let catalog = app_state.generator.catalog();
    log::info!(
        "✓ Field catalog ready: {} fields, {} related tables",
        catalog.len(),
        catalog.graph().table_count()
    );

    let app = router(Arc::new(app_state));

    let http_bind_address = format!("{}:{}", config.http_host, config.http_port);
    log::info!("Starting HTTP server on {}", http_bind_address);

    let http_listener = match TcpListener::bind(&http_bind_address).await {
        Ok(listener) => {
            log::info!("Successfully bound HTTP listener to {}", http_bind_address);
            listener
        }
        Err(e) => {
            log::error!(
                "✗ FATAL: Failed to bind HTTP listener to {}: {}",
                http_bind_address,
                e
            );
            log::error!("  Is another process using port {}?", config.http_port);
            std::process::exit(1);
        }
    };

    println!("fieldsql server is running");
    println!("  HTTP API: http://{}/api/v1", http_bind_address);

    if let Err(e) = axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("HTTP server fatal error: {:?}", e);
        std::process::exit(1);
    }

    println!("Server stopped");
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                log::error!("Failed to register SIGTERM handler: {}. Falling back to Ctrl+C only.", e);
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => println!("Received SIGTERM, shutting down..."),
            _ = tokio::signal::ctrl_c() => println!("Received SIGINT, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        println!("Received shutdown signal, shutting down...");
    }
}
