//! Application startup and lifecycle management.
//!
//! The store handle is built once here and injected into every handler via
//! [`AppState`]. A missing or unreachable database does not stop the
//! service from starting; data endpoints then answer with a storage error.

use crate::config::{CorsConfig, DatabaseConfig, PortfolioConfig};
use crate::handlers;
use crate::services::{DocumentStore, InMemoryStore, MongoStore, PortfolioRepository};
use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: PortfolioConfig,
    pub store: Option<Arc<dyn DocumentStore>>,
}

impl AppState {
    pub fn new(config: PortfolioConfig, store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { config, store }
    }

    /// Repository over the configured store, or `StorageUnavailable` when
    /// no connection was established at startup.
    pub fn repository(&self) -> Result<PortfolioRepository, AppError> {
        match &self.store {
            Some(store) => Ok(PortfolioRepository::new(store.clone())),
            None => {
                tracing::error!("Request needs the database but no store is configured");
                Err(AppError::StorageUnavailable)
            }
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors);

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/hello", get(handlers::hello))
        .route("/api/artworks", get(handlers::list_artworks))
        .route("/api/inquiries", post(handlers::create_inquiry))
        .route("/test", get(handlers::diagnostics))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .fallback(handlers::not_found)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

/// Public site: any origin by default, read and submit only.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allows_any() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Opens the configured store. Failures are logged and yield `None`.
pub async fn connect_store(config: &DatabaseConfig) -> Option<Arc<dyn DocumentStore>> {
    let Some(url) = config.url.as_deref() else {
        tracing::warn!("DATABASE_URL is not set; data endpoints will report storage unavailable");
        return None;
    };

    if config.is_memory() {
        tracing::info!("Using in-memory document store");
        return Some(Arc::new(InMemoryStore::new()));
    }

    match MongoStore::connect(url, &config.name).await {
        Ok(store) => {
            if let Err(e) = store.initialize_indexes().await {
                tracing::warn!("Continuing without MongoDB indexes: {}", e);
            }
            Some(Arc::new(store))
        }
        Err(e) => {
            tracing::error!(
                "Database unavailable, data endpoints will fail until restart: {}",
                e
            );
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, connecting to the store named in `config`.
    pub async fn build(config: PortfolioConfig) -> Result<Self, AppError> {
        let store = connect_store(&config.database).await;
        Self::build_with_store(config, store).await
    }

    /// Build the application around an already constructed store.
    pub async fn build_with_store(
        config: PortfolioConfig,
        store: Option<Arc<dyn DocumentStore>>,
    ) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port = port,
            store = store.as_ref().map(|s| s.backend()).unwrap_or("none"),
            "Portfolio service bound"
        );

        Ok(Self {
            port,
            listener,
            state: AppState::new(config, store),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> Option<Arc<dyn DocumentStore>> {
        self.state.store.clone()
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
