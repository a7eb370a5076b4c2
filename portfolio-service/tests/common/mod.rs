use portfolio_service::config::{CorsConfig, DatabaseConfig, PortfolioConfig};
use portfolio_service::models::{Artwork, Stored};
use portfolio_service::services::{DocumentStore, InMemoryStore, PortfolioRepository};
use portfolio_service::startup::{AppState, Application};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub fn test_config(database_url: Option<&str>) -> PortfolioConfig {
    PortfolioConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            log_level: "info".to_string(),
            otlp_endpoint: None,
        },
        database: DatabaseConfig {
            url: database_url.map(str::to_string),
            name: "portfolio_test".to_string(),
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

/// Router state backed by a fresh in-memory store, for `oneshot` tests.
pub fn memory_state() -> (Arc<InMemoryStore>, AppState) {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(
        test_config(Some("memory://test")),
        Some(store.clone() as Arc<dyn DocumentStore>),
    );
    (store, state)
}

pub struct TestApp {
    pub address: String,
    pub store: Option<Arc<InMemoryStore>>,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the service on a random port with an empty in-memory store.
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::spawn_with(
            test_config(Some("memory://test")),
            Some(store.clone() as Arc<dyn DocumentStore>),
            Some(store),
        )
        .await
    }

    /// Spawn the service with no database configured.
    pub async fn spawn_without_store() -> Self {
        Self::spawn_with(test_config(None), None, None).await
    }

    async fn spawn_with(
        config: PortfolioConfig,
        store: Option<Arc<dyn DocumentStore>>,
        memory: Option<Arc<InMemoryStore>>,
    ) -> Self {
        let app = Application::build_with_store(config, store)
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            store: memory,
            client,
        }
    }

    pub fn repository(&self) -> PortfolioRepository {
        let store = self
            .store
            .clone()
            .expect("Test app was spawned without a store");
        PortfolioRepository::new(store)
    }

    pub async fn seed_artwork(&self, title: &str, tags: &[&str]) -> Stored<Artwork> {
        let artwork = Artwork::new(title, format!("https://cdn.example/{}.png", title))
            .with_tags(tags.iter().copied());
        self.repository()
            .create(artwork)
            .await
            .expect("Failed to seed artwork")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
