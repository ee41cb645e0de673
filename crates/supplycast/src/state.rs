//! Shared application state.
//!
//! Handlers reach storage only through the `ProjectionRepository` trait
//! object, so the backend is chosen once at startup.

use std::sync::Arc;

use anyhow::Result;

use supplycast_core::storage::ProjectionRepository;

use crate::config::{Config, StorageBackend};
use crate::storage::{inmemory::InMemoryStore, ProjectionGateway};

/// Shared application state.
///
/// Cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Projection repository (gateway over the configured item store).
    pub projections: Arc<dyn ProjectionRepository>,
}

impl AppState {
    pub fn new(projections: Arc<dyn ProjectionRepository>) -> Self {
        Self { projections }
    }

    /// State backed by an empty in-memory store serving pages of `page_size`.
    pub fn in_memory(page_size: usize) -> Self {
        Self::new(Arc::new(ProjectionGateway::new(
            InMemoryStore::with_page_size(page_size),
        )))
    }

    /// Builds the state for the backend selected in `config`.
    ///
    /// With DynamoDB and `create_table` set, the table and its indexes are
    /// provisioned before the state is returned.
    pub async fn from_config(config: &Config) -> Result<Self> {
        tracing::info!(backend = %config.storage_backend, "Selecting storage backend");
        match config.storage_backend {
            StorageBackend::Memory => {
                let store = InMemoryStore::with_page_size(config.memory_page_size);
                tracing::info!(page_size = store.page_size(), "Using in-memory storage");
                Ok(Self::new(Arc::new(ProjectionGateway::new(store))))
            }
            StorageBackend::DynamoDb => Self::dynamodb(config).await,
        }
    }

    #[cfg(feature = "dynamodb")]
    async fn dynamodb(config: &Config) -> Result<Self> {
        use crate::storage::dynamodb::{
            create_client, ensure_table, projection_table_config, DynamoDbStore,
        };

        let client = create_client(&config.region, config.endpoint_url.as_deref()).await;

        if config.create_table {
            ensure_table(&client, &projection_table_config(&config.table_name)).await?;
        }

        let store = DynamoDbStore::new(client, &config.table_name);

        tracing::info!(
            table = %store.table_name(),
            region = %config.region,
            endpoint = ?config.endpoint_url,
            "Using DynamoDB storage"
        );

        Ok(Self::new(Arc::new(ProjectionGateway::new(store))))
    }

    #[cfg(not(feature = "dynamodb"))]
    async fn dynamodb(_config: &Config) -> Result<Self> {
        anyhow::bail!("DynamoDB storage requested but the `dynamodb` feature is disabled")
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory(crate::storage::inmemory::DEFAULT_PAGE_SIZE)
    }
}
