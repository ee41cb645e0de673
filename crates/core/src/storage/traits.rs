use async_trait::async_trait;

use crate::projection::{ProjectionKey, SupplyProjection};

use super::{ItemKey, Page, PageRequest, Result, StorageItem, StoreResult};

/// Low-level capability of a key-value table with secondary indexes.
///
/// Backends only move items; key derivation, pagination and error wrapping
/// live in the gateway built on top. Retry policies can be layered by
/// wrapping an implementation.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Writes an item, replacing any item with the same primary key.
    async fn put_item(&self, item: StorageItem) -> StoreResult<()>;

    /// Deletes the item at `key`. Returns whether an item was removed.
    async fn delete_item(&self, key: &ItemKey) -> StoreResult<bool>;

    /// Reads a single page of items.
    async fn fetch_page(&self, request: &PageRequest) -> StoreResult<Page>;
}

/// Repository for supply projection operations.
#[async_trait]
pub trait ProjectionRepository: Send + Sync {
    /// Stores a projection, overwriting any record with the same key.
    async fn create_projection(&self, projection: &SupplyProjection) -> Result<SupplyProjection>;

    /// Lists every projection in the table.
    async fn list_projections(&self) -> Result<Vec<SupplyProjection>>;

    /// Gets all projections of a store.
    async fn projections_by_store(&self, store_id: &str) -> Result<Vec<SupplyProjection>>;

    /// Gets all projections of a week. Eventually consistent.
    async fn projections_by_week(&self, week: &str) -> Result<Vec<SupplyProjection>>;

    /// Gets all projections of a supply category. Eventually consistent.
    async fn projections_by_category(&self, category: &str) -> Result<Vec<SupplyProjection>>;

    /// Deletes the projection at `key`. Returns whether one was removed.
    async fn delete_projection(&self, key: &ProjectionKey) -> Result<bool>;

    /// Deletes every projection of a store in a week. Returns the count removed.
    async fn delete_projections_by_store_and_week(&self, store_id: &str, week: &str)
        -> Result<usize>;

    /// Overwrites a projection, creating it when absent.
    async fn update_projection(&self, projection: &SupplyProjection) -> Result<SupplyProjection>;
}
