//! Projection gateway.
//!
//! Implements [`ProjectionRepository`] once, on top of any [`ItemStore`]
//! backend: key derivation, index routing, pagination to exhaustion and
//! error wrapping all happen here.

use async_trait::async_trait;

use supplycast_core::projection::{ProjectionKey, SupplyProjection};
use supplycast_core::storage::{
    from_storage_item, to_storage_item, IndexName, ItemKey, ItemStore, PageRequest,
    ProjectionRepository, QueryTarget, RepositoryError, Result, StorageItem, StoreError,
    ATTR_SORT_KEY, ATTR_WEEK,
};

const OP_CREATE: &str = "create projection";
const OP_LIST: &str = "list projections";
const OP_BY_STORE: &str = "query projections by store";
const OP_BY_WEEK: &str = "query projections by week";
const OP_BY_CATEGORY: &str = "query projections by category";
const OP_DELETE: &str = "delete projection";
const OP_DELETE_STORE_WEEK: &str = "delete projections by store and week";
const OP_UPDATE: &str = "update projection";

/// Storage gateway for supply projections.
///
/// Holds no state besides the backend handle, so it is safe to share between
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct ProjectionGateway<S> {
    store: S,
}

impl<S: ItemStore> ProjectionGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Upserts a projection under its computed key.
    async fn put(
        &self,
        projection: &SupplyProjection,
        operation: &'static str,
    ) -> Result<SupplyProjection> {
        self.store
            .put_item(to_storage_item(projection))
            .await
            .map_err(store_failure(operation))?;

        tracing::debug!(
            operation,
            store_id = %projection.store_id,
            sort_key = %projection.sort_key(),
            "Stored projection"
        );

        Ok(projection.clone())
    }

    /// Reads every page of `target`, following the cursor until exhausted.
    ///
    /// Pages are fetched one after the other; items keep the order the store
    /// returned them in.
    async fn collect_items(
        &self,
        target: QueryTarget,
        operation: &'static str,
    ) -> Result<Vec<StorageItem>> {
        let mut request = PageRequest::first(target);
        let mut items = Vec::new();
        let mut pages = 0usize;

        loop {
            let page = self
                .store
                .fetch_page(&request)
                .await
                .map_err(store_failure(operation))?;
            pages += 1;
            items.extend(page.items);

            match page.next {
                Some(cursor) => request.cursor = Some(cursor),
                None => break,
            }
        }

        tracing::debug!(operation, pages, items = items.len(), "Read all pages");
        Ok(items)
    }

    async fn collect_projections(
        &self,
        target: QueryTarget,
        operation: &'static str,
    ) -> Result<Vec<SupplyProjection>> {
        let items = self.collect_items(target, operation).await?;
        items.iter().map(from_storage_item).collect()
    }
}

/// Wraps a store failure raised by `operation`, logging the store's own message.
fn store_failure(operation: &'static str) -> impl Fn(StoreError) -> RepositoryError {
    move |source| {
        tracing::warn!(
            operation,
            transient = matches!(source, StoreError::Unavailable(_)),
            store_message = source.message(),
            "Store call failed"
        );
        RepositoryError::during(operation)(source)
    }
}

#[async_trait]
impl<S: ItemStore> ProjectionRepository for ProjectionGateway<S> {
    async fn create_projection(&self, projection: &SupplyProjection) -> Result<SupplyProjection> {
        self.put(projection, OP_CREATE).await
    }

    async fn list_projections(&self) -> Result<Vec<SupplyProjection>> {
        // Unbounded full-table scan; use an indexed query at scale.
        self.collect_projections(QueryTarget::Scan, OP_LIST).await
    }

    async fn projections_by_store(&self, store_id: &str) -> Result<Vec<SupplyProjection>> {
        self.collect_projections(QueryTarget::partition(IndexName::Primary, store_id), OP_BY_STORE)
            .await
    }

    async fn projections_by_week(&self, week: &str) -> Result<Vec<SupplyProjection>> {
        self.collect_projections(QueryTarget::partition(IndexName::ByWeek, week), OP_BY_WEEK)
            .await
    }

    async fn projections_by_category(&self, category: &str) -> Result<Vec<SupplyProjection>> {
        self.collect_projections(
            QueryTarget::partition(IndexName::ByCategory, category),
            OP_BY_CATEGORY,
        )
        .await
    }

    async fn delete_projection(&self, key: &ProjectionKey) -> Result<bool> {
        let item_key = ItemKey::new(&key.store_id, key.sort_key());

        let removed = self
            .store
            .delete_item(&item_key)
            .await
            .map_err(store_failure(OP_DELETE))?;

        tracing::debug!(
            store_id = %item_key.partition,
            sort_key = %item_key.sort,
            removed,
            "Deleted projection"
        );

        Ok(removed)
    }

    /// Two-phase delete: read the whole store partition, filter by week in
    /// process, then delete each match.
    ///
    /// Not atomic. A matching record written between the read and the deletes
    /// survives, and a failure midway leaves earlier deletes applied.
    async fn delete_projections_by_store_and_week(
        &self,
        store_id: &str,
        week: &str,
    ) -> Result<usize> {
        let items = self
            .collect_items(
                QueryTarget::partition(IndexName::Primary, store_id),
                OP_DELETE_STORE_WEEK,
            )
            .await?;

        let keys = items
            .iter()
            .filter(|item| item.get(ATTR_WEEK).map(String::as_str) == Some(week))
            .map(|item| {
                ItemKey::from_item(item)
                    .ok_or_else(|| RepositoryError::encoding(ATTR_SORT_KEY, "item without primary key"))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut deleted = 0usize;
        for key in &keys {
            let removed = self
                .store
                .delete_item(key)
                .await
                .map_err(store_failure(OP_DELETE_STORE_WEEK))?;
            if removed {
                deleted += 1;
            }
        }

        tracing::info!(
            store_id,
            week,
            matched = keys.len(),
            deleted,
            "Deleted projections by store and week"
        );

        Ok(deleted)
    }

    async fn update_projection(&self, projection: &SupplyProjection) -> Result<SupplyProjection> {
        // Full overwrite: no read-modify-write, no version check.
        self.put(projection, OP_UPDATE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::Mutex;

    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use supplycast_core::storage::{Page, PageCursor, StoreError, StoreResult, ATTR_STORE_ID};

    use crate::storage::inmemory::InMemoryStore;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn projection(store_id: &str, day: u32, week: &str, category: &str) -> SupplyProjection {
        SupplyProjection {
            projection_date: date(2025, 10, day),
            store_id: store_id.to_string(),
            store_name: format!("Store {store_id}"),
            supply_category: category.to_string(),
            unit_of_measure: "Base de crepe".to_string(),
            estimated_quantity: BigDecimal::from_str("12.50").unwrap(),
            week: week.to_string(),
            model_origin: "Promedio_Historico_v1".to_string(),
            generated_on: date(2025, 10, 1),
            projection_state: "pendiente".to_string(),
            dispatched_quantity: BigDecimal::from_str("11.00").unwrap(),
            actual_consumed_quantity: BigDecimal::from_str("11.80").unwrap(),
            variance_vs_actual: BigDecimal::from_str("0.70").unwrap(),
            adjusted_by: "sistema_autajuste".to_string(),
            confirmed_on: date(2025, 10, 6),
            notes: None,
        }
    }

    fn gateway(page_size: usize) -> ProjectionGateway<InMemoryStore> {
        ProjectionGateway::new(InMemoryStore::with_page_size(page_size))
    }

    /// Store that serves a fixed sequence of pages and records the cursors it receives.
    struct PagedStore {
        pages: Vec<Page>,
        seen_cursors: Mutex<Vec<Option<PageCursor>>>,
    }

    impl PagedStore {
        fn new(pages: Vec<Page>) -> Self {
            Self {
                pages,
                seen_cursors: Mutex::new(Vec::new()),
            }
        }
    }

    fn cursor(n: usize) -> PageCursor {
        PageCursor::from_key(&ItemKey::new("cursor", n.to_string()))
    }

    #[async_trait]
    impl ItemStore for PagedStore {
        async fn put_item(&self, _item: StorageItem) -> StoreResult<()> {
            Ok(())
        }

        async fn delete_item(&self, _key: &ItemKey) -> StoreResult<bool> {
            Ok(false)
        }

        async fn fetch_page(&self, request: &PageRequest) -> StoreResult<Page> {
            let mut seen = self.seen_cursors.lock().unwrap();
            let index = seen.len();
            seen.push(request.cursor.clone());
            Ok(self.pages[index].clone())
        }
    }

    /// Store whose every call fails.
    struct FailingStore(StoreError);

    #[async_trait]
    impl ItemStore for FailingStore {
        async fn put_item(&self, _item: StorageItem) -> StoreResult<()> {
            Err(self.0.clone())
        }

        async fn delete_item(&self, _key: &ItemKey) -> StoreResult<bool> {
            Err(self.0.clone())
        }

        async fn fetch_page(&self, _request: &PageRequest) -> StoreResult<Page> {
            Err(self.0.clone())
        }
    }

    // ==================== Create / Update ====================

    #[tokio::test]
    async fn test_create_returns_stored_record() {
        let gateway = gateway(10);
        let record = projection("T001", 5, "2025-W41", "crepas");

        let stored = gateway.create_projection(&record).await.unwrap();
        assert_eq!(stored, record);

        let listed = gateway.list_projections().await.unwrap();
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn test_same_key_different_category_overwrites() {
        let gateway = gateway(10);
        let crepes = projection("T001", 5, "2025-W41", "crepas");
        let waffles = projection("T001", 5, "2025-W41", "waffles");

        gateway.create_projection(&crepes).await.unwrap();
        gateway.create_projection(&waffles).await.unwrap();

        let stored = gateway.projections_by_store("T001").await.unwrap();
        assert_eq!(stored, vec![waffles]);
    }

    #[tokio::test]
    async fn test_update_creates_missing_record() {
        let gateway = gateway(10);
        let record = projection("T009", 5, "2025-W41", "crepas");

        gateway.update_projection(&record).await.unwrap();

        let stored = gateway.projections_by_store("T009").await.unwrap();
        assert_eq!(stored, vec![record]);
    }

    #[tokio::test]
    async fn test_update_overwrites_every_field() {
        let gateway = gateway(10);
        let mut record = projection("T001", 5, "2025-W41", "crepas");
        record.notes = Some("first".to_string());
        gateway.create_projection(&record).await.unwrap();

        record.projection_state = "confirmado".to_string();
        record.actual_consumed_quantity = BigDecimal::from_str("13.25").unwrap();
        record.notes = None;
        gateway.update_projection(&record).await.unwrap();

        let stored = gateway.projections_by_store("T001").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].projection_state, "confirmado");
        assert_eq!(stored[0].actual_consumed_quantity.to_string(), "13.25");
        assert_eq!(stored[0].notes, None);
    }

    // ==================== Queries ====================

    #[tokio::test]
    async fn test_queries_follow_pagination_across_pages() {
        // Page size 2 forces several pages for every query below.
        let gateway = gateway(2);
        for day in 1..=7 {
            let category = if day % 2 == 0 { "crepas" } else { "waffles" };
            gateway
                .create_projection(&projection("T001", day, "2025-W41", category))
                .await
                .unwrap();
            gateway
                .create_projection(&projection("T002", day, "2025-W42", category))
                .await
                .unwrap();
        }

        assert_eq!(gateway.list_projections().await.unwrap().len(), 14);
        assert_eq!(gateway.projections_by_store("T001").await.unwrap().len(), 7);
        assert_eq!(gateway.projections_by_week("2025-W42").await.unwrap().len(), 7);
        assert_eq!(gateway.projections_by_category("crepas").await.unwrap().len(), 6);
        assert_eq!(gateway.projections_by_category("waffles").await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_query_results_have_no_duplicates() {
        let gateway = gateway(3);
        for day in 1..=10 {
            gateway
                .create_projection(&projection("T001", day, "2025-W41", "crepas"))
                .await
                .unwrap();
        }

        let stored = gateway.projections_by_week("2025-W41").await.unwrap();
        let mut keys: Vec<_> = stored.iter().map(|p| p.sort_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 10);
    }

    #[tokio::test]
    async fn test_empty_query_is_not_an_error() {
        let gateway = gateway(10);

        assert!(gateway.list_projections().await.unwrap().is_empty());
        assert!(gateway.projections_by_store("T404").await.unwrap().is_empty());
        assert!(gateway.projections_by_week("2030-W01").await.unwrap().is_empty());
        assert!(gateway.projections_by_category("helados").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_collects_union_of_scripted_pages_in_order() {
        let records: Vec<SupplyProjection> = (1..=5)
            .map(|day| projection("T001", day, "2025-W41", "crepas"))
            .collect();
        let item = |i: usize| to_storage_item(&records[i]);

        let store = PagedStore::new(vec![
            Page {
                items: vec![item(0), item(1)],
                next: Some(cursor(1)),
            },
            Page {
                items: vec![],
                next: Some(cursor(2)),
            },
            Page {
                items: vec![item(2), item(3)],
                next: Some(cursor(3)),
            },
            Page {
                items: vec![item(4)],
                next: None,
            },
        ]);
        let gateway = ProjectionGateway::new(store);

        let listed = gateway.projections_by_week("2025-W41").await.unwrap();
        assert_eq!(listed, records);

        let seen = gateway.store.seen_cursors.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![None, Some(cursor(1)), Some(cursor(2)), Some(cursor(3))]
        );
    }

    #[tokio::test]
    async fn test_malformed_item_is_an_encoding_error() {
        let mut broken = to_storage_item(&projection("T001", 5, "2025-W41", "crepas"));
        broken.remove(supplycast_core::storage::ATTR_CONFIRMED_ON);

        let gateway = ProjectionGateway::new(PagedStore::new(vec![Page {
            items: vec![broken],
            next: None,
        }]));

        let err = gateway.list_projections().await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Encoding {
                field: "fecha_confirmacion",
                ..
            }
        ));
    }

    // ==================== Deletes ====================

    #[tokio::test]
    async fn test_delete_one_twice() {
        let gateway = gateway(10);
        let record = projection("T001", 5, "2025-W41", "crepas");
        gateway.create_projection(&record).await.unwrap();

        assert!(gateway.delete_projection(&record.key()).await.unwrap());
        assert!(!gateway.delete_projection(&record.key()).await.unwrap());
        assert!(gateway.list_projections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_one_requires_exact_key() {
        let gateway = gateway(10);
        let record = projection("T001", 5, "2025-W41", "crepas");
        gateway.create_projection(&record).await.unwrap();

        let other_week = ProjectionKey::new("T001", record.projection_date, "2025-W42");
        assert!(!gateway.delete_projection(&other_week).await.unwrap());
        assert_eq!(gateway.list_projections().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_by_store_and_week_is_scoped() {
        let gateway = gateway(2);
        for day in 1..=3 {
            gateway
                .create_projection(&projection("T001", day, "2025-W41", "crepas"))
                .await
                .unwrap();
            gateway
                .create_projection(&projection("T001", day + 7, "2025-W42", "crepas"))
                .await
                .unwrap();
            gateway
                .create_projection(&projection("T002", day, "2025-W41", "crepas"))
                .await
                .unwrap();
        }

        let deleted = gateway
            .delete_projections_by_store_and_week("T001", "2025-W41")
            .await
            .unwrap();
        assert_eq!(deleted, 3);

        let remaining = gateway.projections_by_store("T001").await.unwrap();
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|p| p.week == "2025-W42"));

        // Other stores in the same week are untouched.
        assert_eq!(gateway.projections_by_store("T002").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_by_store_and_week_without_matches() {
        let gateway = gateway(10);
        gateway
            .create_projection(&projection("T001", 5, "2025-W42", "crepas"))
            .await
            .unwrap();

        let deleted = gateway
            .delete_projections_by_store_and_week("T001", "2025-W41")
            .await
            .unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(gateway.list_projections().await.unwrap().len(), 1);
    }

    // ==================== Failures ====================

    #[tokio::test]
    async fn test_store_failures_are_wrapped_with_operation() {
        let gateway = ProjectionGateway::new(FailingStore(StoreError::Unavailable(
            "Throughput exceeded".to_string(),
        )));
        let record = projection("T001", 5, "2025-W41", "crepas");

        let err = gateway.create_projection(&record).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "create projection failed: Store unavailable: Throughput exceeded"
        );

        let err = gateway.projections_by_category("crepas").await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Store {
                operation: "query projections by category",
                source: StoreError::Unavailable(_),
            }
        ));

        let err = gateway.delete_projection(&record.key()).await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Store {
                operation: "delete projection",
                ..
            }
        ));
    }

    #[test]
    fn test_store_failure_keeps_store_message_and_kind() {
        let err = store_failure(OP_LIST)(StoreError::Rejected(
            "Requested resource not found".to_string(),
        ));

        match err {
            RepositoryError::Store { operation, source } => {
                assert_eq!(operation, OP_LIST);
                assert_eq!(source.message(), "Requested resource not found");
                assert!(matches!(source, StoreError::Rejected(_)));
            }
            other => panic!("expected store error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bulk_delete_rejects_items_without_key() {
        let mut keyless = to_storage_item(&projection("T001", 5, "2025-W41", "crepas"));
        keyless.remove(ATTR_SORT_KEY);
        assert!(keyless.contains_key(ATTR_STORE_ID));

        let gateway = ProjectionGateway::new(PagedStore::new(vec![Page {
            items: vec![keyless],
            next: None,
        }]));

        let err = gateway
            .delete_projections_by_store_and_week("T001", "2025-W41")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Encoding { .. }));
    }
}
