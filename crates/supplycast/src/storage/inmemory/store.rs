//! In-memory item store implementation.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use supplycast_core::storage::{
    ItemKey, ItemStore, Page, PageCursor, PageRequest, StorageItem, StoreError, StoreResult,
};

/// Items returned per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// In-memory item store.
///
/// Items are ordered by primary key. Every read returns at most `page_size`
/// matching items plus a cursor when more remain. Data is lost when the last
/// clone is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    items: Arc<RwLock<BTreeMap<ItemKey, StorageItem>>>,
    page_size: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty store with [`DEFAULT_PAGE_SIZE`].
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Creates an empty store serving pages of `page_size` items (at least one).
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn put_item(&self, item: StorageItem) -> StoreResult<()> {
        let key = ItemKey::from_item(&item)
            .ok_or_else(|| StoreError::Rejected("item is missing its primary key".to_string()))?;

        let mut items = self.items.write().await;
        items.insert(key, item);
        Ok(())
    }

    async fn delete_item(&self, key: &ItemKey) -> StoreResult<bool> {
        let mut items = self.items.write().await;
        Ok(items.remove(key).is_some())
    }

    async fn fetch_page(&self, request: &PageRequest) -> StoreResult<Page> {
        let start = match &request.cursor {
            Some(cursor) => {
                let key = cursor.item_key().ok_or_else(|| {
                    StoreError::Rejected("page cursor is missing its primary key".to_string())
                })?;
                Bound::Excluded(key)
            }
            None => Bound::Unbounded,
        };

        let items = self.items.read().await;
        let mut matching = items
            .range((start, Bound::Unbounded))
            .filter(|(_, item)| request.target.matches(item));

        let mut page = Page::default();
        let mut last_key = None;
        for (key, item) in matching.by_ref().take(self.page_size) {
            page.items.push(item.clone());
            last_key = Some(key);
        }

        if matching.next().is_some() {
            page.next = last_key.map(PageCursor::from_key);
        }

        Ok(page)
    }
}
