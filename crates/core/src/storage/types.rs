use std::collections::HashMap;

use super::keys::{
    ATTR_CATEGORY, ATTR_SORT_KEY, ATTR_STORE_ID, ATTR_WEEK, CATEGORY_INDEX, WEEK_INDEX,
};

/// A stored item: a flat map of attribute name to string value.
///
/// Decimals and dates are kept as strings so no precision is lost in the
/// store's numeric encoding.
pub type StorageItem = HashMap<String, String>;

/// Primary key of a stored item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    /// Partition key value ([`ATTR_STORE_ID`]).
    pub partition: String,
    /// Sort key value ([`ATTR_SORT_KEY`]).
    pub sort: String,
}

impl ItemKey {
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.into(),
        }
    }

    /// Extracts the primary key attributes of an item.
    ///
    /// Returns `None` when either attribute is missing.
    pub fn from_item(item: &StorageItem) -> Option<Self> {
        Some(Self {
            partition: item.get(ATTR_STORE_ID)?.clone(),
            sort: item.get(ATTR_SORT_KEY)?.clone(),
        })
    }

    /// The key as a two-attribute item, as used for page cursors.
    pub fn to_item(&self) -> StorageItem {
        HashMap::from([
            (ATTR_STORE_ID.to_string(), self.partition.clone()),
            (ATTR_SORT_KEY.to_string(), self.sort.clone()),
        ])
    }
}

/// Index a partition query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexName {
    /// The table's own primary key (partitioned by store).
    Primary,
    /// GSI partitioned by week. Eventually consistent.
    ByWeek,
    /// GSI partitioned by supply category. Eventually consistent.
    ByCategory,
}

impl IndexName {
    /// The GSI name, or `None` for the primary index.
    pub fn index_name(self) -> Option<&'static str> {
        match self {
            IndexName::Primary => None,
            IndexName::ByWeek => Some(WEEK_INDEX),
            IndexName::ByCategory => Some(CATEGORY_INDEX),
        }
    }

    /// Attribute the index is partitioned on.
    pub fn partition_attribute(self) -> &'static str {
        match self {
            IndexName::Primary => ATTR_STORE_ID,
            IndexName::ByWeek => ATTR_WEEK,
            IndexName::ByCategory => ATTR_CATEGORY,
        }
    }
}

/// What a paged read covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    /// Every item in the table.
    Scan,
    /// Items whose partition attribute on `index` equals `value`.
    Partition { index: IndexName, value: String },
}

impl QueryTarget {
    pub fn partition(index: IndexName, value: impl Into<String>) -> Self {
        Self::Partition {
            index,
            value: value.into(),
        }
    }

    /// Whether a stored item belongs to this target.
    pub fn matches(&self, item: &StorageItem) -> bool {
        match self {
            QueryTarget::Scan => true,
            QueryTarget::Partition { index, value } => {
                item.get(index.partition_attribute()) == Some(value)
            }
        }
    }
}

/// Opaque continuation token returned by a store with a partial page.
///
/// Holds the key attributes of the last item read, like DynamoDB's
/// `LastEvaluatedKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(pub StorageItem);

impl PageCursor {
    pub fn from_key(key: &ItemKey) -> Self {
        Self(key.to_item())
    }

    /// The primary key the cursor points at, if it carries one.
    pub fn item_key(&self) -> Option<ItemKey> {
        ItemKey::from_item(&self.0)
    }
}

/// A single page read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub target: QueryTarget,
    /// Continue after this cursor; `None` reads the first page.
    pub cursor: Option<PageCursor>,
}

impl PageRequest {
    pub fn first(target: QueryTarget) -> Self {
        Self {
            target,
            cursor: None,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<StorageItem>,
    /// Present when more items may follow.
    pub next: Option<PageCursor>,
}
