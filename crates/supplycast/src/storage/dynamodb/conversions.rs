//! DynamoDB attribute conversion functions.
//!
//! Pure functions for moving between DynamoDB `AttributeValue` maps and flat
//! storage items. Testable without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use supplycast_core::storage::{Page, PageCursor, StorageItem};

/// A DynamoDB item as returned and accepted by the SDK.
pub type AttributeMap = HashMap<String, AttributeValue>;

/// Convert a storage item to a DynamoDB item. Every attribute is written as `S`.
pub fn to_attribute_map(item: StorageItem) -> AttributeMap {
    item.into_iter()
        .map(|(name, value)| (name, AttributeValue::S(value)))
        .collect()
}

/// Convert a DynamoDB item to a storage item.
///
/// `S` values are kept as-is and `N` values keep their exact text. `NULL`
/// attributes are treated as absent, as are attribute types the projection
/// schema never writes.
pub fn from_attribute_map(map: &AttributeMap) -> StorageItem {
    map.iter()
        .filter_map(|(name, value)| match value {
            AttributeValue::S(s) | AttributeValue::N(s) => Some((name.clone(), s.clone())),
            AttributeValue::Null(_) => None,
            other => {
                tracing::trace!(attribute = %name, value = ?other, "Skipping non-scalar attribute");
                None
            }
        })
        .collect()
}

/// Build the `ExclusiveStartKey` for a request from an optional cursor.
pub fn exclusive_start_key(cursor: Option<&PageCursor>) -> Option<AttributeMap> {
    cursor.map(|cursor| to_attribute_map(cursor.0.clone()))
}

/// Assemble a page from the `Items` and `LastEvaluatedKey` of a Scan or Query output.
///
/// An absent or empty `LastEvaluatedKey` ends the pagination.
pub fn page_from_output(
    items: Option<Vec<AttributeMap>>,
    last_evaluated_key: Option<AttributeMap>,
) -> Page {
    let items = items
        .unwrap_or_default()
        .iter()
        .map(from_attribute_map)
        .collect();

    let next = last_evaluated_key
        .filter(|key| !key.is_empty())
        .map(|key| PageCursor(from_attribute_map(&key)));

    Page { items, next }
}
