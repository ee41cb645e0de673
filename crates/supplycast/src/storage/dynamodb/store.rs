//! DynamoDB item store implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;

use supplycast_core::storage::{
    IndexName, ItemKey, ItemStore, Page, PageRequest, QueryTarget, StorageItem, StoreResult,
    ATTR_SORT_KEY, ATTR_STORE_ID,
};

use super::conversions::{exclusive_start_key, page_from_output, to_attribute_map};
use super::error::{map_delete_item_error, map_put_item_error, map_query_error, map_scan_error};

/// Placeholders of the partition key condition used by every query.
const PARTITION_CONDITION: &str = "#pk = :pk";
const PARTITION_NAME: &str = "#pk";
const PARTITION_VALUE: &str = ":pk";

/// Query parameters selecting one partition of the table or of a GSI.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PartitionQuery {
    pub index_name: Option<String>,
    pub key_condition: &'static str,
    pub attribute_names: HashMap<String, String>,
    pub attribute_values: HashMap<String, AttributeValue>,
}

/// Builds the Query parameters for the `value` partition of `index`.
pub(crate) fn partition_query(index: IndexName, value: &str) -> PartitionQuery {
    PartitionQuery {
        index_name: index.index_name().map(str::to_string),
        key_condition: PARTITION_CONDITION,
        attribute_names: HashMap::from([(
            PARTITION_NAME.to_string(),
            index.partition_attribute().to_string(),
        )]),
        attribute_values: HashMap::from([(
            PARTITION_VALUE.to_string(),
            AttributeValue::S(value.to_string()),
        )]),
    }
}

/// Creates a DynamoDB client for `region`, optionally against a custom endpoint
/// (DynamoDB Local).
pub async fn create_client(region: &str, endpoint_url: Option<&str>) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    if let Some(endpoint) = endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;
    Client::new(&sdk_config)
}

/// DynamoDB-backed item store.
///
/// Issues exactly one SDK call per operation; reads return one page and the
/// `LastEvaluatedKey` as the next cursor.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl ItemStore for DynamoDbStore {
    async fn put_item(&self, item: StorageItem) -> StoreResult<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_attribute_map(item)))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn delete_item(&self, key: &ItemKey) -> StoreResult<bool> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(ATTR_STORE_ID, AttributeValue::S(key.partition.clone()))
            .key(ATTR_SORT_KEY, AttributeValue::S(key.sort.clone()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(result.attributes.is_some_and(|old| !old.is_empty()))
    }

    async fn fetch_page(&self, request: &PageRequest) -> StoreResult<Page> {
        let start_key = exclusive_start_key(request.cursor.as_ref());

        match &request.target {
            QueryTarget::Scan => {
                let result = self
                    .client
                    .scan()
                    .table_name(&self.table_name)
                    .set_exclusive_start_key(start_key)
                    .send()
                    .await
                    .map_err(map_scan_error)?;

                Ok(page_from_output(result.items, result.last_evaluated_key))
            }
            QueryTarget::Partition { index, value } => {
                let query = partition_query(*index, value);
                let result = self
                    .client
                    .query()
                    .table_name(&self.table_name)
                    .set_index_name(query.index_name)
                    .key_condition_expression(query.key_condition)
                    .set_expression_attribute_names(Some(query.attribute_names))
                    .set_expression_attribute_values(Some(query.attribute_values))
                    .set_exclusive_start_key(start_key)
                    .send()
                    .await
                    .map_err(map_query_error)?;

                Ok(page_from_output(result.items, result.last_evaluated_key))
            }
        }
    }
}
