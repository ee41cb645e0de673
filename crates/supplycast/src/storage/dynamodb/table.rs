//! Table provisioning.
//!
//! Creates the projections table and its indexes when missing and waits for
//! them to become active. Table and index names match what the store queries.

use std::time::Duration;

use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, IndexStatus, KeySchemaElement,
    KeyType, Projection, ProjectionType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;

use supplycast_core::storage::{IndexName, StoreError, StoreResult, ATTR_SORT_KEY, ATTR_STORE_ID};

use super::error::map_table_error;

const MAX_WAIT_ATTEMPTS: usize = 60;
const WAIT_DELAY: Duration = Duration::from_secs(2);

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: String,
    pub sort_key: String,
    pub gsis: Vec<GsiConfig>,
}

/// Global secondary index with an `ALL` projection and no sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiConfig {
    pub name: String,
    pub partition_key: String,
}

impl TableConfig {
    /// Names of every key attribute, without duplicates, in declaration order.
    pub fn key_attributes(&self) -> Vec<&str> {
        let mut names = vec![self.partition_key.as_str(), self.sort_key.as_str()];
        for gsi in &self.gsis {
            if !names.contains(&gsi.partition_key.as_str()) {
                names.push(gsi.partition_key.as_str());
            }
        }
        names
    }
}

/// Returns the table configuration the projection store expects.
/// This is a pure function - no I/O.
pub fn projection_table_config(table_name: &str) -> TableConfig {
    let gsis = [IndexName::ByWeek, IndexName::ByCategory]
        .into_iter()
        .filter_map(|index| {
            index.index_name().map(|name| GsiConfig {
                name: name.to_string(),
                partition_key: index.partition_attribute().to_string(),
            })
        })
        .collect();

    TableConfig {
        table_name: table_name.to_string(),
        partition_key: ATTR_STORE_ID.to_string(),
        sort_key: ATTR_SORT_KEY.to_string(),
        gsis,
    }
}

/// Creates the table when it does not exist, then waits until it and its
/// indexes are active. Returns whether the table was created.
pub async fn ensure_table(client: &Client, config: &TableConfig) -> StoreResult<bool> {
    if is_active(client, &config.table_name).await?.is_some() {
        tracing::debug!(table = %config.table_name, "Table already exists");
        wait_for_table_active(client, &config.table_name).await?;
        return Ok(false);
    }

    tracing::info!(table = %config.table_name, "Creating table");
    let created = create_table(client, config).await?;
    wait_for_table_active(client, &config.table_name).await?;
    tracing::info!(table = %config.table_name, "Table is active");

    Ok(created)
}

async fn create_table(client: &Client, config: &TableConfig) -> StoreResult<bool> {
    let key_schema = vec![
        key_element(&config.partition_key, KeyType::Hash)?,
        key_element(&config.sort_key, KeyType::Range)?,
    ];

    let attribute_definitions = config
        .key_attributes()
        .into_iter()
        .map(|name| {
            AttributeDefinition::builder()
                .attribute_name(name)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(|e| StoreError::Rejected(e.to_string()))
        })
        .collect::<StoreResult<Vec<_>>>()?;

    let mut request = client
        .create_table()
        .table_name(&config.table_name)
        .set_key_schema(Some(key_schema))
        .set_attribute_definitions(Some(attribute_definitions))
        .billing_mode(BillingMode::PayPerRequest);

    for gsi in &config.gsis {
        request = request.global_secondary_indexes(
            GlobalSecondaryIndex::builder()
                .index_name(&gsi.name)
                .key_schema(key_element(&gsi.partition_key, KeyType::Hash)?)
                .projection(
                    Projection::builder()
                        .projection_type(ProjectionType::All)
                        .build(),
                )
                .build()
                .map_err(|e| StoreError::Rejected(e.to_string()))?,
        );
    }

    match request.send().await {
        Ok(_) => Ok(true),
        // Created concurrently by another instance.
        Err(err)
            if matches!(
                err.as_service_error(),
                Some(CreateTableError::ResourceInUseException(_))
            ) =>
        {
            Ok(false)
        }
        Err(err) => Err(map_table_error(err)),
    }
}

fn key_element(name: &str, key_type: KeyType) -> StoreResult<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(|e| StoreError::Rejected(e.to_string()))
}

/// Whether the table and all of its indexes are active; `None` when the table
/// does not exist.
async fn is_active(client: &Client, table_name: &str) -> StoreResult<Option<bool>> {
    let response = match client.describe_table().table_name(table_name).send().await {
        Ok(response) => response,
        Err(err)
            if matches!(
                err.as_service_error(),
                Some(DescribeTableError::ResourceNotFoundException(_))
            ) =>
        {
            return Ok(None)
        }
        Err(err) => return Err(map_table_error(err)),
    };

    let Some(table) = response.table() else {
        return Ok(None);
    };

    let table_active = table.table_status() == Some(&TableStatus::Active);
    let gsis_active = table
        .global_secondary_indexes()
        .iter()
        .all(|gsi| gsi.index_status() == Some(&IndexStatus::Active));

    Ok(Some(table_active && gsis_active))
}

async fn wait_for_table_active(client: &Client, table_name: &str) -> StoreResult<()> {
    for _ in 0..MAX_WAIT_ATTEMPTS {
        if is_active(client, table_name).await? == Some(true) {
            return Ok(());
        }
        tokio::time::sleep(WAIT_DELAY).await;
    }

    Err(StoreError::Unavailable(format!(
        "Table {table_name} did not become active after {} seconds",
        MAX_WAIT_ATTEMPTS as u64 * WAIT_DELAY.as_secs()
    )))
}
