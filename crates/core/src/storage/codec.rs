//! Conversion between projections and flat storage items.
//!
//! Pure functions, testable without a store. `from_storage_item` is the exact
//! inverse of `to_storage_item` for every valid projection.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::projection::SupplyProjection;

use super::keys::{
    ATTR_ADJUSTED_BY, ATTR_CATEGORY, ATTR_CONFIRMED_ON, ATTR_CONSUMED_QUANTITY,
    ATTR_DISPATCHED_QUANTITY, ATTR_ESTIMATED_QUANTITY, ATTR_GENERATED_ON, ATTR_MODEL_ORIGIN,
    ATTR_NOTES, ATTR_PROJECTION_DATE, ATTR_SORT_KEY, ATTR_STATE, ATTR_STORE_ID, ATTR_STORE_NAME,
    ATTR_UNIT, ATTR_VARIANCE, ATTR_WEEK, DATE_FORMAT,
};
use super::{RepositoryError, StorageItem};

/// Convert a projection to a storage item.
///
/// Decimals are written as their exact base-10 strings, dates as ISO 8601
/// and the sort key as `<date>#<week>`. `notes` is omitted when absent.
pub fn to_storage_item(projection: &SupplyProjection) -> StorageItem {
    let mut item = StorageItem::new();

    // Keys
    item.insert(ATTR_STORE_ID.to_string(), projection.store_id.clone());
    item.insert(ATTR_SORT_KEY.to_string(), projection.sort_key());

    // Data
    item.insert(
        ATTR_PROJECTION_DATE.to_string(),
        format_date(projection.projection_date),
    );
    item.insert(ATTR_STORE_NAME.to_string(), projection.store_name.clone());
    item.insert(ATTR_CATEGORY.to_string(), projection.supply_category.clone());
    item.insert(ATTR_UNIT.to_string(), projection.unit_of_measure.clone());
    item.insert(
        ATTR_ESTIMATED_QUANTITY.to_string(),
        projection.estimated_quantity.to_string(),
    );
    item.insert(ATTR_WEEK.to_string(), projection.week.clone());
    item.insert(ATTR_MODEL_ORIGIN.to_string(), projection.model_origin.clone());
    item.insert(
        ATTR_GENERATED_ON.to_string(),
        format_date(projection.generated_on),
    );
    item.insert(ATTR_STATE.to_string(), projection.projection_state.clone());
    item.insert(
        ATTR_DISPATCHED_QUANTITY.to_string(),
        projection.dispatched_quantity.to_string(),
    );
    item.insert(
        ATTR_CONSUMED_QUANTITY.to_string(),
        projection.actual_consumed_quantity.to_string(),
    );
    item.insert(
        ATTR_VARIANCE.to_string(),
        projection.variance_vs_actual.to_string(),
    );
    item.insert(ATTR_ADJUSTED_BY.to_string(), projection.adjusted_by.clone());
    item.insert(
        ATTR_CONFIRMED_ON.to_string(),
        format_date(projection.confirmed_on),
    );
    if let Some(notes) = &projection.notes {
        item.insert(ATTR_NOTES.to_string(), notes.clone());
    }

    item
}

/// Convert a storage item back to a projection.
///
/// Fails with [`RepositoryError::Encoding`] naming the first missing or
/// malformed field. Only `notes` may be absent.
pub fn from_storage_item(item: &StorageItem) -> Result<SupplyProjection, RepositoryError> {
    Ok(SupplyProjection {
        projection_date: get_date(item, ATTR_PROJECTION_DATE)?,
        store_id: get_string(item, ATTR_STORE_ID)?,
        store_name: get_string(item, ATTR_STORE_NAME)?,
        supply_category: get_string(item, ATTR_CATEGORY)?,
        unit_of_measure: get_string(item, ATTR_UNIT)?,
        estimated_quantity: get_decimal(item, ATTR_ESTIMATED_QUANTITY)?,
        week: get_string(item, ATTR_WEEK)?,
        model_origin: get_string(item, ATTR_MODEL_ORIGIN)?,
        generated_on: get_date(item, ATTR_GENERATED_ON)?,
        projection_state: get_string(item, ATTR_STATE)?,
        dispatched_quantity: get_decimal(item, ATTR_DISPATCHED_QUANTITY)?,
        actual_consumed_quantity: get_decimal(item, ATTR_CONSUMED_QUANTITY)?,
        variance_vs_actual: get_decimal(item, ATTR_VARIANCE)?,
        adjusted_by: get_string(item, ATTR_ADJUSTED_BY)?,
        confirmed_on: get_date(item, ATTR_CONFIRMED_ON)?,
        notes: item.get(ATTR_NOTES).cloned(),
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Get a required string attribute.
fn get_string(item: &StorageItem, field: &'static str) -> Result<String, RepositoryError> {
    item.get(field)
        .cloned()
        .ok_or_else(|| RepositoryError::encoding(field, "missing"))
}

/// Get a required date attribute (YYYY-MM-DD format).
fn get_date(item: &StorageItem, field: &'static str) -> Result<NaiveDate, RepositoryError> {
    let s = get_string(item, field)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT)
        .map_err(|e| RepositoryError::encoding(field, format!("invalid date {s:?}: {e}")))
}

/// Get a required decimal attribute, keeping its scale.
fn get_decimal(
    item: &StorageItem,
    field: &'static str,
) -> Result<BigDecimal, RepositoryError> {
    let s = get_string(item, field)?;
    BigDecimal::from_str(&s)
        .map_err(|e| RepositoryError::encoding(field, format!("invalid decimal {s:?}: {e}")))
}
