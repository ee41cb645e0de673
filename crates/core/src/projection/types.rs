use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::storage::sort_key;

/// A supply projection for one store, category and week.
///
/// Quantities are exact decimals so that `12.50` keeps its scale through
/// storage and JSON round trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyProjection {
    /// Day the estimate applies to.
    pub projection_date: NaiveDate,
    pub store_id: String,
    pub store_name: String,
    pub supply_category: String,
    pub unit_of_measure: String,
    pub estimated_quantity: BigDecimal,
    /// Week label, `YYYY-W##`.
    pub week: String,
    /// Forecasting method that produced the estimate.
    pub model_origin: String,
    pub generated_on: NaiveDate,
    pub projection_state: String,
    pub dispatched_quantity: BigDecimal,
    pub actual_consumed_quantity: BigDecimal,
    pub variance_vs_actual: BigDecimal,
    /// User or automated process that last touched the record.
    pub adjusted_by: String,
    pub confirmed_on: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SupplyProjection {
    /// Returns the composite key that identifies this record.
    ///
    /// The supply category is not part of the key: two records that only
    /// differ in category share a key and overwrite each other.
    pub fn key(&self) -> ProjectionKey {
        ProjectionKey::new(&self.store_id, self.projection_date, &self.week)
    }

    /// Sort key under which the record is stored (`<date>#<week>`).
    pub fn sort_key(&self) -> String {
        sort_key(self.projection_date, &self.week)
    }
}

/// Composite primary key of a projection: `(store_id, projection_date, week)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectionKey {
    pub store_id: String,
    pub projection_date: NaiveDate,
    pub week: String,
}

impl ProjectionKey {
    pub fn new(
        store_id: impl Into<String>,
        projection_date: NaiveDate,
        week: impl Into<String>,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            projection_date,
            week: week.into(),
        }
    }

    /// Sort key for this composite key (`<date>#<week>`).
    pub fn sort_key(&self) -> String {
        sort_key(self.projection_date, &self.week)
    }
}
