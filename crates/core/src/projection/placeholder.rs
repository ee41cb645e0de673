//! Placeholder projection generation.
//!
//! Stands in for the forecasting model until one is wired up: the output is
//! static apart from the generation date.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use num_bigint::BigInt;

use super::types::SupplyProjection;

const PLACEHOLDER_STORES: [(&str, &str); 2] = [
    ("T001", "Salón Surco Central"),
    ("T002", "Salón Miraflores"),
];
const PLACEHOLDER_CATEGORIES: [&str; 2] = ["crepas", "waffles"];
const PLACEHOLDER_WEEK: &str = "2025-W41";
const PLACEHOLDER_MODEL: &str = "Promedio_Historico_v1";

/// Generate one placeholder projection per store and category.
///
/// # Example
///
/// ```
/// use supplycast_core::projection::generate_placeholder_projections;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
/// let projections = generate_placeholder_projections(today);
///
/// assert_eq!(projections.len(), 4);
/// assert!(projections.iter().all(|p| p.generated_on == today));
/// ```
pub fn generate_placeholder_projections(generated_on: NaiveDate) -> Vec<SupplyProjection> {
    // Static dates are always valid; fall back to generated_on to stay panic-free.
    let projection_date = NaiveDate::from_ymd_opt(2025, 10, 5).unwrap_or(generated_on);
    let confirmed_on = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap_or(generated_on);

    let mut projections =
        Vec::with_capacity(PLACEHOLDER_STORES.len() * PLACEHOLDER_CATEGORIES.len());

    for (store_id, store_name) in PLACEHOLDER_STORES {
        for category in PLACEHOLDER_CATEGORIES {
            projections.push(SupplyProjection {
                projection_date,
                store_id: store_id.to_string(),
                store_name: store_name.to_string(),
                supply_category: category.to_string(),
                unit_of_measure: unit_for_category(category).to_string(),
                estimated_quantity: BigDecimal::new(BigInt::from(1250), 2),
                week: PLACEHOLDER_WEEK.to_string(),
                model_origin: PLACEHOLDER_MODEL.to_string(),
                generated_on,
                projection_state: "pendiente".to_string(),
                dispatched_quantity: BigDecimal::new(BigInt::from(1100), 2),
                actual_consumed_quantity: BigDecimal::new(BigInt::from(1180), 2),
                variance_vs_actual: BigDecimal::new(BigInt::from(70), 2),
                adjusted_by: "sistema_autajuste".to_string(),
                confirmed_on,
                notes: Some("Generado automáticamente".to_string()),
            });
        }
    }

    projections
}

fn unit_for_category(category: &str) -> &'static str {
    match category {
        "crepas" => "Base de crepe",
        _ => "Base de waffle",
    }
}
