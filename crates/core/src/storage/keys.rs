//! Stored attribute names and key derivation.
//!
//! The attribute names are those of the existing projections table. All
//! functions are pure.

use chrono::NaiveDate;

// ============================================================================
// Primary key attributes
// ============================================================================

/// Partition key of the table.
pub const ATTR_STORE_ID: &str = "tienda_id";
/// Sort key of the table, `<projection_date>#<week>`.
pub const ATTR_SORT_KEY: &str = "fecha_proyeccion_semana";

// ============================================================================
// Data attributes
// ============================================================================

pub const ATTR_PROJECTION_DATE: &str = "fecha_proyeccion";
pub const ATTR_STORE_NAME: &str = "nombre_tienda";
/// Partition key of [`CATEGORY_INDEX`].
pub const ATTR_CATEGORY: &str = "categoria_insumo";
pub const ATTR_UNIT: &str = "unidad_medida";
pub const ATTR_ESTIMATED_QUANTITY: &str = "cantidad_estimada";
/// Partition key of [`WEEK_INDEX`].
pub const ATTR_WEEK: &str = "semana";
pub const ATTR_MODEL_ORIGIN: &str = "origen_modelo";
pub const ATTR_GENERATED_ON: &str = "fecha_generacion";
pub const ATTR_STATE: &str = "estado_proyeccion";
pub const ATTR_DISPATCHED_QUANTITY: &str = "cantidad_despachada";
pub const ATTR_CONSUMED_QUANTITY: &str = "cantidad_consumida_real";
pub const ATTR_VARIANCE: &str = "diferencia_vs_real";
pub const ATTR_ADJUSTED_BY: &str = "usuario_ajuste";
pub const ATTR_CONFIRMED_ON: &str = "fecha_confirmacion";
pub const ATTR_NOTES: &str = "observaciones";

// ============================================================================
// Secondary indexes
// ============================================================================

/// GSI partitioned on [`ATTR_WEEK`].
pub const WEEK_INDEX: &str = "semana-index";
/// GSI partitioned on [`ATTR_CATEGORY`].
pub const CATEGORY_INDEX: &str = "categoria-index";

pub const SORT_KEY_SEPARATOR: char = '#';

/// ISO 8601 calendar date format used for every stored date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Generate the sort key for a projection.
///
/// Pattern: `<YYYY-MM-DD>#<week>`
pub fn sort_key(projection_date: NaiveDate, week: &str) -> String {
    format!(
        "{}{SORT_KEY_SEPARATOR}{week}",
        projection_date.format(DATE_FORMAT)
    )
}
