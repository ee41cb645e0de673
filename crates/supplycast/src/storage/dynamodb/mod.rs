//! DynamoDB storage backend.
//!
//! Single table keyed by `tienda_id` + `fecha_proyeccion_semana` with the
//! `semana-index` and `categoria-index` GSIs, using `aws-sdk-dynamodb`.

mod conversions;
mod error;
mod store;
mod table;

pub use store::{create_client, DynamoDbStore};
pub use table::{ensure_table, projection_table_config};
