//! Storage backends and the projection gateway.
//!
//! The gateway implements `supplycast_core::storage::ProjectionRepository`
//! over any `ItemStore`. Backends:
//!
//! - `inmemory`: always available, used by tests and `STORAGE_BACKEND=memory`
//! - `dynamodb` (default feature): AWS DynamoDB via `aws-sdk-dynamodb`
//!
//! Build without DynamoDB support:
//! ```bash
//! cargo build -p supplycast --no-default-features
//! ```

mod gateway;
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub use gateway::ProjectionGateway;
