mod placeholder;
mod types;

pub use placeholder::generate_placeholder_projections;
pub use types::{ProjectionKey, SupplyProjection};
