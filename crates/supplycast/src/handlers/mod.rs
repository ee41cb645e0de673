pub mod error;
pub mod health;
pub mod projections;

pub use error::{AppError, NotFound};
