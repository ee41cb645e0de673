//! Functional core for supplycast.
//!
//! Holds the projection record model, the key codec that maps records to
//! flat storage items, and the storage contracts implemented by the
//! backends in the `supplycast` crate. Nothing in here performs I/O.

pub mod projection;
pub mod storage;
