//! In-memory storage backend.
//!
//! Keeps items in a `BTreeMap` wrapped in `Arc<RwLock<_>>` and serves reads in
//! fixed-size pages, so the gateway's pagination loop runs the same way it
//! does against DynamoDB. Useful for tests and local development.
//!
//! # Example
//!
//! ```rust,ignore
//! use supplycast::storage::inmemory::InMemoryStore;
//! use supplycast::storage::ProjectionGateway;
//!
//! let gateway = ProjectionGateway::new(InMemoryStore::with_page_size(2));
//! ```

mod store;

pub use store::{InMemoryStore, DEFAULT_PAGE_SIZE};
