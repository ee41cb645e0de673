mod codec;
mod error;
mod http_mapping;
mod keys;
mod traits;
mod types;

pub use codec::{from_storage_item, to_storage_item};
pub use error::{RepositoryError, Result, StoreError, StoreResult};
pub use http_mapping::repository_error_to_status_code;
pub use keys::*;
pub use traits::{ItemStore, ProjectionRepository};
pub use types::{IndexName, ItemKey, Page, PageCursor, PageRequest, QueryTarget, StorageItem};
