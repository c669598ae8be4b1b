use sharechain_types::ShareHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("share not in store: {0}")]
    NotFound(ShareHash),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("stored share is corrupted: {0}")]
    Corruption(String),
}
