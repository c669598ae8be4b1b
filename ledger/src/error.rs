use sharechain_types::ShareHash;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("share not found: {0}")]
    NotFound(ShareHash),

    #[error("share already exists: {0}")]
    AlreadyExists(ShareHash),

    #[error("{tail} is not an ancestor of {head}")]
    NotAncestor { head: ShareHash, tail: ShareHash },

    #[error("chain below {hash} ends after {reached} of {requested} steps")]
    InsufficientDepth {
        hash: ShareHash,
        requested: u64,
        reached: u64,
    },
}
