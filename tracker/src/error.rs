use sharechain_ledger::LedgerError;
use sharechain_store::StoreError;
use sharechain_types::ShareHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("share {0} already added")]
    DuplicateShare(ShareHash),

    /// The share was added, as the root of a new tree.
    #[error("share {hash} added without its parent {parent}")]
    MissingParent { hash: ShareHash, parent: ShareHash },

    #[error("share {hash} timestamp is {ahead_secs} seconds in the future; check the system clock")]
    FutureTimestamp { hash: ShareHash, ahead_secs: u64 },

    #[error("share {hash} builds on {parent}, which was never added")]
    UnknownParent { hash: ShareHash, parent: ShareHash },

    /// Refused because pruning has already dropped history this old.
    #[error("share {hash} is {age_secs} seconds old, past the pruning horizon")]
    ExpiredShare { hash: ShareHash, age_secs: u64 },

    #[error("share {0} was never added")]
    UnknownShare(ShareHash),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("tracker service has stopped")]
    ServiceStopped,
}

impl TrackerError {
    /// Signals that leave the share accepted; the caller decides whether to act.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::MissingParent { .. })
    }

    /// Reasons `verify` turns a share away without failing.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::FutureTimestamp { .. } | Self::UnknownParent { .. }
        )
    }
}
