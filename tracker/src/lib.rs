//! Share tracker for a decentralized mining pool's share chain.
//!
//! Wraps the [`sharechain_ledger::DagLedger`] with the state a pool node keeps
//! about shares: which are structurally accepted and which have passed
//! verification, a rolling lookbehind window of recent work, and periodic
//! maintenance that prunes old shares, extends verification, picks the best
//! tip and lists the missing parents to request from peers.
//!
//! [`TrackerService`] runs the single-writer loop on tokio: it drains an
//! inbound share queue and runs maintenance on a timer, while readers query
//! through a [`SharedTracker`].

pub mod config;
pub mod error;
pub mod logging;
pub mod maintenance;
pub mod persist;
pub mod service;
pub mod shared;
pub mod tracker;

pub use config::{PruningConfig, TrackerConfig};
pub use error::TrackerError;
pub use logging::{init_logging, LogFormat};
pub use maintenance::MaintenanceReport;
pub use service::TrackerService;
pub use shared::SharedTracker;
pub use tracker::{ShareTracker, MAX_FUTURE_DRIFT_SECS};
