//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the tracker (the clock and share persistence)
//! are abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullShareStore;
