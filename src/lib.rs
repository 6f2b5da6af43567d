//! Mirrors a player's in-game fleet roster into a remote persistence service:
//! typed game-event records in, normalized ship records out, with differential
//! create/update/delete sync against a committed baseline.

pub mod api;
pub mod cli;
pub mod config;
pub mod master;
pub mod remote;
pub mod roster;

pub use roster::engine::{SyncEngine, SyncError, SyncReport};
