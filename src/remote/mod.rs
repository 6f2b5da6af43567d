//! Remote sync gateway boundary: the trait the reconciliation engine drives,
//! its error taxonomy, and the gateway implementations.

pub mod http;
pub mod loopback;
pub mod wire;

use std::fmt;

use async_trait::async_trait;

use crate::roster::ship::ShipRecord;
use wire::RemoteShip;

pub use http::HttpGateway;
pub use loopback::LoopbackGateway;
pub use wire::{ApiEnvelope, LoginSession, CLIENT_ORIGIN};

/// Field filter requested when seeding the roster baseline at session start.
pub const SEED_FIELDS: &[&str] = &["id", "origin", "baseId", "level", "equipment", "stats"];

#[derive(Debug)]
pub enum RemoteError {
    /// The service answered but rejected the operation (body status "error").
    Rejected { message: String },
    /// Non-success HTTP status without a service error body.
    Status(u16),
    /// Connection-level failure: DNS, refused, timeout, TLS.
    Transport(reqwest::Error),
    /// The response body could not be decoded.
    Payload(serde_json::Error),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { message } => write!(f, "service rejected the operation: {message}"),
            Self::Status(code) => write!(f, "unexpected HTTP status {code}"),
            Self::Transport(err) => write!(f, "transport failure: {err}"),
            Self::Payload(err) => write!(f, "undecodable service response: {err}"),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err)
    }
}

/// Persistence-service contract as the engine sees it. Every call settles to
/// one terminal outcome; retry and timeout policy live behind the
/// implementation, never in the engine.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Persist a ship the service has not seen; returns the canonical stored form.
    async fn create_ship(&self, ship: &ShipRecord) -> Result<RemoteShip, RemoteError>;

    /// Replace the stored state of a known ship; returns the canonical stored form.
    async fn update_ship(&self, instance_id: i64, ship: &ShipRecord)
        -> Result<RemoteShip, RemoteError>;

    /// Drop a ship by instance id.
    async fn delete_ship(&self, instance_id: i64) -> Result<(), RemoteError>;

    /// Previously persisted roster entries, restricted to `fields`.
    async fn fetch_roster(&self, fields: &[&str]) -> Result<Vec<RemoteShip>, RemoteError>;
}
