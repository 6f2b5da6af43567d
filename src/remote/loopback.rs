//! Offline gateway: acknowledges every operation and echoes the canonical
//! representation the real service would return. Backs `check` runs and the
//! reconcile benchmark.

use async_trait::async_trait;

use crate::roster::ship::ShipRecord;

use super::wire::RemoteShip;
use super::{RemoteError, RemoteGateway};

/// Accepts everything; remote state is implied to match whatever was sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoopbackGateway;

impl LoopbackGateway {
    pub fn new() -> LoopbackGateway {
        LoopbackGateway
    }
}

#[async_trait]
impl RemoteGateway for LoopbackGateway {
    async fn create_ship(&self, ship: &ShipRecord) -> Result<RemoteShip, RemoteError> {
        Ok(RemoteShip::from_record(ship))
    }

    async fn update_ship(
        &self,
        _instance_id: i64,
        ship: &ShipRecord,
    ) -> Result<RemoteShip, RemoteError> {
        Ok(RemoteShip::from_record(ship))
    }

    async fn delete_ship(&self, _instance_id: i64) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn fetch_roster(&self, _fields: &[&str]) -> Result<Vec<RemoteShip>, RemoteError> {
        Ok(Vec::new())
    }
}
