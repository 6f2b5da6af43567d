//! Committed roster baseline: ships as last acknowledged by the remote store,
//! keyed by instance id. The reconciliation engine mutates it only after a
//! remote operation is confirmed, so it never reflects speculative state.

use std::collections::HashMap;

use super::ship::ShipRecord;

#[derive(Debug, Default)]
pub struct RosterModel {
    ships: HashMap<i64, ShipRecord>,
}

impl RosterModel {
    pub fn new() -> RosterModel {
        RosterModel::default()
    }

    pub fn contains(&self, instance_id: i64) -> bool {
        self.ships.contains_key(&instance_id)
    }

    pub fn get(&self, instance_id: i64) -> Option<&ShipRecord> {
        self.ships.get(&instance_id)
    }

    /// Insert-or-replace under the record's own instance id.
    pub fn put(&mut self, ship: ShipRecord) {
        self.ships.insert(ship.instance_id, ship);
    }

    pub fn remove(&mut self, instance_id: i64) -> Option<ShipRecord> {
        self.ships.remove(&instance_id)
    }

    /// Snapshot of every committed instance id.
    pub fn ids(&self) -> Vec<i64> {
        self.ships.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }
}
