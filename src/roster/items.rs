//! Local item-id registry: maps per-account item instance ids to the global
//! item-class ids they were minted from. Remaps overwrite; stale local ids are
//! harmless residue because only currently-equipped ids are ever resolved.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ItemIdMap {
    map: HashMap<i64, i64>,
}

impl ItemIdMap {
    pub fn new() -> ItemIdMap {
        ItemIdMap::default()
    }

    /// Insert-or-overwrite; repeating an existing pair changes nothing.
    pub fn map_item(&mut self, local_id: i64, class_id: i64) {
        self.map.insert(local_id, class_id);
    }

    /// Global class id for a local item instance id, if one has been observed.
    pub fn resolve(&self, local_id: i64) -> Option<i64> {
        self.map.get(&local_id).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
