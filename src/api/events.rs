//! Typed game-event payloads, one record per kcsapi response the sync layer
//! consumes. Field names follow the game API (`api_*`) through serde renames;
//! fields the game omits for enemy-only entries fall back to defaults.

use serde::Deserialize;

/// `[current, max]` stat pair as the game reports it; syncing reads the
/// current (equipment-modified) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatPair(pub i32, pub i32);

impl StatPair {
    pub fn current(self) -> i32 {
        self.0
    }
}

/// Master ship-class record from the session bootstrap (`api_start2`).
#[derive(Debug, Clone, Deserialize)]
pub struct MstShip {
    #[serde(rename = "api_id")]
    pub id: i64,
    #[serde(rename = "api_name", default)]
    pub name: String,
    #[serde(rename = "api_soku", default)]
    pub speed: i32,
    #[serde(rename = "api_leng", default)]
    pub length_code: i32,
}

/// Master item-class record with its per-stat bonuses (`api_start2`).
#[derive(Debug, Clone, Deserialize)]
pub struct MstSlotItem {
    #[serde(rename = "api_id")]
    pub id: i64,
    #[serde(rename = "api_name", default)]
    pub name: String,
    #[serde(rename = "api_houg", default)]
    pub firepower: i32,
    #[serde(rename = "api_souk", default)]
    pub armor: i32,
    #[serde(rename = "api_raig", default)]
    pub torpedo: i32,
    #[serde(rename = "api_houk", default)]
    pub evasion: i32,
    #[serde(rename = "api_tyku", default)]
    pub anti_air: i32,
    #[serde(rename = "api_tais", default)]
    pub asw: i32,
    #[serde(rename = "api_saku", default)]
    pub line_of_sight: i32,
    #[serde(rename = "api_luck", default)]
    pub luck: i32,
}

/// Session bootstrap snapshot (`api_start2`), reduced to the master tables the
/// sync layer needs.
#[derive(Debug, Clone, Deserialize)]
pub struct MasterSnapshot {
    #[serde(rename = "api_mst_ship")]
    pub ships: Vec<MstShip>,
    #[serde(rename = "api_mst_slotitem")]
    pub items: Vec<MstSlotItem>,
}

/// One owned ship as the game reports it (the `ship2` record shape).
#[derive(Debug, Clone, Deserialize)]
pub struct ShipObservation {
    #[serde(rename = "api_id")]
    pub instance_id: i64,
    #[serde(rename = "api_ship_id")]
    pub class_id: i64,
    #[serde(rename = "api_lv")]
    pub level: i32,
    #[serde(rename = "api_maxhp")]
    pub max_hp: i32,
    /// Equipped local item instance ids; negative entries are empty slots.
    #[serde(rename = "api_slot", default)]
    pub slots: Vec<i64>,
    /// Aircraft currently carried, per slot.
    #[serde(rename = "api_onslot", default)]
    pub plane_counts: Vec<i32>,
    #[serde(rename = "api_karyoku")]
    pub firepower: StatPair,
    #[serde(rename = "api_raisou")]
    pub torpedo: StatPair,
    #[serde(rename = "api_taiku")]
    pub anti_air: StatPair,
    #[serde(rename = "api_soukou")]
    pub armor: StatPair,
    #[serde(rename = "api_kaihi")]
    pub evasion: StatPair,
    #[serde(rename = "api_taisen")]
    pub asw: StatPair,
    #[serde(rename = "api_sakuteki")]
    pub line_of_sight: StatPair,
    #[serde(rename = "api_lucky")]
    pub luck: StatPair,
}

/// Full port snapshot (`api_port/port`): the authoritative, complete ship set.
#[derive(Debug, Clone, Deserialize)]
pub struct PortSnapshot {
    #[serde(rename = "api_ship")]
    pub ships: Vec<ShipObservation>,
}

/// Partial ship list (`api_get_member/ship3`): only the ships touched by an
/// equipment or composition change.
#[derive(Debug, Clone, Deserialize)]
pub struct ShipListUpdate {
    #[serde(rename = "api_ship_data")]
    pub ships: Vec<ShipObservation>,
}

/// One owned item instance and the class it was minted from.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SlotItem {
    #[serde(rename = "api_id")]
    pub local_id: i64,
    #[serde(rename = "api_slotitem_id")]
    pub class_id: i64,
}

/// Modernization outcome (`api_req_kaisou/powerup`). The flag reports whether
/// the stat feed actually took; a flag-off ship record carries nothing new.
#[derive(Debug, Clone, Deserialize)]
pub struct Modernization {
    #[serde(rename = "api_powerup_flag")]
    pub flag: i32,
    #[serde(rename = "api_ship")]
    pub ship: ShipObservation,
}

impl Modernization {
    pub fn applied(&self) -> bool {
        self.flag == 1
    }
}

/// Item-crafting outcome (`api_req_kousyou/createitem`). The item record is
/// only present when crafting succeeded.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemCreation {
    #[serde(rename = "api_create_flag")]
    pub flag: i32,
    #[serde(rename = "api_slot_item", default)]
    pub item: Option<SlotItem>,
}

impl ItemCreation {
    pub fn succeeded(&self) -> bool {
        self.flag == 1
    }
}

/// Construction delivery (`api_req_kousyou/getship`): a newly built ship plus
/// the item instances minted with it.
#[derive(Debug, Clone, Deserialize)]
pub struct Construction {
    #[serde(rename = "api_ship")]
    pub ship: ShipObservation,
    #[serde(rename = "api_slotitem", default)]
    pub items: Option<Vec<SlotItem>>,
}

#[cfg(test)]
mod tests {
    use super::{MasterSnapshot, ShipObservation, StatPair};

    #[test]
    fn ship_record_decodes_game_field_names() {
        let raw = r#"{
            "api_id": 7,
            "api_ship_id": 10,
            "api_lv": 23,
            "api_maxhp": 31,
            "api_slot": [1, 4, -1, -1, -1],
            "api_onslot": [9, 9, 0, 0, 0],
            "api_karyoku": [50, 59],
            "api_raisou": [24, 69],
            "api_taiku": [14, 39],
            "api_soukou": [19, 39],
            "api_kaihi": [44, 69],
            "api_taisen": [21, 49],
            "api_sakuteki": [8, 17],
            "api_lucky": [12, 49]
        }"#;
        let ship: ShipObservation = serde_json::from_str(raw).unwrap();
        assert_eq!(ship.instance_id, 7);
        assert_eq!(ship.class_id, 10);
        assert_eq!(ship.firepower, StatPair(50, 59));
        assert_eq!(ship.firepower.current(), 50);
        assert_eq!(ship.slots, vec![1, 4, -1, -1, -1]);
        assert_eq!(ship.plane_counts.iter().sum::<i32>(), 18);
    }

    #[test]
    fn master_snapshot_tolerates_sparse_enemy_entries() {
        let raw = r#"{
            "api_mst_ship": [
                {"api_id": 10, "api_name": "Fubuki", "api_soku": 10, "api_leng": 1},
                {"api_id": 1501}
            ],
            "api_mst_slotitem": [
                {"api_id": 200, "api_name": "12.7cm Twin Mount", "api_houg": 5}
            ]
        }"#;
        let snapshot: MasterSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.ships.len(), 2);
        assert_eq!(snapshot.ships[1].speed, 0, "missing speed defaults to zero");
        assert_eq!(snapshot.items[0].firepower, 5);
        assert_eq!(snapshot.items[0].luck, 0);
    }
}
