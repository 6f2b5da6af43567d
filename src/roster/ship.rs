//! Committed ship records: the equipment-independent shape of a ship as it is
//! persisted remotely. `BaseStats` doubles as the remote `stats` JSON object.

use serde::{Deserialize, Serialize};

/// Coarse speed category, fixed by the ship class's static speed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedClass {
    Slow,
    Fast,
}

impl SpeedClass {
    pub fn as_str(self) -> &'static str {
        match self {
            SpeedClass::Slow => "slow",
            SpeedClass::Fast => "fast",
        }
    }
}

/// Firing-range band, fixed by the ship class's hull-length code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeBand {
    Short,
    Medium,
    Long,
    #[serde(rename = "very long")]
    VeryLong,
}

impl RangeBand {
    pub fn as_str(self) -> &'static str {
        match self {
            RangeBand::Short => "short",
            RangeBand::Medium => "medium",
            RangeBand::Long => "long",
            RangeBand::VeryLong => "very long",
        }
    }
}

/// Normalized (equipment-independent) ship statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: i32,
    pub firepower: i32,
    pub armor: i32,
    pub torpedo: i32,
    pub evasion: i32,
    pub aa: i32,
    /// Total aircraft currently carried; summed per slot, never back-computed.
    pub aircraft: i32,
    pub asw: i32,
    pub speed: SpeedClass,
    pub los: i32,
    /// Absent when the class's hull-length code falls outside the known bands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeBand>,
    pub luck: i32,
}

/// A ship as committed to the roster baseline: instance identity from the
/// game, class and level, equipped item classes in slot order, and normalized
/// stats. Structural equality over every field decides write suppression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipRecord {
    pub instance_id: i64,
    pub class_id: i64,
    pub level: i32,
    pub equipment: Vec<i64>,
    pub stats: BaseStats,
}

#[cfg(test)]
mod tests {
    use super::{BaseStats, RangeBand, SpeedClass};

    fn stats(range: Option<RangeBand>) -> BaseStats {
        BaseStats {
            hp: 15,
            firepower: 29,
            armor: 5,
            torpedo: 27,
            evasion: 40,
            aa: 12,
            aircraft: 0,
            asw: 20,
            speed: SpeedClass::Fast,
            los: 7,
            range,
            luck: 12,
        }
    }

    #[test]
    fn stats_serialize_with_wire_field_names_and_categories() {
        let json = serde_json::to_value(stats(Some(RangeBand::VeryLong))).unwrap();
        assert_eq!(json["speed"], "fast");
        assert_eq!(json["range"], "very long");
        assert_eq!(json["firepower"], 29);
        assert_eq!(json["los"], 7);
    }

    #[test]
    fn absent_range_is_omitted_and_round_trips() {
        let json = serde_json::to_value(stats(None)).unwrap();
        assert!(
            json.get("range").is_none(),
            "absent range must omit the key, got {json}"
        );
        let back: BaseStats = serde_json::from_value(json).unwrap();
        assert_eq!(back, stats(None));
    }

    #[test]
    fn speed_strings_round_trip() {
        for (speed, text) in [(SpeedClass::Slow, "slow"), (SpeedClass::Fast, "fast")] {
            let json = serde_json::to_value(speed).unwrap();
            assert_eq!(json, text);
            let back: SpeedClass = serde_json::from_value(json).unwrap();
            assert_eq!(back, speed);
            assert_eq!(speed.as_str(), text);
        }
    }
}
