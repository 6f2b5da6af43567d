//! Stat normalization: strips equipped-item bonuses from the raw,
//! equipment-modified totals the game reports, so the roster stores base hull
//! values plus the class's static speed/range categories.

use std::fmt;

use crate::api::events::ShipObservation;
use crate::master::{ItemBonuses, MasterCatalog};

use super::items::ItemIdMap;
use super::ship::{BaseStats, RangeBand, ShipRecord, SpeedClass};

/// Class speed values above this are fast ships (the game encodes slow=5,
/// fast=10).
pub const FAST_SPEED_THRESHOLD: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatError {
    /// An equipped local item id has no class mapping yet.
    UnmappedItem { local_id: i64 },
    /// A mapped item class id is missing from the master catalog.
    UnknownItemClass { class_id: i64 },
    /// The ship's own class id is missing from the master catalog.
    UnknownShipClass { class_id: i64 },
}

impl fmt::Display for StatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedItem { local_id } => {
                write!(f, "equipped item {local_id} has no known class mapping")
            }
            Self::UnknownItemClass { class_id } => {
                write!(f, "item class {class_id} is not in the master catalog")
            }
            Self::UnknownShipClass { class_id } => {
                write!(f, "ship class {class_id} is not in the master catalog")
            }
        }
    }
}

impl std::error::Error for StatError {}

pub fn speed_class(speed_value: i32) -> SpeedClass {
    if speed_value > FAST_SPEED_THRESHOLD {
        SpeedClass::Fast
    } else {
        SpeedClass::Slow
    }
}

/// 1-based hull-length code to range band; out-of-range codes have no band.
pub fn range_band(length_code: i32) -> Option<RangeBand> {
    match length_code {
        1 => Some(RangeBand::Short),
        2 => Some(RangeBand::Medium),
        3 => Some(RangeBand::Long),
        4 => Some(RangeBand::VeryLong),
        _ => None,
    }
}

/// Derives the committed record for one observed ship: resolves the equipped
/// items, subtracts their summed bonuses from the raw totals, and attaches the
/// class's static categories. Nothing partial escapes on error.
pub fn normalize_ship(
    observation: &ShipObservation,
    catalog: &MasterCatalog,
    items: &ItemIdMap,
) -> Result<ShipRecord, StatError> {
    let class = catalog
        .ship_class(observation.class_id)
        .ok_or(StatError::UnknownShipClass {
            class_id: observation.class_id,
        })?;

    let mut equipment = Vec::new();
    let mut bonus = ItemBonuses::default();
    for &local_id in &observation.slots {
        // Negative slot entries are the game's empty-slot sentinel.
        if local_id < 0 {
            continue;
        }
        let item_class_id = items
            .resolve(local_id)
            .ok_or(StatError::UnmappedItem { local_id })?;
        let item = catalog
            .item_class(item_class_id)
            .ok_or(StatError::UnknownItemClass {
                class_id: item_class_id,
            })?;
        bonus.accumulate(item.bonuses);
        equipment.push(item_class_id);
    }

    let stats = BaseStats {
        hp: observation.max_hp,
        firepower: observation.firepower.current() - bonus.firepower,
        armor: observation.armor.current() - bonus.armor,
        torpedo: observation.torpedo.current() - bonus.torpedo,
        evasion: observation.evasion.current() - bonus.evasion,
        aa: observation.anti_air.current() - bonus.aa,
        aircraft: observation.plane_counts.iter().sum(),
        asw: observation.asw.current() - bonus.asw,
        speed: speed_class(class.speed),
        los: observation.line_of_sight.current() - bonus.los,
        range: range_band(class.length_code),
        luck: observation.luck.current() - bonus.luck,
    };

    Ok(ShipRecord {
        instance_id: observation.instance_id,
        class_id: observation.class_id,
        level: observation.level,
        equipment,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::{range_band, speed_class};
    use crate::roster::ship::{RangeBand, SpeedClass};

    #[test]
    fn speed_category_splits_on_the_threshold() {
        assert_eq!(speed_class(5), SpeedClass::Slow);
        assert_eq!(speed_class(10), SpeedClass::Fast);
        assert_eq!(speed_class(0), SpeedClass::Slow);
        assert_eq!(speed_class(6), SpeedClass::Fast);
    }

    #[test]
    fn range_band_covers_the_four_codes_and_nothing_else() {
        assert_eq!(range_band(1), Some(RangeBand::Short));
        assert_eq!(range_band(2), Some(RangeBand::Medium));
        assert_eq!(range_band(3), Some(RangeBand::Long));
        assert_eq!(range_band(4), Some(RangeBand::VeryLong));
        assert_eq!(range_band(0), None);
        assert_eq!(range_band(5), None);
        assert_eq!(range_band(-1), None);
    }
}
