//! Stat normalization over hand-built master data: bonus subtraction, empty
//! slots, derived categories, and the error cases that make a ship skippable.

use kansync::api::events::{ShipObservation, StatPair};
use kansync::master::{ItemBonuses, ItemClass, MasterCatalog, ShipClass};
use kansync::roster::{normalize_ship, ItemIdMap, RangeBand, SpeedClass, StatError};

fn ship_class(id: i64, speed: i32, length_code: i32) -> ShipClass {
    ShipClass {
        id,
        name: format!("class-{id}"),
        speed,
        length_code,
    }
}

fn item_class(id: i64, bonuses: ItemBonuses) -> ItemClass {
    ItemClass {
        id,
        name: format!("item-{id}"),
        bonuses,
    }
}

/// Classes 10 (fast, short), 11 (slow, very long), 12 (fast, unknown length
/// code); item 200 boosts firepower and sight, item 201 boosts everything.
fn catalog() -> MasterCatalog {
    let mut catalog = MasterCatalog::new();
    catalog.replace(
        vec![
            ship_class(10, 10, 1),
            ship_class(11, 5, 4),
            ship_class(12, 10, 9),
        ],
        vec![
            item_class(
                200,
                ItemBonuses {
                    firepower: 5,
                    los: 1,
                    ..ItemBonuses::default()
                },
            ),
            item_class(
                201,
                ItemBonuses {
                    firepower: 2,
                    armor: 1,
                    torpedo: 3,
                    evasion: 4,
                    aa: 5,
                    asw: 6,
                    los: 7,
                    luck: 8,
                },
            ),
        ],
    );
    catalog
}

fn item_map() -> ItemIdMap {
    let mut map = ItemIdMap::new();
    map.map_item(1, 200);
    map.map_item(2, 201);
    map
}

fn observation(class_id: i64, slots: Vec<i64>, plane_counts: Vec<i32>) -> ShipObservation {
    ShipObservation {
        instance_id: 7,
        class_id,
        level: 23,
        max_hp: 31,
        slots,
        plane_counts,
        firepower: StatPair(50, 59),
        torpedo: StatPair(24, 69),
        anti_air: StatPair(14, 39),
        armor: StatPair(19, 39),
        evasion: StatPair(44, 69),
        asw: StatPair(21, 49),
        line_of_sight: StatPair(8, 17),
        luck: StatPair(12, 49),
    }
}

#[test]
fn bonuses_subtract_across_every_dimension() {
    let ship = normalize_ship(
        &observation(10, vec![1, 2], vec![0, 0]),
        &catalog(),
        &item_map(),
    )
    .unwrap();

    assert_eq!(ship.instance_id, 7);
    assert_eq!(ship.level, 23);
    assert_eq!(ship.equipment, vec![200, 201]);
    assert_eq!(ship.stats.hp, 31, "hull points carry no item bonus");
    assert_eq!(ship.stats.firepower, 43);
    assert_eq!(ship.stats.armor, 18);
    assert_eq!(ship.stats.torpedo, 21);
    assert_eq!(ship.stats.evasion, 40);
    assert_eq!(ship.stats.aa, 9);
    assert_eq!(ship.stats.asw, 15);
    assert_eq!(ship.stats.los, 0);
    assert_eq!(ship.stats.luck, 4);
}

#[test]
fn bare_ship_keeps_raw_totals() {
    let ship = normalize_ship(&observation(10, Vec::new(), Vec::new()), &catalog(), &item_map())
        .unwrap();

    assert!(ship.equipment.is_empty());
    assert_eq!(ship.stats.firepower, 50);
    assert_eq!(ship.stats.los, 8);
    assert_eq!(ship.stats.speed, SpeedClass::Fast);
    assert_eq!(ship.stats.range, Some(RangeBand::Short));
}

#[test]
fn empty_slot_sentinels_are_ignored() {
    let ship = normalize_ship(
        &observation(10, vec![-1, 1, -1], vec![0, 0, 0]),
        &catalog(),
        &item_map(),
    )
    .unwrap();

    assert_eq!(ship.equipment, vec![200]);
    assert_eq!(ship.stats.firepower, 45);
}

#[test]
fn aircraft_is_the_sum_of_carried_planes() {
    let ship = normalize_ship(
        &observation(10, vec![-1, -1, -1], vec![9, 9, 0]),
        &catalog(),
        &item_map(),
    )
    .unwrap();

    assert_eq!(ship.stats.aircraft, 18);
}

#[test]
fn slow_class_gets_slow_speed_and_its_range_band() {
    let ship = normalize_ship(&observation(11, Vec::new(), Vec::new()), &catalog(), &item_map())
        .unwrap();

    assert_eq!(ship.stats.speed, SpeedClass::Slow);
    assert_eq!(ship.stats.range, Some(RangeBand::VeryLong));
}

#[test]
fn unknown_length_code_omits_range() {
    let ship = normalize_ship(&observation(12, Vec::new(), Vec::new()), &catalog(), &item_map())
        .unwrap();

    assert_eq!(ship.stats.range, None);
}

#[test]
fn equipment_keeps_slot_order() {
    let ship = normalize_ship(
        &observation(10, vec![2, 1], vec![0, 0]),
        &catalog(),
        &item_map(),
    )
    .unwrap();

    assert_eq!(ship.equipment, vec![201, 200]);
}

#[test]
fn unmapped_item_is_an_error() {
    let result = normalize_ship(
        &observation(10, vec![3], vec![0]),
        &catalog(),
        &item_map(),
    );
    assert_eq!(result, Err(StatError::UnmappedItem { local_id: 3 }));
}

#[test]
fn mapped_item_missing_from_catalog_is_an_error() {
    let mut map = item_map();
    map.map_item(4, 999);
    let result = normalize_ship(&observation(10, vec![4], vec![0]), &catalog(), &map);
    assert_eq!(result, Err(StatError::UnknownItemClass { class_id: 999 }));
}

#[test]
fn unknown_ship_class_is_an_error() {
    let result = normalize_ship(
        &observation(999, Vec::new(), Vec::new()),
        &catalog(),
        &item_map(),
    );
    assert_eq!(result, Err(StatError::UnknownShipClass { class_id: 999 }));
}
