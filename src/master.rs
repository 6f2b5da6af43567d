//! Master reference data for the current game session: static ship-class and
//! item-class attributes keyed by global class id. Replaced wholesale on each
//! session bootstrap, never merged.

use std::collections::HashMap;

/// Static per-class ship attributes from the session bootstrap snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipClass {
    pub id: i64,
    pub name: String,
    /// Raw speed value; anything over the fast threshold is a fast ship.
    pub speed: i32,
    /// 1-based hull-length code indexing the firing-range bands.
    pub length_code: i32,
}

/// Per-stat bonuses contributed by one equipped item class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemBonuses {
    pub firepower: i32,
    pub armor: i32,
    pub torpedo: i32,
    pub evasion: i32,
    pub aa: i32,
    pub asw: i32,
    pub los: i32,
    pub luck: i32,
}

impl ItemBonuses {
    pub fn accumulate(&mut self, other: ItemBonuses) {
        self.firepower += other.firepower;
        self.armor += other.armor;
        self.torpedo += other.torpedo;
        self.evasion += other.evasion;
        self.aa += other.aa;
        self.asw += other.asw;
        self.los += other.los;
        self.luck += other.luck;
    }
}

/// Static per-class item attributes from the session bootstrap snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemClass {
    pub id: i64,
    pub name: String,
    pub bonuses: ItemBonuses,
}

/// Session-scoped catalog of ship and item classes. Lookups borrow; a reload
/// drops every previous entry.
#[derive(Debug, Default)]
pub struct MasterCatalog {
    ships: HashMap<i64, ShipClass>,
    items: HashMap<i64, ItemClass>,
}

impl MasterCatalog {
    pub fn new() -> MasterCatalog {
        MasterCatalog::default()
    }

    /// Replaces both tables wholesale.
    pub fn replace(&mut self, ships: Vec<ShipClass>, items: Vec<ItemClass>) {
        self.ships = ships.into_iter().map(|class| (class.id, class)).collect();
        self.items = items.into_iter().map(|class| (class.id, class)).collect();
    }

    /// Both tables are populated for the current session.
    pub fn is_ready(&self) -> bool {
        !self.ships.is_empty() && !self.items.is_empty()
    }

    pub fn ship_class(&self, id: i64) -> Option<&ShipClass> {
        self.ships.get(&id)
    }

    pub fn item_class(&self, id: i64) -> Option<&ItemClass> {
        self.items.get(&id)
    }

    pub fn ship_class_count(&self) -> usize {
        self.ships.len()
    }

    pub fn item_class_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemBonuses, ItemClass, MasterCatalog, ShipClass};

    fn ship(id: i64) -> ShipClass {
        ShipClass {
            id,
            name: format!("class-{id}"),
            speed: 10,
            length_code: 2,
        }
    }

    fn item(id: i64) -> ItemClass {
        ItemClass {
            id,
            name: format!("item-{id}"),
            bonuses: ItemBonuses::default(),
        }
    }

    #[test]
    fn not_ready_until_both_tables_have_entries() {
        let mut catalog = MasterCatalog::new();
        assert!(!catalog.is_ready());
        catalog.replace(vec![ship(1)], Vec::new());
        assert!(!catalog.is_ready(), "empty item table must not read as ready");
        catalog.replace(vec![ship(1)], vec![item(10)]);
        assert!(catalog.is_ready());
    }

    #[test]
    fn replace_drops_entries_from_the_previous_session() {
        let mut catalog = MasterCatalog::new();
        catalog.replace(vec![ship(1), ship(2)], vec![item(10)]);
        assert!(catalog.ship_class(2).is_some());

        catalog.replace(vec![ship(3)], vec![item(11)]);
        assert!(catalog.ship_class(2).is_none(), "stale class survived reload");
        assert!(catalog.item_class(10).is_none(), "stale item survived reload");
        assert_eq!(catalog.ship_class_count(), 1);
        assert_eq!(catalog.item_class_count(), 1);
    }

    #[test]
    fn bonus_accumulation_sums_every_dimension() {
        let mut total = ItemBonuses::default();
        total.accumulate(ItemBonuses {
            firepower: 5,
            armor: 1,
            torpedo: 2,
            evasion: 0,
            aa: 3,
            asw: 4,
            los: 1,
            luck: 0,
        });
        total.accumulate(ItemBonuses {
            firepower: 2,
            ..ItemBonuses::default()
        });
        assert_eq!(total.firepower, 7);
        assert_eq!(total.asw, 4);
        assert_eq!(total.luck, 0);
    }
}
