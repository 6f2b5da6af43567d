pub mod engine;
pub mod items;
pub mod model;
pub mod normalize;
pub mod ship;

pub use engine::{RemoteOp, ShipFailure, ShipSkip, SyncEngine, SyncError, SyncReport};
pub use items::ItemIdMap;
pub use model::RosterModel;
pub use normalize::{normalize_ship, range_band, speed_class, StatError};
pub use ship::{BaseStats, RangeBand, ShipRecord, SpeedClass};
