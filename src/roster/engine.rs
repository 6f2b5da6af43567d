//! Reconciliation engine: folds observed game state into the committed roster
//! baseline and drives the minimum set of remote create/update/delete calls.
//!
//! The baseline only ever advances from what the service acknowledges, so a
//! failed operation leaves the previous committed state in place and the next
//! observation retries naturally.

use std::collections::{HashMap, HashSet};
use std::fmt;

use futures_util::stream::{self, StreamExt};
use log::{debug, info, warn};
use serde::Serialize;

use crate::api::events::{
    Construction, ItemCreation, Modernization, MstShip, MstSlotItem, ShipObservation, SlotItem,
};
use crate::master::{ItemBonuses, ItemClass, MasterCatalog, ShipClass};
use crate::remote::{RemoteError, RemoteGateway, CLIENT_ORIGIN, SEED_FIELDS};

use super::items::ItemIdMap;
use super::model::RosterModel;
use super::normalize::{normalize_ship, StatError};
use super::ship::ShipRecord;

/// Remote operations allowed in flight at once within a single observation.
const REMOTE_OPS_IN_FLIGHT: usize = 8;

#[derive(Debug)]
pub enum SyncError {
    /// A ship or item observation arrived before any master snapshot this
    /// session.
    MasterDataNotLoaded,
    /// The bootstrap snapshot is unusable; the previous catalog (if any) is
    /// kept.
    MasterDataEmpty { ships: usize, items: usize },
    Stat(StatError),
    Remote(RemoteError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MasterDataNotLoaded => {
                write!(f, "master catalog not loaded; observation rejected")
            }
            Self::MasterDataEmpty { ships, items } => write!(
                f,
                "master snapshot unusable: {ships} ship classes, {items} item classes"
            ),
            Self::Stat(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<StatError> for SyncError {
    fn from(err: StatError) -> Self {
        Self::Stat(err)
    }
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        Self::Remote(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteOp {
    Create,
    Update,
    Delete,
}

impl RemoteOp {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteOp::Create => "create",
            RemoteOp::Update => "update",
            RemoteOp::Delete => "delete",
        }
    }
}

/// One ship skipped before any remote call was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipSkip {
    pub instance_id: i64,
    pub reason: String,
}

/// One remote operation that did not go through; the baseline was left as it
/// was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipFailure {
    pub instance_id: i64,
    pub op: RemoteOp,
    pub error: String,
}

/// Outcome totals for one observation. Per-ship problems land here instead of
/// aborting the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub observed: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub deleted: usize,
    pub skipped: Vec<ShipSkip>,
    pub failed: Vec<ShipFailure>,
}

impl SyncReport {
    pub fn has_failures(&self) -> bool {
        !self.skipped.is_empty() || !self.failed.is_empty()
    }
}

enum PlannedOp {
    Create(ShipRecord),
    Update(ShipRecord),
}

/// Owns the session state (master catalog, item-id map, committed roster) and
/// a remote gateway, and exposes one entry point per observed event kind.
pub struct SyncEngine<G> {
    gateway: G,
    catalog: MasterCatalog,
    items: ItemIdMap,
    roster: RosterModel,
}

impl<G: RemoteGateway> SyncEngine<G> {
    pub fn new(gateway: G) -> SyncEngine<G> {
        SyncEngine {
            gateway,
            catalog: MasterCatalog::new(),
            items: ItemIdMap::new(),
            roster: RosterModel::new(),
        }
    }

    /// Master reference data has been loaded for the current session.
    pub fn is_ready(&self) -> bool {
        self.catalog.is_ready()
    }

    /// Committed baseline. Read-only; mutation goes through reconciliation.
    pub fn roster(&self) -> &RosterModel {
        &self.roster
    }

    pub fn items(&self) -> &ItemIdMap {
        &self.items
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Replaces the session's master tables wholesale. Taking `&mut self`
    /// makes the reload a barrier: no reconciliation can hold the catalog
    /// while it is swapped.
    pub fn load_master_data(
        &mut self,
        ships: &[MstShip],
        items: &[MstSlotItem],
    ) -> Result<(), SyncError> {
        if ships.is_empty() || items.is_empty() {
            return Err(SyncError::MasterDataEmpty {
                ships: ships.len(),
                items: items.len(),
            });
        }
        let ship_classes = ships
            .iter()
            .map(|class| ShipClass {
                id: class.id,
                name: class.name.clone(),
                speed: class.speed,
                length_code: class.length_code,
            })
            .collect();
        let item_classes = items
            .iter()
            .map(|class| ItemClass {
                id: class.id,
                name: class.name.clone(),
                bonuses: ItemBonuses {
                    firepower: class.firepower,
                    armor: class.armor,
                    torpedo: class.torpedo,
                    evasion: class.evasion,
                    aa: class.anti_air,
                    asw: class.asw,
                    los: class.line_of_sight,
                    luck: class.luck,
                },
            })
            .collect();
        self.catalog.replace(ship_classes, item_classes);
        info!(
            "master catalog loaded: {} ship classes, {} item classes",
            self.catalog.ship_class_count(),
            self.catalog.item_class_count()
        );
        Ok(())
    }

    /// Records local-id to class-id mappings. Duplicates overwrite; item
    /// identity alone never drives a ship write.
    pub fn observe_item_catalog(&mut self, items: &[SlotItem]) -> Result<(), SyncError> {
        if !self.is_ready() {
            return Err(SyncError::MasterDataNotLoaded);
        }
        for item in items {
            self.items.map_item(item.local_id, item.class_id);
        }
        debug!(
            "item catalog: {} observed, {} mapped in total",
            items.len(),
            self.items.len()
        );
        Ok(())
    }

    /// Reconciles the complete authoritative ship set: upserts every observed
    /// ship, then deletes whatever the baseline still holds that the snapshot
    /// does not mention.
    pub async fn observe_full_ship_list(
        &mut self,
        ships: &[ShipObservation],
    ) -> Result<SyncReport, SyncError> {
        self.reconcile(ships, true).await
    }

    /// Reconciles a non-exhaustive subset. Absence from a partial list means
    /// nothing, so nothing is deleted.
    pub async fn observe_partial_ship_list(
        &mut self,
        ships: &[ShipObservation],
    ) -> Result<SyncReport, SyncError> {
        self.reconcile(ships, false).await
    }

    /// Re-derives one ship after a modernization, but only when the game
    /// confirms the change actually applied.
    pub async fn observe_modernization(
        &mut self,
        change: &Modernization,
    ) -> Result<SyncReport, SyncError> {
        if !change.applied() {
            debug!(
                "modernization of ship {} did not apply; nothing to sync",
                change.ship.instance_id
            );
            return Ok(SyncReport::default());
        }
        self.reconcile(std::slice::from_ref(&change.ship), false)
            .await
    }

    /// Brings a freshly constructed ship under management: maps the item
    /// instances delivered with it, then upserts the ship (a create, unless a
    /// stale baseline already knows the id).
    pub async fn observe_construction(
        &mut self,
        delivery: &Construction,
    ) -> Result<SyncReport, SyncError> {
        if let Some(items) = &delivery.items {
            self.observe_item_catalog(items)?;
        }
        self.reconcile(std::slice::from_ref(&delivery.ship), false)
            .await
    }

    /// Maps a crafted item's local id, gated on the crafting-succeeded flag.
    pub fn observe_item_creation(&mut self, outcome: &ItemCreation) -> Result<(), SyncError> {
        if !outcome.succeeded() {
            return Ok(());
        }
        let Some(item) = outcome.item else {
            debug!("item creation flagged success but carried no item record");
            return Ok(());
        };
        self.observe_item_catalog(&[item])
    }

    /// Seeds the baseline from ships previously persisted by this client.
    /// Foreign-origin entries, non-numeric ids, and incomplete payloads are
    /// skipped without error.
    pub async fn seed_from_remote(&mut self) -> Result<usize, SyncError> {
        let entries = self.gateway.fetch_roster(SEED_FIELDS).await?;
        let total = entries.len();
        let mut seeded = 0usize;
        for entry in entries {
            if entry.origin != CLIENT_ORIGIN {
                continue;
            }
            let Some(record) = entry.into_record() else {
                debug!("seed entry skipped: unusable identity or payload");
                continue;
            };
            self.roster.put(record);
            seeded += 1;
        }
        info!("seeded {seeded} of {total} persisted ships into the baseline");
        Ok(seeded)
    }

    async fn reconcile(
        &mut self,
        ships: &[ShipObservation],
        exhaustive: bool,
    ) -> Result<SyncReport, SyncError> {
        if !self.is_ready() {
            return Err(SyncError::MasterDataNotLoaded);
        }

        let mut report = SyncReport {
            observed: ships.len(),
            ..SyncReport::default()
        };

        // Within one batch the newest observation of an id wins and gets the
        // batch's only remote operation for that id, keeping per-id order.
        let mut latest: Vec<&ShipObservation> = Vec::with_capacity(ships.len());
        let mut seen: HashMap<i64, usize> = HashMap::new();
        for observation in ships {
            match seen.get(&observation.instance_id) {
                Some(&index) => latest[index] = observation,
                None => {
                    seen.insert(observation.instance_id, latest.len());
                    latest.push(observation);
                }
            }
        }

        // The observed-id set keeps skipped ships too: a failed normalization
        // must not read as an absence and trigger a delete.
        let mut observed_ids: HashSet<i64> = HashSet::new();
        let mut planned: Vec<PlannedOp> = Vec::new();
        for observation in latest {
            observed_ids.insert(observation.instance_id);
            let record = match normalize_ship(observation, &self.catalog, &self.items) {
                Ok(record) => record,
                Err(err) => {
                    warn!("skipping ship {}: {err}", observation.instance_id);
                    report.skipped.push(ShipSkip {
                        instance_id: observation.instance_id,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            match self.roster.get(record.instance_id) {
                None => planned.push(PlannedOp::Create(record)),
                Some(committed) if *committed == record => {
                    debug!("ship {} unchanged; write suppressed", record.instance_id);
                    report.unchanged += 1;
                }
                Some(_) => planned.push(PlannedOp::Update(record)),
            }
        }

        self.run_upserts(planned, &mut report).await;

        if exhaustive {
            let stale: Vec<i64> = self
                .roster
                .ids()
                .into_iter()
                .filter(|id| !observed_ids.contains(id))
                .collect();
            self.run_deletes(stale, &mut report).await;
        }

        if report.has_failures() {
            warn!(
                "reconciliation finished with {} skipped, {} failed of {} observed",
                report.skipped.len(),
                report.failed.len(),
                report.observed
            );
        }
        Ok(report)
    }

    /// Executes planned creates/updates with bounded concurrency. The baseline
    /// advances only from what the service echoes back.
    async fn run_upserts(&mut self, planned: Vec<PlannedOp>, report: &mut SyncReport) {
        let gateway = &self.gateway;
        let mut outcomes = stream::iter(planned.into_iter().map(|op| async move {
            match op {
                PlannedOp::Create(record) => {
                    let id = record.instance_id;
                    (id, RemoteOp::Create, gateway.create_ship(&record).await)
                }
                PlannedOp::Update(record) => {
                    let id = record.instance_id;
                    (id, RemoteOp::Update, gateway.update_ship(id, &record).await)
                }
            }
        }))
        .buffer_unordered(REMOTE_OPS_IN_FLIGHT);

        while let Some((instance_id, op, outcome)) = outcomes.next().await {
            match outcome {
                Ok(echoed) => match echoed.into_record() {
                    Some(committed) => {
                        info!("{} of ship {} acknowledged", op.as_str(), instance_id);
                        self.roster.put(committed);
                        match op {
                            RemoteOp::Create => report.created += 1,
                            _ => report.updated += 1,
                        }
                    }
                    None => {
                        warn!(
                            "{} of ship {instance_id} answered with an unusable representation",
                            op.as_str()
                        );
                        report.failed.push(ShipFailure {
                            instance_id,
                            op,
                            error: "service returned an unusable ship representation".to_string(),
                        });
                    }
                },
                Err(err) => {
                    warn!("{} of ship {instance_id} failed: {err}", op.as_str());
                    report.failed.push(ShipFailure {
                        instance_id,
                        op,
                        error: err.to_string(),
                    });
                }
            }
        }
    }

    /// Executes deletes for ids missing from an exhaustive snapshot. An entry
    /// stays committed when its delete is not acknowledged, so the next full
    /// list retries it.
    async fn run_deletes(&mut self, stale: Vec<i64>, report: &mut SyncReport) {
        let gateway = &self.gateway;
        let mut outcomes = stream::iter(
            stale
                .into_iter()
                .map(|id| async move { (id, gateway.delete_ship(id).await) }),
        )
        .buffer_unordered(REMOTE_OPS_IN_FLIGHT);

        while let Some((instance_id, outcome)) = outcomes.next().await {
            match outcome {
                Ok(()) => {
                    info!("delete of ship {instance_id} acknowledged");
                    self.roster.remove(instance_id);
                    report.deleted += 1;
                }
                Err(err) => {
                    warn!("delete of ship {instance_id} failed: {err}");
                    report.failed.push(ShipFailure {
                        instance_id,
                        op: RemoteOp::Delete,
                        error: err.to_string(),
                    });
                }
            }
        }
    }
}
