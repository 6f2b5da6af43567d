//! Explicit dispatch boundary: routes decoded game events to the engine entry
//! points and replays recorded event streams (JSON Lines, one event per line).

use std::fmt;
use std::io::BufRead;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::remote::RemoteGateway;
use crate::roster::engine::{SyncEngine, SyncError, SyncReport};

use super::events::{
    Construction, ItemCreation, MasterSnapshot, Modernization, PortSnapshot, ShipListUpdate,
    ShipObservation, SlotItem,
};

/// One captured game event: the kcsapi path and its decoded response body.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordedEvent {
    pub api: String,
    #[serde(alias = "api_data")]
    pub data: serde_json::Value,
}

#[derive(Debug)]
pub enum DispatchError {
    /// The event body did not decode into the expected record shape.
    Decode {
        api: String,
        source: serde_json::Error,
    },
    /// The engine rejected the observation.
    Engine { api: String, source: SyncError },
    /// The replay input could not be read.
    Input { line: usize, message: String },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { api, source } => write!(f, "undecodable {api} payload: {source}"),
            Self::Engine { api, source } => write!(f, "{api}: {source}"),
            Self::Input { line, message } => write!(f, "replay input line {line}: {message}"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// What one dispatched event did.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Ship reconciliation ran.
    Reconciled(SyncReport),
    /// The event updated engine state without remote traffic.
    Recorded,
    /// The path carries nothing to synchronize.
    Ignored,
}

fn event_path(api: &str) -> &str {
    let path = api.trim_start_matches('/');
    path.strip_prefix("kcsapi/").unwrap_or(path)
}

fn decode<T: DeserializeOwned>(event: &RecordedEvent) -> Result<T, DispatchError> {
    serde_json::from_value(event.data.clone()).map_err(|source| DispatchError::Decode {
        api: event.api.clone(),
        source,
    })
}

fn engine_err(event: &RecordedEvent, source: SyncError) -> DispatchError {
    DispatchError::Engine {
        api: event.api.clone(),
        source,
    }
}

/// Routes one event to its engine entry point. The dispatcher owns the
/// bootstrap-first guarantee at the stream level (see [`replay_events`]); at
/// the single-event level it simply reports what the engine said.
pub async fn dispatch_event<G: RemoteGateway>(
    engine: &mut SyncEngine<G>,
    event: &RecordedEvent,
) -> Result<DispatchOutcome, DispatchError> {
    match event_path(&event.api) {
        "api_start2" => {
            let snapshot: MasterSnapshot = decode(event)?;
            engine
                .load_master_data(&snapshot.ships, &snapshot.items)
                .map_err(|source| engine_err(event, source))?;
            Ok(DispatchOutcome::Recorded)
        }
        "api_port/port" => {
            let port: PortSnapshot = decode(event)?;
            engine
                .observe_full_ship_list(&port.ships)
                .await
                .map(DispatchOutcome::Reconciled)
                .map_err(|source| engine_err(event, source))
        }
        "api_get_member/ship2" => {
            let ships: Vec<ShipObservation> = decode(event)?;
            engine
                .observe_full_ship_list(&ships)
                .await
                .map(DispatchOutcome::Reconciled)
                .map_err(|source| engine_err(event, source))
        }
        "api_get_member/ship3" => {
            let update: ShipListUpdate = decode(event)?;
            engine
                .observe_partial_ship_list(&update.ships)
                .await
                .map(DispatchOutcome::Reconciled)
                .map_err(|source| engine_err(event, source))
        }
        "api_get_member/slot_item" => {
            let items: Vec<SlotItem> = decode(event)?;
            engine
                .observe_item_catalog(&items)
                .map_err(|source| engine_err(event, source))?;
            Ok(DispatchOutcome::Recorded)
        }
        "api_req_kaisou/powerup" => {
            let change: Modernization = decode(event)?;
            engine
                .observe_modernization(&change)
                .await
                .map(DispatchOutcome::Reconciled)
                .map_err(|source| engine_err(event, source))
        }
        "api_req_kousyou/createitem" => {
            let outcome: ItemCreation = decode(event)?;
            engine
                .observe_item_creation(&outcome)
                .map_err(|source| engine_err(event, source))?;
            Ok(DispatchOutcome::Recorded)
        }
        "api_req_kousyou/getship" => {
            let delivery: Construction = decode(event)?;
            engine
                .observe_construction(&delivery)
                .await
                .map(DispatchOutcome::Reconciled)
                .map_err(|source| engine_err(event, source))
        }
        // Fleet arrangement does not touch any synchronized attribute.
        "api_req_hensei/change" => Ok(DispatchOutcome::Ignored),
        other => {
            debug!("ignoring event {other}");
            Ok(DispatchOutcome::Ignored)
        }
    }
}

/// Totals across one replayed stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    pub events: usize,
    pub applied: usize,
    pub ignored: usize,
    pub errors: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ReplayStats {
    fn absorb(&mut self, report: &SyncReport) {
        self.created += report.created;
        self.updated += report.updated;
        self.unchanged += report.unchanged;
        self.deleted += report.deleted;
        self.skipped += report.skipped.len();
        self.failed += report.failed.len();
    }

    /// Nothing was skipped, failed, or rejected.
    pub fn clean(&self) -> bool {
        self.errors == 0 && self.skipped == 0 && self.failed == 0
    }
}

/// Replays a JSON Lines event capture through the engine. A bootstrap failure
/// aborts the replay — nothing after it can reconcile correctly; every other
/// event error is logged, counted, and survived.
pub async fn replay_events<G: RemoteGateway>(
    engine: &mut SyncEngine<G>,
    reader: impl BufRead,
) -> Result<ReplayStats, DispatchError> {
    let mut stats = ReplayStats::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| DispatchError::Input {
            line: index + 1,
            message: err.to_string(),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event: RecordedEvent = match serde_json::from_str(trimmed) {
            Ok(event) => event,
            Err(err) => {
                warn!("line {}: unparseable event skipped: {err}", index + 1);
                stats.errors += 1;
                continue;
            }
        };
        stats.events += 1;
        match dispatch_event(engine, &event).await {
            Ok(DispatchOutcome::Reconciled(report)) => {
                stats.applied += 1;
                stats.absorb(&report);
            }
            Ok(DispatchOutcome::Recorded) => stats.applied += 1,
            Ok(DispatchOutcome::Ignored) => stats.ignored += 1,
            Err(err) if event_path(&event.api) == "api_start2" => return Err(err),
            Err(err) => {
                warn!("{err}");
                stats.errors += 1;
            }
        }
    }
    Ok(stats)
}
