//! Wire shapes for the roster persistence service: the `{code, status, data}`
//! response envelope and the persisted ship representation.

use serde::{Deserialize, Serialize};

use crate::roster::ship::{BaseStats, ShipRecord};

/// Origin tag stamped on every ship this client writes. Seeding accepts only
/// entries that carry it; everything else belongs to some other client.
pub const CLIENT_ORIGIN: &str = "kansync";

/// Response envelope wrapped around every service payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
    pub data: T,
}

/// Session document returned by `auth/login`; the `$oid` value is the token
/// sent back verbatim in the `Authorization` header.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginSession {
    #[serde(rename = "$oid")]
    pub token: String,
}

/// Persisted ship representation. `id` can arrive as a number or a numeric
/// string; anything else makes the entry unusable for this client. Seed
/// fetches may omit `equipment`/`stats` when a field filter drops them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteShip {
    pub id: serde_json::Value,
    pub origin: String,
    #[serde(rename = "baseId")]
    pub base_id: i64,
    pub level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<BaseStats>,
}

impl RemoteShip {
    /// Outbound form of a normalized record, stamped with this client's origin.
    pub fn from_record(record: &ShipRecord) -> RemoteShip {
        RemoteShip {
            id: serde_json::Value::from(record.instance_id),
            origin: CLIENT_ORIGIN.to_string(),
            base_id: record.class_id,
            level: record.level,
            equipment: Some(record.equipment.clone()),
            stats: Some(record.stats),
        }
    }

    /// Instance id when the wire value is numeric.
    pub fn numeric_id(&self) -> Option<i64> {
        match &self.id {
            serde_json::Value::Number(number) => number.as_i64(),
            serde_json::Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Committed-record form; `None` when the identity or payload is unusable.
    pub fn into_record(self) -> Option<ShipRecord> {
        let instance_id = self.numeric_id()?;
        let stats = self.stats?;
        let equipment = self.equipment?;
        Some(ShipRecord {
            instance_id,
            class_id: self.base_id,
            level: self.level,
            equipment,
            stats,
        })
    }
}
