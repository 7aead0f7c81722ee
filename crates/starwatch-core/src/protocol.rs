//! Wire format of the inbound update channel.
//!
//! Each message is one JSON batch:
//!
//! ```json
//! {"ts": 1700000000, "items": [
//!     {"type": "ship", "id": 3, "pos": [0.0, 0.0, 10.0, 0.0], "radius": 12.0}
//! ]}
//! ```
//!
//! The batch `ts` (microseconds, server clock) is the time of every item in
//! it. Items are decoded one at a time so a malformed entry is rejected on
//! its own without failing the rest of the batch.

use serde::{Deserialize, Serialize};

use crate::constants::WIRE_POS_LEN;
use crate::enums::EntityKind;
use crate::error::{ProtocolError, SnapshotError};
use crate::types::{EntityKey, Position, Velocity};

/// One server-authoritative observation of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub kind: EntityKind,
    pub id: u64,
    pub position: Position,
    pub velocity: Velocity,
    pub radius: Option<f64>,
}

/// A batch item rejected during decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedItem {
    /// Position of the item within the batch.
    pub index: usize,
    pub error: SnapshotError,
}

/// Result of decoding one update message.
#[derive(Debug, Clone, Default)]
pub struct DecodedBatch {
    /// Server timestamp (µs) applied to every snapshot.
    pub server_us: u64,
    pub snapshots: Vec<Snapshot>,
    pub rejected: Vec<RejectedItem>,
}

/// Item as it appears on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct WireItem {
    #[serde(rename = "type")]
    kind: EntityKind,
    id: u64,
    pos: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
    /// Per-item timestamp sent by some servers. The batch timestamp wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ts: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawBatch {
    #[serde(default)]
    ts: Option<u64>,
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct OutboundBatch<'a> {
    ts: u64,
    items: &'a [WireItem],
}

impl Snapshot {
    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.kind, self.id)
    }
}

impl TryFrom<WireItem> for Snapshot {
    type Error = SnapshotError;

    fn try_from(item: WireItem) -> Result<Self, Self::Error> {
        let key = EntityKey::new(item.kind, item.id);
        let [x, y, vx, vy]: [f64; WIRE_POS_LEN] = item.pos.try_into().map_err(|pos: Vec<f64>| {
            SnapshotError::Malformed(format!(
                "{key}: pos has {} components, expected {WIRE_POS_LEN}",
                pos.len()
            ))
        })?;

        let position = Position::new(x, y);
        let velocity = Velocity::new(vx, vy);
        if !position.is_finite() || !velocity.is_finite() {
            return Err(SnapshotError::NonFiniteCoordinate { key });
        }

        if let Some(radius) = item.radius {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(SnapshotError::InvalidRadius { key, radius });
            }
        }

        Ok(Snapshot {
            kind: item.kind,
            id: item.id,
            position,
            velocity,
            radius: item.radius,
        })
    }
}

impl From<&Snapshot> for WireItem {
    fn from(s: &Snapshot) -> Self {
        WireItem {
            kind: s.kind,
            id: s.id,
            pos: vec![s.position.x, s.position.y, s.velocity.x, s.velocity.y],
            radius: s.radius,
            ts: None,
        }
    }
}

/// Decode a single entity item from its JSON value.
pub fn decode_item(value: serde_json::Value) -> Result<Snapshot, SnapshotError> {
    let item: WireItem =
        serde_json::from_value(value).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
    Snapshot::try_from(item)
}

/// Decode one update message.
///
/// Fails only when the envelope itself is unusable (not JSON, no `items`
/// array, no batch timestamp). Bad items end up in [`DecodedBatch::rejected`].
pub fn decode_batch(text: &str) -> Result<DecodedBatch, ProtocolError> {
    let raw: RawBatch = serde_json::from_str(text)?;
    let server_us = raw.ts.ok_or(ProtocolError::MissingBatchTimestamp)?;

    let mut batch = DecodedBatch {
        server_us,
        snapshots: Vec::with_capacity(raw.items.len()),
        rejected: Vec::new(),
    };

    for (index, value) in raw.items.into_iter().enumerate() {
        match decode_item(value) {
            Ok(snapshot) => batch.snapshots.push(snapshot),
            Err(error) => batch.rejected.push(RejectedItem { index, error }),
        }
    }

    Ok(batch)
}

/// Encode snapshots as one update message (used by feed generators).
pub fn encode_batch(server_us: u64, snapshots: &[Snapshot]) -> Result<String, ProtocolError> {
    let items: Vec<WireItem> = snapshots.iter().map(WireItem::from).collect();
    let text = serde_json::to_string(&OutboundBatch {
        ts: server_us,
        items: &items,
    })?;
    Ok(text)
}
