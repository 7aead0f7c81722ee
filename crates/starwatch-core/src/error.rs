//! Errors raised while decoding the inbound update channel.

use thiserror::Error;

use crate::types::EntityKey;

/// Failure that rejects a whole update batch.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed update batch: {0}")]
    Json(#[from] serde_json::Error),

    #[error("update batch carries no server timestamp")]
    MissingBatchTimestamp,
}

/// Failure that rejects a single entity snapshot within a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("malformed entity snapshot: {0}")]
    Malformed(String),

    #[error("non-finite coordinate in snapshot for {key}")]
    NonFiniteCoordinate { key: EntityKey },

    #[error("invalid radius {radius} in snapshot for {key}")]
    InvalidRadius { key: EntityKey, radius: f64 },
}
