//! Enumeration types used throughout the client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a tracked object as tagged on the wire.
///
/// Tags the client does not recognize decode to [`EntityKind::Unknown`]
/// instead of failing the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Asteroid,
    Ship,
    #[default]
    #[serde(other)]
    Unknown,
}

impl EntityKind {
    /// Wire tag for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            EntityKind::Asteroid => "asteroid",
            EntityKind::Ship => "ship",
            EntityKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// State of the push channel as surfaced to the status display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Established,
    Lost,
}

impl ConnectionStatus {
    /// Text shown by the status display.
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Established => "Connection established",
            ConnectionStatus::Lost => "Connection lost",
        }
    }
}
