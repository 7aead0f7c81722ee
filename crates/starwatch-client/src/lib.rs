//! starwatch client application layer.
//!
//! Wires the tracking and view crates into one [`AppContext`] that the
//! host event loop drives: inbound messages, render ticks, input events
//! and connection status changes. Transport and actual drawing stay with
//! the host.

pub mod config;
pub mod context;
pub mod error;
pub mod ingest;
pub mod scene;
pub mod shapes;

pub use config::ClientConfig;
pub use context::{AppContext, RenderStats};
pub use error::ClientError;
pub use ingest::IngestReport;
pub use scene::{LayerId, Scene};
pub use shapes::{ShapeRegistry, ShapeSpec};

#[cfg(test)]
mod tests;
