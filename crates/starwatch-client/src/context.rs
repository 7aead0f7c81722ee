//! Application context: the single owner of all client state.
//!
//! Every host callback (message received, animation frame, input event,
//! connection change) is routed to one method here. Handlers run to
//! completion one at a time, so no locking is involved.

use std::time::Instant;

use starwatch_core::enums::ConnectionStatus;
use starwatch_core::error::ProtocolError;
use starwatch_core::protocol::{decode_batch, DecodedBatch};
use starwatch_core::types::EntityKey;
use starwatch_tracking::{EntityStore, TimestampEstimator};
use starwatch_view::{InputEvent, ViewTransformController};

use crate::config::ClientConfig;
use crate::ingest::{apply_batch, IngestReport};
use crate::scene::{LayerId, Scene};
use crate::shapes::ShapeRegistry;

/// Result of one render tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStats {
    /// Estimated server time the frame was rendered for.
    pub now_us: u64,
    pub drawn: usize,
}

#[derive(Debug)]
pub struct AppContext {
    config: ClientConfig,
    store: EntityStore,
    clock: TimestampEstimator,
    controller: ViewTransformController<LayerId>,
    scene: Scene,
    status: ConnectionStatus,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_shapes(config, ShapeRegistry::default())
    }

    pub fn with_shapes(config: ClientConfig, shapes: ShapeRegistry) -> Self {
        let controller =
            ViewTransformController::new(LayerId::WORLD.to_vec()).with_zoom_step(config.zoom_step);
        let mut scene = Scene::new(shapes);
        let status = ConnectionStatus::default();
        scene.set_overlay_text(status.label());

        Self {
            config,
            store: EntityStore::new(),
            clock: TimestampEstimator::new(),
            controller,
            scene,
            status,
        }
    }

    /// Decode and apply one inbound message received at `received_at`.
    ///
    /// An unusable envelope is returned as an error and leaves all state
    /// untouched; bad items only show up in the report.
    pub fn handle_message(
        &mut self,
        text: &str,
        received_at: Instant,
    ) -> Result<IngestReport, ProtocolError> {
        let batch = decode_batch(text).inspect_err(|e| log::warn!("dropping update: {e}"))?;
        Ok(self.ingest_batch(batch, received_at))
    }

    /// Apply an already decoded batch.
    ///
    /// With a TTL configured, entities whose last update is older than
    /// `server_us - ttl` are evicted here, together with their drawables.
    pub fn ingest_batch(&mut self, batch: DecodedBatch, received_at: Instant) -> IngestReport {
        self.clock.update(batch.server_us, received_at);
        let mut report = apply_batch(&mut self.store, batch);

        if let Some(ttl_us) = self.config.entity_ttl_us() {
            report.expired = self.evict_silent(report.server_us.saturating_sub(ttl_us));
        }
        report
    }

    fn evict_silent(&mut self, cutoff_us: u64) -> Vec<EntityKey> {
        let expired = self.store.expire_older_than(cutoff_us);
        for key in &expired {
            self.scene.remove(key);
            log::info!("expired {key}: no update since before {cutoff_us}us");
        }
        expired
    }

    /// Position every drawable for the frame shown at local instant `now`.
    /// The store is only read here.
    pub fn render_tick(&mut self, now: Instant) -> RenderStats {
        let now_us = self.clock.predict_now_us(now);
        let drawn = self.scene.update(&self.store, now_us);
        RenderStats { now_us, drawn }
    }

    /// Route a pointer/touch/wheel event to the view controller.
    /// Returns whether the view changed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        self.controller.handle(event, &mut self.scene)
    }

    /// Record a push-channel state change. Tracking continues from the
    /// last known state regardless.
    pub fn set_connection_status(&mut self, status: ConnectionStatus) {
        if status != self.status {
            log::info!("connection: {}", status.label());
        }
        self.status = status;
        self.scene.set_overlay_text(status.label());
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn clock(&self) -> &TimestampEstimator {
        &self.clock
    }

    pub fn controller(&self) -> &ViewTransformController<LayerId> {
        &self.controller
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}
