//! Keyed collection of tracked entities.

use std::collections::HashMap;

use starwatch_core::protocol::Snapshot;
use starwatch_core::types::EntityKey;

use crate::entity::{Entity, UpdateOutcome};

/// What [`EntityStore::ingest`] did with a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Created,
    Updated,
    Stale,
}

/// All entities seen this session, one record per `(kind, id)`.
///
/// Records are updated in place so anything caching per-key state (such as
/// a drawable) keeps a valid association across updates.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: HashMap<EntityKey, Entity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create-or-update the entity a snapshot refers to.
    pub fn ingest(&mut self, snapshot: &Snapshot, batch_time_us: u64) -> IngestOutcome {
        match self.entities.get_mut(&snapshot.key()) {
            Some(entity) => match entity.update(snapshot, batch_time_us) {
                UpdateOutcome::Applied => IngestOutcome::Updated,
                UpdateOutcome::Stale => {
                    log::debug!(
                        "dropping stale snapshot for {} at {batch_time_us}us (have {}us)",
                        snapshot.key(),
                        entity.last_update_us()
                    );
                    IngestOutcome::Stale
                }
            },
            None => {
                self.entities
                    .insert(snapshot.key(), Entity::new(snapshot, batch_time_us));
                IngestOutcome::Created
            }
        }
    }

    /// Iterate over all entities. Order is unspecified.
    pub fn stream(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    pub fn get(&self, key: &EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove entities last updated before `cutoff_us`. Returns their keys.
    pub fn expire_older_than(&mut self, cutoff_us: u64) -> Vec<EntityKey> {
        let expired: Vec<EntityKey> = self
            .entities
            .values()
            .filter(|e| e.last_update_us() < cutoff_us)
            .map(Entity::key)
            .collect();

        for key in &expired {
            self.entities.remove(key);
        }
        expired
    }
}
