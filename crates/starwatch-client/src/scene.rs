//! Retained scene model: layers plus one cached drawable per entity.
//!
//! The host renderer mirrors this model. Drawables are created once per
//! entity key and repositioned every render tick; layers carry the view
//! transform that the gesture controller pushes to them.

use std::collections::{HashMap, HashSet};

use glam::DVec2;

use starwatch_core::types::{EntityKey, Position};
use starwatch_tracking::EntityStore;
use starwatch_view::{RenderTarget, TargetSet};

use crate::shapes::{ShapeRegistry, ShapeSpec};

/// Scene layers in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerId {
    Asteroids,
    Ships,
    /// Heads-up overlay. Never moved or scaled by the view.
    Gui,
}

impl LayerId {
    pub const ALL: [LayerId; 3] = [LayerId::Asteroids, LayerId::Ships, LayerId::Gui];

    /// Layers that follow the pan/zoom view.
    pub const WORLD: [LayerId; 2] = [LayerId::Ships, LayerId::Asteroids];
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    translation: DVec2,
    scale: DVec2,
    members: HashSet<EntityKey>,
    text: Option<String>,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            translation: DVec2::ZERO,
            scale: DVec2::ONE,
            members: HashSet::new(),
            text: None,
        }
    }
}

impl Layer {
    /// Screen position of a world point drawn on this layer.
    pub fn to_screen(&self, world: Position) -> DVec2 {
        DVec2::from(world) * self.scale + self.translation
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        self.members.contains(key)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Overlay text (used on the GUI layer for the status line).
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl RenderTarget for Layer {
    fn translation(&self) -> DVec2 {
        self.translation
    }

    fn scale(&self) -> DVec2 {
        self.scale
    }

    fn move_by(&mut self, delta: DVec2) {
        self.translation += delta;
    }

    fn set_scale(&mut self, scale: DVec2) {
        self.scale = scale;
    }
}

/// Cached drawable of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub shape: ShapeSpec,
    /// Predicted world position at the last render tick.
    pub position: Position,
    /// Heading in radians, kept from the last moving tick.
    pub rotation: f64,
}

#[derive(Debug)]
pub struct Scene {
    layers: HashMap<LayerId, Layer>,
    drawables: HashMap<EntityKey, Drawable>,
    registry: ShapeRegistry,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(ShapeRegistry::default())
    }
}

impl Scene {
    pub fn new(registry: ShapeRegistry) -> Self {
        Self {
            layers: LayerId::ALL
                .into_iter()
                .map(|id| (id, Layer::default()))
                .collect(),
            drawables: HashMap::new(),
            registry,
        }
    }

    /// Reposition every drawable at server time `now_us`, spawning
    /// drawables for entities seen for the first time. Returns the number
    /// of drawables positioned.
    pub fn update(&mut self, store: &EntityStore, now_us: u64) -> usize {
        let mut positioned = 0;
        for entity in store.stream() {
            let key = entity.key();
            if !self.drawables.contains_key(&key) {
                let Some(shape) = self.registry.spawn(entity) else {
                    continue;
                };
                if let Some(layer) = self.layers.get_mut(&shape.layer) {
                    layer.members.insert(key);
                }
                log::debug!("spawned {:?} drawable for {key}", shape.layer);
                self.drawables.insert(
                    key,
                    Drawable {
                        shape,
                        position: entity.position(),
                        rotation: 0.0,
                    },
                );
            }

            if let Some(drawable) = self.drawables.get_mut(&key) {
                drawable.position = entity.predict(now_us);
                drawable.shape.radius = entity.radius();
                if let Some(heading) = entity.heading() {
                    drawable.rotation = heading;
                }
                positioned += 1;
            }
        }
        positioned
    }

    /// Drop the drawable of an entity that is no longer tracked.
    pub fn remove(&mut self, key: &EntityKey) -> Option<Drawable> {
        let drawable = self.drawables.remove(key)?;
        if let Some(layer) = self.layers.get_mut(&drawable.shape.layer) {
            layer.members.remove(key);
        }
        Some(drawable)
    }

    pub fn drawable(&self, key: &EntityKey) -> Option<&Drawable> {
        self.drawables.get(key)
    }

    pub fn drawables(&self) -> impl Iterator<Item = (&EntityKey, &Drawable)> + '_ {
        self.drawables.iter()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    /// Screen position of an entity's drawable under its layer transform.
    pub fn screen_position(&self, key: &EntityKey) -> Option<DVec2> {
        let drawable = self.drawables.get(key)?;
        let layer = self.layers.get(&drawable.shape.layer)?;
        Some(layer.to_screen(drawable.position))
    }

    pub fn set_overlay_text(&mut self, text: impl Into<String>) {
        if let Some(gui) = self.layers.get_mut(&LayerId::Gui) {
            gui.text = Some(text.into());
        }
    }

    pub fn registry_mut(&mut self) -> &mut ShapeRegistry {
        &mut self.registry
    }
}

impl TargetSet<LayerId> for Scene {
    fn target_mut(&mut self, key: &LayerId) -> Option<&mut dyn RenderTarget> {
        self.layers
            .get_mut(key)
            .map(|layer| layer as &mut dyn RenderTarget)
    }
}
