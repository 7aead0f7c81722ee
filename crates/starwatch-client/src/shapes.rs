//! Per-kind shape construction.
//!
//! A [`ShapeRegistry`] maps each [`EntityKind`] to a factory producing the
//! [`ShapeSpec`] a renderer should build for it. Kinds without a factory
//! are tracked but not drawn.

use std::collections::HashMap;
use std::fmt;

use starwatch_core::enums::EntityKind;
use starwatch_tracking::Entity;

use crate::scene::LayerId;

/// Renderer-agnostic description of an entity's drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    pub layer: LayerId,
    pub radius: f64,
    pub fill: String,
    pub stroke: String,
}

type ShapeFactory = Box<dyn Fn(&Entity) -> ShapeSpec>;

pub struct ShapeRegistry {
    factories: HashMap<EntityKind, ShapeFactory>,
}

impl ShapeRegistry {
    /// Registry with no factories at all.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Install (or replace) the factory for `kind`.
    pub fn register<F>(&mut self, kind: EntityKind, factory: F)
    where
        F: Fn(&Entity) -> ShapeSpec + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
    }

    pub fn is_registered(&self, kind: EntityKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Build the shape for `entity`, or `None` if its kind is not drawn.
    pub fn spawn(&self, entity: &Entity) -> Option<ShapeSpec> {
        self.factories.get(&entity.kind()).map(|factory| factory(entity))
    }
}

impl Default for ShapeRegistry {
    /// Ships as red circles, asteroids as blue circles.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(EntityKind::Ship, |e| circle(LayerId::Ships, e.radius(), "red"));
        registry.register(EntityKind::Asteroid, |e| {
            circle(LayerId::Asteroids, e.radius(), "blue")
        });
        registry
    }
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn circle(layer: LayerId, radius: f64, fill: &str) -> ShapeSpec {
    ShapeSpec {
        layer,
        radius,
        fill: fill.to_string(),
        stroke: "black".to_string(),
    }
}
