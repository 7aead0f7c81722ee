//! Seams between the view and whatever draws the scene.

use std::collections::HashMap;
use std::hash::Hash;

use glam::DVec2;

/// A drawable layer that accepts the view transform.
///
/// Translation is pushed incrementally (`move_by`) and scale absolutely
/// (`set_scale`), matching how retained-mode canvas layers are driven.
pub trait RenderTarget {
    /// Translation currently applied to the layer.
    fn translation(&self) -> DVec2;

    /// Scale currently applied to the layer.
    fn scale(&self) -> DVec2;

    fn move_by(&mut self, delta: DVec2);

    fn set_scale(&mut self, scale: DVec2);
}

/// Lookup of render targets by key.
pub trait TargetSet<K> {
    fn target_mut(&mut self, key: &K) -> Option<&mut dyn RenderTarget>;
}

impl<K, T> TargetSet<K> for HashMap<K, T>
where
    K: Eq + Hash,
    T: RenderTarget,
{
    fn target_mut(&mut self, key: &K) -> Option<&mut dyn RenderTarget> {
        self.get_mut(key).map(|t| t as &mut dyn RenderTarget)
    }
}
