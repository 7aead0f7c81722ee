//! Affine world/screen mapping: anisotropic scale plus translation.

use glam::DVec2;
use thiserror::Error;

use starwatch_core::constants::APPLY_EPSILON;

use crate::target::RenderTarget;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ViewError {
    #[error("zoom factor {0} would make the view scale degenerate")]
    DegenerateScale(f64),

    #[error("zoom pivot ({0}, {1}) is not finite")]
    NonFinitePivot(f64, f64),
}

/// `screen = world * scale + translate`, per axis.
///
/// Both scale components stay strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale: DVec2,
    translate: DVec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: DVec2::ONE,
            translate: DVec2::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(&self) -> DVec2 {
        self.scale
    }

    pub fn translation(&self) -> DVec2 {
        self.translate
    }

    /// Shift the origin by `(dx, dy)` expressed in local (pre-scale) units.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.translate += self.scale * DVec2::new(dx, dy);
    }

    /// Zoom by `factor` keeping the local point `(pivot_x, pivot_y)` fixed
    /// on screen.
    ///
    /// Rejected without mutation when the factor is not finite and
    /// positive or when the resulting scale would underflow/overflow.
    pub fn scale_about(&mut self, pivot_x: f64, pivot_y: f64, factor: f64) -> Result<(), ViewError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ViewError::DegenerateScale(factor));
        }
        if !pivot_x.is_finite() || !pivot_y.is_finite() {
            return Err(ViewError::NonFinitePivot(pivot_x, pivot_y));
        }
        let scale = self.scale * factor;
        if !scale.is_finite() || scale.min_element() <= 0.0 {
            return Err(ViewError::DegenerateScale(factor));
        }

        self.translate(pivot_x, pivot_y);
        self.scale = scale;
        self.translate(-pivot_x, -pivot_y);
        Ok(())
    }

    /// Screen point to local (world) coordinates.
    pub fn to_local(&self, screen: DVec2) -> DVec2 {
        (screen - self.translate) / self.scale
    }

    /// Local (world) point to screen coordinates.
    pub fn to_global(&self, world: DVec2) -> DVec2 {
        world * self.scale + self.translate
    }

    /// Bring `target` in line with this transform.
    ///
    /// Only the parts that differ are pushed. Returns whether the target
    /// was touched at all.
    pub fn apply<T: RenderTarget + ?Sized>(&self, target: &mut T) -> bool {
        let mut changed = false;

        let delta = self.translate - target.translation();
        if delta.abs().max_element() > APPLY_EPSILON {
            target.move_by(delta);
            changed = true;
        }

        if (self.scale - target.scale()).abs().max_element() > APPLY_EPSILON {
            target.set_scale(self.scale);
            changed = true;
        }

        changed
    }
}
