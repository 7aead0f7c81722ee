//! Gesture state machine driving the view transform.
//!
//! ```text
//! Idle --PointerDown/TouchStart--> Dragging --PointerUp/TouchEnd/Cancel--> Idle
//!                                     |  ^
//!                                     +--+ PointerMove/TouchMove (pan)
//! Wheel zooms about the pointer in either state.
//! ```

use glam::DVec2;

use starwatch_core::constants::DEFAULT_ZOOM_STEP;

use crate::target::TargetSet;
use crate::transform::ViewTransform;

/// Input in screen-space pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(DVec2),
    PointerMove(DVec2),
    PointerUp,
    TouchStart(DVec2),
    TouchMove(DVec2),
    TouchEnd,
    /// Wheel or pinch at `at`. Negative `delta_y` zooms in.
    Wheel { at: DVec2, delta_y: f64 },
    /// Focus loss, pointer cancel or any other interruption of a gesture.
    Cancel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    /// Panning. `anchor` is the local point held under the pointer.
    Dragging { anchor: DVec2 },
}

/// Owns the view transform and keeps a configured set of targets in sync
/// with it.
///
/// Targets are referenced by key so layers that must not move with the
/// view (a heads-up overlay) are simply left out of the list.
#[derive(Debug, Clone)]
pub struct ViewTransformController<K> {
    view: ViewTransform,
    state: GestureState,
    targets: Vec<K>,
    zoom_step: f64,
}

impl<K> ViewTransformController<K> {
    pub fn new(targets: Vec<K>) -> Self {
        Self {
            view: ViewTransform::default(),
            state: GestureState::Idle,
            targets,
            zoom_step: DEFAULT_ZOOM_STEP,
        }
    }

    /// Use a different per-notch zoom factor. Values not above 1 are ignored.
    pub fn with_zoom_step(mut self, zoom_step: f64) -> Self {
        if zoom_step.is_finite() && zoom_step > 1.0 {
            self.zoom_step = zoom_step;
        } else {
            log::warn!("ignoring zoom step {zoom_step}, keeping {}", self.zoom_step);
        }
        self
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn targets(&self) -> &[K] {
        &self.targets
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Feed one input event. Returns whether the view transform changed.
    pub fn handle<S>(&mut self, event: InputEvent, set: &mut S) -> bool
    where
        S: TargetSet<K> + ?Sized,
    {
        match event {
            InputEvent::PointerDown(at) => {
                self.begin_drag(at);
                false
            }
            InputEvent::TouchStart(at) => {
                if self.is_dragging() {
                    // A second finger while panning: stop rather than jump.
                    log::debug!("multi-touch during drag, cancelling pan");
                    self.state = GestureState::Idle;
                } else {
                    self.begin_drag(at);
                }
                false
            }
            InputEvent::PointerMove(at) | InputEvent::TouchMove(at) => self.drag_to(at, set),
            InputEvent::PointerUp | InputEvent::TouchEnd | InputEvent::Cancel => {
                self.state = GestureState::Idle;
                false
            }
            InputEvent::Wheel { at, delta_y } => self.zoom_at(at, delta_y, set),
        }
    }

    /// Push the current transform to every bound target. Returns how many
    /// targets were actually updated.
    pub fn apply_all<S>(&self, set: &mut S) -> usize
    where
        S: TargetSet<K> + ?Sized,
    {
        let mut updated = 0;
        for key in &self.targets {
            if let Some(target) = set.target_mut(key) {
                if self.view.apply(target) {
                    updated += 1;
                }
            }
        }
        updated
    }

    fn begin_drag(&mut self, at: DVec2) {
        self.state = GestureState::Dragging {
            anchor: self.view.to_local(at),
        };
    }

    fn drag_to<S>(&mut self, at: DVec2, set: &mut S) -> bool
    where
        S: TargetSet<K> + ?Sized,
    {
        let GestureState::Dragging { anchor } = self.state else {
            return false;
        };

        let local = self.view.to_local(at);
        let delta = local - anchor;
        if !delta.is_finite() {
            log::warn!("ignoring drag to non-finite point {at}");
            return false;
        }
        if delta == DVec2::ZERO {
            return false;
        }

        self.view.translate(delta.x, delta.y);
        self.apply_all(set);
        self.state = GestureState::Dragging {
            anchor: self.view.to_local(at),
        };
        true
    }

    fn zoom_at<S>(&mut self, at: DVec2, delta_y: f64, set: &mut S) -> bool
    where
        S: TargetSet<K> + ?Sized,
    {
        let factor = if delta_y < 0.0 {
            self.zoom_step
        } else if delta_y > 0.0 {
            1.0 / self.zoom_step
        } else {
            return false;
        };

        let pivot = self.view.to_local(at);
        match self.view.scale_about(pivot.x, pivot.y, factor) {
            Ok(()) => {
                self.apply_all(set);
                true
            }
            Err(e) => {
                log::warn!("zoom rejected: {e}");
                false
            }
        }
    }
}
