//! Pan/zoom view management for the starwatch client.
//!
//! [`ViewTransform`] is the affine world-to-screen mapping;
//! [`ViewTransformController`] turns pointer and wheel input into
//! transform mutations and pushes the result to a configured set of
//! render targets. No rendering backend is assumed: targets are anything
//! implementing [`RenderTarget`].

pub mod controller;
pub mod target;
pub mod transform;

pub use controller::{GestureState, InputEvent, ViewTransformController};
pub use target::{RenderTarget, TargetSet};
pub use transform::{ViewError, ViewTransform};
