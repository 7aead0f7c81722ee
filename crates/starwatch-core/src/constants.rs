//! Client constants and tuning parameters.

/// Microseconds per second. Server timestamps are in microseconds.
pub const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Display radius used when the first snapshot of an entity carries none.
pub const DEFAULT_RADIUS: f64 = 10.0;

// --- View ---

/// Zoom factor applied per wheel notch (inverse for zoom-out).
pub const DEFAULT_ZOOM_STEP: f64 = 1.1;

/// Tolerance used when deciding whether a render target already matches
/// the view transform.
pub const APPLY_EPSILON: f64 = 1e-9;

// --- Wire format ---

/// Number of components in a wire `pos` tuple: `(x, y, vx, vy)`.
pub const WIRE_POS_LEN: usize = 4;
