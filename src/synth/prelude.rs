// Shared math helpers and re-exports for the engine

pub use std::collections::HashMap;
pub use std::f64::consts::PI;

/// Converts a frequency in hertz to an angular frequency in radians per second.
#[inline]
pub fn angular(freq: f64) -> f64 {
    2.0 * PI * freq
}

