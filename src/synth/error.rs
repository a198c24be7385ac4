//! Engine configuration errors.

/// Error type for invalid synth configuration.
///
/// These are raised when an instrument, envelope or engine is built, never
/// while rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthError {
    /// A duration parameter was zero, negative or not finite
    InvalidDuration { name: &'static str, value: f64 },
    /// An amplitude parameter was out of range or not finite
    InvalidAmplitude { name: &'static str, value: f64 },
    /// The sample rate was zero
    InvalidSampleRate(u32),
    /// A MIDI note number above 127
    InvalidNote(u8),
}

impl std::fmt::Display for SynthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthError::InvalidDuration { name, value } => {
                write!(f, "Invalid duration for {}: {} (must be finite and > 0)", name, value)
            }
            SynthError::InvalidAmplitude { name, value } => {
                write!(f, "Invalid amplitude for {}: {}", name, value)
            }
            SynthError::InvalidSampleRate(rate) => {
                write!(f, "Invalid sample rate: {} Hz", rate)
            }
            SynthError::InvalidNote(note) => write!(f, "Invalid MIDI note number: {}", note),
        }
    }
}

impl std::error::Error for SynthError {}

/// Checks that a duration in seconds is finite and strictly positive.
pub(crate) fn check_duration(name: &'static str, value: f64) -> Result<f64, SynthError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SynthError::InvalidDuration { name, value })
    }
}

/// Checks that an envelope level is finite and within `0.0..=1.0`.
pub(crate) fn check_level(name: &'static str, value: f64) -> Result<f64, SynthError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SynthError::InvalidAmplitude { name, value })
    }
}

/// Checks that a gain is finite and non-negative.
pub(crate) fn check_gain(name: &'static str, value: f64) -> Result<f64, SynthError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SynthError::InvalidAmplitude { name, value })
    }
}
