//! Output side of the engine: PCM encoding, sinks and device backends.

#[cfg(feature = "native")]
mod cpal_backend;
mod sink;

#[cfg(feature = "native")]
pub use self::cpal_backend::CpalBackend;
pub use self::sink::{BufferSink, OutputSink, RingSink};

/// A 16-bit signed little-endian mono frame.
pub type PcmFrame = [u8; 2];

/// Encodes a sample in `-1.0..=1.0` as 16-bit little-endian PCM.
///
/// Out-of-range samples are clipped rather than wrapped.
pub fn sample_to_pcm(val: f64) -> PcmFrame {
    let val = if val.is_nan() { 0.0 } else { val.clamp(-1.0, 1.0) };
    let int_val = (val * i16::MAX as f64) as i16;
    int_val.to_le_bytes()
}

/// Decodes a PCM frame back into a sample in `-1.0..=1.0`.
pub fn pcm_to_sample(frame: PcmFrame) -> f32 {
    i16::from_le_bytes(frame) as f32 / i16::MAX as f32
}

/// Error type for audio output.
#[derive(Debug)]
pub enum AudioError {
    /// No audio device available
    NoDevice,
    /// Failed to initialize audio device
    DeviceInit(String),
    /// Failed to create audio stream
    StreamCreate(String),
    /// Playback error
    Playback(String),
    /// The consumer of rendered frames has gone away
    Disconnected,
    /// The render thread could not be started or panicked
    RenderThread(String),
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::NoDevice => write!(f, "No audio device available"),
            AudioError::DeviceInit(msg) => write!(f, "Device init error: {}", msg),
            AudioError::StreamCreate(msg) => write!(f, "Stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "Playback error: {}", msg),
            AudioError::Disconnected => write!(f, "Audio output disconnected"),
            AudioError::RenderThread(msg) => write!(f, "Render thread error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

pub trait AudioBackend {
    fn start(&mut self) -> Result<(), AudioError>;
    fn stop(&mut self) -> Result<(), AudioError>;
}
