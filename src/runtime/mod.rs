pub mod native;
pub use native::NativeSynth;

use crate::audio::AudioError;
use crate::input::InputError;
use crate::synth::SynthError;

/// Anything that can stop the application from starting.
#[derive(Debug)]
pub enum RuntimeError {
    Synth(SynthError),
    Audio(AudioError),
    Input(InputError),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::Synth(e) => write!(f, "{}", e),
            RuntimeError::Audio(e) => write!(f, "{}", e),
            RuntimeError::Input(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Synth(e) => Some(e),
            RuntimeError::Audio(e) => Some(e),
            RuntimeError::Input(e) => Some(e),
        }
    }
}

impl From<SynthError> for RuntimeError {
    fn from(e: SynthError) -> Self {
        RuntimeError::Synth(e)
    }
}

impl From<AudioError> for RuntimeError {
    fn from(e: AudioError) -> Self {
        RuntimeError::Audio(e)
    }
}

impl From<InputError> for RuntimeError {
    fn from(e: InputError) -> Self {
        RuntimeError::Input(e)
    }
}
