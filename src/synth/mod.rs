// Purpose: signal generation and voice management
// Oscillators and envelopes feed voices, voices feed the polyphonic allocator,
// and the render clock samples the root mixer once per frame.

pub mod clock;
pub mod config;
pub mod envelope;
pub mod error;
pub mod instruments;
pub mod mixer;
pub mod note;
pub mod oscillator;
pub mod poly;
pub mod prelude;
pub mod voice;

pub use clock::{RenderClock, RenderHandle};
pub use config::SynthConfig;
pub use envelope::Envelope;
pub use error::SynthError;
pub use mixer::{Mixer, Streamer};
pub use poly::PolySynth;
pub use voice::{Voice, VoiceTemplate};
