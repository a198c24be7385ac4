//! Ready-made instrument patches built from layered oscillators.

use super::envelope::Envelope;
use super::error::SynthError;
use super::oscillator::{Waveform, DEFAULT_HARMONICS};
use super::voice::VoiceTemplate;

/// Base amplitude shared by the bundled patches.
const PATCH_AMPLITUDE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstrumentKind {
    #[default]
    Bell,
    Harmonica,
}

impl InstrumentKind {
    pub fn template(self) -> Result<VoiceTemplate, SynthError> {
        match self {
            InstrumentKind::Bell => bell(),
            InstrumentKind::Harmonica => harmonica(),
        }
    }
}

impl std::str::FromStr for InstrumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bell" => Ok(InstrumentKind::Bell),
            "harmonica" => Ok(InstrumentKind::Harmonica),
            other => Err(format!("unknown instrument '{}'", other)),
        }
    }
}

/// A struck bell: a fundamental with a slow pitch wobble, plus two
/// overtones, under a short attack and a long decay.
pub fn bell() -> Result<VoiceTemplate, SynthError> {
    VoiceTemplate::new(
        |amp, freq, t| {
            let wobble = Waveform::Sine.evaluate(0.0005, 2.0, t);
            let mut output = 0.0;
            output += 1.00 * Waveform::Sine.evaluate(amp, freq, t + wobble);
            output += 0.50 * Waveform::Sine.evaluate(amp, freq * 2.0, t);
            output += 0.05 * Waveform::Sine.evaluate(amp, freq * 3.0, t);
            output
        },
        Envelope::ad(1.0, 0.1, 1.0)?,
        PATCH_AMPLITUDE,
    )
}

/// A reedy square-wave lead with a breathy noise layer.
pub fn harmonica() -> Result<VoiceTemplate, SynthError> {
    let square = Waveform::AnalogSquare {
        harmonics: DEFAULT_HARMONICS,
    };
    VoiceTemplate::new(
        move |amp, freq, t| {
            let wobble = Waveform::Sine.evaluate(0.001, 5.0, t);
            let mut output = 0.0;
            output += 1.00 * square.evaluate(amp, freq, t + wobble);
            output += 0.50 * square.evaluate(amp, freq * 2.0, t);
            output += 0.05 * Waveform::Noise.evaluate(amp, 0.0, t);
            output
        },
        Envelope::adsr(1.0, 0.95, 0.05, 0.1, 0.2)?,
        PATCH_AMPLITUDE,
    )
}
