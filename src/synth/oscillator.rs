use super::mixer::Streamer;
use super::prelude::{angular, PI};
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Number of harmonics used by the band-limited waveforms when none is given.
pub const DEFAULT_HARMONICS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    /// Hard-edged square, `amp * sign(sin(wt))`.
    Square,
    /// Square approximated by a truncated Fourier series.
    AnalogSquare { harmonics: u32 },
    Triangle,
    /// Modulo ramp.
    Sawtooth,
    /// Sawtooth approximated by a truncated Fourier series.
    AnalogSawtooth { harmonics: u32 },
    Noise,
}

impl Waveform {
    /// Evaluates the waveform at time `t`, drawing noise from the calling
    /// thread's generator.
    pub fn evaluate(&self, amp: f64, freq: f64, t: f64) -> f64 {
        self.evaluate_with(amp, freq, t, &mut rand::rng())
    }

    /// Evaluates the waveform at time `t` for the given amplitude and
    /// frequency. Only `Noise` consumes `rng`.
    pub fn evaluate_with<R: Rng + ?Sized>(&self, amp: f64, freq: f64, t: f64, rng: &mut R) -> f64 {
        match *self {
            Waveform::Sine => amp * (angular(freq) * t).sin(),
            Waveform::Square => {
                // Scales with amp so a silent envelope yields a silent square
                if (angular(freq) * t).sin() > 0.0 {
                    amp
                } else {
                    -amp
                }
            }
            Waveform::AnalogSquare { harmonics } => {
                let w = angular(freq);
                let mut output = 0.0;
                for i in 1..=harmonics {
                    let i = i as f64;
                    output += ((1.0 - (PI * i).cos()) / (PI * i)) * (w * t * i).sin();
                }
                output * (2.0 / PI) * amp
            }
            Waveform::Triangle => {
                // asin is undefined outside [-1, 1], which amp > pi/2 would reach
                let x = amp * (angular(freq) * t).sin() * (2.0 / PI);
                x.clamp(-1.0, 1.0).asin()
            }
            Waveform::Sawtooth => {
                if freq <= 0.0 {
                    return 0.0;
                }
                (2.0 * amp / PI) * (freq * PI * (t % (1.0 / freq)) - PI / 2.0)
            }
            Waveform::AnalogSawtooth { harmonics } => {
                let w = angular(freq);
                let mut output = 0.0;
                for i in 1..=harmonics {
                    let i = i as f64;
                    output += (i * w * t).sin() / i;
                }
                output * (2.0 / PI) * amp
            }
            Waveform::Noise => {
                if amp == 0.0 {
                    return 0.0;
                }
                amp * rng.random_range(-1.0f64..=1.0)
            }
        }
    }
}

/// Parameters controlling an oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscParams {
    pub amplitude: f64,
    pub frequency: f64,
}

impl OscParams {
    pub fn new(amplitude: f64, frequency: f64) -> Self {
        Self {
            amplitude,
            frequency,
        }
    }
}

struct OscState {
    params: OscParams,
    rng: SmallRng,
}

/// A free-running oscillator that can be added to a mixer directly.
///
/// Parameters can be changed from any thread while it is being streamed.
pub struct Oscillator {
    waveform: Waveform,
    state: Mutex<OscState>,
}

impl Oscillator {
    pub fn new(waveform: Waveform, params: OscParams) -> Self {
        Self::with_rng(waveform, params, SmallRng::from_rng(&mut rand::rng()))
    }

    fn with_rng(waveform: Waveform, params: OscParams, rng: SmallRng) -> Self {
        Self {
            waveform,
            state: Mutex::new(OscState { params, rng }),
        }
    }

    pub fn sine(amp: f64, freq: f64) -> Self {
        Self::new(Waveform::Sine, OscParams::new(amp, freq))
    }

    pub fn square(amp: f64, freq: f64) -> Self {
        Self::new(Waveform::Square, OscParams::new(amp, freq))
    }

    pub fn analog_square(amp: f64, freq: f64, harmonics: u32) -> Self {
        Self::new(
            Waveform::AnalogSquare { harmonics },
            OscParams::new(amp, freq),
        )
    }

    pub fn triangle(amp: f64, freq: f64) -> Self {
        Self::new(Waveform::Triangle, OscParams::new(amp, freq))
    }

    pub fn sawtooth(amp: f64, freq: f64) -> Self {
        Self::new(Waveform::Sawtooth, OscParams::new(amp, freq))
    }

    pub fn analog_sawtooth(amp: f64, freq: f64, harmonics: u32) -> Self {
        Self::new(
            Waveform::AnalogSawtooth { harmonics },
            OscParams::new(amp, freq),
        )
    }

    pub fn noise(amp: f64) -> Self {
        Self::new(Waveform::Noise, OscParams::new(amp, 0.0))
    }

    /// Noise source with a reproducible sequence.
    pub fn noise_seeded(amp: f64, seed: u64) -> Self {
        Self::with_rng(
            Waveform::Noise,
            OscParams::new(amp, 0.0),
            SmallRng::seed_from_u64(seed),
        )
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn params(&self) -> OscParams {
        self.state.lock().params
    }

    pub fn amplitude(&self) -> f64 {
        self.state.lock().params.amplitude
    }

    pub fn frequency(&self) -> f64 {
        self.state.lock().params.frequency
    }

    pub fn set_amplitude(&self, amp: f64) {
        self.state.lock().params.amplitude = amp;
    }

    pub fn set_frequency(&self, freq: f64) {
        self.state.lock().params.frequency = freq;
    }
}

impl Streamer for Oscillator {
    fn stream(&self, t: f64) -> f64 {
        let mut state = self.state.lock();
        let OscParams {
            amplitude,
            frequency,
        } = state.params;
        self.waveform
            .evaluate_with(amplitude, frequency, t, &mut state.rng)
    }
}

impl std::fmt::Debug for Oscillator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Oscillator")
            .field("waveform", &self.waveform)
            .field("params", &self.params())
            .finish()
    }
}
