use super::clock::RenderClock;
use super::envelope::Envelope;
use super::error::{check_gain, SynthError};
use super::mixer::Streamer;
use super::oscillator::Waveform;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Signal-combination function of an instrument: `(amplitude, frequency, t) -> sample`.
///
/// The amplitude passed in is the envelope gain at `t`.
pub type SignalFn = Arc<dyn Fn(f64, f64, f64) -> f64 + Send + Sync>;

/// The immutable definition of an instrument: how it sounds and how its
/// amplitude is shaped. Never rendered itself, only used to spawn voices.
#[derive(Clone)]
pub struct VoiceTemplate {
    signal: SignalFn,
    envelope: Envelope,
    amplitude: f64,
}

impl VoiceTemplate {
    pub fn new<F>(signal: F, envelope: Envelope, amplitude: f64) -> Result<Self, SynthError>
    where
        F: Fn(f64, f64, f64) -> f64 + Send + Sync + 'static,
    {
        Ok(Self {
            signal: Arc::new(signal),
            envelope,
            amplitude: check_gain("voice amplitude", amplitude)?,
        })
    }

    /// A template playing a single waveform.
    pub fn from_waveform(
        waveform: Waveform,
        envelope: Envelope,
        amplitude: f64,
    ) -> Result<Self, SynthError> {
        Self::new(
            move |amp, freq, t| waveform.evaluate(amp, freq, t),
            envelope,
            amplitude,
        )
    }

    /// Copy of this template with a different base amplitude.
    pub fn with_amplitude(&self, amplitude: f64) -> Result<Self, SynthError> {
        Ok(Self {
            amplitude: check_gain("voice amplitude", amplitude)?,
            ..self.clone()
        })
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Creates a fresh voice sharing this template's signal function, with its
    /// own copy of the envelope and its own lock.
    pub fn spawn(&self, clock: Arc<RenderClock>) -> Voice {
        Voice {
            signal: Arc::clone(&self.signal),
            clock,
            state: Mutex::new(VoiceState {
                envelope: self.envelope.clone(),
                frequency: 0.0,
                amplitude: self.amplitude,
                finished: false,
            }),
        }
    }
}

impl std::fmt::Debug for VoiceTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceTemplate")
            .field("envelope", &self.envelope)
            .field("amplitude", &self.amplitude)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct VoiceState {
    envelope: Envelope,
    frequency: f64,
    amplitude: f64,
    finished: bool,
}

/// One sounding note: a signal function shaped by its own envelope.
///
/// All mutable state sits behind one lock which `stream` holds for the whole
/// sample, so parameter changes never interleave with rendering.
pub struct Voice {
    signal: SignalFn,
    clock: Arc<RenderClock>,
    state: Mutex<VoiceState>,
}

impl Voice {
    /// Sets the frequency and starts the envelope at the current logical time.
    /// Re-attacking a finished voice brings it back.
    pub fn trigger_attack(&self, freq: f64) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        state.frequency = freq;
        state.finished = false;
        state.envelope.attack(now);
    }

    pub fn trigger_release(&self) {
        let now = self.clock.now();
        self.state.lock().envelope.release(now);
    }

    /// Attacks, waits `hold`, then releases. Blocks the calling thread, so
    /// only call it from the control side.
    pub fn trigger_attack_release(&self, freq: f64, hold: Duration) {
        self.trigger_attack(freq);
        std::thread::sleep(hold);
        self.trigger_release();
    }

    pub fn frequency(&self) -> f64 {
        self.state.lock().frequency
    }

    pub fn set_frequency(&self, freq: f64) {
        self.state.lock().frequency = freq;
    }

    pub fn amplitude(&self) -> f64 {
        self.state.lock().amplitude
    }

    pub fn set_amplitude(&self, amp: f64) {
        self.state.lock().amplitude = amp;
    }

    /// Latched once the envelope has gone silent after its attack began.
    pub fn finished(&self) -> bool {
        self.state.lock().finished
    }

    /// Whether the envelope has passed the end of its last phase, judged
    /// against the clock's current time.
    pub fn envelope_finished(&self) -> bool {
        let now = self.clock.now();
        self.state.lock().envelope.finished_at(now)
    }

    pub fn envelope(&self) -> Envelope {
        self.state.lock().envelope.clone()
    }
}

impl Streamer for Voice {
    fn stream(&self, t: f64) -> f64 {
        let mut state = self.state.lock();
        let gain = state.envelope.amplitude(t);

        // The very first sample of an attack is silent by construction, so
        // only silence after the onset counts.
        if gain <= 0.0 && state.envelope.attack_time().is_some_and(|on| t > on) {
            state.finished = true;
        }

        let sample = state.amplitude * (self.signal)(gain, state.frequency, t);
        if sample.is_finite() {
            sample
        } else {
            0.0
        }
    }
}

impl std::fmt::Debug for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Voice")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}
