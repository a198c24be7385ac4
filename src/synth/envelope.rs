//! Time-keyed amplitude envelopes.
//!
//! Every envelope is a pure function of the recorded attack/release
//! timestamps and its shape parameters, so evaluating it never mutates
//! anything. Times are absolute logical seconds from the render clock.

use super::clock::RenderClock;
use super::error::{check_duration, check_level, SynthError};

/// Recorded trigger timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Trigger {
    attack: Option<f64>,
    release: Option<f64>,
}

impl Trigger {
    fn attack(&mut self, t: f64) {
        self.attack = Some(t);
        self.release = None;
    }

    /// Level of the envelope at `t`.
    ///
    /// `shaped(elapsed)` gives the attack (and decay) curve for the first
    /// `shape_duration` seconds after the attack; it always plays out in
    /// full, even if the note is released during it. After that the level
    /// holds at `sustain` until released, then ramps from `sustain` to zero
    /// over `release_duration` measured from the release timestamp.
    fn amplitude(
        &self,
        t: f64,
        shaped: impl Fn(f64) -> f64,
        shape_duration: f64,
        sustain: f64,
        release_duration: f64,
    ) -> f64 {
        let Some(on) = self.attack else {
            return 0.0;
        };
        if t < on {
            return 0.0;
        }

        let elapsed = t - on;
        if elapsed <= shape_duration {
            return shaped(elapsed);
        }

        match self.release {
            Some(off) if t >= off => {
                let elapsed = t - off;
                if elapsed <= release_duration {
                    sustain - sustain * (elapsed / release_duration)
                } else {
                    0.0
                }
            }
            _ => sustain,
        }
    }
}

/// Attack-decay envelope. There is no sustain, so every note lasts
/// `attack_duration + decay_duration` and `release` does nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct AdEnvelope {
    amplitude: f64,
    attack_duration: f64,
    decay_duration: f64,
    trigger: Trigger,
}

impl AdEnvelope {
    pub fn new(amplitude: f64, attack_duration: f64, decay_duration: f64) -> Result<Self, SynthError> {
        Ok(Self {
            amplitude: check_level("amplitude", amplitude)?,
            attack_duration: check_duration("attack_duration", attack_duration)?,
            decay_duration: check_duration("decay_duration", decay_duration)?,
            trigger: Trigger::default(),
        })
    }

    fn shaped(&self, elapsed: f64) -> f64 {
        let a = self.attack_duration;
        if elapsed <= a {
            (elapsed / a) * self.amplitude
        } else {
            self.amplitude - self.amplitude * ((elapsed - a) / self.decay_duration)
        }
    }
}

/// Attack-sustain-release envelope: ramps up to `amplitude`, holds it while
/// the note is on, then ramps down over `release_duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct AsrEnvelope {
    amplitude: f64,
    attack_duration: f64,
    release_duration: f64,
    trigger: Trigger,
}

impl AsrEnvelope {
    pub fn new(
        amplitude: f64,
        attack_duration: f64,
        release_duration: f64,
    ) -> Result<Self, SynthError> {
        Ok(Self {
            amplitude: check_level("amplitude", amplitude)?,
            attack_duration: check_duration("attack_duration", attack_duration)?,
            release_duration: check_duration("release_duration", release_duration)?,
            trigger: Trigger::default(),
        })
    }

    fn shaped(&self, elapsed: f64) -> f64 {
        (elapsed / self.attack_duration) * self.amplitude
    }
}

/// Attack-decay-sustain-release envelope.
///
/// ```plaintext
/// amplitude
/// ^
/// |     /\  <- attack_amplitude
/// |    /  \
/// |   /    +-----------+   <- sustain_amplitude
/// |  /                  \
/// +-+----+--+-----------+--+----> time
///   | A  |D |  sustain  |R |
///   attack              release
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AdsrEnvelope {
    attack_amplitude: f64,
    sustain_amplitude: f64,
    attack_duration: f64,
    decay_duration: f64,
    release_duration: f64,
    trigger: Trigger,
}

impl AdsrEnvelope {
    pub fn new(
        attack_amplitude: f64,
        sustain_amplitude: f64,
        attack_duration: f64,
        decay_duration: f64,
        release_duration: f64,
    ) -> Result<Self, SynthError> {
        Ok(Self {
            attack_amplitude: check_level("attack_amplitude", attack_amplitude)?,
            sustain_amplitude: check_level("sustain_amplitude", sustain_amplitude)?,
            attack_duration: check_duration("attack_duration", attack_duration)?,
            decay_duration: check_duration("decay_duration", decay_duration)?,
            release_duration: check_duration("release_duration", release_duration)?,
            trigger: Trigger::default(),
        })
    }

    fn shaped(&self, elapsed: f64) -> f64 {
        let a = self.attack_duration;
        if elapsed <= a {
            (elapsed / a) * self.attack_amplitude
        } else {
            let drop = self.attack_amplitude - self.sustain_amplitude;
            self.attack_amplitude - drop * ((elapsed - a) / self.decay_duration)
        }
    }
}

/// One of the supported envelope shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Ad(AdEnvelope),
    Asr(AsrEnvelope),
    Adsr(AdsrEnvelope),
}

impl Envelope {
    pub fn ad(amplitude: f64, attack: f64, decay: f64) -> Result<Self, SynthError> {
        AdEnvelope::new(amplitude, attack, decay).map(Envelope::Ad)
    }

    pub fn asr(amplitude: f64, attack: f64, release: f64) -> Result<Self, SynthError> {
        AsrEnvelope::new(amplitude, attack, release).map(Envelope::Asr)
    }

    pub fn adsr(
        attack_amplitude: f64,
        sustain_amplitude: f64,
        attack: f64,
        decay: f64,
        release: f64,
    ) -> Result<Self, SynthError> {
        AdsrEnvelope::new(attack_amplitude, sustain_amplitude, attack, decay, release)
            .map(Envelope::Adsr)
    }

    fn trigger(&self) -> &Trigger {
        match self {
            Envelope::Ad(env) => &env.trigger,
            Envelope::Asr(env) => &env.trigger,
            Envelope::Adsr(env) => &env.trigger,
        }
    }

    fn trigger_mut(&mut self) -> &mut Trigger {
        match self {
            Envelope::Ad(env) => &mut env.trigger,
            Envelope::Asr(env) => &mut env.trigger,
            Envelope::Adsr(env) => &mut env.trigger,
        }
    }

    /// Starts the attack phase at `t`. Re-attacking restarts the envelope and
    /// forgets any earlier release.
    pub fn attack(&mut self, t: f64) {
        self.trigger_mut().attack(t);
    }

    /// Starts the release phase at `t`. A no-op for attack-decay envelopes and
    /// for envelopes that were never attacked.
    pub fn release(&mut self, t: f64) {
        if matches!(self, Envelope::Ad(_)) {
            return;
        }
        let trigger = self.trigger_mut();
        if trigger.attack.is_some() {
            trigger.release = Some(t);
        }
    }

    /// Gain in `0.0..=1.0` at absolute time `t`.
    pub fn amplitude(&self, t: f64) -> f64 {
        match self {
            // No sustain, and an AD envelope never records a release
            Envelope::Ad(env) => env.trigger.amplitude(
                t,
                |e| env.shaped(e),
                env.attack_duration + env.decay_duration,
                0.0,
                0.0,
            ),
            Envelope::Asr(env) => env.trigger.amplitude(
                t,
                |e| env.shaped(e),
                env.attack_duration,
                env.amplitude,
                env.release_duration,
            ),
            Envelope::Adsr(env) => env.trigger.amplitude(
                t,
                |e| env.shaped(e),
                env.attack_duration + env.decay_duration,
                env.sustain_amplitude,
                env.release_duration,
            ),
        }
    }

    pub fn started(&self) -> bool {
        self.trigger().attack.is_some()
    }

    pub fn released(&self) -> bool {
        self.trigger().release.is_some()
    }

    /// Time of the most recent attack.
    pub fn attack_time(&self) -> Option<f64> {
        self.trigger().attack
    }

    /// Time of the release following the most recent attack.
    pub fn release_time(&self) -> Option<f64> {
        self.trigger().release
    }

    /// Absolute time at which the last phase ends, if it is known yet.
    pub fn end_time(&self) -> Option<f64> {
        match self {
            Envelope::Ad(env) => env
                .trigger
                .attack
                .map(|on| on + env.attack_duration + env.decay_duration),
            Envelope::Asr(env) => env.trigger.release.map(|off| off + env.release_duration),
            Envelope::Adsr(env) => env.trigger.release.map(|off| off + env.release_duration),
        }
    }

    /// Whether the envelope has run past its last phase, judged against the
    /// clock's current time rather than any render-local time.
    pub fn finished(&self, clock: &RenderClock) -> bool {
        self.finished_at(clock.now())
    }

    pub fn finished_at(&self, now: f64) -> bool {
        self.end_time().is_some_and(|end| now > end)
    }
}
