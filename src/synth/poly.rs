use super::clock::RenderClock;
use super::mixer::Streamer;
use super::prelude::HashMap;
use super::voice::{Voice, VoiceTemplate};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Frequencies are keyed by their exact bit pattern: one voice per exact
/// frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FreqKey(u64);

impl FreqKey {
    fn new(freq: f64) -> Self {
        // Collapse -0.0 onto 0.0
        FreqKey((freq + 0.0).to_bits())
    }
}

/// A live voice together with when it was attacked and released.
struct NoteEntry {
    voice: Voice,
    on: f64,
    off: Option<f64>,
}

impl NoteEntry {
    /// Whether the note was released at or after its attack. A release
    /// stamped at the same instant as the attack (a zero-length
    /// attack-release) counts, otherwise such a voice would never be
    /// reclaimed.
    fn released_after_attack(&self) -> bool {
        self.off.is_some_and(|off| off >= self.on)
    }
}

/// Plays many notes at once, each on its own voice spawned from a template.
///
/// Voices are created on attack and reclaimed lazily by `stream` once they
/// have been released and gone silent, so no voice handles are needed.
pub struct PolySynth {
    template: VoiceTemplate,
    clock: Arc<RenderClock>,
    notes: Mutex<HashMap<FreqKey, NoteEntry>>,
}

impl PolySynth {
    pub fn new(template: VoiceTemplate, clock: Arc<RenderClock>) -> Self {
        Self {
            template,
            clock,
            notes: Mutex::new(HashMap::new()),
        }
    }

    pub fn template(&self) -> &VoiceTemplate {
        &self.template
    }

    /// Starts a new voice for every frequency. A frequency that is already
    /// sounding has its voice replaced.
    pub fn trigger_attack(&self, freqs: &[f64]) {
        for &freq in freqs {
            // Build the voice before taking the allocator lock
            let voice = self.template.spawn(Arc::clone(&self.clock));
            voice.trigger_attack(freq);
            let on = voice.envelope().attack_time().unwrap_or_else(|| self.clock.now());

            let replaced = self.notes.lock().insert(
                FreqKey::new(freq),
                NoteEntry {
                    voice,
                    on,
                    off: None,
                },
            );
            log::debug!(
                "attack {:.2} Hz at {:.4}s{}",
                freq,
                on,
                if replaced.is_some() { " (retrigger)" } else { "" }
            );
        }
    }

    /// Releases the voices sounding at the given frequencies. Frequencies with
    /// no live voice are ignored.
    pub fn trigger_release(&self, freqs: &[f64]) {
        let mut notes = self.notes.lock();
        for &freq in freqs {
            if let Some(entry) = notes.get_mut(&FreqKey::new(freq)) {
                let off = self.clock.now();
                entry.voice.trigger_release();
                entry.off = Some(off);
                log::debug!("release {:.2} Hz at {:.4}s", freq, off);
            }
        }
    }

    /// Attacks, waits `hold`, then releases. Blocks the calling thread, so
    /// only call it from the control side.
    pub fn trigger_attack_release(&self, freqs: &[f64], hold: Duration) {
        self.trigger_attack(freqs);
        std::thread::sleep(hold);
        self.trigger_release(freqs);
    }

    /// Releases every live voice.
    pub fn release_all(&self) {
        let freqs: Vec<f64> = self
            .notes
            .lock()
            .values()
            .map(|entry| entry.voice.frequency())
            .collect();
        self.trigger_release(&freqs);
    }

    /// Number of voices currently held, including ones still releasing.
    pub fn live_voices(&self) -> usize {
        self.notes.lock().len()
    }

    pub fn is_sounding(&self, freq: f64) -> bool {
        self.notes.lock().contains_key(&FreqKey::new(freq))
    }
}

impl Streamer for PolySynth {
    fn stream(&self, t: f64) -> f64 {
        let mut sum = 0.0;
        self.notes.lock().retain(|_, entry| {
            let val = entry.voice.stream(t);
            sum += val;
            !(val == 0.0 && entry.voice.finished() && entry.released_after_attack())
        });
        sum
    }
}
