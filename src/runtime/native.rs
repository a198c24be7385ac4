use crate::synth::note::NoteEvent;
use crate::synth::PolySynth;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// Control side of the application: turns note events into attack and
/// release calls on the polyphonic synth.
pub struct NativeSynth {
    synth: Arc<PolySynth>,
    note_receiver: Receiver<NoteEvent>,
}

impl NativeSynth {
    pub fn new(synth: Arc<PolySynth>, note_receiver: Receiver<NoteEvent>) -> Self {
        Self {
            synth,
            note_receiver,
        }
    }

    /// Handles every pending note event; returns how many were handled.
    pub fn process_note_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.note_receiver.try_recv() {
            if event.is_on {
                self.synth.trigger_attack(&[event.frequency]);
            } else {
                self.synth.trigger_release(&[event.frequency]);
            }
            handled += 1;
        }
        handled
    }
}

/// Where note events come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// MIDI input port at the given index
    Midi(usize),
    /// Computer keyboard
    Keyboard,
}

#[cfg(feature = "native")]
pub use self::app::start;

#[cfg(feature = "native")]
mod app {
    use super::{InputMode, NativeSynth};
    use crate::audio::{AudioBackend, CpalBackend};
    use crate::input::{KeyboardHandler, MidiHandler};
    use crate::runtime::RuntimeError;
    use crate::synth::{Mixer, PolySynth, RenderClock, Streamer, SynthConfig};
    use std::sync::mpsc::channel;
    use std::sync::Arc;
    use std::time::Duration;

    enum Input {
        Midi(MidiHandler),
        Keyboard(KeyboardHandler),
    }

    impl Input {
        fn update(&mut self) {
            match self {
                Input::Midi(handler) => handler.update(),
                Input::Keyboard(handler) => handler.update(),
            }
        }
    }

    /// Opens the audio device and the note source, starts rendering, and
    /// plays notes until the process is killed. Device failures are returned
    /// before anything is played.
    pub fn start(config: SynthConfig, input_mode: InputMode) -> Result<(), RuntimeError> {
        config.validate()?;

        let clock = Arc::new(RenderClock::new(config.sample_rate)?);
        let template = config
            .instrument
            .template()?
            .with_amplitude(config.master_amplitude)?;
        log::info!("Instrument: {:?}", config.instrument);

        let synth = Arc::new(PolySynth::new(template, Arc::clone(&clock)));
        let mixer = Arc::new(Mixer::new());
        mixer.push(synth.clone());

        let (mut audio_backend, sink) = CpalBackend::new(config.sample_rate, config.buffer_frames());
        audio_backend.start()?;

        let (note_tx, note_rx) = channel();
        let mut input = match input_mode {
            InputMode::Midi(port) => Input::Midi(MidiHandler::new(note_tx, Some(port))?),
            InputMode::Keyboard => Input::Keyboard(KeyboardHandler::new(note_tx)),
        };

        let source: Arc<dyn Streamer> = mixer;
        let _render = clock.start(source, Box::new(sink))?;
        let mut native = NativeSynth::new(synth, note_rx);

        loop {
            input.update();
            native.process_note_events();
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}
