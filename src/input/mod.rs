#[cfg(feature = "native")]
mod keyboard;
#[cfg(feature = "native")]
mod midi;
#[cfg(feature = "native")]
pub use self::keyboard::KeyboardHandler;
#[cfg(feature = "native")]
pub use self::midi::MidiHandler;

use crate::synth::note::{NoteEvent, NoteSource};

/// Error type for note event sources.
#[derive(Debug)]
pub enum InputError {
    /// Failed to initialize the input transport
    Init(String),
    /// No input ports to connect to
    NoPorts,
    /// Failed to connect to a port
    Connect(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Init(msg) => write!(f, "Input init error: {}", msg),
            InputError::NoPorts => write!(f, "No MIDI input ports found"),
            InputError::Connect(msg) => write!(f, "Input connect error: {}", msg),
        }
    }
}

impl std::error::Error for InputError {}

/// Translates a raw three-byte MIDI channel message into a note event.
///
/// Note-on with velocity 0 counts as note-off; anything that is not a note
/// message yields `None`.
pub fn parse_midi_message(status: u8, data1: u8, data2: u8) -> Option<NoteEvent> {
    let kind = status & 0xF0;
    let note_on = kind == 0x90 && data2 > 0;
    let note_off = kind == 0x80 || (kind == 0x90 && data2 == 0);

    if note_on {
        NoteEvent::new(data1, data2, true, NoteSource::Midi).ok()
    } else if note_off {
        NoteEvent::new(data1, 0, false, NoteSource::Midi).ok()
    } else {
        None
    }
}
