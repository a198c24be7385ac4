use crate::synth::note::{NoteEvent, NoteSource};
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::collections::HashMap;
use std::sync::mpsc::Sender;

/// Plays notes from the computer keyboard, laid out like a piano: the home
/// row holds the naturals from A3 to C5 and the row above the sharps.
pub struct KeyboardHandler {
    device_state: DeviceState,
    key_states: HashMap<Keycode, bool>,
    key_to_note: HashMap<Keycode, u8>,
    note_sender: Sender<NoteEvent>,
}

impl KeyboardHandler {
    pub fn new(note_sender: Sender<NoteEvent>) -> Self {
        let device_state = DeviceState::new();

        let key_to_note: HashMap<Keycode, u8> = [
            // Bottom row - natural notes (A, B, C, D, E, F, G, A, B, C)
            (Keycode::A, 57),         // A3
            (Keycode::S, 59),         // B3
            (Keycode::D, 60),         // C4
            (Keycode::F, 62),         // D4
            (Keycode::G, 64),         // E4
            (Keycode::H, 65),         // F4
            (Keycode::J, 67),         // G4
            (Keycode::K, 69),         // A4
            (Keycode::L, 71),         // B4
            (Keycode::Semicolon, 72), // C5
            // Top row - sharp/flat notes
            (Keycode::W, 58),           // A#3/Bb3
            (Keycode::R, 61),           // C#4/Db4
            (Keycode::T, 63),           // D#4/Eb4
            (Keycode::U, 66),           // F#4/Gb4
            (Keycode::I, 68),           // G#4/Ab4
            (Keycode::O, 70),           // A#4/Bb4
            (Keycode::LeftBracket, 73), // C#5/Db5
        ]
        .into_iter()
        .collect();

        let key_states = key_to_note.keys().map(|key| (*key, false)).collect();

        Self {
            device_state,
            key_states,
            key_to_note,
            note_sender,
        }
    }

    /// Polls the keyboard and sends an event for every key that changed.
    pub fn update(&mut self) {
        let keys: Vec<Keycode> = self.device_state.get_keys();

        for (key, note) in &self.key_to_note {
            let is_pressed = keys.contains(key);
            let was_pressed = self.key_states.get(key).copied().unwrap_or(false);
            if is_pressed == was_pressed {
                continue;
            }

            log::debug!(
                "Key '{:?}' {} - note {}",
                key,
                if is_pressed { "pressed" } else { "released" },
                note
            );
            let velocity = if is_pressed { 100 } else { 0 };
            if let Ok(event) = NoteEvent::new(*note, velocity, is_pressed, NoteSource::Keyboard) {
                if let Err(e) = self.note_sender.send(event) {
                    log::error!("Error sending keyboard note event: {}", e);
                }
            }
            self.key_states.insert(*key, is_pressed);
        }
    }
}
