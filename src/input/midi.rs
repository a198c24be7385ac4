use super::{parse_midi_message, InputError};
use crate::synth::note::NoteEvent;
use midir::{MidiInput, MidiInputConnection, MidiInputPort};
use std::sync::mpsc::Sender;
use std::sync::mpsc::{self, Receiver};

type RawMessage = (u8, u8, u8);

/// Passes a three-byte message from the MIDI thread to the handler. Shorter
/// messages are ignored; returns whether the message was delivered.
fn forward_raw(sender: &Sender<RawMessage>, message: &[u8]) -> bool {
    let [status, data1, data2, ..] = *message else {
        return false;
    };
    match sender.send((status, data1, data2)) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Dropped MIDI message, handler is gone: {:?}", e.0);
            false
        }
    }
}

pub struct MidiHandler {
    /// Holds the connection to keep it alive
    #[allow(dead_code)]
    connection: MidiInputConnection<()>,
    receiver: Receiver<RawMessage>,
    note_sender: Sender<NoteEvent>,
}

impl MidiHandler {
    /// Connects to the MIDI input port at `port_index`, or the first one.
    pub fn new(note_sender: Sender<NoteEvent>, port_index: Option<usize>) -> Result<Self, InputError> {
        let midi_in =
            MidiInput::new("polysynth input").map_err(|e| InputError::Init(e.to_string()))?;
        let port = Self::select_input_port(&midi_in, port_index.unwrap_or(0))?;
        let port_name = midi_in
            .port_name(&port)
            .map_err(|e| InputError::Connect(e.to_string()))?;

        let (sender, receiver) = mpsc::channel();

        let connection = midi_in
            .connect(
                &port,
                "polysynth-read-input",
                move |_, message, _| {
                    forward_raw(&sender, message);
                },
                (),
            )
            .map_err(|e| InputError::Connect(e.to_string()))?;

        log::info!("Opened MIDI port: {}", port_name);

        Ok(Self {
            connection,
            receiver,
            note_sender,
        })
    }

    fn select_input_port(midi_in: &MidiInput, index: usize) -> Result<MidiInputPort, InputError> {
        let in_ports = midi_in.ports();
        if in_ports.is_empty() {
            return Err(InputError::NoPorts);
        }

        for (i, port) in in_ports.iter().enumerate() {
            log::debug!(
                "MIDI input {}: {}",
                i,
                midi_in.port_name(port).unwrap_or_default()
            );
        }

        in_ports
            .get(index)
            .cloned()
            .ok_or_else(|| InputError::Connect(format!("no MIDI input port at index {}", index)))
    }

    /// Forwards every pending note message as a note event.
    pub fn update(&mut self) {
        while let Ok((status, data1, data2)) = self.receiver.try_recv() {
            let Some(event) = parse_midi_message(status, data1, data2) else {
                continue;
            };
            log::debug!(
                "MIDI note {} {}",
                event.note_number,
                if event.is_on { "on" } else { "off" }
            );
            if let Err(e) = self.note_sender.send(event) {
                log::error!("Failed to send MIDI NoteEvent: {}", e);
            }
        }
    }
}
