use super::error::SynthError;

/// Where a note event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSource {
    Midi,
    Keyboard,
}

/// A note-on or note-off request from an input device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub note_number: u8,
    pub velocity: u8,
    pub is_on: bool,
    pub source: NoteSource,
    pub frequency: f64,
}

impl NoteEvent {
    pub fn new(
        note_number: u8,
        velocity: u8,
        is_on: bool,
        source: NoteSource,
    ) -> Result<Self, SynthError> {
        if note_number > 127 {
            return Err(SynthError::InvalidNote(note_number));
        }
        Ok(Self {
            note_number,
            velocity: velocity.min(127),
            is_on,
            source,
            frequency: midi_to_freq(note_number),
        })
    }
}

/// Equal-tempered frequency of a MIDI note, with A4 (note 69) at 440 Hz.
pub fn midi_to_freq(note: u8) -> f64 {
    440.0 * 2f64.powf((note as f64 - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_to_freq_octaves() {
        assert_eq!(midi_to_freq(69), 440.0);
        assert_eq!(midi_to_freq(81), 880.0);
        assert_eq!(midi_to_freq(57), 220.0);
    }

    #[test]
    fn test_midi_to_freq_semitone() {
        // A#4
        assert!((midi_to_freq(70) - 466.1638).abs() < 1e-3);
        // Middle C
        assert!((midi_to_freq(60) - 261.6256).abs() < 1e-3);
    }

    #[test]
    fn test_note_event_rejects_out_of_range() {
        assert_eq!(
            NoteEvent::new(128, 100, true, NoteSource::Midi),
            Err(SynthError::InvalidNote(128))
        );
        let event = NoteEvent::new(69, 100, true, NoteSource::Keyboard).unwrap();
        assert_eq!(event.frequency, 440.0);
    }
}
