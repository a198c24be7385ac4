use super::error::{check_gain, SynthError};
use super::instruments::InstrumentKind;
use std::time::Duration;

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Output sample rate, in Hz.
    pub sample_rate: u32,
    /// How far rendering may run ahead of the device.
    pub buffer_duration: Duration,
    /// Base amplitude given to every voice of the instrument.
    pub master_amplitude: f64,
    pub instrument: InstrumentKind,
}

impl SynthConfig {
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.sample_rate == 0 {
            return Err(SynthError::InvalidSampleRate(self.sample_rate));
        }
        if self.buffer_duration.is_zero() {
            return Err(SynthError::InvalidDuration {
                name: "buffer_duration",
                value: 0.0,
            });
        }
        check_gain("master_amplitude", self.master_amplitude)?;
        Ok(())
    }

    /// Number of frames that fit in `buffer_duration`.
    pub fn buffer_frames(&self) -> usize {
        ((self.sample_rate as f64 * self.buffer_duration.as_secs_f64()).round() as usize).max(1)
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            buffer_duration: Duration::from_millis(100),
            master_amplitude: 0.05,
            instrument: InstrumentKind::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_buffer_is_a_tenth_of_a_second() {
        let config = SynthConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.buffer_frames(), 4410);
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        let config = SynthConfig {
            sample_rate: 0,
            ..SynthConfig::default()
        };
        assert_eq!(config.validate(), Err(SynthError::InvalidSampleRate(0)));
    }
}
