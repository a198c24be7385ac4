use super::{pcm_to_sample, AudioBackend, AudioError, PcmFrame, RingSink};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};
use ringbuf::traits::Consumer;
use ringbuf::HeapCons;

/// Plays frames produced by the render loop on the default output device.
///
/// The render loop writes into the paired [`RingSink`]; the device
/// callback pops from its ring and plays silence whenever it runs dry.
pub struct CpalBackend {
    stream: Option<Stream>,
    consumer: Option<HeapCons<PcmFrame>>,
    sample_rate: u32,
}

impl CpalBackend {
    /// Creates a backend and the sink the render loop should write to.
    /// `buffer_frames` bounds how far rendering may run ahead of playback.
    pub fn new(sample_rate: u32, buffer_frames: usize) -> (Self, RingSink) {
        let (sink, consumer) = RingSink::new(buffer_frames);
        let backend = Self {
            stream: None,
            consumer: Some(consumer),
            sample_rate,
        };
        (backend, sink)
    }

    fn select_output_device(&self, host: &cpal::Host) -> Result<cpal::Device, AudioError> {
        host.default_output_device().ok_or(AudioError::NoDevice)
    }

    fn build_stream(&mut self) -> Result<Stream, AudioError> {
        let host = cpal::default_host();
        let device = self.select_output_device(&host)?;
        log::info!(
            "Selected output device: {}",
            device.name().unwrap_or_default()
        );

        let supported_config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;
        let mut stream_config: cpal::StreamConfig = supported_config.clone().into();
        stream_config.sample_rate = cpal::SampleRate(self.sample_rate);

        let channels = stream_config.channels as usize;
        let mut consumer = self
            .consumer
            .take()
            .ok_or_else(|| AudioError::StreamCreate("stream already built".into()))?;
        let err_fn = |err| log::error!("Stream error: {}", err);

        let stream = match supported_config.sample_format() {
            SampleFormat::F32 => device.build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let sample = consumer.try_pop().map(pcm_to_sample).unwrap_or(0.0);
                        frame.fill(sample);
                    }
                },
                err_fn,
                None,
            ),
            SampleFormat::I16 => device.build_output_stream(
                &stream_config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let sample = consumer.try_pop().map(i16::from_le_bytes).unwrap_or(0);
                        frame.fill(sample);
                    }
                },
                err_fn,
                None,
            ),
            other => {
                return Err(AudioError::StreamCreate(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        }
        .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        log::info!(
            "Output stream: {} Hz, {} channel(s), {:?}",
            self.sample_rate,
            channels,
            supported_config.sample_format()
        );
        Ok(stream)
    }
}

impl AudioBackend for CpalBackend {
    fn start(&mut self) -> Result<(), AudioError> {
        if self.stream.is_none() {
            self.stream = Some(self.build_stream()?);
        }
        if let Some(stream) = &self.stream {
            stream
                .play()
                .map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        if let Some(stream) = &self.stream {
            stream
                .pause()
                .map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}
