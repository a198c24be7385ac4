use super::{AudioError, PcmFrame};
use ringbuf::traits::{Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::time::Duration;

/// How long a full ring waits before retrying a push.
const FULL_BACKOFF: Duration = Duration::from_millis(1);

/// Destination for rendered PCM frames, one frame per render tick.
pub trait OutputSink: Send {
    fn write(&mut self, frame: PcmFrame) -> Result<(), AudioError>;
}

/// Feeds frames into a lock-free ring drained by an audio device callback.
///
/// `write` waits while the ring is full, which paces the render loop at the
/// device's rate. Once the consuming side is dropped every write fails with
/// [`AudioError::Disconnected`].
pub struct RingSink {
    producer: HeapProd<PcmFrame>,
}

impl RingSink {
    /// Creates a sink holding at most `capacity` frames, and the consuming
    /// end for the device.
    pub fn new(capacity: usize) -> (Self, HeapCons<PcmFrame>) {
        let (producer, consumer) = HeapRb::<PcmFrame>::new(capacity.max(1)).split();
        (Self { producer }, consumer)
    }
}

impl OutputSink for RingSink {
    fn write(&mut self, frame: PcmFrame) -> Result<(), AudioError> {
        loop {
            if !self.producer.read_is_held() {
                return Err(AudioError::Disconnected);
            }
            if self.producer.try_push(frame).is_ok() {
                return Ok(());
            }
            std::thread::sleep(FULL_BACKOFF);
        }
    }
}

/// Collects frames in memory. Used for offline rendering.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    bytes: Vec<u8>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw little-endian bytes, two per frame.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn frames(&self) -> usize {
        self.bytes.len() / 2
    }

    /// Decoded 16-bit samples.
    pub fn samples(&self) -> Vec<i16> {
        self.bytes
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect()
    }
}

impl OutputSink for BufferSink {
    fn write(&mut self, frame: PcmFrame) -> Result<(), AudioError> {
        self.bytes.extend_from_slice(&frame);
        Ok(())
    }
}
