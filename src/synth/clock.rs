//! The render clock: owner of logical time and driver of the render loop.

use super::error::SynthError;
use super::mixer::Streamer;
use crate::audio::{sample_to_pcm, AudioError, OutputSink};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Process-wide logical time, advanced by exactly one sample period per
/// render tick.
///
/// The render loop is the only writer; envelopes, voices and trigger calls
/// read it through [`RenderClock::now`]. Time is kept as a tick count, so it
/// never drifts and never goes backward.
#[derive(Debug)]
pub struct RenderClock {
    sample_rate: u32,
    ticks: AtomicU64,
}

impl RenderClock {
    pub fn new(sample_rate: u32) -> Result<Self, SynthError> {
        if sample_rate == 0 {
            return Err(SynthError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            sample_rate,
            ticks: AtomicU64::new(0),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length of one tick in seconds.
    pub fn sample_period(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }

    /// Number of ticks rendered so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Current logical time in seconds.
    pub fn now(&self) -> f64 {
        self.ticks() as f64 / self.sample_rate as f64
    }

    /// Moves time forward by one sample period.
    ///
    /// Only the render loop should call this; it is public so offline
    /// renderers and tests can step time by hand.
    pub fn advance(&self) {
        self.ticks.fetch_add(1, Ordering::AcqRel);
    }

    /// Renders a single frame: samples `source` at the current time, encodes
    /// it, advances time and submits the frame to `sink`.
    pub fn tick(&self, source: &dyn Streamer, sink: &mut dyn OutputSink) -> Result<(), AudioError> {
        let t = self.now();
        let pcm = sample_to_pcm(source.stream(t));
        self.advance();
        sink.write(pcm)
    }

    /// Renders `frames` frames back to back on the calling thread.
    pub fn render(
        &self,
        source: &dyn Streamer,
        sink: &mut dyn OutputSink,
        frames: usize,
    ) -> Result<(), AudioError> {
        for _ in 0..frames {
            self.tick(source, sink)?;
        }
        Ok(())
    }

    /// Starts the render loop on a dedicated thread. It runs until the
    /// returned handle is stopped or the sink fails.
    pub fn start(
        self: &Arc<Self>,
        source: Arc<dyn Streamer>,
        mut sink: Box<dyn OutputSink>,
    ) -> Result<RenderHandle, AudioError> {
        let stop = Arc::new(AtomicBool::new(false));
        let clock = Arc::clone(self);
        let stop_flag = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("render".into())
            .spawn(move || {
                log::info!("render loop started at {} Hz", clock.sample_rate());
                while !stop_flag.load(Ordering::Relaxed) {
                    if let Err(e) = clock.tick(source.as_ref(), sink.as_mut()) {
                        log::error!("render loop stopped: {}", e);
                        return Err(e);
                    }
                }
                log::info!("render loop stopped after {} frames", clock.ticks());
                Ok(())
            })
            .map_err(|e| AudioError::RenderThread(e.to_string()))?;

        Ok(RenderHandle {
            stop,
            thread: Some(thread),
        })
    }
}

/// Owner of a running render loop.
pub struct RenderHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<(), AudioError>>>,
}

impl RenderHandle {
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops the loop and waits for it, returning the sink error that ended
    /// it early, if any.
    pub fn stop(mut self) -> Result<(), AudioError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), AudioError> {
        self.stop.store(true, Ordering::Relaxed);
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| AudioError::RenderThread("render thread panicked".into()))?,
            None => Ok(()),
        }
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::warn!("render loop ended with error: {}", e);
        }
    }
}
