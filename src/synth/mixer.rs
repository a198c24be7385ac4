use parking_lot::RwLock;
use std::sync::Arc;

/// Anything that produces a sample for a point in time `t`, in seconds.
///
/// Streamers are shared between the control thread and the render thread,
/// so `stream` takes `&self` and implementations guard their own state.
pub trait Streamer: Send + Sync {
    fn stream(&self, t: f64) -> f64;
}

/// Closures of time can be used directly as streamers.
impl<F> Streamer for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn stream(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Sums the output of several streamers.
///
/// Children are shared, not owned: a streamer added to two mixers is sampled
/// once by each. No normalisation or clipping happens here.
#[derive(Default)]
pub struct Mixer {
    streamers: RwLock<Vec<Arc<dyn Streamer>>>,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_streamers<I>(streamers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Streamer>>,
    {
        Self {
            streamers: RwLock::new(streamers.into_iter().collect()),
        }
    }

    /// Appends one or more streamers, keeping insertion order.
    pub fn add<I>(&self, streamers: I)
    where
        I: IntoIterator<Item = Arc<dyn Streamer>>,
    {
        self.streamers.write().extend(streamers);
    }

    pub fn push(&self, streamer: Arc<dyn Streamer>) {
        self.streamers.write().push(streamer);
    }

    pub fn len(&self) -> usize {
        self.streamers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.streamers.read().is_empty()
    }
}

impl Streamer for Mixer {
    fn stream(&self, t: f64) -> f64 {
        self.streamers.read().iter().map(|s| s.stream(t)).sum()
    }
}
