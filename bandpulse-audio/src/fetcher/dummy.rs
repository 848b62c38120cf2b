use cpal::SampleRate;

use crate::DEFAULT_SAMPLE_RATE;

use super::Fetcher;

/// A dummy fetcher which only "records" silence.
/// Mainly used for docs and tests.
pub struct DummyFetcher;

impl DummyFetcher {
    /// Creates a new instance of this struct.
    pub fn new() -> Box<Self> {
        Box::new(Self)
    }
}

impl Fetcher for DummyFetcher {
    /// Fills the given buffer with zeros.
    fn fetch_samples(&mut self, buf: &mut [f32]) {
        buf.fill(0.);
    }

    fn sample_rate(&self) -> SampleRate {
        DEFAULT_SAMPLE_RATE
    }
}
