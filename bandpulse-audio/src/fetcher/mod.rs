//! Each struct here can be used to fetch the audio data from various sources.
//! Pick the one you need to fetch from.
mod dummy;
mod system_audio;

use cpal::SampleRate;
pub use dummy::DummyFetcher;
pub use system_audio::{default_output_config, SystemAudio as SystemAudioFetcher, SystemAudioError};

/// Interface for all structs (fetchers) which are listed in the [fetcher module](crate::fetcher).
pub trait Fetcher {
    /// **Replaces** the content of `buf` with the latest (mono) samples of the given fetcher.
    ///
    /// The newest sample is the last one in `buf`.
    fn fetch_samples(&mut self, buf: &mut [f32]);

    fn sample_rate(&self) -> SampleRate;
}
