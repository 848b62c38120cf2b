use tracing::{debug, instrument};

use crate::{
    config::AnalyzerConfig,
    fetcher::Fetcher,
    publish::{AnalysisPublisher, AnalysisReader},
    AnalysisResult, BandPartition, Error, SpectrumCapture, SpectrumReducer,
};

/// Drives the whole pipeline once per frame: capture a spectrum, reduce it and publish the result.
pub struct AudioAnalyser {
    capture: SpectrumCapture,
    reducer: SpectrumReducer,

    latest: AnalysisResult,
    publisher: AnalysisPublisher,
    reader: AnalysisReader,

    config: AnalyzerConfig,
}

impl AudioAnalyser {
    /// Creates a new instance which fetches its audio from the given fetcher.
    #[instrument(name = "AudioAnalyser::new", skip(fetcher))]
    pub fn new(fetcher: Box<dyn Fetcher>, config: AnalyzerConfig) -> Result<Self, Error> {
        config.validate()?;

        let partition =
            BandPartition::geometric(config.spectrum_len.get(), config.amount_bands.get())?;
        let reducer = SpectrumReducer::new(partition, config.scale)?;
        let capture = SpectrumCapture::new(fetcher, config.spectrum_len, config.window);

        let latest = AnalysisResult {
            bands: crate::BandValues::zeroed(config.amount_bands.get()),
            amplitude: 0.,
        };
        let (publisher, reader) = AnalysisPublisher::new(&latest);

        debug!("Analyser ready");

        Ok(Self {
            capture,
            reducer,
            latest,
            publisher,
            reader,
            config,
        })
    }

    /// Processes the next frame.
    ///
    /// If anything fails, the result of the previous frame stays the latest (and published) one.
    pub fn on_tick(&mut self) -> Result<&AnalysisResult, Error> {
        let spectrum = self.capture.capture()?;
        let result = self.reducer.reduce(spectrum)?;

        self.publisher.publish(result.clone());
        self.latest = result;

        Ok(&self.latest)
    }

    /// The result of the latest successful frame.
    pub fn latest(&self) -> &AnalysisResult {
        &self.latest
    }

    /// Returns a reader of the published results, for consumers which don't hold the analyser.
    pub fn reader(&self) -> AnalysisReader {
        self.reader.clone()
    }

    /// Returns its config.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn reducer(&self) -> &SpectrumReducer {
        &self.reducer
    }

    pub fn capture(&self) -> &SpectrumCapture {
        &self.capture
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use cpal::SampleRate;

    use super::*;
    use crate::{config::ConfigError, fetcher::DummyFetcher, DEFAULT_SAMPLE_RATE};

    struct ConstantFetcher(f32);

    impl Fetcher for ConstantFetcher {
        fn fetch_samples(&mut self, buf: &mut [f32]) {
            buf.fill(self.0);
        }

        fn sample_rate(&self) -> SampleRate {
            DEFAULT_SAMPLE_RATE
        }
    }

    #[test]
    fn silence() {
        let mut analyser = AudioAnalyser::new(DummyFetcher::new(), AnalyzerConfig::default()).unwrap();

        let result = analyser.on_tick().unwrap();
        assert_eq!(result.bands.len(), 8);
        assert_eq!(result.amplitude, 0.);
    }

    #[test]
    fn publishes_every_frame() {
        let mut analyser =
            AudioAnalyser::new(Box::new(ConstantFetcher(0.5)), AnalyzerConfig::default()).unwrap();
        let reader = analyser.reader();

        let latest = analyser.on_tick().unwrap().clone();

        // a constant signal ends up in the lowest bins only
        assert!(latest.bands[0] > 0.);
        assert_eq!(reader.read(), latest);
        assert_eq!(analyser.latest(), &latest);
    }

    #[test]
    fn rejects_invalid_config() {
        let result = AudioAnalyser::new(
            DummyFetcher::new(),
            AnalyzerConfig {
                amount_bands: NonZeroUsize::new(12).unwrap(),
                ..Default::default()
            },
        );

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::PartitionTooSmall { .. }))
        ));
    }

    #[test]
    fn custom_band_amount() {
        let mut analyser = AudioAnalyser::new(
            DummyFetcher::new(),
            AnalyzerConfig {
                amount_bands: NonZeroUsize::new(4).unwrap(),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(analyser.latest().bands.len(), 4);
        assert_eq!(analyser.on_tick().unwrap().bands.len(), 4);
        assert_eq!(analyser.reducer().partition().total_samples(), 512);
    }
}
