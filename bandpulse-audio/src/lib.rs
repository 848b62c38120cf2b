//! # Description
//! A crate which reduces the frequency spectrum of an audio source into a few weighted
//! frequency bands and an amplitude, once per frame, to drive visualisations with them.
//!
//! ### [cpal]
//!
//! This crate also re-exports [cpal] so there's no need to add [cpal] exclusively
//! to your dependency list.
//!
//! # Example
//!
//! ## Simple workflow
//! A simple workflow can look like this:
//! ```
//! use bandpulse_audio::{config::AnalyzerConfig, fetcher::DummyFetcher, AudioAnalyser};
//!
//! let mut analyser = AudioAnalyser::new(DummyFetcher::new(), AnalyzerConfig::default()).unwrap();
//!
//! loop {
//!     // capture the spectrum of the latest samples and reduce it
//!     let analysis = analyser.on_tick().unwrap();
//!
//!     // index 0 are the bass, index 7 the treble
//!     assert_eq!(analysis.bands.len(), 8);
//!     assert_eq!(analysis.amplitude, 0.);
//!
//!     break;
//! }
//! ```
//!
//! ## Reducing your own spectrum
//! If you already have a spectrum, you can use the [SpectrumReducer] on its own.
//!
//! ```
//! use bandpulse_audio::SpectrumReducer;
//!
//! let reducer = SpectrumReducer::default();
//!
//! // has to have exactly 512 samples
//! assert!(reducer.reduce(&[0.; 511]).is_err());
//!
//! let analysis = reducer.reduce(&[0.; 512]).unwrap();
//! assert!(analysis.bands.iter().all(|&value| value == 0.));
//! ```
//!
//! ## Consumers
//! Consumers read the result of each frame, either directly or through an [AnalysisReader].
//!
//! ```
//! use bandpulse_audio::{
//!     config::AnalyzerConfig, fetcher::DummyFetcher, nalgebra::Vector3,
//!     visual::{AnalysisConsumer, VisualConfig, VisualMapper},
//!     AudioAnalyser, FrameClock,
//! };
//!
//! let mut analyser = AudioAnalyser::new(DummyFetcher::new(), AnalyzerConfig::default()).unwrap();
//! let reader = analyser.reader();
//!
//! let mut clock = FrameClock::new();
//! let mut bass = VisualMapper::new(VisualConfig::default(), Vector3::zeros());
//! let mut treble = VisualMapper::new(
//!     VisualConfig {
//!         react_to_low_band: false,
//!         ..Default::default()
//!     },
//!     Vector3::new(2., 0., 0.),
//! );
//!
//! analyser.on_tick().unwrap();
//!
//! let time = clock.tick();
//! let analysis = reader.read();
//! let bass_presentation = bass.on_tick(&analysis, time);
//! let treble_presentation = treble.on_tick(&analysis, time);
//!
//! assert_eq!(bass_presentation.position, Vector3::zeros());
//! assert_eq!(treble_presentation.position, Vector3::new(2., 0., 0.));
//! ```
pub mod config;
pub mod fetcher;
pub mod visual;

mod analyser;
mod analysis;
mod error;
mod frame_clock;
mod partition;
mod publish;
mod reducer;
mod spectrum;

pub use analyser::AudioAnalyser;
pub use analysis::{AnalysisResult, BandSelector, BandValues};
pub use cpal;
pub use error::Error;
pub use frame_clock::{FrameClock, FrameTime};
pub use nalgebra;
pub use partition::{BandPartition, BandRange};
pub use publish::{AnalysisPublisher, AnalysisReader};
pub use reducer::{compute_amplitude, SpectrumReducer};
pub use spectrum::SpectrumCapture;

use cpal::SampleRate;

/// The default amount of magnitudes per spectrum snapshot.
pub const SPECTRUM_LEN: usize = 512;

/// The default amount of bands.
pub const AMOUNT_BANDS: usize = 8;

/// The default factor every band value is multiplied with.
pub const BAND_SCALE: f32 = 10.;

/// The default sample rate for a fetcher.
/// Fetchers are allowed to use this for orientation.
pub const DEFAULT_SAMPLE_RATE: SampleRate = SampleRate(44_100);
