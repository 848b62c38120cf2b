//! Module to configure the behaviour of [crate::AudioAnalyser].
use std::num::NonZeroUsize;

use crate::{AMOUNT_BANDS, BAND_SCALE, SPECTRUM_LEN};

/// All validation errors which can occur while building an [AnalyzerConfig] or a
/// [crate::BandPartition].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Occurs, if the spectrum is too short to give every band its geometric share.
    ///
    /// # Example
    /// ```rust
    /// use bandpulse_audio::config::{AnalyzerConfig, ConfigError};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = AnalyzerConfig {
    ///     // 8 bands need at least 2 + 4 + ... + 256 = 510 samples
    ///     spectrum_len: NonZeroUsize::new(256).unwrap(),
    ///     ..Default::default()
    /// };
    ///
    /// assert!(matches!(
    ///     config.validate(),
    ///     Err(ConfigError::PartitionTooSmall { .. })
    /// ));
    /// ```
    #[error("{amount_bands} bands need at least {required} spectrum samples but only {spectrum_len} are available")]
    PartitionTooSmall {
        spectrum_len: usize,
        amount_bands: usize,
        required: usize,
    },

    /// The geometric sample counts of the requested bands don't fit into a `usize`.
    #[error("Can't create {0} geometrically growing bands")]
    TooManyBands(usize),

    /// The scale factor of the band values has to be finite and non-negative.
    #[error("The band scale has to be finite and non-negative but you gave: {0}")]
    InvalidScale(f32),

    /// A partition needs at least one band.
    #[error("A band partition needs at least one band")]
    EmptyPartition,
}

/// The window which is applied to the samples before they are transformed into a spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowFunction {
    /// Strong side lobe suppression (recommended).
    #[default]
    Blackman,
    Hanning,
    Hamming,
    Nuttall,
    /// No windowing at all.
    Rectangular,
}

impl WindowFunction {
    /// Returns the `len` coefficients of the window.
    pub fn coefficients(&self, len: usize) -> Box<[f32]> {
        let to_f32 = |val: f64| val as f32;

        match self {
            Self::Blackman => apodize::blackman_iter(len).map(to_f32).collect(),
            Self::Hanning => apodize::hanning_iter(len).map(to_f32).collect(),
            Self::Hamming => apodize::hamming_iter(len).map(to_f32).collect(),
            Self::Nuttall => apodize::nuttall_iter(len).map(to_f32).collect(),
            Self::Rectangular => vec![1.; len].into_boxed_slice(),
        }
    }
}

/// Configure the behaviour of [crate::AudioAnalyser] by setting the appropriate values in this struct.
///
/// # Example
/// ```rust
/// use bandpulse_audio::{config::{AnalyzerConfig, WindowFunction}, fetcher::DummyFetcher, AudioAnalyser};
///
/// let analyser = AudioAnalyser::new(
///     DummyFetcher::new(),
///     AnalyzerConfig {
///         window: WindowFunction::Hanning,
///         ..Default::default()
///     },
/// )
/// .unwrap();
///
/// assert_eq!(analyser.config().window, WindowFunction::Hanning);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalyzerConfig {
    /// The amount of magnitudes in each spectrum snapshot.
    ///
    /// The FFT will be twice as large.
    pub spectrum_len: NonZeroUsize,

    /// Set the amount of bands the spectrum should be reduced to.
    pub amount_bands: NonZeroUsize,

    /// Every band value is multiplied with this factor to bring it into a visually useful range.
    pub scale: f32,

    /// The window which is applied before the FFT.
    pub window: WindowFunction,
}

impl AnalyzerConfig {
    /// Checks if the current config is valid or contains any mistakes.
    ///
    /// See [`ConfigError`] to see all possible errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || self.scale < 0. {
            return Err(ConfigError::InvalidScale(self.scale));
        }

        crate::BandPartition::geometric(self.spectrum_len.get(), self.amount_bands.get())?;
        Ok(())
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            spectrum_len: NonZeroUsize::new(SPECTRUM_LEN).unwrap(),
            amount_bands: NonZeroUsize::new(AMOUNT_BANDS).unwrap(),
            scale: BAND_SCALE,
            window: WindowFunction::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(AnalyzerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn negative_scale() {
        let config = AnalyzerConfig {
            scale: -1.,
            ..Default::default()
        };

        assert_eq!(config.validate(), Err(ConfigError::InvalidScale(-1.)));
    }

    #[test]
    fn nan_scale() {
        let config = AnalyzerConfig {
            scale: f32::NAN,
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScale(_))
        ));
    }

    #[test]
    fn window_lengths() {
        for window in [
            WindowFunction::Blackman,
            WindowFunction::Hanning,
            WindowFunction::Hamming,
            WindowFunction::Nuttall,
            WindowFunction::Rectangular,
        ] {
            assert_eq!(window.coefficients(1024).len(), 1024, "{:?}", window);
        }
    }

    #[test]
    fn blackman_tapers_to_the_edges() {
        let coefficients = WindowFunction::Blackman.coefficients(1024);

        assert!(coefficients[0].abs() < 1e-3);
        assert!(coefficients[512] > 0.99);
    }
}
