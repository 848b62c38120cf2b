use tracing::debug;

use crate::{config::ConfigError, AnalysisResult, BandPartition, BandValues, Error, BAND_SCALE};

/// Reduces a magnitude spectrum into band values and an amplitude.
///
/// Each sample is weighted with its 1-based index within the whole spectrum, so higher
/// frequencies of a band count more. The weighted sum of a band is divided by the amount of
/// samples consumed *so far* (all previous bands included), not by the size of the band itself.
///
/// # Example
/// ```rust
/// use bandpulse_audio::SpectrumReducer;
///
/// let reducer = SpectrumReducer::default();
/// let result = reducer.reduce(&[1.; 512]).unwrap();
///
/// assert_eq!(result.bands[0], 15.);
/// assert_eq!(result.bands[1], 30.);
/// ```
#[derive(Debug, Clone)]
pub struct SpectrumReducer {
    partition: BandPartition,
    scale: f32,
}

impl SpectrumReducer {
    /// Creates a reducer which multiplies every band value with `scale`.
    pub fn new(partition: BandPartition, scale: f32) -> Result<Self, ConfigError> {
        if !scale.is_finite() || scale < 0. {
            return Err(ConfigError::InvalidScale(scale));
        }

        debug!(
            "Reducer: {} bands over {} samples, scale {}",
            partition.amount_bands(),
            partition.total_samples(),
            scale
        );

        Ok(Self { partition, scale })
    }

    /// Computes the value of each band of the given spectrum.
    ///
    /// Fails with [Error::InputLength] if `spectrum` doesn't have exactly
    /// [BandPartition::total_samples] samples.
    pub fn reduce_to_bands(&self, spectrum: &[f32]) -> Result<BandValues, Error> {
        let expected = self.partition.total_samples();
        if spectrum.len() != expected {
            return Err(Error::InputLength {
                expected,
                actual: spectrum.len(),
            });
        }

        let mut values = Vec::with_capacity(self.partition.amount_bands());
        let mut consumed: usize = 0;

        for (band, range) in self.partition.iter().enumerate() {
            let mut average = 0.;
            for index in range.indices() {
                average += spectrum[index] * (index + 1) as f32;
            }

            consumed += range.count;
            if consumed == 0 {
                return Err(Error::DivisionByZero { band });
            }

            average /= consumed as f32;

            let value = average * self.scale;
            debug_assert!(!value.is_nan());
            values.push(value);
        }

        Ok(BandValues::new(values.into_boxed_slice()))
    }

    /// Reduces the spectrum and computes the amplitude of the resulting bands.
    ///
    /// Either both are computed or an error is returned.
    pub fn reduce(&self, spectrum: &[f32]) -> Result<AnalysisResult, Error> {
        let bands = self.reduce_to_bands(spectrum)?;
        let amplitude = compute_amplitude(&bands);

        Ok(AnalysisResult { bands, amplitude })
    }

    pub fn partition(&self) -> &BandPartition {
        &self.partition
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Default for SpectrumReducer {
    fn default() -> Self {
        Self {
            partition: BandPartition::default(),
            scale: BAND_SCALE,
        }
    }
}

/// The arithmetic mean of the given band values (`0.` for no bands).
pub fn compute_amplitude(bands: &[f32]) -> f32 {
    if bands.is_empty() {
        return 0.;
    }

    bands.iter().sum::<f32>() / bands.len() as f32
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::Rng;

    use super::*;
    use crate::{AMOUNT_BANDS, SPECTRUM_LEN};

    fn random_spectrum() -> Vec<f32> {
        let mut rng = rand::rng();
        (0..SPECTRUM_LEN).map(|_| rng.random::<f32>()).collect()
    }

    #[test]
    fn ones() {
        let reducer = SpectrumReducer::default();
        let bands = reducer.reduce_to_bands(&[1.; SPECTRUM_LEN]).unwrap();

        assert_eq!(bands.len(), AMOUNT_BANDS);
        assert_relative_eq!(bands[0], 15.);
        assert_relative_eq!(bands[1], 30.);

        // sum of the weights (start + 1)..=(start + count), divided by the consumed samples
        let mut consumed = 0;
        for (range, &value) in reducer.partition().iter().zip(bands.iter()) {
            let weights = (range.start + 1..=range.start + range.count).sum::<usize>();
            consumed += range.count;

            let expected = weights as f32 / consumed as f32 * 10.;
            assert_relative_eq!(value, expected, max_relative = 1e-6);
        }
    }

    #[test]
    fn zeros() {
        let result = SpectrumReducer::default()
            .reduce(&[0.; SPECTRUM_LEN])
            .unwrap();

        assert!(result.bands.iter().all(|&value| value == 0.));
        assert_eq!(result.amplitude, 0.);
    }

    #[test]
    fn one_sample_too_short() {
        let err = SpectrumReducer::default()
            .reduce(&[1.; SPECTRUM_LEN - 1])
            .unwrap_err();

        assert!(matches!(
            err,
            Error::InputLength {
                expected: SPECTRUM_LEN,
                actual: 511
            }
        ));
    }

    #[test]
    fn one_sample_too_long() {
        let err = SpectrumReducer::default()
            .reduce_to_bands(&[1.; SPECTRUM_LEN + 1])
            .unwrap_err();

        assert!(matches!(err, Error::InputLength { actual: 513, .. }));
    }

    #[test]
    fn random_input_stays_non_negative_and_finite() {
        let reducer = SpectrumReducer::default();

        for _ in 0..100 {
            let bands = reducer.reduce_to_bands(&random_spectrum()).unwrap();

            assert_eq!(bands.len(), AMOUNT_BANDS);
            for &value in bands.iter() {
                assert!(value >= 0.);
                assert!(value.is_finite());
            }
        }
    }

    #[test]
    fn scaling_input_scales_output() {
        let reducer = SpectrumReducer::default();
        let spectrum = random_spectrum();
        let bands = reducer.reduce_to_bands(&spectrum).unwrap();

        for factor in [0., 0.5, 3., 42.] {
            let scaled: Vec<f32> = spectrum.iter().map(|&sample| sample * factor).collect();
            let scaled_bands = reducer.reduce_to_bands(&scaled).unwrap();

            for (&value, &scaled_value) in bands.iter().zip(scaled_bands.iter()) {
                assert_relative_eq!(
                    scaled_value,
                    value * factor,
                    epsilon = 1e-4,
                    max_relative = 1e-4
                );
            }
        }
    }

    #[test]
    fn amplitude_is_mean() {
        let result = SpectrumReducer::default()
            .reduce(&random_spectrum())
            .unwrap();

        let sum = result.bands.iter().sum::<f32>();
        assert_relative_eq!(result.amplitude, sum / 8., epsilon = 1e-6);
    }

    #[test]
    fn amplitude_of_given_bands() {
        assert_eq!(compute_amplitude(&[0., 1., 2., 3., 4., 5., 6., 7.]), 3.5);
        assert_eq!(compute_amplitude(&[]), 0.);
    }

    #[test]
    fn leading_empty_band() {
        let partition = BandPartition::from_counts([0, 4]).unwrap();
        let reducer = SpectrumReducer::new(partition, 10.).unwrap();

        let err = reducer.reduce(&[1.; 4]).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero { band: 0 }));
    }

    #[test]
    fn empty_band_after_filled_band() {
        let partition = BandPartition::from_counts([2, 0]).unwrap();
        let reducer = SpectrumReducer::new(partition, 1.).unwrap();

        let bands = reducer.reduce_to_bands(&[1., 1.]).unwrap();
        assert_eq!(&*bands, &[1.5, 0.]);
    }

    #[test]
    fn invalid_scale() {
        assert!(SpectrumReducer::new(BandPartition::default(), f32::INFINITY).is_err());
    }
}
