use std::{num::NonZeroUsize, sync::Arc};

use cpal::SampleRate;
use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};
use tracing::debug;

use crate::{config::WindowFunction, fetcher::Fetcher, Error};

/// Turns the samples of the fetcher into magnitude spectra for the [crate::SpectrumReducer].
///
/// The FFT is twice as large as the spectrum, only the first half of its bins is used.
pub struct SpectrumCapture {
    fft: Arc<dyn RealToComplex<f32>>,
    window: Box<[f32]>,
    magnitude_factor: f32,

    samples: Box<[f32]>,
    fft_in: Box<[f32]>,
    fft_out: Box<[Complex32]>,
    scratch_buffer: Box<[Complex32]>,

    spectrum: Box<[f32]>,

    fetcher: Box<dyn Fetcher>,
}

impl SpectrumCapture {
    /// Creates a new instance with the given fetcher where the audio samples are fetched from.
    pub fn new(
        fetcher: Box<dyn Fetcher>,
        spectrum_len: NonZeroUsize,
        window: WindowFunction,
    ) -> Self {
        let fft_size = spectrum_len.get() * 2;

        let fft = RealFftPlanner::<f32>::new().plan_fft_forward(fft_size);
        let window = window.coefficients(fft_size);

        // a full scale sine should end up with a magnitude of 1
        let magnitude_factor = {
            let window_sum = window.iter().sum::<f32>();
            if window_sum > 0. {
                2. / window_sum
            } else {
                0.
            }
        };

        debug!(
            "FFT size: {}, freq resolution: {}Hz",
            fft_size,
            fetcher.sample_rate().0 as f32 / fft_size as f32
        );

        let fft_out = fft.make_output_vec().into_boxed_slice();
        let scratch_buffer = fft.make_scratch_vec().into_boxed_slice();

        Self {
            window,
            magnitude_factor,

            samples: vec![0.; fft_size].into_boxed_slice(),
            fft_in: fft.make_input_vec().into_boxed_slice(),
            fft_out,
            scratch_buffer,

            spectrum: vec![0.; spectrum_len.get()].into_boxed_slice(),

            fft,
            fetcher,
        }
    }

    /// Fetches the latest samples and returns their magnitude spectrum.
    ///
    /// The returned slice is overwritten by the next call.
    pub fn capture(&mut self) -> Result<&[f32], Error> {
        self.fetcher.fetch_samples(&mut self.samples);

        for ((fft_in, &sample), &weight) in self
            .fft_in
            .iter_mut()
            .zip(self.samples.iter())
            .zip(self.window.iter())
        {
            *fft_in = sample * weight;
        }

        self.fft.process_with_scratch(
            &mut self.fft_in,
            &mut self.fft_out,
            &mut self.scratch_buffer,
        )?;

        for (magnitude, bin) in self.spectrum.iter_mut().zip(self.fft_out.iter()) {
            *magnitude = bin.norm() * self.magnitude_factor;
        }

        Ok(&self.spectrum)
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.fetcher.sample_rate()
    }

    pub fn spectrum_len(&self) -> usize {
        self.spectrum.len()
    }

    /// The frequency (in Hz) which the given spectrum index represents.
    pub fn frequency_of(&self, index: usize) -> f32 {
        index as f32 * self.sample_rate().0 as f32 / (self.spectrum.len() * 2) as f32
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{fetcher::DummyFetcher, DEFAULT_SAMPLE_RATE};

    /// Always "records" the same sine wave.
    struct SineFetcher {
        frequency: f32,
        amplitude: f32,
    }

    impl Fetcher for SineFetcher {
        fn fetch_samples(&mut self, buf: &mut [f32]) {
            let sample_rate = self.sample_rate().0 as f32;
            for (i, sample) in buf.iter_mut().enumerate() {
                let t = i as f32 / sample_rate;
                *sample = self.amplitude * (2. * std::f32::consts::PI * self.frequency * t).sin();
            }
        }

        fn sample_rate(&self) -> SampleRate {
            DEFAULT_SAMPLE_RATE
        }
    }

    #[test]
    fn silence() {
        let mut capture = SpectrumCapture::new(
            DummyFetcher::new(),
            NonZeroUsize::new(512).unwrap(),
            WindowFunction::Blackman,
        );

        let spectrum = capture.capture().unwrap();
        assert_eq!(spectrum.len(), 512);
        assert!(spectrum.iter().all(|&magnitude| magnitude == 0.));
    }

    #[test]
    fn sine_peaks_at_its_bin() {
        let spectrum_len = 512;
        let bin = 40;

        let frequency = bin as f32 * DEFAULT_SAMPLE_RATE.0 as f32 / (spectrum_len * 2) as f32;
        let mut capture = SpectrumCapture::new(
            Box::new(SineFetcher {
                frequency,
                amplitude: 0.5,
            }),
            NonZeroUsize::new(spectrum_len).unwrap(),
            WindowFunction::Blackman,
        );
        assert_relative_eq!(capture.frequency_of(bin), frequency);

        let spectrum = capture.capture().unwrap();
        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| index)
            .unwrap();

        assert_eq!(peak, bin);
        assert_relative_eq!(spectrum[bin], 0.5, max_relative = 0.05);
        assert!(spectrum.iter().all(|&magnitude| magnitude >= 0.));
    }
}
