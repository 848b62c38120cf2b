use crate::config::ConfigError;

/// All errors which can occur while turning audio into an [crate::AnalysisResult].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The spectrum snapshot doesn't cover the band partition exactly.
    ///
    /// No band values are computed (or published) in this case.
    #[error("Spectrum has {actual} samples but the band partition covers {expected}")]
    InputLength { expected: usize, actual: usize },

    /// The cumulative sample count of a band was zero when it was about to be used as the divisor.
    #[error("Band {band} would be divided by a cumulative sample count of zero")]
    DivisionByZero { band: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Couldn't transform the samples into a spectrum: {0}")]
    Fft(#[from] realfft::FftError),
}
