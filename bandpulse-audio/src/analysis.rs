use std::ops::Deref;

use crate::AMOUNT_BANDS;

/// Selects which band a consumer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BandSelector {
    /// The first band (bass).
    Low,
    /// The last band (treble).
    High,
}

/// One value per band. Index `0` is the lowest frequency band (bass).
#[derive(Debug, Clone, PartialEq)]
pub struct BandValues(Box<[f32]>);

impl BandValues {
    pub(crate) fn new(values: Box<[f32]>) -> Self {
        Self(values)
    }

    /// Creates `amount` bands which are all zero.
    pub fn zeroed(amount: usize) -> Self {
        Self(vec![0.; amount].into_boxed_slice())
    }

    /// The value of the band of the given selector (`0.` if there are no bands).
    pub fn get_selected(&self, selector: BandSelector) -> f32 {
        let value = match selector {
            BandSelector::Low => self.0.first(),
            BandSelector::High => self.0.last(),
        };

        value.copied().unwrap_or(0.)
    }
}

impl Default for BandValues {
    fn default() -> Self {
        Self::zeroed(AMOUNT_BANDS)
    }
}

impl Deref for BandValues {
    type Target = [f32];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Everything a consumer gets to see of one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisResult {
    pub bands: BandValues,

    /// The arithmetic mean of [`AnalysisResult::bands`].
    pub amplitude: f32,
}
