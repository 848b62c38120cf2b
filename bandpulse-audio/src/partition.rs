use std::ops::Range;

use tracing::debug;

use crate::{config::ConfigError, AMOUNT_BANDS, SPECTRUM_LEN};

/// The samples of one band: `count` samples starting at the index `start` of the spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BandRange {
    pub start: usize,
    pub count: usize,
}

impl BandRange {
    /// The indices of the spectrum which belong to this band.
    pub fn indices(&self) -> Range<usize> {
        self.start..self.start + self.count
    }
}

/// Describes how the samples of a spectrum are grouped into bands.
///
/// The bands are contiguous and don't overlap. Band `0` holds the lowest frequencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandPartition {
    bands: Box<[BandRange]>,
}

impl BandPartition {
    /// Creates a partition where band `i` covers `2^i * 2` samples.
    /// The last band additionally covers the remaining samples so that the whole spectrum is used.
    ///
    /// # Example
    /// ```rust
    /// use bandpulse_audio::BandPartition;
    ///
    /// let partition = BandPartition::geometric(512, 8).unwrap();
    /// let counts: Vec<usize> = partition.iter().map(|band| band.count).collect();
    ///
    /// assert_eq!(counts, [2, 4, 8, 16, 32, 64, 128, 258]);
    /// ```
    pub fn geometric(spectrum_len: usize, amount_bands: usize) -> Result<Self, ConfigError> {
        if amount_bands == 0 {
            return Err(ConfigError::EmptyPartition);
        }

        // 2 + 4 + ... + 2^amount_bands = 2^(amount_bands + 1) - 2
        let required = amount_bands
            .checked_add(1)
            .and_then(|exp| u32::try_from(exp).ok())
            .and_then(|exp| 1usize.checked_shl(exp))
            .map(|pow| pow - 2)
            .ok_or(ConfigError::TooManyBands(amount_bands))?;

        if spectrum_len < required {
            return Err(ConfigError::PartitionTooSmall {
                spectrum_len,
                amount_bands,
                required,
            });
        }

        let remainder = spectrum_len - required;
        let last = amount_bands - 1;

        let mut bands = Vec::with_capacity(amount_bands);
        let mut start = 0;
        for i in 0..amount_bands {
            let mut count = (1 << i) * 2;
            if i == last {
                count += remainder;
            }

            bands.push(BandRange { start, count });
            start += count;
        }

        let partition = Self {
            bands: bands.into_boxed_slice(),
        };
        debug!("Band partition: {:?}", partition.bands);

        Ok(partition)
    }

    /// Creates a partition out of the given sample counts, starting at index `0`.
    ///
    /// Zero counts are accepted here. Reducing with a partition whose first counts are zero
    /// fails with [crate::Error::DivisionByZero].
    pub fn from_counts(counts: impl IntoIterator<Item = usize>) -> Result<Self, ConfigError> {
        let mut start = 0;
        let bands = counts
            .into_iter()
            .map(|count| {
                let band = BandRange { start, count };
                start += count;
                band
            })
            .collect::<Box<[BandRange]>>();

        if bands.is_empty() {
            return Err(ConfigError::EmptyPartition);
        }

        Ok(Self { bands })
    }

    /// The amount of samples the spectrum must have for this partition.
    pub fn total_samples(&self) -> usize {
        self.bands.last().map(|band| band.start + band.count).unwrap_or(0)
    }

    pub fn amount_bands(&self) -> usize {
        self.bands.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BandRange> {
        self.bands.iter()
    }
}

impl Default for BandPartition {
    /// The partition for 512 spectrum samples and 8 bands.
    fn default() -> Self {
        let bands = [2, 4, 8, 16, 32, 64, 128, 258];
        debug_assert_eq!(bands.len(), AMOUNT_BANDS);
        debug_assert_eq!(bands.iter().sum::<usize>(), SPECTRUM_LEN);

        let mut start = 0;
        let bands = bands
            .map(|count| {
                let band = BandRange { start, count };
                start += count;
                band
            })
            .into();

        Self { bands }
    }
}

impl<'a> IntoIterator for &'a BandPartition {
    type Item = &'a BandRange;
    type IntoIter = std::slice::Iter<'a, BandRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
