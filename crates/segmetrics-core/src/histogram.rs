//! Intensity histogram and Otsu threshold selection.

use crate::PixelBufferView;
use serde::{Deserialize, Serialize};

pub const HISTOGRAM_BINS: usize = 256;

/// 256-bin intensity histogram of one buffer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    #[serde(with = "bins")]
    counts: [u64; HISTOGRAM_BINS],
}

impl Histogram {
    /// Histogram from raw bin counts.
    pub fn from_counts(counts: [u64; HISTOGRAM_BINS]) -> Self {
        Self { counts }
    }

    /// Tally every pixel of `view`.
    pub fn from_view(view: &PixelBufferView<'_>) -> Self {
        let mut counts = [0u64; HISTOGRAM_BINS];
        for &v in view.data() {
            counts[v as usize] += 1;
        }
        Self { counts }
    }

    #[inline]
    pub fn counts(&self) -> &[u64; HISTOGRAM_BINS] {
        &self.counts
    }

    #[inline]
    pub fn count(&self, value: u8) -> u64 {
        self.counts[value as usize]
    }

    /// Number of tallied pixels.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Mean intensity, `None` for an empty histogram.
    pub fn mean(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(intensity_sum(&self.counts) / total as f64)
    }
}

fn intensity_sum(counts: &[u64; HISTOGRAM_BINS]) -> f64 {
    counts
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum()
}

/// Otsu's global threshold: the intensity `t` maximizing the between-class
/// variance `wB * wF * (meanB - meanF)^2`, where the background class holds
/// intensities `<= t`.
///
/// Candidates are scanned in ascending order with a strict `>` comparison,
/// so ties resolve to the lowest threshold. A histogram that admits no split
/// (empty, or a single occupied bin) yields `0`.
pub fn otsu_threshold(hist: &Histogram) -> u8 {
    let total = hist.total() as f64;
    let sum_total = intensity_sum(&hist.counts);

    let mut w_b = 0f64;
    let mut sum_b = 0f64;
    let mut best_var = 0f64;
    let mut best_t = 0u8;

    for (t, &h) in hist.counts.iter().enumerate() {
        w_b += h as f64;
        sum_b += t as f64 * h as f64;
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f < 1.0 {
            break;
        }

        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;
        let diff = m_b - m_f;
        let var_between = w_b * w_f * diff * diff;
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    best_t
}

// serde only derives arrays up to 32 elements.
mod bins {
    use super::HISTOGRAM_BINS;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        counts: &[u64; HISTOGRAM_BINS],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(counts.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u64; HISTOGRAM_BINS], D::Error> {
        let v = Vec::<u64>::deserialize(deserializer)?;
        let len = v.len();
        v.try_into()
            .map_err(|_| D::Error::invalid_length(len, &"256 histogram bins"))
    }
}
