//! Pixel-wise confusion counts between a reference mask and a candidate mask.

use crate::reference::is_foreground;
use segmetrics_core::PixelBufferView;
use serde::{Deserialize, Serialize};

/// Confusion counts of a candidate mask against a reference mask.
///
/// "Positive" means foreground. The four counts sum to the pixel count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positive: u64,
    pub false_positive: u64,
    pub false_negative: u64,
    pub true_negative: u64,
}

impl ConfusionCounts {
    /// Classify every pixel pair.
    ///
    /// Both masks must have equal dimensions; the facade checks this.
    pub fn accumulate(
        reference: &PixelBufferView<'_>,
        candidate: &PixelBufferView<'_>,
        mask_threshold: u8,
    ) -> Self {
        debug_assert!(reference.same_dims(candidate));
        let mut counts = Self::default();
        for (&r, &c) in reference.data().iter().zip(candidate.data()) {
            counts.record(
                is_foreground(r, mask_threshold),
                is_foreground(c, mask_threshold),
            );
        }
        counts
    }

    #[inline]
    pub fn record(&mut self, reference_fg: bool, candidate_fg: bool) {
        match (reference_fg, candidate_fg) {
            (true, true) => self.true_positive += 1,
            (false, true) => self.false_positive += 1,
            (true, false) => self.false_negative += 1,
            (false, false) => self.true_negative += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.true_positive + self.false_positive + self.false_negative + self.true_negative
    }

    /// Pixels on which the two masks disagree.
    pub fn disagreements(&self) -> u64 {
        self.false_positive + self.false_negative
    }

    /// `TP / (TP + FP)`, `1.0` when the candidate has no foreground.
    pub fn precision(&self) -> f64 {
        ratio_or_one(self.true_positive, self.true_positive + self.false_positive)
    }

    /// `TP / (TP + FN)`, `1.0` when the reference has no foreground.
    pub fn recall(&self) -> f64 {
        ratio_or_one(self.true_positive, self.true_positive + self.false_negative)
    }

    /// `(TP + TN) / total`, `1.0` for zero pixels.
    pub fn accuracy(&self) -> f64 {
        ratio_or_one(self.true_positive + self.true_negative, self.total())
    }
}

#[inline]
pub(crate) fn ratio_or_one(num: u64, den: u64) -> f64 {
    if den == 0 {
        1.0
    } else {
        num as f64 / den as f64
    }
}
