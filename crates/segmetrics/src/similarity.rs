use crate::confusion::{ratio_or_one, ConfusionCounts};
use serde::{Deserialize, Serialize};

/// Overlap scores derived from confusion counts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScores {
    /// `TP / (TP + FP + FN)`; `1.0` when both masks are empty.
    pub iou: f64,
    /// `2TP / (2TP + FP + FN)`; `1.0` when both masks are empty.
    pub dice: f64,
    /// `(FP + FN) / total`.
    pub misclassification_error: f64,
}

impl SimilarityScores {
    pub fn from_counts(counts: &ConfusionCounts) -> Self {
        let tp = counts.true_positive;
        let disagree = counts.disagreements();
        let total = counts.total();

        let misclassification_error = if total == 0 {
            0.0
        } else {
            disagree as f64 / total as f64
        };

        Self {
            iou: ratio_or_one(tp, tp + disagree),
            dice: ratio_or_one(2 * tp, 2 * tp + disagree),
            misclassification_error,
        }
    }
}
