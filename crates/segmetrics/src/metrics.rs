//! Metrics facade: validates inputs and runs every scorer.

use crate::boundary::{boundary_accuracy, extract_boundary, EdgeStats};
use crate::config::{GroundTruthPolicy, MetricsConfig};
use crate::confusion::ConfusionCounts;
use crate::error::{InputRole, MetricsError};
use crate::hausdorff::hausdorff_distance;
use crate::reference::{adaptive_reference, ReferenceStats};
use crate::similarity::SimilarityScores;
use crate::uniformity::{region_uniformity, RegionStats};
use log::debug;
use segmetrics_core::PixelBufferView;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Quality scores of a candidate segmentation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationMetrics {
    pub iou: f64,
    pub dice_coefficient: f64,
    pub misclassification_error: f64,
    pub region_uniformity: f64,
    pub boundary_accuracy: f64,
    /// Symmetric Hausdorff distance in pixels; `0` when no ground truth was used.
    pub hausdorff_distance: f64,
}

/// Perimeter sizes of the two masks compared by the Hausdorff pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HausdorffStats {
    pub candidate_points: usize,
    pub ground_truth_points: usize,
}

/// Metrics together with the intermediate results they were derived from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationReport {
    pub metrics: SegmentationMetrics,
    pub reference: ReferenceStats,
    pub confusion: ConfusionCounts,
    pub foreground: RegionStats,
    pub background: RegionStats,
    pub edges: EdgeStats,
    /// `None` when the Hausdorff pass did not run.
    pub hausdorff: Option<HausdorffStats>,
}

/// Scores candidate segmentations against an adaptively generated reference.
///
/// Holds only configuration, so one engine can serve any number of threads.
#[derive(Clone, Debug, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Score `candidate` (a binarized output) against `original` (the grayscale
    /// input it was derived from).
    ///
    /// The Hausdorff distance is computed only against an external
    /// `ground_truth`; without one it is reported as `0`.
    pub fn compute(
        &self,
        original: &PixelBufferView<'_>,
        candidate: &PixelBufferView<'_>,
        ground_truth: Option<&PixelBufferView<'_>>,
    ) -> Result<SegmentationMetrics, MetricsError> {
        self.compute_report(original, candidate, ground_truth)
            .map(|report| report.metrics)
    }

    /// Same as [`MetricsEngine::compute`], keeping the intermediate results.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip_all,
            fields(
                width = original.width(),
                height = original.height(),
                ground_truth = ground_truth.is_some()
            )
        )
    )]
    pub fn compute_report(
        &self,
        original: &PixelBufferView<'_>,
        candidate: &PixelBufferView<'_>,
        ground_truth: Option<&PixelBufferView<'_>>,
    ) -> Result<SegmentationReport, MetricsError> {
        let ground_truth = self.validate(original, candidate, ground_truth)?;
        let cfg = &self.config;

        let reference = adaptive_reference(original);
        let confusion =
            ConfusionCounts::accumulate(&reference.mask.view(), candidate, cfg.mask_threshold);
        let similarity = SimilarityScores::from_counts(&confusion);
        let uniformity = region_uniformity(original, candidate, cfg.mask_threshold);
        let edges = boundary_accuracy(original, candidate, cfg.edge_threshold, cfg.mask_threshold);

        let (hausdorff_distance, hausdorff) = match ground_truth {
            Some(gt) => {
                let a = extract_boundary(candidate, cfg.mask_threshold);
                let b = extract_boundary(gt, cfg.mask_threshold);
                debug!("boundary points: candidate {}, ground truth {}", a.len(), b.len());
                (
                    hausdorff_distance(&a, &b, cfg.hausdorff),
                    Some(HausdorffStats {
                        candidate_points: a.len(),
                        ground_truth_points: b.len(),
                    }),
                )
            }
            None => (0.0, None),
        };

        let metrics = SegmentationMetrics {
            iou: similarity.iou,
            dice_coefficient: similarity.dice,
            misclassification_error: similarity.misclassification_error,
            region_uniformity: uniformity.score,
            boundary_accuracy: edges.accuracy(),
            hausdorff_distance,
        };
        debug!("{metrics:?}");

        Ok(SegmentationReport {
            metrics,
            reference: reference.stats(),
            confusion,
            foreground: uniformity.foreground,
            background: uniformity.background,
            edges,
            hausdorff,
        })
    }

    /// Check preconditions; returns the ground truth to use for Hausdorff, if any.
    fn validate<'g, 'a>(
        &self,
        original: &PixelBufferView<'_>,
        candidate: &PixelBufferView<'_>,
        ground_truth: Option<&'g PixelBufferView<'a>>,
    ) -> Result<Option<&'g PixelBufferView<'a>>, MetricsError> {
        if original.is_empty() {
            return Err(MetricsError::NullInput {
                role: InputRole::Original,
            });
        }
        if candidate.is_empty() {
            return Err(MetricsError::NullInput {
                role: InputRole::Candidate,
            });
        }
        if !original.same_dims(candidate) {
            return Err(MetricsError::DimensionMismatch {
                role: InputRole::Candidate,
                expected: original.dims(),
                got: candidate.dims(),
            });
        }

        let Some(gt) = ground_truth else {
            return Ok(None);
        };
        if gt.same_dims(candidate) {
            return Ok(Some(gt));
        }
        match self.config.ground_truth {
            GroundTruthPolicy::Skip => {
                debug!(
                    "ground truth {:?} does not match candidate {:?}, skipping Hausdorff",
                    gt.dims(),
                    candidate.dims()
                );
                Ok(None)
            }
            GroundTruthPolicy::Reject if gt.is_empty() => Err(MetricsError::NullInput {
                role: InputRole::GroundTruth,
            }),
            GroundTruthPolicy::Reject => Err(MetricsError::DimensionMismatch {
                role: InputRole::GroundTruth,
                expected: candidate.dims(),
                got: gt.dims(),
            }),
        }
    }
}

/// Run the metrics facade with [`MetricsConfig::default`].
pub fn compute(
    original: &PixelBufferView<'_>,
    candidate: &PixelBufferView<'_>,
    ground_truth: Option<&PixelBufferView<'_>>,
) -> Result<SegmentationMetrics, MetricsError> {
    MetricsEngine::default().compute(original, candidate, ground_truth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HausdorffMethod;
    use approx::assert_relative_eq;
    use segmetrics_core::PixelBuffer;

    fn disk(w: usize, h: usize, cx: f64, cy: f64, r: f64, fg: u8, bg: u8) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| {
            let (dx, dy) = (x as f64 - cx, y as f64 - cy);
            if dx * dx + dy * dy <= r * r {
                fg
            } else {
                bg
            }
        })
        .expect("disk")
    }

    #[test]
    fn report_matches_metrics() {
        let original = disk(32, 32, 16.0, 16.0, 8.0, 210, 30);
        let candidate = disk(32, 32, 17.0, 16.0, 8.0, 255, 0);
        let engine = MetricsEngine::default();

        let report = engine
            .compute_report(&original.view(), &candidate.view(), None)
            .expect("report");
        let metrics = engine
            .compute(&original.view(), &candidate.view(), None)
            .expect("metrics");
        assert_eq!(report.metrics, metrics);
        assert_eq!(report.confusion.total(), 32 * 32);
        assert_eq!(report.foreground.count + report.background.count, 32 * 32);
        assert!(report.hausdorff.is_none());
        assert_eq!(metrics.hausdorff_distance, 0.0);
    }

    #[test]
    fn shifted_candidate_against_ground_truth() {
        let original = disk(40, 40, 20.0, 20.0, 10.0, 200, 20);
        let truth = disk(40, 40, 20.0, 20.0, 10.0, 255, 0);
        let candidate = disk(40, 40, 23.0, 20.0, 10.0, 255, 0);

        let brute = MetricsEngine::new(
            MetricsConfig::default().with_hausdorff(HausdorffMethod::BruteForce),
        );
        let kd = MetricsEngine::default();
        let a = brute
            .compute_report(&original.view(), &candidate.view(), Some(&truth.view()))
            .expect("brute");
        let b = kd
            .compute_report(&original.view(), &candidate.view(), Some(&truth.view()))
            .expect("kd");

        assert_eq!(a, b);
        assert_relative_eq!(a.metrics.hausdorff_distance, 3.0);
        let stats = a.hausdorff.expect("hausdorff ran");
        assert_eq!(stats.candidate_points, stats.ground_truth_points);
        assert!(a.metrics.iou < 1.0);
    }

    #[test]
    fn empty_inputs_are_null() {
        let empty = PixelBuffer::new(0, 0, Vec::new()).expect("empty");
        let img = PixelBuffer::filled(4, 4, 9).expect("img");

        let err = compute(&empty.view(), &img.view(), None).expect_err("original");
        assert_eq!(
            err,
            MetricsError::NullInput {
                role: InputRole::Original
            }
        );
        let err = compute(&img.view(), &empty.view(), None).expect_err("candidate");
        assert_eq!(
            err,
            MetricsError::NullInput {
                role: InputRole::Candidate
            }
        );
        let err = compute(&img.view(), &img.view(), Some(&empty.view())).expect_err("gt");
        assert_eq!(
            err,
            MetricsError::NullInput {
                role: InputRole::GroundTruth
            }
        );
    }

    #[test]
    fn ground_truth_policy() {
        let img = PixelBuffer::filled(10, 10, 50).expect("img");
        let gt = PixelBuffer::filled(8, 8, 255).expect("gt");

        let err = compute(&img.view(), &img.view(), Some(&gt.view())).expect_err("reject");
        assert_eq!(
            err,
            MetricsError::DimensionMismatch {
                role: InputRole::GroundTruth,
                expected: (10, 10),
                got: (8, 8),
            }
        );

        let engine = MetricsEngine::new(
            MetricsConfig::default().with_ground_truth_policy(GroundTruthPolicy::Skip),
        );
        let report = engine
            .compute_report(&img.view(), &img.view(), Some(&gt.view()))
            .expect("skip");
        assert!(report.hausdorff.is_none());
        assert_eq!(report.metrics.hausdorff_distance, 0.0);
    }
}
