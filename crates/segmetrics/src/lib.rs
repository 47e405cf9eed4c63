//! Quality metrics for binarized segmentation results.
//!
//! Given the original grayscale image and a candidate binary mask produced by
//! some thresholding algorithm, the engine scores the candidate against a
//! reference mask obtained by Otsu thresholding of the original:
//!
//! - overlap: IoU, Dice coefficient, misclassification error,
//! - region uniformity of the original's intensities under the candidate's partition,
//! - boundary accuracy: how many Sobel edges of the original the candidate preserves,
//! - symmetric Hausdorff distance to an external ground-truth mask, when one is given.
//!
//! Masks are binarized with `value > 127` (configurable). Inputs are borrowed
//! read-only; the engine keeps no state between calls.
//!
//! ## Quickstart
//!
//! ```
//! use segmetrics::{MetricsEngine, MetricsConfig};
//! use segmetrics::core::PixelBuffer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let original = PixelBuffer::from_fn(16, 16, |x, _| if x < 8 { 40 } else { 200 })?;
//! let candidate = PixelBuffer::from_fn(16, 16, |x, _| if x < 8 { 0 } else { 255 })?;
//!
//! let engine = MetricsEngine::new(MetricsConfig::default());
//! let metrics = engine.compute(&original.view(), &candidate.view(), None)?;
//! assert_eq!(metrics.iou, 1.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - [`MetricsEngine`] / [`compute`]: the facade.
//! - [`reference`]: adaptive reference mask (Otsu).
//! - [`confusion`], [`similarity`]: confusion counts and overlap scores.
//! - [`uniformity`]: region uniformity.
//! - [`boundary`]: Sobel edge preservation and mask perimeters.
//! - [`hausdorff`]: symmetric Hausdorff distance.
//! - `image_io` (feature `image`): `image::GrayImage` interop.

pub mod boundary;
pub mod confusion;
pub mod hausdorff;
pub mod reference;
pub mod similarity;
pub mod uniformity;

mod config;
mod error;
mod metrics;

#[cfg(feature = "image")]
pub mod image_io;

pub use boundary::{BoundaryPointSet, EdgeStats};
pub use config::{GroundTruthPolicy, HausdorffMethod, MetricsConfig};
pub use confusion::ConfusionCounts;
pub use error::{ConfigIoError, InputRole, MetricsError};
pub use metrics::{
    compute, HausdorffStats, MetricsEngine, SegmentationMetrics, SegmentationReport,
};
pub use reference::{ReferenceMask, ReferenceStats};
pub use similarity::SimilarityScores;
pub use uniformity::{RegionStats, RegionUniformity};

pub use segmetrics_core as core;
