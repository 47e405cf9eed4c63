//! Adaptive reference mask: Otsu threshold applied to the original image.

use log::{debug, warn};
use segmetrics_core::{otsu_threshold, Histogram, PixelBuffer, PixelBufferView};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

pub const MASK_FOREGROUND: u8 = 255;
pub const MASK_BACKGROUND: u8 = 0;

/// Binary label of a mask value.
#[inline]
pub fn is_foreground(value: u8, mask_threshold: u8) -> bool {
    value > mask_threshold
}

/// Map every pixel to `255` if it is `> threshold`, else `0`.
pub fn binarize(view: &PixelBufferView<'_>, threshold: u8) -> PixelBuffer {
    view.map(|v| {
        if v > threshold {
            MASK_FOREGROUND
        } else {
            MASK_BACKGROUND
        }
    })
}

/// Reference mask synthesized from the original image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceMask {
    /// Binary mask with values in `{0, 255}`.
    pub mask: PixelBuffer,
    /// Otsu threshold used to produce `mask`.
    pub threshold: u8,
}

/// Diagnostics of the reference pass, kept in the metrics report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceStats {
    pub threshold: u8,
    pub foreground_pixels: u64,
}

impl ReferenceMask {
    pub fn stats(&self) -> ReferenceStats {
        ReferenceStats {
            threshold: self.threshold,
            foreground_pixels: self
                .mask
                .data()
                .iter()
                .filter(|&&v| v == MASK_FOREGROUND)
                .count() as u64,
        }
    }
}

/// Build a reference mask for `original` when no external ground truth exists.
///
/// Deterministic: the same buffer always yields the same mask.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(original),
        fields(width = original.width(), height = original.height())
    )
)]
pub fn adaptive_reference(original: &PixelBufferView<'_>) -> ReferenceMask {
    let hist = Histogram::from_view(original);
    let threshold = otsu_threshold(&hist);
    if threshold == 0 && hist.counts().iter().filter(|&&c| c > 0).count() < 2 {
        warn!("otsu: no valid split for a uniform image, using threshold 0");
    }
    debug!("otsu threshold {threshold} over {} pixels", hist.total());

    ReferenceMask {
        mask: binarize(original, threshold),
        threshold,
    }
}
