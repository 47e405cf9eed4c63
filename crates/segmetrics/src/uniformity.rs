//! Region uniformity: intra-class intensity homogeneity of the original image
//! under the candidate's foreground/background partition.

use crate::reference::is_foreground;
use segmetrics_core::PixelBufferView;
use serde::{Deserialize, Serialize};

/// Intensity statistics of one partition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    pub count: u64,
    pub mean: f64,
    /// Sample variance (Bessel-corrected); `0` for fewer than two pixels.
    pub variance: f64,
}

#[derive(Default)]
struct Moments {
    n: u64,
    sum: u64,
    sum_sq: u64,
}

impl Moments {
    #[inline]
    fn push(&mut self, v: u8) {
        let v = v as u64;
        self.n += 1;
        self.sum += v;
        self.sum_sq += v * v;
    }

    fn stats(&self) -> RegionStats {
        if self.n == 0 {
            return RegionStats::default();
        }
        let n = self.n as f64;
        let mean = self.sum as f64 / n;
        let variance = if self.n > 1 {
            ((self.sum_sq as f64 - n * mean * mean) / (n - 1.0)).max(0.0)
        } else {
            0.0
        };
        RegionStats {
            count: self.n,
            mean,
            variance,
        }
    }
}

/// Output of the uniformity pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionUniformity {
    pub foreground: RegionStats,
    pub background: RegionStats,
    /// Pixel-count-weighted mean of the two partition variances.
    pub weighted_variance: f64,
    /// `1 / (1 + weighted_variance / 255)`, in `(0, 1]`.
    pub score: f64,
}

pub fn region_uniformity(
    original: &PixelBufferView<'_>,
    candidate: &PixelBufferView<'_>,
    mask_threshold: u8,
) -> RegionUniformity {
    debug_assert!(original.same_dims(candidate));
    let mut fg = Moments::default();
    let mut bg = Moments::default();
    for (&o, &m) in original.data().iter().zip(candidate.data()) {
        if is_foreground(m, mask_threshold) {
            fg.push(o);
        } else {
            bg.push(o);
        }
    }

    let foreground = fg.stats();
    let background = bg.stats();
    let total = foreground.count + background.count;
    let weighted_variance = if total == 0 {
        0.0
    } else {
        (foreground.count as f64 * foreground.variance
            + background.count as f64 * background.variance)
            / total as f64
    };

    RegionUniformity {
        foreground,
        background,
        weighted_variance,
        score: 1.0 / (1.0 + weighted_variance / 255.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use segmetrics_core::PixelBuffer;

    #[test]
    fn constant_image_is_perfectly_uniform() {
        let original = PixelBuffer::filled(10, 10, 100).expect("buf");
        let mask = PixelBuffer::filled(10, 10, 255).expect("mask");
        let u = region_uniformity(&original.view(), &mask.view(), 127);
        assert_eq!(u.score, 1.0);
        assert_eq!(u.foreground.count, 100);
        assert_eq!(u.background.count, 0);
        assert_eq!(u.foreground.mean, 100.0);
    }

    #[test]
    fn mask_aligned_with_intensities_is_uniform() {
        let original = PixelBuffer::from_fn(8, 8, |x, _| if x < 4 { 20 } else { 220 }).expect("o");
        let mask = PixelBuffer::from_fn(8, 8, |x, _| if x < 4 { 0 } else { 255 }).expect("m");
        let u = region_uniformity(&original.view(), &mask.view(), 127);
        assert_eq!(u.weighted_variance, 0.0);
        assert_eq!(u.score, 1.0);
        assert_eq!(u.background.mean, 20.0);
        assert_eq!(u.foreground.mean, 220.0);
    }

    #[test]
    fn bessel_corrected_variance() {
        // Foreground {0, 10}, background {10, 20, 30}.
        let original = PixelBuffer::new(5, 1, vec![0, 10, 10, 20, 30]).expect("o");
        let mask = PixelBuffer::new(5, 1, vec![255, 255, 0, 0, 0]).expect("m");
        let u = region_uniformity(&original.view(), &mask.view(), 127);

        assert_relative_eq!(u.foreground.variance, 50.0);
        assert_relative_eq!(u.background.variance, 100.0);
        let weighted = (2.0 * 50.0 + 3.0 * 100.0) / 5.0;
        assert_relative_eq!(u.weighted_variance, weighted);
        assert_relative_eq!(u.score, 1.0 / (1.0 + weighted / 255.0));
    }

    #[test]
    fn single_pixel_partition_has_zero_variance() {
        let original = PixelBuffer::new(3, 1, vec![255, 0, 0]).expect("o");
        let mask = PixelBuffer::new(3, 1, vec![255, 0, 0]).expect("m");
        let u = region_uniformity(&original.view(), &mask.view(), 127);
        assert_eq!(u.foreground.count, 1);
        assert_eq!(u.foreground.variance, 0.0);
        assert_eq!(u.score, 1.0);
    }

    #[test]
    fn mismatched_partition_lowers_score() {
        let original = PixelBuffer::from_fn(8, 8, |x, _| if x < 4 { 20 } else { 220 }).expect("o");
        let mask = PixelBuffer::filled(8, 8, 0).expect("m");
        let u = region_uniformity(&original.view(), &mask.view(), 127);
        assert!(u.score > 0.0 && u.score < 1.0);
    }
}
