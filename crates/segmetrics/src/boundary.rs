//! Sobel edge preservation and mask perimeter extraction.
//!
//! Both passes visit interior pixels only (`1 <= x <= w-2`, `1 <= y <= h-2`),
//! so the full 3x3 window is always inside the image. Images narrower or
//! shorter than 3 pixels have no interior.

use crate::reference::is_foreground;
use log::debug;
use nalgebra::Point2;
use segmetrics_core::PixelBufferView;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// 8-neighborhood offsets, row-major, center excluded.
const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

fn interior(view: &PixelBufferView<'_>) -> impl Iterator<Item = (usize, usize)> {
    let (w, h) = view.dims();
    let xs = 1..w.saturating_sub(1);
    (1..h.saturating_sub(1)).flat_map(move |y| xs.clone().map(move |x| (x, y)))
}

#[inline]
fn neighbor(x: usize, y: usize, (dx, dy): (isize, isize)) -> (usize, usize) {
    (x.wrapping_add_signed(dx), y.wrapping_add_signed(dy))
}

/// Sobel gradient `(gx, gy)` at `(x, y)`.
///
/// `gx` responds to intensity increasing to the right, `gy` downwards.
/// Returns `None` on the image border, where the 3x3 window does not fit.
pub fn sobel_gradient(view: &PixelBufferView<'_>, x: usize, y: usize) -> Option<(f64, f64)> {
    let (w, h) = view.dims();
    if x == 0 || y == 0 || x + 1 >= w || y + 1 >= h {
        return None;
    }
    let top = view.row(y - 1);
    let mid = view.row(y);
    let bot = view.row(y + 1);
    let p = |row: &[u8], i: usize| row[i] as i32;

    let gx = (p(top, x + 1) + 2 * p(mid, x + 1) + p(bot, x + 1))
        - (p(top, x - 1) + 2 * p(mid, x - 1) + p(bot, x - 1));
    let gy = (p(bot, x - 1) + 2 * p(bot, x) + p(bot, x + 1))
        - (p(top, x - 1) + 2 * p(top, x) + p(top, x + 1));
    Some((gx as f64, gy as f64))
}

#[inline]
pub fn sobel_magnitude(view: &PixelBufferView<'_>, x: usize, y: usize) -> Option<f64> {
    sobel_gradient(view, x, y).map(|(gx, gy)| gx.hypot(gy))
}

/// Edge preservation counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStats {
    /// Interior pixels of the original whose Sobel magnitude exceeds the threshold.
    pub edge_pixels: u64,
    /// Edge pixels at which the candidate mask changes label.
    pub preserved: u64,
}

impl EdgeStats {
    /// `preserved / edge_pixels`, `1.0` when there are no edges to preserve.
    pub fn accuracy(&self) -> f64 {
        if self.edge_pixels == 0 {
            1.0
        } else {
            self.preserved as f64 / self.edge_pixels as f64
        }
    }
}

fn has_label_transition(
    mask: &PixelBufferView<'_>,
    x: usize,
    y: usize,
    mask_threshold: u8,
) -> bool {
    let center = is_foreground(mask.pixel(x, y), mask_threshold);
    NEIGHBORS_8.iter().any(|&d| {
        let (nx, ny) = neighbor(x, y, d);
        is_foreground(mask.pixel(nx, ny), mask_threshold) != center
    })
}

/// Count original-image edges and how many of them the candidate mask preserves.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip_all,
        fields(width = original.width(), height = original.height())
    )
)]
pub fn boundary_accuracy(
    original: &PixelBufferView<'_>,
    candidate: &PixelBufferView<'_>,
    edge_threshold: f64,
    mask_threshold: u8,
) -> EdgeStats {
    debug_assert!(original.same_dims(candidate));
    let mut stats = EdgeStats::default();
    for (x, y) in interior(original) {
        // A NaN threshold admits no edges.
        let is_edge = sobel_magnitude(original, x, y).is_some_and(|mag| mag > edge_threshold);
        if !is_edge {
            continue;
        }
        stats.edge_pixels += 1;
        if has_label_transition(candidate, x, y, mask_threshold) {
            stats.preserved += 1;
        }
    }
    debug!(
        "edges: {} of {} preserved (threshold {edge_threshold})",
        stats.preserved, stats.edge_pixels
    );
    stats
}

/// Perimeter of a binary mask: interior foreground pixels with at least one
/// background 8-neighbor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryPointSet {
    points: Vec<Point2<i32>>,
}

impl BoundaryPointSet {
    /// Build a set from arbitrary points; duplicates are dropped.
    pub fn from_points(mut points: Vec<Point2<i32>>) -> Self {
        points.sort_unstable_by_key(|p| (p.y, p.x));
        points.dedup();
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Point2<i32>] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point2<i32>> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a BoundaryPointSet {
    type Item = &'a Point2<i32>;
    type IntoIter = std::slice::Iter<'a, Point2<i32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

pub fn extract_boundary(mask: &PixelBufferView<'_>, mask_threshold: u8) -> BoundaryPointSet {
    let points = interior(mask)
        .filter(|&(x, y)| {
            is_foreground(mask.pixel(x, y), mask_threshold)
                && has_label_transition(mask, x, y, mask_threshold)
        })
        .map(|(x, y)| Point2::new(x as i32, y as i32))
        .collect();
    BoundaryPointSet { points }
}
