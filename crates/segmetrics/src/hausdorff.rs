//! Symmetric Hausdorff distance between two boundary point sets.
//!
//! The brute-force method is `O(|A| * |B|)`, which gets slow for long
//! perimeters; the kd-tree method answers each nearest-neighbor query in
//! roughly logarithmic time and returns the same value.

use crate::boundary::BoundaryPointSet;
use crate::config::HausdorffMethod;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Rotation applied to points before they enter the kd-tree.
///
/// Lattice points share x or y coordinates in long runs (straight mask
/// edges), and kiddo cannot split a bucket whose items all have the same key
/// on the split axis. With `tan(1 rad)` irrational no two distinct lattice
/// points share a rotated coordinate. Rotation preserves distances.
const KD_ROTATION_RAD: f64 = 1.0;

#[inline]
fn squared_distance(a: &Point2<i32>, b: &Point2<i32>) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy
}

fn directed_squared_brute(from: &BoundaryPointSet, to: &BoundaryPointSet) -> i64 {
    from.iter()
        .map(|a| {
            to.iter()
                .map(|b| squared_distance(a, b))
                .min()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0)
}

fn directed_squared_kdtree(from: &BoundaryPointSet, to: &BoundaryPointSet) -> i64 {
    if from.is_empty() || to.is_empty() {
        return 0;
    }
    let (sin, cos) = KD_ROTATION_RAD.sin_cos();
    let rotate = |p: &Point2<i32>| {
        let (x, y) = (p.x as f64, p.y as f64);
        [x * cos - y * sin, x * sin + y * cos]
    };

    let coords = to.iter().map(rotate).collect::<Vec<_>>();
    let tree: KdTree<f64, 2> = (&coords).into();

    from.iter()
        .map(|a| {
            let nn = tree.nearest_one::<SquaredEuclidean>(&rotate(a));
            // Exact integer distance to the returned neighbor.
            squared_distance(a, &to.points()[nn.item as usize])
        })
        .max()
        .unwrap_or(0)
}

/// Directed Hausdorff distance `max_{a in from} min_{b in to} |a - b|`.
///
/// Returns `0` if either set is empty.
pub fn directed_hausdorff(
    from: &BoundaryPointSet,
    to: &BoundaryPointSet,
    method: HausdorffMethod,
) -> f64 {
    if from.is_empty() || to.is_empty() {
        return 0.0;
    }
    let sq = match method {
        HausdorffMethod::BruteForce => directed_squared_brute(from, to),
        HausdorffMethod::KdTree => directed_squared_kdtree(from, to),
    };
    (sq as f64).sqrt()
}

/// Symmetric Hausdorff distance `max(h(a, b), h(b, a))`; `0` if either set is empty.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(a, b), fields(a = a.len(), b = b.len()))
)]
pub fn hausdorff_distance(
    a: &BoundaryPointSet,
    b: &BoundaryPointSet,
    method: HausdorffMethod,
) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    directed_hausdorff(a, b, method).max(directed_hausdorff(b, a, method))
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHODS: [HausdorffMethod; 2] = [HausdorffMethod::BruteForce, HausdorffMethod::KdTree];

    fn set(points: &[(i32, i32)]) -> BoundaryPointSet {
        BoundaryPointSet::from_points(points.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    /// Deterministic pseudo-random points (xorshift).
    fn scattered(n: usize, seed: u32, extent: i32) -> BoundaryPointSet {
        let mut s = seed;
        let mut next = move || {
            s ^= s << 13;
            s ^= s >> 17;
            s ^= s << 5;
            (s % extent as u32) as i32
        };
        BoundaryPointSet::from_points((0..n).map(|_| Point2::new(next(), next())).collect())
    }

    #[test]
    fn empty_sets_give_zero() {
        let a = set(&[(1, 1), (4, 5)]);
        let empty = BoundaryPointSet::default();
        for m in METHODS {
            assert_eq!(hausdorff_distance(&a, &empty, m), 0.0);
            assert_eq!(hausdorff_distance(&empty, &a, m), 0.0);
            assert_eq!(hausdorff_distance(&empty, &empty, m), 0.0);
        }
    }

    #[test]
    fn identical_sets_give_zero() {
        let a = set(&[(1, 1), (4, 5), (9, 2)]);
        for m in METHODS {
            assert_eq!(hausdorff_distance(&a, &a, m), 0.0);
        }
    }

    #[test]
    fn directed_distance_is_asymmetric() {
        // b is a superset of a with one far point.
        let a = set(&[(0, 0), (1, 0)]);
        let b = set(&[(0, 0), (1, 0), (4, 4)]);
        for m in METHODS {
            assert_eq!(directed_hausdorff(&a, &b, m), 0.0);
            assert_eq!(directed_hausdorff(&b, &a, m), 5.0);
            assert_eq!(hausdorff_distance(&a, &b, m), 5.0);
        }
    }

    #[test]
    fn symmetric_and_methods_agree() {
        let a = scattered(300, 0x9e37_79b9, 200);
        let b = scattered(250, 0x7f4a_7c15, 200);
        let brute = hausdorff_distance(&a, &b, HausdorffMethod::BruteForce);
        let kd = hausdorff_distance(&a, &b, HausdorffMethod::KdTree);
        assert_eq!(brute, kd);
        assert_eq!(brute, hausdorff_distance(&b, &a, HausdorffMethod::BruteForce));
        assert_eq!(kd, hausdorff_distance(&b, &a, HausdorffMethod::KdTree));
    }

    #[test]
    fn kdtree_handles_long_straight_runs() {
        // Many points share x (and many share y): straight mask edges.
        let mut pts = Vec::new();
        for i in 0..200 {
            pts.push((10, i));
            pts.push((i, 10));
        }
        let a = set(&pts);
        let b = set(&[(12, 0), (12, 199), (199, 12)]);
        let brute = hausdorff_distance(&a, &b, HausdorffMethod::BruteForce);
        let kd = hausdorff_distance(&a, &b, HausdorffMethod::KdTree);
        assert_eq!(brute, kd);
    }

    #[test]
    fn repeated_points_collapse() {
        // More copies of one point than a kd-tree leaf can hold.
        let a = BoundaryPointSet::from_points(vec![Point2::new(3, 3); 100]);
        let mut pts = vec![Point2::new(5, 3); 100];
        pts.extend(vec![Point2::new(5, 7); 50]);
        let b = BoundaryPointSet::from_points(pts);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 2);
        for m in METHODS {
            assert_eq!(directed_hausdorff(&a, &b, m), 2.0);
            assert_eq!(hausdorff_distance(&a, &b, m), 20.0_f64.sqrt());
        }
    }
}
