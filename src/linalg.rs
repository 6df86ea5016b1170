//! Dense array helpers shared by kernel-matrix construction and prediction
//!
//! Thin layer over `ndarray`: products, reductions, broadcast expansion and the
//! squared-distance expansion ||a - b||² = ||a||² + ||b||² - 2·a·b.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Sum of squares of every row
pub fn row_sums_of_squares(x: ArrayView2<f64>) -> Array1<f64> {
    x.mapv(|v| v * v).sum_axis(Axis(1))
}

/// Tile a vector into a matrix
///
/// With `axis == Axis(0)` every row is a copy of `v` (`reps` rows); with
/// `axis == Axis(1)` every column is a copy of `v` (`reps` columns).
pub fn expand(v: ArrayView1<f64>, reps: usize, axis: Axis) -> Array2<f64> {
    let n = v.len();
    if axis == Axis(0) {
        Array2::from_shape_fn((reps, n), |(_, j)| v[j])
    } else {
        Array2::from_shape_fn((n, reps), |(i, _)| v[i])
    }
}

/// Pairwise squared Euclidean distances between the rows of `a` and `b`
///
/// Uses the norm expansion with two matrix products instead of a
/// rows(a)·rows(b)·n loop. Round-off can push the expansion slightly below
/// zero, so results are clamped at 0.
pub fn pairwise_squared_distances(a: ArrayView2<f64>, b: ArrayView2<f64>) -> Array2<f64> {
    let a_sq = row_sums_of_squares(a);
    let b_sq = row_sums_of_squares(b);

    let mut d = expand(a_sq.view(), b.nrows(), Axis(1));
    d += &expand(b_sq.view(), a.nrows(), Axis(0));
    d.scaled_add(-2.0, &a.dot(&b.t()));

    d.mapv_inplace(|v| v.max(0.0));
    d
}

/// Copy the upper triangle of a square matrix onto its lower triangle
pub fn mirror_upper(k: &mut Array2<f64>) {
    let m = k.nrows();
    debug_assert_eq!(m, k.ncols());
    for i in 0..m {
        for j in (i + 1)..m {
            k[[j, i]] = k[[i, j]];
        }
    }
}

/// Dot product of two equally sized vectors
pub fn dot(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    x.dot(&y)
}

/// Squared Euclidean distance between two equally sized vectors
pub fn squared_distance(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum()
}
