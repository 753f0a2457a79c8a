//! Empirical convergence order
//!
//! The order is the least-squares slope of `log(error)` against `log(1/h)`.
//! A second-order discretization gives a slope close to -2.

/// Least-squares slope of log(error) vs log(1/h)
///
/// `samples` holds `(h, error)` pairs. Pairs with a non-positive or
/// non-finite entry are ignored (the logarithm is undefined there).
/// Returns `None` when fewer than two usable pairs remain or when all usable
/// pairs share the same `h`.
///
/// # Example
///
/// ```rust
/// use bioheat_rs::study::convergence_order;
///
/// // error = h²
/// let samples = [(0.1, 1e-2), (0.05, 2.5e-3), (0.025, 6.25e-4)];
/// let slope = convergence_order(&samples).unwrap();
/// assert!((slope + 2.0).abs() < 1e-12);
/// ```
pub fn convergence_order(samples: &[(f64, f64)]) -> Option<f64> {
    let points: Vec<(f64, f64)> = samples
        .iter()
        .filter(|(h, e)| h.is_finite() && *h > 0.0 && e.is_finite() && *e > 0.0)
        .map(|(h, e)| ((1.0 / h).ln(), e.ln()))
        .collect();

    if points.len() < 2 {
        return None;
    }

    let count = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / count;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / count;

    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });

    if sxx <= f64::EPSILON {
        return None;
    }
    Some(sxy / sxx)
}
