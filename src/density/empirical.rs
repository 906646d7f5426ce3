//! Empirical density from 2D histogram cell counts.

/// Default number of histogram bins per axis.
pub const DEFAULT_EMPIRICAL_BINS: usize = 100;

/// Assign each point the (weighted) count of its `bins x bins` histogram cell.
pub(crate) fn cell_counts(x: &[f32], y: &[f32], weights: Option<&[f32]>, bins: usize) -> Vec<f32> {
    let n = x.len().min(y.len());
    if n == 0 {
        return Vec::new();
    }
    let bins = bins.max(1);

    let cell_of = |values: &[f32]| -> Vec<usize> {
        let lo = values.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let width = hi - lo;
        values
            .iter()
            .map(|&v| {
                if width > 0.0 {
                    (((v - lo) / width * bins as f32).floor() as usize).min(bins - 1)
                } else {
                    0
                }
            })
            .collect()
    };
    let ix = cell_of(&x[..n]);
    let iy = cell_of(&y[..n]);

    let mut grid = vec![0.0f32; bins * bins];
    for i in 0..n {
        let w = weights.and_then(|w| w.get(i)).copied().unwrap_or(1.0);
        grid[ix[i] * bins + iy[i]] += w;
    }

    (0..n).map(|i| grid[ix[i] * bins + iy[i]]).collect()
}
