//! Variance-optimal fusion of the spectral and temporal branches
//!
//! One scalar weight per frame, computed over all bins jointly:
//! `alpha = var(kalman) / (var(mmse) + var(kalman) + eps)`, so the branch
//! with the lower spread across the frame gets the larger share.

/// Population variance (ddof = 0), accumulated in f64
pub fn population_variance(values: &[f32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Trust in the spectral branch, clipped to [0, 1]
pub fn fusion_weight(mmse: &[f32], kalman: &[f32], eps: f32) -> f32 {
    let v_mmse = population_variance(mmse);
    let v_kalman = population_variance(kalman);
    let denom = v_mmse + v_kalman + eps as f64;

    // eps = 0 over two flat frames: fall back to the limit of the eps > 0 case
    if denom > 0.0 {
        (v_kalman / denom).clamp(0.0, 1.0) as f32
    } else {
        0.0
    }
}

/// Blend the two magnitude frames into `out` and return the weight used
pub fn variance_optimal_fusion(mmse: &[f32], kalman: &[f32], eps: f32, out: &mut [f32]) -> f32 {
    let alpha = fusion_weight(mmse, kalman, eps);
    for ((o, &m), &k) in out.iter_mut().zip(mmse).zip(kalman) {
        *o = alpha * m + (1.0 - alpha) * k;
    }
    alpha
}
