//! SIMD window kernels.
//!
//! These use the `wide` crate for portable SIMD operations. They work on a
//! single window slice; the rolling indicators call them once per window.

use wide::f64x4;

/// SIMD-optimized sum of a slice.
pub fn sum_simd(data: &[f64]) -> f64 {
    let chunks = data.len() / 4;
    let mut simd_sum = f64x4::splat(0.0);

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]);
        simd_sum += values;
    }

    let mut result = simd_sum.reduce_add();

    // Handle remaining elements
    for &value in &data[(chunks * 4)..] {
        result += value;
    }

    result
}

/// Arithmetic mean of a window. Empty windows yield `NaN`.
pub fn mean_simd(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    sum_simd(data) / data.len() as f64
}

/// Sample variance (n - 1 denominator) of a window.
pub fn sample_variance_simd(window: &[f64]) -> f64 {
    let n = window.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean = mean_simd(window);
    let mean_vec = f64x4::splat(mean);
    let chunks = n / 4;
    let mut sum_sq = 0.0;

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([
            window[idx],
            window[idx + 1],
            window[idx + 2],
            window[idx + 3],
        ]);
        let diff = values - mean_vec;
        let sq = diff * diff;
        sum_sq += sq.reduce_add();
    }

    for &value in &window[(chunks * 4)..] {
        let diff = value - mean;
        sum_sq += diff * diff;
    }

    sum_sq / (n - 1) as f64
}

/// SIMD-optimized min/max finder.
pub fn minmax_simd(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }

    let chunks = data.len() / 4;
    let mut min_vec = f64x4::splat(f64::INFINITY);
    let mut max_vec = f64x4::splat(f64::NEG_INFINITY);

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]);
        min_vec = min_vec.min(values);
        max_vec = max_vec.max(values);
    }

    let min_arr = min_vec.to_array();
    let max_arr = max_vec.to_array();

    let mut min = min_arr[0].min(min_arr[1]).min(min_arr[2]).min(min_arr[3]);
    let mut max = max_arr[0].max(max_arr[1]).max(max_arr[2]).max(max_arr[3]);

    for &value in &data[(chunks * 4)..] {
        min = min.min(value);
        max = max.max(value);
    }

    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_simd() {
        let data: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        assert!((sum_simd(&data) - 5050.0).abs() < 1e-10);
    }

    #[test]
    fn test_mean_simd_tail() {
        // Length not divisible by 4 exercises the scalar tail
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert!((mean_simd(&data) - 4.0).abs() < 1e-10);
        assert!(mean_simd(&[]).is_nan());
    }

    #[test]
    fn test_sample_variance_simd() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Sum of squared deviations is 32, n - 1 = 7
        assert!((sample_variance_simd(&data) - 32.0 / 7.0).abs() < 1e-10);
        assert!(sample_variance_simd(&[1.0]).is_nan());
    }

    #[test]
    fn test_minmax_simd() {
        let data = vec![5.0, 2.0, 8.0, 1.0, 9.0, 3.0, 7.0, 4.0, 0.5];
        let (min, max) = minmax_simd(&data).unwrap();

        assert!((min - 0.5).abs() < 1e-10);
        assert!((max - 9.0).abs() < 1e-10);
        assert!(minmax_simd(&[]).is_none());
    }
}
