use crate::utilities::structs::SeriesStatistics;

#[inline]
pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sq: f64 = values.iter().map(|v| v * v).sum();
    (sq / values.len() as f64).sqrt()
}

pub fn series_statistics(values: &[f64]) -> SeriesStatistics {
    let n = values.len();
    if n == 0 {
        return SeriesStatistics::default();
    }
    let mut sum = 0.0f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        sum += v;
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    let mean = sum / n as f64;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    SeriesStatistics {
        mean,
        std_dev: var.sqrt(),
        rms: rms(values),
        min,
        max,
        range: max - min,
    }
}

/// Mean over `[i - half, i + half]`, with the window clipped at both ends.
pub fn clipped_moving_average(values: &[f64], half: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let mut pref = vec![0.0f64; n + 1];
    for i in 0..n {
        pref[i + 1] = pref[i] + values[i];
    }
    let mut out = vec![0.0f64; n];
    for i in 0..n {
        let start = i.saturating_sub(half);
        let end = (i + half).min(n - 1);
        out[i] = (pref[end + 1] - pref[start]) / (end - start + 1) as f64;
    }
    out
}

/// `(prev + 2·mid + next) / 4` over interior points, repeated `passes` times.
pub fn binomial_smooth(values: &[f64], passes: usize) -> Vec<f64> {
    let n = values.len();
    let mut cur = values.to_vec();
    if n < 3 {
        return cur;
    }
    let mut next = cur.clone();
    for _ in 0..passes {
        for i in 1..(n - 1) {
            next[i] = (cur[i - 1] + 2.0 * cur[i] + cur[i + 1]) * 0.25;
        }
        std::mem::swap(&mut cur, &mut next);
        next.copy_from_slice(&cur);
    }
    cur
}

/// Pulls the outer `min(10, n/10)` baseline points toward the raw signal.
/// Weight on the baseline is 0 at the very end and ramps up inward.
pub fn blend_endpoints(baseline: &mut [f64], raw: &[f64]) {
    let n = baseline.len().min(raw.len());
    let m = (n / 10).min(10);
    if m == 0 {
        return;
    }
    for i in 0..m {
        let w = i as f64 / m as f64;
        let j = n - 1 - i;
        baseline[i] = w * baseline[i] + (1.0 - w) * raw[i];
        baseline[j] = w * baseline[j] + (1.0 - w) * raw[j];
    }
}

#[inline]
pub fn first_non_finite(values: &[f64]) -> Option<usize> {
    values.iter().position(|v| !v.is_finite())
}

#[inline]
pub fn first_unordered(xs: &[f64]) -> Option<usize> {
    xs.windows(2).position(|w| w[1] <= w[0]).map(|i| i + 1)
}

#[inline]
pub fn is_finite_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}
