// tests/helpers.rs
use std::f64::consts::PI;

use trackline::utilities::structs::SamplePoint;

#[allow(dead_code)]
/// Make an even grid starting at `start` with `n` points spaced by `step`.
pub fn make_grid(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

#[allow(dead_code)]
/// Pair values with positions `0, interval, 2·interval, …`.
pub fn series_from_values(values: &[f64], interval: f64) -> Vec<SamplePoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| SamplePoint::new(interval * i as f64, v))
        .collect()
}

#[allow(dead_code)]
pub fn constant_series(n: usize, interval: f64, value: f64) -> Vec<SamplePoint> {
    series_from_values(&vec![value; n], interval)
}

/// Long-wave deformation plus short-wave irregularity (wavelengths in metres).
#[allow(dead_code)]
pub fn track_waveform(
    n: usize,
    interval: f64,
    long: (f64, f64),
    short: (f64, f64),
) -> Vec<SamplePoint> {
    make_grid(0.0, interval, n)
        .into_iter()
        .map(|x| {
            let (la, lw) = long;
            let (sa, sw) = short;
            let v = la * (2.0 * PI * x / lw).sin() + sa * (2.0 * PI * x / sw).sin();
            SamplePoint::new(x, v)
        })
        .collect()
}

/// Small deterministic wiggle in [-0.5, 0.5] you can use as repeatable “noise”.
#[allow(dead_code)]
pub fn jitter(i: u32) -> f64 {
    let mut x = i.wrapping_mul(1664525).wrapping_add(1013904223);
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    (x as f64 / (u32::MAX as f64)) - 0.5
}

/// Check two numbers are close within a simple absolute tolerance.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
