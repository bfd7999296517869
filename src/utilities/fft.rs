use std::f64::consts::PI;

use num_complex::Complex;

use crate::utilities::errors::AlsError;

/// Recursive radix-2 Cooley-Tukey transform. `input.len()` must be a power of two.
pub fn fft(input: &[Complex<f64>]) -> Result<Vec<Complex<f64>>, AlsError> {
    let n = input.len();
    if n == 0 || !n.is_power_of_two() {
        return Err(AlsError::NotPowerOfTwo(n));
    }
    Ok(fft_rec(input))
}

/// Inverse via the conjugate trick, normalized by `1/N`.
pub fn ifft(input: &[Complex<f64>]) -> Result<Vec<Complex<f64>>, AlsError> {
    let conj: Vec<Complex<f64>> = input.iter().map(|c| c.conj()).collect();
    let out = fft(&conj)?;
    let k = 1.0 / input.len() as f64;
    Ok(out.into_iter().map(|c| c.conj().scale(k)).collect())
}

fn fft_rec(x: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let n = x.len();
    if n == 1 {
        return vec![x[0]];
    }
    let half = n / 2;
    let mut even = Vec::with_capacity(half);
    let mut odd = Vec::with_capacity(half);
    for (i, &v) in x.iter().enumerate() {
        if i % 2 == 0 {
            even.push(v);
        } else {
            odd.push(v);
        }
    }
    let e = fft_rec(&even);
    let o = fft_rec(&odd);

    let mut out = vec![Complex::new(0.0, 0.0); n];
    for k in 0..half {
        let t = Complex::from_polar(1.0, -2.0 * PI * k as f64 / n as f64) * o[k];
        out[k] = e[k] + t;
        out[k + half] = e[k] - t;
    }
    out
}

#[inline]
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Real values copied into a complex buffer, zero-padded to the next power of two.
pub fn zero_padded(values: &[f64]) -> Vec<Complex<f64>> {
    let size = next_power_of_two(values.len());
    let mut buf = vec![Complex::new(0.0, 0.0); size];
    for (dst, &v) in buf.iter_mut().zip(values) {
        *dst = Complex::new(v, 0.0);
    }
    buf
}

/// `|X_k|^2` for `k` in `0..=N/2` of the zero-padded series.
pub fn power_spectrum(values: &[f64]) -> Result<Vec<f64>, AlsError> {
    let spectrum = fft(&zero_padded(values))?;
    let half = spectrum.len() / 2;
    Ok(spectrum[..=half].iter().map(|c| c.norm_sqr()).collect())
}
