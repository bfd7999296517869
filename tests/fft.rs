use std::f64::consts::PI;

use num_complex::Complex64;
use trackline::utilities::errors::AlsError;
use trackline::utilities::fft::{fft, ifft, next_power_of_two, power_spectrum, zero_padded};

mod helpers;
use helpers::{approx_eq, jitter};

#[test]
fn forward_then_inverse_reconstructs_series() {
    for n in [1usize, 2, 8, 64, 256] {
        let xs: Vec<f64> = (0..n).map(|i| 10.0 * jitter(i as u32) + 0.3 * i as f64).collect();
        let spectrum = fft(&zero_padded(&xs)).unwrap();
        let back = ifft(&spectrum).unwrap();
        assert_eq!(back.len(), n);
        for (b, x) in back.iter().zip(&xs) {
            assert!(approx_eq(b.re, *x, 1e-9), "n={n}");
            assert!(approx_eq(b.im, 0.0, 1e-9), "n={n}");
        }
    }
}

#[test]
fn non_power_of_two_is_rejected() {
    let buf = vec![Complex64::new(0.0, 0.0); 12];
    assert_eq!(fft(&buf).unwrap_err(), AlsError::NotPowerOfTwo(12));
    assert_eq!(fft(&[]).unwrap_err(), AlsError::NotPowerOfTwo(0));
}

#[test]
fn constant_signal_lands_in_dc_bin() {
    let spectrum = fft(&zero_padded(&[2.0; 8])).unwrap();
    assert!(approx_eq(spectrum[0].re, 16.0, 1e-12));
    for c in &spectrum[1..] {
        assert!(c.norm() < 1e-12);
    }
}

#[test]
fn cosine_energy_sits_in_its_bin() {
    let n = 32;
    let k = 3;
    let xs: Vec<f64> = (0..n)
        .map(|i| (2.0 * PI * k as f64 * i as f64 / n as f64).cos())
        .collect();
    let spectrum = fft(&zero_padded(&xs)).unwrap();
    assert!(approx_eq(spectrum[k].norm(), n as f64 / 2.0, 1e-9));
    assert!(approx_eq(spectrum[n - k].norm(), n as f64 / 2.0, 1e-9));
    assert!(spectrum[k + 1].norm() < 1e-9);

    let power = power_spectrum(&xs).unwrap();
    assert_eq!(power.len(), n / 2 + 1);
    assert!(approx_eq(power[k], (n as f64 / 2.0).powi(2), 1e-6));
}

#[test]
fn padding_rounds_up_to_power_of_two() {
    assert_eq!(next_power_of_two(0), 1);
    assert_eq!(next_power_of_two(12), 16);
    assert_eq!(next_power_of_two(16), 16);
    let buf = zero_padded(&[1.0, 2.0, 3.0]);
    assert_eq!(buf.len(), 4);
    assert_eq!(buf[3], Complex64::new(0.0, 0.0));
}
