use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utilities::cubic_spline::CubicSpline;
use crate::utilities::errors::AlsError;
use crate::utilities::fft::{fft, ifft, zero_padded};
use crate::utilities::polynomial_fit::{polynomial_eval, polynomial_fit};
use crate::utilities::utilities::{binomial_smooth, clipped_moving_average, is_finite_positive};

const SMOOTHING_PASSES: usize = 3;
const BUTTERWORTH_ORDER: i32 = 4;
const MAX_STABLE_DEGREE: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlsMethod {
    #[default]
    MovingAverage,
    Polynomial,
    Spline,
    Butterworth,
}

impl AlsMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlsMethod::MovingAverage => "moving_average",
            AlsMethod::Polynomial => "polynomial",
            AlsMethod::Spline => "spline",
            AlsMethod::Butterworth => "butterworth",
        }
    }
}

impl FromStr for AlsMethod {
    type Err = AlsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "moving_average" => Ok(AlsMethod::MovingAverage),
            "polynomial" => Ok(AlsMethod::Polynomial),
            "spline" => Ok(AlsMethod::Spline),
            "butterworth" => Ok(AlsMethod::Butterworth),
            other => Err(AlsError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for AlsMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-facing options. Unset fields take the defaults listed on
/// [`CorrectionParameters`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionOptions {
    pub method: Option<String>,
    pub baseline_length: Option<f64>,
    pub data_interval: Option<f64>,
    pub preserve_endpoints: Option<bool>,
    pub polynomial_degree: Option<usize>,
    pub knot_spacing: Option<f64>,
    pub cutoff_wavelength: Option<f64>,
}

impl CorrectionOptions {
    pub fn from_json(s: &str) -> Result<Self, AlsError> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(s)?)
    }

    pub fn with_method(method: AlsMethod) -> Self {
        Self {
            method: Some(method.as_str().to_string()),
            ..Default::default()
        }
    }

    pub fn resolve(&self) -> Result<CorrectionParameters, AlsError> {
        let method = match self.method.as_deref() {
            Some(m) => m.parse::<AlsMethod>()?,
            None => AlsMethod::default(),
        };
        let baseline_length = self.baseline_length.unwrap_or(100.0);
        let data_interval = self.data_interval.unwrap_or(0.25);
        check_positive("baselineLength", baseline_length)?;
        check_positive("dataInterval", data_interval)?;
        let knot_spacing = self.knot_spacing.unwrap_or(baseline_length / 4.0);
        let cutoff_wavelength = self.cutoff_wavelength.unwrap_or(baseline_length);
        check_positive("knotSpacing", knot_spacing)?;
        check_positive("cutoffWavelength", cutoff_wavelength)?;

        Ok(CorrectionParameters {
            method,
            baseline_length,
            data_interval,
            preserve_endpoints: self.preserve_endpoints.unwrap_or(true),
            polynomial_degree: self.polynomial_degree.unwrap_or(6),
            knot_spacing,
            cutoff_wavelength,
            window_size: window_size(baseline_length, data_interval),
        })
    }
}

/// Resolved options, echoed back with every result.
///
/// Defaults: `moving_average`, 100 m baseline, 0.25 m interval, endpoints
/// preserved, degree 6, knot spacing `baselineLength/4`, cutoff wavelength
/// `baselineLength`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionParameters {
    pub method: AlsMethod,
    pub baseline_length: f64,
    pub data_interval: f64,
    pub preserve_endpoints: bool,
    pub polynomial_degree: usize,
    pub knot_spacing: f64,
    pub cutoff_wavelength: f64,
    pub window_size: usize,
}

fn check_positive(name: &'static str, value: f64) -> Result<(), AlsError> {
    if is_finite_positive(value) {
        Ok(())
    } else {
        Err(AlsError::InvalidParameter { name, value })
    }
}

#[inline]
fn window_size(baseline_length: f64, data_interval: f64) -> usize {
    ((baseline_length / data_interval).round() as usize).max(1)
}

/// Raw (not endpoint-blended) baseline for the chosen method.
pub fn calculate_baseline(
    xs: &[f64],
    ys: &[f64],
    params: &CorrectionParameters,
) -> Result<Vec<f64>, AlsError> {
    if xs.len() != ys.len() {
        return Err(AlsError::MismatchedLengths {
            left: xs.len(),
            right: ys.len(),
        });
    }
    if ys.is_empty() {
        return Ok(Vec::new());
    }
    match params.method {
        AlsMethod::MovingAverage => Ok(moving_average_baseline(ys, params.window_size)),
        AlsMethod::Polynomial => polynomial_baseline(xs, ys, params.polynomial_degree),
        AlsMethod::Spline => {
            let stride = window_size(params.knot_spacing, params.data_interval);
            spline_baseline(xs, ys, stride)
        }
        AlsMethod::Butterworth => {
            butterworth_baseline(ys, params.data_interval / params.cutoff_wavelength)
        }
    }
}

pub fn moving_average_baseline(ys: &[f64], window_size: usize) -> Vec<f64> {
    let half = window_size / 2;
    let avg = clipped_moving_average(ys, half);
    binomial_smooth(&avg, SMOOTHING_PASSES)
}

pub fn polynomial_baseline(xs: &[f64], ys: &[f64], degree: usize) -> Result<Vec<f64>, AlsError> {
    // a degree-d fit needs d+1 distinct positions
    if degree >= xs.len() {
        return Err(AlsError::InvalidParameter {
            name: "polynomialDegree",
            value: degree as f64,
        });
    }
    if degree > MAX_STABLE_DEGREE {
        tracing::warn!(
            degree,
            "polynomial degree above 6 may oscillate at the domain edges"
        );
    }
    // map positions onto [-1, 1] to keep the normal equations well conditioned
    let lo = xs[0];
    let hi = xs[xs.len() - 1];
    let mid = 0.5 * (lo + hi);
    let half_span = if hi > lo { 0.5 * (hi - lo) } else { 1.0 };
    let ts: Vec<f64> = xs.iter().map(|&x| (x - mid) / half_span).collect();

    let coefficients = polynomial_fit(&ts, ys, degree)?;
    Ok(ts.iter().map(|&t| polynomial_eval(&coefficients, t)).collect())
}

pub fn spline_baseline(xs: &[f64], ys: &[f64], stride: usize) -> Result<Vec<f64>, AlsError> {
    let n = ys.len();
    let stride = stride.max(1);
    let mut kx = Vec::with_capacity(n / stride + 2);
    let mut ky = Vec::with_capacity(n / stride + 2);
    let mut i = 0usize;
    while i < n {
        kx.push(xs[i]);
        ky.push(ys[i]);
        i += stride;
    }
    if (n - 1) % stride != 0 {
        kx.push(xs[n - 1]);
        ky.push(ys[n - 1]);
    }
    tracing::debug!(knots = kx.len(), stride, "spline knots selected");

    let spline = CubicSpline::natural(&kx, &ky)?;
    Ok(xs.iter().map(|&x| spline.eval(x)).collect())
}

/// Zero-phase low-pass in the frequency domain. `cutoff` is in cycles per sample.
pub fn butterworth_baseline(ys: &[f64], cutoff: f64) -> Result<Vec<f64>, AlsError> {
    let n = ys.len();
    let mut spectrum = fft(&zero_padded(ys))?;
    let size = spectrum.len();
    for (k, bin) in spectrum.iter_mut().enumerate() {
        let mirrored = if k <= size / 2 { k } else { size - k };
        let f = mirrored as f64 / size as f64;
        let gain = 1.0 / (1.0 + (f / cutoff).powi(2 * BUTTERWORTH_ORDER)).sqrt();
        *bin = bin.scale(gain);
    }
    let filtered = ifft(&spectrum)?;
    Ok(filtered[..n].iter().map(|c| c.re).collect())
}
