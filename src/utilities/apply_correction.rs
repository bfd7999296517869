use serde::{Deserialize, Serialize};

use crate::utilities::calculate_baseline::{
    CorrectionOptions, CorrectionParameters, calculate_baseline,
};
use crate::utilities::errors::AlsError;
use crate::utilities::fft::power_spectrum;
use crate::utilities::structs::{
    BaselinePoint, FrequencyAnalysis, SamplePoint, SeriesStatistics, positions, values,
};
use crate::utilities::utilities::{
    blend_endpoints, first_non_finite, first_unordered, series_statistics,
};

pub const MIN_POINTS: usize = 10;
const LOW_BAND_FRACTION: f64 = 0.1;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionStatistics {
    pub original: SeriesStatistics,
    pub baseline: SeriesStatistics,
    pub corrected: SeriesStatistics,
    pub improvement: f64,
    pub frequency_analysis: FrequencyAnalysis,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionResult {
    pub corrected_series: Vec<SamplePoint>,
    pub baseline: Vec<SamplePoint>,
    pub points: Vec<BaselinePoint>,
    pub statistics: CorrectionStatistics,
    pub parameters: CorrectionParameters,
}

pub fn apply_correction(
    series: &[SamplePoint],
    options: &CorrectionOptions,
) -> Result<CorrectionResult, AlsError> {
    let params = options.resolve()?;
    validate_series(series)?;

    let xs = positions(series);
    let ys = values(series);
    tracing::debug!(
        method = %params.method,
        n = ys.len(),
        window = params.window_size,
        "applying average-line subtraction"
    );

    let mut base = calculate_baseline(&xs, &ys, &params)?;
    if params.preserve_endpoints {
        blend_endpoints(&mut base, &ys);
    }
    if let Some(index) = first_non_finite(&base) {
        return Err(AlsError::InvalidNumericValue {
            field: "baseline",
            index,
        });
    }

    let corrected: Vec<f64> = ys.iter().zip(&base).map(|(y, b)| y - b).collect();
    let statistics = correction_statistics(&ys, &base, &corrected)?;

    let mut points = Vec::with_capacity(ys.len());
    let mut corrected_series = Vec::with_capacity(ys.len());
    let mut baseline = Vec::with_capacity(ys.len());
    for i in 0..ys.len() {
        points.push(BaselinePoint {
            position: xs[i],
            original_value: ys[i],
            baseline_value: base[i],
            corrected_value: corrected[i],
        });
        corrected_series.push(SamplePoint::new(xs[i], corrected[i]));
        baseline.push(SamplePoint::new(xs[i], base[i]));
    }

    Ok(CorrectionResult {
        corrected_series,
        baseline,
        points,
        statistics,
        parameters: params,
    })
}

pub fn validate_series(series: &[SamplePoint]) -> Result<(), AlsError> {
    if series.len() < MIN_POINTS {
        return Err(AlsError::TooFewPoints {
            got: series.len(),
            min: MIN_POINTS,
        });
    }
    let xs = positions(series);
    if let Some(index) = first_non_finite(&xs) {
        return Err(AlsError::InvalidNumericValue {
            field: "position",
            index,
        });
    }
    if let Some(index) = first_non_finite(&values(series)) {
        return Err(AlsError::InvalidNumericValue {
            field: "value",
            index,
        });
    }
    if let Some(index) = first_unordered(&xs) {
        return Err(AlsError::UnorderedPositions { index });
    }
    Ok(())
}

pub fn correction_statistics(
    original: &[f64],
    baseline: &[f64],
    corrected: &[f64],
) -> Result<CorrectionStatistics, AlsError> {
    let original_stats = series_statistics(original);
    let corrected_stats = series_statistics(corrected);
    let improvement = if original_stats.rms > 0.0 {
        (1.0 - corrected_stats.rms / original_stats.rms) * 100.0
    } else {
        0.0
    };
    Ok(CorrectionStatistics {
        original: original_stats,
        baseline: series_statistics(baseline),
        corrected: corrected_stats,
        improvement,
        frequency_analysis: frequency_analysis(original, corrected)?,
    })
}

/// Splits spectral energy at the lowest decile of the one-sided spectrum.
pub fn frequency_analysis(original: &[f64], corrected: &[f64]) -> Result<FrequencyAnalysis, AlsError> {
    let po = power_spectrum(original)?;
    let pc = power_spectrum(corrected)?;
    let half = po.len() - 1;
    let cutoff_bin = ((half as f64 * LOW_BAND_FRACTION).floor() as usize).max(1);

    let (original_low, original_high) = split_energy(&po, cutoff_bin);
    let (corrected_low, corrected_high) = split_energy(&pc, cutoff_bin);

    let low_frequency_reduction = if original_low > 0.0 {
        (1.0 - corrected_low / original_low) * 100.0
    } else {
        0.0
    };
    let high_frequency_preservation = if original_high > 0.0 {
        corrected_high / original_high * 100.0
    } else {
        100.0
    };

    Ok(FrequencyAnalysis {
        cutoff_bin,
        original_low_energy: original_low,
        original_high_energy: original_high,
        corrected_low_energy: corrected_low,
        corrected_high_energy: corrected_high,
        low_frequency_reduction,
        high_frequency_preservation,
    })
}

#[inline]
fn split_energy(power: &[f64], cutoff_bin: usize) -> (f64, f64) {
    let cut = cutoff_bin.min(power.len());
    let low = power[..cut].iter().sum();
    let high = power[cut..].iter().sum();
    (low, high)
}
