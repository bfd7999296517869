use serde::{Deserialize, Serialize};

/// One measurement along the track: `position` in metres, `value` in mm.
///
/// Missing fields deserialize as `0.0`. `x`/`y` are accepted as aliases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    #[serde(default, alias = "x")]
    pub position: f64,
    #[serde(default, alias = "y")]
    pub value: f64,
}

impl SamplePoint {
    pub fn new(position: f64, value: f64) -> Self {
        Self { position, value }
    }
}

/// Plan-line points share the sample layout; `value` is the proposed elevation.
pub type PlanPoint = SamplePoint;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselinePoint {
    pub position: f64,
    pub original_value: f64,
    pub baseline_value: f64,
    pub corrected_value: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatistics {
    pub mean: f64,
    pub std_dev: f64,
    pub rms: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyAnalysis {
    pub cutoff_bin: usize,
    pub original_low_energy: f64,
    pub original_high_energy: f64,
    pub corrected_low_energy: f64,
    pub corrected_high_energy: f64,
    pub low_frequency_reduction: f64,
    pub high_frequency_preservation: f64,
}

pub fn positions(series: &[SamplePoint]) -> Vec<f64> {
    series.iter().map(|p| p.position).collect()
}

pub fn values(series: &[SamplePoint]) -> Vec<f64> {
    series.iter().map(|p| p.value).collect()
}
