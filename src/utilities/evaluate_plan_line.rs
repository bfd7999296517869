use serde::{Deserialize, Serialize};

use crate::utilities::errors::OptimizerError;
use crate::utilities::structs::{PlanPoint, SamplePoint, positions, values};
use crate::utilities::utilities::first_non_finite;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerOptions {
    pub max_upward: Option<f64>,
    pub max_downward: Option<f64>,
    pub target_upward_ratio: Option<f64>,
    pub iteration_limit: Option<usize>,
    pub convergence_threshold: Option<f64>,
    pub lift_to_target: Option<bool>,
    pub time_limit_ms: Option<u64>,
}

impl OptimizerOptions {
    pub fn from_json(s: &str) -> Result<Self, OptimizerError> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(s)?)
    }

    pub fn resolve(&self) -> Result<OptimizerParameters, OptimizerError> {
        let p = OptimizerParameters {
            max_upward: self.max_upward.unwrap_or(50.0),
            max_downward: self.max_downward.unwrap_or(10.0),
            target_upward_ratio: self.target_upward_ratio.unwrap_or(0.7),
            iteration_limit: self.iteration_limit.unwrap_or(100),
            convergence_threshold: self.convergence_threshold.unwrap_or(0.01),
            lift_to_target: self.lift_to_target.unwrap_or(true),
            time_limit_ms: self.time_limit_ms,
        };
        non_negative("maxUpward", p.max_upward)?;
        non_negative("maxDownward", p.max_downward)?;
        non_negative("convergenceThreshold", p.convergence_threshold)?;
        let t = p.target_upward_ratio;
        if !(t.is_finite() && t > 0.0 && t <= 1.0) {
            return Err(OptimizerError::InvalidParameter {
                name: "targetUpwardRatio",
                value: t,
            });
        }
        Ok(p)
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), OptimizerError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(OptimizerError::InvalidParameter { name, value })
    }
}

/// Limits are in mm; `max_downward` is a magnitude.
///
/// `lift_to_target` (on by default) raises each candidate uniformly after
/// smoothing so that `ceil(target·n)` positions lift. On most inputs this
/// reaches the target in one iteration. Pass `liftToTarget: false` to run
/// the plain per-position hill-climb.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerParameters {
    pub max_upward: f64,
    pub max_downward: f64,
    pub target_upward_ratio: f64,
    pub iteration_limit: usize,
    pub convergence_threshold: f64,
    pub lift_to_target: bool,
    pub time_limit_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLineStats {
    pub total_points: usize,
    pub upward_points: usize,
    pub downward_points: usize,
    pub zero_points: usize,
    pub upward_ratio: f64,
    pub max_upward: f64,
    pub max_downward: f64,
    pub total_upward: f64,
    pub total_downward: f64,
    pub score: f64,
}

/// Rejects NaN or infinite samples in either series before they reach the
/// moving average.
pub fn validate_plan_inputs(
    restored: &[SamplePoint],
    plan: &[PlanPoint],
) -> Result<(), OptimizerError> {
    let checks = [
        ("restored value", values(restored)),
        ("plan position", positions(plan)),
        ("plan value", values(plan)),
    ];
    for (field, series) in checks {
        if let Some(index) = first_non_finite(&series) {
            return Err(OptimizerError::InvalidNumericValue { field, index });
        }
    }
    Ok(())
}

/// Restored value under plan point `i`. A missing restored sample falls back to
/// the plan value itself, so its movement is zero.
#[inline]
pub fn reference_value(restored: &[SamplePoint], plan: &[PlanPoint], i: usize) -> f64 {
    restored.get(i).map_or(plan[i].value, |r| r.value)
}

#[inline]
pub fn movement_at(restored: &[SamplePoint], plan: &[PlanPoint], i: usize) -> f64 {
    plan[i].value - reference_value(restored, plan, i)
}

pub fn movements(restored: &[SamplePoint], plan: &[PlanPoint]) -> Vec<f64> {
    (0..plan.len()).map(|i| movement_at(restored, plan, i)).collect()
}

pub fn evaluate_plan_line(
    restored: &[SamplePoint],
    plan: &[PlanPoint],
    params: &OptimizerParameters,
) -> PlanLineStats {
    let mut s = PlanLineStats {
        total_points: plan.len(),
        ..Default::default()
    };
    for m in movements(restored, plan) {
        if m > 0.0 {
            s.upward_points += 1;
            s.total_upward += m;
            s.max_upward = s.max_upward.max(m);
        } else if m < 0.0 {
            s.downward_points += 1;
            s.total_downward += -m;
            s.max_downward = s.max_downward.max(-m);
        } else {
            s.zero_points += 1;
        }
    }
    s.upward_ratio = if s.total_points > 0 {
        s.upward_points as f64 / s.total_points as f64
    } else {
        0.0
    };
    s.score = 100.0 * s.upward_ratio
        - 2.0 * (s.max_downward - params.max_downward).max(0.0)
        - (s.max_upward - params.max_upward).max(0.0)
        + 0.01 * (s.total_upward - s.total_downward);
    s
}
