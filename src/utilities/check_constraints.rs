use serde::{Deserialize, Serialize};

use crate::utilities::errors::OptimizerError;
use crate::utilities::evaluate_plan_line::{OptimizerOptions, movement_at, validate_plan_inputs};
use crate::utilities::structs::{PlanPoint, SamplePoint};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Upward,
    Downward,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintViolation {
    pub index: usize,
    pub position: f64,
    pub movement: f64,
    pub kind: ViolationKind,
    pub limit: f64,
    pub excess: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintReport {
    pub violations: Vec<ConstraintViolation>,
    pub upward_violations: usize,
    pub downward_violations: usize,
    pub max_excess: f64,
    pub within_limits: bool,
}

/// Lists every position whose movement leaves `[-maxDownward, maxUpward]`.
/// Reporting only; the optimizer never rejects on these.
pub fn check_constraints(
    restored: &[SamplePoint],
    plan: &[PlanPoint],
    options: &OptimizerOptions,
) -> Result<ConstraintReport, OptimizerError> {
    let params = options.resolve()?;
    validate_plan_inputs(restored, plan)?;
    let mut report = ConstraintReport::default();

    for i in 0..plan.len() {
        let m = movement_at(restored, plan, i);
        let (kind, limit, excess) = if m > params.max_upward {
            (ViolationKind::Upward, params.max_upward, m - params.max_upward)
        } else if m < 0.0 && -m > params.max_downward {
            (ViolationKind::Downward, params.max_downward, -m - params.max_downward)
        } else {
            continue;
        };
        match kind {
            ViolationKind::Upward => report.upward_violations += 1,
            ViolationKind::Downward => report.downward_violations += 1,
        }
        report.max_excess = report.max_excess.max(excess);
        report.violations.push(ConstraintViolation {
            index: i,
            position: plan[i].position,
            movement: m,
            kind,
            limit,
            excess,
        });
    }
    report.within_limits = report.violations.is_empty();
    Ok(report)
}
