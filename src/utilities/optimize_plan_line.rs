use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::utilities::errors::OptimizerError;
use crate::utilities::evaluate_plan_line::{
    OptimizerOptions, OptimizerParameters, PlanLineStats, evaluate_plan_line, movements,
    reference_value, validate_plan_inputs,
};
use crate::utilities::structs::{PlanPoint, SamplePoint};
use crate::utilities::utilities::clipped_moving_average;

const ZERO_BAND: f64 = 0.3;
const AMPLIFY: f64 = 1.5;
const PLAN_HALF_WINDOW: usize = 5;
const LIFT_MARGIN: f64 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationImprovement {
    pub upward_ratio: f64,
    pub score: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationRecord {
    pub iteration: usize,
    pub upward_ratio: f64,
    pub score: f64,
    pub best_score: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub optimized_plan_line: Vec<PlanPoint>,
    pub initial_statistics: PlanLineStats,
    pub statistics: PlanLineStats,
    pub iterations: usize,
    pub converged: bool,
    pub cancelled: bool,
    pub improvement: OptimizationImprovement,
    pub history: Vec<IterationRecord>,
    pub parameters: OptimizerParameters,
}

pub fn optimize_plan_line(
    restored: &[SamplePoint],
    initial: &[PlanPoint],
    options: &OptimizerOptions,
) -> Result<OptimizationResult, OptimizerError> {
    let never = AtomicBool::new(false);
    optimize_plan_line_with_cancel(restored, initial, options, &never)
}

/// Same as [`optimize_plan_line`], but stops at the next iteration boundary
/// once `cancel` is set or `timeLimitMs` has elapsed. The best plan seen so far
/// is still returned.
pub fn optimize_plan_line_with_cancel(
    restored: &[SamplePoint],
    initial: &[PlanPoint],
    options: &OptimizerOptions,
    cancel: &AtomicBool,
) -> Result<OptimizationResult, OptimizerError> {
    let params = options.resolve()?;
    if initial.is_empty() {
        return Err(OptimizerError::EmptyPlanLine);
    }
    validate_plan_inputs(restored, initial)?;
    if restored.len() != initial.len() {
        tracing::warn!(
            restored = restored.len(),
            plan = initial.len(),
            "length mismatch, unmatched positions count as zero movement"
        );
    }

    let initial_stats = evaluate_plan_line(restored, initial, &params);
    let target = params.target_upward_ratio;
    if initial_stats.upward_ratio >= target {
        return Ok(OptimizationResult {
            optimized_plan_line: initial.to_vec(),
            initial_statistics: initial_stats,
            statistics: initial_stats,
            iterations: 0,
            converged: true,
            cancelled: false,
            improvement: OptimizationImprovement::default(),
            history: Vec::new(),
            parameters: params,
        });
    }

    let deadline = params
        .time_limit_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));
    let mut current = initial.to_vec();
    let mut best = current.clone();
    let mut best_stats = initial_stats;
    let mut history = Vec::new();
    let mut iterations = 0usize;
    let mut converged = false;
    let mut cancelled = false;

    while iterations < params.iteration_limit {
        if cancel.load(Ordering::Relaxed) || deadline.is_some_and(|d| Instant::now() >= d) {
            cancelled = true;
            break;
        }
        current = adjust_plan_line(restored, &current, &params);
        iterations += 1;

        let stats = evaluate_plan_line(restored, &current, &params);
        if stats.score > best_stats.score {
            best.clone_from(&current);
            best_stats = stats;
        }
        history.push(IterationRecord {
            iteration: iterations,
            upward_ratio: stats.upward_ratio,
            score: stats.score,
            best_score: best_stats.score,
        });
        tracing::debug!(
            iteration = iterations,
            ratio = stats.upward_ratio,
            score = stats.score,
            "plan line iteration"
        );

        // plateau is measured against the initial ratio, not the previous iteration
        if stats.upward_ratio >= target
            || (stats.upward_ratio - initial_stats.upward_ratio).abs() < params.convergence_threshold
        {
            converged = true;
            break;
        }
    }

    tracing::info!(
        iterations,
        converged,
        cancelled,
        initial_ratio = initial_stats.upward_ratio,
        final_ratio = best_stats.upward_ratio,
        "plan line optimization finished"
    );

    Ok(OptimizationResult {
        optimized_plan_line: best,
        initial_statistics: initial_stats,
        statistics: best_stats,
        iterations,
        converged,
        cancelled,
        improvement: OptimizationImprovement {
            upward_ratio: best_stats.upward_ratio - initial_stats.upward_ratio,
            score: best_stats.score - initial_stats.score,
        },
        history,
        parameters: params,
    })
}

/// Per-position movement rule: shrink lowering, amplify small lifts.
#[inline]
pub fn adjust_movement(m: f64, params: &OptimizerParameters) -> f64 {
    let max_down = params.max_downward;
    let max_up = params.max_upward;
    if m < 0.0 {
        let down = -m;
        if down > max_down {
            -max_down
        } else if down < ZERO_BAND * max_down {
            0.0
        } else {
            m * 0.5
        }
    } else if m > 0.0 && m < 0.5 * max_up {
        (m * AMPLIFY).min(max_up * params.target_upward_ratio)
    } else {
        m
    }
}

/// One optimizer step over the whole plan line.
pub fn adjust_plan_line(
    restored: &[SamplePoint],
    plan: &[PlanPoint],
    params: &OptimizerParameters,
) -> Vec<PlanPoint> {
    let n = plan.len();
    let prev = movements(restored, plan);
    let adjusted: Vec<f64> = prev.iter().map(|&m| adjust_movement(m, params)).collect();

    let mut candidate = vec![0.0f64; n];
    for i in 0..n {
        let m = if i == 0 || i + 1 == n {
            adjusted[i]
        } else {
            0.25 * prev[i - 1] + 0.5 * adjusted[i] + 0.25 * prev[i + 1]
        };
        candidate[i] = reference_value(restored, plan, i) + m;
    }

    let mut values = clipped_moving_average(&candidate, PLAN_HALF_WINDOW);
    if params.lift_to_target {
        let refs: Vec<f64> = (0..n).map(|i| reference_value(restored, plan, i)).collect();
        lift_toward_target(&mut values, &refs, params);
    }

    plan.iter()
        .zip(values)
        .map(|(p, v)| PlanPoint::new(p.position, v))
        .collect()
}

/// Raises the plan uniformly so that `ceil(target·n)` positions lift, without
/// pushing any position past `max_upward`.
fn lift_toward_target(values: &mut [f64], refs: &[f64], params: &OptimizerParameters) {
    let n = values.len();
    if n == 0 {
        return;
    }
    let mut moves: Vec<f64> = values.iter().zip(refs).map(|(v, r)| v - r).collect();
    let highest = moves.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    moves.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let need = ((params.target_upward_ratio * n as f64 - 1e-9).ceil() as usize).clamp(1, n);
    let kth = moves[need - 1];
    if kth > 0.0 {
        return;
    }
    let offset = (LIFT_MARGIN - kth).min(params.max_upward - highest);
    if offset > 0.0 {
        tracing::debug!(offset, "lifting plan line toward target ratio");
        for v in values.iter_mut() {
            *v += offset;
        }
    }
}
