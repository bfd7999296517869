use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utilities::check_constraints::ConstraintReport;
use crate::utilities::optimize_plan_line::OptimizationResult;

const MAJORITY_RATIO: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub initial_upward_ratio: f64,
    pub final_upward_ratio: f64,
    pub target_upward_ratio: f64,
    pub ratio_improvement: f64,
    pub score_improvement: f64,
    pub iterations: usize,
    pub converged: bool,
    pub cancelled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementCounts {
    pub total: usize,
    pub upward: usize,
    pub downward: usize,
    pub zero: usize,
    pub max_upward: f64,
    pub max_downward: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub summary: ReportSummary,
    pub counts: MovementCounts,
    pub violations: usize,
    pub recommendation: String,
}

pub fn generate_report(
    result: &OptimizationResult,
    constraints: &ConstraintReport,
) -> OptimizationReport {
    let s = &result.statistics;
    let target = result.parameters.target_upward_ratio;
    let summary = ReportSummary {
        initial_upward_ratio: result.initial_statistics.upward_ratio,
        final_upward_ratio: s.upward_ratio,
        target_upward_ratio: target,
        ratio_improvement: result.improvement.upward_ratio,
        score_improvement: result.improvement.score,
        iterations: result.iterations,
        converged: result.converged,
        cancelled: result.cancelled,
    };
    let counts = MovementCounts {
        total: s.total_points,
        upward: s.upward_points,
        downward: s.downward_points,
        zero: s.zero_points,
        max_upward: s.max_upward,
        max_downward: s.max_downward,
    };
    let violations = constraints.violations.len();
    OptimizationReport {
        recommendation: recommendation(s.upward_ratio, target, violations),
        summary,
        counts,
        violations,
    }
}

pub fn recommendation(ratio: f64, target: f64, violations: usize) -> String {
    let pct = ratio * 100.0;
    if ratio >= target && violations == 0 {
        format!(
            "Upward ratio {pct:.1}% meets the {:.1}% target within movement limits; the plan line can be adopted.",
            target * 100.0
        )
    } else if ratio >= target {
        format!(
            "Upward ratio {pct:.1}% meets the target, but {violations} position(s) exceed movement limits; review those sections before adopting."
        )
    } else if ratio >= MAJORITY_RATIO {
        format!(
            "Lifting is predominant ({pct:.1}%) but below the {:.1}% target; raise the plan line locally where lowering remains.",
            target * 100.0
        )
    } else {
        format!(
            "Lowering dominates ({pct:.1}% upward); re-plan the section or relax the downward limit."
        )
    }
}

impl fmt::Display for OptimizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        let c = &self.counts;
        writeln!(f, "Upward-priority optimization")?;
        writeln!(
            f,
            "  upward ratio: {:.1}% -> {:.1}% (target {:.1}%)",
            s.initial_upward_ratio * 100.0,
            s.final_upward_ratio * 100.0,
            s.target_upward_ratio * 100.0
        )?;
        writeln!(
            f,
            "  iterations: {} (converged: {}, cancelled: {})",
            s.iterations, s.converged, s.cancelled
        )?;
        writeln!(
            f,
            "  points: {} up / {} down / {} zero of {}",
            c.upward, c.downward, c.zero, c.total
        )?;
        writeln!(
            f,
            "  max lift {:.2} mm, max lowering {:.2} mm, violations {}",
            c.max_upward, c.max_downward, self.violations
        )?;
        write!(f, "  {}", self.recommendation)
    }
}
