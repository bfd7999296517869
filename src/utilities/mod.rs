pub mod apply_correction;
pub use apply_correction::{CorrectionResult, CorrectionStatistics, apply_correction};

pub mod batch_correction;
pub use batch_correction::{BatchItem, BatchReport, batch_correction};

pub mod calculate_baseline;
pub use calculate_baseline::{AlsMethod, CorrectionOptions, CorrectionParameters, calculate_baseline};

pub mod check_constraints;
pub use check_constraints::{ConstraintReport, ConstraintViolation, ViolationKind, check_constraints};

pub mod cubic_spline;
pub use cubic_spline::CubicSpline;

pub mod errors;
pub use errors::{AlsError, ErrorKind, OptimizerError};

pub mod evaluate_plan_line;
pub use evaluate_plan_line::{OptimizerOptions, OptimizerParameters, PlanLineStats, evaluate_plan_line};

pub mod fft;
pub use fft::{fft, ifft};

pub mod generate_report;
pub use generate_report::{OptimizationReport, generate_report};

pub mod optimize_plan_line;
pub use optimize_plan_line::{
    OptimizationResult, optimize_plan_line, optimize_plan_line_with_cancel,
};

pub mod polynomial_fit;
pub use polynomial_fit::{polynomial_eval, polynomial_fit};

pub mod structs;

pub mod utilities;
pub use utilities::{binomial_smooth, clipped_moving_average, rms, series_statistics};
