use trackline::utilities::check_constraints::{ViolationKind, check_constraints};
use trackline::utilities::errors::OptimizerError;
use trackline::utilities::evaluate_plan_line::OptimizerOptions;

mod helpers;
use helpers::{approx_eq, constant_series, series_from_values};

#[test]
fn reports_each_violation_with_excess() {
    let restored = constant_series(6, 0.25, 0.0);
    let plan = series_from_values(&[0.0, 55.0, -12.0, -10.0, 50.0, -3.0], 0.25);
    let report = check_constraints(&restored, &plan, &OptimizerOptions::default()).unwrap();

    assert!(!report.within_limits);
    assert_eq!(report.violations.len(), 2);
    assert_eq!(report.upward_violations, 1);
    assert_eq!(report.downward_violations, 1);

    let up = &report.violations[0];
    assert_eq!(up.index, 1);
    assert_eq!(up.kind, ViolationKind::Upward);
    assert_eq!(up.position, 0.25);
    assert_eq!(up.limit, 50.0);
    assert!(approx_eq(up.excess, 5.0, 1e-12));

    let down = &report.violations[1];
    assert_eq!(down.index, 2);
    assert_eq!(down.kind, ViolationKind::Downward);
    assert_eq!(down.movement, -12.0);
    assert!(approx_eq(down.excess, 2.0, 1e-12));

    assert!(approx_eq(report.max_excess, 5.0, 1e-12));
}

// exactly on the limit is allowed
#[test]
fn limits_are_inclusive() {
    let restored = constant_series(3, 0.25, 2.0);
    let plan = series_from_values(&[52.0, -8.0, 2.0], 0.25);
    let report = check_constraints(&restored, &plan, &OptimizerOptions::default()).unwrap();
    assert!(report.within_limits);
    assert_eq!(report.max_excess, 0.0);
}

#[test]
fn custom_limits_apply() {
    let restored = constant_series(4, 0.25, 0.0);
    let plan = series_from_values(&[6.0, -3.0, 1.0, -1.0], 0.25);
    let opts = OptimizerOptions {
        max_upward: Some(5.0),
        max_downward: Some(2.0),
        ..Default::default()
    };
    let report = check_constraints(&restored, &plan, &opts).unwrap();
    let idx: Vec<usize> = report.violations.iter().map(|v| v.index).collect();
    assert_eq!(idx, [0, 1]);
}

#[test]
fn invalid_limits_are_rejected() {
    let restored = constant_series(2, 0.25, 0.0);
    let opts = OptimizerOptions {
        max_upward: Some(f64::NAN),
        ..Default::default()
    };
    assert!(check_constraints(&restored, &restored, &opts).is_err());
}

#[test]
fn violations_serialize_in_camel_case() {
    let restored = constant_series(1, 0.25, 0.0);
    let plan = series_from_values(&[-20.0], 0.25);
    let report = check_constraints(&restored, &plan, &OptimizerOptions::default()).unwrap();
    let v = serde_json::to_value(&report).unwrap();
    assert_eq!(v["withinLimits"], false);
    assert_eq!(v["downwardViolations"], 1);
    assert_eq!(v["violations"][0]["kind"], "downward");
}

#[test]
fn non_finite_movement_is_rejected() {
    let restored = constant_series(4, 0.25, 0.0);
    let plan = series_from_values(&[1.0, f64::NAN, 60.0, 0.0], 0.25);
    assert_eq!(
        check_constraints(&restored, &plan, &OptimizerOptions::default()).unwrap_err(),
        OptimizerError::InvalidNumericValue {
            field: "plan value",
            index: 1
        }
    );
}
