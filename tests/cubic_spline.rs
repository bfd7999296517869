use trackline::utilities::cubic_spline::CubicSpline;
use trackline::utilities::errors::AlsError;

mod helpers;
use helpers::approx_eq;

#[test]
fn passes_through_every_knot() {
    let xs = vec![0.0, 1.0, 2.5, 4.0, 4.5];
    let ys = vec![1.0, 3.0, 0.0, 2.0, -1.0];
    let s = CubicSpline::natural(&xs, &ys).unwrap();
    for (x, y) in xs.iter().zip(&ys) {
        assert!(approx_eq(s.eval(*x), *y, 1e-12), "x={x}");
    }
}

// collinear knots give a straight line, also outside the knot range
#[test]
fn collinear_knots_reproduce_the_line() {
    let xs = vec![0.0, 1.0, 2.0, 3.0, 4.0];
    let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
    let s = CubicSpline::natural(&xs, &ys).unwrap();
    for x in [0.3, 1.7, 2.2, 3.9] {
        assert!(approx_eq(s.eval(x), 2.0 * x + 1.0, 1e-12));
    }
    assert!(approx_eq(s.eval(-1.0), -1.0, 1e-12));
    assert!(approx_eq(s.eval(5.0), 11.0, 1e-12));
}

#[test]
fn two_knots_interpolate_linearly() {
    let s = CubicSpline::natural(&[0.0, 2.0], &[0.0, 4.0]).unwrap();
    assert!(approx_eq(s.eval(0.5), 1.0, 1e-12));
    assert_eq!(s.knots(), &[0.0, 2.0]);
}

#[test]
fn smooth_between_knots() {
    let xs: Vec<f64> = (0..9).map(|i| i as f64 * 0.5).collect();
    let ys: Vec<f64> = xs.iter().map(|x| x.sin()).collect();
    let s = CubicSpline::natural(&xs, &ys).unwrap();
    for x in [0.75, 1.25, 2.1, 2.9] {
        assert!(approx_eq(s.eval(x), f64::sin(x), 0.02), "x={x}");
    }
}

#[test]
fn rejects_bad_knots() {
    assert!(matches!(
        CubicSpline::natural(&[1.0], &[1.0]),
        Err(AlsError::InvalidKnots(_))
    ));
    assert!(matches!(
        CubicSpline::natural(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]),
        Err(AlsError::InvalidKnots(_))
    ));
    assert!(matches!(
        CubicSpline::natural(&[0.0, 1.0], &[0.0]),
        Err(AlsError::MismatchedLengths { .. })
    ));
}
