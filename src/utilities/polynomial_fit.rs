use crate::utilities::errors::AlsError;

const PIVOT_EPS: f64 = 1e-12;

/// Least-squares polynomial coefficients, lowest degree first.
///
/// Builds the `(degree+1)²` normal equations and solves them with
/// [`solve_linear_system`].
pub fn polynomial_fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Vec<f64>, AlsError> {
    if xs.len() != ys.len() {
        return Err(AlsError::MismatchedLengths {
            left: xs.len(),
            right: ys.len(),
        });
    }
    if degree >= xs.len() {
        return Err(AlsError::TooFewPoints {
            got: xs.len(),
            min: degree.saturating_add(1),
        });
    }
    let m = degree + 1;

    // sums of x^0 .. x^(2·degree)
    let mut pow_sums = vec![0.0f64; 2 * degree + 1];
    let mut rhs = vec![0.0f64; m];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut p = 1.0f64;
        for k in 0..pow_sums.len() {
            pow_sums[k] += p;
            if k < m {
                rhs[k] += y * p;
            }
            p *= x;
        }
    }

    let mut a = vec![vec![0.0f64; m]; m];
    for i in 0..m {
        for j in 0..m {
            a[i][j] = pow_sums[i + j];
        }
    }
    solve_linear_system(a, rhs)
}

/// Gaussian elimination with partial pivoting and back substitution.
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, AlsError> {
    let n = b.len();
    if a.len() != n {
        return Err(AlsError::MismatchedLengths {
            left: a.len(),
            right: n,
        });
    }

    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_abs = a[col][col].abs();
        for r in (col + 1)..n {
            let v = a[r][col].abs();
            if v > pivot_abs {
                pivot_abs = v;
                pivot_row = r;
            }
        }
        if pivot_row != col {
            a.swap(col, pivot_row);
            b.swap(col, pivot_row);
        }
        if !(pivot_abs > PIVOT_EPS) {
            return Err(AlsError::SingularMatrix { column: col });
        }

        for r in (col + 1)..n {
            let factor = a[r][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for c in col..n {
                a[r][c] -= factor * a[col][c];
            }
            b[r] -= factor * b[col];
        }
    }

    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut s = b[i];
        for j in (i + 1)..n {
            s -= a[i][j] * x[j];
        }
        x[i] = s / a[i][i];
        if !x[i].is_finite() {
            return Err(AlsError::SingularMatrix { column: i });
        }
    }
    Ok(x)
}

#[inline]
pub fn polynomial_eval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
