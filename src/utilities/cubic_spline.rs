use crate::utilities::errors::AlsError;

/// Natural cubic spline. Segment `j` is
/// `a[j] + b[j]·t + c[j]·t² + d[j]·t³` with `t = x - knots[j]`.
#[derive(Clone, Debug)]
pub struct CubicSpline {
    knots: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl CubicSpline {
    pub fn natural(xs: &[f64], ys: &[f64]) -> Result<Self, AlsError> {
        let n = xs.len();
        if n != ys.len() {
            return Err(AlsError::MismatchedLengths {
                left: n,
                right: ys.len(),
            });
        }
        if n < 2 {
            return Err(AlsError::InvalidKnots("need at least two knots"));
        }
        let mut h = vec![0.0f64; n - 1];
        for i in 0..(n - 1) {
            h[i] = xs[i + 1] - xs[i];
            if !(h[i] > 0.0) {
                return Err(AlsError::InvalidKnots("knots must be strictly increasing"));
            }
        }

        // tridiagonal solve for c (second derivative / 2), c[0] = c[n-1] = 0
        let mut alpha = vec![0.0f64; n];
        for i in 1..(n - 1) {
            alpha[i] = 3.0 / h[i] * (ys[i + 1] - ys[i]) - 3.0 / h[i - 1] * (ys[i] - ys[i - 1]);
        }
        let mut l = vec![1.0f64; n];
        let mut mu = vec![0.0f64; n];
        let mut z = vec![0.0f64; n];
        for i in 1..(n - 1) {
            l[i] = 2.0 * (xs[i + 1] - xs[i - 1]) - h[i - 1] * mu[i - 1];
            mu[i] = h[i] / l[i];
            z[i] = (alpha[i] - h[i - 1] * z[i - 1]) / l[i];
        }

        let mut c = vec![0.0f64; n];
        let mut b = vec![0.0f64; n - 1];
        let mut d = vec![0.0f64; n - 1];
        for j in (0..(n - 1)).rev() {
            c[j] = z[j] - mu[j] * c[j + 1];
            b[j] = (ys[j + 1] - ys[j]) / h[j] - h[j] * (c[j + 1] + 2.0 * c[j]) / 3.0;
            d[j] = (c[j + 1] - c[j]) / (3.0 * h[j]);
        }
        c.truncate(n - 1);

        Ok(Self {
            knots: xs.to_vec(),
            a: ys[..n - 1].to_vec(),
            b,
            c,
            d,
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        let j = self.segment(x);
        let t = x - self.knots[j];
        self.a[j] + t * (self.b[j] + t * (self.c[j] + t * self.d[j]))
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    fn segment(&self, x: f64) -> usize {
        let last = self.a.len() - 1;
        if x <= self.knots[0] {
            return 0;
        }
        for j in 0..=last {
            if x >= self.knots[j] && x <= self.knots[j + 1] {
                return j;
            }
        }
        last
    }
}
