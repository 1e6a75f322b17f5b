//! Sample statistics and the chi-square tail probability

use serde::{Deserialize, Serialize};

const EPSILON: f64 = 1e-14;
const TINY: f64 = 1e-300;
const MAX_ITERATIONS: usize = 1000;

/// Summary of a series of samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub mean: f64,
    /// Sample variance (divides by `n - 1`)
    pub variance: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

/// Accumulates samples
#[derive(Debug, Clone, Default)]
pub struct Series {
    values: Vec<f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub fn stats(&self) -> Stats {
        let mean = self.mean();
        let n = self.values.len();

        let variance = if n < 2 {
            0.0
        } else {
            self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        };

        let (min, max) = if n == 0 {
            (0.0, 0.0)
        } else {
            self.values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };

        Stats {
            mean,
            variance,
            stddev: variance.sqrt(),
            min,
            max,
        }
    }
}

impl Extend<f64> for Series {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

/// Probability that a chi-square variable with `dof` degrees of freedom
/// exceeds `chi2`
pub fn chi_square_p_value(dof: usize, chi2: f64) -> f64 {
    if chi2 <= 0.0 || dof == 0 {
        return 1.0;
    }
    gamma_q(dof as f64 / 2.0, chi2 / 2.0)
}

/// Regularized upper incomplete gamma function Q(a, x)
fn gamma_q(a: f64, x: f64) -> f64 {
    if x < a + 1.0 {
        1.0 - gamma_p_series(a, x)
    } else {
        gamma_q_continued_fraction(a, x)
    }
}

fn gamma_p_series(a: f64, x: f64) -> f64 {
    let mut ap = a;
    let mut term = 1.0 / a;
    let mut sum = term;
    for _ in 0..MAX_ITERATIONS {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * EPSILON {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

// Modified Lentz evaluation
fn gamma_q_continued_fraction(a: f64, x: f64) -> f64 {
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..MAX_ITERATIONS {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + an / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }
    (-x + a * x.ln() - ln_gamma(a)).exp() * h
}

/// Lanczos approximation of ln Γ(x) for x > 0
fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    let x = x - 1.0;
    let t = x + G + 0.5;
    let series = COEFFICIENTS[1..]
        .iter()
        .enumerate()
        .fold(COEFFICIENTS[0], |acc, (i, &c)| acc + c / (x + i as f64 + 1.0));

    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_series_stats() {
        let mut series = Series::new();
        series.extend([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        let stats = series.stats();
        assert!(close(stats.mean, 5.0, 1e-12));
        assert!(close(stats.variance, 32.0 / 7.0, 1e-12));
        assert!(close(stats.stddev, (32.0f64 / 7.0).sqrt(), 1e-12));
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn test_series_degenerate() {
        let empty = Series::new();
        assert_eq!(empty.stats().mean, 0.0);

        let mut single = Series::new();
        single.add(3.0);
        assert_eq!(single.stats().stddev, 0.0);
        assert_eq!(single.stats().mean, 3.0);
    }

    #[test]
    fn test_ln_gamma() {
        assert!(close(ln_gamma(1.0), 0.0, 1e-10));
        assert!(close(ln_gamma(5.0), 24f64.ln(), 1e-10));
        assert!(close(ln_gamma(0.5), std::f64::consts::PI.sqrt().ln(), 1e-10));
    }

    #[test]
    fn test_chi_square_two_dof_is_exponential() {
        for x in [0.5, 2.0, 7.5] {
            assert!(close(chi_square_p_value(2, x), (-x / 2.0).exp(), 1e-10));
        }
    }

    #[test]
    fn test_chi_square_critical_values() {
        assert!(close(chi_square_p_value(1, 3.841_459), 0.05, 1e-5));
        assert!(close(chi_square_p_value(10, 18.307_038), 0.05, 1e-5));
        assert!(close(chi_square_p_value(4, 1.0), 1.5 * (-0.5f64).exp(), 1e-10));
    }

    #[test]
    fn test_chi_square_edges() {
        assert_eq!(chi_square_p_value(3, 0.0), 1.0);
        assert!(chi_square_p_value(3, 1e4) < 1e-10);
    }
}
