//! Linear-regression straightness criterion.
//!
//! Ordinary least squares of latitude against longitude over a window, with
//! the correlation coefficient, two-sided p-value and slope standard error.
//! The p-value comes from the t distribution with n - 2 degrees of freedom,
//! evaluated through the regularized incomplete beta function.

use crate::track::TrackPoint;

/// Fit statistics of one window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    pub p_value: f64,
    pub std_err: f64,
}

const TINY: f64 = 1e-20;

/// Fits latitude against longitude over all points of a window.
///
/// Degenerate inputs never fail: all-identical longitudes (a vertical line in
/// the coordinate plane) and windows of fewer than two points report the
/// all-zero "not a line" result.
pub fn fit_line(window: &[TrackPoint]) -> RegressionResult {
    let n = window.len();
    if n < 2 || window.iter().all(|p| p.longitude == window[0].longitude) {
        return RegressionResult::default();
    }

    let nf = n as f64;
    let x_mean = window.iter().map(|p| p.longitude).sum::<f64>() / nf;
    let y_mean = window.iter().map(|p| p.latitude).sum::<f64>() / nf;

    let mut ss_xm = 0.0;
    let mut ss_ym = 0.0;
    let mut ss_xym = 0.0;
    for point in window {
        let dx = point.longitude - x_mean;
        let dy = point.latitude - y_mean;
        ss_xm += dx * dx;
        ss_ym += dy * dy;
        ss_xym += dx * dy;
    }
    ss_xm /= nf;
    ss_ym /= nf;
    ss_xym /= nf;

    let r_den = (ss_xm * ss_ym).sqrt();
    let r_value = if r_den == 0.0 {
        0.0
    } else {
        (ss_xym / r_den).clamp(-1.0, 1.0)
    };

    let slope = ss_xym / ss_xm;
    let intercept = y_mean - slope * x_mean;

    let df = nf - 2.0;
    let (p_value, std_err) = if n == 2 {
        // Two points define a line exactly; there is no residual to test.
        (if r_value.abs() < 1.0 { 1.0 } else { 0.0 }, 0.0)
    } else {
        let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
        let p = incomplete_beta(df / 2.0, 0.5, df / (df + t * t));
        let std_err = ((1.0 - r_value * r_value) * ss_ym / ss_xm / df).sqrt();
        (p, std_err)
    };

    RegressionResult {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
    }
}

/// Straightness verdict of a fit.
pub fn is_straight_by_regression(result: &RegressionResult, r_value_threshold: f64) -> bool {
    result.r_value.abs() > r_value_threshold
}

/// Regularized incomplete beta function I_x(a, b), evaluated by the
/// continued-fraction expansion with the symmetry transformation applied
/// where the fraction converges fastest.
fn incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    if x < (a + 1.0) / (a + b + 2.0) {
        ln_front.exp() * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - ln_front.exp() * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Continued fraction for the incomplete beta function (modified Lentz).
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITERATIONS: usize = 200;
    const EPS: f64 = 3e-14;
    const FPMIN: f64 = 1e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < FPMIN {
        d = FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Natural log of the gamma function (Lanczos approximation, g = 7).
fn ln_gamma(x: f64) -> f64 {
    const COEFFICIENTS: [f64; 8] = [
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];
    use std::f64::consts::PI;

    if x < 0.5 {
        // Reflection formula keeps the approximation on x >= 0.5.
        (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut acc = 0.999_999_999_999_809_93;
        for (i, &coefficient) in COEFFICIENTS.iter().enumerate() {
            acc += coefficient / (x + (i + 1) as f64);
        }
        let t = x + 7.5;
        0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
    }
}
