//! Cubic bezier easing curves
//!
//! A curve runs from (0, 0) to (1, 1) with two interior control points. To
//! ease a time value `x` we first find the curve parameter `t` whose x
//! coordinate is `x`, then return the y coordinate at that `t`.
//!
//! The parameter search is seeded from a table of x samples taken at
//! construction, refined by a fixed number of Newton-Raphson steps, and falls
//! back to bisection where the curve is too flat for Newton to be stable. The
//! cost per call is bounded, so it is safe to evaluate every frame.

use crate::error::{AnimationError, Result};

const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f64 = 0.001;
const SUBDIVISION_PRECISION: f64 = 0.000_000_1;
const SUBDIVISION_MAX_ITERATIONS: usize = 10;

const SPLINE_TABLE_SIZE: usize = 11;
const SAMPLE_STEP_SIZE: f64 = 1.0 / (SPLINE_TABLE_SIZE as f64 - 1.0);

/// An immutable cubic bezier easing curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    /// x(t) at t = 0, 0.1, ..., 1.0
    samples: [f64; SPLINE_TABLE_SIZE],
    /// The curve is the diagonal y = x
    linear: bool,
}

impl CubicBezier {
    /// Build a curve from its control points `(x1, y1)` and `(x2, y2)`.
    ///
    /// Both x values must lie in `[0, 1]` so that x(t) stays a function of
    /// time. The y values are free, which allows overshooting curves.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        if !((0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2)) {
            return Err(AnimationError::InvalidCurveParameters { x1, x2 });
        }

        let linear = x1 == y1 && x2 == y2;
        let mut samples = [0.0; SPLINE_TABLE_SIZE];
        if !linear {
            for (i, sample) in samples.iter_mut().enumerate() {
                *sample = bezier_sample(i as f64 * SAMPLE_STEP_SIZE, x1, x2);
            }
        }

        Ok(Self {
            x1,
            y1,
            x2,
            y2,
            samples,
            linear,
        })
    }

    /// Control points as `[x1, y1, x2, y2]`
    pub fn control_points(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Whether the curve is the identity mapping
    pub fn is_linear(&self) -> bool {
        self.linear
    }

    /// x coordinate at curve parameter `t`
    pub fn sample_x(&self, t: f64) -> f64 {
        bezier_sample(t, self.x1, self.x2)
    }

    /// y coordinate at curve parameter `t`
    pub fn sample_y(&self, t: f64) -> f64 {
        bezier_sample(t, self.y1, self.y2)
    }

    /// Map normalized time to normalized progress.
    ///
    /// Input is clamped to `[0, 1]`. The endpoints map exactly to 0 and 1,
    /// and linear curves return their input unchanged.
    pub fn evaluate(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        if self.linear {
            return x;
        }
        // Endpoints are always exact
        if x == 0.0 {
            return 0.0;
        }
        if x == 1.0 {
            return 1.0;
        }
        self.sample_y(self.solve_t(x))
    }

    /// Find the curve parameter `t` with `x(t) ≈ x`.
    pub fn solve_t(&self, x: f64) -> f64 {
        if self.linear {
            return x;
        }

        // Locate the table interval containing x
        let last_sample = SPLINE_TABLE_SIZE - 1;
        let mut current = 1;
        while current != last_sample && self.samples[current] <= x {
            current += 1;
        }
        current -= 1;
        let interval_start = current as f64 * SAMPLE_STEP_SIZE;

        // Interpolate within the interval for an initial guess
        let span = self.samples[current + 1] - self.samples[current];
        let dist = if span > 0.0 {
            (x - self.samples[current]) / span
        } else {
            0.0
        };
        let guess = interval_start + dist * SAMPLE_STEP_SIZE;

        let initial_slope = bezier_slope(guess, self.x1, self.x2);
        if initial_slope >= NEWTON_MIN_SLOPE {
            newton_raphson(x, guess, self.x1, self.x2)
        } else if initial_slope == 0.0 {
            guess
        } else {
            binary_subdivide(
                x,
                interval_start,
                interval_start + SAMPLE_STEP_SIZE,
                self.x1,
                self.x2,
            )
        }
    }
}

impl TryFrom<[f64; 4]> for CubicBezier {
    type Error = AnimationError;

    fn try_from([x1, y1, x2, y2]: [f64; 4]) -> Result<Self> {
        Self::new(x1, y1, x2, y2)
    }
}

/// Fixed-cost Newton-Raphson refinement; no convergence check.
fn newton_raphson(x: f64, guess: f64, p1: f64, p2: f64) -> f64 {
    let mut t = guess;
    for _ in 0..NEWTON_ITERATIONS {
        let slope = bezier_slope(t, p1, p2);
        if slope == 0.0 {
            return t;
        }
        t -= (bezier_sample(t, p1, p2) - x) / slope;
    }
    t
}

/// Bisection over `[a, b]` for flat regions of the curve.
fn binary_subdivide(x: f64, mut a: f64, mut b: f64, p1: f64, p2: f64) -> f64 {
    let mut t = a;
    for _ in 0..SUBDIVISION_MAX_ITERATIONS {
        t = a + (b - a) / 2.0;
        let err = bezier_sample(t, p1, p2) - x;
        if err > 0.0 {
            b = t;
        } else {
            a = t;
        }
        if err.abs() <= SUBDIVISION_PRECISION {
            break;
        }
    }
    t
}

/// Evaluate cubic bezier at parameter t: B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    // Horner form: ((1-3p2+3p1)t + 3p2-6p1)t + 3p1) * t
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative of cubic bezier: B'(t) = 3(1-t)²·p1 + 6(1-t)t·(p2-p1) + 3t²·(1-p2)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
