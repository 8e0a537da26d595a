//! Stage evaluation for one attempted step of the Dormand-Prince pair.

use crate::butcher_tableau::dopri54::{A, C, E, STAGES};
use crate::dop_shared::System;
use crate::state::State;

/// Outcome of one attempted step, before the controller decides on it.
#[derive(Clone, Copy, Debug)]
pub struct StepAttempt<V> {
    /// Time at the end of the step.
    pub t: f64,
    /// Fifth order solution at `t`.
    pub y: V,
    /// Derivative at `(t, y)`, i.e. the last stage.
    pub dy: V,
    /// Difference between the fifth and fourth order solutions.
    pub error: V,
    /// Number of right-hand side evaluations performed.
    pub num_eval: u32,
}

impl<V: State> StepAttempt<V> {
    /// Returns `true` if the new state, its derivative and the error estimate are finite.
    pub fn is_finite(&self) -> bool {
        self.t.is_finite() && self.y.is_finite() && self.dy.is_finite() && self.error.is_finite()
    }
}

/// Attempts a step of size `h` from `(t, y)`.
///
/// `dy` must be the derivative at `(t, y)`. It is used as the first stage, so only the
/// six remaining stages call the right-hand side.
pub fn attempt_step<V, F>(f: &F, t: f64, y: &V, dy: &V, h: f64) -> StepAttempt<V>
where
    V: State,
    F: System<V>,
{
    let mut k = [*dy; STAGES];
    let mut y_next = *y;
    for s in 1..STAGES {
        y_next = *y;
        for (j, k_value) in k.iter().enumerate().take(s) {
            if A[s][j] != 0.0 {
                y_next = y_next + *k_value * (h * A[s][j]);
            }
        }
        k[s] = f.system(t + C[s] * h, &y_next);
    }

    // The argument of the last stage is the fifth order solution.
    let mut error = V::zero();
    for (k_value, e) in k.iter().zip(E.iter()) {
        if *e != 0.0 {
            error = error + *k_value * (h * e);
        }
    }

    StepAttempt {
        t: t + h,
        y: y_next,
        dy: k[STAGES - 1],
        error,
        num_eval: (STAGES - 1) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::butcher_tableau::dopri54::B_LOW;
    use crate::StateVector;
    use approx::assert_relative_eq;

    #[test]
    fn test_polynomial_is_integrated_exactly() {
        // y' = 5t^4 is integrated exactly by a fifth order method.
        let f = |t: f64, _y: &f64| 5.0 * t.powi(4);
        let attempt = attempt_step(&f, 0.0, &0.0, &0.0, 1.0);
        assert_relative_eq!(attempt.y, 1.0, epsilon = 1e-14);
        assert_relative_eq!(attempt.dy, 5.0, epsilon = 1e-14);
        assert_eq!(attempt.t, 1.0);
        assert_eq!(attempt.num_eval, 6);
    }

    #[test]
    fn test_error_is_difference_of_embedded_solutions() {
        let f = |_t: f64, y: &f64| -y;
        let (t, y, h) = (0.0, 1.0, 0.5);
        let attempt = attempt_step(&f, t, &y, &f(t, &y), h);

        // Rebuild the stages to form the fourth order solution directly.
        let mut k = [0.0; STAGES];
        k[0] = f(t, &y);
        for s in 1..STAGES {
            let mut y_stage = y;
            for j in 0..s {
                y_stage += h * A[s][j] * k[j];
            }
            k[s] = f(t + C[s] * h, &y_stage);
        }
        let y_low = y + h * k.iter().zip(B_LOW.iter()).map(|(k, b)| k * b).sum::<f64>();

        assert_relative_eq!(attempt.error, attempt.y - y_low, epsilon = 1e-15);
        assert_relative_eq!(attempt.y, (-h).exp(), epsilon = 1e-4);
        assert_relative_eq!(attempt.dy, -attempt.y, epsilon = 1e-15);
    }

    #[test]
    fn test_vector_stages() {
        let f = |_t: f64, y: &StateVector<2>| StateVector::new([y[1], -y[0]]);
        let y0 = StateVector::new([1.0, 0.0]);
        let attempt = attempt_step(&f, 0.0, &y0, &f(0.0, &y0), 0.01);
        assert_relative_eq!(attempt.y[0], 0.01_f64.cos(), epsilon = 1e-12);
        assert_relative_eq!(attempt.y[1], -(0.01_f64.sin()), epsilon = 1e-12);
        assert!(attempt.is_finite());
        assert!(attempt.error.norm() < 1e-12);
    }

    #[test]
    fn test_non_finite_stage_is_reported() {
        let f = |t: f64, y: &f64| if t > 0.0 { f64::NAN } else { *y };
        let attempt = attempt_step(&f, 0.0, &1.0, &1.0, 0.1);
        assert!(!attempt.is_finite());
    }
}
