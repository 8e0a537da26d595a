//! Adaptive step size control.

use crate::butcher_tableau::dopri54::ORDER;

/// Default minimum factor between two successive steps.
pub const FAC_MIN: f64 = 0.2;
/// Default maximum factor between two successive steps.
pub const FAC_MAX: f64 = 5.0;

/// Decision taken by the [`Controller`] on an attempted step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDecision {
    /// The error is within tolerance.
    Accepted,
    /// The error exceeds the tolerance but the step is already at the minimum step size.
    /// The step is kept so that the integration keeps moving forward.
    Degraded,
    /// The step must be retried with the new step size.
    Rejected,
}

impl StepDecision {
    /// Returns `true` if the step is appended to the trajectory.
    pub fn is_accepted(self) -> bool {
        self != StepDecision::Rejected
    }
}

/// Used for adaptive step size control
#[derive(Clone, Debug)]
pub struct Controller {
    h_min: f64,
    h_max: f64,
    eps_abs: f64,
    fac_min: f64,
    fac_max: f64,
    exponent: f64,
}

impl Controller {
    /// Creates a controller with the default factor bounds.
    ///
    /// # Arguments
    ///
    /// * `h_min`   - Minimum step size
    /// * `h_max`   - Maximum step size
    /// * `eps_abs` - Absolute tolerance on the norm of the local error estimate
    ///
    pub fn new(h_min: f64, h_max: f64, eps_abs: f64) -> Controller {
        Controller::from_param(h_min, h_max, eps_abs, FAC_MIN, FAC_MAX)
    }

    /// Creates a controller responsible for adaptive step size control.
    ///
    /// # Arguments
    ///
    /// * `h_min`   - Minimum step size
    /// * `h_max`   - Maximum step size
    /// * `eps_abs` - Absolute tolerance on the norm of the local error estimate
    /// * `fac_min` - Minimum factor between two successive steps
    /// * `fac_max` - Maximum factor between two successive steps
    ///
    pub fn from_param(
        h_min: f64,
        h_max: f64,
        eps_abs: f64,
        fac_min: f64,
        fac_max: f64,
    ) -> Controller {
        Controller {
            h_min,
            h_max,
            eps_abs,
            fac_min,
            fac_max,
            exponent: 1.0 / f64::from(ORDER),
        }
    }

    /// Determines if the step must be accepted or rejected and adapts the step size accordingly.
    ///
    /// `err` is the norm of the local error estimate of a step of size `h`. The next trial
    /// step is written to `h_new` and always lies in `[h_min, h_max]`.
    pub fn accept(&self, err: f64, h: f64, h_new: &mut f64) -> StepDecision {
        let fac = if err > 0.0 {
            (self.eps_abs / err)
                .powf(self.exponent)
                .clamp(self.fac_min, self.fac_max)
        } else {
            self.fac_max
        };
        *h_new = self.clamp(h * fac);

        if err <= self.eps_abs {
            StepDecision::Accepted
        } else if h <= self.h_min {
            StepDecision::Degraded
        } else {
            StepDecision::Rejected
        }
    }

    /// Clamps a step size into `[h_min, h_max]`.
    pub fn clamp(&self, h: f64) -> f64 {
        h.max(self.h_min).min(self.h_max)
    }

    /// Returns the minimum step size allowed.
    pub fn h_min(&self) -> f64 {
        self.h_min
    }

    /// Returns the maximum step size allowed.
    pub fn h_max(&self) -> f64 {
        self.h_max
    }

    /// Returns the absolute tolerance.
    pub fn eps_abs(&self) -> f64 {
        self.eps_abs
    }
}
