//! Shared traits and structures for the integrator.

use std::fmt;
use thiserror::Error;

/// Right-hand side of the system of ordinary differential equations `y' = f(t, y)`.
///
/// Implemented for every `Fn(f64, &V) -> V`, so closures and plain functions can be
/// passed directly. The function must be deterministic; it is evaluated at intermediate
/// stage combinations, not only at accepted states.
pub trait System<V> {
    /// Returns the derivative of the state at time `t`.
    fn system(&self, t: f64, y: &V) -> V;
}

impl<V, F> System<V> for F
where
    F: Fn(f64, &V) -> V,
{
    fn system(&self, t: f64, y: &V) -> V {
        self(t, y)
    }
}

/// Errors raised when the integrator is built with inconsistent parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("The initial time t0 = {t0} is not finite.")]
    InvalidInitialTime { t0: f64 },
    #[error("Invalid step size range [{h_min}, {h_max}]: expected 0 < h_min <= h_max.")]
    InvalidStepRange { h_min: f64, h_max: f64 },
    #[error("Initial step size h = {h} lies outside [{h_min}, {h_max}].")]
    InitialStepOutOfRange { h: f64, h_min: f64, h_max: f64 },
    #[error("The absolute tolerance must be positive and finite, got {eps_abs}.")]
    InvalidTolerance { eps_abs: f64 },
    #[error("The initial state or its derivative is not finite.")]
    NonFiniteInitialState,
}

/// Enumeration of the errors that may arise during integration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IntegrationError {
    #[error("Cannot evaluate at t = {t}, before the initial time t0 = {t0}.")]
    BeforeInitialTime { t: f64, t0: f64 },
    #[error("Cannot evaluate at the non-finite time t = {t}.")]
    NonFiniteTime { t: f64 },
    #[error("Stopped at t = {t}. The right-hand side produced a non-finite state.")]
    NonFiniteState { t: f64 },
    #[error("Stopped at t = {t}. Step size underflow.")]
    StepSizeUnderflow { t: f64 },
    #[error("The output increment must be positive and finite, got dx = {dx}.")]
    InvalidOutputStep { dx: f64 },
}

/// Error returned when a vector is built from a slice of the wrong length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Expected {expected} components, found {found}.")]
pub struct DimensionMismatch {
    pub expected: usize,
    pub found: usize,
}

/// Contains some statistics of the integration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub num_eval: u32,
    pub accepted_steps: u32,
    pub rejected_steps: u32,
    /// Steps accepted at the minimum step size although the error exceeded the tolerance.
    /// They are also counted in `accepted_steps`.
    pub degraded_steps: u32,
}

impl Stats {
    pub(crate) fn new() -> Stats {
        Stats::default()
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Number of function evaluations: {}", self.num_eval)?;
        writeln!(f, "Number of accepted steps: {}", self.accepted_steps)?;
        writeln!(f, "Number of rejected steps: {}", self.rejected_steps)?;
        write!(f, "Number of degraded steps: {}", self.degraded_steps)
    }
}
