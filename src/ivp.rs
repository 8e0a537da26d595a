//! Initial value problem solved on demand with the Dormand-Prince 5(4) pair.

use crate::controller::{Controller, StepDecision};
use crate::dop_shared::*;
use crate::stages::attempt_step;
use crate::state::State;
use crate::trajectory::{StepRecord, Trajectory};

/// Upper bound on the number of samples returned by [`Ivp::dense_output`].
const MAX_OUTPUT_POINTS: f64 = 1.0E8;

/// Initial value problem `y' = f(t, y)`, `y(t0) = y0`, evaluated lazily.
///
/// The solution is computed forward from `t0` only as far as the queries require. Every
/// accepted step is cached, so later queries inside the explored range are answered by
/// cubic Hermite interpolation without calling `f` again.
///
/// The step size adapts to keep the norm of the local error estimate below `eps_abs`.
/// When the tolerance cannot be met even at the minimum step size, the step is accepted
/// anyway to guarantee progress: the accuracy then degrades silently, which can be
/// monitored through [`Stats::degraded_steps`].
///
/// Queries take `&mut self`, so sharing an instance between threads requires external
/// synchronisation such as a `Mutex`.
pub struct Ivp<V, F, N = fn(&V) -> f64> {
    f: F,
    norm: N,
    trajectory: Trajectory<V>,
    controller: Controller,
    h: f64,
    stats: Stats,
}

impl<V, F> Ivp<V, F>
where
    V: State,
    F: System<V>,
{
    /// Default initializer, measuring the local error with [`State::norm`].
    ///
    /// # Arguments
    ///
    /// * `f`       - Right-hand side of the system, a closure or a type implementing `System<V>`
    /// * `t0`      - Initial time
    /// * `y0`      - Initial state
    /// * `h`       - Initial trial step size, within `h_range`
    /// * `h_range` - Minimum and maximum step sizes, with `0 < h_min <= h_max`
    /// * `eps_abs` - Absolute tolerance on the norm of the local error estimate
    ///
    pub fn new(
        f: F,
        t0: f64,
        y0: V,
        h: f64,
        h_range: (f64, f64),
        eps_abs: f64,
    ) -> Result<Self, ConfigError> {
        let norm: fn(&V) -> f64 = <V as State>::norm;
        Ivp::with_norm(f, t0, y0, h, h_range, eps_abs, norm)
    }
}

impl<V, F, N> Ivp<V, F, N>
where
    V: State,
    F: System<V>,
    N: Fn(&V) -> f64,
{
    /// Initializer with a custom norm for the local error estimate.
    ///
    /// # Arguments
    ///
    /// * `f`       - Right-hand side of the system, a closure or a type implementing `System<V>`
    /// * `t0`      - Initial time
    /// * `y0`      - Initial state
    /// * `h`       - Initial trial step size, within `h_range`
    /// * `h_range` - Minimum and maximum step sizes, with `0 < h_min <= h_max`
    /// * `eps_abs` - Absolute tolerance on the norm of the local error estimate
    /// * `norm`    - Norm used to measure the local error estimate
    ///
    pub fn with_norm(
        f: F,
        t0: f64,
        y0: V,
        h: f64,
        h_range: (f64, f64),
        eps_abs: f64,
        norm: N,
    ) -> Result<Self, ConfigError> {
        let (h_min, h_max) = h_range;
        if !t0.is_finite() {
            return Err(ConfigError::InvalidInitialTime { t0 });
        }
        if !(h_min > 0.0 && h_min <= h_max && h_max.is_finite()) {
            return Err(ConfigError::InvalidStepRange { h_min, h_max });
        }
        if !(h >= h_min && h <= h_max) {
            return Err(ConfigError::InitialStepOutOfRange { h, h_min, h_max });
        }
        if !(eps_abs > 0.0 && eps_abs.is_finite()) {
            return Err(ConfigError::InvalidTolerance { eps_abs });
        }

        let dy0 = f.system(t0, &y0);
        if !y0.is_finite() || !dy0.is_finite() {
            return Err(ConfigError::NonFiniteInitialState);
        }

        log::debug!(
            "new ivp at t0 = {}, h = {}, h_range = [{}, {}], eps_abs = {}",
            t0,
            h,
            h_min,
            h_max,
            eps_abs
        );

        let mut stats = Stats::new();
        stats.num_eval += 1;
        Ok(Self {
            f,
            norm,
            trajectory: Trajectory::new(StepRecord {
                t: t0,
                y: y0,
                dy: dy0,
            }),
            controller: Controller::new(h_min, h_max, eps_abs),
            h,
            stats,
        })
    }

    /// Approximates the solution at `t >= t0`.
    ///
    /// Integrates forward if `t` lies beyond the cached trajectory. `evaluate(t0)` returns
    /// `y0` and any accepted step time returns the accepted state exactly.
    pub fn evaluate(&mut self, t: f64) -> Result<V, IntegrationError> {
        self.check_time(t)?;
        self.extend_to(t)?;
        Ok(self.trajectory.value_at(t))
    }

    /// Approximates the derivative of the solution at `t >= t0`, from the same dense output
    /// as [`evaluate`](Ivp::evaluate).
    pub fn evaluate_derivative(&mut self, t: f64) -> Result<V, IntegrationError> {
        self.check_time(t)?;
        self.extend_to(t)?;
        Ok(self.trajectory.derivative_at(t))
    }

    /// Samples the solution on `t0, t0 + dx, t0 + 2 dx, ...` up to `t_end`.
    ///
    /// Fails with `InvalidOutputStep` if `dx` is not positive and finite, or if the grid
    /// would hold more than 10^8 samples.
    pub fn dense_output(
        &mut self,
        t_end: f64,
        dx: f64,
    ) -> Result<(Vec<f64>, Vec<V>), IntegrationError> {
        if !(dx > 0.0 && dx.is_finite()) {
            return Err(IntegrationError::InvalidOutputStep { dx });
        }
        self.check_time(t_end)?;

        let t0 = self.t0();
        // Keep t_end when dx divides the interval up to rounding.
        let n_intervals = ((t_end - t0) / dx + 1.0E-9).floor();
        if !(n_intervals < MAX_OUTPUT_POINTS) {
            return Err(IntegrationError::InvalidOutputStep { dx });
        }
        self.extend_to(t_end)?;

        let t_out: Vec<f64> = (0..=n_intervals as usize)
            .map(|i| (t0 + i as f64 * dx).min(t_end))
            .collect();
        let y_out = t_out.iter().map(|&t| self.trajectory.value_at(t)).collect();
        Ok((t_out, y_out))
    }

    /// Integrates forward until the trajectory covers `t`.
    ///
    /// Does nothing if `t` is already cached, which includes every `t <= t0`. A non-finite
    /// `t` is rejected with `NonFiniteTime`. On error the trajectory keeps every step
    /// accepted before the failure.
    pub fn extend_to(&mut self, t: f64) -> Result<(), IntegrationError> {
        if !t.is_finite() {
            return Err(IntegrationError::NonFiniteTime { t });
        }

        let accepted_before = self.stats.accepted_steps;
        while self.trajectory.last().t < t {
            let last = *self.trajectory.last();
            let attempt = attempt_step(&self.f, last.t, &last.y, &last.dy, self.h);
            self.stats.num_eval += attempt.num_eval;

            let err = (self.norm)(&attempt.error);
            if !attempt.is_finite() || !err.is_finite() {
                log::warn!("non-finite state in step from t = {} with h = {}", last.t, self.h);
                return Err(IntegrationError::NonFiniteState { t: last.t });
            }
            if attempt.t <= last.t {
                return Err(IntegrationError::StepSizeUnderflow { t: last.t });
            }

            let mut h_new = self.h;
            let decision = self.controller.accept(err, self.h, &mut h_new);
            match decision {
                StepDecision::Accepted => {
                    log::trace!(
                        "accepted step to t = {} (h = {}, err = {})",
                        attempt.t,
                        self.h,
                        err
                    );
                }
                StepDecision::Degraded => {
                    self.stats.degraded_steps += 1;
                    log::debug!(
                        "accepted step to t = {} at h_min = {} with err = {} > eps_abs = {}",
                        attempt.t,
                        self.h,
                        err,
                        self.controller.eps_abs()
                    );
                }
                StepDecision::Rejected => {
                    self.stats.rejected_steps += 1;
                    log::debug!(
                        "rejected step from t = {} (h = {}, err = {}), retrying with h = {}",
                        last.t,
                        self.h,
                        err,
                        h_new
                    );
                }
            }

            if decision.is_accepted() {
                self.stats.accepted_steps += 1;
                self.trajectory.push(StepRecord {
                    t: attempt.t,
                    y: attempt.y,
                    dy: attempt.dy,
                });
            }
            self.h = h_new;
        }

        let n_step = self.stats.accepted_steps - accepted_before;
        if n_step > 0 {
            log::debug!(
                "extended trajectory to t = {} with {} steps",
                self.trajectory.last().t,
                n_step
            );
        }
        Ok(())
    }

    fn check_time(&self, t: f64) -> Result<(), IntegrationError> {
        if !t.is_finite() {
            return Err(IntegrationError::NonFiniteTime { t });
        }
        let t0 = self.t0();
        if t < t0 {
            return Err(IntegrationError::BeforeInitialTime { t, t0 });
        }
        Ok(())
    }

    /// Initial time.
    pub fn t0(&self) -> f64 {
        self.trajectory.first().t
    }

    /// Initial state.
    pub fn y0(&self) -> V {
        self.trajectory.first().y
    }

    /// Cached accepted steps.
    pub fn trajectory(&self) -> &Trajectory<V> {
        &self.trajectory
    }

    /// Trial step size of the next attempt.
    pub fn step_size(&self) -> f64 {
        self.h
    }

    /// Step size controller, holding the step bounds and the tolerance.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Statistics accumulated over every query.
    pub fn stats(&self) -> Stats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StateVector;
    use approx::assert_relative_eq;

    // dy/dt = (5 t^2 - y) / exp(t + y)
    fn test1(t: f64, y: &f64) -> f64 {
        (5. * t * t - y) / (t + y).exp()
    }

    #[test]
    fn test_evaluate_test1() {
        let mut ivp = Ivp::new(test1, 0., 1., 0.1, (1e-6, 0.2), 1e-10).unwrap();
        assert_relative_eq!(ivp.evaluate(0.5).unwrap(), 0.913059243, epsilon = 1.0E-6);
        assert!(ivp.trajectory().last().t >= 0.5);
    }

    #[test]
    fn test_initial_time_needs_no_step() {
        let mut ivp = Ivp::new(|_t: f64, y: &f64| -y, 0.0, 1.0, 0.1, (1e-5, 0.2), 1e-5).unwrap();
        assert_eq!(ivp.evaluate(0.0).unwrap(), 1.0);
        assert_eq!(ivp.evaluate_derivative(0.0).unwrap(), -1.0);
        assert_eq!(ivp.trajectory().len(), 1);
        assert_eq!(ivp.stats().num_eval, 1);
    }

    #[test]
    fn test_invalid_configuration() {
        let f = |_t: f64, y: &f64| -y;
        assert_eq!(
            Ivp::new(f, 0.0, 1.0, 0.1, (0.0, 0.2), 1e-5).err(),
            Some(ConfigError::InvalidStepRange {
                h_min: 0.0,
                h_max: 0.2
            })
        );
        assert_eq!(
            Ivp::new(f, 0.0, 1.0, 0.1, (0.3, 0.2), 1e-5).err(),
            Some(ConfigError::InvalidStepRange {
                h_min: 0.3,
                h_max: 0.2
            })
        );
        assert_eq!(
            Ivp::new(f, 0.0, 1.0, 0.5, (1e-5, 0.2), 1e-5).err(),
            Some(ConfigError::InitialStepOutOfRange {
                h: 0.5,
                h_min: 1e-5,
                h_max: 0.2
            })
        );
        assert_eq!(
            Ivp::new(f, 0.0, 1.0, 0.1, (1e-5, 0.2), 0.0).err(),
            Some(ConfigError::InvalidTolerance { eps_abs: 0.0 })
        );
        assert!(matches!(
            Ivp::new(f, f64::NAN, 1.0, 0.1, (1e-5, 0.2), 1e-5),
            Err(ConfigError::InvalidInitialTime { .. })
        ));
        assert_eq!(
            Ivp::new(f, 0.0, f64::INFINITY, 0.1, (1e-5, 0.2), 1e-5).err(),
            Some(ConfigError::NonFiniteInitialState)
        );
    }

    #[test]
    fn test_custom_norm() {
        let f = |_t: f64, y: &StateVector<2>| StateVector::new([y[1], -y[0]]);
        let max_norm = |y: &StateVector<2>| y.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()));
        let mut ivp = Ivp::with_norm(
            f,
            0.0,
            StateVector::new([1.0, 0.0]),
            0.1,
            (1e-5, 0.2),
            1e-8,
            max_norm,
        )
        .unwrap();

        let y = ivp.evaluate(1.0).unwrap();
        assert_relative_eq!(y[0], 1.0_f64.cos(), epsilon = 1e-6);
        assert_relative_eq!(y[1], -(1.0_f64.sin()), epsilon = 1e-6);
    }

    #[test]
    fn test_dense_output_grid() {
        let mut ivp = Ivp::new(|_t: f64, y: &f64| -y, 0.0, 1.0, 0.1, (1e-5, 0.2), 1e-8).unwrap();
        let (t_out, y_out) = ivp.dense_output(6.0, 0.1).unwrap();

        assert_eq!(t_out.len(), 61);
        assert_eq!(y_out.len(), 61);
        assert_eq!(t_out[0], 0.0);
        assert_eq!(*t_out.last().unwrap(), 6.0);
        for (t, y) in t_out.iter().zip(y_out.iter()) {
            assert_relative_eq!(*y, (-t).exp(), epsilon = 1e-5);
        }

        assert_eq!(
            ivp.dense_output(1.0, 0.0).err(),
            Some(IntegrationError::InvalidOutputStep { dx: 0.0 })
        );
    }

    #[test]
    fn test_dense_output_too_many_samples() {
        let mut ivp = Ivp::new(|_t: f64, y: &f64| -y, 0.0, 1.0, 0.1, (1e-5, 0.2), 1e-8).unwrap();

        assert_eq!(
            ivp.dense_output(1.0, 1e-300).err(),
            Some(IntegrationError::InvalidOutputStep { dx: 1e-300 })
        );
        assert_eq!(
            ivp.dense_output(1.0, f64::MIN_POSITIVE).err(),
            Some(IntegrationError::InvalidOutputStep {
                dx: f64::MIN_POSITIVE
            })
        );
        // Rejected before any step is taken.
        assert_eq!(ivp.trajectory().len(), 1);

        let (t_out, _) = ivp.dense_output(1.0, 0.5).unwrap();
        assert_eq!(t_out, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_extend_to_before_initial_time() {
        let mut ivp = Ivp::new(|_t: f64, y: &f64| -y, 1.0, 1.0, 0.1, (1e-5, 0.2), 1e-8).unwrap();

        assert_eq!(ivp.extend_to(0.5), Ok(()));
        assert_eq!(ivp.extend_to(1.0), Ok(()));
        assert_eq!(ivp.trajectory().len(), 1);
        assert_eq!(ivp.stats().num_eval, 1);

        assert_eq!(
            ivp.extend_to(f64::NEG_INFINITY),
            Err(IntegrationError::NonFiniteTime {
                t: f64::NEG_INFINITY
            })
        );
        assert_eq!(
            ivp.evaluate(0.5),
            Err(IntegrationError::BeforeInitialTime { t: 0.5, t0: 1.0 })
        );
        assert!(matches!(
            ivp.dense_output(0.5, 0.1),
            Err(IntegrationError::BeforeInitialTime { .. })
        ));
    }
}
