//! # Dormand-Prince IVP
//! `dopri_ivp` solves initial value problems `y' = f(t, y)`, `y(t0) = y0` with the adaptive
//! Dormand-Prince 5(4) pair. The trajectory is integrated forward on demand and cached, and
//! any time at or after `t0` can be queried through cubic Hermite dense output.
//!
//! ```
//! use dopri_ivp::{Ivp, StateVector};
//!
//! // y'' = -y as a first order system, y(0) = 1, y'(0) = 0.
//! let f = |_t: f64, y: &StateVector<2>| StateVector::new([y[1], -y[0]]);
//! let mut ivp = Ivp::new(f, 0.0, StateVector::new([1.0, 0.0]), 0.1, (1e-5, 0.2), 1e-8)?;
//!
//! let y = ivp.evaluate(1.0)?;
//! assert!((y[0] - 1.0_f64.cos()).abs() < 1e-6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Declare modules
pub mod butcher_tableau;
pub mod controller;
pub mod dense_output;
pub mod dop_shared;
pub mod ivp;
pub mod stages;
pub mod state;
pub mod trajectory;
pub mod vector;

pub use controller::{Controller, StepDecision};
pub use dop_shared::{ConfigError, DimensionMismatch, IntegrationError, Stats, System};
pub use ivp::Ivp;
pub use state::State;
pub use trajectory::{StepRecord, Trajectory};
pub use vector::StateVector;
