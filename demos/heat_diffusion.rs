// Heat diffusion along a rod discretised on 15 interior nodes, and a search for the time at
// which the temperature profile has converged to the steady state.

use dopri_ivp::{Ivp, StateVector};
use std::error::Error;

const NODES: usize = 15;

type State = StateVector<NODES>;
type Time = f64;

/// Diffusivity.
const KAPPA: f64 = 1.0;
/// End points of the rod.
const A: f64 = 0.0;
const B: f64 = 1.0;
const T0: Time = 0.0;

const H_INIT: f64 = 1e-4;
const H_RANGE: (f64, f64) = (1e-6, 1e-2);
const EPS_ABS: f64 = 1e-6;

/// Interval between two convergence checks. The time scale of the rod is L^2 / KAPPA = 1,
/// so the profile is checked several times per unit of time.
const SEARCH_JUMP: Time = 0.1;

fn main() {
    env_logger::init();

    for &max_error in &[1.0, 1e-1, 1e-2] {
        match has_converged(max_error) {
            Ok(t) => println!("Within {} of the steady state at t = {}", max_error, t),
            Err(e) => println!("An error occured: {}", e),
        }
    }
}

/// Initial temperature.
fn u0(_x: f64) -> f64 {
    20.0
}

/// Temperature imposed at the left end.
fn ua(_t: Time) -> f64 {
    100.0
}

/// Temperature imposed at the right end.
fn ub(_t: Time) -> f64 {
    0.0
}

fn spacing() -> f64 {
    (B - A) / (NODES + 1) as f64
}

fn system(t: Time, w: &State) -> State {
    let h2 = spacing() * spacing();
    let mut dw = State::zeros();
    for k in 0..NODES {
        let left = if k == 0 { ua(t) } else { w[k - 1] };
        let right = if k == NODES - 1 { ub(t) } else { w[k + 1] };
        dw[k] = KAPPA * (left - 2.0 * w[k] + right) / h2;
    }
    dw
}

/// Returns the first checked time at which every node is within `max_error` of the linear
/// steady state. Times are checked every `SEARCH_JUMP` without refinement.
fn has_converged(max_error: f64) -> Result<Time, Box<dyn Error>> {
    let h = spacing();
    let mut initial_state = State::zeros();
    for k in 0..NODES {
        initial_state[k] = u0(A + (k + 1) as f64 * h);
    }

    let mut u = Ivp::with_norm(
        system,
        T0,
        initial_state,
        H_INIT,
        H_RANGE,
        EPS_ABS,
        State::norm,
    )?;

    let slope = (ub(T0) - ua(T0)) / (B - A);
    let mut t = T0;
    loop {
        t += SEARCH_JUMP;
        let state = u.evaluate(t)?;
        let converged = (0..NODES).all(|k| {
            let steady = ua(T0) + slope * (k + 1) as f64 * h;
            (state[k] - steady).abs() <= max_error
        });
        if converged {
            log::debug!("{}", u.stats());
            return Ok(t);
        }
    }
}
