// Third order RC ladder low-pass filter driven by a sum of sines.

use dopri_ivp::{Ivp, StateVector};
use std::f64::consts::PI;

type State = StateVector<3>;
type Time = f64;

/// Critical frequency of the filter.
const FC: f64 = 0.5;
const R: f64 = 1.0;

fn main() {
    env_logger::init();

    let t_max = 20.0;
    let dt = 0.1;

    let mut ivp = match Ivp::with_norm(
        LowPass::system,
        0.0,
        State::zeros(),
        0.05,
        (1e-5, 0.1),
        1e-5,
        State::norm,
    ) {
        Ok(ivp) => ivp,
        Err(e) => {
            println!("An error occured: {}", e);
            return;
        }
    };

    // y[0] is the output of the filter.
    match ivp.dense_output(t_max, dt) {
        Ok((times, states)) => {
            for (t, y) in times.iter().zip(states.iter()) {
                println!("{:.1}, {:.6}, {:.6}", t, input(*t), y[0]);
            }
            println!("{}", ivp.stats());
        }
        Err(e) => println!("An error occured: {}", e),
    }

    println!("phase = {:.6}", LowPass::phase(1.0 / (2.0 * PI)));
}

/// Input signal.
fn input(t: Time) -> f64 {
    t.sin() + (10.0 * t).sin() + (5.0 * t).sin()
}

struct LowPass;

impl LowPass {
    fn capacitance() -> f64 {
        1.0 / (2.0 * PI * R * FC)
    }

    fn system(t: Time, y: &State) -> State {
        let rc = R * Self::capacitance();
        State::new([
            (y[1] - y[0]) / rc,
            (y[0] + y[2] - 2.0 * y[1]) / rc,
            (input(t) + y[0] - 2.0 * y[1]) / rc,
        ])
    }

    /// Phase shift of the response to a sine of frequency `f`.
    fn phase(f: f64) -> f64 {
        let wrc = 2.0 * PI * f * R * Self::capacitance();
        (3.0 * wrc / (1.0 - wrc * wrc)).atan()
            - ((6.0 * wrc - wrc * wrc) / (1.0 - 2.0 * wrc - 3.0 * wrc * wrc)).atan()
    }
}
