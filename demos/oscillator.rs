// Exponential decay and harmonic oscillator compared with their exact solutions.

use dopri_ivp::{Ivp, StateVector};
use std::f64::consts::PI;

type State = StateVector<2>;
type Time = f64;

fn main() {
    env_logger::init();

    // y' = -y, y(0) = 1
    let decay = |_t: Time, y: &f64| -y;
    let mut y1 = match Ivp::new(decay, 0.0, 1.0, 0.1, (1e-5, 0.2), 1e-5) {
        Ok(ivp) => ivp,
        Err(e) => {
            println!("An error occured: {}", e);
            return;
        }
    };

    for i in 0..=50 {
        let t = i as f64 * 0.1;
        match y1.evaluate(t) {
            Ok(y) => println!("y1({:.1}) = {:.16} (= {:.16})", t, y, (-t).exp()),
            Err(e) => println!("An error occured: {}", e),
        }
    }
    println!("{}", y1.stats());

    // y'' + y = 0, y(0) = 1, y'(0) = 0
    let mut y2 = match Ivp::with_norm(
        system,
        0.0,
        State::new([1.0, 0.0]),
        0.1,
        (1e-5, 0.2),
        1e-8,
        State::norm,
    ) {
        Ok(ivp) => ivp,
        Err(e) => {
            println!("An error occured: {}", e);
            return;
        }
    };

    for n in 0..=16 {
        let t = PI * n as f64 / 8.0;
        match y2.evaluate(t) {
            Ok(y) => println!("y2({}*pi/8) = {:.16} (= {:.16})", n, y[0], t.cos()),
            Err(e) => println!("An error occured: {}", e),
        }
    }
    println!("{}", y2.stats());
}

fn system(_t: Time, y: &State) -> State {
    State::new([y[1], -y[0]])
}
