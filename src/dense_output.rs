//! Cubic Hermite dense output between two accepted steps.

use crate::state::State;
use crate::trajectory::StepRecord;

/// Evaluates the cubic Hermite polynomial through `left` and `right` at `t`.
///
/// The polynomial matches the states and derivatives of both records, so it is continuous
/// and once differentiable across consecutive intervals.
pub fn hermite<V: State>(left: &StepRecord<V>, right: &StepRecord<V>, t: f64) -> V {
    let h = right.t - left.t;
    let theta = (t - left.t) / h;
    let theta2 = theta * theta;
    let theta3 = theta2 * theta;

    let h00 = 2.0 * theta3 - 3.0 * theta2 + 1.0;
    let h10 = theta3 - 2.0 * theta2 + theta;
    let h01 = -2.0 * theta3 + 3.0 * theta2;
    let h11 = theta3 - theta2;

    left.y * h00 + left.dy * (h * h10) + right.y * h01 + right.dy * (h * h11)
}

/// Evaluates the time derivative of the Hermite polynomial of [`hermite`] at `t`.
pub fn hermite_derivative<V: State>(left: &StepRecord<V>, right: &StepRecord<V>, t: f64) -> V {
    let h = right.t - left.t;
    let theta = (t - left.t) / h;
    let theta2 = theta * theta;

    // The basis derivatives for the two states are opposite, d00 = -d01.
    let d01 = 6.0 * (theta - theta2);
    let d10 = 3.0 * theta2 - 4.0 * theta + 1.0;
    let d11 = 3.0 * theta2 - 2.0 * theta;

    (right.y - left.y) * (d01 / h) + left.dy * d10 + right.dy * d11
}
