//! Numeric state capability shared by every state type the integrator works with.

use std::fmt::Debug;
use std::ops::Mul;

use num_traits::Zero;
use simba::scalar::{ClosedAdd, ClosedNeg, ClosedSub};

/// A real-valued state of fixed dimension.
///
/// The integrator only needs closed addition, subtraction, negation, scaling by an `f64`
/// and a norm. It is implemented for `f64` and for [`StateVector`](crate::StateVector).
pub trait State:
    Copy + Debug + PartialEq + Zero + ClosedAdd + ClosedSub + ClosedNeg + Mul<f64, Output = Self>
{
    /// Inner product.
    fn dot(&self, other: &Self) -> f64;

    /// Euclidean norm, `sqrt(self · self)`.
    fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Returns `true` if every component is finite.
    fn is_finite(&self) -> bool;
}

impl State for f64 {
    fn dot(&self, other: &Self) -> f64 {
        self * other
    }

    fn norm(&self) -> f64 {
        self.abs()
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::State;

    #[test]
    fn test_scalar_state() {
        let y: f64 = -2.5;
        assert_eq!(State::norm(&y), 2.5);
        assert_eq!(3.0_f64.dot(&-2.0), -6.0);
        assert!(State::is_finite(&1.0e300_f64));
        assert!(!State::is_finite(&f64::NAN));
        assert!(!State::is_finite(&f64::NEG_INFINITY));
    }
}
