//! Fixed-dimension real vector used as the state of a system of ODEs.

use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use nalgebra::SVector;
use num_traits::Zero;

use crate::dop_shared::DimensionMismatch;
use crate::state::State;

/// Vector of `N` real components with value semantics.
///
/// The dimension is part of the type, so every operation is allocation free and two
/// vectors of different dimensions cannot be mixed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateVector<const N: usize>(SVector<f64, N>);

impl<const N: usize> StateVector<N> {
    /// Creates a vector from its components.
    pub fn new(components: [f64; N]) -> Self {
        StateVector(SVector::from(components))
    }

    /// Vector with every component equal to zero.
    pub fn zeros() -> Self {
        StateVector(SVector::zeros())
    }

    /// Vector with every component equal to `value`.
    pub fn from_element(value: f64) -> Self {
        StateVector(SVector::from_element(value))
    }

    /// Creates a vector from a slice, which must hold exactly `N` values.
    pub fn from_slice(values: &[f64]) -> Result<Self, DimensionMismatch> {
        if values.len() != N {
            return Err(DimensionMismatch {
                expected: N,
                found: values.len(),
            });
        }
        Ok(StateVector(SVector::from_column_slice(values)))
    }

    /// Number of components.
    pub const fn dim(&self) -> usize {
        N
    }

    /// Inner product.
    pub fn dot(&self, other: &Self) -> f64 {
        self.0.dot(&other.0)
    }

    /// Euclidean norm. Usable as the norm function of an [`Ivp`](crate::Ivp).
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Returns the component at `index`, or `None` if it is out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.as_slice().get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Underlying nalgebra vector.
    pub fn into_inner(self) -> SVector<f64, N> {
        self.0
    }
}

impl<const N: usize> State for StateVector<N> {
    fn dot(&self, other: &Self) -> f64 {
        StateVector::dot(self, other)
    }

    fn norm(&self) -> f64 {
        StateVector::norm(self)
    }

    fn is_finite(&self) -> bool {
        self.0.iter().all(|value| value.is_finite())
    }
}

impl<const N: usize> Default for StateVector<N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize> Zero for StateVector<N> {
    fn zero() -> Self {
        Self::zeros()
    }

    fn is_zero(&self) -> bool {
        self.0.iter().all(|value| *value == 0.0)
    }
}

impl<const N: usize> From<[f64; N]> for StateVector<N> {
    fn from(components: [f64; N]) -> Self {
        Self::new(components)
    }
}

impl<const N: usize> From<f64> for StateVector<N> {
    fn from(value: f64) -> Self {
        Self::from_element(value)
    }
}

impl<const N: usize> From<SVector<f64, N>> for StateVector<N> {
    fn from(vector: SVector<f64, N>) -> Self {
        StateVector(vector)
    }
}

impl<const N: usize> TryFrom<&[f64]> for StateVector<N> {
    type Error = DimensionMismatch;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        Self::from_slice(values)
    }
}

impl<const N: usize> Index<usize> for StateVector<N> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl<const N: usize> IndexMut<usize> for StateVector<N> {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl<const N: usize> Neg for StateVector<N> {
    type Output = Self;

    fn neg(self) -> Self {
        StateVector(-self.0)
    }
}

impl<const N: usize> Add for StateVector<N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        StateVector(self.0 + rhs.0)
    }
}

impl<const N: usize> AddAssign for StateVector<N> {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl<const N: usize> Sub for StateVector<N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        StateVector(self.0 - rhs.0)
    }
}

impl<const N: usize> SubAssign for StateVector<N> {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl<const N: usize> Mul<f64> for StateVector<N> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        StateVector(self.0 * rhs)
    }
}

impl<const N: usize> Mul<StateVector<N>> for f64 {
    type Output = StateVector<N>;

    fn mul(self, rhs: StateVector<N>) -> StateVector<N> {
        rhs * self
    }
}

impl<const N: usize> MulAssign<f64> for StateVector<N> {
    fn mul_assign(&mut self, rhs: f64) {
        self.0 *= rhs;
    }
}

impl<const N: usize> fmt::Display for StateVector<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
