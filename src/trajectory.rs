//! Append-only cache of accepted steps and the continuous output built on top of it.

use crate::dense_output::{hermite, hermite_derivative};
use crate::state::State;

/// Accepted state `y` at time `t` together with its derivative `dy`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepRecord<V> {
    pub t: f64,
    pub y: V,
    pub dy: V,
}

/// Position of a time inside the cached range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Location {
    /// The time of the record at this index.
    Record(usize),
    /// Strictly between the record at this index and the next one.
    Interval(usize),
}

/// Time-ordered sequence of accepted steps, starting with the initial condition.
///
/// Records are only ever appended, with strictly increasing times, and are never modified.
#[derive(Clone, Debug)]
pub struct Trajectory<V> {
    records: Vec<StepRecord<V>>,
}

impl<V: State> Trajectory<V> {
    /// Creates a trajectory holding only the initial record.
    pub(crate) fn new(seed: StepRecord<V>) -> Self {
        Self {
            records: vec![seed],
        }
    }

    /// Appends an accepted step. Its time must be later than the last cached time.
    pub(crate) fn push(&mut self, record: StepRecord<V>) {
        debug_assert!(record.t > self.last().t);
        self.records.push(record);
    }

    /// All cached records, in increasing time order.
    pub fn records(&self) -> &[StepRecord<V>] {
        &self.records
    }

    /// Iterator over the cached times.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|record| record.t)
    }

    /// The initial record.
    pub fn first(&self) -> &StepRecord<V> {
        &self.records[0]
    }

    /// The latest accepted record.
    pub fn last(&self) -> &StepRecord<V> {
        &self.records[self.records.len() - 1]
    }

    /// Number of cached records, including the initial one.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`: the initial record is never removed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the lower and upper bounds of the cached time range.
    pub fn bounds(&self) -> (f64, f64) {
        (self.first().t, self.last().t)
    }

    /// Evaluates the continuous output at `t`, or `None` outside the cached range.
    ///
    /// Cached times return the cached state exactly.
    pub fn evaluate_within(&self, t: f64) -> Option<V> {
        self.locate(t).map(|location| self.value(location, t))
    }

    /// Evaluates the derivative of the continuous output at `t`, or `None` outside the
    /// cached range.
    pub fn derivative_within(&self, t: f64) -> Option<V> {
        self.locate(t).map(|location| self.derivative(location, t))
    }

    /// Continuous output at a time known to lie in the cached range.
    pub(crate) fn value_at(&self, t: f64) -> V {
        self.value(self.search(t), t)
    }

    /// Derivative of the continuous output at a time known to lie in the cached range.
    pub(crate) fn derivative_at(&self, t: f64) -> V {
        self.derivative(self.search(t), t)
    }

    fn value(&self, location: Location, t: f64) -> V {
        match location {
            Location::Record(index) => self.records[index].y,
            Location::Interval(index) => {
                hermite(&self.records[index], &self.records[index + 1], t)
            }
        }
    }

    fn derivative(&self, location: Location, t: f64) -> V {
        match location {
            Location::Record(index) => self.records[index].dy,
            Location::Interval(index) => {
                hermite_derivative(&self.records[index], &self.records[index + 1], t)
            }
        }
    }

    /// Finds the record or interval containing `t`, or `None` outside the cached range.
    pub(crate) fn locate(&self, t: f64) -> Option<Location> {
        let (lower, upper) = self.bounds();
        if t >= lower && t <= upper {
            Some(self.search(t))
        } else {
            None
        }
    }

    /// Binary search over the cached times. Times outside the range map to the nearest
    /// record.
    fn search(&self, t: f64) -> Location {
        let index = self
            .records
            .partition_point(|record| record.t < t)
            .min(self.records.len() - 1);
        if index == 0 || self.records[index].t <= t {
            Location::Record(index)
        } else {
            Location::Interval(index - 1)
        }
    }
}
