use nalgebra::{DVector, RealField};

/// A single record of a charging run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample<T: Copy + RealField> {
    /// Elapsed simulation time in s
    pub time: T,
    /// Accumulated gate charge in C
    pub charge: T,
    /// Net field across the barrier in V/m
    pub net_field: T,
    /// Current density through the barrier in A/m^2
    pub current_density: T,
}

/// The time series a charging run emits
///
/// Samples are ordered by ascending time with the initial state included, so a
/// completed run over `n` steps holds `n + 1` samples. The series is the sole
/// artifact handed to downstream consumers and is immutable once returned.
#[derive(Clone, Debug, PartialEq)]
pub struct ChargeTrace<T: Copy + RealField> {
    samples: Vec<Sample<T>>,
}

impl<T: Copy + RealField> ChargeTrace<T> {
    pub(crate) fn with_capacity(samples: usize) -> Self {
        Self {
            samples: Vec::with_capacity(samples),
        }
    }

    pub(crate) fn push(&mut self, sample: Sample<T>) {
        self.samples.push(sample);
    }

    /// The recorded samples in time order
    pub fn samples(&self) -> &[Sample<T>] {
        &self.samples
    }

    /// Number of recorded samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether any state has been recorded. A trace built by a run is never
    /// empty, the initial state is always present
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The most recent sample
    pub fn last(&self) -> Option<&Sample<T>> {
        self.samples.last()
    }

    /// The time column
    pub fn times(&self) -> DVector<T> {
        DVector::from_iterator(self.samples.len(), self.samples.iter().map(|s| s.time))
    }

    /// The accumulated charge column
    pub fn charges(&self) -> DVector<T> {
        DVector::from_iterator(self.samples.len(), self.samples.iter().map(|s| s.charge))
    }

    /// The net field column
    pub fn net_fields(&self) -> DVector<T> {
        DVector::from_iterator(self.samples.len(), self.samples.iter().map(|s| s.net_field))
    }

    /// The current density column
    pub fn current_densities(&self) -> DVector<T> {
        DVector::from_iterator(
            self.samples.len(),
            self.samples.iter().map(|s| s.current_density),
        )
    }
}
