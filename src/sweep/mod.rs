//! # Sweep
//!
//! Stateless drivers which evaluate the divider and the current law across a
//! swept parameter. No charge accumulates between points, every point is a
//! fresh evaluation, so the sweeps are lazy iterators a plotting consumer can
//! drain at its own pace.
//!
//! Full charging runs at a set of biases are independent of one another and
//! run in parallel through [`charging_runs`].

use crate::charging::{self, ChargeTrace, ChargingError, ChargingSettings};
use crate::device::StackGeometry;
use crate::electrostatics;
use crate::error::{CurrentError, GeometryError};
use crate::tunnelling::{self, TunnellingBarrier};
use miette::Diagnostic;
use nalgebra::RealField;
use rayon::prelude::*;

/// A failure at a single sweep point
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum SweepError<T: RealField> {
    /// The swept value produced an invalid geometry
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// The current law failed at the swept point
    #[error(transparent)]
    Current(#[from] CurrentError<T>),
}

/// A linearly spaced closed range of sweep points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepRange<T: Copy + RealField> {
    /// First swept value
    pub start: T,
    /// Last swept value, included in the sweep
    pub end: T,
    /// Number of points over the range
    pub points: usize,
}

impl<T: Copy + RealField> SweepRange<T> {
    /// The swept value at `index`
    fn value_at(&self, index: usize) -> T {
        if self.points < 2 {
            return self.start;
        }
        let fraction = T::from_usize(index).unwrap() / T::from_usize(self.points - 1).unwrap();
        self.start + (self.end - self.start) * fraction
    }
}

/// One evaluated sweep point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepPoint<T: Copy + RealField> {
    /// The value of the swept parameter at this point
    pub swept: T,
    /// The current density the parameter produces in A/m^2
    pub current_density: T,
}

/// Lazy sweep of the barrier thickness at fixed applied bias
pub struct ThicknessSweep<'a, T: Copy + RealField> {
    stack: &'a StackGeometry<T>,
    barrier: &'a TunnellingBarrier<T>,
    applied_bias: T,
    range: SweepRange<T>,
    cursor: usize,
}

/// Lazy sweep of the applied bias at fixed barrier thickness
pub struct VoltageSweep<'a, T: Copy + RealField> {
    stack: &'a StackGeometry<T>,
    barrier: &'a TunnellingBarrier<T>,
    barrier_thickness: T,
    range: SweepRange<T>,
    cursor: usize,
}

/// Sweep the barrier thickness over `range` at a fixed bias
pub fn thickness_sweep<'a, T: Copy + RealField>(
    stack: &'a StackGeometry<T>,
    barrier: &'a TunnellingBarrier<T>,
    applied_bias: T,
    range: SweepRange<T>,
) -> ThicknessSweep<'a, T> {
    tracing::info!(points = range.points, "sweeping barrier thickness");
    ThicknessSweep {
        stack,
        barrier,
        applied_bias,
        range,
        cursor: 0,
    }
}

/// Sweep the applied bias over `range` at a fixed barrier thickness
pub fn voltage_sweep<'a, T: Copy + RealField>(
    stack: &'a StackGeometry<T>,
    barrier: &'a TunnellingBarrier<T>,
    barrier_thickness: T,
    range: SweepRange<T>,
) -> VoltageSweep<'a, T> {
    tracing::info!(points = range.points, "sweeping applied bias");
    VoltageSweep {
        stack,
        barrier,
        barrier_thickness,
        range,
        cursor: 0,
    }
}

impl<T: Copy + RealField> Iterator for ThicknessSweep<'_, T> {
    type Item = Result<SweepPoint<T>, SweepError<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.range.points {
            return None;
        }
        let barrier_thickness = self.range.value_at(self.cursor);
        self.cursor += 1;
        let point = electrostatics::tunnel_field(self.stack, self.applied_bias, barrier_thickness)
            .map_err(SweepError::from)
            .and_then(|field| {
                tunnelling::current_density(field, self.barrier).map_err(SweepError::from)
            })
            .map(|current_density| SweepPoint {
                swept: barrier_thickness,
                current_density,
            });
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.range.points - self.cursor;
        (remaining, Some(remaining))
    }
}

impl<T: Copy + RealField> ExactSizeIterator for ThicknessSweep<'_, T> {}

impl<T: Copy + RealField> Iterator for VoltageSweep<'_, T> {
    type Item = Result<SweepPoint<T>, SweepError<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.range.points {
            return None;
        }
        let applied_bias = self.range.value_at(self.cursor);
        self.cursor += 1;
        let point = electrostatics::tunnel_field(self.stack, applied_bias, self.barrier_thickness)
            .map_err(SweepError::from)
            .and_then(|field| {
                tunnelling::current_density(field, self.barrier).map_err(SweepError::from)
            })
            .map(|current_density| SweepPoint {
                swept: applied_bias,
                current_density,
            });
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.range.points - self.cursor;
        (remaining, Some(remaining))
    }
}

impl<T: Copy + RealField> ExactSizeIterator for VoltageSweep<'_, T> {}

/// Independent charging runs at each of the given biases
///
/// Runs are embarrassingly parallel: each owns its accumulator and the
/// geometry is shared immutably, so they execute on the rayon pool with no
/// locking
pub fn charging_runs<T: Copy + RealField + Send + Sync>(
    stack: &StackGeometry<T>,
    barrier: &TunnellingBarrier<T>,
    barrier_thickness: T,
    settings: &ChargingSettings<T>,
    biases: &[T],
) -> Vec<Result<ChargeTrace<T>, ChargingError<T>>> {
    biases
        .par_iter()
        .map(|&bias| charging::run_charging(stack, barrier, bias, barrier_thickness, settings))
        .collect()
}
