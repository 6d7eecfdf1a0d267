//! # Charging
//!
//! The self-consistent charge accumulation loop. Each step converts the fixed
//! applied bias into a barrier field through the electrostatic divider, adds
//! the opposing field the accumulated gate charge produces, evaluates the
//! Fowler-Nordheim current for the net field and integrates it into the gate
//! charge over one time step. The accumulated charge feeds back into the next
//! step's field, which is what makes charging self-limiting.
//!
//! The loop is strictly linear: it is built, stepped a fixed number of times
//! and then consumed, either completing with its trace or failing with the
//! trace accumulated so far. Reruns construct a fresh loop.

mod methods;
mod trace;

pub use methods::Charging;
pub use trace::{ChargeTrace, Sample};

use crate::device::StackGeometry;
use crate::electrostatics;
use crate::error::{CurrentError, GeometryError};
use crate::tunnelling::TunnellingBarrier;
use miette::Diagnostic;
use nalgebra::RealField;
use std::marker::PhantomData;

/// Settings controlling the discrete time stepping
#[derive(Clone, Copy, Debug)]
pub struct ChargingSettings<T: Copy + RealField> {
    pub(crate) step_size: T,
    pub(crate) number_of_steps: usize,
}

impl<T: Copy + RealField> ChargingSettings<T> {
    /// Settings for a run of `number_of_steps` steps of `step_size` seconds
    pub fn new(step_size: T, number_of_steps: usize) -> Self {
        Self {
            step_size,
            number_of_steps,
        }
    }

    pub(crate) fn step_size(&self) -> T {
        self.step_size
    }

    pub(crate) fn number_of_steps(&self) -> usize {
        self.number_of_steps
    }
}

/// Where the loop currently is in its linear lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Built, no step taken yet
    Initialized,
    /// At least one step has been taken
    Stepping,
    /// The configured step budget is exhausted
    Completed,
    /// The current law failed; the run cannot continue
    Failed,
}

/// Terminal failure of a charging run
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ChargingError<T: Copy + RealField> {
    /// The run could not be constructed
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// The current law failed mid-run. Carries the progress made before the
    /// failing step so callers can inspect the pre-divergence behaviour
    #[error("charging halted at step {step} with a net field of {field:?} V/m")]
    Step {
        /// Zero-based index of the failing step
        step: usize,
        /// The net field handed to the current law at the failing step
        field: T,
        /// Samples accumulated before the failure
        partial: ChargeTrace<T>,
        /// The current-law failure itself
        source: CurrentError<T>,
    },
}

/// Builder struct for the charging loop
///
/// The references are attached one at a time, the scalar run parameters carry
/// defaults of zero until set.
pub struct ChargingLoopBuilder<T, RefSettings, RefStack, RefBarrier> {
    settings: RefSettings,
    stack: RefStack,
    barrier: RefBarrier,
    applied_bias: T,
    barrier_thickness: T,
    marker: PhantomData<T>,
}

impl<T: Copy + RealField> ChargingLoopBuilder<T, (), (), ()> {
    /// Initialise an empty builder
    pub fn new() -> Self {
        Self {
            settings: (),
            stack: (),
            barrier: (),
            applied_bias: T::zero(),
            barrier_thickness: T::zero(),
            marker: PhantomData,
        }
    }
}

impl<T: Copy + RealField> Default for ChargingLoopBuilder<T, (), (), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, RefSettings, RefStack, RefBarrier>
    ChargingLoopBuilder<T, RefSettings, RefStack, RefBarrier>
{
    /// Attach the stepping settings
    pub fn with_settings<Settings>(
        self,
        settings: &Settings,
    ) -> ChargingLoopBuilder<T, &Settings, RefStack, RefBarrier> {
        ChargingLoopBuilder {
            settings,
            stack: self.stack,
            barrier: self.barrier,
            applied_bias: self.applied_bias,
            barrier_thickness: self.barrier_thickness,
            marker: PhantomData,
        }
    }

    /// Attach the capacitor stack
    pub fn with_stack<Stack>(
        self,
        stack: &Stack,
    ) -> ChargingLoopBuilder<T, RefSettings, &Stack, RefBarrier> {
        ChargingLoopBuilder {
            settings: self.settings,
            stack,
            barrier: self.barrier,
            applied_bias: self.applied_bias,
            barrier_thickness: self.barrier_thickness,
            marker: PhantomData,
        }
    }

    /// Attach the tunnelling barrier
    pub fn with_barrier<Barrier>(
        self,
        barrier: &Barrier,
    ) -> ChargingLoopBuilder<T, RefSettings, RefStack, &Barrier> {
        ChargingLoopBuilder {
            settings: self.settings,
            stack: self.stack,
            barrier,
            applied_bias: self.applied_bias,
            barrier_thickness: self.barrier_thickness,
            marker: PhantomData,
        }
    }

    /// Set the bias applied across the stack for the whole run
    pub fn with_applied_bias(self, applied_bias: T) -> Self {
        Self {
            applied_bias,
            ..self
        }
    }

    /// Set the barrier thickness for the whole run
    pub fn with_barrier_thickness(self, barrier_thickness: T) -> Self {
        Self {
            barrier_thickness,
            ..self
        }
    }
}

/// A structure holding the information to carry out a charging run
pub struct ChargingLoop<'a, T: Copy + RealField> {
    settings: &'a ChargingSettings<T>,
    stack: &'a StackGeometry<T>,
    barrier: &'a TunnellingBarrier<T>,
    /// The field the applied bias drives across the barrier, fixed for the run
    drive_field: T,
    charge: T,
    time: T,
    phase: Phase,
    trace: ChargeTrace<T>,
}

impl<'a, T: Copy + RealField>
    ChargingLoopBuilder<
        T,
        &'a ChargingSettings<T>,
        &'a StackGeometry<T>,
        &'a TunnellingBarrier<T>,
    >
{
    /// Build out the charging loop, resolving the drive field once for the run
    pub fn build(self) -> Result<ChargingLoop<'a, T>, GeometryError> {
        let drive_field =
            electrostatics::tunnel_field(self.stack, self.applied_bias, self.barrier_thickness)?;
        let mut trace = ChargeTrace::with_capacity(self.settings.number_of_steps() + 1);
        trace.push(Sample {
            time: T::zero(),
            charge: T::zero(),
            net_field: drive_field,
            current_density: T::zero(),
        });
        Ok(ChargingLoop {
            settings: self.settings,
            stack: self.stack,
            barrier: self.barrier,
            drive_field,
            charge: T::zero(),
            time: T::zero(),
            phase: Phase::Initialized,
            trace,
        })
    }
}

impl<T: Copy + RealField> ChargingLoop<'_, T> {
    /// The lifecycle phase the loop is in
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The gate charge accumulated so far in C
    pub fn charge(&self) -> T {
        self.charge
    }

    /// The simulation time elapsed so far in s
    pub fn elapsed(&self) -> T {
        self.time
    }

    /// The samples recorded so far
    pub fn trace(&self) -> &ChargeTrace<T> {
        &self.trace
    }
}

/// Build and run a charging loop in one call
pub fn run_charging<T: Copy + RealField>(
    stack: &StackGeometry<T>,
    barrier: &TunnellingBarrier<T>,
    applied_bias: T,
    barrier_thickness: T,
    settings: &ChargingSettings<T>,
) -> Result<ChargeTrace<T>, ChargingError<T>> {
    let charging_loop = ChargingLoopBuilder::new()
        .with_settings(settings)
        .with_stack(stack)
        .with_barrier(barrier)
        .with_applied_bias(applied_bias)
        .with_barrier_thickness(barrier_thickness)
        .build()?;
    charging_loop.run_to_completion()
}
