// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use super::{ChargeTrace, ChargingError, ChargingLoop, Phase, Sample};
use crate::electrostatics;
use crate::error::CurrentError;
use crate::tunnelling;
use nalgebra::RealField;

/// The stepping interface of the charging loop
pub trait Charging<T: Copy + RealField> {
    /// Carry out a single step of the feedback loop
    ///
    /// Resolves the net field from the fixed drive field and the present gate
    /// charge, evaluates the current law and integrates the result over one
    /// time step
    fn single_step(&mut self) -> Result<(), CurrentError<T>>;
    /// Run the loop through its configured step budget, consuming it
    ///
    /// On failure the partial trace is attached to the error, so the samples
    /// computed before the failing step remain inspectable
    fn run_to_completion(self) -> Result<ChargeTrace<T>, ChargingError<T>>;
}

impl<T: Copy + RealField> Charging<T> for ChargingLoop<'_, T> {
    fn single_step(&mut self) -> Result<(), CurrentError<T>> {
        let net_field = self.drive_field + electrostatics::gate_field(self.charge, self.stack);
        let current_density = tunnelling::current_density(net_field, self.barrier)?;
        let step_size = self.settings.step_size();
        self.charge = self.charge + current_density * step_size;
        self.time = self.time + step_size;
        self.phase = Phase::Stepping;
        self.trace.push(Sample {
            time: self.time,
            charge: self.charge,
            net_field,
            current_density,
        });
        Ok(())
    }

    fn run_to_completion(mut self) -> Result<ChargeTrace<T>, ChargingError<T>> {
        let number_of_steps = self.settings.number_of_steps();
        tracing::info!(steps = number_of_steps, "starting charging loop");
        for step in 0..number_of_steps {
            if let Err(source) = self.single_step() {
                self.phase = Phase::Failed;
                let field = self.drive_field + electrostatics::gate_field(self.charge, self.stack);
                tracing::error!(step, field = ?field, "charging loop halted");
                return Err(ChargingError::Step {
                    step,
                    field,
                    partial: self.trace,
                    source,
                });
            }
            if step % 100 == 0 {
                tracing::debug!(step, charge = ?self.charge, "stepped");
            }
        }
        self.phase = Phase::Completed;
        tracing::info!(final_charge = ?self.charge, "charging loop completed");
        Ok(self.trace)
    }
}

#[cfg(test)]
mod test {
    use super::super::{
        Charging, ChargingError, ChargingLoopBuilder, ChargingSettings, Phase, run_charging,
    };
    use crate::device::{Layer, StackGeometry};
    use crate::error::CurrentError;
    use crate::tunnelling::TunnellingBarrier;

    fn reference_stack() -> StackGeometry<f64> {
        StackGeometry::new(
            Layer::new(20e-9, 3.76).unwrap(),
            Layer::new(3e-9, 3.).unwrap(),
            Layer::new(5e-9, 3.76).unwrap(),
            Layer::new(5e-9, 8.).unwrap(),
            6.25e-10,
        )
        .unwrap()
    }

    fn reference_barrier() -> TunnellingBarrier<f64> {
        TunnellingBarrier::new(2.55 * 1.6e-19, 2.21 * 9.109e-31).unwrap()
    }

    #[test]
    fn a_run_over_zero_steps_holds_only_the_initial_state() {
        let stack = reference_stack();
        let barrier = reference_barrier();
        let settings = ChargingSettings::new(5e-10, 0);
        let trace = run_charging(&stack, &barrier, 5e-3, 5e-9, &settings).unwrap();
        assert_eq!(trace.len(), 1);
        let initial = trace.last().unwrap();
        assert_eq!(initial.time, 0.);
        assert_eq!(initial.charge, 0.);
        assert_eq!(initial.current_density, 0.);
        assert!(initial.net_field > 0.);
    }

    #[test]
    fn identical_runs_produce_identical_traces() {
        let stack = reference_stack();
        let barrier = reference_barrier();
        let settings = ChargingSettings::new(5e-10, 250);
        let first = run_charging(&stack, &barrier, 5., 5e-9, &settings).unwrap();
        let second = run_charging(&stack, &barrier, 5., 5e-9, &settings).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn a_zero_bias_halts_on_the_first_step() {
        let stack = reference_stack();
        let barrier = reference_barrier();
        let settings = ChargingSettings::new(5e-10, 100);
        let result = run_charging(&stack, &barrier, 0., 5e-9, &settings);
        match result {
            Err(ChargingError::Step {
                step,
                field,
                partial,
                source,
            }) => {
                assert_eq!(step, 0);
                assert_eq!(field, 0.);
                assert_eq!(partial.len(), 1);
                assert!(matches!(source, CurrentError::ZeroField));
            }
            _ => panic!("a zero net field must surface as a step failure"),
        }
    }

    #[test]
    fn an_invalid_barrier_thickness_fails_at_construction() {
        let stack = reference_stack();
        let barrier = reference_barrier();
        let settings = ChargingSettings::new(5e-10, 100);
        let result = run_charging(&stack, &barrier, 5e-3, -5e-9, &settings);
        assert!(matches!(result, Err(ChargingError::Geometry(_))));
    }

    #[test]
    fn the_loop_steps_through_its_phases() {
        let stack = reference_stack();
        let barrier = reference_barrier();
        let settings = ChargingSettings::new(5e-10, 10);
        let mut charging_loop = ChargingLoopBuilder::new()
            .with_settings(&settings)
            .with_stack(&stack)
            .with_barrier(&barrier)
            .with_applied_bias(5.)
            .with_barrier_thickness(5e-9)
            .build()
            .unwrap();
        assert_eq!(charging_loop.phase(), Phase::Initialized);
        assert_eq!(charging_loop.trace().len(), 1);
        charging_loop.single_step().unwrap();
        assert_eq!(charging_loop.phase(), Phase::Stepping);
        assert_eq!(charging_loop.trace().len(), 2);
        assert!(charging_loop.elapsed() > 0.);
    }

    #[test]
    fn the_accumulated_charge_is_non_decreasing_under_forward_bias() {
        let stack = reference_stack();
        let barrier = reference_barrier();
        let settings = ChargingSettings::new(5e-10, 1000);
        let trace = run_charging(&stack, &barrier, 5., 5e-9, &settings).unwrap();
        assert_eq!(trace.len(), 1001);
        assert!(trace.last().unwrap().charge > 0.);
        for pair in trace.samples().windows(2) {
            assert!(pair[1].charge >= pair[0].charge);
        }
    }

    #[test]
    fn the_reference_device_charges_without_producing_garbage() {
        // 20 nm hBN encapsulation, 3 nm graphene, 5 nm hBN barrier, 5 nm InSe,
        // 5 mV bias, 0.5 ns steps
        let stack = reference_stack();
        let barrier = reference_barrier();
        let settings = ChargingSettings::new(5e-10, 1000);
        match run_charging(&stack, &barrier, 5e-3, 5e-9, &settings) {
            Ok(trace) => {
                assert_eq!(trace.len(), 1001);
                for pair in trace.samples().windows(2) {
                    assert!(pair[1].charge >= pair[0].charge);
                }
                for sample in trace.samples() {
                    assert!(sample.charge.is_finite());
                    assert!(sample.net_field.is_finite());
                    assert!(sample.current_density.is_finite());
                }
            }
            // If the gate charge reverses the net field the run must end in a
            // typed failure rather than emit non-finite samples
            Err(ChargingError::Step { partial, .. }) => {
                for sample in partial.samples() {
                    assert!(sample.charge.is_finite());
                    assert!(sample.net_field.is_finite());
                    assert!(sample.current_density.is_finite());
                }
            }
            Err(error) => panic!("unexpected construction failure: {:?}", error),
        }
    }
}
