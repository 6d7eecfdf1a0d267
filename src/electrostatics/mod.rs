//! # Electrostatics
//!
//! The lumped electrostatic model of the stack. Every layer is treated as a
//! parallel-plate capacitor, and the four layers share a common displacement
//! field because no free charge sits at their interfaces. The voltage divider
//! implemented here is the exact solution of that series network, the only
//! approximation being the lumped-capacitor picture itself.
//!
//! All formulas work in relative dielectric constants. The vacuum permittivity
//! cancels in the divider, and the capacitance helpers keep the same
//! convention so the feedback loop stays consistent with the divider.

use crate::device::stack::{StackGeometry, BARRIER_INDEX, NUM_LAYERS};
use crate::error::GeometryError;
use approx::relative_eq;
use nalgebra::{DVector, RealField};

/// The resolved electrostatic configuration of the stack for one applied bias
/// and one value of the accumulated gate charge
///
/// Recomputed on demand, never persisted across simulation steps.
#[derive(Clone, Debug, PartialEq)]
pub struct ElectrostaticState<T: Copy + RealField> {
    applied_bias: T,
    voltage_drops: DVector<T>,
    barrier_field: T,
    gate_field: T,
}

impl<T: Copy + RealField> ElectrostaticState<T> {
    /// Resolve the per-layer voltage drops and the fields at the barrier for
    /// the given bias and accumulated gate charge
    pub fn compute(
        stack: &StackGeometry<T>,
        applied_bias: T,
        barrier_thickness: T,
        gate_charge: T,
    ) -> Result<Self, GeometryError> {
        check_barrier_thickness(barrier_thickness)?;
        let eps = permittivities(stack);
        let widths = thicknesses(stack, barrier_thickness);
        let base = divider_base(&eps, &widths);

        let voltage_drops = DVector::from_iterator(
            NUM_LAYERS,
            (0..NUM_LAYERS).map(|i| applied_bias * widths[i] * product_excluding(&eps, i) / base),
        );
        debug_assert!(relative_eq!(
            voltage_drops.sum(),
            applied_bias,
            max_relative = T::from_f64(1e-12).unwrap()
        ));

        Ok(Self {
            applied_bias,
            voltage_drops,
            barrier_field: applied_bias * product_excluding(&eps, BARRIER_INDEX) / base,
            gate_field: gate_field(gate_charge, stack),
        })
    }

    /// The bias applied across the whole stack in V
    pub fn applied_bias(&self) -> T {
        self.applied_bias
    }

    /// The voltage dropped over each layer, in stack order. The drops sum to
    /// the applied bias
    pub fn voltage_drops(&self) -> &DVector<T> {
        &self.voltage_drops
    }

    /// The field the applied bias produces across the tunnel barrier in V/m
    pub fn barrier_field(&self) -> T {
        self.barrier_field
    }

    /// The opposing field the accumulated gate charge produces in V/m
    pub fn gate_field(&self) -> T {
        self.gate_field
    }

    /// The net field driving tunnelling through the barrier in V/m
    pub fn net_field(&self) -> T {
        self.barrier_field + self.gate_field
    }
}

/// Field across the tunnel barrier for an applied bias
///
/// Exact for the series stack: `E_b = V prod_(j != b) eps_j / sum_i d_i prod_(j != i) eps_j`.
/// The barrier thickness is taken as an explicit argument rather than from the
/// stack so sweeps can vary it without rebuilding the geometry.
pub fn tunnel_field<T: Copy + RealField>(
    stack: &StackGeometry<T>,
    applied_voltage: T,
    barrier_thickness: T,
) -> Result<T, GeometryError> {
    check_barrier_thickness(barrier_thickness)?;
    let eps = permittivities(stack);
    let widths = thicknesses(stack, barrier_thickness);
    Ok(applied_voltage * product_excluding(&eps, BARRIER_INDEX) / divider_base(&eps, &widths))
}

/// Field the accumulated gate charge induces back across the barrier
///
/// Single-capacitor approximation: the charge sits on the gate node and
/// opposes the applied field, `E = -Q / (eps_b A)`.
pub fn gate_field<T: Copy + RealField>(charge: T, stack: &StackGeometry<T>) -> T {
    -charge / (stack.barrier().dielectric_constant() * stack.contact_area())
}

/// Series capacitance between the gate node and the channel, through the
/// barrier and semiconductor layers
pub fn gate_capacitance<T: Copy + RealField>(
    stack: &StackGeometry<T>,
    barrier_thickness: T,
) -> Result<T, GeometryError> {
    check_barrier_thickness(barrier_thickness)?;
    let eps_b = stack.barrier().dielectric_constant();
    let eps_s = stack.semiconductor().dielectric_constant();
    let d_s = stack.semiconductor().thickness();
    Ok(eps_b * eps_s * stack.contact_area() / (barrier_thickness * eps_s + d_s * eps_b))
}

/// Series capacitance of the whole four-layer stack
pub fn stack_capacitance<T: Copy + RealField>(
    stack: &StackGeometry<T>,
    barrier_thickness: T,
) -> Result<T, GeometryError> {
    check_barrier_thickness(barrier_thickness)?;
    let eps = permittivities(stack);
    let widths = thicknesses(stack, barrier_thickness);
    let full_product = eps.iter().fold(T::one(), |acc, &e| acc * e);
    Ok(full_product * stack.contact_area() / divider_base(&eps, &widths))
}

/// Voltage the accumulated charge raises the gate node to
pub fn gate_voltage<T: Copy + RealField>(
    charge: T,
    stack: &StackGeometry<T>,
    barrier_thickness: T,
) -> Result<T, GeometryError> {
    Ok(charge / gate_capacitance(stack, barrier_thickness)?)
}

/// Charge the biased stack stores on its top plate
pub fn stack_charge<T: Copy + RealField>(
    stack: &StackGeometry<T>,
    applied_voltage: T,
    barrier_thickness: T,
) -> Result<T, GeometryError> {
    Ok(stack_capacitance(stack, barrier_thickness)? * applied_voltage)
}

fn check_barrier_thickness<T: Copy + RealField>(barrier_thickness: T) -> Result<(), GeometryError> {
    if barrier_thickness <= T::zero() {
        return Err(GeometryError::Thickness(format!(
            "barrier thickness must be strictly positive, got {:?}",
            barrier_thickness
        )));
    }
    Ok(())
}

fn permittivities<T: Copy + RealField>(stack: &StackGeometry<T>) -> [T; NUM_LAYERS] {
    let layers = stack.layers();
    [
        layers[0].dielectric_constant(),
        layers[1].dielectric_constant(),
        layers[2].dielectric_constant(),
        layers[3].dielectric_constant(),
    ]
}

fn thicknesses<T: Copy + RealField>(
    stack: &StackGeometry<T>,
    barrier_thickness: T,
) -> [T; NUM_LAYERS] {
    let layers = stack.layers();
    let mut widths = [
        layers[0].thickness(),
        layers[1].thickness(),
        layers[2].thickness(),
        layers[3].thickness(),
    ];
    widths[BARRIER_INDEX] = barrier_thickness;
    widths
}

fn product_excluding<T: Copy + RealField>(eps: &[T; NUM_LAYERS], excluded: usize) -> T {
    eps.iter()
        .enumerate()
        .filter(|(index, _)| *index != excluded)
        .fold(T::one(), |acc, (_, &e)| acc * e)
}

/// The weighted-thickness sum every divider formula divides by. Guaranteed
/// positive when the geometry is valid
fn divider_base<T: Copy + RealField>(eps: &[T; NUM_LAYERS], widths: &[T; NUM_LAYERS]) -> T {
    (0..NUM_LAYERS).fold(T::zero(), |acc, i| {
        acc + widths[i] * product_excluding(eps, i)
    })
}

#[cfg(test)]
mod test {
    use super::{ElectrostaticState, gate_capacitance, gate_field, tunnel_field};
    use crate::device::{Layer, StackGeometry};
    use crate::error::GeometryError;
    use approx::assert_relative_eq;
    use rand::Rng;

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

    #[test]
    fn divider_reduces_to_parallel_plate_when_permittivities_are_equal() {
        let mut rng = rand::thread_rng();
        let epsilon = rng.gen::<f64>() * 10. + 1.;
        let widths: [f64; 4] = [
            rng.gen::<f64>() * 1e-8 + 1e-10,
            rng.gen::<f64>() * 1e-8 + 1e-10,
            rng.gen::<f64>() * 1e-8 + 1e-10,
            rng.gen::<f64>() * 1e-8 + 1e-10,
        ];
        let stack = StackGeometry::new(
            Layer::new(widths[0], epsilon).unwrap(),
            Layer::new(widths[1], epsilon).unwrap(),
            Layer::new(widths[2], epsilon).unwrap(),
            Layer::new(widths[3], epsilon).unwrap(),
            1e-10,
        )
        .unwrap();
        let voltage = 5.;
        let field = tunnel_field(&stack, voltage, widths[2]).unwrap();
        let total_thickness: f64 = widths.iter().sum();
        assert_relative_eq!(field, voltage / total_thickness, max_relative = 1e-12);
    }

    #[test]
    fn tunnel_field_is_linear_in_the_applied_voltage() {
        let mut rng = rand::thread_rng();
        let stack = reference_stack();
        let voltage = rng.gen::<f64>() * 10.;
        let scale = rng.gen::<f64>() * 5. + 0.1;
        let reference = tunnel_field(&stack, voltage, 5e-9).unwrap();
        let scaled = tunnel_field(&stack, scale * voltage, 5e-9).unwrap();
        assert_relative_eq!(scaled, scale * reference, max_relative = 1e-12);
    }

    #[test]
    fn voltage_drops_sum_to_the_applied_bias() {
        let stack = reference_stack();
        let state = ElectrostaticState::compute(&stack, 5e-3, 5e-9, 0.).unwrap();
        assert_relative_eq!(
            state.voltage_drops().sum(),
            state.applied_bias(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn the_gate_field_opposes_the_accumulated_charge() {
        let stack = reference_stack();
        let charge = 1e-12;
        assert!(gate_field(charge, &stack) < 0.);
        assert!(gate_field(-charge, &stack) > 0.);
        assert_eq!(gate_field(0., &stack), 0.);
    }

    #[test]
    fn the_gate_field_shifts_the_net_field_from_the_barrier_field() {
        let stack = reference_stack();
        let state = ElectrostaticState::compute(&stack, 5e-3, 5e-9, 1e-15).unwrap();
        assert!(state.net_field() < state.barrier_field());
        assert_relative_eq!(
            state.net_field(),
            state.barrier_field() + state.gate_field()
        );
    }

    #[test]
    fn a_non_positive_barrier_thickness_is_rejected() {
        let stack = reference_stack();
        let result = tunnel_field(&stack, 5., 0.);
        assert!(matches!(result, Err(GeometryError::Thickness(_))));
        let result = tunnel_field(&stack, 5., -1e-9);
        assert!(matches!(result, Err(GeometryError::Thickness(_))));
    }

    #[test]
    fn gate_capacitance_reduces_to_a_single_layer_when_permittivities_are_equal() {
        let epsilon = 4.5;
        let stack = StackGeometry::new(
            Layer::new(20e-9, epsilon).unwrap(),
            Layer::new(3e-9, epsilon).unwrap(),
            Layer::new(5e-9, epsilon).unwrap(),
            Layer::new(5e-9, epsilon).unwrap(),
            1e-10,
        )
        .unwrap();
        let capacitance = gate_capacitance(&stack, 5e-9).unwrap();
        assert_relative_eq!(
            capacitance,
            epsilon * 1e-10 / (5e-9 + 5e-9),
            max_relative = 1e-12
        );
    }

    #[test]
    fn the_divider_is_pure() {
        let stack = reference_stack();
        let first = tunnel_field(&stack, 5e-3, 5e-9).unwrap();
        let second = tunnel_field(&stack, 5e-3, 5e-9).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn stack_capacitance_reduces_to_parallel_plate_when_permittivities_are_equal() {
        let epsilon = 4.5;
        let area = 1e-10;
        let stack = StackGeometry::new(
            Layer::new(20e-9, epsilon).unwrap(),
            Layer::new(3e-9, epsilon).unwrap(),
            Layer::new(5e-9, epsilon).unwrap(),
            Layer::new(5e-9, epsilon).unwrap(),
            area,
        )
        .unwrap();
        let capacitance = super::stack_capacitance(&stack, 5e-9).unwrap();
        assert_relative_eq!(capacitance, epsilon * area / 33e-9, max_relative = 1e-12);
    }

    #[test]
    fn the_gate_voltage_follows_the_stored_charge() {
        let stack = reference_stack();
        let charge = 3.2e-13;
        let voltage = super::gate_voltage(charge, &stack, 5e-9).unwrap();
        assert_relative_eq!(
            voltage * gate_capacitance(&stack, 5e-9).unwrap(),
            charge,
            max_relative = 1e-12
        );
    }

    #[test]
    fn the_stored_charge_scales_with_the_bias() {
        let stack = reference_stack();
        let reference = super::stack_charge(&stack, 5e-3, 5e-9).unwrap();
        let doubled = super::stack_charge(&stack, 1e-2, 5e-9).unwrap();
        assert_relative_eq!(doubled, 2. * reference, max_relative = 1e-12);
    }

    mod properties {
        use super::super::{gate_field, tunnel_field};
        use crate::device::{Layer, StackGeometry};
        use proptest::prelude::*;

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

        proptest! {
            #[test]
            fn the_barrier_field_scales_with_the_bias(
                voltage in 1e-4f64..10.,
                scale in 0.1f64..100.,
                barrier_thickness in 1e-10f64..1e-7,
            ) {
                let stack = reference_stack();
                let reference = tunnel_field(&stack, voltage, barrier_thickness).unwrap();
                let scaled = tunnel_field(&stack, scale * voltage, barrier_thickness).unwrap();
                prop_assert!((scaled - scale * reference).abs() <= 1e-9 * scaled.abs().max(1.));
            }

            #[test]
            fn the_barrier_field_is_positive_for_positive_bias(
                voltage in 1e-6f64..100.,
                barrier_thickness in 1e-10f64..1e-6,
            ) {
                let stack = reference_stack();
                prop_assert!(tunnel_field(&stack, voltage, barrier_thickness).unwrap() > 0.);
            }

            #[test]
            fn the_gate_field_is_odd_in_the_charge(charge in -1e-9f64..1e-9) {
                let stack = reference_stack();
                prop_assert_eq!(gate_field(charge, &stack), -gate_field(-charge, &stack));
            }
        }
    }
}
