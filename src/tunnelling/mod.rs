//! # Tunnelling
//!
//! The Fowler-Nordheim current law. Electrons tunnel through the triangular
//! barrier the field tilts out of the conduction-band offset, giving a current
//! density `J = C1 E^2 exp(C2 / E)` with both coefficients fixed by the
//! barrier height and the tunnelling effective mass.
//!
//! The sign structure of the exponent carries the physics of the feedback
//! loop: a positive field suppresses the current exponentially, while a net
//! field reversed by accumulated gate charge drives the exponent positive and
//! the current grows without bound. Neither regime is clamped here. A vanished
//! field has no defined current and overflow of the exponential is surfaced as
//! an error, never truncated.

use crate::constants::{ELECTRON_CHARGE, ELECTRON_MASS, HBAR, PLANCK};
use crate::device::info_desk::LayerInfoDesk;
use crate::error::{CurrentError, GeometryError};
use nalgebra::RealField;

/// The triangular barrier the electrons tunnel through
///
/// Shared read-only between the divider and the current law; construction
/// rejects parameters the current law cannot evaluate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TunnellingBarrier<T: Copy + RealField> {
    height: T,
    mass: T,
}

impl<T: Copy + RealField> TunnellingBarrier<T> {
    /// Construct a barrier from its height in J and tunnelling mass in kg
    pub fn new(height: T, mass: T) -> Result<Self, GeometryError> {
        if height <= T::zero() {
            return Err(GeometryError::Barrier(format!(
                "barrier height must be strictly positive, got {:?}",
                height
            )));
        }
        if mass <= T::zero() {
            return Err(GeometryError::Barrier(format!(
                "tunnelling mass must be strictly positive, got {:?}",
                mass
            )));
        }
        Ok(Self { height, mass })
    }

    /// Derive the barrier from the electron-affinity mismatch across the
    /// barrier-semiconductor interface, with the tunnelling mass taken from
    /// the barrier material
    pub(crate) fn from_band_alignment(
        barrier: &LayerInfoDesk<T>,
        semiconductor: &LayerInfoDesk<T>,
    ) -> Result<Self, GeometryError> {
        let electron_charge = T::from_f64(ELECTRON_CHARGE).expect("Electron charge must fit in T");
        let electron_mass = T::from_f64(ELECTRON_MASS).expect("Electron mass must fit in T");
        let height =
            (semiconductor.electron_affinity - barrier.electron_affinity) * electron_charge;
        let mass = barrier.effective_mass_ratio * electron_mass;
        Self::new(height, mass)
    }

    /// The barrier height in J
    pub fn height(&self) -> T {
        self.height
    }

    /// The tunnelling effective mass in kg
    pub fn mass(&self) -> T {
        self.mass
    }

    /// `C1 = q^3 / (8 pi h B)`, the prefactor of the current law
    pub(crate) fn prefactor(&self) -> T {
        let charge_cubed = ELECTRON_CHARGE * ELECTRON_CHARGE * ELECTRON_CHARGE;
        T::from_f64(charge_cubed / (8. * std::f64::consts::PI * PLANCK))
            .expect("Prefactor must fit in T")
            / self.height
    }

    /// `C2 = -4 sqrt(2 m) B^(3/2) / (3 hbar q)`, the coefficient of the
    /// inverse field in the exponent
    pub(crate) fn exponent_coefficient(&self) -> T {
        let two = T::one() + T::one();
        let four = two * two;
        let exponent = T::from_f64(1.5).expect("Exponent must fit in T");
        -four * (two * self.mass).sqrt() * self.height.powf(exponent)
            / T::from_f64(3. * HBAR * ELECTRON_CHARGE).expect("Denominator must fit in T")
    }
}

/// Fowler-Nordheim current density in A/m^2 for a field across the barrier
///
/// Fails with [`CurrentError::ZeroField`] when the field is exactly zero and
/// with [`CurrentError::Overflow`] when the exponential leaves the
/// representable range, which happens once the net field is reversed and
/// small in magnitude.
pub fn current_density<T: Copy + RealField>(
    field: T,
    barrier: &TunnellingBarrier<T>,
) -> Result<T, CurrentError<T>> {
    if field == T::zero() {
        return Err(CurrentError::ZeroField);
    }
    let exponential = (barrier.exponent_coefficient() / field).exp();
    let current = barrier.prefactor() * field * field * exponential;
    if current.is_finite() {
        Ok(current)
    } else {
        Err(CurrentError::Overflow(field))
    }
}
