//! Generates and returns compile-time defined material properties
//!
//! This module defines the `Material` enum which represents all materials implemented
//! in the simulation software. It generates the parameters needed to build the
//! capacitor stack and the tunnelling barrier.

mod materials;

pub(crate) use materials::Material;

use nalgebra::RealField;

/// Struct holding all the material information necessary to solve the problem for a single layer
///
/// This contains the information which can be determined at compile time -> ie that which is NOT defined by
/// the end user
pub struct LayerInfoDesk<T: RealField> {
    /// The static dielectric constant along the stacking axis
    pub(crate) dielectric_constant: T,
    /// The electron affinity in eV. For a semimetallic layer this holds the
    /// distance from vacuum to the charge-neutrality point
    pub(crate) electron_affinity: T,
    /// The bandgap in eV
    pub(crate) band_gap: T,
    /// The tunnelling effective mass as a fraction of the free electron mass
    pub(crate) effective_mass_ratio: T,
}
