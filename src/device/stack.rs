//! The validated four-layer capacitor stack
//!
//! The stack runs, from the top gate down: an encapsulating insulator, the
//! semimetallic channel, the tunnel barrier and the active semiconductor. All
//! geometry is validated on construction so the electrostatic formulas can
//! divide by it freely.

use super::info_desk::LayerInfoDesk;
use super::reader::Device;
use crate::error::GeometryError;
use crate::tunnelling::TunnellingBarrier;
use nalgebra::RealField;
use serde::de::DeserializeOwned;

/// Number of layers in the capacitor stack
pub(crate) const NUM_LAYERS: usize = 4;
/// Position of the tunnel barrier in the stack ordering
pub(crate) const BARRIER_INDEX: usize = 2;

/// A single dielectric layer of the stack
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer<T: Copy + RealField> {
    thickness: T,
    dielectric_constant: T,
}

impl<T: Copy + RealField> Layer<T> {
    /// Construct a layer, rejecting non-positive thicknesses and dielectric constants
    pub fn new(thickness: T, dielectric_constant: T) -> Result<Self, GeometryError> {
        if thickness <= T::zero() {
            return Err(GeometryError::Thickness(format!(
                "layer thickness must be strictly positive, got {:?}",
                thickness
            )));
        }
        if dielectric_constant <= T::zero() {
            return Err(GeometryError::DielectricConstant(format!(
                "layer dielectric constant must be strictly positive, got {:?}",
                dielectric_constant
            )));
        }
        Ok(Self {
            thickness,
            dielectric_constant,
        })
    }

    /// The layer thickness in m
    pub fn thickness(&self) -> T {
        self.thickness
    }

    /// The relative dielectric constant along the stacking axis
    pub fn dielectric_constant(&self) -> T {
        self.dielectric_constant
    }
}

/// The immutable description of the capacitor stack
///
/// Owned by the simulation run that constructed it, and safely shared by
/// reference across concurrent runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackGeometry<T: Copy + RealField> {
    encapsulation: Layer<T>,
    channel: Layer<T>,
    barrier: Layer<T>,
    semiconductor: Layer<T>,
    contact_area: T,
}

impl<T: Copy + RealField> StackGeometry<T> {
    /// Assemble the stack from its four layers and the gate contact area in m^2
    pub fn new(
        encapsulation: Layer<T>,
        channel: Layer<T>,
        barrier: Layer<T>,
        semiconductor: Layer<T>,
        contact_area: T,
    ) -> Result<Self, GeometryError> {
        if contact_area <= T::zero() {
            return Err(GeometryError::ContactArea(format!(
                "contact area must be strictly positive, got {:?}",
                contact_area
            )));
        }
        Ok(Self {
            encapsulation,
            channel,
            barrier,
            semiconductor,
            contact_area,
        })
    }

    /// The encapsulating layer between the top gate and the channel
    pub fn encapsulation(&self) -> &Layer<T> {
        &self.encapsulation
    }

    /// The semimetallic channel layer
    pub fn channel(&self) -> &Layer<T> {
        &self.channel
    }

    /// The tunnel barrier layer
    pub fn barrier(&self) -> &Layer<T> {
        &self.barrier
    }

    /// The active semiconductor layer
    pub fn semiconductor(&self) -> &Layer<T> {
        &self.semiconductor
    }

    /// The gate contact area in m^2
    pub fn contact_area(&self) -> T {
        self.contact_area
    }

    /// The layers in stack order, top gate first
    pub fn layers(&self) -> [Layer<T>; NUM_LAYERS] {
        [
            self.encapsulation,
            self.channel,
            self.barrier,
            self.semiconductor,
        ]
    }
}

/// A helper trait to assemble the simulation-ready structures from the
/// deserialized `Device`
pub trait BuildStack<T: Copy + RealField> {
    /// Build the validated capacitor stack from the device layers and the info-desk
    fn build_stack(&self) -> Result<StackGeometry<T>, GeometryError>;
    /// Derive the tunnelling barrier from the band alignment across the
    /// barrier-semiconductor interface
    fn build_barrier(&self) -> Result<TunnellingBarrier<T>, GeometryError>;
}

impl<T: Copy + DeserializeOwned + RealField> BuildStack<T> for Device<T> {
    fn build_stack(&self) -> Result<StackGeometry<T>, GeometryError> {
        let layers = self.stack_layers()?;
        StackGeometry::new(
            layers[0],
            layers[1],
            layers[BARRIER_INDEX],
            layers[3],
            self.contact_area(),
        )
    }

    fn build_barrier(&self) -> Result<TunnellingBarrier<T>, GeometryError> {
        self.check_layer_count()?;
        let barrier: LayerInfoDesk<T> = self[BARRIER_INDEX].material.get_info();
        let semiconductor: LayerInfoDesk<T> = self[NUM_LAYERS - 1].material.get_info();
        TunnellingBarrier::from_band_alignment(&barrier, &semiconductor)
    }
}

impl<T: Copy + DeserializeOwned + RealField> Device<T> {
    fn check_layer_count(&self) -> Result<(), GeometryError> {
        if self.len() != NUM_LAYERS {
            return Err(GeometryError::Stack(format!(
                "the stack must hold exactly {} layers, the device file describes {}",
                NUM_LAYERS,
                self.len()
            )));
        }
        Ok(())
    }

    fn stack_layers(&self) -> Result<[Layer<T>; NUM_LAYERS], GeometryError> {
        self.check_layer_count()?;
        let mut layers = Vec::with_capacity(NUM_LAYERS);
        for layer in self.iter() {
            let info: LayerInfoDesk<T> = layer.material.get_info();
            layers.push(Layer::new(layer.thickness, info.dielectric_constant)?);
        }
        Ok([layers[0], layers[1], layers[2], layers[3]])
    }
}

#[cfg(test)]
mod test {
    use super::{Layer, StackGeometry};
    use crate::error::GeometryError;
    use rand::Rng;

    #[test]
    fn layers_with_positive_geometry_are_accepted() {
        let mut rng = rand::thread_rng();
        let thickness: f64 = rng.gen::<f64>() * 1e-8 + 1e-10;
        let dielectric_constant = rng.gen::<f64>() * 10. + 1.;
        let layer = Layer::new(thickness, dielectric_constant).unwrap();
        assert_eq!(layer.thickness(), thickness);
        assert_eq!(layer.dielectric_constant(), dielectric_constant);
    }

    #[test]
    fn non_positive_thickness_is_rejected() {
        let result = Layer::new(0f64, 3.76);
        assert!(matches!(result, Err(GeometryError::Thickness(_))));
        let result = Layer::new(-1e-9f64, 3.76);
        assert!(matches!(result, Err(GeometryError::Thickness(_))));
    }

    #[test]
    fn non_positive_dielectric_constant_is_rejected() {
        let result = Layer::new(1e-9f64, 0.);
        assert!(matches!(result, Err(GeometryError::DielectricConstant(_))));
    }

    #[test]
    fn non_positive_contact_area_is_rejected() {
        let layer = Layer::new(1e-9f64, 3.76).unwrap();
        let result = StackGeometry::new(layer, layer, layer, layer, -1e-10);
        assert!(matches!(result, Err(GeometryError::ContactArea(_))));
    }

    #[test]
    fn layers_are_returned_in_stack_order() {
        let encapsulation = Layer::new(20e-9f64, 3.76).unwrap();
        let channel = Layer::new(3e-9, 3.).unwrap();
        let barrier = Layer::new(5e-9, 3.76).unwrap();
        let semiconductor = Layer::new(5e-9, 8.).unwrap();
        let stack =
            StackGeometry::new(encapsulation, channel, barrier, semiconductor, 6.25e-10).unwrap();
        let layers = stack.layers();
        assert_eq!(layers[0], encapsulation);
        assert_eq!(layers[1], channel);
        assert_eq!(layers[2], barrier);
        assert_eq!(layers[3], semiconductor);
    }
}
