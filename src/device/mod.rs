//! Controls the deserialization and storage of the top-level device structure,
//! the info-desk which yields the material information necessary to run the
//! simulation, and the validated capacitor stack the electrostatics operate on

/// The info-desk material parameter tables
pub mod info_desk;
/// The deserialization and storage of the `Device`
pub(crate) mod reader;
/// The validated capacitor stack
pub mod stack;

pub(crate) use info_desk::Material;
pub use reader::Device;
pub use stack::{BuildStack, Layer, StackGeometry};
