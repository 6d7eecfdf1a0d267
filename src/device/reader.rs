use super::Material;
use color_eyre::eyre::eyre;
use config::{Config, File};
use nalgebra::RealField;
use serde::{de::DeserializeOwned, Deserialize};
use std::{ops::Deref, path::PathBuf};

/// The top-level device description deserialized from a `.toml` structure file
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Device<T: DeserializeOwned + RealField> {
    pub(crate) applied_bias: T,
    pub(crate) contact_area: T,
    pub(crate) layers: Vec<DeviceLayer<T>>,
}

impl<T: DeserializeOwned + RealField> Deref for Device<T> {
    type Target = Vec<DeviceLayer<T>>;

    fn deref(&self) -> &Self::Target {
        &self.layers
    }
}

/// A single layer entry of the structure file
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct DeviceLayer<T: DeserializeOwned + RealField> {
    pub(crate) thickness: T,
    pub(crate) material: Material,
}

impl<T: DeserializeOwned + RealField> Device<T> {
    /// Deserialize the device from the structure file at `path`
    pub fn build(path: PathBuf) -> color_eyre::Result<Self> {
        let s = Config::builder().add_source(File::from(path)).build()?;
        s.try_deserialize()
            .map_err(|e| eyre!("Failed to deserialize device: {:?}", e))
    }
}

impl<T: Copy + DeserializeOwned + RealField> Device<T> {
    /// The bias applied between the top gate and the grounded channel in V
    pub fn applied_bias(&self) -> T {
        self.applied_bias
    }

    /// The gate contact area in m^2
    pub fn contact_area(&self) -> T {
        self.contact_area
    }
}
