use color_eyre::eyre::eyre;
use config::{Config, File};
use serde::{de::DeserializeOwned, Deserialize};
use std::env;

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub(crate) struct Configuration<T> {
    pub(crate) charging: ChargingConfiguration<T>,
    pub(crate) sweep: SweepConfiguration<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChargingConfiguration<T> {
    pub(crate) step_size: T,
    pub(crate) number_of_steps: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SweepConfiguration<T> {
    pub(crate) minimum_barrier_thickness: T,
    pub(crate) maximum_barrier_thickness: T,
    pub(crate) peak_bias: T,
    pub(crate) number_of_points: usize,
}

impl<T: DeserializeOwned> Configuration<T> {
    pub(crate) fn build() -> color_eyre::Result<Self> {
        // If I am running it here we should automatically be more debuggy
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // The default settings for the simulation which we use in the general case
            .add_source(File::with_name(".config/default"))
            // The override settings which may be set by the user, optional
            .add_source(File::with_name(&format!(".config/{}", run_mode)).required(false))
            .build()?;

        s.try_deserialize()
            .map_err(|e| eyre!(format!("Failed to deserialize the config file: {:?}", e)))
    }
}
