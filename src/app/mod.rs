/// This module governs the high-level implementation of the simulation
mod calculations;
mod configuration;
mod error;
mod telemetry;

pub(crate) use configuration::Configuration;
pub(crate) use error::TunnellerError;

use crate::device::{BuildStack, Device};
use clap::{ArgEnum, Parser};
use color_eyre::eyre::eyre;
use nalgebra::RealField;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct App {
    file_path: Option<PathBuf>,
    #[clap(arg_enum, short, long)]
    log_level: LogLevel,
    #[clap(arg_enum, short, long)]
    calculation: Calculation,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
enum LogLevel {
    Trace,
    Info,
    Debug,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
pub(crate) enum Calculation {
    Charge,
    ThicknessSweep,
    VoltageSweep,
}

/// Parse the command line, load the configuration and the device, and run the
/// requested calculation
pub fn run<T>() -> color_eyre::Result<()>
where
    T: Copy + DeserializeOwned + Display + RealField + Send + Sync,
{
    let cli = App::parse();

    println!("calculation: {:?}", cli.calculation);
    println!("log_level: {:?}", cli.log_level);
    println!("path: {:?}", cli.file_path);

    std::fs::create_dir_all(calculations::RESULTS_DIR)?;
    let (subscriber, _guard) = telemetry::get_subscriber(cli.log_level);
    telemetry::init_subscriber(subscriber);

    let config: Configuration<T> = Configuration::build()?;

    let path = cli
        .file_path
        .ok_or(eyre!("A device file path needs to be passed."))?;
    let device: Device<T> = Device::build(path)?;
    let stack = device.build_stack()?;
    let barrier = device.build_barrier()?;
    let term = console::Term::stdout();

    let output = match cli.calculation {
        Calculation::Charge => calculations::charge_calculation_at_fixed_bias(
            device.applied_bias(),
            stack.barrier().thickness(),
            &stack,
            &barrier,
            &config,
            &term,
        )?,
        Calculation::ThicknessSweep => calculations::thickness_sweep_calculation(
            device.applied_bias(),
            &stack,
            &barrier,
            &config,
            &term,
        )?,
        Calculation::VoltageSweep => calculations::voltage_sweep_calculation(
            stack.barrier().thickness(),
            &stack,
            &barrier,
            &config,
            &term,
        )?,
    };

    tracing::info!("results written to {:?}", output);

    Ok(())
}
