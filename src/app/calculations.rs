//! # Calculations
//!
//! Delegated functions from `App` to run the charging loop and the parameter
//! sweeps at a fixed configuration, and to write their results out as CSV

use super::{Configuration, TunnellerError};
use crate::charging::{self, ChargeTrace, ChargingError, ChargingSettings};
use crate::device::StackGeometry;
use crate::sweep::{self, SweepPoint, SweepRange};
use crate::tunnelling::TunnellingBarrier;
use itertools::Itertools;
use nalgebra::RealField;
use std::fmt::Display;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory the CSV output and the log file land in
pub(crate) const RESULTS_DIR: &str = "results";

/// Run the charging loop at the device bias and write the trace
///
/// A run halted early by the accumulated gate charge is still written out:
/// the partial trace is the physically interesting artifact in that case.
pub(crate) fn charge_calculation_at_fixed_bias<T>(
    bias: T,
    barrier_thickness: T,
    stack: &StackGeometry<T>,
    barrier: &TunnellingBarrier<T>,
    config: &Configuration<T>,
    term: &console::Term,
) -> Result<PathBuf, TunnellerError<T>>
where
    T: Copy + Display + RealField + Send + Sync,
{
    term.write_line(&format!("Charging calculation at {} V", bias))?;
    tracing::info!("Charging calculation");
    let settings = ChargingSettings::new(
        config.charging.step_size,
        config.charging.number_of_steps,
    );
    let trace = match charging::run_charging(stack, barrier, bias, barrier_thickness, &settings) {
        Ok(trace) => trace,
        Err(ChargingError::Step {
            step,
            field,
            partial,
            source,
        }) => {
            tracing::warn!(step, field = ?field, error = ?source, "run terminated early");
            partial
        }
        Err(error) => return Err(error.into()),
    };
    write_trace(&trace, "charge_trace")
}

/// Sweep the barrier thickness at the device bias and write the current curve
pub(crate) fn thickness_sweep_calculation<T>(
    bias: T,
    stack: &StackGeometry<T>,
    barrier: &TunnellingBarrier<T>,
    config: &Configuration<T>,
    term: &console::Term,
) -> Result<PathBuf, TunnellerError<T>>
where
    T: Copy + Display + RealField + Send + Sync,
{
    term.write_line(&format!("Thickness sweep at {} V", bias))?;
    let range = SweepRange {
        start: config.sweep.minimum_barrier_thickness,
        end: config.sweep.maximum_barrier_thickness,
        points: config.sweep.number_of_points,
    };
    let points = sweep::thickness_sweep(stack, barrier, bias, range)
        .collect::<Result<Vec<_>, _>>()?;
    write_sweep(&points, "thickness_sweep")
}

/// Sweep the applied bias at the device barrier thickness and write the
/// current curve
pub(crate) fn voltage_sweep_calculation<T>(
    barrier_thickness: T,
    stack: &StackGeometry<T>,
    barrier: &TunnellingBarrier<T>,
    config: &Configuration<T>,
    term: &console::Term,
) -> Result<PathBuf, TunnellerError<T>>
where
    T: Copy + Display + RealField + Send + Sync,
{
    term.write_line(&format!(
        "Bias sweep to {} V",
        config.sweep.peak_bias
    ))?;
    let number_of_points = config.sweep.number_of_points;
    let range = SweepRange {
        start: config.sweep.peak_bias / T::from_usize(number_of_points).unwrap(),
        end: config.sweep.peak_bias,
        points: number_of_points,
    };
    let points = sweep::voltage_sweep(stack, barrier, barrier_thickness, range)
        .collect::<Result<Vec<_>, _>>()?;
    write_sweep(&points, "voltage_sweep")
}

fn write_trace<T>(trace: &ChargeTrace<T>, stem: &str) -> Result<PathBuf, TunnellerError<T>>
where
    T: Copy + Display + RealField + Send + Sync,
{
    let path = output_path(stem)?;
    let mut file = fs::File::create(&path)?;
    writeln!(file, "time,charge,net_field,current_density")?;
    for sample in trace.samples() {
        let row = [
            sample.time,
            sample.charge,
            sample.net_field,
            sample.current_density,
        ]
        .iter()
        .map(|value| value.to_string())
        .join(",");
        writeln!(file, "{}", row)?;
    }
    Ok(path)
}

fn write_sweep<T>(points: &[SweepPoint<T>], stem: &str) -> Result<PathBuf, TunnellerError<T>>
where
    T: Copy + Display + RealField + Send + Sync,
{
    let path = output_path(stem)?;
    let mut file = fs::File::create(&path)?;
    writeln!(file, "swept,current_density")?;
    for point in points {
        writeln!(file, "{},{}", point.swept, point.current_density)?;
    }
    Ok(path)
}

fn output_path<T>(stem: &str) -> Result<PathBuf, TunnellerError<T>>
where
    T: Copy + RealField + Send + Sync,
{
    let directory = Path::new(RESULTS_DIR);
    fs::create_dir_all(directory)?;
    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    Ok(directory.join(format!("{}_{}.csv", stem, timestamp)))
}
