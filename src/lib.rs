// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Tunneller is a charge accumulation solver for van-der-Waals floating gates written in Rust
//!
//! # Overview
//! Tunneller models the charging of a floating gate node buried in a layered
//! van-der-Waals heterostructure. A bias applied across the stack drops over
//! the layers according to a series-capacitor voltage divider, and the
//! resulting field across the tunnel barrier drives a Fowler-Nordheim current
//! onto the gate. As charge accumulates it produces an opposing field, so each
//! time step of the simulation feeds the stored charge back into the field the
//! next step tunnels against. This self-consistent feedback is what makes the
//! charging self-limiting.
//!
//! The stack is treated as a one-dimensional lumped-capacitor network, not a
//! spatially resolved field solve.
//!
//! # Usage
//! Tunneller is distributed as a binary crate, and is intended to be run from the command line.
//! To run the software first define a structure in a `.toml` file:
//!
//! ```toml
//! applied_bias = 5e-3
//! contact_area = 6.25e-10
//!
//! [[layers]]
//! thickness = 20e-9
//! material = "HexagonalBoronNitride"
//! ```
//!
//! where the remaining layers of the stack are appended with subsequent
//! `layers` fields, running from the top gate down to the active
//! semiconductor.

#![warn(missing_docs)]
#![allow(dead_code)]

/// The command line global application, tracing and display primitives
pub mod app;

/// Physical constants
mod constants;

/// The self-consistent charge accumulation loop
pub mod charging;

/// Device, materials and geometry
pub mod device;

/// The lumped electrostatic model of the stack
pub mod electrostatics;

/// Error handling
pub mod error;

/// Parameter sweep drivers
pub mod sweep;

/// The Fowler-Nordheim current law and the tunnelling barrier
pub mod tunnelling;
