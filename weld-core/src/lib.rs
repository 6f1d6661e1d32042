//! Board-agnostic control core for the welding rig firmware
//!
//! This crate contains everything that decides what the rig does, without
//! touching a concrete microcontroller:
//!
//! - Shared signal flags with single-writer handles
//! - Edge handlers for the buttons and the steady-state trigger
//! - The supervisor step that drives the motor and solenoid
//! - Status reporting to the LCD and serial monitor
//! - Motor telemetry and the duty controller interface
//! - Configuration defaults and validation

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod analog;
pub mod bus;
pub mod config;
pub mod controller;
pub mod handlers;
pub mod indicator;
pub mod lcd;
pub mod report;
pub mod state;
pub mod supervisor;
pub mod telemetry;
pub mod traits;

mod pins;

pub use state::{SignalState, Snapshot, Writers};
