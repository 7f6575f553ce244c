//! Six-step commutation for a three-phase bridge on an advanced-control timer.
//!
//! This crate holds the parts of the firmware that do not touch registers:
//! the timer configuration records and their validation, the six-step output
//! table, and the timing arithmetic used to pick prescalers and dead time.
//! It builds for the host so the tables can be unit tested.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod flags;
pub mod step;
pub mod timing;

pub use config::{ConfigError, PwmTimerConfig, TickTimerConfig};
pub use step::{Channel, MotorStep, StepOutputs, SIX_STEP_TABLE};
