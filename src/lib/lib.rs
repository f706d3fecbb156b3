#![cfg_attr(not(test), no_std)]

//! Attitude estimation and motor actuation core for a small quadcopter.
//!
//! Raw inertial readings flow through offset calibration, unit conversion and
//! a bank of moving-average filters into a drift-compensated attitude
//! estimator. Two outer-loop corrections are then mixed into four bounded
//! motor commands. Hardware sits behind the traits in [`interfaces`].

#[macro_use]
pub mod logging;

pub mod config;
pub mod controller;
pub mod drivers;
pub mod error;
pub mod estimation;
pub mod filtering;
pub mod interfaces;
pub mod sensors;
pub mod timing;
pub mod vehicle;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{DeviceError, Fault, Result};
pub use vehicle::Quadcopter;
