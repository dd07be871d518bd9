//! Shared foundational types used across the Ivy simulation front-end.
//!
//! This crate provides the run-time value types: time units, the configured
//! run time, and the simulated duration derived from it.

#![warn(missing_docs)]

pub mod time;

pub use time::{ParseRunTimeError, RunTime, SimulatedDuration, TimeUnit};
