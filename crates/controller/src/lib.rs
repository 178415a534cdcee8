//! Per-tick thrust resolution: drive a ship from its current velocity toward a desired one
//! within an asymmetric per-axis thrust envelope.

pub mod mode;
pub mod resolve;
pub mod schedule;

pub use facade::*;
pub use thrust_propulsion as propulsion;

mod facade;
