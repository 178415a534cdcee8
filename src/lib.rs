//! Per-tick spacecraft thrust control.
//!
//! The workspace crates are re-exported here so front-ends (the `maneuver` binary, tests,
//! game loops) depend on a single package.

pub mod maneuver;

pub use thrust_config as config;
pub use thrust_controller as controller;
pub use thrust_core as kinematics;
pub use thrust_export as export;
pub use thrust_integrator as integrator;
pub use thrust_propulsion as propulsion;
