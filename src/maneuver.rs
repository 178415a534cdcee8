//! Closed-loop maneuver simulation: resolve, apply, repeat until the ship reaches its desired
//! velocity or the tick budget runs out.

use thiserror::Error;
use thrust_controller::ship::Ship;
use thrust_controller::{DesiredState, Resolution, Scheduling, schedule_burn};
use thrust_core::vector::{self, Vector3};
use thrust_core::KinematicState;
use thrust_integrator::{StepSample, apply};
use tracing::{debug, info, warn};

/// Slack when converting a hold time into whole ticks.
const HOLD_TICK_SLACK: f64 = 1e-9;

/// Inputs for one simulated maneuver.
#[derive(Debug, Clone)]
pub struct ManeuverConfig {
    pub desired: DesiredState,
    pub spacebrake: bool,
    pub scheduling: Scheduling,
    /// Upper bound on simulated ticks before giving up.
    pub max_ticks: u64,
    /// Speed error (m/s) at or below which the maneuver counts as complete.
    pub tolerance_m_s: f64,
}

impl ManeuverConfig {
    pub fn new(desired: DesiredState) -> Self {
        Self {
            desired,
            spacebrake: false,
            scheduling: Scheduling::Reactive,
            max_ticks: 10_000,
            tolerance_m_s: 1e-3,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ManeuverError {
    #[error("tolerance must be finite and non-negative (got {0} m/s)")]
    InvalidTolerance(f64),
    #[error("tick budget must be at least one tick")]
    NoTickBudget,
}

/// State after one simulated tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSample {
    /// 1-based tick index.
    pub tick: u64,
    pub time_s: f64,
    pub velocity: Vector3,
    pub position: Vector3,
    pub resolution: Resolution,
    pub step: StepSample,
    /// True when the controller was consulted this tick rather than a held thrust reused.
    pub recomputed: bool,
    pub speed_error_m_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManeuverOutcome {
    Converged { ticks: u64, elapsed_s: f64 },
    DidNotConverge { ticks: u64, residual_m_s: f64 },
}

impl ManeuverOutcome {
    pub fn converged(&self) -> bool {
        matches!(self, ManeuverOutcome::Converged { .. })
    }

    pub fn ticks(&self) -> u64 {
        match *self {
            ManeuverOutcome::Converged { ticks, .. } | ManeuverOutcome::DidNotConverge { ticks, .. } => {
                ticks
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ManeuverOutcome::Converged { .. } => "converged",
            ManeuverOutcome::DidNotConverge { .. } => "did_not_converge",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ManeuverReport {
    pub outcome: ManeuverOutcome,
    pub final_state: KinematicState,
    /// Number of ticks on which the controller was consulted.
    pub recompute_count: u64,
    pub samples: Vec<TickSample>,
}

impl ManeuverReport {
    pub fn residual_m_s(&self, desired: &DesiredState) -> f64 {
        speed_error(&self.final_state.velocity, &desired.velocity())
    }
}

fn speed_error(velocity: &Vector3, target: &Vector3) -> f64 {
    vector::norm(&vector::sub(target, velocity))
}

/// Number of whole ticks a thrust may be held for, never less than one.
fn hold_ticks(hold_time_s: f64, dt: f64) -> u64 {
    let ticks = (hold_time_s / dt + HOLD_TICK_SLACK).floor();
    if ticks.is_finite() && ticks >= 1.0 {
        ticks as u64
    } else {
        1
    }
}

/// Fly `ship` from `initial` toward `config.desired`, one control interval per tick.
///
/// The envelope is used as configured on the ship, so an engaged afterburner must be set
/// there beforehand.
pub fn run_maneuver(
    ship: &Ship,
    initial: KinematicState,
    config: &ManeuverConfig,
) -> Result<ManeuverReport, ManeuverError> {
    if !(config.tolerance_m_s.is_finite() && config.tolerance_m_s >= 0.0) {
        return Err(ManeuverError::InvalidTolerance(config.tolerance_m_s));
    }
    if config.max_ticks == 0 {
        return Err(ManeuverError::NoTickBudget);
    }

    let dt = ship.controller.update_interval_s();
    let target = config.desired.velocity();
    let mut state = initial;
    let mut samples = Vec::new();
    let mut recompute_count = 0;
    let mut held: Option<(Resolution, u64)> = None;

    info!(
        ship = %ship.name,
        mode = ship.controller.config().mode.as_str(),
        scheduling = config.scheduling.as_str(),
        spacebrake = config.spacebrake,
        afterburner = ship.envelope.afterburner_engaged(),
        "starting maneuver"
    );

    let mut tick = 0;
    let outcome = loop {
        let error = speed_error(&state.velocity, &target);
        if error <= config.tolerance_m_s {
            break ManeuverOutcome::Converged {
                ticks: tick,
                elapsed_s: tick as f64 * dt,
            };
        }
        if tick == config.max_ticks {
            break ManeuverOutcome::DidNotConverge {
                ticks: tick,
                residual_m_s: error,
            };
        }

        let (resolution, recomputed) = match held.take() {
            Some((resolution, remaining)) if remaining > 0 => {
                held = Some((resolution, remaining - 1));
                (resolution, false)
            }
            _ => {
                let resolution =
                    ship.controller
                        .resolve(&state, &config.desired, &ship.envelope, config.spacebrake);
                if config.scheduling == Scheduling::EventDriven {
                    let schedule = schedule_burn(&state, target, &ship.envelope, resolution.thrust);
                    let ticks = hold_ticks(schedule.hold_time_s, dt);
                    debug!(
                        tick,
                        hold_time_s = schedule.hold_time_s,
                        total_burn_time_s = schedule.total_burn_time_s,
                        hold_ticks = ticks,
                        "scheduled burn"
                    );
                    held = Some((resolution, ticks - 1));
                }
                recompute_count += 1;
                (resolution, true)
            }
        };

        let step = apply(&mut state, resolution.thrust, dt);
        tick += 1;
        samples.push(TickSample {
            tick,
            time_s: tick as f64 * dt,
            velocity: state.velocity,
            position: state.position,
            resolution,
            step,
            recomputed,
            speed_error_m_s: speed_error(&state.velocity, &target),
        });
    };

    match outcome {
        ManeuverOutcome::Converged { ticks, elapsed_s } => {
            info!(ticks, elapsed_s, recompute_count, "maneuver converged")
        }
        ManeuverOutcome::DidNotConverge {
            ticks,
            residual_m_s,
        } => warn!(ticks, residual_m_s, "maneuver did not converge"),
    }

    Ok(ManeuverReport {
        outcome,
        final_state: state,
        recompute_count,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_ticks_rounds_down_with_floor_of_one() {
        assert_eq!(hold_ticks(0.0, 0.05), 1);
        assert_eq!(hold_ticks(0.01, 0.05), 1);
        assert_eq!(hold_ticks(1.0, 0.05), 20);
        assert_eq!(hold_ticks(0.149, 0.05), 2);
        assert_eq!(hold_ticks(f64::INFINITY, 0.05), 1);
    }
}
