//! Event-driven burn scheduling.
//!
//! Instead of resolving every tick, a caller can hold the thrust from
//! [`ThrustController::resolve`](crate::ThrustController::resolve) until the first axis is
//! due to reach its target, then resolve again.

use thrust_core::constants::VELOCITY_EPSILON;
use thrust_core::vector::{self, Vector3};
use thrust_core::KinematicState;
use thrust_propulsion::{Axis, Sign, ThrustEnvelope};

/// When the controller is consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scheduling {
    /// Resolve on every control tick.
    #[default]
    Reactive,
    /// Resolve, then hold the result for the scheduled hold time.
    EventDriven,
}

impl Scheduling {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheduling::Reactive => "reactive",
            Scheduling::EventDriven => "event_driven",
        }
    }
}

/// Timing of a velocity change under the envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnSchedule {
    /// Time each axis needs at its maximum available thrust; infinite without authority.
    pub axis_burn_time_s: [f64; 3],
    /// Longest of the per-axis burn times.
    pub total_burn_time_s: f64,
    /// How long the supplied thrust can be held before an axis reaches its target.
    pub hold_time_s: f64,
}

/// Schedule the change from the current velocity to `desired_velocity` while holding `thrust`.
///
/// The hold time is zero whenever some axis is being pushed away from its target, and when
/// no axis would ever reach its target under `thrust`.
pub fn schedule_burn(
    state: &KinematicState,
    desired_velocity: Vector3,
    envelope: &ThrustEnvelope,
    thrust: Vector3,
) -> BurnSchedule {
    let mass = state.mass_kg();
    let delta_v = vector::sub(&desired_velocity, &state.velocity);
    let available = envelope.max_available(Sign::of_vector(&delta_v));
    let thrust_floor = VELOCITY_EPSILON * vector::norm(&thrust);

    let mut axis_burn_time_s = [0.0; 3];
    let mut hold_time_s = f64::INFINITY;
    let mut pushed_away = false;

    for axis in Axis::ALL {
        let i = axis.index();
        let dv = delta_v[i];
        let f = if thrust[i].abs() > thrust_floor {
            thrust[i]
        } else {
            0.0
        };

        if dv.abs() < VELOCITY_EPSILON {
            pushed_away |= f != 0.0;
            continue;
        }

        axis_burn_time_s[i] = if available[i].abs() < VELOCITY_EPSILON {
            f64::INFINITY
        } else {
            dv * mass / available[i]
        };

        if f * dv < 0.0 {
            pushed_away = true;
        } else if f != 0.0 {
            hold_time_s = hold_time_s.min(dv * mass / f);
        }
    }

    let total_burn_time_s = axis_burn_time_s.iter().copied().fold(0.0, f64::max);
    if pushed_away || !hold_time_s.is_finite() {
        hold_time_s = 0.0;
    }

    BurnSchedule {
        axis_burn_time_s,
        total_burn_time_s,
        hold_time_s,
    }
}
