//! Thrust resolution for a single control tick.
//!
//! Every call recomputes from scratch: the controller keeps no state between ticks, so a
//! desired state that changes mid-maneuver is picked up on the very next tick.

use thrust_core::constants::VELOCITY_EPSILON;
use thrust_core::vector::{self, Vector3};
use thrust_core::KinematicState;
use thrust_propulsion::{Axis, ClampResult, Sign, ThrustEnvelope};
use tracing::trace;

use crate::mode::{ControllerConfig, ControllerError, DesiredState, ThrustMode};

/// Branch of the resolution that produced the thrust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The naive thrust fit inside the envelope and was returned as-is.
    Unsaturated,
    /// Uniformly scaled into the envelope.
    Uniform,
    /// Saturated axes pushed to their individual limits.
    PerAxisMaximum,
    /// Drift was small relative to progress; uniformly scaled.
    DriftTolerated,
    /// Along-track thrust limited to a ratio of the drift-cancelling thrust.
    DriftCancelling,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Unsaturated => "unsaturated",
            Strategy::Uniform => "uniform",
            Strategy::PerAxisMaximum => "per_axis_maximum",
            Strategy::DriftTolerated => "drift_tolerated",
            Strategy::DriftCancelling => "drift_cancelling",
        }
    }
}

/// Thrust to hold for the next control interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub thrust: Vector3,
    pub strategy: Strategy,
    /// Limiting axis of the final clamp, if any.
    pub maxed_axis: Option<Axis>,
}

/// Resolves per-tick thrust for one ship configuration.
#[derive(Debug, Clone)]
pub struct ThrustController {
    config: ControllerConfig,
}

impl ThrustController {
    pub fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[inline]
    pub fn update_interval_s(&self) -> f64 {
        self.config.update_interval_s
    }

    /// Thrust that drives `current` toward `desired` over one update interval.
    ///
    /// The caller must apply the returned thrust for exactly
    /// [`update_interval_s`](Self::update_interval_s) before resolving again.
    ///
    /// In [`ThrustMode::MaxThrust`] (and under an engaged spacebrake when the ship prioritizes
    /// stopping power) saturated axes are driven independently, so the thrust may point away
    /// from the desired direction and the flight path is not predictable.
    pub fn resolve(
        &self,
        current: &KinematicState,
        desired: &DesiredState,
        envelope: &ThrustEnvelope,
        spacebrake_engaged: bool,
    ) -> Resolution {
        let delta_v = vector::sub(&desired.velocity(), &current.velocity);
        let naive = vector::scale(
            &delta_v,
            current.mass_kg() / self.config.update_interval_s,
        );
        let clamped = envelope.clamp(naive);

        if !clamped.is_saturated() {
            return Resolution {
                thrust: clamped.thrust,
                strategy: Strategy::Unsaturated,
                maxed_axis: None,
            };
        }

        let brake_override = spacebrake_engaged && self.config.spacebrake_prioritizes_power;
        let mode = if brake_override {
            ThrustMode::MaxThrust
        } else {
            self.config.mode
        };

        let resolution = match mode {
            ThrustMode::MaxThrust => per_axis_maximum(&naive, &clamped, envelope),
            ThrustMode::Stable => uniform(&clamped, Strategy::Uniform),
            ThrustMode::AntiDriftStable => match desired.flight_direction() {
                Some(direction) => anti_drift(
                    &naive,
                    &clamped,
                    &direction,
                    envelope,
                    self.config.clamp_anti_drift_ratio,
                ),
                None => uniform(&clamped, Strategy::Uniform),
            },
        };

        trace!(
            mode = mode.as_str(),
            brake_override,
            strategy = resolution.strategy.as_str(),
            maxed_axis = ?resolution.maxed_axis,
            thrust = ?resolution.thrust,
            "resolved saturated thrust"
        );
        resolution
    }
}

fn uniform(clamped: &ClampResult, strategy: Strategy) -> Resolution {
    Resolution {
        thrust: clamped.thrust,
        strategy,
        maxed_axis: clamped.maxed_axis,
    }
}

/// Replace each axis with the ship's full capability on that axis wherever the naive demand
/// exceeds it; axes within capability keep the uniformly clamped value.
fn per_axis_maximum(naive: &Vector3, clamped: &ClampResult, envelope: &ThrustEnvelope) -> Resolution {
    let available = envelope.max_available(Sign::of_vector(naive));
    let thrust = [0, 1, 2].map(|i| {
        let demand = naive[i];
        if demand.abs() < VELOCITY_EPSILON {
            return clamped.thrust[i];
        }
        if available[i] / demand < 1.0 {
            available[i]
        } else {
            clamped.thrust[i]
        }
    });
    Resolution {
        thrust,
        strategy: Strategy::PerAxisMaximum,
        maxed_axis: clamped.maxed_axis,
    }
}

/// Split the naive thrust into along-track and drift parts and, when drift dominates, limit
/// the along-track part to `ratio` times the drift part before clamping.
fn anti_drift(
    naive: &Vector3,
    clamped: &ClampResult,
    direction: &Vector3,
    envelope: &ThrustEnvelope,
    ratio_floor: f64,
) -> Resolution {
    let along = vector::project(naive, direction);
    let drift = vector::sub(naive, &along);
    let drift_len = vector::norm(&drift);
    if drift_len <= VELOCITY_EPSILON * vector::norm(naive) {
        return uniform(clamped, Strategy::DriftTolerated);
    }

    let clamped_drift_len = vector::norm(&envelope.clamp(drift).thrust);
    if clamped_drift_len <= VELOCITY_EPSILON * drift_len {
        // No authority against the drift at all.
        return uniform(clamped, Strategy::DriftTolerated);
    }
    let clamped_along_len = vector::norm(&envelope.clamp(along).thrust);
    let ratio = ratio_floor.max(clamped_along_len / clamped_drift_len);

    let along_len = vector::norm(&along);
    if along_len / drift_len > ratio {
        return uniform(clamped, Strategy::DriftTolerated);
    }

    let along_dir = if vector::dot(naive, direction) < 0.0 {
        vector::scale(direction, -1.0)
    } else {
        *direction
    };
    let blended = vector::add(&drift, &vector::scale(&along_dir, drift_len * ratio));
    let result = envelope.clamp(blended);
    Resolution {
        thrust: result.thrust,
        strategy: Strategy::DriftCancelling,
        maxed_axis: result.maxed_axis,
    }
}
