use thiserror::Error;
use thrust_core::vector::{self, Vector3, ZERO};

/// Strategy used once the naive thrust would exceed the envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThrustMode {
    /// Push every saturated axis to its own limit. Favors raw stopping/accelerating power;
    /// the resulting flight path may not follow the desired direction.
    MaxThrust,
    /// Scale the naive thrust uniformly into the envelope.
    Stable,
    /// Cancel lateral drift first, spending only a bounded share on the travel axis.
    #[default]
    AntiDriftStable,
}

impl ThrustMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThrustMode::MaxThrust => "max_thrust",
            ThrustMode::Stable => "stable",
            ThrustMode::AntiDriftStable => "anti_drift_stable",
        }
    }
}

/// Target supplied by the pilot or autopilot for the current tick (ship-local frame).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DesiredState {
    Velocity(Vector3),
    /// Speed along a flight direction; the direction need not be normalized.
    Heading { speed: f64, direction: Vector3 },
}

impl DesiredState {
    /// Come to rest.
    pub fn rest() -> Self {
        DesiredState::Velocity(ZERO)
    }

    pub fn velocity(&self) -> Vector3 {
        match *self {
            DesiredState::Velocity(v) => v,
            DesiredState::Heading { speed, direction } => {
                vector::scale(&vector::normalize(&direction), speed)
            }
        }
    }

    /// Unit flight direction, when one can be derived.
    pub fn flight_direction(&self) -> Option<Vector3> {
        match self {
            DesiredState::Velocity(v) => vector::try_normalize(v),
            DesiredState::Heading { direction, .. } => vector::try_normalize(direction),
        }
    }
}

/// Tuning for one ship's controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub mode: ThrustMode,
    /// Lower bound on the along-track to drift-cancelling thrust ratio. A ratio of 1 caps the
    /// deviation from the drift-cancelling axis at 45°.
    pub clamp_anti_drift_ratio: f64,
    /// When set, an engaged spacebrake forces [`ThrustMode::MaxThrust`] behaviour.
    pub spacebrake_prioritizes_power: bool,
    /// Fixed control interval (s) the resolved thrust is held for.
    pub update_interval_s: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            mode: ThrustMode::default(),
            clamp_anti_drift_ratio: 1.0,
            spacebrake_prioritizes_power: true,
            update_interval_s: 0.05,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ControllerError {
    #[error("update interval must be positive and finite (got {0} s)")]
    InvalidUpdateInterval(f64),
    #[error("anti-drift ratio floor must be finite and non-negative (got {0})")]
    InvalidAntiDriftRatio(f64),
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ControllerError> {
        if !(self.update_interval_s.is_finite() && self.update_interval_s > 0.0) {
            return Err(ControllerError::InvalidUpdateInterval(
                self.update_interval_s,
            ));
        }
        if !(self.clamp_anti_drift_ratio.is_finite() && self.clamp_anti_drift_ratio >= 0.0) {
            return Err(ControllerError::InvalidAntiDriftRatio(
                self.clamp_anti_drift_ratio,
            ));
        }
        Ok(())
    }
}
