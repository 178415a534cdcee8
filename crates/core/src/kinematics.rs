//! Rigid-body translational state advanced by the integrator.

use thiserror::Error;

use crate::vector::{self, Vector3, ZERO};

#[derive(Debug, Error, PartialEq)]
pub enum KinematicError {
    #[error("ship mass must be positive and finite (got {0} kg)")]
    InvalidMass(f64),
}

/// Translational state of one ship.
///
/// `velocity` is expressed in the ship-local frame, `position` in the world frame.
/// Mass is fixed for the lifetime of the state (no fuel burn).
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicState {
    mass_kg: f64,
    pub velocity: Vector3,
    pub position: Vector3,
}

impl KinematicState {
    pub fn new(mass_kg: f64, velocity: Vector3, position: Vector3) -> Result<Self, KinematicError> {
        if !(mass_kg.is_finite() && mass_kg > 0.0) {
            return Err(KinematicError::InvalidMass(mass_kg));
        }
        Ok(Self {
            mass_kg,
            velocity,
            position,
        })
    }

    /// A ship of the given mass at rest at the origin.
    pub fn at_rest(mass_kg: f64) -> Result<Self, KinematicError> {
        Self::new(mass_kg, ZERO, ZERO)
    }

    #[inline]
    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        vector::norm(&self.velocity)
    }

    /// Ship-local unit direction of travel; `None` while at rest.
    pub fn flight_direction(&self) -> Option<Vector3> {
        vector::try_normalize(&self.velocity)
    }
}
