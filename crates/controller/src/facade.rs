//! Re-exported APIs for consumers of the controller crate.

pub use crate::mode::{ControllerConfig, ControllerError, DesiredState, ThrustMode};
pub use crate::resolve::{Resolution, Strategy, ThrustController};
pub use crate::schedule::{BurnSchedule, Scheduling, schedule_burn};
pub use thrust_propulsion::{Axis, ClampResult, EnvelopeError, ThrustEnvelope};

pub mod ship {
    use thiserror::Error;
    use thrust_config::{SchedulingConfig, ShipConfig, ThrustModeConfig};
    use thrust_core::vector::Vector3;
    use thrust_core::{KinematicError, KinematicState};
    use thrust_propulsion::{EnvelopeError, ThrustEnvelope};

    use crate::mode::{ControllerConfig, ControllerError, ThrustMode};
    use crate::resolve::ThrustController;
    use crate::schedule::Scheduling;

    /// Errors surfaced when selecting or assembling ships.
    #[derive(Debug, Error)]
    pub enum ShipError {
        #[error("ship '{0}' not found in catalog")]
        NotFound(String),
        #[error("ship catalog is empty")]
        EmptyCatalog,
        #[error("invalid thrust envelope: {0}")]
        Envelope(#[from] EnvelopeError),
        #[error("invalid controller settings: {0}")]
        Controller(#[from] ControllerError),
        #[error("invalid mass: {0}")]
        Kinematic(#[from] KinematicError),
    }

    /// Runtime ship: propulsion limits plus the controller that drives them.
    #[derive(Debug, Clone)]
    pub struct Ship {
        pub name: String,
        pub mass_kg: f64,
        pub envelope: ThrustEnvelope,
        pub controller: ThrustController,
        pub scheduling: Scheduling,
    }

    impl Ship {
        /// Kinematic state of this ship with the given velocity and position.
        pub fn state_with(
            &self,
            velocity: Vector3,
            position: Vector3,
        ) -> Result<KinematicState, KinematicError> {
            KinematicState::new(self.mass_kg, velocity, position)
        }
    }

    impl From<ThrustModeConfig> for ThrustMode {
        fn from(value: ThrustModeConfig) -> Self {
            match value {
                ThrustModeConfig::MaxThrust => ThrustMode::MaxThrust,
                ThrustModeConfig::Stable => ThrustMode::Stable,
                ThrustModeConfig::AntiDriftStable => ThrustMode::AntiDriftStable,
            }
        }
    }

    impl From<SchedulingConfig> for Scheduling {
        fn from(value: SchedulingConfig) -> Self {
            match value {
                SchedulingConfig::Reactive => Scheduling::Reactive,
                SchedulingConfig::EventDriven => Scheduling::EventDriven,
            }
        }
    }

    /// Convert a `ShipConfig` into a runtime `Ship`.
    pub fn from_config(config: &ShipConfig) -> Result<Ship, ShipError> {
        // Validates the mass.
        KinematicState::at_rest(config.mass_kg)?;

        let envelope = ThrustEnvelope::new(
            config.max_thrust_n,
            config.min_thrust_n,
            config.afterburner_factor,
        )?;
        let settings = &config.controller;
        let controller = ThrustController::new(ControllerConfig {
            mode: settings.mode.into(),
            clamp_anti_drift_ratio: settings.clamp_anti_drift_ratio,
            spacebrake_prioritizes_power: settings.spacebrake_prioritizes_power,
            update_interval_s: settings.update_interval_s,
        })?;

        Ok(Ship {
            name: config.name.clone(),
            mass_kg: config.mass_kg,
            envelope,
            controller,
            scheduling: settings.scheduling.into(),
        })
    }

    /// Select a ship from the catalog by optional name, defaulting to the first entry.
    pub fn select(configs: &[ShipConfig], requested: Option<&str>) -> Result<Ship, ShipError> {
        let Some(first) = configs.first() else {
            return Err(ShipError::EmptyCatalog);
        };

        let chosen = if let Some(name) = requested {
            let upper = name.to_uppercase();
            configs
                .iter()
                .find(|cfg| cfg.name.to_uppercase() == upper)
                .ok_or_else(|| ShipError::NotFound(name.to_string()))?
        } else {
            first
        };

        from_config(chosen)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use thrust_config::parse_ship_toml;

        fn catalog() -> Vec<ShipConfig> {
            [
                r#"
name = "Scout"
mass_kg = 800.0
max_thrust_n = [1000.0, 1000.0, 2000.0]
min_thrust_n = [-1000.0, -1000.0, -500.0]
"#,
                r#"
name = "Courier"
mass_kg = 12000.0
max_thrust_n = [90000.0, 90000.0, 240000.0]
min_thrust_n = [-90000.0, -90000.0, -120000.0]
afterburner_factor = 1.5
[controller]
mode = "max_thrust"
update_interval_s = 0.1
scheduling = "event_driven"
"#,
            ]
            .iter()
            .map(|text| parse_ship_toml(text).unwrap())
            .collect()
        }

        #[test]
        fn select_defaults_to_first_and_matches_case_insensitively() {
            let ships = catalog();
            assert_eq!(select(&ships, None).unwrap().name, "Scout");

            let courier = select(&ships, Some("courier")).unwrap();
            assert_eq!(courier.name, "Courier");
            assert_eq!(courier.controller.config().mode, ThrustMode::MaxThrust);
            assert_eq!(courier.controller.update_interval_s(), 0.1);
            assert_eq!(courier.scheduling, Scheduling::EventDriven);
            assert_eq!(courier.envelope.afterburner_factor(), 1.5);
            assert!(!courier.envelope.afterburner_engaged());
        }

        #[test]
        fn missing_and_empty_catalogs_are_errors() {
            assert!(matches!(
                select(&catalog(), Some("Freighter")),
                Err(ShipError::NotFound(name)) if name == "Freighter"
            ));
            assert!(matches!(select(&[], None), Err(ShipError::EmptyCatalog)));
        }

        #[test]
        fn invalid_entries_are_rejected() {
            let mut ships = catalog();
            ships[0].mass_kg = 0.0;
            assert!(matches!(from_config(&ships[0]), Err(ShipError::Kinematic(_))));

            let mut ships = catalog();
            ships[0].min_thrust_n[1] = 10.0;
            assert!(matches!(from_config(&ships[0]), Err(ShipError::Envelope(_))));

            let mut ships = catalog();
            ships[1].controller.update_interval_s = -1.0;
            assert!(matches!(from_config(&ships[1]), Err(ShipError::Controller(_))));
        }

        #[test]
        fn state_with_uses_ship_mass() {
            let ship = select(&catalog(), None).unwrap();
            let state = ship.state_with([1.0, 0.0, 0.0], [0.0; 3]).unwrap();
            assert_eq!(state.mass_kg(), 800.0);
            assert_eq!(state.velocity, [1.0, 0.0, 0.0]);
        }
    }
}
