use approx::assert_relative_eq;
use ship_thrust_control::config::{load_ship_configs, parse_ship_toml};
use ship_thrust_control::controller::{DesiredState, Scheduling, Strategy, ship};
use ship_thrust_control::maneuver::{ManeuverConfig, ManeuverError, ManeuverOutcome, run_maneuver};

fn catalog_ship(name: &str) -> ship::Ship {
    let catalog = load_ship_configs(concat!(env!("CARGO_MANIFEST_DIR"), "/configs/ships"))
        .expect("ship catalog");
    ship::select(&catalog, Some(name)).expect("ship")
}

#[test]
fn sample_catalog_loads_every_ship() {
    let catalog = load_ship_configs(concat!(env!("CARGO_MANIFEST_DIR"), "/configs/ships"))
        .expect("ship catalog");
    for name in ["Courier", "Hauler", "Scout"] {
        assert!(catalog.iter().any(|cfg| cfg.name == name), "missing {name}");
        ship::from_config(catalog.iter().find(|cfg| cfg.name == name).unwrap()).expect(name);
    }
}

#[test]
fn reactive_maneuver_reaches_forward_speed() {
    let scout = catalog_ship("scout");
    let config = ManeuverConfig::new(DesiredState::Heading {
        speed: 5.0,
        direction: [0.0, 0.0, 1.0],
    });
    let report = run_maneuver(&scout, scout.state_with([0.0; 3], [0.0; 3]).unwrap(), &config)
        .expect("maneuver");

    assert!(report.outcome.converged(), "{:?}", report.outcome);
    // 2000 N on 800 kg gives 0.125 m/s per 50 ms tick.
    assert!(report.outcome.ticks() >= 40 && report.outcome.ticks() <= 41);
    assert_eq!(report.recompute_count, report.outcome.ticks());
    assert_eq!(report.samples.len() as u64, report.outcome.ticks());
    assert_relative_eq!(report.final_state.velocity[2], 5.0, epsilon = 1e-3);
    assert!(report.final_state.position[2] > 0.0);
    assert_relative_eq!(report.samples[0].step.acceleration_m_s2[2], 2.5, epsilon = 1e-12);
}

#[test]
fn anti_drift_cancels_lateral_velocity_first() {
    let scout = catalog_ship("Scout");
    let config = ManeuverConfig::new(DesiredState::Heading {
        speed: 5.0,
        direction: [0.0, 0.0, 1.0],
    });
    let report = run_maneuver(&scout, scout.state_with([3.0, 0.0, 0.0], [0.0; 3]).unwrap(), &config)
        .expect("maneuver");

    assert!(report.outcome.converged(), "{:?}", report.outcome);
    let first = &report.samples[0];
    assert_eq!(first.resolution.strategy, Strategy::DriftCancelling);
    assert!(first.resolution.thrust[0] < 0.0);
    assert_relative_eq!(report.final_state.velocity[0], 0.0, epsilon = 1e-3);
    assert_relative_eq!(report.final_state.velocity[2], 5.0, epsilon = 1e-3);
}

#[test]
fn event_driven_holds_thrust_between_recomputes() {
    let courier = catalog_ship("Courier");
    assert_eq!(courier.scheduling, Scheduling::EventDriven);
    let mut config = ManeuverConfig::new(DesiredState::Velocity([2.0, 0.0, 10.0]));
    config.scheduling = courier.scheduling;

    let report = run_maneuver(&courier, courier.state_with([0.0; 3], [0.0; 3]).unwrap(), &config)
        .expect("maneuver");

    assert!(report.outcome.converged(), "{:?}", report.outcome);
    assert!(report.recompute_count <= 2, "recomputed {}", report.recompute_count);
    assert!(report.recompute_count < report.outcome.ticks());
    assert!(report.samples.iter().any(|s| !s.recomputed));
    assert!(report.samples[0].recomputed);
}

#[test]
fn spacebrake_brings_ship_to_rest() {
    let scout = catalog_ship("scout");
    let mut config = ManeuverConfig::new(DesiredState::rest());
    config.spacebrake = true;
    let report = run_maneuver(&scout, scout.state_with([6.0, -2.0, 9.0], [0.0; 3]).unwrap(), &config)
        .expect("maneuver");

    assert!(report.outcome.converged(), "{:?}", report.outcome);
    assert!(report.final_state.speed() <= 1e-3);
    assert_eq!(report.samples[0].resolution.strategy, Strategy::PerAxisMaximum);
}

#[test]
fn axis_without_authority_does_not_converge() {
    let crippled = ship::from_config(
        &parse_ship_toml(
            r#"
name = "Crippled"
mass_kg = 1000.0
max_thrust_n = [0.0, 1000.0, 1000.0]
min_thrust_n = [0.0, -1000.0, -1000.0]
"#,
        )
        .unwrap(),
    )
    .unwrap();
    let mut config = ManeuverConfig::new(DesiredState::Velocity([1.0, 0.0, 0.0]));
    config.max_ticks = 50;

    let report = run_maneuver(&crippled, crippled.state_with([0.0; 3], [0.0; 3]).unwrap(), &config)
        .expect("maneuver");
    assert_eq!(
        report.outcome,
        ManeuverOutcome::DidNotConverge {
            ticks: 50,
            residual_m_s: 1.0
        }
    );
    assert_eq!(report.samples.len(), 50);
}

#[test]
fn invalid_harness_settings_are_rejected() {
    let scout = catalog_ship("scout");
    let state = scout.state_with([0.0; 3], [0.0; 3]).unwrap();

    let mut config = ManeuverConfig::new(DesiredState::rest());
    config.tolerance_m_s = -1.0;
    assert_eq!(
        run_maneuver(&scout, state.clone(), &config).unwrap_err(),
        ManeuverError::InvalidTolerance(-1.0)
    );

    let mut config = ManeuverConfig::new(DesiredState::rest());
    config.max_ticks = 0;
    assert_eq!(
        run_maneuver(&scout, state, &config).unwrap_err(),
        ManeuverError::NoTickBudget
    );
}
