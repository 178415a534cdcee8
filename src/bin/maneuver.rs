use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use ship_thrust_control::config::load_ship_configs;
use ship_thrust_control::controller::ship;
use ship_thrust_control::controller::{
    ControllerConfig, DesiredState, Scheduling, ThrustController, ThrustMode,
};
use ship_thrust_control::export::summary::{ManeuverSummary, write_summary};
use ship_thrust_control::export::telemetry::{self, Record};
use ship_thrust_control::kinematics::vector::Vector3;
use ship_thrust_control::maneuver::{ManeuverConfig, ManeuverOutcome, ManeuverReport, run_maneuver};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Simulate a ship driving its velocity to a target under per-axis thrust limits"
)]
struct Cli {
    /// Ship catalog: a directory of TOML files, one TOML file, or a YAML list
    #[arg(long, default_value = "configs/ships")]
    ships: PathBuf,

    /// Ship name (case-insensitive, defaults to the first catalog entry)
    #[arg(long)]
    ship: Option<String>,

    /// Initial ship-local velocity in m/s, as x,y,z
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true, default_value = "0,0,0")]
    velocity: Vector3,

    /// Desired ship-local velocity in m/s, as x,y,z (defaults to coming to rest)
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true, conflicts_with_all = ["speed", "direction"])]
    desired: Option<Vector3>,

    /// Desired speed in m/s along --direction
    #[arg(long, allow_hyphen_values = true)]
    speed: Option<f64>,

    /// Desired flight direction as x,y,z (defaults to forward, 0,0,1)
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true, requires = "speed")]
    direction: Option<Vector3>,

    /// Override the ship's thrust mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Override the ship's scheduling
    #[arg(long, value_enum)]
    scheduling: Option<SchedulingArg>,

    /// Hold the spacebrake for the whole maneuver
    #[arg(long)]
    spacebrake: bool,

    /// Engage the afterburner for the whole maneuver
    #[arg(long)]
    afterburner: bool,

    /// Give up after this many control ticks
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u64,

    /// Speed error in m/s that counts as arrived
    #[arg(long, default_value_t = 1e-3)]
    tolerance: f64,

    /// Write per-tick telemetry CSV to this path (`-` for stdout)
    #[arg(long)]
    telemetry: Option<PathBuf>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum ModeArg {
    MaxThrust,
    Stable,
    AntiDriftStable,
}

impl From<ModeArg> for ThrustMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::MaxThrust => ThrustMode::MaxThrust,
            ModeArg::Stable => ThrustMode::Stable,
            ModeArg::AntiDriftStable => ThrustMode::AntiDriftStable,
        }
    }
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum SchedulingArg {
    Reactive,
    EventDriven,
}

impl From<SchedulingArg> for Scheduling {
    fn from(value: SchedulingArg) -> Self {
        match value {
            SchedulingArg::Reactive => Scheduling::Reactive,
            SchedulingArg::EventDriven => Scheduling::EventDriven,
        }
    }
}

fn parse_vector(text: &str) -> Result<Vector3, String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got '{text}'"));
    };
    let parse = |s: &str| {
        s.parse::<f64>()
            .map_err(|err| format!("invalid component '{s}': {err}"))
    };
    Ok([parse(*x)?, parse(*y)?, parse(*z)?])
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let catalog = load_ship_configs(&cli.ships)
        .with_context(|| format!("loading ship catalog from {}", cli.ships.display()))?;
    let mut ship = ship::select(&catalog, cli.ship.as_deref())?;
    if let Some(mode) = cli.mode {
        ship.controller = ThrustController::new(ControllerConfig {
            mode: mode.into(),
            ..*ship.controller.config()
        })?;
    }
    ship.envelope.set_afterburner(cli.afterburner);

    let desired = match (cli.desired, cli.speed) {
        (Some(velocity), _) => DesiredState::Velocity(velocity),
        (None, Some(speed)) => DesiredState::Heading {
            speed,
            direction: cli.direction.unwrap_or([0.0, 0.0, 1.0]),
        },
        (None, None) => DesiredState::rest(),
    };

    let config = ManeuverConfig {
        desired,
        spacebrake: cli.spacebrake,
        scheduling: cli.scheduling.map(Into::into).unwrap_or(ship.scheduling),
        max_ticks: cli.max_ticks,
        tolerance_m_s: cli.tolerance,
    };
    let initial = ship.state_with(cli.velocity, [0.0; 3])?;
    let report = run_maneuver(&ship, initial, &config)?;

    let telemetry_on_stdout = cli
        .telemetry
        .as_deref()
        .is_some_and(|path| path.as_os_str() == "-");
    if let Some(path) = &cli.telemetry {
        write_telemetry(path, &report)
            .with_context(|| format!("writing telemetry to {}", path.display()))?;
    }

    let summary = ManeuverSummary {
        ship: ship.name.clone(),
        mode: ship.controller.config().mode.as_str().to_string(),
        scheduling: config.scheduling.as_str().to_string(),
        spacebrake: config.spacebrake,
        afterburner: ship.envelope.afterburner_engaged(),
        outcome: report.outcome.as_str().to_string(),
        ticks: report.outcome.ticks(),
        elapsed_s: report.outcome.ticks() as f64 * ship.controller.update_interval_s(),
        recompute_count: report.recompute_count,
        desired_velocity_m_s: desired.velocity(),
        final_velocity_m_s: report.final_state.velocity,
        final_position_m: report.final_state.position,
        residual_m_s: report.residual_m_s(&desired),
    };
    if let Some(path) = &cli.summary {
        write_summary(path, &summary)
            .with_context(|| format!("writing summary to {}", path.display()))?;
    }

    // Keep stdout clean for CSV consumers.
    let mut out: Box<dyn Write> = if telemetry_on_stdout {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };
    print_summary(&mut out, &summary)?;

    if let ManeuverOutcome::DidNotConverge {
        ticks,
        residual_m_s,
    } = report.outcome
    {
        bail!("maneuver did not converge within {ticks} ticks (residual {residual_m_s:.6} m/s)");
    }
    Ok(())
}

fn write_telemetry(path: &std::path::Path, report: &ManeuverReport) -> std::io::Result<()> {
    let mut writer = telemetry::writer_for_path(path)?;
    telemetry::write_header(writer.as_mut())?;
    for sample in &report.samples {
        Record {
            tick: sample.tick,
            time_s: sample.time_s,
            velocity: sample.velocity,
            position: sample.position,
            thrust: sample.resolution.thrust,
            strategy: sample.resolution.strategy.as_str(),
            maxed_axis: sample.resolution.maxed_axis.map_or("", |axis| axis.as_str()),
            speed_error_m_s: sample.speed_error_m_s,
        }
        .write_to(writer.as_mut())?;
    }
    writer.flush()
}

fn print_summary(out: &mut dyn Write, summary: &ManeuverSummary) -> std::io::Result<()> {
    let fmt_vec = |v: &Vector3| format!("({:.3}, {:.3}, {:.3})", v[0], v[1], v[2]);
    writeln!(
        out,
        "Ship           : {} ({}, {})",
        summary.ship, summary.mode, summary.scheduling
    )?;
    writeln!(
        out,
        "Outcome        : {} after {} ticks ({:.3} s)",
        summary.outcome, summary.ticks, summary.elapsed_s
    )?;
    writeln!(out, "Recomputes     : {}", summary.recompute_count)?;
    writeln!(
        out,
        "Final velocity : {} m/s",
        fmt_vec(&summary.final_velocity_m_s)
    )?;
    writeln!(
        out,
        "Final position : {} m",
        fmt_vec(&summary.final_position_m)
    )?;
    writeln!(out, "Residual       : {:.6} m/s", summary.residual_m_s)
}
