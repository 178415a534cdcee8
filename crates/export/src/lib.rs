//! Export helpers for maneuver telemetry (CSV) and run summaries (JSON).

pub mod telemetry {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    const HEADER: &str = "tick,time_s,vel_x,vel_y,vel_z,pos_x,pos_y,pos_z,thrust_x,thrust_y,thrust_z,strategy,maxed_axis,speed_error_m_s";

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write the telemetry CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One control tick as emitted to CSV.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub tick: u64,
        pub time_s: f64,
        pub velocity: [f64; 3],
        pub position: [f64; 3],
        pub thrust: [f64; 3],
        pub strategy: &'a str,
        /// Empty when no axis limited the thrust.
        pub maxed_axis: &'a str,
        pub speed_error_m_s: f64,
    }

    impl<'a> Record<'a> {
        /// Serialize the record to CSV, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            let [vx, vy, vz] = self.velocity;
            let [px, py, pz] = self.position;
            let [tx, ty, tz] = self.thrust;
            writeln!(
                writer,
                "{},{:.4},{:.6},{:.6},{:.6},{:.4},{:.4},{:.4},{:.3},{:.3},{:.3},{},{},{:.6}",
                self.tick,
                self.time_s,
                vx,
                vy,
                vz,
                px,
                py,
                pz,
                tx,
                ty,
                tz,
                self.strategy,
                self.maxed_axis,
                self.speed_error_m_s,
            )
        }
    }

}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// End-of-run report for a single maneuver.
    #[derive(Debug, Clone, Serialize)]
    pub struct ManeuverSummary {
        pub ship: String,
        pub mode: String,
        pub scheduling: String,
        pub spacebrake: bool,
        pub afterburner: bool,
        /// `converged` or `did_not_converge`.
        pub outcome: String,
        pub ticks: u64,
        pub elapsed_s: f64,
        pub recompute_count: u64,
        pub desired_velocity_m_s: [f64; 3],
        pub final_velocity_m_s: [f64; 3],
        pub final_position_m: [f64; 3],
        pub residual_m_s: f64,
    }

    /// Write the summary as pretty-printed JSON, creating parent directories as needed.
    pub fn write_summary(output: &Path, summary: &ManeuverSummary) -> io::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(output)?, summary)?;
        Ok(())
    }

}
