//! Constant-acceleration integration of a resolved thrust over one control tick.
//!
//! The controller assumes its thrust is held for exactly `dt`; these helpers apply it
//! under that same assumption, so the two form a closed discrete-time loop.

use serde::Serialize;
use thrust_core::constants::REST_SPEED_EPSILON;
use thrust_core::frame::Orientation;
use thrust_core::vector::{self, Vector3, ZERO};
use thrust_core::KinematicState;

/// What a single integration step did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepSample {
    /// Ship-local acceleration applied during the step (m/s²).
    pub acceleration_m_s2: Vector3,
    /// World-frame displacement accumulated into the position (m).
    pub displacement_m: Vector3,
    /// True when the resulting speed was snapped to rest.
    pub snapped_to_rest: bool,
}

impl StepSample {
    fn idle() -> Self {
        Self {
            acceleration_m_s2: ZERO,
            displacement_m: ZERO,
            snapped_to_rest: false,
        }
    }
}

/// Advance `state` by `dt` seconds under constant ship-local `thrust`, with the ship-local
/// and world frames aligned.
///
/// A non-positive or non-finite `dt` leaves the state untouched.
pub fn apply(state: &mut KinematicState, thrust: Vector3, dt: f64) -> StepSample {
    step(state, thrust, dt, |local| local)
}

/// Same as [`apply`], rotating the local displacement into the world frame before it is
/// accumulated into `position`.
pub fn apply_oriented<O: Orientation + ?Sized>(
    state: &mut KinematicState,
    thrust: Vector3,
    dt: f64,
    orientation: &O,
) -> StepSample {
    step(state, thrust, dt, |local| orientation.to_world(local))
}

fn step(
    state: &mut KinematicState,
    thrust: Vector3,
    dt: f64,
    to_world: impl Fn(Vector3) -> Vector3,
) -> StepSample {
    if !(dt.is_finite() && dt > 0.0) {
        return StepSample::idle();
    }

    let accel = vector::scale(&thrust, 1.0 / state.mass_kg());

    // x += v*dt + 0.5*a*dt^2
    let local_displacement = vector::add(
        &vector::scale(&state.velocity, dt),
        &vector::scale(&accel, 0.5 * dt * dt),
    );
    let displacement = to_world(local_displacement);
    state.position = vector::add(&state.position, &displacement);
    state.velocity = vector::add(&state.velocity, &vector::scale(&accel, dt));

    // A residual speed this small has no meaningful direction.
    let snapped = vector::norm(&state.velocity) < REST_SPEED_EPSILON;
    if snapped {
        state.velocity = ZERO;
    }

    StepSample {
        acceleration_m_s2: accel,
        displacement_m: displacement,
        snapped_to_rest: snapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use thrust_core::frame::{Quaternion, BODY_UP};

    fn state(mass: f64, v: Vector3, p: Vector3) -> KinematicState {
        KinematicState::new(mass, v, p).unwrap()
    }

    #[test]
    fn constant_thrust_matches_closed_form() {
        let mass = 1200.0;
        let v0 = [1.0, -2.0, 3.5];
        let p0 = [10.0, 0.0, -4.0];
        let f = [600.0, 2400.0, -1200.0];
        let dt = 0.25;
        let mut s = state(mass, v0, p0);
        let sample = apply(&mut s, f, dt);

        for i in 0..3 {
            let a = f[i] / mass;
            assert_relative_eq!(s.velocity[i], v0[i] + a * dt, epsilon = 1e-12);
            assert_relative_eq!(
                s.position[i],
                p0[i] + v0[i] * dt + 0.5 * a * dt * dt,
                epsilon = 1e-12
            );
            assert_relative_eq!(sample.acceleration_m_s2[i], a, epsilon = 1e-15);
        }
        assert!(!sample.snapped_to_rest);
    }

    #[test]
    fn tiny_residual_speed_snaps_to_rest() {
        let mut s = state(1000.0, [0.0, 0.0, 5.0], [0.0; 3]);
        // Leaves 5e-5 m/s behind.
        apply(&mut s, [0.0, 0.0, -49_999.5], 0.1);
        assert_eq!(s.velocity, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let mut s = state(1000.0, [1.0, 2.0, 3.0], [4.0, 5.0, 6.0]);
        let before = s.clone();
        let sample = apply(&mut s, [1e6, 0.0, 0.0], 0.0);
        assert_eq!(s, before);
        assert_eq!(sample.displacement_m, ZERO);
        apply(&mut s, [1e6, 0.0, 0.0], -0.5);
        apply(&mut s, [1e6, 0.0, 0.0], f64::NAN);
        assert_eq!(s, before);
    }

    #[test]
    fn oriented_step_accumulates_position_in_world_frame() {
        // Yawed a quarter turn: body forward (+Z) points along world +X.
        let q = Quaternion::from_axis_angle(BODY_UP, std::f64::consts::FRAC_PI_2);
        let mut s = state(100.0, [0.0, 0.0, 10.0], [0.0; 3]);
        apply_oriented(&mut s, [0.0; 3], 2.0, &q);
        assert_relative_eq!(s.position[0], 20.0, epsilon = 1e-9);
        assert_relative_eq!(s.position[2], 0.0, epsilon = 1e-9);
        // Velocity stays in the ship-local frame.
        assert_eq!(s.velocity, [0.0, 0.0, 10.0]);
    }
}
