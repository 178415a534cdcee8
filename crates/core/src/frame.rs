//! Ship-local ↔ world frame transforms.
//!
//! The controller works entirely in the ship-local frame; positions accumulate in the
//! world frame. Anything that can rotate between the two implements [`Orientation`].

use crate::vector::{self, Vector3};

/// Unit body axes in the ship-local frame.
pub const BODY_RIGHT: Vector3 = [1.0, 0.0, 0.0];
pub const BODY_UP: Vector3 = [0.0, 1.0, 0.0];
pub const BODY_FORWARD: Vector3 = [0.0, 0.0, 1.0];

/// Norm-preserving, bijective mapping between ship-local and world frames.
pub trait Orientation {
    fn to_world(&self, local: Vector3) -> Vector3;
    fn to_local(&self, world: Vector3) -> Vector3;
}

/// Unit quaternion (body→world).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    pub const fn identity() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotation of `angle` radians about `axis`. A zero axis yields the identity.
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Self {
        let Some(n) = vector::try_normalize(&axis) else {
            return Self::identity();
        };
        let (s, c) = (0.5 * angle).sin_cos();
        Self {
            w: c,
            x: n[0] * s,
            y: n[1] * s,
            z: n[2] * s,
        }
    }

    pub fn normalize(self) -> Self {
        let n2 = self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z;
        if n2 <= 0.0 || !n2.is_finite() {
            return Self::identity();
        }
        let inv = n2.sqrt().recip();
        Self {
            w: self.w * inv,
            x: self.x * inv,
            y: self.y * inv,
            z: self.z * inv,
        }
    }

    /// Hamilton product `self * o`.
    pub fn mul_q(self, o: Self) -> Self {
        Self {
            w: self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
            x: self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            y: self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            z: self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
        }
    }

    pub fn conj(self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    pub fn rotate(self, v: Vector3) -> Vector3 {
        let qv = Self {
            w: 0.0,
            x: v[0],
            y: v[1],
            z: v[2],
        };
        let r = self.mul_q(qv).mul_q(self.conj());
        [r.x, r.y, r.z]
    }
}

impl Orientation for Quaternion {
    fn to_world(&self, local: Vector3) -> Vector3 {
        self.rotate(local)
    }

    fn to_local(&self, world: Vector3) -> Vector3 {
        self.conj().rotate(world)
    }
}

/// Ship-local unit direction of travel, derived from orientation and world velocity.
///
/// Returns `None` while the craft is (numerically) at rest.
pub fn flight_direction<O: Orientation + ?Sized>(
    orientation: &O,
    world_velocity: Vector3,
) -> Option<Vector3> {
    vector::try_normalize(&orientation.to_local(world_velocity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn quarter_turn_about_up_maps_forward_to_right() {
        let q = Quaternion::from_axis_angle(BODY_UP, FRAC_PI_2);
        let world = q.to_world(BODY_FORWARD);
        assert_abs_diff_eq!(world[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(world[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(world[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn to_local_inverts_to_world() {
        let q = Quaternion::from_axis_angle([1.0, 2.0, -0.5], 0.83).normalize();
        let v = [4.0, -1.5, 9.0];
        let back = q.to_local(q.to_world(v));
        for i in 0..3 {
            assert_abs_diff_eq!(back[i], v[i], epsilon = 1e-12);
        }
        assert_abs_diff_eq!(
            vector::norm(&q.to_world(v)),
            vector::norm(&v),
            epsilon = 1e-12
        );
    }

    #[test]
    fn flight_direction_is_local_and_absent_at_rest() {
        let q = Quaternion::from_axis_angle(BODY_UP, FRAC_PI_2);
        // Moving along world +X while yawed so body forward points along world +X.
        let dir = flight_direction(&q, [12.0, 0.0, 0.0]).expect("moving");
        assert_abs_diff_eq!(dir[2], 1.0, epsilon = 1e-12);
        assert!(flight_direction(&q, [0.0, 0.0, 0.0]).is_none());
    }
}
