//! Core numeric primitives, reference frames, and kinematic state for the thrust controller workspace.
//!
//! Ship-local axes follow a right-handed convention: +X right, +Y up, +Z forward.

pub mod frame;
pub mod kinematics;

pub use kinematics::{KinematicError, KinematicState};

/// Numeric thresholds shared across crates.
pub mod constants {
    /// Magnitudes below this are treated as exactly zero before dividing (velocity scale).
    pub const VELOCITY_EPSILON: f64 = 1e-14;
    /// Speeds below this (m/s) are snapped to rest after integration.
    pub const REST_SPEED_EPSILON: f64 = 1e-4;
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    use super::constants::VELOCITY_EPSILON;

    /// Alias for a 3D vector in newtons, m/s, or metres depending on context.
    pub type Vector3 = [f64; 3];

    /// The zero vector.
    pub const ZERO: Vector3 = [0.0, 0.0, 0.0];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Unit vector in the direction of `v`, or `None` for a (near) zero vector.
    pub fn try_normalize(v: &Vector3) -> Option<Vector3> {
        let len = norm(v);
        if len < VELOCITY_EPSILON {
            None
        } else {
            Some(scale(v, 1.0 / len))
        }
    }

    /// Unit vector in the direction of `v`; the zero vector stays zero.
    #[inline]
    pub fn normalize(v: &Vector3) -> Vector3 {
        try_normalize(v).unwrap_or(ZERO)
    }

    /// Projection of `v` onto the unit vector `unit`.
    #[inline]
    pub fn project(v: &Vector3, unit: &Vector3) -> Vector3 {
        scale(unit, dot(v, unit))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use approx::assert_relative_eq;

        #[test]
        fn normalize_handles_zero_and_regular_vectors() {
            assert_eq!(normalize(&ZERO), ZERO);
            assert!(try_normalize(&[1e-16, 0.0, 0.0]).is_none());
            let n = normalize(&[3.0, 0.0, 4.0]);
            assert_relative_eq!(n[0], 0.6);
            assert_relative_eq!(n[2], 0.8);
            assert_relative_eq!(norm(&n), 1.0);
        }

        #[test]
        fn cross_follows_right_hand_rule() {
            let right = [1.0, 0.0, 0.0];
            let up = [0.0, 1.0, 0.0];
            assert_eq!(cross(&right, &up), [0.0, 0.0, 1.0]);
            assert_eq!(cross(&up, &right), [0.0, 0.0, -1.0]);
        }

        #[test]
        fn projection_splits_vector_into_parallel_part() {
            let v = [2.0, 3.0, 5.0];
            let along = project(&v, &[0.0, 0.0, 1.0]);
            assert_eq!(along, [0.0, 0.0, 5.0]);
            let rest = sub(&v, &along);
            assert_relative_eq!(dot(&rest, &along), 0.0);
        }
    }
}
