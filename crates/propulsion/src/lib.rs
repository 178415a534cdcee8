//! Per-axis propulsion limits and the clamping rules the controller relies on.

use thiserror::Error;
use thrust_core::vector::{self, Vector3};

/// Ship-local thrust axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Axes in tie-break order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Direction of push along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    /// Per-axis signs of a vector.
    pub fn of_vector(v: &Vector3) -> [Sign; 3] {
        [Sign::of(v[0]), Sign::of(v[1]), Sign::of(v[2])]
    }
}

/// Errors raised when an envelope is configured inconsistently.
#[derive(Debug, Error, PartialEq)]
pub enum EnvelopeError {
    #[error("maximum thrust on axis {axis} must be finite and non-negative (got {value} N)")]
    InvalidMaxThrust { axis: &'static str, value: f64 },
    #[error("minimum thrust on axis {axis} must be finite and non-positive (got {value} N)")]
    InvalidMinThrust { axis: &'static str, value: f64 },
    #[error("afterburner factor must be finite and at least 1 (got {0})")]
    InvalidAfterburnerFactor(f64),
}

/// Outcome of clamping a thrust request against the envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampResult {
    pub thrust: Vector3,
    /// Axis whose limit determined the uniform scale; `None` when nothing was clamped.
    pub maxed_axis: Option<Axis>,
}

impl ClampResult {
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.maxed_axis.is_some()
    }
}

/// Propulsion limits of one ship, in newtons along each ship-local axis.
///
/// `max_thrust` holds the positive-direction limits, `min_thrust` the negative-direction
/// ones. Axes are treated as independently actuated (no shared power budget).
#[derive(Debug, Clone, PartialEq)]
pub struct ThrustEnvelope {
    max_thrust: Vector3,
    min_thrust: Vector3,
    afterburner_factor: f64,
    afterburner_engaged: bool,
}

impl ThrustEnvelope {
    pub fn new(
        max_thrust: Vector3,
        min_thrust: Vector3,
        afterburner_factor: f64,
    ) -> Result<Self, EnvelopeError> {
        for axis in Axis::ALL {
            let i = axis.index();
            if !(max_thrust[i].is_finite() && max_thrust[i] >= 0.0) {
                return Err(EnvelopeError::InvalidMaxThrust {
                    axis: axis.as_str(),
                    value: max_thrust[i],
                });
            }
            if !(min_thrust[i].is_finite() && min_thrust[i] <= 0.0) {
                return Err(EnvelopeError::InvalidMinThrust {
                    axis: axis.as_str(),
                    value: min_thrust[i],
                });
            }
        }
        if !(afterburner_factor.is_finite() && afterburner_factor >= 1.0) {
            return Err(EnvelopeError::InvalidAfterburnerFactor(afterburner_factor));
        }
        Ok(Self {
            max_thrust,
            min_thrust,
            afterburner_factor,
            afterburner_engaged: false,
        })
    }

    /// Envelope with identical limits in both directions on every axis and no afterburner.
    pub fn symmetric(limit: Vector3) -> Result<Self, EnvelopeError> {
        Self::new(limit, vector::scale(&limit, -1.0), 1.0)
    }

    pub fn set_afterburner(&mut self, engaged: bool) {
        self.afterburner_engaged = engaged;
    }

    pub fn with_afterburner(mut self, engaged: bool) -> Self {
        self.set_afterburner(engaged);
        self
    }

    #[inline]
    pub fn afterburner_engaged(&self) -> bool {
        self.afterburner_engaged
    }

    #[inline]
    pub fn afterburner_factor(&self) -> f64 {
        self.afterburner_factor
    }

    fn active_factor(&self) -> f64 {
        if self.afterburner_engaged {
            self.afterburner_factor
        } else {
            1.0
        }
    }

    /// Effective positive-direction limits (afterburner applied).
    pub fn upper(&self) -> Vector3 {
        vector::scale(&self.max_thrust, self.active_factor())
    }

    /// Effective negative-direction limits (afterburner applied).
    pub fn lower(&self) -> Vector3 {
        vector::scale(&self.min_thrust, self.active_factor())
    }

    /// Scale `thrust` uniformly so every component lies inside the envelope.
    ///
    /// The most restrictive axis sets the scale for the whole vector, so the direction is
    /// preserved. Ties go to the earlier axis (X, then Y, then Z).
    pub fn clamp(&self, thrust: Vector3) -> ClampResult {
        let upper = self.upper();
        let lower = self.lower();

        let mut factor = 1.0_f64;
        let mut maxed_axis = None;
        for axis in Axis::ALL {
            let i = axis.index();
            let t = thrust[i];
            let axis_factor = if t > upper[i] {
                upper[i] / t
            } else if t < lower[i] {
                lower[i] / t
            } else {
                1.0
            };
            if axis_factor < factor {
                factor = axis_factor;
                maxed_axis = Some(axis);
            }
        }

        let Some(axis) = maxed_axis else {
            return ClampResult {
                thrust,
                maxed_axis: None,
            };
        };

        let scaled = vector::scale(&thrust, factor);
        // Rounding in the scale can leave a component an ulp outside its bound.
        let mut clamped = [0, 1, 2].map(|i| scaled[i].clamp(lower[i], upper[i]));
        let i = axis.index();
        clamped[i] = if thrust[i] > 0.0 { upper[i] } else { lower[i] };
        ClampResult {
            thrust: clamped,
            maxed_axis,
        }
    }

    /// Largest thrust the ship can produce pushing in the given per-axis directions.
    pub fn max_available(&self, signs: [Sign; 3]) -> Vector3 {
        let upper = self.upper();
        let lower = self.lower();
        [0, 1, 2].map(|i| match signs[i] {
            Sign::Zero => 0.0,
            Sign::Positive => upper[i],
            Sign::Negative => lower[i],
        })
    }
}
