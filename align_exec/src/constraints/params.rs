//! Constraint planning parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use super::{AxisConstraint, HeightCategory};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Distances at which the interpolation knots sit.
///
/// Must be strictly increasing.
#[derive(Deserialize, Debug, Clone)]
pub struct DistanceKnots {
    pub very_close_m: f64,
    pub close_m: f64,
    pub mid_m: f64,
    pub far_m: f64,
}

/// Limit values at each knot for one axis.
#[derive(Deserialize, Debug, Clone)]
pub struct AxisTable {
    pub very_close: AxisConstraint,
    pub close: AxisConstraint,
    pub mid: AxisConstraint,
    pub far: AxisConstraint,
}

/// Limit multipliers per elevator height category.
#[derive(Deserialize, Debug, Clone)]
pub struct HeightFactors {
    pub lowered: f64,
    pub partially_raised: f64,
    pub mid_raised: f64,
    pub fully_raised: f64,
}

/// Parameters for constraint planning
#[derive(Deserialize, Debug, Clone)]
pub struct ConstraintParams {
    /// Interpolation knot distances
    pub knots: DistanceKnots,

    /// Translation limits at each knot
    pub translation: AxisTable,

    /// Rotation limits at each knot
    pub rotation: AxisTable,

    /// Height multipliers applied after interpolation
    pub height_factors: HeightFactors,

    /// Fraction of the far limits used when there is no target (distance
    /// is infinite)
    pub no_target_fraction: f64,

    /// Per-cycle smoothing fraction towards the newly planned limits, 1
    /// disables smoothing
    pub smoothing_factor: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HeightFactors {
    /// Multiplier for a height category.
    pub fn factor(&self, height: HeightCategory) -> f64 {
        match height {
            HeightCategory::Lowered => self.lowered,
            HeightCategory::PartiallyRaised => self.partially_raised,
            HeightCategory::MidRaised => self.mid_raised,
            HeightCategory::FullyRaised => self.fully_raised,
        }
    }
}

impl Default for ConstraintParams {
    fn default() -> Self {
        Self {
            knots: DistanceKnots {
                very_close_m: 0.1,
                close_m: 0.5,
                mid_m: 1.5,
                far_m: 4.0,
            },
            translation: AxisTable {
                very_close: AxisConstraint {
                    max_vel: 0.5,
                    max_accel: 0.75,
                },
                close: AxisConstraint {
                    max_vel: 1.0,
                    max_accel: 1.5,
                },
                mid: AxisConstraint {
                    max_vel: 2.0,
                    max_accel: 2.5,
                },
                far: AxisConstraint {
                    max_vel: 3.5,
                    max_accel: 3.5,
                },
            },
            rotation: AxisTable {
                very_close: AxisConstraint {
                    max_vel: 1.0,
                    max_accel: 2.0,
                },
                close: AxisConstraint {
                    max_vel: 2.0,
                    max_accel: 4.0,
                },
                mid: AxisConstraint {
                    max_vel: 4.0,
                    max_accel: 6.0,
                },
                far: AxisConstraint {
                    max_vel: 6.0,
                    max_accel: 8.0,
                },
            },
            height_factors: HeightFactors {
                lowered: 1.0,
                partially_raised: 0.75,
                mid_raised: 0.5,
                fully_raised: 0.25,
            },
            no_target_fraction: 0.5,
            smoothing_factor: 0.2,
        }
    }
}
