//! # Motion constraint planning module
//!
//! This module plans per-axis velocity and acceleration limits for the drive
//! controller. Limits tighten as the robot closes on its target and as the
//! elevator rises, and are smoothed between cycles so the drivetrain never
//! sees a step change.
//!
//! Planning is a pure function of this cycle's distance and height inputs
//! plus the smoothing memory, recomputed every cycle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod planner;

pub use params::*;
pub use planner::*;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use util::maths::lerp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Velocity and acceleration limits for one motion axis.
///
/// Units are metres and seconds for the translation axis, radians and
/// seconds for the rotation axis.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AxisConstraint {
    pub max_vel: f64,
    pub max_accel: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The elevator height category, as reported by the mechanism.
///
/// Higher categories raise the robot's centre of mass and demand gentler
/// motion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightCategory {
    Lowered,
    PartiallyRaised,
    MidRaised,
    FullyRaised,
}

/// Distance band between the robot and its target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceBand {
    VeryClose,
    Close,
    Mid,
    Far,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AxisConstraint {
    pub fn zero() -> Self {
        Self {
            max_vel: 0.0,
            max_accel: 0.0,
        }
    }

    /// Scale both limits by a factor.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            max_vel: self.max_vel * factor,
            max_accel: self.max_accel * factor,
        }
    }

    /// Linearly interpolate both limits between two constraints.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self {
            max_vel: lerp(a.max_vel, b.max_vel, t),
            max_accel: lerp(a.max_accel, b.max_accel, t),
        }
    }
}

impl Default for HeightCategory {
    fn default() -> Self {
        HeightCategory::Lowered
    }
}

impl DistanceBand {
    /// Classify a distance against the band knots.
    pub fn of(distance_m: f64, knots: &DistanceKnots) -> Self {
        if distance_m <= knots.close_m {
            DistanceBand::VeryClose
        } else if distance_m <= knots.mid_m {
            DistanceBand::Close
        } else if distance_m <= knots.far_m {
            DistanceBand::Mid
        } else {
            DistanceBand::Far
        }
    }
}
