//! Target acquisition parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Deserialize;

// Internal
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters describing the field and reef geometry.
///
/// All positions are in the blue-alliance field frame, origin in the blue
/// right-hand corner, X towards the red wall.
#[derive(Deserialize, Debug, Clone)]
pub struct TargetParams {
    /// Length of the field along X
    pub field_length_m: f64,

    /// Width of the field along Y
    pub field_width_m: f64,

    /// Centre of the blue reef
    pub reef_centre_m: Vector2<f64>,

    /// Distance from the reef centre to a face
    pub reef_radius_m: f64,

    /// Standoff from a face at which the robot should stop
    pub approach_standoff_m: f64,

    /// Lateral offset from the face centre to a coral branch
    pub branch_offset_m: f64,

    /// Targets resolving within this distance of the field origin are
    /// considered invalid
    pub near_origin_radius_m: f64,

    /// Component-wise epsilon below which a pose is treated as the default
    /// (unset) record
    pub near_origin_epsilon_m: f64,

    /// Approach pose for the left loading source
    pub source_left: Pose,

    /// Approach pose for the right loading source
    pub source_right: Pose,

    /// Approach pose for the processor station
    pub processor: Pose,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            field_length_m: 17.55,
            field_width_m: 8.05,
            reef_centre_m: Vector2::new(4.489, 4.026),
            reef_radius_m: 0.832,
            approach_standoff_m: 0.45,
            branch_offset_m: 0.165,
            near_origin_radius_m: 0.5,
            near_origin_epsilon_m: 0.001,
            source_left: Pose::new(1.15, 7.05, -0.94),
            source_right: Pose::new(1.15, 1.00, 0.94),
            processor: Pose::new(6.34, 0.55, -std::f64::consts::FRAC_PI_2),
        }
    }
}
