//! # Localisation module
//!
//! This module maintains the robot's pose estimate on the field. The estimate
//! is propagated from commanded velocities each cycle and corrected by fusing
//! landmark-camera estimates when they pass the validity filters.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod fusion;
mod landmarks;
mod params;

pub use fusion::*;
pub use landmarks::*;
pub use params::LocParams;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use util::maths::{ang_diff, wrap_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pose (position and heading) of the robot in the field frame.
///
/// The field frame has its origin in the blue alliance right-hand corner,
/// X towards the red wall, and headings measured anticlockwise from X in
/// (-pi, pi].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Pose {
    /// The position in the field frame
    pub position_m: Vector2<f64>,

    /// The heading in the field frame
    pub heading_rad: f64,
}

/// Provides an interface to the localisation estimate of the robot.
#[derive(Debug, Clone, Default)]
pub struct LocMgr {
    params: LocParams,

    pose: Option<Pose>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad,
        }
    }

    /// Straight line distance to another pose.
    pub fn distance_to(&self, other: &Pose) -> f64 {
        (other.position_m - self.position_m).norm()
    }

    /// Shortest-arc heading error from this pose to another, in (-pi, pi].
    pub fn heading_error_to(&self, other: &Pose) -> f64 {
        ang_diff(other.heading_rad, self.heading_rad)
    }
}

impl LocMgr {
    pub fn new(params: LocParams) -> Self {
        Self { params, pose: None }
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = Some(pose);
    }

    pub fn get_pose(&self) -> Option<Pose> {
        self.pose
    }

    /// Propagate the estimate by a commanded field-frame velocity over `dt_s`.
    ///
    /// Does nothing until an initial pose has been set.
    pub fn propagate(&mut self, velocity_ms: Vector2<f64>, rotation_rads: f64, dt_s: f64) {
        if let Some(ref mut pose) = self.pose {
            pose.position_m += velocity_ms * dt_s;
            pose.heading_rad = wrap_pi(pose.heading_rad + rotation_rads * dt_s);
        }
    }

    /// Blend a fused vision estimate into the current pose.
    ///
    /// The estimate's trust gives the blend fraction, 0 keeps the current
    /// pose and 1 adopts the estimate outright. With no current pose the
    /// estimate is adopted directly.
    pub fn inject_correction(&mut self, estimate: &PoseEstimate) {
        match self.pose {
            Some(ref mut pose) => {
                let t = util::maths::clamp(&estimate.trust, &0.0, &1.0);

                pose.position_m += (estimate.pose.position_m - pose.position_m) * t;
                pose.heading_rad = wrap_pi(
                    pose.heading_rad + ang_diff(estimate.pose.heading_rad, pose.heading_rad) * t,
                );
            }
            None => self.pose = Some(estimate.pose),
        }
    }

    pub fn params(&self) -> &LocParams {
        &self.params
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
