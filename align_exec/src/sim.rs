//! # Simulation module
//!
//! A kinematic robot model and a simulated landmark camera, letting the full
//! executive run without hardware. The camera implements `VisionSource` so
//! the localisation fusion path is exercised exactly as it would be with a
//! real camera behind it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use crate::drive_ctrl::VelocityCmd;
use crate::loc::{
    landmark_position, sightings_on_field, LandmarkObservation, Pose, PoseEstimate, VisionSource,
};
use crate::targets::TargetParams;
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematically ideal robot, integrates velocity commands directly.
#[derive(Debug, Clone)]
pub struct SimRobot {
    pub pose: Pose,
}

/// A simulated landmark camera.
///
/// Observes all landmarks within range of the true pose and reports a pose
/// estimate perturbed by a small deterministic wobble.
pub struct SimCamera {
    field: TargetParams,

    /// True pose of the robot, fed in by the executive each cycle
    truth: Pose,

    time_s: f64,

    /// Maximum range at which a landmark is seen
    max_range_m: f64,

    /// Amplitude of the position wobble
    noise_m: f64,

    /// Amplitude of the heading wobble
    noise_rad: f64,

    /// Trust reported with each estimate
    trust: f64,

    /// Phase offset so multiple cameras don't wobble in sync
    phase: f64,

    cycle: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimRobot {
    pub fn new(pose: Pose) -> Self {
        Self { pose }
    }

    /// Advance the robot by one cycle of the commanded velocity.
    pub fn step(&mut self, cmd: &VelocityCmd, dt_s: f64) {
        self.pose.position_m += cmd.velocity_ms * dt_s;
        self.pose.heading_rad = wrap_pi(self.pose.heading_rad + cmd.rotation_rads * dt_s);
    }
}

impl SimCamera {
    pub fn new(field: TargetParams, phase: f64) -> Self {
        Self {
            field,
            truth: Pose::default(),
            time_s: 0.0,
            max_range_m: 4.0,
            noise_m: 0.02,
            noise_rad: 0.01,
            trust: 0.3,
            phase,
            cycle: 0,
        }
    }

    /// Feed the camera the true robot state for this cycle.
    pub fn set_truth(&mut self, pose: Pose, time_s: f64) {
        self.truth = pose;
        self.time_s = time_s;
    }
}

impl VisionSource for SimCamera {
    fn estimate(&mut self, _reference: &Pose) -> Option<PoseEstimate> {
        self.cycle += 1;

        // Collect the landmarks in range of the true pose
        let mut landmarks = Vec::new();
        for id in 1..=22u8 {
            if let Some(position) = landmark_position(id, &self.field) {
                let distance_m = (position - self.truth.position_m).norm();
                if distance_m <= self.max_range_m {
                    landmarks.push(LandmarkObservation {
                        id,
                        ambiguity: 0.05,
                        distance_m,
                    });
                }
            }
        }

        if landmarks.is_empty() {
            return None;
        }

        // Deterministic wobble, repeatable run to run
        let w = (self.cycle as f64 * 0.37 + self.phase).sin();
        let pose = Pose {
            position_m: self.truth.position_m
                + Vector2::new(w * self.noise_m, -w * self.noise_m),
            heading_rad: wrap_pi(self.truth.heading_rad + w * self.noise_rad),
        };

        let estimate = PoseEstimate {
            pose,
            timestamp_s: self.time_s,
            trust: self.trust,
            landmarks,
        };
        debug_assert!(sightings_on_field(&estimate, &self.field));

        Some(estimate)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
