//! # Drive to pose controller module
//!
//! The drive controller consumes the target queue and drives the robot to
//! each target in turn. It owns the queue, the constraint planner and the
//! arrival detector, and runs a small mode machine:
//!
//! - `Idle` - no drive in progress, zero command.
//! - `Validating` - the head target is checked before any motion. A missing
//!   or near-origin target aborts back to `Idle` with a warning.
//! - `Driving` - proportional control on the pose error, clamped to the
//!   planned constraints.
//! - `Arrived` - target held, advance or cancel per the configured policy.
//!
//! Operator input above the deadband cancels any active drive immediately,
//! the driver always wins.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

pub use params::Params;
pub use state::*;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use util::params::LoadError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A field-frame velocity demand for the drivetrain.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct VelocityCmd {
    /// Translational velocity in the field frame
    pub velocity_ms: Vector2<f64>,

    /// Anticlockwise rotation rate
    pub rotation_rads: f64,
}

/// Raw operator drive input, normalised to [-1, 1] per axis.
#[derive(Debug, Copy, Clone, Default)]
pub struct OperatorInput {
    pub translation: Vector2<f64>,
    pub rotation: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The mode of the drive controller. Each mode is handled by a `mode_xyz`
/// function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Mode {
    Idle,
    Validating,
    Driving,
    Arrived,
}

/// Possible errors that can occur during drive controller operation.
#[derive(Debug, thiserror::Error)]
pub enum DriveCtrlError {
    #[error("Parameter load error: {0}")]
    ParamLoadError(LoadError),

    #[error("No pose estimate available while driving")]
    NoPoseEstimate,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VelocityCmd {
    pub fn zero() -> Self {
        Self {
            velocity_ms: Vector2::new(0.0, 0.0),
            rotation_rads: 0.0,
        }
    }
}

impl Default for VelocityCmd {
    fn default() -> Self {
        Self::zero()
    }
}

impl OperatorInput {
    /// The largest axis deflection, compared against the deadband.
    pub fn magnitude(&self) -> f64 {
        self.translation.norm().max(self.rotation.abs())
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Idle
    }
}
