//! Drive controller parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use crate::arrival::ArrivalParams;
use crate::constraints::ConstraintParams;
use crate::targets::TargetParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the drive controller
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Proportional gain from position error to velocity demand
    pub translation_k_p: f64,

    /// Proportional gain from heading error to rotation demand
    pub rotation_k_p: f64,

    /// Operator input magnitude above which an active drive is cancelled
    pub manual_deadband: f64,

    /// Automatically advance to the next queued target on arrival
    pub auto_advance: bool,

    /// Automatically return to idle on arrival instead of holding
    pub auto_cancel: bool,

    /// Field and reef geometry
    pub targets: TargetParams,

    /// Constraint planning parameters
    pub constraints: ConstraintParams,

    /// Arrival detection parameters
    pub arrival: ArrivalParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            translation_k_p: 2.5,
            rotation_k_p: 3.0,
            manual_deadband: 0.1,
            auto_advance: true,
            auto_cancel: false,
            targets: TargetParams::default(),
            constraints: ConstraintParams::default(),
            arrival: ArrivalParams::default(),
        }
    }
}
