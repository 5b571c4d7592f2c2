//! Arrival detection parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for arrival detection
#[derive(Deserialize, Debug, Clone)]
pub struct ArrivalParams {
    /// Position tolerance for being "at" a target
    pub position_tolerance_m: f64,

    /// Heading tolerance for being "at" a target
    pub rotation_tolerance_rad: f64,

    /// Time a condition must hold continuously before it is declared
    pub debounce_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ArrivalParams {
    fn default() -> Self {
        Self {
            position_tolerance_m: 0.05,
            rotation_tolerance_rad: 0.035,
            debounce_s: 0.5,
        }
    }
}
