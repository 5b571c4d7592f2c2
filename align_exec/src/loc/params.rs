//! Localisation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the localisation module
#[derive(Deserialize, Debug, Clone)]
pub struct LocParams {
    /// Single-landmark estimates with an ambiguity above this are rejected
    pub ambiguity_threshold: f64,

    /// Landmarks observed beyond this range carry no useful pose information
    pub trusted_landmark_dist_m: f64,

    /// Estimates further than this from the current pose are rejected as
    /// implausible jumps
    pub max_correction_dist_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for LocParams {
    fn default() -> Self {
        Self {
            ambiguity_threshold: 0.2,
            trusted_landmark_dist_m: 4.0,
            max_correction_dist_m: 1.0,
        }
    }
}
