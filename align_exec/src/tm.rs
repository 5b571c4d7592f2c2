//! # Defines the telemetry pack for the executable

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use serde::Serialize;

use crate::drive_ctrl::{StatusReport, VelocityCmd};
use crate::loc::Pose;

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// Telemetry snapshot emitted once a second on the log.
#[derive(Debug, Clone, Serialize, Default)]
pub struct AlignTm {
    /// Current pose estimate
    pub pose: Option<Pose>,

    /// Drive controller status this cycle
    pub drive: StatusReport,

    /// The velocity command sent to the drivetrain
    pub cmd: VelocityCmd,

    /// Names of the queued targets, front first
    pub queue: Vec<String>,
}
