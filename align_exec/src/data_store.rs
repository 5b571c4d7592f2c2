//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::constraints::HeightCategory;
use crate::drive_ctrl::{self, DriveToPose, OperatorInput, VelocityCmd};
use crate::loc::LocMgr;
use crate::targets::Alliance;
use crate::tm::AlignTm;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time at the start of this cycle
    pub time_s: f64,

    // Robot-wide inputs
    /// The alliance the robot is playing on
    pub alliance: Alliance,

    /// Elevator height category reported by the mechanism
    pub height: HeightCategory,

    /// Raw operator drive input
    pub operator_input: OperatorInput,

    // Localisation
    pub loc_mgr: LocMgr,

    // Drive controller
    pub drive_ctrl: DriveToPose,
    pub drive_ctrl_input: drive_ctrl::InputData,
    pub drive_ctrl_output: VelocityCmd,
    pub drive_ctrl_report: drive_ctrl::StatusReport,

    // Telemetry
    pub align_tm: AlignTm,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and
    /// sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        if self.num_cycles % (cycle_frequency_hz as u128) == 0 {
            self.is_1_hz_cycle = true;
        } else {
            self.is_1_hz_cycle = false;
        }

        self.drive_ctrl_input = drive_ctrl::InputData::default();
        self.drive_ctrl_output = VelocityCmd::zero();
        self.drive_ctrl_report = drive_ctrl::StatusReport::default();

        self.time_s = util::session::get_elapsed_seconds();
    }
}
