//! # Telecommand processor module
//!
//! The telecommand processor handles TCs coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;

// Internal
use crate::data_store::DataStore;
use crate::tc::Tc;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules.
pub fn exec(ds: &mut DataStore, tc: &Tc) {
    debug!("Processing TC: {:?}", tc);

    match tc {
        Tc::EnqueueTarget(name) => {
            ds.drive_ctrl.enqueue_target(name);
        }
        Tc::PopTarget => {
            ds.drive_ctrl.pop_target();
        }
        Tc::DeleteFrontTarget => ds.drive_ctrl.delete_front_target(),
        Tc::DeleteBackTarget => ds.drive_ctrl.delete_back_target(),
        Tc::ClearQueue => ds.drive_ctrl.clear_queue(),
        Tc::StartDriveToPose => ds.drive_ctrl.start(),
        Tc::CancelDriveToPose => ds.drive_ctrl.cancel(),
        Tc::SetAutoAdvance(enabled) => ds.drive_ctrl.set_auto_advance(*enabled),
        Tc::SetAutoCancel(enabled) => ds.drive_ctrl.set_auto_cancel(*enabled),
        Tc::SetHeight(height) => ds.height = *height,
        Tc::SetAlliance(alliance) => ds.alliance = *alliance,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
