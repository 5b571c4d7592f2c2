//! # Telecommand definitions
//!
//! Telecommands are the operator-facing command surface of the executable,
//! deserialised from JSON either out of a script file or a future remote
//! link.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::constraints::HeightCategory;
use crate::targets::Alliance;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// All telecommands understood by the executable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tc {
    /// Resolve a target name and append it to the queue
    EnqueueTarget(String),

    /// Remove and discard the front target
    PopTarget,

    /// Delete the front target
    DeleteFrontTarget,

    /// Delete the most recently queued target
    DeleteBackTarget,

    /// Delete all queued targets
    ClearQueue,

    /// Begin driving to the head of the queue
    StartDriveToPose,

    /// Cancel any active drive
    CancelDriveToPose,

    /// Enable or disable advancing to the next target on arrival
    SetAutoAdvance(bool),

    /// Enable or disable returning to idle on arrival
    SetAutoCancel(bool),

    /// Report a new elevator height category
    SetHeight(HeightCategory),

    /// Set the alliance the robot is playing on
    SetAlliance(Alliance),
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
