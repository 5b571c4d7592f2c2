//! # Alignment library.
//!
//! This library allows other crates in the workspace to access items defined
//! inside the alignment executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arrival detection - debounced position/rotation tolerance checks
pub mod arrival;

/// Constraint planning - distance and height based motion limits
pub mod constraints;

/// Global data store for the executable
pub mod data_store;

/// Drive to pose controller - drives the robot to queued targets
pub mod drive_ctrl;

/// Localisation module - maintains the robot's pose estimate on the field
pub mod loc;

/// Script interpreter - timed telecommand playback
pub mod script;

/// Simulation - kinematic robot model and simulated landmark camera
pub mod sim;

/// Target acquisition - registry, alliance transform, and target queue
pub mod targets;

/// Telecommand definitions
pub mod tc;

/// Telecommand processor - applies telecommands to the data store
pub mod tc_processor;

/// Telemetry packet definitions
pub mod tm;
