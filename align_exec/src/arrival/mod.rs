//! # Arrival detection module
//!
//! This module decides when the robot has genuinely arrived at a target
//! pose. Instantaneous tolerance checks are debounced over time, the robot
//! must hold inside tolerance continuously for the debounce period before an
//! arrival is declared, so a fast pass through the tolerance window doesn't
//! count.
//!
//! All timing state lives on the detector instance and is driven by the
//! caller's clock, one detector per drive controller.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

pub use params::ArrivalParams;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The arrival flags for one cycle.
#[derive(Debug, Copy, Clone, Default, Serialize)]
pub struct ArrivalReport {
    /// Position inside tolerance this cycle
    pub at_position: bool,

    /// Rotation inside tolerance this cycle
    pub at_rotation: bool,

    /// Position held inside tolerance for the debounce period
    pub position_reached: bool,

    /// Rotation held inside tolerance for the debounce period
    pub rotation_reached: bool,

    /// Both axes held inside tolerance simultaneously for the debounce period
    pub target_reached: bool,

    /// True only on the cycle `target_reached` first becomes true
    pub target_reached_rising: bool,
}

/// Debounced arrival detector.
#[derive(Debug, Clone, Default)]
pub struct ArrivalDetector {
    params: ArrivalParams,

    /// Time position entered tolerance, `None` while outside
    position_since_s: Option<f64>,

    /// Time rotation entered tolerance, `None` while outside
    rotation_since_s: Option<f64>,

    /// Time both axes entered tolerance together, `None` while either is out
    both_since_s: Option<f64>,

    prev_target_reached: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArrivalDetector {
    pub fn new(params: ArrivalParams) -> Self {
        Self {
            params,
            position_since_s: None,
            rotation_since_s: None,
            both_since_s: None,
            prev_target_reached: false,
        }
    }

    /// Clear all timers and edge state.
    pub fn reset(&mut self) {
        self.position_since_s = None;
        self.rotation_since_s = None;
        self.both_since_s = None;
        self.prev_target_reached = false;
    }

    /// Update the detector for one cycle.
    ///
    /// `active` is false whenever no drive is in progress, which resets the
    /// timers so a stale window can never declare an arrival.
    pub fn update(
        &mut self,
        now_s: f64,
        pose: &Pose,
        target: &Pose,
        active: bool,
    ) -> ArrivalReport {
        if !active {
            self.reset();
            return ArrivalReport::default();
        }

        let at_position = pose.distance_to(target) <= self.params.position_tolerance_m;
        let at_rotation =
            pose.heading_error_to(target).abs() <= self.params.rotation_tolerance_rad;

        let position_reached = Self::debounce(
            &mut self.position_since_s,
            at_position,
            now_s,
            self.params.debounce_s,
        );
        let rotation_reached = Self::debounce(
            &mut self.rotation_since_s,
            at_rotation,
            now_s,
            self.params.debounce_s,
        );
        let target_reached = Self::debounce(
            &mut self.both_since_s,
            at_position && at_rotation,
            now_s,
            self.params.debounce_s,
        );

        let target_reached_rising = target_reached && !self.prev_target_reached;
        self.prev_target_reached = target_reached;

        ArrivalReport {
            at_position,
            at_rotation,
            position_reached,
            rotation_reached,
            target_reached,
            target_reached_rising,
        }
    }

    /// Debounce one condition against its timer.
    ///
    /// The timer starts when the condition becomes true and clears the
    /// moment it goes false.
    fn debounce(since_s: &mut Option<f64>, condition: bool, now_s: f64, debounce_s: f64) -> bool {
        if condition {
            let t0 = since_s.get_or_insert(now_s);
            now_s - *t0 >= debounce_s
        } else {
            *since_s = None;
            false
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
