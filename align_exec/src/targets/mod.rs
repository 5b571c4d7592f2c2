//! # Target acquisition module
//!
//! This module resolves symbolic target names into field poses, applies the
//! alliance mirror transform, and maintains the operator-fed queue of pending
//! targets.
//!
//! Target names follow the operator console convention:
//!
//! - `C<face><level><side>` - a reef branch, e.g. `C410` is face 4, level 2
//!   (level digits are zero based), left side.
//! - `A<face>0` - the algae position centred on a reef face.
//! - `SL`, `SR` - left and right loading sources.
//! - `Processor` - the processor station.
//!
//! All reef poses are produced by a single parameterised formula over the
//! hexagonal reef geometry, so all six faces share one code path.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod alliance;
mod params;
mod queue;
mod registry;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
pub use alliance::*;
pub use params::TargetParams;
pub use queue::TargetQueue;
pub use registry::TargetRegistry;

use crate::loc::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A named, registry-resolved target on the field.
///
/// Poses are always stored in the blue-alliance frame, the alliance mirror is
/// applied at lookup time by the consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    /// The symbolic name this target was resolved from
    pub name: String,

    /// The approach pose in the blue-alliance field frame
    pub pose: Pose,

    /// True if this target is a loading source rather than a scoring position
    pub is_source: bool,

    /// The reef face, for reef targets
    pub face: Option<Face>,

    /// The scoring level, for coral targets
    pub level: Option<Level>,

    /// The branch side, for coral targets
    pub side: Option<Side>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// One of the six reef faces.
///
/// Face 1 is the face pointing at the driver station wall, subsequent faces
/// proceed anticlockwise around the reef.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
}

/// A coral scoring level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    L1,
    L2,
    L3,
    L4,
}

/// The side of a reef face a coral branch sits on, viewed facing the face.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Face {
    /// Zero based index of the face, `F1` gives 0.
    pub fn index(&self) -> usize {
        match self {
            Face::F1 => 0,
            Face::F2 => 1,
            Face::F3 => 2,
            Face::F4 => 3,
            Face::F5 => 4,
            Face::F6 => 5,
        }
    }

    /// Angle of the face's outward normal from the field X axis.
    ///
    /// Face 1 points back towards the driver station (pi), faces proceed
    /// anticlockwise in 60 degree steps.
    pub fn angle_rad(&self) -> f64 {
        util::maths::wrap_pi(
            std::f64::consts::PI + (self.index() as f64) * std::f64::consts::FRAC_PI_3,
        )
    }

    /// Parse a face from its name digit (`'1'` to `'6'`).
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Face::F1),
            '2' => Some(Face::F2),
            '3' => Some(Face::F3),
            '4' => Some(Face::F4),
            '5' => Some(Face::F5),
            '6' => Some(Face::F6),
            _ => None,
        }
    }
}

impl Level {
    /// Parse a level from its name digit (`'0'` to `'3'`, zero based).
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(Level::L1),
            '1' => Some(Level::L2),
            '2' => Some(Level::L3),
            '3' => Some(Level::L4),
            _ => None,
        }
    }
}

impl Side {
    /// Parse a side from its name digit (`'0'` left, `'1'` right).
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(Side::Left),
            '1' => Some(Side::Right),
            _ => None,
        }
    }
}
