//! Target registry

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use super::{Face, Level, Side, Target, TargetParams};
use crate::loc::Pose;
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Resolves symbolic target names into field poses.
///
/// Resolution is pure, the same name always produces the same target for a
/// given parameter set.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    params: TargetParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TargetRegistry {
    pub fn new(params: TargetParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TargetParams {
        &self.params
    }

    /// Resolve a symbolic name into a target.
    ///
    /// Returns `None` if the name doesn't follow any known convention.
    pub fn resolve(&self, name: &str) -> Option<Target> {
        match name {
            "SL" => {
                return Some(Target {
                    name: name.to_string(),
                    pose: self.params.source_left,
                    is_source: true,
                    face: None,
                    level: None,
                    side: None,
                })
            }
            "SR" => {
                return Some(Target {
                    name: name.to_string(),
                    pose: self.params.source_right,
                    is_source: true,
                    face: None,
                    level: None,
                    side: None,
                })
            }
            "Processor" => {
                return Some(Target {
                    name: name.to_string(),
                    pose: self.params.processor,
                    is_source: false,
                    face: None,
                    level: None,
                    side: None,
                })
            }
            _ => (),
        }

        let mut chars = name.chars();

        match (chars.next(), chars.next(), chars.next(), chars.next(), chars.next()) {
            // Coral branch: C<face><level><side>
            (Some('C'), Some(f), Some(l), Some(s), None) => {
                let face = Face::from_digit(f)?;
                let level = Level::from_digit(l)?;
                let side = Side::from_digit(s)?;

                Some(Target {
                    name: name.to_string(),
                    pose: self.face_approach_pose(face, Some(side)),
                    is_source: false,
                    face: Some(face),
                    level: Some(level),
                    side: Some(side),
                })
            }
            // Algae: A<face>0, centred on the face
            (Some('A'), Some(f), Some('0'), None, None) => {
                let face = Face::from_digit(f)?;

                Some(Target {
                    name: name.to_string(),
                    pose: self.face_approach_pose(face, None),
                    is_source: false,
                    face: Some(face),
                    level: None,
                    side: None,
                })
            }
            _ => None,
        }
    }

    /// Calculate the approach pose for a reef face.
    ///
    /// The pose sits on the face's outward normal at the approach standoff,
    /// heading pointing into the reef. Coral branches are offset laterally
    /// along the face, left being positive when looking at the face from
    /// outside.
    pub fn face_approach_pose(&self, face: Face, side: Option<Side>) -> Pose {
        let theta = face.angle_rad();
        let radial = Vector2::new(theta.cos(), theta.sin());
        let lateral = Vector2::new(-theta.sin(), theta.cos());

        let mut position_m = self.params.reef_centre_m
            + radial * (self.params.reef_radius_m + self.params.approach_standoff_m);

        if let Some(side) = side {
            position_m += lateral
                * match side {
                    Side::Left => self.params.branch_offset_m,
                    Side::Right => -self.params.branch_offset_m,
                };
        }

        Pose {
            position_m,
            heading_rad: wrap_pi(theta + std::f64::consts::PI),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
