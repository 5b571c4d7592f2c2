//! Alliance mirror transform and target validity checks

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use super::TargetParams;
use crate::loc::Pose;
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The alliance the robot is playing on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alliance {
    Blue,
    Red,
}

impl Default for Alliance {
    fn default() -> Self {
        Alliance::Blue
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Transform a blue-frame pose into the current alliance's frame.
///
/// The red frame is the blue frame rotated half a turn about the field
/// centre, so positions reflect through the centre and headings flip by pi.
/// For blue this is the identity.
pub fn to_alliance_frame(pose: &Pose, alliance: Alliance, params: &TargetParams) -> Pose {
    match alliance {
        Alliance::Blue => *pose,
        Alliance::Red => Pose {
            position_m: Vector2::new(
                params.field_length_m - pose.position_m.x,
                params.field_width_m - pose.position_m.y,
            ),
            heading_rad: wrap_pi(pose.heading_rad + std::f64::consts::PI),
        },
    }
}

/// Check whether a pose sits suspiciously close to the field origin.
///
/// The registry never produces poses near the origin, so one turning up there
/// indicates an unset or default record. `None` is treated as invalid too.
pub fn is_near_origin(pose: Option<&Pose>, params: &TargetParams) -> bool {
    match pose {
        Some(p) => {
            p.position_m.norm() < params.near_origin_radius_m
                || (p.position_m.x.abs() < params.near_origin_epsilon_m
                    && p.position_m.y.abs() < params.near_origin_epsilon_m)
        }
        None => true,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_blue_is_identity() {
        let params = TargetParams::default();
        let pose = Pose::new(3.0, 2.0, 1.0);

        assert_eq!(to_alliance_frame(&pose, Alliance::Blue, &params), pose);
    }

    #[test]
    fn test_red_mirror_round_trip() {
        let params = TargetParams::default();
        let pose = Pose::new(3.0, 2.0, 1.0);

        let red = to_alliance_frame(&pose, Alliance::Red, &params);
        assert!((red.position_m.x - (params.field_length_m - 3.0)).abs() < 1e-12);
        assert!((red.position_m.y - (params.field_width_m - 2.0)).abs() < 1e-12);

        // Applying the mirror twice must give back the original
        let back = to_alliance_frame(&red, Alliance::Red, &params);
        assert!((back.position_m - pose.position_m).norm() < 1e-12);
        assert!(
            util::maths::ang_diff(back.heading_rad, pose.heading_rad).abs() < 1e-12
        );
    }

    #[test]
    fn test_near_origin() {
        let params = TargetParams::default();

        assert!(is_near_origin(Some(&Pose::new(0.0, 0.0, 0.0)), &params));
        assert!(is_near_origin(Some(&Pose::new(0.3, 0.2, 1.0)), &params));
        assert!(is_near_origin(None, &params));
        assert!(!is_near_origin(Some(&Pose::new(3.0, 2.0, 0.0)), &params));

        // Just outside the radius
        assert!(!is_near_origin(Some(&Pose::new(0.51, 0.0, 0.0)), &params));
    }
}
