//! Known field landmark layout
//!
//! Landmarks are the numbered fiducial tags placed around the field. Reef
//! tags sit at the centre of each reef face and are generated from the same
//! hexagonal formula the target registry uses, so the layout cannot drift
//! from the target geometry.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use crate::targets::{to_alliance_frame, Alliance, Face, TargetParams};
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// True if the id belongs to a landmark placed on the field.
pub fn is_known_landmark(id: u8) -> bool {
    matches!(id, 1..=22)
}

/// Position of a landmark in the blue-alliance field frame.
///
/// Ids 17-22 are the blue reef faces, 6-11 the red reef faces (the blue
/// layout mirrored through the field centre). Returns `None` for ids not on
/// the field.
pub fn landmark_position(id: u8, params: &TargetParams) -> Option<Vector2<f64>> {
    match id {
        // Red loading stations and processor, mirrors of the blue ones
        1 => Some(mirror(blue_station_left(params), params)),
        2 => Some(mirror(blue_station_right(params), params)),
        3 => Some(mirror(blue_processor(params), params)),

        // Red barge wall
        4 => Some(Vector2::new(8.77, 1.88)),
        5 => Some(Vector2::new(8.77, 0.80)),

        // Red reef faces
        6..=11 => Some(mirror(reef_face_tag(id - 6, params), params)),

        // Blue loading stations
        12 => Some(blue_station_right(params)),
        13 => Some(blue_station_left(params)),

        // Blue barge wall
        14 => Some(Vector2::new(8.77, 7.25)),
        15 => Some(Vector2::new(8.77, 6.17)),

        // Blue processor
        16 => Some(blue_processor(params)),

        // Blue reef faces
        17..=22 => Some(reef_face_tag(id - 17, params)),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Tag position at the centre of a reef face, on the reef perimeter.
fn reef_face_tag(face_index: u8, params: &TargetParams) -> Vector2<f64> {
    // face_index is 0..6 by construction of the id ranges above
    let face = match face_index {
        0 => Face::F1,
        1 => Face::F2,
        2 => Face::F3,
        3 => Face::F4,
        4 => Face::F5,
        _ => Face::F6,
    };

    let theta = face.angle_rad();
    params.reef_centre_m + Vector2::new(theta.cos(), theta.sin()) * params.reef_radius_m
}

fn blue_station_left(params: &TargetParams) -> Vector2<f64> {
    params.source_left.position_m
}

fn blue_station_right(params: &TargetParams) -> Vector2<f64> {
    params.source_right.position_m
}

fn blue_processor(params: &TargetParams) -> Vector2<f64> {
    params.processor.position_m
}

fn mirror(position_m: Vector2<f64>, params: &TargetParams) -> Vector2<f64> {
    to_alliance_frame(
        &Pose {
            position_m,
            heading_rad: 0.0,
        },
        Alliance::Red,
        params,
    )
    .position_m
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
