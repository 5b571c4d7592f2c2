//! Vision estimate fusion
//!
//! Each cycle every vision source is polled for a pose estimate. Estimates
//! pass through a validity filter (known landmark ids, landmark range,
//! single-landmark ambiguity, plausibility against the current pose) and the
//! survivors are fused into a single correction.
//!
//! Headings are fused by summing hemisphere-aligned quaternions and
//! renormalising, never by averaging angles, so estimates straddling the
//! +/-pi boundary fuse correctly.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::{Quaternion, UnitQuaternion, Vector2, Vector3};

// Internal
use super::{landmarks, LocParams, Pose};
use crate::targets::TargetParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single landmark sighting contributing to a pose estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkObservation {
    /// Fiducial id of the landmark
    pub id: u8,

    /// Pose ambiguity of the sighting, 0 is unambiguous
    pub ambiguity: f64,

    /// Distance from the camera to the landmark
    pub distance_m: f64,
}

/// A camera-derived estimate of the robot's pose.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEstimate {
    pub pose: Pose,

    /// Session time the estimate was captured at
    pub timestamp_s: f64,

    /// Blend fraction to apply when injecting this estimate, in [0, 1]
    pub trust: f64,

    /// The landmark sightings the estimate was solved from
    pub landmarks: Vec<LandmarkObservation>,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of camera pose estimates.
///
/// The reference pose lets a source seed its solver with the current best
/// estimate, mirroring how a real multi-tag solver is initialised.
pub trait VisionSource {
    fn estimate(&mut self, reference: &Pose) -> Option<PoseEstimate>;
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Poll all sources and fuse the valid estimates into one correction.
///
/// Multi-landmark estimates are strictly preferred: if any survive the
/// filters, single-landmark estimates are discarded for the cycle.
pub fn fuse_cycle(
    sources: &mut [&mut dyn VisionSource],
    reference: &Pose,
    params: &LocParams,
    field: &TargetParams,
) -> Option<PoseEstimate> {
    let mut accepted: Vec<PoseEstimate> = Vec::with_capacity(sources.len());

    for source in sources.iter_mut() {
        if let Some(estimate) = source.estimate(reference) {
            if accept(&estimate, reference, params, field) {
                accepted.push(estimate);
            }
        }
    }

    if accepted.is_empty() {
        return None;
    }

    // Prefer multi-landmark solves when any are available
    if accepted.iter().any(|e| e.landmarks.len() >= 2) {
        accepted.retain(|e| e.landmarks.len() >= 2);
    }

    Some(fuse(&accepted))
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Apply the validity filters to a single estimate.
fn accept(
    estimate: &PoseEstimate,
    reference: &Pose,
    params: &LocParams,
    field: &TargetParams,
) -> bool {
    if estimate.landmarks.is_empty() {
        debug!("Rejecting estimate with no landmark sightings");
        return false;
    }

    for obs in estimate.landmarks.iter() {
        if !landmarks::is_known_landmark(obs.id) {
            debug!("Rejecting estimate containing unknown landmark id {}", obs.id);
            return false;
        }

        // The distance check runs against the landmark's position in the
        // field layout, not against the distance the source reports, so a
        // bad solve cannot vouch for itself
        let field_position = match landmarks::landmark_position(obs.id, field) {
            Some(p) => p,
            None => {
                debug!("Rejecting estimate, landmark {} has no field position", obs.id);
                return false;
            }
        };

        let distance_m = (field_position - reference.position_m).norm();
        if distance_m > params.trusted_landmark_dist_m {
            debug!(
                "Rejecting estimate, landmark {} is {:.2} m from the reference pose",
                obs.id, distance_m
            );
            return false;
        }

        // A far landmark constrains the solve too weakly to trust even when
        // its layout position is plausible
        if obs.distance_m > params.trusted_landmark_dist_m {
            debug!(
                "Rejecting estimate, landmark {} sighted at {:.2} m is beyond trusted range",
                obs.id, obs.distance_m
            );
            return false;
        }
    }

    // Single-landmark solves are ambiguous, gate them on the solver's
    // ambiguity figure
    if estimate.landmarks.len() == 1
        && estimate.landmarks[0].ambiguity > params.ambiguity_threshold
    {
        debug!(
            "Rejecting single-landmark estimate with ambiguity {:.3}",
            estimate.landmarks[0].ambiguity
        );
        return false;
    }

    // Estimates implausibly far from the current pose are jumps, not
    // corrections
    if estimate.pose.distance_to(reference) > params.max_correction_dist_m {
        debug!(
            "Rejecting estimate {:.2} m from the current pose",
            estimate.pose.distance_to(reference)
        );
        return false;
    }

    true
}

/// Fuse accepted estimates into one.
///
/// Positions are averaged. Headings are lifted onto unit quaternions about Z,
/// aligned into a common hemisphere, summed, and renormalised.
fn fuse(estimates: &[PoseEstimate]) -> PoseEstimate {
    let mut position_sum = Vector2::new(0.0, 0.0);
    let mut q_sum: Quaternion<f64> = Quaternion::new(0.0, 0.0, 0.0, 0.0);
    let mut q_first: Option<Quaternion<f64>> = None;
    let mut timestamp_s = std::f64::NEG_INFINITY;
    let mut trust = 0.0f64;
    let mut landmark_obs = Vec::new();

    for estimate in estimates.iter() {
        position_sum += estimate.pose.position_m;

        let mut q =
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), estimate.pose.heading_rad)
                .into_inner();

        // Align into the hemisphere of the first quaternion, q and -q are the
        // same rotation but cancel if summed naively
        match q_first {
            Some(ref first) => {
                if q.dot(first) < 0.0 {
                    q = -q;
                }
            }
            None => q_first = Some(q),
        }
        q_sum += q;

        timestamp_s = timestamp_s.max(estimate.timestamp_s);
        trust = trust.max(estimate.trust);
        landmark_obs.extend(estimate.landmarks.iter().cloned());
    }

    let n = estimates.len() as f64;
    let heading_rad = UnitQuaternion::from_quaternion(q_sum).euler_angles().2;

    PoseEstimate {
        pose: Pose {
            position_m: position_sum / n,
            heading_rad,
        },
        timestamp_s,
        trust,
        landmarks: landmark_obs,
    }
}

/// Check that every landmark sighting of an estimate refers to a tag on the
/// field layout, used by simulated sources to self-validate.
pub fn sightings_on_field(estimate: &PoseEstimate, params: &TargetParams) -> bool {
    estimate
        .landmarks
        .iter()
        .all(|obs| landmarks::landmark_position(obs.id, params).is_some())
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// A source returning a fixed estimate.
    struct FixedSource(Option<PoseEstimate>);

    impl VisionSource for FixedSource {
        fn estimate(&mut self, _reference: &Pose) -> Option<PoseEstimate> {
            self.0.clone()
        }
    }

    fn obs(id: u8, ambiguity: f64, distance_m: f64) -> LandmarkObservation {
        LandmarkObservation {
            id,
            ambiguity,
            distance_m,
        }
    }

    fn estimate(pose: Pose, landmarks: Vec<LandmarkObservation>) -> PoseEstimate {
        PoseEstimate {
            pose,
            timestamp_s: 1.0,
            trust: 0.3,
            landmarks,
        }
    }

    #[test]
    fn test_identical_estimates_fuse_to_themselves() {
        let params = LocParams::default();
        let field = TargetParams::default();
        let reference = Pose::new(3.0, 2.0, 0.5);
        let est = estimate(Pose::new(3.1, 2.0, 0.5), vec![obs(18, 0.0, 1.0), obs(19, 0.0, 1.2)]);

        let mut a = FixedSource(Some(est.clone()));
        let mut b = FixedSource(Some(est.clone()));
        let mut sources: Vec<&mut dyn VisionSource> = vec![&mut a, &mut b];

        let fused = fuse_cycle(&mut sources, &reference, &params, &field).unwrap();
        assert!((fused.pose.position_m - est.pose.position_m).norm() < 1e-9);
        assert!(util::maths::ang_diff(fused.pose.heading_rad, 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_heading_fusion_across_wrap() {
        let params = LocParams::default();
        let field = TargetParams::default();
        let pi = std::f64::consts::PI;
        let reference = Pose::new(3.0, 2.0, pi);

        let a = estimate(Pose::new(3.0, 2.0, pi - 0.1), vec![obs(18, 0.0, 1.0), obs(19, 0.0, 1.0)]);
        let b = estimate(Pose::new(3.0, 2.0, -pi + 0.1), vec![obs(20, 0.0, 1.0), obs(21, 0.0, 1.0)]);

        let mut src_a = FixedSource(Some(a));
        let mut src_b = FixedSource(Some(b));
        let mut sources: Vec<&mut dyn VisionSource> = vec![&mut src_a, &mut src_b];

        let fused = fuse_cycle(&mut sources, &reference, &params, &field).unwrap();

        // The mean of pi - 0.1 and -pi + 0.1 the short way round is pi, an
        // angle average would wrongly give 0
        assert!(util::maths::ang_diff(fused.pose.heading_rad, pi).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_invalid_estimates() {
        let params = LocParams::default();
        let field = TargetParams::default();
        let reference = Pose::new(3.0, 2.0, 0.0);

        let unknown_id = estimate(Pose::new(3.0, 2.0, 0.0), vec![obs(99, 0.0, 1.0)]);
        let too_far_landmarks = estimate(Pose::new(3.0, 2.0, 0.0), vec![obs(18, 0.0, 9.0)]);
        let ambiguous_single = estimate(Pose::new(3.0, 2.0, 0.0), vec![obs(18, 0.9, 1.0)]);
        let implausible_jump = estimate(Pose::new(9.0, 2.0, 0.0), vec![obs(18, 0.0, 1.0)]);
        let no_sightings = estimate(Pose::new(3.0, 2.0, 0.0), vec![]);

        for bad in [
            unknown_id,
            too_far_landmarks,
            ambiguous_single,
            implausible_jump,
            no_sightings,
        ]
        .iter()
        {
            let mut src = FixedSource(Some(bad.clone()));
            let mut sources: Vec<&mut dyn VisionSource> = vec![&mut src];
            assert!(fuse_cycle(&mut sources, &reference, &params, &field).is_none());
        }
    }

    #[test]
    fn test_multi_landmark_preferred_over_single() {
        let params = LocParams::default();
        let field = TargetParams::default();
        let reference = Pose::new(3.0, 2.0, 0.0);

        let single = estimate(Pose::new(3.5, 2.0, 0.0), vec![obs(18, 0.0, 1.0)]);
        let multi = estimate(Pose::new(3.0, 2.5, 0.0), vec![obs(18, 0.0, 1.0), obs(19, 0.0, 1.0)]);

        let mut src_single = FixedSource(Some(single));
        let mut src_multi = FixedSource(Some(multi.clone()));
        let mut sources: Vec<&mut dyn VisionSource> = vec![&mut src_single, &mut src_multi];

        let fused = fuse_cycle(&mut sources, &reference, &params, &field).unwrap();

        // The single-landmark estimate must not pull the fused position
        assert!((fused.pose.position_m - multi.pose.position_m).norm() < 1e-9);
    }

    #[test]
    fn test_landmark_field_position_checked_against_reference() {
        let params = LocParams::default();
        let field = TargetParams::default();
        let reference = Pose::new(16.0, 7.5, 0.0);

        // The source claims a short sighting of reef tag 18, but the layout
        // puts that tag on the far side of the field from the reference
        let bogus = estimate(Pose::new(16.0, 7.5, 0.0), vec![obs(18, 0.0, 1.0)]);

        let mut src = FixedSource(Some(bogus));
        let mut sources: Vec<&mut dyn VisionSource> = vec![&mut src];
        assert!(fuse_cycle(&mut sources, &reference, &params, &field).is_none());
    }

    #[test]
    fn test_ambiguous_single_passes_when_under_threshold() {
        let params = LocParams::default();
        let field = TargetParams::default();
        let reference = Pose::new(3.0, 2.0, 0.0);

        let single = estimate(Pose::new(3.1, 2.0, 0.1), vec![obs(18, 0.1, 1.0)]);

        let mut src = FixedSource(Some(single));
        let mut sources: Vec<&mut dyn VisionSource> = vec![&mut src];
        assert!(fuse_cycle(&mut sources, &reference, &params, &field).is_some());
    }
}
