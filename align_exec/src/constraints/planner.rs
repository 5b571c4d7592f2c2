//! Constraint planner

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;

// Internal
use super::{AxisConstraint, AxisTable, ConstraintParams, DistanceBand, HeightCategory};
use util::maths::lin_map;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The limits planned for one cycle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlannedConstraints {
    pub translation: AxisConstraint,
    pub rotation: AxisConstraint,

    /// The distance band the plan was made in
    pub band: DistanceBand,

    /// True if the limits were forced to zero rather than planned
    pub zero_override: bool,
}

/// Plans motion limits from target distance and elevator height.
///
/// Each cycle's raw limits are interpolated from the band tables, scaled by
/// the height factor, then blended with the previous cycle's output so the
/// limits ramp rather than step.
#[derive(Debug, Clone)]
pub struct ConstraintPlanner {
    params: ConstraintParams,

    prev_translation: Option<AxisConstraint>,
    prev_rotation: Option<AxisConstraint>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ConstraintPlanner {
    pub fn new(params: ConstraintParams) -> Self {
        Self {
            params,
            prev_translation: None,
            prev_rotation: None,
        }
    }

    /// Forget the smoothing memory.
    ///
    /// Called when a drive episode starts so limits from a previous episode
    /// cannot leak into the new one.
    pub fn reset(&mut self) {
        self.prev_translation = None;
        self.prev_rotation = None;
    }

    /// Plan the limits for one cycle.
    ///
    /// A non-positive distance is a degenerate input, the plan is forced to
    /// zero and the smoothing memory is left untouched so recovery is
    /// immediate once the input is sane again. An infinite distance means
    /// "no target" and plans a fraction of the far limits.
    pub fn plan(&mut self, distance_m: f64, height: HeightCategory) -> PlannedConstraints {
        if distance_m.is_finite() && distance_m <= 0.0 {
            warn!(
                "Non-positive distance to target ({:.3} m), forcing zero constraints",
                distance_m
            );
            return PlannedConstraints {
                translation: AxisConstraint::zero(),
                rotation: AxisConstraint::zero(),
                band: DistanceBand::VeryClose,
                zero_override: true,
            };
        }

        let factor = self.params.height_factors.factor(height);

        let raw_translation =
            Self::interp(&self.params.translation, &self.params, distance_m).scale(factor);
        let raw_rotation =
            Self::interp(&self.params.rotation, &self.params, distance_m).scale(factor);

        let alpha = self.params.smoothing_factor;
        let translation = match self.prev_translation {
            Some(prev) => AxisConstraint::lerp(prev, raw_translation, alpha),
            None => raw_translation,
        };
        let rotation = match self.prev_rotation {
            Some(prev) => AxisConstraint::lerp(prev, raw_rotation, alpha),
            None => raw_rotation,
        };

        self.prev_translation = Some(translation);
        self.prev_rotation = Some(rotation);

        PlannedConstraints {
            translation,
            rotation,
            band: DistanceBand::of(distance_m, &self.params.knots),
            zero_override: false,
        }
    }

    pub fn params(&self) -> &ConstraintParams {
        &self.params
    }

    /// Piecewise-linear interpolation of an axis table over distance.
    fn interp(table: &AxisTable, params: &ConstraintParams, distance_m: f64) -> AxisConstraint {
        let knots = &params.knots;

        if distance_m.is_infinite() {
            return table.far.scale(params.no_target_fraction);
        }

        if distance_m <= knots.very_close_m {
            table.very_close
        } else if distance_m <= knots.close_m {
            let t = lin_map((knots.very_close_m, knots.close_m), (0.0, 1.0), distance_m);
            AxisConstraint::lerp(table.very_close, table.close, t)
        } else if distance_m <= knots.mid_m {
            let t = lin_map((knots.close_m, knots.mid_m), (0.0, 1.0), distance_m);
            AxisConstraint::lerp(table.close, table.mid, t)
        } else if distance_m <= knots.far_m {
            let t = lin_map((knots.mid_m, knots.far_m), (0.0, 1.0), distance_m);
            AxisConstraint::lerp(table.mid, table.far, t)
        } else {
            table.far
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    // First plan after a reset takes the raw value, so a fresh planner per
    // sample sees the interpolation unsmoothed
    fn raw_plan(distance_m: f64, height: HeightCategory) -> PlannedConstraints {
        ConstraintPlanner::new(ConstraintParams::default()).plan(distance_m, height)
    }

    #[test]
    fn test_limits_monotonic_with_distance() {
        let mut last = AxisConstraint::zero();

        for i in 1..100 {
            let d = i as f64 * 0.06;
            let plan = raw_plan(d, HeightCategory::Lowered);

            assert!(plan.translation.max_vel >= last.max_vel, "at {} m", d);
            assert!(plan.translation.max_accel >= last.max_accel, "at {} m", d);
            last = plan.translation;
        }
    }

    #[test]
    fn test_limits_continuous_at_knots() {
        let params = ConstraintParams::default();

        for knot in [
            params.knots.very_close_m,
            params.knots.close_m,
            params.knots.mid_m,
            params.knots.far_m,
        ]
        .iter()
        {
            let below = raw_plan(knot - 1e-9, HeightCategory::Lowered);
            let above = raw_plan(knot + 1e-9, HeightCategory::Lowered);
            assert!((below.translation.max_vel - above.translation.max_vel).abs() < 1e-6);
            assert!((below.rotation.max_vel - above.rotation.max_vel).abs() < 1e-6);
        }
    }

    #[test]
    fn test_height_scaling() {
        let params = ConstraintParams::default();
        let lowered = raw_plan(2.0, HeightCategory::Lowered);
        let raised = raw_plan(2.0, HeightCategory::FullyRaised);

        let f = params.height_factors.fully_raised;
        assert!((raised.translation.max_vel - lowered.translation.max_vel * f).abs() < 1e-9);
        assert!((raised.rotation.max_accel - lowered.rotation.max_accel * f).abs() < 1e-9);

        // Higher categories are never faster
        let mid = raw_plan(2.0, HeightCategory::MidRaised);
        let partial = raw_plan(2.0, HeightCategory::PartiallyRaised);
        assert!(raised.translation.max_vel <= mid.translation.max_vel);
        assert!(mid.translation.max_vel <= partial.translation.max_vel);
        assert!(partial.translation.max_vel <= lowered.translation.max_vel);
    }

    #[test]
    fn test_zero_override_skips_smoothing_memory() {
        let mut planner = ConstraintPlanner::new(ConstraintParams::default());

        let before = planner.plan(2.0, HeightCategory::Lowered);

        let zeroed = planner.plan(0.0, HeightCategory::Lowered);
        assert!(zeroed.zero_override);
        assert_eq!(zeroed.translation, AxisConstraint::zero());
        assert_eq!(zeroed.rotation, AxisConstraint::zero());

        // The zero cycle must not have polluted the memory, the next plan
        // continues from where the first left off
        let after = planner.plan(2.0, HeightCategory::Lowered);
        assert!((after.translation.max_vel - before.translation.max_vel).abs() < 1e-9);

        // Negative distances are also degenerate
        assert!(planner.plan(-0.3, HeightCategory::Lowered).zero_override);
    }

    #[test]
    fn test_no_target_uses_fraction_of_far() {
        let params = ConstraintParams::default();
        let plan = raw_plan(std::f64::INFINITY, HeightCategory::Lowered);

        assert_eq!(plan.band, DistanceBand::Far);
        assert!(
            (plan.translation.max_vel
                - params.translation.far.max_vel * params.no_target_fraction)
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_smoothing_converges() {
        let mut planner = ConstraintPlanner::new(ConstraintParams::default());
        let params = ConstraintParams::default();

        // Start far out, then jump close, the planned limit must move
        // gradually to the close value
        planner.plan(4.0, HeightCategory::Lowered);
        let first_close = planner.plan(0.3, HeightCategory::Lowered);

        let target = ConstraintPlanner::interp(&params.translation, &params, 0.3);
        assert!(first_close.translation.max_vel > target.max_vel);

        let mut last = first_close.translation.max_vel;
        for _ in 0..100 {
            last = planner.plan(0.3, HeightCategory::Lowered).translation.max_vel;
        }
        assert!((last - target.max_vel).abs() < 1e-3);
    }

    #[test]
    fn test_band_classification() {
        let params = ConstraintParams::default();
        let knots = &params.knots;

        assert_eq!(DistanceBand::of(0.05, knots), DistanceBand::VeryClose);
        assert_eq!(DistanceBand::of(0.4, knots), DistanceBand::VeryClose);
        assert_eq!(DistanceBand::of(1.0, knots), DistanceBand::Close);
        assert_eq!(DistanceBand::of(2.0, knots), DistanceBand::Mid);
        assert_eq!(DistanceBand::of(10.0, knots), DistanceBand::Far);
        assert_eq!(DistanceBand::of(std::f64::INFINITY, knots), DistanceBand::Far);
    }
}
