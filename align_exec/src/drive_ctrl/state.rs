//! Drive controller state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use serde::Serialize;

// Internal
use super::{DriveCtrlError, Mode, OperatorInput, Params, VelocityCmd};
use crate::arrival::ArrivalDetector;
use crate::constraints::{
    AxisConstraint, ConstraintPlanner, DistanceBand, HeightCategory,
};
use crate::loc::Pose;
use crate::targets::{
    is_near_origin, to_alliance_frame, Alliance, Target, TargetQueue, TargetRegistry,
};
use util::{
    maths::{ang_diff, clamp},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The drive to pose controller.
pub struct DriveToPose {
    params: Params,

    registry: TargetRegistry,
    queue: TargetQueue,
    planner: ConstraintPlanner,
    arrival: ArrivalDetector,

    /// Executing mode
    mode: Mode,

    /// Name of the target currently being driven to
    current_target_name: Option<String>,

    /// One-shot latch, ensures an arrived target is only popped once
    processed_current: bool,

    auto_advance: bool,
    auto_cancel: bool,

    /// Command issued last cycle, the baseline for acceleration limiting
    last_cmd: VelocityCmd,

    /// Session time of the last processed cycle
    last_time_s: Option<f64>,

    output: VelocityCmd,
    report: StatusReport,
}

/// Input data to the module
#[derive(Debug, Copy, Clone)]
pub struct InputData {
    /// Session time at the start of this cycle
    pub time_s: f64,

    /// Current pose estimate, if one is available
    pub pose: Option<Pose>,

    /// Raw operator drive input
    pub operator: OperatorInput,

    /// The alliance the robot is playing on
    pub alliance: Alliance,

    /// Elevator height category reported by the mechanism
    pub height: HeightCategory,
}

/// The status report containing mode, error and proximity monitoring
/// quantities.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub mode: Mode,

    /// Name of the target being driven to
    pub target_name: Option<String>,

    /// Distance to the alliance-adjusted target, infinite with no target
    pub distance_to_target_m: f64,

    /// Shortest-arc heading error to the target
    pub heading_error_rad: f64,

    /// Field-frame bearing from the robot to the target position
    pub bearing_to_target_rad: f64,

    /// Distance band the constraint plan was made in
    pub band: Option<DistanceBand>,

    /// Planned translation limits this cycle
    pub translation_constraint: AxisConstraint,

    /// Planned rotation limits this cycle
    pub rotation_constraint: AxisConstraint,

    // Arrival flags, mirrored from the arrival detector
    pub at_position: bool,
    pub at_rotation: bool,
    pub position_reached: bool,
    pub rotation_reached: bool,
    pub target_reached: bool,

    // Proximity conditions consumed by the scoring mechanism
    pub approaching: bool,
    pub close: bool,
    pub very_close: bool,
    pub lined_up: bool,

    /// A drive was requested with an empty queue
    pub no_target: bool,

    /// The head target resolved near the field origin and was refused
    pub target_near_origin: bool,

    /// Operator input cancelled the drive this cycle
    pub manual_override: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for StatusReport {
    fn default() -> Self {
        Self {
            mode: Mode::Idle,
            target_name: None,
            distance_to_target_m: std::f64::INFINITY,
            heading_error_rad: 0.0,
            bearing_to_target_rad: 0.0,
            band: None,
            translation_constraint: AxisConstraint::zero(),
            rotation_constraint: AxisConstraint::zero(),
            at_position: false,
            at_rotation: false,
            position_reached: false,
            rotation_reached: false,
            target_reached: false,
            approaching: false,
            close: false,
            very_close: false,
            lined_up: false,
            no_target: false,
            target_near_origin: false,
            manual_override: false,
        }
    }
}

impl Default for InputData {
    fn default() -> Self {
        Self {
            time_s: 0.0,
            pose: None,
            operator: OperatorInput::default(),
            alliance: Alliance::Blue,
            height: HeightCategory::Lowered,
        }
    }
}

impl Default for DriveToPose {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl State for DriveToPose {
    type InitData = &'static str;
    type InitError = DriveCtrlError;

    type InputData = InputData;
    type OutputData = VelocityCmd;
    type StatusReport = StatusReport;
    type ProcError = DriveCtrlError;

    /// Initialise the drive controller.
    ///
    /// Expected init data is a path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), Self::InitError> {
        // Load the parameters
        let params: Params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(DriveCtrlError::ParamLoadError(e)),
        };

        *self = Self::new(params);

        Ok(())
    }

    /// Process the drive controller for one cycle.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Setup cycle data
        self.output = VelocityCmd::zero();
        self.report = StatusReport::default();

        // Operator input overrides any active drive
        if self.mode != Mode::Idle && input_data.operator.magnitude() > self.params.manual_deadband
        {
            info!("Operator input above deadband, cancelling drive to pose");
            self.report.manual_override = true;
            self.enter_idle();
        }

        // Mode execution. Each of the mode functions sets the output command
        // and may switch the mode for the next cycle.
        match self.mode {
            Mode::Idle => (),
            Mode::Validating => self.mode_validating(input_data),
            Mode::Driving => self.mode_driving(input_data)?,
            Mode::Arrived => self.mode_arrived(input_data),
        }

        self.report.mode = self.mode;

        self.last_cmd = self.output;
        self.last_time_s = Some(input_data.time_s);

        Ok((self.output, self.report.clone()))
    }
}

impl DriveToPose {
    pub fn new(params: Params) -> Self {
        let registry = TargetRegistry::new(params.targets.clone());
        let planner = ConstraintPlanner::new(params.constraints.clone());
        let arrival = ArrivalDetector::new(params.arrival.clone());
        let auto_advance = params.auto_advance;
        let auto_cancel = params.auto_cancel;

        Self {
            params,
            registry,
            queue: TargetQueue::new(),
            planner,
            arrival,
            mode: Mode::Idle,
            current_target_name: None,
            processed_current: false,
            auto_advance,
            auto_cancel,
            last_cmd: VelocityCmd::zero(),
            last_time_s: None,
            output: VelocityCmd::zero(),
            report: StatusReport::default(),
        }
    }

    // ---- OPERATOR SURFACE ----

    /// Resolve a name and append it to the target queue.
    ///
    /// Unknown names are rejected with a warning. Returns true if queued.
    pub fn enqueue_target(&mut self, name: &str) -> bool {
        self.queue.push_named(&self.registry, name)
    }

    /// Append an already-resolved target to the queue.
    pub fn push_target(&mut self, target: Target) {
        self.queue.push(target);
    }

    /// Remove and return the front target.
    pub fn pop_target(&mut self) -> Option<Target> {
        self.queue.pop_front()
    }

    pub fn delete_front_target(&mut self) {
        self.queue.delete_front();
    }

    pub fn delete_back_target(&mut self) {
        self.queue.delete_back();
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    pub fn has_queue(&self) -> bool {
        self.queue.has_queue()
    }

    /// Names of all queued targets, front first.
    pub fn queue_names(&self) -> Vec<String> {
        self.queue.names()
    }

    /// Request a drive to the head of the queue.
    ///
    /// Only has an effect in `Idle`, validation happens on the next `proc`.
    pub fn start(&mut self) {
        match self.mode {
            Mode::Idle => {
                info!("Drive to pose requested");
                self.mode = Mode::Validating;
            }
            _ => warn!("Drive to pose already active ({:?}), start ignored", self.mode),
        }
    }

    /// Cancel any active drive.
    pub fn cancel(&mut self) {
        if self.mode != Mode::Idle {
            info!("Drive to pose cancelled");
        }
        self.enter_idle();
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        info!("Auto advance {}", if enabled { "enabled" } else { "disabled" });
        self.auto_advance = enabled;
    }

    pub fn set_auto_cancel(&mut self, enabled: bool) {
        info!("Auto cancel {}", if enabled { "enabled" } else { "disabled" });
        self.auto_cancel = enabled;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    // ---- MODE FUNCTIONS ----

    /// Mode validating.
    ///
    /// The head target is checked before any motion is commanded. An empty
    /// queue or a target resolving near the field origin aborts the drive.
    fn mode_validating(&mut self, _input: &InputData) {
        let target = match self.queue.front() {
            Some(t) => t.clone(),
            None => {
                warn!("Drive to pose requested with an empty target queue");
                self.report.no_target = true;
                self.enter_idle();
                return;
            }
        };

        // The registry never places targets near the origin, one there is an
        // unset or default record. Checked on the raw blue-frame pose so the
        // alliance mirror cannot mask it.
        if is_near_origin(Some(&target.pose), self.registry.params()) {
            warn!(
                "Target {} resolves near the field origin, refusing to drive",
                target.name
            );
            self.report.no_target = true;
            self.report.target_near_origin = true;
            self.enter_idle();
            return;
        }

        info!(
            "Target {} validated at ({:.2}, {:.2}) m, {:.1} deg",
            target.name,
            target.pose.position_m.x,
            target.pose.position_m.y,
            target.pose.heading_rad.to_degrees()
        );

        self.planner.reset();
        self.arrival.reset();
        self.processed_current = false;
        self.current_target_name = Some(target.name);
        self.mode = Mode::Driving;
    }

    /// Mode driving.
    ///
    /// Proportional control on the pose error, clamped to the constraints
    /// planned for this cycle's distance and elevator height.
    fn mode_driving(&mut self, input: &InputData) -> Result<(), DriveCtrlError> {
        let pose = match input.pose {
            Some(p) => p,
            None => return Err(DriveCtrlError::NoPoseEstimate),
        };

        let target = match self.queue.front() {
            Some(t) => t.clone(),
            None => {
                warn!("Target queue emptied during drive, stopping");
                self.enter_idle();
                return Ok(());
            }
        };

        // Queue edits can change the head target under us, revalidate before
        // driving anywhere new
        if self.current_target_name.as_deref() != Some(target.name.as_str()) {
            info!("Head target changed to {}, revalidating", target.name);
            self.mode = Mode::Validating;
            return Ok(());
        }

        let goal = to_alliance_frame(&target.pose, input.alliance, self.registry.params());

        let error_m = goal.position_m - pose.position_m;
        let distance_m = error_m.norm();
        let heading_error_rad = ang_diff(goal.heading_rad, pose.heading_rad);

        let planned = self.planner.plan(distance_m, input.height);

        // Monitoring
        let knots = &self.planner.params().knots;
        self.report.target_name = Some(target.name.clone());
        self.report.distance_to_target_m = distance_m;
        self.report.heading_error_rad = heading_error_rad;
        self.report.bearing_to_target_rad = error_m.y.atan2(error_m.x);
        self.report.band = Some(planned.band);
        self.report.translation_constraint = planned.translation;
        self.report.rotation_constraint = planned.rotation;
        self.report.approaching = distance_m <= knots.far_m;
        self.report.close = distance_m <= knots.mid_m;
        self.report.very_close = distance_m <= knots.close_m;

        let arrival = self.arrival.update(input.time_s, &pose, &goal, true);
        self.report.at_position = arrival.at_position;
        self.report.at_rotation = arrival.at_rotation;
        self.report.position_reached = arrival.position_reached;
        self.report.rotation_reached = arrival.rotation_reached;
        self.report.target_reached = arrival.target_reached;
        self.report.lined_up = self.report.very_close && arrival.at_rotation;

        if arrival.target_reached {
            info!("Target {} reached", target.name);
            self.mode = Mode::Arrived;
            return Ok(());
        }

        // Degenerate distance, hold still rather than divide by it
        if planned.zero_override {
            return Ok(());
        }

        // P control, clamped to the planned limits
        let mut velocity_ms = error_m * self.params.translation_k_p;
        if velocity_ms.norm() > planned.translation.max_vel {
            velocity_ms = velocity_ms.normalize() * planned.translation.max_vel;
        }

        let mut rotation_rads = clamp(
            &(heading_error_rad * self.params.rotation_k_p),
            &-planned.rotation.max_vel,
            &planned.rotation.max_vel,
        );

        // Ramp toward the demand no faster than the planned acceleration,
        // taking the previous cycle's command as the baseline
        if let Some(last_time_s) = self.last_time_s {
            let dt_s = input.time_s - last_time_s;
            if dt_s > 0.0 {
                let delta_ms = velocity_ms - self.last_cmd.velocity_ms;
                let max_step_ms = planned.translation.max_accel * dt_s;
                if delta_ms.norm() > max_step_ms {
                    velocity_ms =
                        self.last_cmd.velocity_ms + delta_ms.normalize() * max_step_ms;
                }

                let max_step_rads = planned.rotation.max_accel * dt_s;
                rotation_rads = clamp(
                    &rotation_rads,
                    &(self.last_cmd.rotation_rads - max_step_rads),
                    &(self.last_cmd.rotation_rads + max_step_rads),
                );
            }
        }

        self.output = VelocityCmd {
            velocity_ms,
            rotation_rads,
        };

        Ok(())
    }

    /// Mode arrived.
    ///
    /// The robot holds still. Depending on policy the completed target is
    /// popped and the next one driven, or the controller drops back to idle.
    /// With neither policy set it holds here until cancelled.
    fn mode_arrived(&mut self, _input: &InputData) {
        self.report.target_name = self.current_target_name.clone();
        self.report.target_reached = true;

        if self.auto_advance {
            if !self.processed_current {
                if let Some(done) = self.queue.pop_front() {
                    info!("Advancing past completed target {}", done.name);
                }
                self.processed_current = true;
            }

            if self.queue.has_queue() {
                self.mode = Mode::Validating;
            } else {
                info!("Target queue exhausted, drive to pose complete");
                self.enter_idle();
            }
        } else if self.auto_cancel {
            info!("Auto cancel enabled, returning to idle");
            self.enter_idle();
        }
    }

    /// Drop back to idle, clearing all per-episode state.
    fn enter_idle(&mut self) {
        self.mode = Mode::Idle;
        self.current_target_name = None;
        self.processed_current = false;
        self.planner.reset();
        self.arrival.reset();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector2;

    const DT_S: f64 = 0.02;

    /// Step the controller one cycle with a kinematically ideal plant.
    fn step(
        drive: &mut DriveToPose,
        pose: &mut Pose,
        time_s: &mut f64,
        height: HeightCategory,
    ) -> (VelocityCmd, StatusReport) {
        let input = InputData {
            time_s: *time_s,
            pose: Some(*pose),
            operator: OperatorInput::default(),
            alliance: Alliance::Blue,
            height,
        };

        let (cmd, report) = drive.proc(&input).expect("proc failed");

        pose.position_m += cmd.velocity_ms * DT_S;
        pose.heading_rad =
            util::maths::wrap_pi(pose.heading_rad + cmd.rotation_rads * DT_S);
        *time_s += DT_S;

        (cmd, report)
    }

    #[test]
    fn test_init_with_unloadable_params_errors() {
        let mut drive = DriveToPose::default();
        let session = Session {
            session_root: std::path::PathBuf::new(),
            log_file_path: std::path::PathBuf::new(),
        };

        // Whatever the underlying load failure, it surfaces as a wrapped
        // parameter load error rather than a panic
        let result = drive.init("no_such_params_file.toml", &session);
        assert!(matches!(result, Err(DriveCtrlError::ParamLoadError(_))));
    }

    #[test]
    fn test_idle_until_started() {
        let mut drive = DriveToPose::default();
        let mut pose = Pose::new(2.0, 4.0, 0.0);
        let mut time = 0.0;

        drive.enqueue_target("C410");

        let (cmd, report) = step(&mut drive, &mut pose, &mut time, HeightCategory::Lowered);
        assert_eq!(report.mode, Mode::Idle);
        assert_eq!(cmd, VelocityCmd::zero());
    }

    #[test]
    fn test_empty_queue_refused() {
        let mut drive = DriveToPose::default();
        let mut pose = Pose::new(2.0, 4.0, 0.0);
        let mut time = 0.0;

        drive.start();
        let (cmd, report) = step(&mut drive, &mut pose, &mut time, HeightCategory::Lowered);

        assert!(report.no_target);
        assert_eq!(report.mode, Mode::Idle);
        assert_eq!(cmd, VelocityCmd::zero());
    }

    #[test]
    fn test_velocity_respects_constraints() {
        let mut drive = DriveToPose::default();
        let mut pose = Pose::new(2.0, 4.0, 0.0);
        let mut time = 0.0;

        drive.enqueue_target("C410");
        drive.start();

        let max_vel = Params::default().constraints.translation.far.max_vel;

        for _ in 0..100 {
            let (cmd, report) = step(&mut drive, &mut pose, &mut time, HeightCategory::Lowered);
            assert!(cmd.velocity_ms.norm() <= max_vel + 1e-9);
            assert!(
                cmd.rotation_rads.abs() <= report.rotation_constraint.max_vel + 1e-9
                    || report.mode != Mode::Driving
            );
        }
    }

    #[test]
    fn test_velocity_ramps_at_planned_accel() {
        let mut drive = DriveToPose::default();
        let mut pose = Pose::new(2.0, 4.0, 0.5);
        let mut time = 0.0;

        drive.enqueue_target("C410");
        drive.start();

        let mut last_cmd = VelocityCmd::zero();

        for _ in 0..500 {
            let (cmd, report) = step(&mut drive, &mut pose, &mut time, HeightCategory::Lowered);

            if report.mode == Mode::Driving {
                let max_step_ms = report.translation_constraint.max_accel * DT_S;
                let max_step_rads = report.rotation_constraint.max_accel * DT_S;
                assert!(
                    (cmd.velocity_ms - last_cmd.velocity_ms).norm() <= max_step_ms + 1e-9
                );
                assert!(
                    (cmd.rotation_rads - last_cmd.rotation_rads).abs() <= max_step_rads + 1e-9
                );
            }

            last_cmd = cmd;
        }
    }

    #[test]
    fn test_bearing_to_target_reported() {
        let mut drive = DriveToPose::default();
        let mut pose = Pose::new(2.0, 4.0, 0.0);
        let mut time = 0.0;

        drive.enqueue_target("C410");
        drive.start();
        // Validation cycle
        step(&mut drive, &mut pose, &mut time, HeightCategory::Lowered);

        let goal = TargetRegistry::new(Params::default().targets.clone())
            .resolve("C410")
            .unwrap()
            .pose;
        let expected = (goal.position_m.y - pose.position_m.y)
            .atan2(goal.position_m.x - pose.position_m.x);

        let input = InputData {
            time_s: time,
            pose: Some(pose),
            operator: OperatorInput::default(),
            alliance: Alliance::Blue,
            height: HeightCategory::Lowered,
        };
        let (_, report) = drive.proc(&input).unwrap();

        assert_eq!(report.mode, Mode::Driving);
        assert!((report.bearing_to_target_rad - expected).abs() < 1e-9);
    }

    #[test]
    fn test_raised_elevator_slows_drive() {
        let params = Params::default();
        let factor = params.constraints.height_factors.fully_raised;
        let far_vel = params.constraints.translation.far.max_vel;

        let mut drive = DriveToPose::new(params);
        let mut pose = Pose::new(1.0, 4.0, 0.0);
        let mut time = 0.0;

        drive.enqueue_target("C410");
        drive.start();
        // Validation cycle
        step(&mut drive, &mut pose, &mut time, HeightCategory::FullyRaised);

        let (cmd, _) = step(&mut drive, &mut pose, &mut time, HeightCategory::FullyRaised);
        assert!(cmd.velocity_ms.norm() <= far_vel * factor + 1e-9);
    }

    #[test]
    fn test_manual_override_cancels() {
        let mut drive = DriveToPose::default();
        let mut pose = Pose::new(2.0, 4.0, 0.0);
        let mut time = 0.0;

        drive.enqueue_target("C410");
        drive.start();
        step(&mut drive, &mut pose, &mut time, HeightCategory::Lowered);
        assert_eq!(drive.mode(), Mode::Driving);

        // Driver grabs the sticks
        let input = InputData {
            time_s: time,
            pose: Some(pose),
            operator: OperatorInput {
                translation: Vector2::new(0.5, 0.0),
                rotation: 0.0,
            },
            alliance: Alliance::Blue,
            height: HeightCategory::Lowered,
        };
        let (cmd, report) = drive.proc(&input).unwrap();

        assert!(report.manual_override);
        assert_eq!(report.mode, Mode::Idle);
        assert_eq!(cmd, VelocityCmd::zero());

        // The queue is untouched, only the drive was cancelled
        assert!(drive.has_queue());
    }

    #[test]
    fn test_operator_input_below_deadband_ignored() {
        let mut drive = DriveToPose::default();
        let mut pose = Pose::new(2.0, 4.0, 0.0);
        let mut time = 0.0;

        drive.enqueue_target("C410");
        drive.start();
        step(&mut drive, &mut pose, &mut time, HeightCategory::Lowered);

        let input = InputData {
            time_s: time,
            pose: Some(pose),
            operator: OperatorInput {
                translation: Vector2::new(0.05, 0.0),
                rotation: 0.0,
            },
            alliance: Alliance::Blue,
            height: HeightCategory::Lowered,
        };
        let (_, report) = drive.proc(&input).unwrap();

        assert!(!report.manual_override);
        assert_eq!(report.mode, Mode::Driving);
    }

    #[test]
    fn test_missing_pose_is_an_error() {
        let mut drive = DriveToPose::default();
        let mut pose = Pose::new(2.0, 4.0, 0.0);
        let mut time = 0.0;

        drive.enqueue_target("C410");
        drive.start();
        step(&mut drive, &mut pose, &mut time, HeightCategory::Lowered);

        let input = InputData {
            time_s: time,
            pose: None,
            operator: OperatorInput::default(),
            alliance: Alliance::Blue,
            height: HeightCategory::Lowered,
        };
        assert!(matches!(
            drive.proc(&input),
            Err(DriveCtrlError::NoPoseEstimate)
        ));
    }

    #[test]
    fn test_red_alliance_drives_to_mirrored_goal() {
        let mut drive = DriveToPose::default();
        let params = Params::default();

        let blue_goal = TargetRegistry::new(params.targets.clone())
            .resolve("C410")
            .unwrap()
            .pose;
        let red_goal = to_alliance_frame(&blue_goal, Alliance::Red, &params.targets);

        // Start near the mirrored goal on the red side
        let mut pose = Pose::new(
            red_goal.position_m.x - 1.0,
            red_goal.position_m.y,
            red_goal.heading_rad,
        );
        let mut time = 0.0;

        drive.enqueue_target("C410");
        drive.start();

        for _ in 0..500 {
            let input = InputData {
                time_s: time,
                pose: Some(pose),
                operator: OperatorInput::default(),
                alliance: Alliance::Red,
                height: HeightCategory::Lowered,
            };
            let (cmd, _) = drive.proc(&input).unwrap();
            pose.position_m += cmd.velocity_ms * DT_S;
            pose.heading_rad = util::maths::wrap_pi(pose.heading_rad + cmd.rotation_rads * DT_S);
            time += DT_S;

            if drive.mode() == Mode::Idle && !drive.has_queue() {
                break;
            }
        }

        assert!((pose.position_m - red_goal.position_m).norm() < 0.06);
    }

    #[test]
    fn test_auto_advance_through_queue() {
        let mut drive = DriveToPose::default();
        let registry = TargetRegistry::new(Params::default().targets.clone());

        let first = registry.resolve("C410").unwrap().pose;
        let second = registry.resolve("C231").unwrap().pose;

        let mut pose = Pose::new(3.0, 4.0, 0.0);
        let mut time = 0.0;

        drive.enqueue_target("C410");
        drive.enqueue_target("C231");
        drive.start();

        let mut first_reached = false;

        // Long enough for both approaches plus the arrival debounces
        for _ in 0..3000 {
            let (_, report) = step(&mut drive, &mut pose, &mut time, HeightCategory::Lowered);

            if !first_reached && report.target_reached {
                assert_eq!(report.target_name.as_deref(), Some("C410"));
                assert!((pose.position_m - first.position_m).norm() < 0.06);
                first_reached = true;
            }

            if drive.mode() == Mode::Idle && !drive.has_queue() {
                break;
            }
        }

        assert!(first_reached);
        assert_eq!(drive.mode(), Mode::Idle);
        assert!(!drive.has_queue());
        assert!((pose.position_m - second.position_m).norm() < 0.06);

        // Holding at the goal, nothing left to command
        let (cmd, _) = step(&mut drive, &mut pose, &mut time, HeightCategory::Lowered);
        assert_eq!(cmd, VelocityCmd::zero());
    }

    #[test]
    fn test_near_origin_target_refused() {
        let mut drive = DriveToPose::default();
        let mut pose = Pose::new(2.0, 4.0, 0.0);
        let mut time = 0.0;

        // An unset record straight onto the queue, bypassing the registry
        drive.push_target(Target {
            name: "BOGUS".into(),
            pose: Pose::new(0.2, 0.1, 0.0),
            is_source: false,
            face: None,
            level: None,
            side: None,
        });
        drive.start();

        let (cmd, report) = step(&mut drive, &mut pose, &mut time, HeightCategory::Lowered);

        assert!(report.target_near_origin);
        assert!(report.no_target);
        assert_eq!(report.mode, Mode::Idle);
        assert_eq!(cmd, VelocityCmd::zero());
    }
}
