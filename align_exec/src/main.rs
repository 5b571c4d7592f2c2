//! Main alignment executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - System input acquisition:
//!             - Vision pose estimates
//!             - Odometry propagation
//!         - Telecommand processing and handling
//!         - Drive-to-pose control processing
//!         - Telemetry output
//!
//! # Modules
//!
//! All modules (e.g. `drive_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use align_lib::{
    data_store::DataStore,
    drive_ctrl::{InputData, Mode},
    loc::{fuse_cycle, LocMgr, LocParams, Pose, VisionSource},
    script::{Command, PendingTcs, ScriptInterpreter},
    sim::{SimCamera, SimRobot},
    tc::Tc,
    tc_processor,
    tm::AlignTm,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

/// Pose the simulated robot starts the session at.
const INITIAL_POSE: (f64, f64, f64) = (2.0, 4.0, 0.0);

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("align_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Reef Alignment Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let loc_params: LocParams =
        util::params::load("loc.toml").wrap_err("Could not load loc params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE TC SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // If we have a single argument use it as the script path, otherwise fall
    // back to a built-in demonstration script.
    let mut script = if args.len() == 2 {
        info!("Loading script from \"{}\"", &args[1]);

        ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?
    } else if args.len() == 1 {
        info!("No script provided, running the built-in demo script");

        demo_script()
    } else {
        return Err(eyre!(
            "Expected either zero or one argument, found {}",
            args.len() - 1
        ));
    };

    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        script.get_duration(),
        script.get_num_tcs()
    );

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.drive_ctrl
        .init("drive_ctrl.toml", &session)
        .wrap_err("Failed to initialise DriveToPose")?;
    info!("DriveToPose init complete");

    let initial_pose = Pose::new(INITIAL_POSE.0, INITIAL_POSE.1, INITIAL_POSE.2);
    ds.loc_mgr = LocMgr::new(loc_params);
    ds.loc_mgr.set_pose(initial_pose);
    info!("LocMgr init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE SIMULATION ----

    // The exec drives a kinematic plant with two simulated cameras standing in
    // for the real vision pipeline.
    let field = ds.drive_ctrl.params().targets.clone();
    let mut sim = SimRobot::new(initial_pose);
    let mut cam_front = SimCamera::new(field.clone(), 0.0);
    let mut cam_rear = SimCamera::new(field.clone(), 1.7);

    info!("Simulation initialised");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut end_of_script = false;

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- DATA INPUT ----

        // Vision estimates come from the simulated cameras, which observe the
        // plant's true pose, and are fused into the dead-reckoned estimate.
        cam_front.set_truth(sim.pose, ds.time_s);
        cam_rear.set_truth(sim.pose, ds.time_s);

        if let Some(reference) = ds.loc_mgr.get_pose() {
            let mut sources: Vec<&mut dyn VisionSource> = vec![&mut cam_front, &mut cam_rear];

            if let Some(estimate) = fuse_cycle(&mut sources, &reference, ds.loc_mgr.params(), &field) {
                ds.loc_mgr.inject_correction(&estimate);
            }
        }

        // ---- TELECOMMAND PROCESSING ----

        match script.get_pending_tcs(ds.time_s) {
            PendingTcs::None => (),
            PendingTcs::Some(tc_vec) => {
                for tc in tc_vec.iter() {
                    tc_processor::exec(&mut ds, tc);
                }
            }
            PendingTcs::EndOfScript => {
                if !end_of_script {
                    info!("End of TC script reached, finishing current targets");
                    end_of_script = true;
                }
            }
        }

        // Exit once the script is exhausted and the controller has nothing
        // left to do.
        if end_of_script && ds.drive_ctrl.mode() == Mode::Idle && !ds.drive_ctrl.has_queue() {
            info!("Script complete and queue empty, stopping");
            break;
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        ds.drive_ctrl_input = InputData {
            time_s: ds.time_s,
            pose: ds.loc_mgr.get_pose(),
            operator: ds.operator_input.clone(),
            alliance: ds.alliance,
            height: ds.height,
        };

        match ds.drive_ctrl.proc(&ds.drive_ctrl_input) {
            Ok((o, r)) => {
                ds.drive_ctrl_output = o;
                ds.drive_ctrl_report = r;
            }
            Err(e) => {
                // DriveToPose errors usually mean a transient input dropout,
                // so just issue the warning and continue.
                warn!("Error during DriveToPose processing: {}", e)
            }
        };

        // ---- PLANT PROPAGATION ----

        ds.loc_mgr.propagate(
            ds.drive_ctrl_output.velocity_ms,
            ds.drive_ctrl_output.rotation_rads,
            CYCLE_PERIOD_S,
        );
        sim.step(&ds.drive_ctrl_output, CYCLE_PERIOD_S);

        // ---- TELEMETRY ----

        ds.align_tm = AlignTm {
            pose: ds.loc_mgr.get_pose(),
            drive: ds.drive_ctrl_report.clone(),
            cmd: ds.drive_ctrl_output.clone(),
            queue: ds.drive_ctrl.queue_names(),
        };

        if ds.is_1_hz_cycle {
            match serde_json::to_string(&ds.align_tm) {
                Ok(tm) => info!("TM: {}", tm),
                Err(e) => warn!("Could not serialise TM: {}", e),
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    Ok(())
}

/// Build the demonstration script used when no script path is given.
///
/// Queues a pair of coral branches and a coral station pass, then lets the
/// controller auto-advance through them.
fn demo_script() -> ScriptInterpreter {
    ScriptInterpreter::from_commands(vec![
        Command {
            time_s: 0.5,
            tc: Tc::EnqueueTarget("C410".into()),
        },
        Command {
            time_s: 0.5,
            tc: Tc::EnqueueTarget("C231".into()),
        },
        Command {
            time_s: 0.5,
            tc: Tc::EnqueueTarget("SL".into()),
        },
        Command {
            time_s: 1.0,
            tc: Tc::StartDriveToPose,
        },
    ])
}
