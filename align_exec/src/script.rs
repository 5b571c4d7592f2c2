//! # Script interpreter module
//!
//! This module provides an interpreter for timed telecommand scripts,
//! allowing demo and test sequences to be executed without an operator.
//!
//! Scripts are JSON arrays of `{ "time_s": ..., "tc": ... }` entries.
//! Entries fire when the caller's clock passes their timestamp.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::tc::Tc;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
#[derive(Debug, Clone, Deserialize)]
pub struct Command {
    /// The time the command is supposed to execute at
    pub time_s: f64,

    /// The telecommand to run
    pub tc: Tc,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run, use
/// `get_pending_tcs` each cycle to acquire the telecommands that are due.
pub struct ScriptInterpreter {
    _script_path: Option<PathBuf>,
    cmds: VecDeque<Command>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("Could not parse the script: {0}")]
    ScriptParseError(serde_json::Error),

    #[error("The script is empty")]
    ScriptEmpty,
}

pub enum PendingTcs {
    None,
    Some(Vec<Tc>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let raw = fs::read_to_string(&script_path).map_err(ScriptError::ScriptLoadError)?;

        let mut cmds: Vec<Command> =
            serde_json::from_str(&raw).map_err(ScriptError::ScriptParseError)?;

        if cmds.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        // Entries may be listed out of order, execution must not be
        cmds.sort_by(|a, b| a.time_s.partial_cmp(&b.time_s).unwrap_or(std::cmp::Ordering::Equal));

        Ok(Self {
            _script_path: Some(script_path.as_ref().to_path_buf()),
            cmds: cmds.into(),
        })
    }

    /// Build an interpreter from in-memory commands, used for the built-in
    /// demo sequence.
    pub fn from_commands(mut cmds: Vec<Command>) -> Self {
        cmds.sort_by(|a, b| a.time_s.partial_cmp(&b.time_s).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            _script_path: None,
            cmds: cmds.into(),
        }
    }

    /// Get the telecommands due at the given time.
    pub fn get_pending_tcs(&mut self, now_s: f64) -> PendingTcs {
        if self.cmds.is_empty() {
            return PendingTcs::EndOfScript;
        }

        let mut pending = Vec::new();

        while let Some(front) = self.cmds.front() {
            if front.time_s <= now_s {
                // Unwrap is safe, front() just returned Some
                pending.push(self.cmds.pop_front().unwrap().tc);
            } else {
                break;
            }
        }

        if pending.is_empty() {
            PendingTcs::None
        } else {
            PendingTcs::Some(pending)
        }
    }

    /// Duration of the script, the timestamp of its final command.
    pub fn get_duration(&self) -> f64 {
        self.cmds.back().map(|c| c.time_s).unwrap_or(0.0)
    }

    pub fn get_num_tcs(&self) -> usize {
        self.cmds.len()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn interp() -> ScriptInterpreter {
        ScriptInterpreter::from_commands(vec![
            Command {
                time_s: 2.0,
                tc: Tc::StartDriveToPose,
            },
            Command {
                time_s: 1.0,
                tc: Tc::EnqueueTarget("C410".to_string()),
            },
        ])
    }

    #[test]
    fn test_commands_fire_in_time_order() {
        let mut si = interp();
        assert_eq!(si.get_num_tcs(), 2);
        assert!((si.get_duration() - 2.0).abs() < 1e-12);

        assert!(matches!(si.get_pending_tcs(0.5), PendingTcs::None));

        match si.get_pending_tcs(1.5) {
            PendingTcs::Some(tcs) => {
                assert_eq!(tcs, vec![Tc::EnqueueTarget("C410".to_string())])
            }
            _ => panic!("expected the enqueue to be due"),
        }

        match si.get_pending_tcs(3.0) {
            PendingTcs::Some(tcs) => assert_eq!(tcs, vec![Tc::StartDriveToPose]),
            _ => panic!("expected the start to be due"),
        }

        assert!(matches!(si.get_pending_tcs(4.0), PendingTcs::EndOfScript));
    }

    #[test]
    fn test_json_parsing() {
        let json = r#"[
            { "time_s": 1.0, "tc": { "EnqueueTarget": "C410" } },
            { "time_s": 2.0, "tc": "StartDriveToPose" }
        ]"#;

        let cmds: Vec<Command> = serde_json::from_str(json).unwrap();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[1].tc, Tc::StartDriveToPose);
    }
}
