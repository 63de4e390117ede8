//! Per-frame simulation settings.

use std::fs;
use std::path::Path;

use na::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Length, in simulated seconds, of a headless run when no frame count is given.
const DEFAULT_RUN_DURATION: f32 = 26.0;

/// Settings handed to every scene step.
///
/// Missing fields fall back to their default value when deserialized, so a
/// settings file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation frequency. The timestep is `1 / hz`; zero or less pauses stepping.
    pub hz: f32,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
    /// Gravity given to every world built by the testbed.
    pub gravity: [f32; 2],
    pub enable_warm_starting: bool,
    pub enable_sleep: bool,
    pub steps_per_frame: usize,
    /// Seed of the random generator handed to scenes. Entropy from the OS is used if absent.
    pub seed: Option<u64>,
    /// Number of steps between two statistics dumps (0 disables them).
    pub dump_every: usize,
    pub pause: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            hz: 60.0,
            velocity_iterations: 8,
            position_iterations: 3,
            gravity: [0.0, -10.0],
            enable_warm_starting: true,
            enable_sleep: true,
            steps_per_frame: 1,
            seed: None,
            dump_every: 30,
            pause: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The length of one step, or `None` if stepping is disabled.
    pub fn timestep(&self) -> Option<f32> {
        if self.hz > 0.0 {
            Some(1.0 / self.hz)
        } else {
            None
        }
    }

    pub fn gravity(&self) -> Vector2<f32> {
        Vector2::new(self.gravity[0], self.gravity[1])
    }

    /// Whether a statistics dump is due once `steps` steps have been run.
    pub fn dumps_at(&self, steps: usize) -> bool {
        self.dump_every != 0 && steps != 0 && steps % self.dump_every == 0
    }

    /// Number of frames needed to cover the default run duration.
    pub fn default_frames(&self) -> usize {
        if self.hz > 0.0 && self.steps_per_frame > 0 {
            (DEFAULT_RUN_DURATION * self.hz / self.steps_per_frame as f32).ceil() as usize
        } else {
            0
        }
    }
}
