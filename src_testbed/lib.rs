#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;
extern crate nalgebra as na;
extern crate nphysics2d as nphysics;

pub use crate::error::{Result, TestbedError};
pub use crate::scene::{Scene, SceneBuilder, SceneRegistry, SceneRng};
pub use crate::settings::Settings;
pub use crate::testbed::{RunMode, Testbed};
pub use crate::world::{PhysicsWorld, WorldStats};

pub mod cli;
mod error;
mod scene;
mod settings;
mod testbed;
mod world;
