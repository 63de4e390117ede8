extern crate nalgebra as na;
#[macro_use]
extern crate log;

use testbed2d::SceneBuilder;

pub mod falling_blocks2;

/// Every demo scene, in menu order.
pub fn builders() -> Vec<(&'static str, SceneBuilder)> {
    vec![(
        "Falling Blocks",
        falling_blocks2::FallingBlocks::create as SceneBuilder,
    )]
}
