use rand::rngs::StdRng;

use crate::error::{Result, TestbedError};
use crate::settings::Settings;
use crate::world::PhysicsWorld;

/// Random generator handed to scenes while they populate a world.
pub type SceneRng = StdRng;

/// A demo scene driven by the testbed.
pub trait Scene {
    /// Populates a freshly created world.
    fn construct(&mut self, world: &mut PhysicsWorld, rng: &mut SceneRng);

    /// Reacts to a key the testbed did not handle itself.
    fn on_key(&mut self, _world: &mut PhysicsWorld, _key: char) {}

    /// Advances the scene by one step.
    fn step(&mut self, world: &mut PhysicsWorld, settings: &Settings) {
        world.step(settings)
    }
}

/// Creates a new, unconstructed instance of a scene.
pub type SceneBuilder = fn() -> Box<dyn Scene>;

/// Scenes known to the testbed, in registration order.
#[derive(Clone, Default)]
pub struct SceneRegistry {
    builders: Vec<(&'static str, SceneBuilder)>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        SceneRegistry::default()
    }

    pub fn from_builders(builders: Vec<(&'static str, SceneBuilder)>) -> Result<Self> {
        let mut res = SceneRegistry::new();

        for (name, builder) in builders {
            res.register(name, builder)?;
        }

        Ok(res)
    }

    pub fn register(&mut self, name: &'static str, builder: SceneBuilder) -> Result<()> {
        if self.position(name).is_some() {
            return Err(TestbedError::DuplicateScene(name));
        }

        self.builders.push((name, builder));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.builders.iter().map(|e| e.0).collect()
    }

    pub fn name(&self, index: usize) -> Option<&'static str> {
        self.builders.get(index).map(|e| e.0)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.builders.iter().position(|e| e.0 == name)
    }

    pub fn get(&self, name: &str) -> Result<SceneBuilder> {
        self.builders
            .iter()
            .find(|e| e.0 == name)
            .map(|e| e.1)
            .ok_or_else(|| TestbedError::UnknownScene(name.to_string()))
    }

    pub fn build(&self, index: usize) -> Result<Box<dyn Scene>> {
        if self.builders.is_empty() {
            return Err(TestbedError::NoScenes);
        }

        self.builders
            .get(index)
            .map(|e| (e.1)())
            .ok_or(TestbedError::SceneIndexOutOfRange {
                index,
                len: self.builders.len(),
            })
    }
}
