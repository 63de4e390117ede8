use std::fmt;

use na::Vector2;
use nphysics::force_generator::DefaultForceGeneratorSet;
use nphysics::joint::DefaultJointConstraintSet;
use nphysics::object::{ActivationStatus, BodyStatus, DefaultBodySet, DefaultColliderSet};
use nphysics::world::{DefaultGeometricalWorld, DefaultMechanicalWorld};

use crate::settings::Settings;

/// Everything the physics engine needs to simulate a scene.
///
/// Scenes populate the body and collider sets during construction; the
/// testbed owns the world and steps it once per frame.
pub struct PhysicsWorld {
    pub mechanical_world: DefaultMechanicalWorld<f32>,
    pub geometrical_world: DefaultGeometricalWorld<f32>,
    pub bodies: DefaultBodySet<f32>,
    pub colliders: DefaultColliderSet<f32>,
    pub joint_constraints: DefaultJointConstraintSet<f32>,
    pub force_generators: DefaultForceGeneratorSet<f32>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vector2<f32>) -> Self {
        let mut mechanical_world = DefaultMechanicalWorld::new(gravity);
        mechanical_world.counters.enable();

        PhysicsWorld {
            mechanical_world,
            geometrical_world: DefaultGeometricalWorld::new(),
            bodies: DefaultBodySet::new(),
            colliders: DefaultColliderSet::new(),
            joint_constraints: DefaultJointConstraintSet::new(),
            force_generators: DefaultForceGeneratorSet::new(),
        }
    }

    pub fn gravity(&self) -> &Vector2<f32> {
        &self.mechanical_world.gravity
    }

    /// Copies the solver-related settings into the integration parameters.
    pub fn apply_settings(&mut self, settings: &Settings) {
        if let Some(dt) = settings.timestep() {
            self.mechanical_world.set_timestep(dt);
        }

        let params = &mut self.mechanical_world.integration_parameters;
        params.max_velocity_iterations = settings.velocity_iterations;
        params.max_position_iterations = settings.position_iterations;
        params.warmstart_coeff = if settings.enable_warm_starting {
            1.0
        } else {
            0.0
        };
    }

    /// Advances the simulation by one timestep.
    ///
    /// Does nothing when the settings disable stepping.
    pub fn step(&mut self, settings: &Settings) {
        if settings.timestep().is_none() {
            return;
        }

        self.apply_settings(settings);
        self.mechanical_world.step(
            &mut self.geometrical_world,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joint_constraints,
            &mut self.force_generators,
        );
    }

    /// Registers newly inserted bodies and colliders with the collision pipeline.
    pub fn maintain(&mut self) {
        self.geometrical_world
            .maintain(&mut self.bodies, &mut self.colliders);
    }

    pub fn set_sleep_enabled(&mut self, enabled: bool) {
        if enabled {
            for (_, body) in self.bodies.iter_mut() {
                body.set_deactivation_threshold(Some(ActivationStatus::default_threshold()))
            }
        } else {
            for (_, body) in self.bodies.iter_mut() {
                body.activate();
                body.set_deactivation_threshold(None)
            }
        }
    }

    /// Snapshot of the world content, tagged with the caller's clock.
    pub fn stats(&self, time: f32, steps: usize) -> WorldStats {
        let mut stats = WorldStats {
            time,
            steps,
            step_time: self.mechanical_world.counters.step_time(),
            ..WorldStats::default()
        };

        for (_, body) in self.bodies.iter() {
            stats.bodies += 1;

            match body.status() {
                BodyStatus::Dynamic => stats.dynamic_bodies += 1,
                BodyStatus::Static => stats.static_bodies += 1,
                _ => {}
            }

            if body.status() == BodyStatus::Dynamic && body.activation_status().is_active() {
                stats.awake_bodies += 1;
            }
        }

        stats.colliders = self.colliders.iter().count();
        stats.contacts = self.contact_count();
        stats
    }

    /// Number of contact points between colliders, touching or predicted.
    pub fn contact_count(&self) -> usize {
        self.geometrical_world
            .contact_pairs(&self.colliders, false)
            .map(|(_, _, _, _, _, manifold)| manifold.len())
            .sum()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WorldStats {
    pub bodies: usize,
    pub dynamic_bodies: usize,
    pub static_bodies: usize,
    /// Dynamic bodies that are not sleeping.
    pub awake_bodies: usize,
    pub colliders: usize,
    pub contacts: usize,
    /// Simulated time, in seconds.
    pub time: f32,
    pub steps: usize,
    /// Duration of the last step, in milliseconds.
    pub step_time: f64,
}

impl fmt::Display for WorldStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "t = {:.2}s ({} steps) | bodies: {} ({} dynamic, {} static, {} awake) | colliders: {} | contacts: {} | step: {:.3}ms",
            self.time,
            self.steps,
            self.bodies,
            self.dynamic_bodies,
            self.static_bodies,
            self.awake_bodies,
            self.colliders,
            self.contacts,
            self.step_time,
        )
    }
}
