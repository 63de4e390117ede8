use std::env;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli;
use crate::error::{Result, TestbedError};
use crate::scene::{Scene, SceneBuilder, SceneRegistry};
use crate::settings::Settings;
use crate::world::{PhysicsWorld, WorldStats};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunMode {
    Running,
    Stop,
    Step,
    Quit,
}

bitflags! {
    pub struct TestbedActionFlags: u32 {
        const EXAMPLE_CHANGED = 1 << 0;
        const RESTART = 1 << 1;
    }
}

pub struct TestbedState {
    pub running: RunMode,
    pub action_flags: TestbedActionFlags,
    pub selected_example: usize,
    pub sleep_enabled: bool,
}

/// Headless driver of the registered scenes.
///
/// The testbed owns the physics world. Each frame it applies pending actions
/// (example change, restart), then lets the current scene step the world.
pub struct Testbed {
    registry: SceneRegistry,
    scene: Option<Box<dyn Scene>>,
    world: PhysicsWorld,
    settings: Settings,
    time: f32,
    steps: usize,
    state: TestbedState,
}

impl Testbed {
    pub fn new_empty() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let state = TestbedState {
            running: if settings.pause {
                RunMode::Stop
            } else {
                RunMode::Running
            },
            action_flags: TestbedActionFlags::empty(),
            selected_example: 0,
            sleep_enabled: settings.enable_sleep,
        };

        Testbed {
            registry: SceneRegistry::new(),
            scene: None,
            world: PhysicsWorld::new(settings.gravity()),
            settings,
            time: 0.0,
            steps: 0,
            state,
        }
    }

    /// Creates a testbed that builds the `default`-th scene on its first frame.
    pub fn from_builders(default: usize, builders: Vec<(&'static str, SceneBuilder)>) -> Result<Self> {
        let mut res = Testbed::new_empty();
        res.set_builders(builders)?;
        res.select(default)?;
        Ok(res)
    }

    pub fn set_builders(&mut self, builders: Vec<(&'static str, SceneBuilder)>) -> Result<()> {
        self.registry = SceneRegistry::from_builders(builders)?;
        Ok(())
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// Simulated time since the current scene was built.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Number of steps since the current scene was built.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn run_mode(&self) -> RunMode {
        self.state.running
    }

    pub fn set_run_mode(&mut self, mode: RunMode) {
        self.state.running = mode;
    }

    pub fn selected_example(&self) -> usize {
        self.state.selected_example
    }

    pub fn selected_name(&self) -> Option<&'static str> {
        self.registry.name(self.state.selected_example)
    }

    /// Returns `true` once the selected scene has been built.
    pub fn has_scene(&self) -> bool {
        self.scene.is_some()
    }

    /// Selects the scene to run. It is built on the next frame.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if self.registry.is_empty() {
            return Err(TestbedError::NoScenes);
        }

        if index >= self.registry.len() {
            return Err(TestbedError::SceneIndexOutOfRange {
                index,
                len: self.registry.len(),
            });
        }

        self.state.selected_example = index;
        self.state
            .action_flags
            .set(TestbedActionFlags::EXAMPLE_CHANGED, true);
        Ok(())
    }

    pub fn select_by_name(&mut self, name: &str) -> Result<()> {
        let index = self
            .registry
            .position(name)
            .ok_or_else(|| TestbedError::UnknownScene(name.to_string()))?;
        self.select(index)
    }

    /// Rebuilds the current scene in a fresh world on the next frame.
    pub fn restart(&mut self) {
        self.state
            .action_flags
            .set(TestbedActionFlags::RESTART, true);
    }

    pub fn handle_key(&mut self, key: char) {
        match key {
            't' => {
                if self.state.running == RunMode::Stop {
                    self.state.running = RunMode::Running;
                } else {
                    self.state.running = RunMode::Stop;
                }
            }
            's' => self.state.running = RunMode::Step,
            'r' => self.restart(),
            'q' => self.state.running = RunMode::Quit,
            _ => {
                if let Some(scene) = &mut self.scene {
                    scene.on_key(&mut self.world, key)
                }
            }
        }
    }

    pub fn stats(&self) -> WorldStats {
        self.world.stats(self.time, self.steps)
    }

    /// Runs one frame. Returns `false` once the testbed has been asked to quit.
    pub fn frame(&mut self) -> Result<bool> {
        if self.state.running == RunMode::Quit {
            return Ok(false);
        }

        // Handle pending actions.
        {
            let restarted = self
                .state
                .action_flags
                .contains(TestbedActionFlags::RESTART);
            if restarted {
                self.state
                    .action_flags
                    .set(TestbedActionFlags::RESTART, false);
                self.state
                    .action_flags
                    .set(TestbedActionFlags::EXAMPLE_CHANGED, true);
            }

            let example_changed = self
                .state
                .action_flags
                .contains(TestbedActionFlags::EXAMPLE_CHANGED);
            if example_changed {
                self.state
                    .action_flags
                    .set(TestbedActionFlags::EXAMPLE_CHANGED, false);
                self.build_selected()?;
            }

            if self.state.sleep_enabled != self.settings.enable_sleep {
                self.world.set_sleep_enabled(self.settings.enable_sleep);
                self.state.sleep_enabled = self.settings.enable_sleep;
            }
        }

        if self.state.running != RunMode::Stop {
            if let (Some(scene), Some(dt)) = (self.scene.as_mut(), self.settings.timestep()) {
                for _ in 0..self.settings.steps_per_frame {
                    scene.step(&mut self.world, &self.settings);
                    self.time += dt;
                    self.steps += 1;

                    if self.settings.dumps_at(self.steps) {
                        info!("{}", self.world.stats(self.time, self.steps));
                        debug!("{}", self.world.mechanical_world.counters);
                    }
                }
            }
        }

        if self.state.running == RunMode::Step {
            self.state.running = RunMode::Stop;
        }

        Ok(self.state.running != RunMode::Quit)
    }

    /// Runs at most `nframes` frames and returns how many were run.
    pub fn run_frames(&mut self, nframes: usize) -> Result<usize> {
        let mut nrun = 0;

        while nrun < nframes {
            if !self.frame()? {
                break;
            }
            nrun += 1;
        }

        // The last step may already have been dumped.
        if !self.settings.dumps_at(self.steps) {
            info!("{}", self.stats());
        }
        Ok(nrun)
    }

    /// Runs headless, configured from the command-line arguments.
    pub fn run(mut self) -> Result<()> {
        let mut args = env::args();
        let exname = args.next().unwrap_or_else(|| "testbed".to_string());
        let options = cli::parse(args)?;

        if options.help {
            cli::usage(&exname);
            return Ok(());
        }

        if options.list {
            for name in self.registry.names() {
                info!("{}", name);
            }
            return Ok(());
        }

        if let Some(path) = &options.settings {
            self.set_settings(Settings::load(path)?);
        }

        if let Some(seed) = options.seed {
            self.settings.seed = Some(seed);
        }

        if let Some(dump_every) = options.dump_every {
            self.settings.dump_every = dump_every;
        }

        if options.pause || self.settings.pause {
            self.state.running = RunMode::Stop;
        }

        if let Some(name) = &options.example {
            self.select_by_name(name)?;
        }

        let nframes = options
            .frames
            .unwrap_or_else(|| self.settings.default_frames());
        let nrun = self.run_frames(nframes)?;
        info!("Ran {} frames of {:?}.", nrun, self.selected_name().unwrap_or("<none>"));
        Ok(())
    }

    fn build_selected(&mut self) -> Result<()> {
        let mut scene = self.registry.build(self.state.selected_example)?;
        let mut world = PhysicsWorld::new(self.settings.gravity());
        let mut rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        scene.construct(&mut world, &mut rng);
        world.apply_settings(&self.settings);
        if !self.settings.enable_sleep {
            world.set_sleep_enabled(false);
        }
        world.maintain();

        self.world = world;
        self.scene = Some(scene);
        self.time = 0.0;
        self.steps = 0;
        self.state.sleep_enabled = self.settings.enable_sleep;

        let stats = self.stats();
        info!(
            "Loaded example {:?}: {} bodies, {} colliders.",
            self.selected_name().unwrap_or("<unnamed>"),
            stats.bodies,
            stats.colliders
        );
        Ok(())
    }
}
