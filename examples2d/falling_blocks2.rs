use na::{Point2, Vector2};
use ncollide2d::shape::{Cuboid, Segment, ShapeHandle};
use nphysics2d::material::{BasicMaterial, MaterialHandle};
use nphysics2d::object::{BodyPartHandle, ColliderDesc, DefaultBodyHandle, Ground, RigidBodyDesc};
use rand::Rng;
use testbed2d::{PhysicsWorld, Scene, SceneRng};

/// Layout of the falling blocks scene.
///
/// The same width and height size the enclosure and bound the spawn area,
/// so every block starts horizontally inside the walls.
#[derive(Clone, Debug, PartialEq)]
pub struct FallingBlocksConfig {
    pub width: f32,
    pub height: f32,
    pub num_blocks: usize,
    pub half_extent: f32,
    pub density: f32,
    pub friction: f32,
}

impl Default for FallingBlocksConfig {
    fn default() -> Self {
        FallingBlocksConfig {
            width: 50.0,
            height: 50.0,
            num_blocks: 150,
            half_extent: 0.5,
            density: 1.0,
            friction: 0.3,
        }
    }
}

impl FallingBlocksConfig {
    /// The bottom, top, left and right walls of the enclosure.
    pub fn walls(&self) -> [(Point2<f32>, Point2<f32>); 4] {
        let hw = self.width / 2.0;
        let h = self.height;

        [
            (Point2::new(-hw, 0.0), Point2::new(hw, 0.0)),
            (Point2::new(-hw, h), Point2::new(hw, h)),
            (Point2::new(-hw, h), Point2::new(-hw, 0.0)),
            (Point2::new(hw, h), Point2::new(hw, 0.0)),
        ]
    }

    /// Draws one starting position per block, uniformly over the enclosure.
    pub fn spawn_positions<R: Rng>(&self, rng: &mut R) -> Vec<Point2<f32>> {
        (0..self.num_blocks)
            .map(|_| {
                let x = -self.width / 2.0 + self.width * rng.random::<f32>();
                let y = self.height * rng.random::<f32>();
                Point2::new(x, y)
            })
            .collect()
    }
}

/// Blocks dropped at random inside a closed box.
pub struct FallingBlocks {
    config: FallingBlocksConfig,
    ground: Option<DefaultBodyHandle>,
    blocks: Vec<DefaultBodyHandle>,
}

impl FallingBlocks {
    pub fn new() -> Self {
        Self::with_config(FallingBlocksConfig::default())
    }

    pub fn with_config(config: FallingBlocksConfig) -> Self {
        FallingBlocks {
            config,
            ground: None,
            blocks: Vec::new(),
        }
    }

    pub fn create() -> Box<dyn Scene> {
        Box::new(FallingBlocks::new())
    }

    pub fn config(&self) -> &FallingBlocksConfig {
        &self.config
    }

    pub fn ground_handle(&self) -> Option<DefaultBodyHandle> {
        self.ground
    }

    pub fn block_handles(&self) -> &[DefaultBodyHandle] {
        &self.blocks
    }
}

impl Default for FallingBlocks {
    fn default() -> Self {
        FallingBlocks::new()
    }
}

impl Scene for FallingBlocks {
    fn construct(&mut self, world: &mut PhysicsWorld, rng: &mut SceneRng) {
        /*
         * Ground
         */
        let ground_handle = world.bodies.insert(Ground::new());

        for (a, b) in self.config.walls().iter() {
            let co = ColliderDesc::new(ShapeHandle::new(Segment::new(*a, *b)))
                .build(BodyPartHandle(ground_handle, 0));
            world.colliders.insert(co);
        }

        /*
         * Create the blocks
         */
        let block = ShapeHandle::new(Cuboid::new(Vector2::repeat(self.config.half_extent)));
        let material = MaterialHandle::new(BasicMaterial::new(0.0, self.config.friction));

        self.blocks.clear();

        for pos in self.config.spawn_positions(rng) {
            // Build the rigid body.
            let rb = RigidBodyDesc::new().translation(pos.coords).build();
            let rb_handle = world.bodies.insert(rb);

            // Build the collider.
            let co = ColliderDesc::new(block.clone())
                .density(self.config.density)
                .material(material.clone())
                .build(BodyPartHandle(rb_handle, 0));
            world.colliders.insert(co);

            self.blocks.push(rb_handle);
        }

        self.ground = Some(ground_handle);
    }

    fn on_key(&mut self, _world: &mut PhysicsWorld, key: char) {
        // Gravity changes are not wired yet.
        match key {
            'h' => debug!("Heavier gravity requested."),
            'l' => debug!("Lighter gravity requested."),
            _ => {}
        }
    }
}
