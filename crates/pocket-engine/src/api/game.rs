use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::{BallEvent, GameEvent};
use crate::assets::textures::TextureLoader;
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;
#[cfg(feature = "physics")]
use crate::api::traits::{BallHost, BallObserver, RigidBodyWorld, SceneGraph, TextureSource};
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsWorld;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Gravity in m/s². The table plane is y = 0 and y points up.
    pub gravity: Vec3,
    /// Maximum number of mesh instances in the render buffer (default: 64).
    pub max_instances: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            gravity: Vec3::new(0.0, -9.82, 0.0),
            max_instances: 64,
            max_events: 32,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Build the table: static geometry, balls, environment.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. Runs after the physics step, so bodies are already
    /// at their new poses.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
///
/// Also the [`BallHost`] every ball is driven through.
pub struct EngineContext {
    pub scene: Scene,
    pub textures: TextureLoader,
    /// Events for the UI layer, cleared every frame.
    pub events: Vec<GameEvent>,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    ball_events: Vec<BallEvent>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    /// Create a context whose physics world follows `config`.
    pub fn with_config(config: &GameConfig) -> Self {
        #[cfg(feature = "physics")]
        let physics = {
            let mut world = PhysicsWorld::new(config.gravity);
            world.set_dt(config.fixed_dt);
            world
        };

        Self {
            scene: Scene::new(),
            textures: TextureLoader::new(),
            events: Vec::with_capacity(config.max_events),
            #[cfg(feature = "physics")]
            physics,
            ball_events: Vec::new(),
        }
    }

    /// Emit a game event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain the ball notifications raised since the last call.
    pub fn take_ball_events(&mut self) -> Vec<BallEvent> {
        std::mem::take(&mut self.ball_events)
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    /// Apply textures the host finished loading. Returns how many landed.
    pub fn apply_textures(&mut self) -> usize {
        self.textures.apply_ready(&mut self.scene)
    }

    /// Advance the physics world by one fixed step.
    /// Called automatically by the game runner before `Game::update()`.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.physics.step();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "physics")]
impl BallHost for EngineContext {
    fn world(&mut self) -> &mut dyn RigidBodyWorld {
        &mut self.physics
    }

    fn scene(&mut self) -> &mut dyn SceneGraph {
        &mut self.scene
    }

    fn textures(&mut self) -> &mut dyn TextureSource {
        &mut self.textures
    }

    fn observer(&mut self) -> &mut dyn BallObserver {
        &mut self.ball_events
    }
}
