pub mod api;
pub mod core;
pub mod components;
pub mod entities;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::traits::{BallHost, BallObserver, RigidBodyWorld, SceneGraph, TextureSource};
pub use api::types::{BallEvent, BodyId, GameEvent, MeshId, TextureHandle};
pub use components::mesh::{Mesh, SphereGeometry, StandardMaterial};
pub use core::body::{BodyDesc, BodyType, ColliderDesc, ColliderMaterial, SleepThresholds};
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use entities::ball::Ball;
pub use renderer::instance::{MeshInstance, RenderBuffer};
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::AssetManifest;
pub use assets::textures::{RequestId, TextureLoader, TextureRequest, TextureTarget};
pub use bridge::protocol::ProtocolLayout;

#[cfg(feature = "physics")]
pub use core::physics::PhysicsWorld;
