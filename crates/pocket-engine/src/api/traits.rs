//! Capability contracts between an entity and the engines it lives in.
//!
//! A ball only ever talks to these traits, so any physics backend or scene
//! graph that satisfies them can host it.

use glam::{Quat, Vec3};

use crate::api::types::{BallEvent, BodyId, MeshId, TextureHandle};
use crate::assets::textures::RequestId;
use crate::components::mesh::Mesh;
use crate::core::body::{BodyDesc, ColliderMaterial};

/// Rigid-body world with idempotent membership.
///
/// Bodies are created detached. `add_body` on a registered body and
/// `remove_body` on a detached one are no-ops, so a body is never
/// registered twice. Reads on unknown ids return zero/identity and writes
/// are ignored.
pub trait RigidBodyWorld {
    /// Create a body from a description without registering it.
    fn create_body(&mut self, desc: &BodyDesc, material: ColliderMaterial) -> BodyId;

    /// Register a body so the solver integrates it.
    fn add_body(&mut self, body: BodyId);

    /// Take a body out of the simulation, keeping its pose and velocities.
    fn remove_body(&mut self, body: BodyId);

    /// Whether the body is currently registered.
    fn contains_body(&self, body: BodyId) -> bool;

    fn position(&self, body: BodyId) -> Vec3;

    fn rotation(&self, body: BodyId) -> Quat;

    fn set_position(&mut self, body: BodyId, position: Vec3);

    fn linear_velocity(&self, body: BodyId) -> Vec3;

    fn angular_velocity(&self, body: BodyId) -> Vec3;

    fn set_linear_velocity(&mut self, body: BodyId, velocity: Vec3);

    fn set_angular_velocity(&mut self, body: BodyId, velocity: Vec3);

    /// Whether the solver has stopped integrating the body because it came to rest.
    /// Always `false` for a body that is not registered.
    fn is_sleeping(&self, body: BodyId) -> bool;
}

/// Scene graph holding renderable meshes.
pub trait SceneGraph {
    /// Insert a mesh and return its assigned id.
    fn add_mesh(&mut self, mesh: Mesh) -> MeshId;

    fn mesh(&self, id: MeshId) -> Option<&Mesh>;

    fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh>;

    /// Environment map new materials should reflect, if one has loaded.
    fn environment(&self) -> Option<TextureHandle>;
}

/// Non-blocking texture loading.
pub trait TextureSource {
    /// Queue `file_name` for loading and apply it as the color map of
    /// `target` whenever it arrives. Never blocks, never fails; a failed load
    /// leaves the mesh's current material untouched.
    fn load(&mut self, file_name: &str, target: MeshId) -> RequestId;
}

/// Receiver for ball notifications, usually the table controller.
pub trait BallObserver {
    fn notify(&mut self, event: BallEvent);
}

impl BallObserver for Vec<BallEvent> {
    fn notify(&mut self, event: BallEvent) {
        self.push(event);
    }
}

/// Everything a ball needs from its owner, handed in per call so the ball
/// never holds a reference back to the table.
pub trait BallHost {
    fn world(&mut self) -> &mut dyn RigidBodyWorld;
    fn scene(&mut self) -> &mut dyn SceneGraph;
    fn textures(&mut self) -> &mut dyn TextureSource;
    fn observer(&mut self) -> &mut dyn BallObserver;
}
