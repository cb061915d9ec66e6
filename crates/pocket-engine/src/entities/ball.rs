use glam::{Quat, Vec3};

use crate::api::traits::{BallHost, RigidBodyWorld};
use crate::api::types::{BallEvent, BodyId, MeshId};
use crate::components::mesh::{Mesh, SphereGeometry, StandardMaterial};
use crate::core::body::{BodyDesc, ColliderDesc, ColliderMaterial, SleepThresholds};

/// Regulation ball radius in meters (57.15 mm diameter).
pub const RADIUS: f32 = 0.05715 / 2.0;

/// Ball mass in kilograms.
pub const MASS: f32 = 0.17;

/// Contact material shared by every ball body.
pub const BALL_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 0.9,
    friction: 0.2,
    density: 1.0,
};

// Rapier damps by 1/(1 + c·dt) per step; ln 2 sheds half the speed each second.
const LINEAR_DAMPING: f32 = std::f32::consts::LN_2;
const ANGULAR_DAMPING: f32 = std::f32::consts::LN_2;

const SLEEP: SleepThresholds = SleepThresholds {
    speed: 2.0,
    time: 0.1,
};

const SEGMENTS: u32 = 16;
const METALNESS: f32 = 0.0;
const ROUGHNESS: f32 = 0.1;

/// One pool ball: a rigid body and the mesh that mirrors it.
///
/// The ball is either on the table (body registered, mesh visible) or
/// fallen (body out of the world, mesh hidden). `reset` brings it back to
/// its rack spot from either state; falling below the table plane during
/// `update` is the only way to become fallen on its own.
///
/// The owner passes its collaborators in on every call through
/// [`BallHost`]; the ball keeps only ids.
#[derive(Debug)]
pub struct Ball {
    id: u32,
    name: String,
    start_position: Vec3,
    body: BodyId,
    mesh: MeshId,
    fallen: bool,
}

impl Ball {
    /// Build ball `id` resting on the table at `(x, z)`.
    ///
    /// Id 0 is the cue ball and stays untextured. Any other id asks for
    /// `"{id}ball.png"`, which lands on the mesh whenever the host
    /// delivers it.
    pub fn new(host: &mut dyn BallHost, x: f32, z: f32, id: u32) -> Self {
        let start_position = Vec3::new(x, RADIUS, z);
        let name = format!("ball{}", id);

        let material = StandardMaterial::default()
            .with_metalness(METALNESS)
            .with_roughness(ROUGHNESS)
            .with_env_map(host.scene().environment());
        let mesh = Mesh::new(SphereGeometry::new(RADIUS, SEGMENTS, SEGMENTS), material)
            .with_tag(name.clone())
            .with_position(start_position)
            .with_shadows(true, true);
        let mesh = host.scene().add_mesh(mesh);

        if id > 0 {
            host.textures().load(&format!("{}ball.png", id), mesh);
        }

        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: RADIUS })
            .with_position(start_position)
            .with_mass(MASS)
            .with_linear_damping(LINEAR_DAMPING)
            .with_angular_damping(ANGULAR_DAMPING)
            .with_sleep(SLEEP);
        let body = host.world().create_body(&desc, BALL_MATERIAL);
        host.world().add_body(body);

        let mut ball = Self {
            id,
            name,
            start_position,
            body,
            mesh,
            fallen: false,
        };
        ball.reset(host);
        ball
    }

    /// Whether the solver has put the body to sleep.
    pub fn is_sleeping(&self, world: &dyn RigidBodyWorld) -> bool {
        world.is_sleeping(self.body)
    }

    /// Put the ball back on its rack spot, at rest and visible.
    pub fn reset(&mut self, host: &mut dyn BallHost) {
        let world = host.world();
        world.set_linear_velocity(self.body, Vec3::ZERO);
        world.set_angular_velocity(self.body, Vec3::ZERO);
        world.set_position(self.body, self.start_position);
        // Re-registering drops any sleep state and stale contacts.
        world.remove_body(self.body);
        world.add_body(self.body);

        if let Some(mesh) = host.scene().mesh_mut(self.mesh) {
            mesh.set_transform(self.start_position, Quat::IDENTITY);
            mesh.visible = true;
        }
        self.fallen = false;
    }

    /// Take the ball off the table and tell the owner. Does nothing if it
    /// has already fallen.
    pub fn on_enter_hole(&mut self, host: &mut dyn BallHost) {
        if self.fallen {
            return;
        }

        let world = host.world();
        world.set_linear_velocity(self.body, Vec3::ZERO);
        world.set_angular_velocity(self.body, Vec3::ZERO);
        world.remove_body(self.body);
        self.fallen = true;

        if let Some(mesh) = host.scene().mesh_mut(self.mesh) {
            mesh.visible = false;
        }

        log::debug!("{} dropped", self.name);
        host.observer().notify(BallEvent::BallDrop { id: self.id });
    }

    /// Mirror the body's pose onto the mesh, then check whether the ball
    /// has dropped below the table plane. Run after each physics step.
    pub fn update(&mut self, host: &mut dyn BallHost, _dt: f32) {
        if self.fallen {
            return;
        }

        let world = host.world();
        let position = world.position(self.body);
        let rotation = world.rotation(self.body);
        if let Some(mesh) = host.scene().mesh_mut(self.mesh) {
            mesh.set_transform(position, rotation);
        }

        if position.y < -RADIUS {
            self.on_enter_hole(host);
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Scene tag of the mesh, `"ball{id}"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_position(&self) -> Vec3 {
        self.start_position
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn is_fallen(&self) -> bool {
        self.fallen
    }
}
