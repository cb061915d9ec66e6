use std::collections::HashMap;

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::api::traits::RigidBodyWorld;
use crate::api::types::BodyId;
use crate::core::body::{BodyDesc, BodyType, ColliderDesc, ColliderMaterial};

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec3_to_na(v: Vec3) -> nalgebra::Vector3<f32> {
    nalgebra::Vector3::new(v.x, v.y, v.z)
}

fn na_to_vec3(v: &nalgebra::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn quat_to_na(q: Quat) -> nalgebra::UnitQuaternion<f32> {
    nalgebra::UnitQuaternion::new_normalize(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
}

fn na_to_quat(q: &nalgebra::UnitQuaternion<f32>) -> Quat {
    let c = q.quaternion().coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

fn rapier_body_type(body_type: BodyType) -> RigidBodyType {
    match body_type {
        BodyType::Dynamic => RigidBodyType::Dynamic,
        BodyType::Fixed => RigidBodyType::Fixed,
    }
}

fn build_rigid_body(desc: &BodyDesc) -> RigidBody {
    let p = desc.position;
    let mut rb = RigidBodyBuilder::new(rapier_body_type(desc.body_type))
        .position(nalgebra::Isometry3::from_parts(
            nalgebra::Translation3::new(p.x, p.y, p.z),
            quat_to_na(desc.rotation),
        ))
        .linvel(vec3_to_na(desc.velocity))
        .angvel(vec3_to_na(desc.angular_velocity))
        .gravity_scale(desc.gravity_scale)
        .ccd_enabled(desc.ccd)
        .linear_damping(desc.linear_damping)
        .angular_damping(desc.angular_damping)
        .can_sleep(desc.can_sleep)
        .build();

    if let (true, Some(sleep)) = (desc.can_sleep, desc.sleep) {
        let activation = rb.activation_mut();
        activation.normalized_linear_threshold = sleep.speed;
        activation.angular_threshold = sleep.speed;
        activation.time_until_sleep = sleep.time;
    }
    rb
}

fn build_collider(desc: &BodyDesc, material: ColliderMaterial) -> Collider {
    let builder = match desc.collider {
        ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
        ColliderDesc::Cuboid { half_extents: h } => ColliderBuilder::cuboid(h.x, h.y, h.z),
    }
    .restitution(material.restitution)
    .friction(material.friction);

    match desc.mass {
        Some(mass) => builder.mass(mass),
        None => builder.density(material.density),
    }
    .build()
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// A body known to the world. `handles` is `Some` while it is registered;
/// otherwise `desc` holds its last pose and velocities.
struct BodySlot {
    desc: BodyDesc,
    material: ColliderMaterial,
    handles: Option<(RigidBodyHandle, ColliderHandle)>,
}

/// Wraps all Rapier3D boilerplate into a single, easy-to-use struct.
///
/// Bodies are addressed by [`BodyId`], which outlives rapier's handles:
/// removing a body drops it from the solver entirely and adding it back
/// builds a fresh rapier body, so no sleep flag or contact cache survives
/// a remove/add cycle.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector3<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    slots: HashMap<BodyId, BodySlot>,
    next_id: u32,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    /// The table plane is y = 0, so Earth gravity is `Vec3::new(0.0, -9.82, 0.0)`.
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: vec3_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            slots: HashMap::new(),
            next_id: 1,
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    pub fn gravity(&self) -> Vec3 {
        na_to_vec3(&self.gravity)
    }

    /// Create a body and register it in one go.
    pub fn spawn_body(&mut self, desc: &BodyDesc, material: ColliderMaterial) -> BodyId {
        let id = self.create_body(desc, material);
        self.add_body(id);
        id
    }

    /// Remove a body from the simulation and forget it.
    pub fn destroy_body(&mut self, id: BodyId) {
        self.remove_body(id);
        self.slots.remove(&id);
    }

    /// Advance the simulation by one fixed step.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Number of bodies currently registered in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // -- private helpers --

    fn rigid_body(&self, id: BodyId) -> Option<&RigidBody> {
        let (handle, _) = self.slots.get(&id)?.handles?;
        self.bodies.get(handle)
    }

    fn rigid_body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let (handle, _) = self.slots.get(&id)?.handles?;
        self.bodies.get_mut(handle)
    }

    /// Read from the live body when registered, else from the stored description.
    fn read<T>(
        &self,
        id: BodyId,
        live: impl FnOnce(&RigidBody) -> T,
        detached: impl FnOnce(&BodyDesc) -> T,
        fallback: T,
    ) -> T {
        if let Some(rb) = self.rigid_body(id) {
            return live(rb);
        }
        match self.slots.get(&id) {
            Some(slot) => detached(&slot.desc),
            None => fallback,
        }
    }

    /// Write to the live body when registered, else to the stored description.
    fn write(
        &mut self,
        id: BodyId,
        live: impl FnOnce(&mut RigidBody),
        detached: impl FnOnce(&mut BodyDesc),
    ) {
        if let Some(rb) = self.rigid_body_mut(id) {
            live(rb);
        } else if let Some(slot) = self.slots.get_mut(&id) {
            detached(&mut slot.desc);
        } else {
            log::warn!("physics: write to unknown body {:?}", id);
        }
    }
}

impl RigidBodyWorld for PhysicsWorld {
    fn create_body(&mut self, desc: &BodyDesc, material: ColliderMaterial) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.slots.insert(
            id,
            BodySlot {
                desc: desc.clone(),
                material,
                handles: None,
            },
        );
        id
    }

    fn add_body(&mut self, id: BodyId) {
        let Some(slot) = self.slots.get_mut(&id) else {
            log::warn!("physics: add of unknown body {:?}", id);
            return;
        };
        if slot.handles.is_some() {
            return;
        }

        let body = self.bodies.insert(build_rigid_body(&slot.desc));
        let collider = self.colliders.insert_with_parent(
            build_collider(&slot.desc, slot.material),
            body,
            &mut self.bodies,
        );
        slot.handles = Some((body, collider));
    }

    fn remove_body(&mut self, id: BodyId) {
        let Some(slot) = self.slots.get_mut(&id) else {
            return;
        };
        let Some((body, _)) = slot.handles.take() else {
            return;
        };

        let removed = self.bodies.remove(
            body,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        if let Some(rb) = removed {
            slot.desc.position = na_to_vec3(rb.translation());
            slot.desc.rotation = na_to_quat(rb.rotation());
            slot.desc.velocity = na_to_vec3(rb.linvel());
            slot.desc.angular_velocity = na_to_vec3(rb.angvel());
        }
    }

    fn contains_body(&self, id: BodyId) -> bool {
        self.rigid_body(id).is_some()
    }

    fn position(&self, id: BodyId) -> Vec3 {
        self.read(id, |rb| na_to_vec3(rb.translation()), |d| d.position, Vec3::ZERO)
    }

    fn rotation(&self, id: BodyId) -> Quat {
        self.read(id, |rb| na_to_quat(rb.rotation()), |d| d.rotation, Quat::IDENTITY)
    }

    fn set_position(&mut self, id: BodyId, position: Vec3) {
        self.write(
            id,
            |rb| rb.set_translation(vec3_to_na(position), true),
            |d| d.position = position,
        );
    }

    fn linear_velocity(&self, id: BodyId) -> Vec3 {
        self.read(id, |rb| na_to_vec3(rb.linvel()), |d| d.velocity, Vec3::ZERO)
    }

    fn angular_velocity(&self, id: BodyId) -> Vec3 {
        self.read(id, |rb| na_to_vec3(rb.angvel()), |d| d.angular_velocity, Vec3::ZERO)
    }

    fn set_linear_velocity(&mut self, id: BodyId, velocity: Vec3) {
        self.write(
            id,
            |rb| rb.set_linvel(vec3_to_na(velocity), true),
            |d| d.velocity = velocity,
        );
    }

    fn set_angular_velocity(&mut self, id: BodyId, velocity: Vec3) {
        self.write(
            id,
            |rb| rb.set_angvel(vec3_to_na(velocity), true),
            |d| d.angular_velocity = velocity,
        );
    }

    fn is_sleeping(&self, id: BodyId) -> bool {
        self.rigid_body(id).map(|rb| rb.is_sleeping()).unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
