use glam::{Quat, Vec3};

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Physical material properties for a collider.
///
/// Plain data, so one value can be shared by any number of bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// When a resting body may fall asleep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepThresholds {
    /// Linear and angular speed below which the body counts as resting.
    pub speed: f32,
    /// Seconds the body must stay below `speed` before it sleeps.
    pub time: f32,
}

/// Builder for describing a rigid body before creation.
///
/// The physics world also keeps this description for bodies that are out
/// of the simulation, with pose and velocities kept current.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub gravity_scale: f32,
    pub ccd: bool,
    pub collider: ColliderDesc,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Overrides the mass derived from the material density.
    pub mass: Option<f32>,
    pub can_sleep: bool,
    /// Custom sleep thresholds; `None` keeps the solver defaults.
    pub sleep: Option<SleepThresholds>,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            gravity_scale: 1.0,
            ccd: false,
            collider,
            linear_damping: 0.0,
            angular_damping: 0.0,
            mass: None,
            can_sleep: true,
            sleep: None,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            gravity_scale: 0.0,
            ..Self::dynamic(collider)
        }
    }

    pub fn with_position(mut self, pos: Vec3) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec3) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_angular_velocity(mut self, vel: Vec3) -> Self {
        self.angular_velocity = vel;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Set the linear damping (velocity decay). Higher values slow the body faster.
    /// Useful for simulating rolling resistance on table felt.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Set the angular damping (rotation decay). Higher values slow rotation faster.
    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }

    /// Give the body an exact mass in kilograms instead of one derived from density.
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Allow sleeping with custom thresholds.
    pub fn with_sleep(mut self, thresholds: SleepThresholds) -> Self {
        self.can_sleep = true;
        self.sleep = Some(thresholds);
        self
    }

    pub fn with_can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_pattern() {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.03 })
            .with_position(Vec3::new(1.0, 0.03, -2.0))
            .with_velocity(Vec3::new(1.0, 0.0, 2.0))
            .with_gravity_scale(0.5)
            .with_mass(0.17)
            .with_sleep(SleepThresholds { speed: 2.0, time: 0.1 })
            .with_ccd(true);

        assert_eq!(desc.body_type, BodyType::Dynamic);
        assert_eq!(desc.position, Vec3::new(1.0, 0.03, -2.0));
        assert_eq!(desc.velocity, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(desc.rotation, Quat::IDENTITY);
        assert!((desc.gravity_scale - 0.5).abs() < 0.001);
        assert_eq!(desc.mass, Some(0.17));
        assert!(desc.can_sleep);
        assert_eq!(desc.sleep, Some(SleepThresholds { speed: 2.0, time: 0.1 }));
        assert!(desc.ccd);
    }

    #[test]
    fn fixed_body_ignores_gravity() {
        let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
            half_extents: Vec3::new(1.0, 0.05, 0.5),
        });
        assert_eq!(desc.body_type, BodyType::Fixed);
        assert_eq!(desc.gravity_scale, 0.0);
        assert_eq!(desc.mass, None);
    }

    #[test]
    fn collider_material_defaults() {
        let mat = ColliderMaterial::default();
        assert!((mat.restitution - 0.3).abs() < 0.001);
        assert!((mat.friction - 0.5).abs() < 0.001);
        assert!((mat.density - 1.0).abs() < 0.001);
    }
}
