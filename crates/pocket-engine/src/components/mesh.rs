use glam::{Quat, Vec3};

use crate::api::types::{MeshId, TextureHandle};

/// UV sphere tessellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl SphereGeometry {
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            width_segments,
            height_segments,
        }
    }
}

/// Physically-based material, mirrored one-to-one by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    /// Base color, linear RGB.
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    pub env_map: Option<TextureHandle>,
    /// Color map. `None` renders the plain base color.
    pub map: Option<TextureHandle>,
    /// Set whenever a texture slot changes so the renderer recompiles the material.
    pub needs_update: bool,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            metalness: 0.0,
            roughness: 1.0,
            env_map: None,
            map: None,
            needs_update: false,
        }
    }
}

impl StandardMaterial {
    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_env_map(mut self, env_map: Option<TextureHandle>) -> Self {
        self.env_map = env_map;
        self
    }

    /// Swap in a color map. Setting the map it already has changes nothing.
    pub fn set_map(&mut self, texture: TextureHandle) {
        if self.map != Some(texture) {
            self.map = Some(texture);
            self.needs_update = true;
        }
    }

    /// Swap in an environment map. Setting the one it already has changes nothing.
    pub fn set_env_map(&mut self, texture: TextureHandle) {
        if self.env_map != Some(texture) {
            self.env_map = Some(texture);
            self.needs_update = true;
        }
    }
}

/// Renderable proxy. Its transform is written by whoever owns it; the
/// scene never moves meshes on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Assigned by the scene on insertion.
    pub id: MeshId,
    /// Name for finding meshes from game code (e.g. "ball3").
    pub tag: String,
    /// Hidden meshes stay in the scene but are not drawn.
    pub visible: bool,
    pub position: Vec3,
    pub rotation: Quat,
    pub geometry: SphereGeometry,
    pub material: StandardMaterial,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(geometry: SphereGeometry, material: StandardMaterial) -> Self {
        Self {
            id: MeshId(0),
            tag: String::new(),
            visible: true,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            geometry,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    /// Copy a pose onto the mesh.
    pub fn set_transform(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mesh_is_visible_at_origin() {
        let mesh = Mesh::new(SphereGeometry::new(0.5, 16, 16), StandardMaterial::default());
        assert!(mesh.visible);
        assert_eq!(mesh.position, Vec3::ZERO);
        assert_eq!(mesh.rotation, Quat::IDENTITY);
        assert_eq!(mesh.geometry.width_segments, 16);
    }

    #[test]
    fn set_map_flags_update_once() {
        let mut material = StandardMaterial::default();
        material.set_map(TextureHandle(4));
        assert_eq!(material.map, Some(TextureHandle(4)));
        assert!(material.needs_update);

        material.needs_update = false;
        material.set_map(TextureHandle(4));
        assert!(!material.needs_update, "same texture should not dirty the material");
    }

    #[test]
    fn builder_sets_shadows_and_tag() {
        let mesh = Mesh::new(SphereGeometry::new(1.0, 8, 8), StandardMaterial::default())
            .with_tag("ball7")
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_shadows(true, true);
        assert_eq!(mesh.tag, "ball7");
        assert_eq!(mesh.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(mesh.cast_shadow && mesh.receive_shadow);
    }
}
