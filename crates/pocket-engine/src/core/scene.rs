use crate::api::traits::SceneGraph;
use crate::api::types::{MeshId, TextureHandle};
use crate::components::mesh::Mesh;

/// Simple mesh storage using a flat Vec.
/// Designed for small scene sizes (a table's worth of balls, not millions).
pub struct Scene {
    meshes: Vec<Mesh>,
    next_id: u32,
    environment: Option<TextureHandle>,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_capacity(32)
    }

    /// Create a scene with a specific mesh capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            meshes: Vec::with_capacity(capacity),
            next_id: 1,
            environment: None,
        }
    }

    /// Add a mesh to the scene, assigning it a fresh id.
    pub fn spawn(&mut self, mut mesh: Mesh) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        mesh.id = id;
        self.meshes.push(mesh);
        id
    }

    /// Remove a mesh by ID. Returns the removed mesh if found.
    pub fn despawn(&mut self, id: MeshId) -> Option<Mesh> {
        let idx = self.meshes.iter().position(|m| m.id == id)?;
        Some(self.meshes.swap_remove(idx))
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.iter_mut().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Mesh> {
        self.meshes.iter_mut()
    }

    /// Find the first mesh with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.tag == tag)
    }

    /// Set the environment map and hand it to every mesh that has none yet.
    pub fn set_environment(&mut self, texture: TextureHandle) {
        self.environment = Some(texture);
        for mesh in self.meshes.iter_mut().filter(|m| m.material.env_map.is_none()) {
            mesh.material.set_env_map(texture);
        }
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Clear all meshes. Ids keep counting up so stale ids never alias.
    pub fn clear(&mut self) {
        self.meshes.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for Scene {
    fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.spawn(mesh)
    }

    fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.get(id)
    }

    fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.get_mut(id)
    }

    fn environment(&self) -> Option<TextureHandle> {
        self.environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mesh::{SphereGeometry, StandardMaterial};
    use glam::Vec3;

    fn sphere() -> Mesh {
        Mesh::new(SphereGeometry::new(1.0, 8, 8), StandardMaterial::default())
    }

    #[test]
    fn spawn_assigns_ids_and_get() {
        let mut scene = Scene::new();
        let a = scene.spawn(sphere().with_position(Vec3::new(10.0, 0.0, 20.0)));
        let b = scene.spawn(sphere());
        assert_ne!(a, b);
        assert_eq!(scene.get(a).unwrap().position, Vec3::new(10.0, 0.0, 20.0));
        assert_eq!(scene.get(a).unwrap().id, a);
    }

    #[test]
    fn despawn_removes_mesh() {
        let mut scene = Scene::new();
        let id = scene.spawn(sphere());
        assert_eq!(scene.len(), 1);
        assert!(scene.despawn(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.despawn(id).is_none());
    }

    #[test]
    fn find_by_tag() {
        let mut scene = Scene::new();
        scene.spawn(sphere().with_tag("ball0"));
        let eight = scene.spawn(sphere().with_tag("ball8"));
        assert_eq!(scene.find_by_tag("ball8").unwrap().id, eight);
        assert!(scene.find_by_tag("ball9").is_none());
    }

    #[test]
    fn environment_fills_meshes_without_one() {
        let mut scene = Scene::new();
        let plain = scene.spawn(sphere());
        let mut mirrored = sphere();
        mirrored.material.env_map = Some(TextureHandle(1));
        let mirrored = scene.spawn(mirrored);

        scene.set_environment(TextureHandle(2));
        assert_eq!(scene.environment(), Some(TextureHandle(2)));
        assert_eq!(scene.get(plain).unwrap().material.env_map, Some(TextureHandle(2)));
        assert_eq!(scene.get(mirrored).unwrap().material.env_map, Some(TextureHandle(1)));
    }
}
