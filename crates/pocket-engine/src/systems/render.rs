use crate::api::types::TextureHandle;
use crate::components::mesh::Mesh;
use crate::renderer::instance::{MeshInstance, RenderBuffer};

fn texture_slot(handle: Option<TextureHandle>) -> f32 {
    handle.map(|t| t.0 as f32).unwrap_or(-1.0)
}

/// Build the render buffer from a set of meshes.
/// Hidden meshes are skipped; anything past `max_instances` is dropped.
pub fn build_render_buffer<'a>(
    meshes: impl Iterator<Item = &'a Mesh>,
    buffer: &mut RenderBuffer,
    max_instances: usize,
) {
    buffer.clear();

    for mesh in meshes.filter(|m| m.visible) {
        if buffer.instances.len() >= max_instances {
            log::warn!("render buffer full, dropping meshes past {}", max_instances);
            break;
        }

        buffer.push(MeshInstance {
            x: mesh.position.x,
            y: mesh.position.y,
            z: mesh.position.z,
            qx: mesh.rotation.x,
            qy: mesh.rotation.y,
            qz: mesh.rotation.z,
            qw: mesh.rotation.w,
            radius: mesh.geometry.radius,
            texture: texture_slot(mesh.material.map),
            env_map: texture_slot(mesh.material.env_map),
            _pad: [0.0; 2],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mesh::{SphereGeometry, StandardMaterial};
    use glam::{Quat, Vec3};

    fn sphere() -> Mesh {
        Mesh::new(SphereGeometry::new(0.03, 16, 16), StandardMaterial::default())
    }

    #[test]
    fn visible_meshes_become_instances() {
        let mut textured = sphere().with_position(Vec3::new(1.0, 2.0, 3.0));
        textured.material.set_map(TextureHandle(5));
        textured.rotation = Quat::from_rotation_y(1.0);
        let meshes = vec![textured.clone(), sphere()];

        let mut buffer = RenderBuffer::new();
        build_render_buffer(meshes.iter(), &mut buffer, 64);

        assert_eq!(buffer.instance_count(), 2);
        let first = buffer.instances[0];
        assert_eq!([first.x, first.y, first.z], [1.0, 2.0, 3.0]);
        assert_eq!(first.qw, textured.rotation.w);
        assert_eq!(first.texture, 5.0);
        assert_eq!(buffer.instances[1].texture, -1.0);
        assert_eq!(buffer.instances[1].env_map, -1.0);
    }

    #[test]
    fn hidden_meshes_are_skipped() {
        let mut hidden = sphere();
        hidden.visible = false;
        let meshes = vec![hidden, sphere()];

        let mut buffer = RenderBuffer::new();
        build_render_buffer(meshes.iter(), &mut buffer, 64);
        assert_eq!(buffer.instance_count(), 1);
    }

    #[test]
    fn capacity_is_respected() {
        let meshes = vec![sphere(), sphere(), sphere()];
        let mut buffer = RenderBuffer::new();
        build_render_buffer(meshes.iter(), &mut buffer, 2);
        assert_eq!(buffer.instance_count(), 2);
    }
}
