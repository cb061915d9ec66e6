use bytemuck::{Pod, Zeroable};

/// Per-mesh render data written to SharedArrayBuffer for the TypeScript renderer.
/// Must match the TypeScript protocol: 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Orientation quaternion (x, y, z, w).
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    /// Sphere radius in meters.
    pub radius: f32,
    /// Color map handle, or -1.0 for the plain base color.
    pub texture: f32,
    /// Environment map handle, or -1.0 for none.
    pub env_map: f32,
    pub _pad: [f32; 2],
}

impl MeshInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Render buffer containing one instance per visible mesh.
pub struct RenderBuffer {
    pub instances: Vec<MeshInstance>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: MeshInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for SharedArrayBuffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
