use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::traits::TextureSource;
use crate::api::types::{MeshId, TextureHandle};
use crate::assets::manifest::AssetManifest;
use crate::core::scene::Scene;

/// Ticket for one texture load, echoed back by the host when it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u32);

/// What a loaded texture is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureTarget {
    /// Color map of one mesh.
    Mesh(MeshId),
    /// Scene-wide environment map.
    Environment,
}

/// A load the host still has to perform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureRequest {
    pub id: RequestId,
    /// Full path, base path already joined.
    pub path: String,
    pub target: TextureTarget,
}

/// Queues texture loads without blocking and applies the results once the
/// host reports them.
///
/// Flow: `request` → `take_pending` (host starts fetching) → `complete` or
/// `fail` → `apply_ready` on the next frame.
pub struct TextureLoader {
    manifest: AssetManifest,
    next_id: u32,
    /// Queued loads, holding the bare file name until hand-off.
    pending: Vec<(RequestId, String, TextureTarget)>,
    in_flight: HashMap<RequestId, TextureTarget>,
    ready: Vec<(TextureTarget, TextureHandle)>,
}

impl TextureLoader {
    pub fn new() -> Self {
        Self::with_manifest(AssetManifest::default())
    }

    pub fn with_manifest(manifest: AssetManifest) -> Self {
        Self {
            manifest,
            next_id: 1,
            pending: Vec::new(),
            in_flight: HashMap::new(),
            ready: Vec::new(),
        }
    }

    /// Replace the manifest. Requests not yet handed off resolve against it.
    pub fn set_manifest(&mut self, manifest: AssetManifest) {
        self.manifest = manifest;
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Queue a load of `file_name` for `target`.
    pub fn request(&mut self, file_name: &str, target: TextureTarget) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.pending.push((id, file_name.to_string(), target));
        id
    }

    /// Queue the manifest's environment map, if it names one.
    pub fn request_environment(&mut self) -> Option<RequestId> {
        let file_name = self.manifest.environment.clone()?;
        Some(self.request(&file_name, TextureTarget::Environment))
    }

    /// Hand every queued request to the host, resolving paths against the
    /// current manifest.
    pub fn take_pending(&mut self) -> Vec<TextureRequest> {
        let pending = std::mem::take(&mut self.pending);
        pending
            .into_iter()
            .map(|(id, file_name, target)| {
                self.in_flight.insert(id, target);
                TextureRequest {
                    id,
                    path: self.manifest.texture_path(&file_name),
                    target,
                }
            })
            .collect()
    }

    /// `take_pending` as a JSON array for the web bridge.
    pub fn pending_json(&mut self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.take_pending())
    }

    /// The host finished loading a request. Returns false for unknown ids.
    pub fn complete(&mut self, request: RequestId, texture: TextureHandle) -> bool {
        match self.in_flight.remove(&request) {
            Some(target) => {
                self.ready.push((target, texture));
                true
            }
            None => {
                log::warn!("texture completion for unknown request {:?}", request);
                false
            }
        }
    }

    /// The host could not load a request. The target keeps its current material.
    pub fn fail(&mut self, request: RequestId, reason: &str) {
        match self.in_flight.remove(&request) {
            Some(target) => log::warn!("texture load {:?} for {:?} failed: {}", request, target, reason),
            None => log::warn!("texture failure for unknown request {:?}: {}", request, reason),
        }
    }

    /// Apply every completed load to the scene. Hidden meshes receive
    /// their maps too. Returns the number of textures applied.
    pub fn apply_ready(&mut self, scene: &mut Scene) -> usize {
        let mut applied = 0;
        for (target, texture) in self.ready.drain(..) {
            match target {
                TextureTarget::Mesh(mesh_id) => match scene.get_mut(mesh_id) {
                    Some(mesh) => {
                        mesh.material.set_map(texture);
                        applied += 1;
                    }
                    None => log::warn!("texture {:?} loaded for missing mesh {:?}", texture, mesh_id),
                },
                TextureTarget::Environment => {
                    scene.set_environment(texture);
                    applied += 1;
                }
            }
        }
        applied
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureSource for TextureLoader {
    fn load(&mut self, file_name: &str, target: MeshId) -> RequestId {
        self.request(file_name, TextureTarget::Mesh(target))
    }
}
