use serde::{Deserialize, Serialize};

/// Where a game's textures live. Loaded from a JSON file at runtime; every
/// field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    /// Directory prefix joined to every texture file name.
    pub texture_base_path: String,
    /// File name of the environment map, relative to `texture_base_path`.
    pub environment: Option<String>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            texture_base_path: "./assets/pool-table/".to_string(),
            environment: None,
        }
    }
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Full path of a texture file under the base path.
    pub fn texture_path(&self, file_name: &str) -> String {
        if self.texture_base_path.is_empty() || self.texture_base_path.ends_with('/') {
            format!("{}{}", self.texture_base_path, file_name)
        } else {
            format!("{}/{}", self.texture_base_path, file_name)
        }
    }
}
