//! JSON scene descriptions.
//!
//! A description names the camera, lights, models and skybox of a scene.
//! Loading it resolves every asset (meshes, textures) relative to the
//! description file, so the renderer only ever sees decoded data.
//!
//! ```json
//! {
//!   "camera": { "position": [0, 1, 4], "target": [0, 0, 0], "fov": 70 },
//!   "lights": [{ "kind": "distant", "vector": [0, -1, -1], "color": [1, 1, 1], "intensity": 1 }],
//!   "models": [{ "mesh": { "type": "cube" }, "material": { "albedo": [0.8, 0.2, 0.2] } }],
//!   "skybox": "sky.png"
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use noeuc_math::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mesh::{Mesh, MeshError};
use crate::scene::{Camera, Light, Material, Transform};
use crate::texture::{load_texture, Texture, TextureError};

/// Errors that can occur while reading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

pub type SceneResult<T> = Result<T, SceneError>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub speed: f32,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            fov: 90.0,
            speed: 2.0,
        }
    }
}

/// Where a model's geometry comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MeshSource {
    Quad,
    Cube,
    Triangle { vertices: [Vec3; 3] },
    Obj { path: PathBuf },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    pub mesh: MeshSource,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub material: Material,
    /// Albedo texture, only used when the mesh has texture coordinates
    #[serde(default)]
    pub texture: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    pub lights: Vec<Light>,
    pub models: Vec<ModelDescription>,
    /// Horizontal-cross cube map image
    pub skybox: Option<PathBuf>,
}

/// Model data with every asset decoded, ready for world-space setup.
#[derive(Clone, Debug)]
pub struct LoadedModel {
    pub mesh: Mesh,
    pub to_world: Mat4,
    pub material: Material,
    pub texture: Option<Arc<Texture>>,
}

impl SceneDescription {
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn camera(&self) -> Camera {
        let mut camera = Camera::look_at(self.camera.position, self.camera.target, self.camera.fov);
        camera.speed = self.camera.speed;
        camera
    }

    /// Decode all meshes and textures, resolving relative paths against
    /// `base_dir`. Textures shared by several models are loaded once.
    pub fn load_models(&self, base_dir: &Path) -> SceneResult<Vec<LoadedModel>> {
        let mut textures: HashMap<PathBuf, Arc<Texture>> = HashMap::new();
        let mut loaded = Vec::with_capacity(self.models.len());

        for description in &self.models {
            let mesh = match &description.mesh {
                MeshSource::Quad => Mesh::quad(),
                MeshSource::Cube => Mesh::cube(),
                MeshSource::Triangle { vertices: [v0, v1, v2] } => Mesh::triangle(*v0, *v1, *v2),
                MeshSource::Obj { path } => Mesh::load_obj(resolve(base_dir, path))?,
            };

            let texture = match &description.texture {
                Some(path) => {
                    let full_path = resolve(base_dir, path);
                    let texture = match textures.get(&full_path) {
                        Some(texture) => texture.clone(),
                        None => {
                            let texture = Arc::new(load_texture(&full_path)?);
                            textures.insert(full_path, texture.clone());
                            texture
                        }
                    };
                    Some(texture)
                }
                None => None,
            };

            loaded.push(LoadedModel {
                mesh,
                to_world: description.transform.to_matrix(),
                material: description.material,
                texture,
            });
        }

        log::info!(
            "Loaded {} models ({} textures)",
            loaded.len(),
            textures.len()
        );

        Ok(loaded)
    }

    /// Decode the skybox image if the description names one.
    pub fn load_skybox(&self, base_dir: &Path) -> SceneResult<Option<Texture>> {
        self.skybox
            .as_ref()
            .map(|path| load_texture(resolve(base_dir, path)).map_err(SceneError::from))
            .transpose()
    }
}

/// Read and parse a scene description file.
pub fn load_scene_description(path: impl AsRef<Path>) -> SceneResult<SceneDescription> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let description = SceneDescription::from_json_str(&json)?;
    log::info!(
        "Read scene description {} ({} models, {} lights)",
        path.display(),
        description.models.len(),
        description.lights.len()
    );

    Ok(description)
}

/// Resolve a path relative to the base directory.
fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::LightKind;

    const SCENE: &str = r#"{
        "camera": { "position": [0, 0, 5], "target": [0, 0, 0], "fov": 60 },
        "lights": [
            { "kind": "distant", "vector": [0, 0, -1], "color": [1, 1, 1], "intensity": 1.0 },
            { "kind": "point", "vector": [0, 3, 0], "color": [1, 0.9, 0.8], "intensity": 2.0 }
        ],
        "models": [
            { "mesh": { "type": "cube" }, "material": { "albedo": [0.8, 0.2, 0.2], "shininess": 8 } },
            {
                "mesh": { "type": "triangle", "vertices": [[-1, -1, 0], [1, -1, 0], [0, 1, 0]] },
                "transform": { "translation": [0, 0, -2] }
            }
        ]
    }"#;

    #[test]
    fn test_parse_description() {
        let description = SceneDescription::from_json_str(SCENE).unwrap();

        assert_eq!(description.lights.len(), 2);
        assert_eq!(description.lights[1].kind, LightKind::Point);
        assert_eq!(description.models.len(), 2);
        assert_eq!(description.models[0].mesh, MeshSource::Cube);
        assert_eq!(description.models[0].material.shininess, 8.0);
        // Unspecified material fields fall back to defaults
        assert_eq!(description.models[0].material.ka, Material::default().ka);
        assert!(description.skybox.is_none());
    }

    #[test]
    fn test_description_camera() {
        let description = SceneDescription::from_json_str(SCENE).unwrap();
        let camera = description.camera();

        assert_eq!(camera.fov, 60.0);
        assert!((camera.position() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_load_builtin_models() {
        let description = SceneDescription::from_json_str(SCENE).unwrap();
        let models = description.load_models(Path::new(".")).unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].mesh.triangle_count(), 12);
        assert!(models[1].texture.is_none());
        let moved = models[1].to_world.transform_point3(Vec3::ZERO);
        assert!((moved - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = SceneDescription::from_json_str("{ \"models\": [ { \"mesh\": 3 } ] }");
        assert!(matches!(result, Err(SceneError::Json(_))));
    }

    #[test]
    fn test_missing_texture_is_an_error() {
        let json = r#"{ "models": [ { "mesh": { "type": "quad" }, "texture": "does/not/exist.png" } ] }"#;
        let description = SceneDescription::from_json_str(json).unwrap();
        assert!(description.load_models(Path::new(".")).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_scene_description("does/not/exist.json");
        assert!(matches!(result, Err(SceneError::Io { .. })));
    }
}
