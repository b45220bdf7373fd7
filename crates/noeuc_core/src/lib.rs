//! noeuc core - scene data and asset loading for the ray caster.
//!
//! This crate provides:
//!
//! - **Scene attributes**: `Material`, `Light`, `Camera`, `Transform`
//! - **Geometry and images**: `Mesh` (builtin primitives, OBJ) and `Texture`
//! - **Scene descriptions**: JSON files naming the models, lights and skybox
//!
//! # Example
//!
//! ```ignore
//! use noeuc_core::load_scene_description;
//!
//! let description = load_scene_description("scene.json")?;
//! let models = description.load_models(Path::new("."))?;
//! println!("Loaded {} models", models.len());
//! ```

pub mod description;
pub mod mesh;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use description::{
    load_scene_description, LoadedModel, MeshSource, ModelDescription, SceneDescription,
    SceneError, SceneResult,
};
pub use mesh::{Mesh, MeshError};
pub use scene::{Camera, Color, Light, LightKind, Material, Transform};
pub use texture::{load_texture, Texture, TextureError};
