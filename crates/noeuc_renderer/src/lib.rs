//! noeuc renderer - CPU ray casting
//!
//! Single-bounce direct lighting with hard shadows. Each model carries its
//! own BVH; rays that miss every model sample a cube-map skybox. A frame is
//! rendered data-parallel over pixels with rayon.

mod bvh;
mod lighting;
mod model;
mod renderer;
mod scene;
mod shader;
mod shadow;
mod skybox;
mod triangle;

pub use bvh::{Bvh, BvhNode};
pub use lighting::{
    accumulate, LightSample, PhongTerms, PARALLEL_LIGHT_THRESHOLD, PBR_POINT_FALLOFF,
    POINT_FALLOFF,
};
pub use model::Model;
pub use renderer::{camera_ray, color_to_rgba, shade_ray, RenderConfig, Renderer};
pub use scene::{Scene, SceneHit};
pub use shader::{Shader, UnknownShader};
pub use shadow::{shadow_ray, Occlusion, SHADOW_BIAS};
pub use skybox::{Face, Skybox, SkyboxError, SkyboxResult};
pub use triangle::{assemble_triangles, Triangle};

pub use noeuc_core::{Camera, Color, Light, LightKind, Material};
pub use noeuc_math::{Interval, Ray, Vec3};
