//! World-space models.
//!
//! A model goes through its whole lifecycle in `Model::new`: vertices are
//! moved to world space, triangles are assembled from the index list and
//! the BVH is built over them. After that the geometry is read-only, which
//! keeps the BVH valid for as long as the model exists.

use std::sync::Arc;

use noeuc_core::{Color, LoadedModel, Material, Mesh, Texture};
use noeuc_math::{Interval, Mat4, Ray, TriangleHit, Vec2, Vec3, Vec4};

use crate::bvh::Bvh;
use crate::triangle::{assemble_triangles, Triangle};

#[derive(Debug)]
pub struct Model {
    vertices: Vec<Vec4>,
    triangles: Vec<Triangle>,
    material: Material,
    texture: Option<Arc<Texture>>,
    /// Texture coordinates indexed by vertex
    tex_coords: Option<Vec<Vec2>>,
    bvh: Bvh,
}

impl Model {
    /// Place `mesh` in the world with `to_world` and prepare it for tracing.
    pub fn new(mesh: &Mesh, to_world: Mat4, material: Material) -> Self {
        let vertices: Vec<Vec4> = mesh
            .positions
            .iter()
            .map(|p| to_world * p.extend(1.0))
            .collect();

        let triangles = assemble_triangles(&mesh.indices, vertices.len());
        let bvh = Bvh::build(&vertices, &triangles);

        let tex_coords = mesh
            .uvs
            .as_ref()
            .map(|uvs| uvs.iter().map(|&[u, v]| Vec2::new(u, v)).collect());

        log::debug!(
            "Prepared model: {} vertices, {} triangles",
            vertices.len(),
            triangles.len()
        );

        Self {
            vertices,
            triangles,
            material,
            texture: None,
            tex_coords,
            bvh,
        }
    }

    /// Build from decoded scene-description data.
    pub fn from_loaded(loaded: &LoadedModel) -> Self {
        let model = Self::new(&loaded.mesh, loaded.to_world, loaded.material);
        match &loaded.texture {
            Some(texture) => model.with_texture(texture.clone()),
            None => model,
        }
    }

    /// Attach an albedo texture. It is only sampled when the model also has
    /// texture coordinates.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        if texture.is_empty() {
            log::warn!("Ignoring empty texture {}", texture.path);
            return self;
        }
        self.texture = Some(texture);
        self
    }

    /// Replace the per-vertex texture coordinates.
    pub fn with_tex_coords(mut self, tex_coords: Vec<Vec2>) -> Self {
        self.tex_coords = Some(tex_coords);
        self
    }

    pub fn vertices(&self) -> &[Vec4] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_deref()
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    #[inline]
    pub fn triangle_positions(&self, triangle: u32) -> [Vec3; 3] {
        self.triangles[triangle as usize].positions(&self.vertices)
    }

    pub fn triangle_normal(&self, triangle: u32) -> Vec3 {
        self.triangles[triangle as usize].normal(&self.vertices)
    }

    /// Nearest hit on this model within `ray_t`.
    pub fn closest_hit(&self, ray: &Ray, ray_t: Interval) -> Option<(u32, TriangleHit)> {
        self.bvh.closest_hit(ray, ray_t, |triangle| {
            ray.intersect_triangle(self.triangle_positions(triangle))
        })
    }

    /// True if any triangle of this model blocks the ray within `ray_t`.
    pub fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.bvh.occluded(ray, ray_t, |triangle| {
            ray.intersect_triangle(self.triangle_positions(triangle))
        })
    }

    /// Interpolated texture coordinates at barycentric `(u, v)`.
    ///
    /// Weights are `(1 - u - v, u, v)` for the corners in winding order.
    /// `None` if the model has no mapping or it misses a corner.
    pub fn tex_coords_at(&self, triangle: u32, u: f32, v: f32) -> Option<Vec2> {
        let tex_coords = self.tex_coords.as_ref()?;
        let [a, b, c] = self.triangles[triangle as usize].indices;

        let ta = *tex_coords.get(a as usize)?;
        let tb = *tex_coords.get(b as usize)?;
        let tc = *tex_coords.get(c as usize)?;

        Some(ta * (1.0 - u - v) + tb * u + tc * v)
    }

    /// Surface color at a hit: the texture sample if the model has both a
    /// texture and coordinates for the triangle, the flat material albedo
    /// otherwise.
    pub fn albedo_at(&self, triangle: u32, u: f32, v: f32) -> Color {
        match (&self.texture, self.tex_coords_at(triangle, u, v)) {
            (Some(texture), Some(uv)) => texture.sample(uv.x, uv.y),
            _ => self.material.albedo,
        }
    }
}
