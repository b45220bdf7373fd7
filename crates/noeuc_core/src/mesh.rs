//! Indexed triangle geometry as delivered by the asset side.
//!
//! A `Mesh` is object-space data: positions, optional per-vertex texture
//! coordinates and a triangle index list. The renderer turns it into a
//! world-space model once at startup.

use std::path::Path;

use noeuc_math::{Aabb, Vec3};
use thiserror::Error;

/// Errors that can occur while loading mesh geometry.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("OBJ loading error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("No models found in OBJ file {0}")]
    Empty(String),
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A mesh consisting of vertex positions, optional UVs and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Texture coordinates (optional - one [u, v] per vertex, v grows downwards)
    pub uvs: Option<Vec<[f32; 2]>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Object-space bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_point_cloud(positions.iter().copied());
        Self {
            positions,
            uvs: None,
            indices,
            bounds,
        }
    }

    /// Attach per-vertex texture coordinates.
    pub fn with_uvs(mut self, uvs: Vec<[f32; 2]>) -> Self {
        if uvs.len() != self.positions.len() {
            log::warn!(
                "UV count ({}) doesn't match vertex count ({}), ignoring UVs",
                uvs.len(),
                self.positions.len()
            );
            return self;
        }
        self.uvs = Some(uvs);
        self
    }

    /// Single triangle, handy for tests and debug scenes.
    pub fn triangle(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self::new(vec![v0, v1, v2], vec![0, 1, 2])
            .with_uvs(vec![[0.0, 1.0], [1.0, 1.0], [0.5, 0.0]])
    }

    /// Unit quad in the XY plane centered at the origin, facing +Z.
    pub fn quad() -> Self {
        let positions = vec![
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
        ];
        let uvs = vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

        Self::new(positions, vec![0, 1, 2, 0, 2, 3]).with_uvs(uvs)
    }

    /// Unit cube centered at the origin, faces wound counter-clockwise
    /// when seen from outside.
    pub fn cube() -> Self {
        // (normal, up) per face; right = up x normal
        let faces = [
            (Vec3::Z, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y),
            (Vec3::X, Vec3::Y),
            (Vec3::NEG_X, Vec3::Y),
            (Vec3::Y, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::Z),
        ];

        let mut positions = Vec::with_capacity(24);
        let mut uvs = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, up) in faces {
            let right = up.cross(normal);
            let base = positions.len() as u32;
            let center = normal * 0.5;

            positions.push(center - right * 0.5 - up * 0.5);
            positions.push(center + right * 0.5 - up * 0.5);
            positions.push(center + right * 0.5 + up * 0.5);
            positions.push(center - right * 0.5 + up * 0.5);
            uvs.extend_from_slice(&[[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]);

            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(positions, indices).with_uvs(uvs)
    }

    /// Load the first model of a Wavefront OBJ file.
    pub fn load_obj(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )?;

        let model = models
            .first()
            .ok_or_else(|| MeshError::Empty(path.display().to_string()))?;
        let mesh = &model.mesh;

        let positions: Vec<Vec3> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();

        // OBJ puts v = 0 at the bottom of the image
        let uvs: Vec<[f32; 2]> = mesh
            .texcoords
            .chunks_exact(2)
            .map(|t| [t[0], 1.0 - t[1]])
            .collect();

        let mut result = Self::new(positions, mesh.indices.clone());
        if !uvs.is_empty() {
            result = result.with_uvs(uvs);
        }

        log::info!(
            "Loaded {} ({} vertices, {} triangles)",
            path.display(),
            result.vertex_count(),
            result.triangle_count()
        );

        Ok(result)
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }
}
