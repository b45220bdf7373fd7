//! Indexed triangles.
//!
//! A triangle stores three indices into its model's vertex array rather
//! than the positions themselves, so the vertex storage stays the single
//! source of truth.

use noeuc_math::{Aabb, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub indices: [u32; 3],
}

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { indices: [a, b, c] }
    }

    /// World-space corner positions in winding order.
    #[inline]
    pub fn positions(&self, vertices: &[Vec4]) -> [Vec3; 3] {
        self.indices.map(|i| vertices[i as usize].truncate())
    }

    /// Unit geometric normal from the two edges leaving the first vertex.
    ///
    /// Counter-clockwise winding faces the viewer. Degenerate triangles
    /// yield a zero vector.
    pub fn normal(&self, vertices: &[Vec4]) -> Vec3 {
        let [v0, v1, v2] = self.positions(vertices);
        (v1 - v0).cross(v2 - v0).normalize_or_zero()
    }

    pub fn bounding_box(&self, vertices: &[Vec4]) -> Aabb {
        Aabb::from_point_cloud(self.positions(vertices))
    }
}

/// Group an index list into triangles.
///
/// Trailing indices that don't form a full triangle and triangles that
/// reference missing vertices are dropped with a warning.
pub fn assemble_triangles(indices: &[u32], vertex_count: usize) -> Vec<Triangle> {
    if indices.len() % 3 != 0 {
        log::warn!(
            "Index count {} is not a multiple of 3, ignoring the remainder",
            indices.len()
        );
    }

    indices
        .chunks_exact(3)
        .filter_map(|chunk| {
            if chunk.iter().any(|&i| i as usize >= vertex_count) {
                log::warn!(
                    "Invalid triangle indices: {:?}, vertex count: {}",
                    chunk,
                    vertex_count
                );
                return None;
            }
            Some(Triangle::new(chunk[0], chunk[1], chunk[2]))
        })
        .collect()
}
