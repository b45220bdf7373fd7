//! Bounding Volume Hierarchy (BVH) over a model's triangles.
//!
//! Built once per model, after its vertices are in world space. Nodes only
//! hold triangle indices; the caller supplies the actual ray-triangle test,
//! so the hierarchy never outlives or duplicates the vertex storage.

use noeuc_math::{Aabb, Interval, Ray, TriangleHit, Vec3, Vec4};

use crate::triangle::Triangle;

/// Maximum triangles per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with triangles.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of triangle indices.
    Leaf { triangles: Vec<u32>, bbox: Aabb },
    /// No triangles at all.
    Empty,
}

/// Triangle index with its cached bounds, used while building.
struct BuildItem {
    index: u32,
    bbox: Aabb,
    centroid: Vec3,
}

#[derive(Debug)]
pub struct Bvh {
    root: BvhNode,
    triangle_count: usize,
}

impl Bvh {
    /// Build a hierarchy over `triangles`, whose corners live in `vertices`.
    pub fn build(vertices: &[Vec4], triangles: &[Triangle]) -> Self {
        let items: Vec<BuildItem> = triangles
            .iter()
            .enumerate()
            .map(|(index, triangle)| {
                let bbox = triangle.bounding_box(vertices);
                BuildItem {
                    index: index as u32,
                    bbox,
                    centroid: bbox.centroid(),
                }
            })
            .collect();

        let root = if items.is_empty() {
            BvhNode::Empty
        } else {
            BvhNode::build(items)
        };

        Self {
            root,
            triangle_count: triangles.len(),
        }
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    /// Number of triangles reachable from the root.
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn bounding_box(&self) -> Aabb {
        self.root.bounding_box()
    }

    /// Nearest triangle hit within `ray_t`.
    ///
    /// `intersect` tests the ray against one triangle index. Children are
    /// visited nearest box first, and any node whose box starts beyond the
    /// current nearest hit is skipped. A hit replaces the current one only
    /// when strictly closer, so for equal distances the first one found wins.
    pub fn closest_hit<F>(&self, ray: &Ray, ray_t: Interval, mut intersect: F) -> Option<(u32, TriangleHit)>
    where
        F: FnMut(u32) -> Option<TriangleHit>,
    {
        let mut closest = None;
        if self.root.bounding_box().hit(ray, ray_t) {
            self.root.closest_hit(ray, ray_t, &mut intersect, &mut closest);
        }
        closest
    }

    /// True if any triangle is hit within `ray_t`. Stops at the first hit.
    pub fn occluded<F>(&self, ray: &Ray, ray_t: Interval, mut intersect: F) -> bool
    where
        F: FnMut(u32) -> Option<TriangleHit>,
    {
        self.root.any_hit(ray, ray_t, &mut intersect)
    }

    /// Triangles whose leaf boxes the ray passes through, nearest box first.
    pub fn candidates(&self, ray: &Ray, ray_t: Interval) -> Vec<u32> {
        let mut out = Vec::new();
        self.root.collect_candidates(ray, ray_t, &mut out);
        out
    }
}

impl BvhNode {
    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort triangles by centroid on the
    /// longest axis of the centroid bounds, split in half, recurse.
    fn build(mut items: Vec<BuildItem>) -> Self {
        let n = items.len();

        let bounds = items
            .iter()
            .fold(Aabb::EMPTY, |acc, item| Aabb::surrounding(&acc, &item.bbox));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                triangles: items.iter().map(|item| item.index).collect(),
                bbox: bounds,
            };
        }

        let centroid_bounds = Aabb::from_point_cloud(items.iter().map(|item| item.centroid));
        let axis = centroid_bounds.longest_axis();

        items.sort_unstable_by(|a, b| {
            a.centroid[axis]
                .partial_cmp(&b.centroid[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = n / 2;
        let right_items = items.split_off(mid);
        let left_items = items;

        BvhNode::Branch {
            left: Box::new(Self::build(left_items)),
            right: Box::new(Self::build(right_items)),
            bbox: bounds,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    fn closest_hit<F>(
        &self,
        ray: &Ray,
        ray_t: Interval,
        intersect: &mut F,
        closest: &mut Option<(u32, TriangleHit)>,
    ) where
        F: FnMut(u32) -> Option<TriangleHit>,
    {
        match self {
            BvhNode::Empty => {}

            BvhNode::Leaf { triangles, .. } => {
                for &index in triangles {
                    let Some(hit) = intersect(index) else {
                        continue;
                    };
                    let limit = closest.map_or(ray_t.max, |(_, best)| best.distance);
                    if hit.distance >= ray_t.min && hit.distance < limit {
                        *closest = Some((index, hit));
                    }
                }
            }

            BvhNode::Branch { left, right, .. } => {
                let limit = closest.map_or(ray_t.max, |(_, best)| best.distance);
                let left_entry = left.bounding_box().entry_distance(ray, ray_t.with_max(limit));
                let right_entry = right.bounding_box().entry_distance(ray, ray_t.with_max(limit));

                let (first, second, second_entry) = match (left_entry, right_entry) {
                    (None, None) => return,
                    (Some(_), None) => (left, None, None),
                    (None, Some(_)) => (right, None, None),
                    (Some(l), Some(r)) if r < l => (right, Some(left), Some(l)),
                    (Some(_), Some(r)) => (left, Some(right), Some(r)),
                };

                first.closest_hit(ray, ray_t, intersect, closest);

                if let (Some(second), Some(entry)) = (second, second_entry) {
                    // Skip the far child if the near one produced a closer hit
                    let limit = closest.map_or(ray_t.max, |(_, best)| best.distance);
                    if entry <= limit {
                        second.closest_hit(ray, ray_t, intersect, closest);
                    }
                }
            }
        }
    }

    fn any_hit<F>(&self, ray: &Ray, ray_t: Interval, intersect: &mut F) -> bool
    where
        F: FnMut(u32) -> Option<TriangleHit>,
    {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { triangles, bbox } => {
                bbox.hit(ray, ray_t)
                    && triangles.iter().any(|&index| {
                        intersect(index)
                            .is_some_and(|hit| hit.distance >= ray_t.min && hit.distance < ray_t.max)
                    })
            }

            BvhNode::Branch { left, right, bbox } => {
                bbox.hit(ray, ray_t)
                    && (left.any_hit(ray, ray_t, intersect) || right.any_hit(ray, ray_t, intersect))
            }
        }
    }

    fn collect_candidates(&self, ray: &Ray, ray_t: Interval, out: &mut Vec<u32>) {
        match self {
            BvhNode::Empty => {}

            BvhNode::Leaf { triangles, bbox } => {
                if bbox.hit(ray, ray_t) {
                    out.extend_from_slice(triangles);
                }
            }

            BvhNode::Branch { left, right, .. } => {
                let left_entry = left.bounding_box().entry_distance(ray, ray_t);
                let right_entry = right.bounding_box().entry_distance(ray, ray_t);

                match (left_entry, right_entry) {
                    (Some(l), Some(r)) if r < l => {
                        right.collect_candidates(ray, ray_t, out);
                        left.collect_candidates(ray, ray_t, out);
                    }
                    _ => {
                        left.collect_candidates(ray, ray_t, out);
                        right.collect_candidates(ray, ray_t, out);
                    }
                }
            }
        }
    }
}
