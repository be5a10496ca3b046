//! Bounding Volume Hierarchy (BVH) over flattened scene triangles.
//!
//! Nodes live in one `Vec` and refer to their children by index; the root is
//! node 0. Leaves cover a contiguous range of the triangle array, which keeps
//! the scene's insertion order.

use std::sync::Arc;

use strata_core::Scene;
use strata_math::{Aabb, Float, Interval, Ray};

use crate::config::{AccelConfig, AccelKind};
use crate::error::BuildResult;
use crate::flatten::flatten_scene;
use crate::hit::{accepts_query, Closest, Hit, TraversalObserver};
use crate::report::{BuildEvent, BuildReporter, BuildStats, LogReporter};
use crate::triangle::TriAccel;

/// BVH node - either a branch with two children or a leaf with triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch { left: usize, right: usize, bbox: Aabb },
    /// Leaf over the triangles `begin..end`.
    Leaf { begin: usize, end: usize, bbox: Aabb },
}

impl BvhNode {
    /// Bound of every triangle below this node.
    #[inline]
    pub fn bounding_box(&self) -> &Aabb {
        match self {
            BvhNode::Branch { bbox, .. } | BvhNode::Leaf { bbox, .. } => bbox,
        }
    }
}

/// Triangle BVH built with a median-index split.
pub struct Bvh {
    leaf_size: usize,
    bound_epsilon: Float,
    triangles: Vec<TriAccel>,
    nodes: Vec<BvhNode>,
    reporter: Arc<dyn BuildReporter>,
}

impl Bvh {
    /// Create an empty BVH. Call [`Bvh::build`] before querying.
    pub fn new(config: &AccelConfig) -> Self {
        Self {
            leaf_size: config.build_leaf_size(),
            bound_epsilon: config.build_bound_epsilon(),
            triangles: Vec::new(),
            nodes: Vec::new(),
            reporter: Arc::new(LogReporter),
        }
    }

    /// Send build diagnostics to `reporter` instead of the log.
    pub fn with_reporter(mut self, reporter: Arc<dyn BuildReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Build the hierarchy over every triangle in `scene`.
    ///
    /// Discards the previous build. On error the BVH is left empty.
    pub fn build(&mut self, scene: &Scene) -> BuildResult<BuildStats> {
        self.triangles.clear();
        self.nodes.clear();

        let flat = flatten_scene(scene, self.bound_epsilon, self.reporter.as_ref())?;
        let mut stats = flat.stats;

        // Recursion depth is logarithmic in the triangle count
        self.nodes.reserve(2 * flat.triangles.len() / self.leaf_size + 1);
        self.build_node(&flat.bounds, 0, flat.bounds.len(), 1, &mut stats);
        self.triangles = flat.triangles;

        stats.nodes = self.nodes.len();
        self.reporter.report(&BuildEvent::Finished {
            kind: AccelKind::Bvh,
            stats,
        });
        Ok(stats)
    }

    /// Build the subtree over `begin..end` and return its node index.
    ///
    /// The node is pushed before its children so the first call yields the
    /// root at index 0.
    fn build_node(
        &mut self,
        bounds: &[Aabb],
        begin: usize,
        end: usize,
        depth: usize,
        stats: &mut BuildStats,
    ) -> usize {
        let bbox = bounds[begin..end]
            .iter()
            .fold(Aabb::EMPTY, |acc, b| Aabb::union(&acc, b));
        let index = self.nodes.len();

        if end - begin < self.leaf_size {
            self.nodes.push(BvhNode::Leaf { begin, end, bbox });
            stats.leaves += 1;
            stats.depth = stats.depth.max(depth);
            return index;
        }

        // Children are patched in once they exist
        self.nodes.push(BvhNode::Branch {
            left: 0,
            right: 0,
            bbox,
        });

        let mid = begin + (end - begin) / 2;
        let left = self.build_node(bounds, begin, mid, depth + 1, stats);
        let right = self.build_node(bounds, mid, end, depth + 1, stats);
        self.nodes[index] = BvhNode::Branch { left, right, bbox };

        index
    }

    /// Find the nearest hit with `t` in `ray_t`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        self.hit_observed(ray, ray_t, &mut ())
    }

    /// [`Bvh::hit`] that reports every node and triangle it tests.
    pub fn hit_observed<O: TraversalObserver>(
        &self,
        ray: &Ray,
        ray_t: Interval,
        observer: &mut O,
    ) -> Option<Hit> {
        if self.nodes.is_empty() || !accepts_query(ray, ray_t) {
            return None;
        }

        let mut closest = Closest::new(ray_t);
        if self.traverse(0, ray, &mut closest, observer) {
            closest.finish(&self.triangles, ray)
        } else {
            None
        }
    }

    fn traverse<O: TraversalObserver>(
        &self,
        index: usize,
        ray: &Ray,
        closest: &mut Closest,
        observer: &mut O,
    ) -> bool {
        let node = &self.nodes[index];
        let entered = node.bounding_box().hit(ray, closest.window);
        observer.visit_node(index, entered);
        if !entered {
            return false;
        }

        match *node {
            BvhNode::Leaf { begin, end, .. } => {
                let mut hit_anything = false;
                for (i, triangle) in self.triangles[begin..end].iter().enumerate() {
                    observer.test_triangle(begin + i);
                    hit_anything |= closest.test(begin + i, triangle, ray);
                }
                hit_anything
            }

            BvhNode::Branch { left, right, .. } => {
                // Both children are always visited; the right one sees the
                // window already shrunk by the left
                let hit_left = self.traverse(left, ray, closest, observer);
                let hit_right = self.traverse(right, ray, closest, observer);
                hit_left || hit_right
            }
        }
    }

    /// Flattened triangles, in scene order.
    pub fn triangles(&self) -> &[TriAccel] {
        &self.triangles
    }

    /// Tree nodes; the root is at index 0.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Bound of the whole hierarchy (empty before a build).
    pub fn bounding_box(&self) -> Aabb {
        self.nodes
            .first()
            .map_or(Aabb::EMPTY, |root| *root.bounding_box())
    }
}

impl std::fmt::Debug for Bvh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bvh")
            .field("leaf_size", &self.leaf_size)
            .field("bound_epsilon", &self.bound_epsilon)
            .field("triangles", &self.triangles.len())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::TraversalStats;
    use strata_core::{Mesh, Primitive};
    use strata_math::{Mat4, Vec3};

    /// A row of `n` unit triangles along +X, facing +Z.
    fn strip_scene(n: usize) -> Scene {
        let mut positions = Vec::new();
        let mut indices = Vec::new();
        for i in 0..n {
            let x = i as Float * 2.0;
            let base = positions.len() as u32;
            positions.extend([Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 0.0, 0.0), Vec3::new(x, 1.0, 0.0)]);
            indices.extend([base, base + 1, base + 2]);
        }
        let mut scene = Scene::new("strip");
        scene.add_primitive(Primitive::new(Arc::new(Mesh::new(positions, indices, None)), Mat4::IDENTITY));
        scene
    }

    fn built(scene: &Scene, leaf_size: usize) -> Bvh {
        let mut bvh = Bvh::new(&AccelConfig::default().with_leaf_size(leaf_size));
        bvh.build(scene).unwrap();
        bvh
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = built(&Scene::new("empty"), 10);
        assert_eq!(bvh.nodes().len(), 1);
        assert!(matches!(bvh.nodes()[0], BvhNode::Leaf { begin: 0, end: 0, .. }));
        assert!(bvh.bounding_box().is_empty());

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(bvh.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_unbuilt_bvh_misses() {
        let bvh = Bvh::new(&AccelConfig::default());
        let ray = Ray::new(Vec3::Z, -Vec3::Z);
        assert!(bvh.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_small_scene_is_single_leaf() {
        let bvh = built(&strip_scene(9), 10);
        assert_eq!(bvh.nodes().len(), 1);
        assert!(matches!(bvh.nodes()[0], BvhNode::Leaf { begin: 0, end: 9, .. }));
    }

    #[test]
    fn test_median_split_layout() {
        let mut bvh = Bvh::new(&AccelConfig::default().with_leaf_size(2));
        let stats = bvh.build(&strip_scene(4)).unwrap();

        // [0,4) -> [0,2) -> [0,1) [1,2); [2,4) -> [2,3) [3,4)
        assert_eq!(stats.nodes, 7);
        assert_eq!(stats.leaves, 4);
        assert_eq!(stats.depth, 3);
        assert_eq!(stats.triangles, 4);

        let nodes = bvh.nodes();
        assert!(matches!(nodes[0], BvhNode::Branch { left: 1, right: 4, .. }));
        assert!(matches!(nodes[1], BvhNode::Branch { left: 2, right: 3, .. }));
        assert!(matches!(nodes[2], BvhNode::Leaf { begin: 0, end: 1, .. }));
        assert!(matches!(nodes[6], BvhNode::Leaf { begin: 3, end: 4, .. }));
    }

    #[test]
    fn test_leaf_size_clamped() {
        let bvh = built(&strip_scene(3), 0);
        assert!(bvh
            .nodes()
            .iter()
            .all(|node| !matches!(node, BvhNode::Leaf { begin, end, .. } if end - begin > 1)));
    }

    #[test]
    fn test_hit_each_triangle() {
        let bvh = built(&strip_scene(37), 4);
        for i in 0..37 {
            let x = i as Float * 2.0 + 0.25;
            let ray = Ray::new(Vec3::new(x, 0.25, 5.0), -Vec3::Z);
            let hit = bvh.hit(&ray, Interval::from_min(0.0)).unwrap();
            assert_eq!(hit.face, i);
            assert!((hit.t - 5.0).abs() < 1e-5);
        }

        // Between two triangles
        let gap = Ray::new(Vec3::new(1.5, 0.25, 5.0), -Vec3::Z);
        assert!(bvh.hit(&gap, Interval::from_min(0.0)).is_none());
    }

    #[test]
    fn test_observed_miss_tests_nothing() {
        let bvh = built(&strip_scene(40), 4);
        let ray = Ray::new(Vec3::new(0.0, 10.0, 5.0), -Vec3::Z);

        let mut stats = TraversalStats::default();
        assert!(bvh.hit_observed(&ray, Interval::from_min(0.0), &mut stats).is_none());
        assert_eq!(stats.nodes_visited, 1);
        assert!(stats.entered.is_empty());
        assert!(stats.tested.is_empty());
    }

    #[test]
    fn test_rebuild_discards_previous() {
        let mut bvh = Bvh::new(&AccelConfig::default().with_leaf_size(2));
        bvh.build(&strip_scene(20)).unwrap();
        bvh.build(&strip_scene(1)).unwrap();

        assert_eq!(bvh.triangles().len(), 1);
        assert_eq!(bvh.nodes().len(), 1);
        let ray = Ray::new(Vec3::new(4.25, 0.25, 1.0), -Vec3::Z);
        assert!(bvh.hit(&ray, Interval::from_min(0.0)).is_none());
    }
}
