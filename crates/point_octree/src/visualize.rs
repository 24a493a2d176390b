//! Read-only extraction of node boxes for debug drawing.
//!
//! Produces geometry only; how it is rendered is up to the caller.

use glam::Vec3;

use crate::octree::{Octree, OctreeNode};

/// One node cube, tagged with whether it stores entries itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
  pub center: Vec3,
  pub half_size: f32,
  /// The node's own bucket is non-empty.
  pub has_data: bool,
  /// Depth of the node (root = 0).
  pub level: u32,
}

impl BoundingBox {
  pub fn min(&self) -> Vec3 {
    self.center - Vec3::splat(self.half_size)
  }

  pub fn max(&self) -> Vec3 {
    self.center + Vec3::splat(self.half_size)
  }

  /// Corners, bottom face (min z) counter-clockwise then top face.
  pub fn corners(&self) -> [Vec3; 8] {
    let (lo, hi) = (self.min(), self.max());
    [
      Vec3::new(lo.x, lo.y, lo.z),
      Vec3::new(hi.x, lo.y, lo.z),
      Vec3::new(hi.x, hi.y, lo.z),
      Vec3::new(lo.x, hi.y, lo.z),
      Vec3::new(lo.x, lo.y, hi.z),
      Vec3::new(hi.x, lo.y, hi.z),
      Vec3::new(hi.x, hi.y, hi.z),
      Vec3::new(lo.x, hi.y, hi.z),
    ]
  }
}

/// Corner index pairs for the 12 cube edges.
const BOX_EDGES: [[usize; 2]; 12] = [
  // bottom
  [0, 1],
  [1, 2],
  [2, 3],
  [3, 0],
  // top
  [4, 5],
  [5, 6],
  [6, 7],
  [7, 4],
  // verticals
  [0, 4],
  [1, 5],
  [2, 6],
  [3, 7],
];

/// Corner indices for 12 triangles, two per face, wound outward.
const BOX_TRIANGLES: [usize; 36] = [
  4, 5, 6, 4, 6, 7, // +z
  1, 0, 3, 1, 3, 2, // -z
  0, 4, 7, 0, 7, 3, // -x
  5, 1, 2, 5, 2, 6, // +x
  7, 6, 2, 7, 2, 3, // +y
  0, 1, 5, 0, 5, 4, // -y
];

/// Collect boxes for every node that stores entries or leads to deeper
/// structure, in pre-order. Nodes deeper than `max_level` are skipped.
pub fn extract_bounding_boxes<T>(octree: &Octree<T>, max_level: Option<u32>) -> Vec<BoundingBox> {
  let mut boxes = Vec::new();
  collect_boxes(octree.root(), max_level, &mut boxes);
  boxes
}

fn collect_boxes<T>(node: &OctreeNode<T>, max_level: Option<u32>, boxes: &mut Vec<BoundingBox>) {
  if max_level.is_some_and(|max| node.depth() > max) {
    return;
  }

  let has_data = node.has_data();
  let leads_deeper = node
    .children()
    .any(|child| child.has_data() || !child.is_leaf());

  if has_data || leads_deeper {
    boxes.push(BoundingBox {
      center: node.center(),
      half_size: node.half_size(),
      has_data,
      level: node.depth(),
    });
  }

  for child in node.children() {
    collect_boxes(child, max_level, boxes);
  }
}

/// Boxes from [`extract_bounding_boxes`] at exactly `level`.
pub fn boxes_at_level(boxes: &[BoundingBox], level: u32) -> Vec<BoundingBox> {
  boxes.iter().filter(|b| b.level == level).copied().collect()
}

/// Line-list vertices: 12 edges, two endpoints each.
pub fn wireframe_vertices(bbox: &BoundingBox) -> [Vec3; 24] {
  let corners = bbox.corners();
  std::array::from_fn(|i| corners[BOX_EDGES[i / 2][i % 2]])
}

/// Triangle-list vertices: 6 faces, two triangles each.
pub fn solid_vertices(bbox: &BoundingBox) -> [Vec3; 36] {
  let corners = bbox.corners();
  std::array::from_fn(|i| corners[BOX_TRIANGLES[i]])
}

#[cfg(test)]
#[path = "visualize_test.rs"]
mod visualize_test;
