//! OctreeNode - one cube of the tree with its bucket and child slots.
//!
//! Nodes are cubes: a center and a scalar half-size. Each node exclusively
//! owns up to eight boxed children, one per octant, and a bucket of entries
//! kept in insertion order.
//!
//! Besides its cube, a node tracks the exact box around every position
//! stored in its subtree. Queries prune on that box: it is built from the
//! positions themselves, so rounding in `center ± half_size` can never hide
//! an entry lying on a cube face.

use glam::Vec3;

use super::Aabb;

/// A stored value together with the position it was keyed by.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry<T> {
  pub position: Vec3,
  pub data: T,
}

/// Octree node - owns its bucket and its subtree.
#[derive(Debug)]
pub struct OctreeNode<T> {
  center: Vec3,
  half_size: f32,
  depth: u32,
  content: Aabb,
  pub(crate) entries: Vec<Entry<T>>,
  children: [Option<Box<OctreeNode<T>>>; 8],
}

impl<T> OctreeNode<T> {
  /// Create an empty leaf.
  pub fn new(center: Vec3, half_size: f32, depth: u32) -> Self {
    Self {
      center,
      half_size,
      depth,
      content: Aabb::empty(),
      entries: Vec::new(),
      children: std::array::from_fn(|_| None),
    }
  }

  #[inline]
  pub fn center(&self) -> Vec3 {
    self.center
  }

  #[inline]
  pub fn half_size(&self) -> f32 {
    self.half_size
  }

  /// Depth below the root (root = 0).
  #[inline]
  pub fn depth(&self) -> u32 {
    self.depth
  }

  /// Entries stored directly at this node, in insertion order.
  #[inline]
  pub fn entries(&self) -> &[Entry<T>] {
    &self.entries
  }

  /// True if this node's own bucket is non-empty.
  #[inline]
  pub fn has_data(&self) -> bool {
    !self.entries.is_empty()
  }

  /// A node is a leaf iff none of its eight child slots are populated.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.iter().all(Option::is_none)
  }

  /// Cube covered by this node.
  #[inline]
  pub fn bounds(&self) -> Aabb {
    Aabb::from_center_half_size(self.center, self.half_size)
  }

  /// Box around every position stored in this subtree; `None` when empty.
  pub fn content_bounds(&self) -> Option<Aabb> {
    self.content.is_valid().then_some(self.content)
  }

  /// True if some stored position in this subtree may lie inside `region`.
  #[inline]
  pub(crate) fn content_overlaps(&self, region: &Aabb) -> bool {
    self.content.overlaps(region)
  }

  /// Record that `position` is stored somewhere in this subtree.
  #[inline]
  pub(crate) fn encapsulate(&mut self, position: Vec3) {
    self.content.encapsulate(position);
  }

  /// Child in the given octant, if allocated.
  pub fn child(&self, octant: u8) -> Option<&OctreeNode<T>> {
    self.children[octant as usize].as_deref()
  }

  /// Populated children in octant order.
  pub fn children(&self) -> impl Iterator<Item = &OctreeNode<T>> {
    self.children.iter().filter_map(|child| child.as_deref())
  }

  /// Octant a position falls into relative to this node's center.
  ///
  /// Octant: 0-7 where bits represent the positive side of each axis:
  /// - bit 0: X (position.x >= center.x)
  /// - bit 1: Y
  /// - bit 2: Z
  #[inline]
  pub fn octant_for(&self, position: Vec3) -> u8 {
    let mut octant = 0u8;
    if position.x >= self.center.x {
      octant |= 1;
    }
    if position.y >= self.center.y {
      octant |= 2;
    }
    if position.z >= self.center.z {
      octant |= 4;
    }
    octant
  }

  /// Center of the child cube in `octant`: offset by half of this node's
  /// half-size along each axis.
  #[inline]
  pub fn child_center(&self, octant: u8) -> Vec3 {
    let offset = self.half_size * 0.5;
    let sign = |bit: u8| if octant & bit != 0 { offset } else { -offset };
    self.center + Vec3::new(sign(1), sign(2), sign(4))
  }

  /// Cube the child in `octant` covers (or would cover once allocated).
  #[inline]
  pub fn child_bounds(&self, octant: u8) -> Aabb {
    Aabb::from_center_half_size(self.child_center(octant), self.half_size * 0.5)
  }

  /// Child in `octant`, allocating an empty leaf on first use.
  pub(crate) fn child_or_insert(&mut self, octant: u8) -> &mut OctreeNode<T> {
    let center = self.child_center(octant);
    let half_size = self.half_size * 0.5;
    let depth = self.depth + 1;
    let child = self.children[octant as usize]
      .get_or_insert_with(|| Box::new(OctreeNode::new(center, half_size, depth)));
    &mut **child
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
