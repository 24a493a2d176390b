//! Octree - generic bucketed octree keyed by 3D position.
//!
//! # Insertion policy
//!
//! Descending from the root, an entry stops at the first node that either
//! sits at `max_depth` or is a leaf whose bucket is not yet full. Any other
//! node routes the entry into the child octant containing its position,
//! allocating that child on first use. Entries already bucketed when a leaf
//! turns internal stay where they are, so internal nodes may hold data.
//!
//! A position on or next to a split plane can fall just outside the child
//! cube it routes to, since child faces are rounded to f32. Such an entry
//! stays in the current node's bucket, so every entry lies inside the cube
//! of its node and of each ancestor.
//!
//! # Query order
//!
//! Pre-order: a node's bucket in insertion order, then its children in
//! octant order 0..8. Queries on an unmodified tree are deterministic.
//! Subtrees whose stored positions all lie outside the query box are
//! skipped.

use glam::Vec3;
use rayon::prelude::*;

use super::{Aabb, Entry, OctreeConfig, OctreeNode};

/// Generic octree owning a strict tree of [`OctreeNode`]s.
#[derive(Debug)]
pub struct Octree<T> {
  root: OctreeNode<T>,
  config: OctreeConfig,
  len: usize,
}

impl<T> Octree<T> {
  /// Create an empty octree whose root cube is `center ± half_size`, using
  /// the default bucket capacity.
  pub fn new(center: Vec3, half_size: f32, max_depth: u32) -> Self {
    Self::with_config(
      center,
      half_size,
      OctreeConfig::default().with_max_depth(max_depth),
    )
  }

  /// Create an empty octree with an explicit subdivision policy.
  ///
  /// # Panics
  /// Debug-asserts that `half_size` is positive and finite.
  pub fn with_config(center: Vec3, half_size: f32, config: OctreeConfig) -> Self {
    debug_assert!(
      half_size > 0.0 && half_size.is_finite(),
      "Octree half-size must be positive and finite, got {}",
      half_size
    );
    Self {
      root: OctreeNode::new(center, half_size, 0),
      config,
      len: 0,
    }
  }

  /// Insert `data` keyed by `position`. Never fails.
  ///
  /// Positions outside the root cube (including NaN) cannot be routed to an
  /// octant without breaking containment, so they are kept in the root
  /// bucket, where queries still see them.
  pub fn insert(&mut self, data: T, position: Vec3) {
    self.len += 1;
    let entry = Entry { position, data };
    self.root.encapsulate(position);

    if !self.root.bounds().contains_point(position) {
      #[cfg(feature = "tracing")]
      tracing::debug!(?position, "position outside octree root, keeping at root");
      self.root.entries.push(entry);
      return;
    }

    let config = self.config;
    let mut node = &mut self.root;
    loop {
      let at_depth_limit = node.depth() >= config.max_depth;
      let leaf_has_room = node.is_leaf() && !config.leaf_is_full(node.entries.len());
      if at_depth_limit || leaf_has_room {
        node.entries.push(entry);
        return;
      }

      let octant = node.octant_for(position);
      if !node.child_bounds(octant).contains_point(position) {
        node.entries.push(entry);
        return;
      }
      node = node.child_or_insert(octant);
      node.encapsulate(position);
    }
  }

  /// All data whose position lies within the closed box `[min, max]`.
  ///
  /// An inverted box (min > max on any axis) matches nothing.
  pub fn query(&self, min: Vec3, max: Vec3) -> Vec<&T> {
    self.query_aabb(&Aabb { min, max })
  }

  /// [`query`](Self::query) taking the box as an [`Aabb`].
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::query"))]
  pub fn query_aabb(&self, region: &Aabb) -> Vec<&T> {
    let mut results = Vec::new();
    self.visit_region(region, |entry| results.push(&entry.data));
    results
  }

  /// Run independent queries in parallel. Results are in `regions` order.
  pub fn query_batch(&self, regions: &[Aabb]) -> Vec<Vec<&T>>
  where
    T: Sync,
  {
    regions
      .par_iter()
      .map(|region| self.query_aabb(region))
      .collect()
  }

  /// Call `visit` for every entry inside `region`, in query order.
  pub fn visit_region<'a, F>(&'a self, region: &Aabb, mut visit: F)
  where
    F: FnMut(&'a Entry<T>),
  {
    visit_node(&self.root, region, &mut visit);
  }

  /// Every stored entry in query order.
  pub fn iter(&self) -> Iter<'_, T> {
    Iter {
      stack: vec![&self.root],
      bucket: <&[Entry<T>]>::default().iter(),
    }
  }

  /// Read-only access to the root node.
  #[inline]
  pub fn root(&self) -> &OctreeNode<T> {
    &self.root
  }

  /// Deepest level holding at least one entry. 0 for an empty tree.
  pub fn actual_max_depth(&self) -> u32 {
    deepest_with_data(&self.root).unwrap_or(0)
  }

  /// Number of allocated nodes, root included.
  pub fn node_count(&self) -> usize {
    count_nodes(&self.root)
  }

  /// Number of stored entries.
  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline]
  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }

  #[inline]
  pub fn max_depth(&self) -> u32 {
    self.config.max_depth
  }

  #[inline]
  pub fn center(&self) -> Vec3 {
    self.root.center()
  }

  #[inline]
  pub fn half_size(&self) -> f32 {
    self.root.half_size()
  }

  /// Root cube.
  #[inline]
  pub fn bounds(&self) -> Aabb {
    self.root.bounds()
  }
}

fn visit_node<'a, T, F>(node: &'a OctreeNode<T>, region: &Aabb, visit: &mut F)
where
  F: FnMut(&'a Entry<T>),
{
  if !node.content_overlaps(region) {
    return;
  }
  for entry in node.entries() {
    if region.contains_point(entry.position) {
      visit(entry);
    }
  }
  for child in node.children() {
    visit_node(child, region, visit);
  }
}

fn deepest_with_data<T>(node: &OctreeNode<T>) -> Option<u32> {
  let own = node.has_data().then_some(node.depth());
  node
    .children()
    .filter_map(deepest_with_data)
    .chain(own)
    .max()
}

fn count_nodes<T>(node: &OctreeNode<T>) -> usize {
  1 + node.children().map(count_nodes).sum::<usize>()
}

/// Pre-order iterator over every entry of an [`Octree`].
pub struct Iter<'a, T> {
  stack: Vec<&'a OctreeNode<T>>,
  bucket: std::slice::Iter<'a, Entry<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a Entry<T>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      if let Some(entry) = self.bucket.next() {
        return Some(entry);
      }
      let node = self.stack.pop()?;
      self.bucket = node.entries().iter();
      // Reversed so octant 0 is popped first.
      let children: smallvec::SmallVec<[&'a OctreeNode<T>; 8]> = node.children().collect();
      self.stack.extend(children.into_iter().rev());
    }
  }
}

impl<'a, T> IntoIterator for &'a Octree<T> {
  type Item = &'a Entry<T>;
  type IntoIter = Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
