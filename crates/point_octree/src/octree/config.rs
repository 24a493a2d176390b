//! OctreeConfig - subdivision policy for bucketed octrees.

/// Default depth ceiling used by the compression pipeline.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// Default bucket capacity before a leaf starts routing points to children.
pub const DEFAULT_MAX_POINTS_PER_LEAF: usize = 8;

/// Subdivision policy for an [`Octree`](super::Octree).
///
/// A leaf below `max_depth` accumulates entries until its bucket holds
/// `max_points_per_leaf` of them; the next insert turns it into an internal
/// node. Nodes at `max_depth` accept every entry routed to them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctreeConfig {
  /// Deepest level a node may live at. 0 = the root never subdivides.
  pub max_depth: u32,

  /// Bucket size a leaf may reach before it subdivides.
  /// 0 forces every insert below `max_depth` to descend.
  pub max_points_per_leaf: usize,
}

impl OctreeConfig {
  pub fn new(max_depth: u32, max_points_per_leaf: usize) -> Self {
    Self {
      max_depth,
      max_points_per_leaf,
    }
  }

  pub fn with_max_depth(mut self, max_depth: u32) -> Self {
    self.max_depth = max_depth;
    self
  }

  pub fn with_max_points_per_leaf(mut self, capacity: usize) -> Self {
    self.max_points_per_leaf = capacity;
    self
  }

  /// True when a leaf holding `bucket_len` entries must route the next one
  /// to a child instead of its own bucket.
  #[inline]
  pub fn leaf_is_full(&self, bucket_len: usize) -> bool {
    bucket_len >= self.max_points_per_leaf
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      max_depth: DEFAULT_MAX_DEPTH,
      max_points_per_leaf: DEFAULT_MAX_POINTS_PER_LEAF,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
