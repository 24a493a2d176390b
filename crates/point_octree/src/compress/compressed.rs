//! CompressedCloud - a built octree plus the bounds of its source cloud.

use std::mem::size_of;

use glam::Vec3;

use crate::octree::{Aabb, Octree};
use crate::point::{PointCloud, PointRecord};

/// Octree-backed representation of a point cloud.
///
/// Stores the unpadded bounds of the source cloud; decompression queries
/// exactly that box, not the padded root cube.
#[derive(Debug)]
pub struct CompressedCloud {
  octree: Octree<PointRecord>,
  min_bounds: Vec3,
  max_bounds: Vec3,
}

impl CompressedCloud {
  pub fn new(octree: Octree<PointRecord>, min_bounds: Vec3, max_bounds: Vec3) -> Self {
    Self {
      octree,
      min_bounds,
      max_bounds,
    }
  }

  /// Rebuild the point cloud from a full-bounds query.
  ///
  /// Points come back in query order, so the result equals the source as a
  /// multiset but not necessarily as a sequence. Bounds are the stored ones.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "compress::decompress"))]
  pub fn decompress(&self) -> PointCloud {
    let records = self.octree.query_aabb(&self.bounds());

    let mut cloud = PointCloud::with_capacity(records.len());
    for record in records {
      cloud.positions.push(record.position);
      cloud.colors.push(record.color);
    }
    cloud.min_bounds = self.min_bounds;
    cloud.max_bounds = self.max_bounds;
    cloud
  }

  /// Number of points a full-bounds query returns. Walks the tree.
  pub fn vertex_count(&self) -> usize {
    let mut count = 0;
    self.octree.visit_region(&self.bounds(), |_| count += 1);
    count
  }

  /// Estimated in-memory size in bytes: fixed overhead plus one record per
  /// point. Node and child-slot allocations are not counted, and no
  /// serialized format exists to measure against.
  pub fn compressed_size(&self) -> usize {
    size_of::<Self>() + self.vertex_count() * size_of::<PointRecord>()
  }

  /// Read-only access to the tree, for traversal and visualization.
  pub fn octree(&self) -> &Octree<PointRecord> {
    &self.octree
  }

  pub fn min_bounds(&self) -> Vec3 {
    self.min_bounds
  }

  pub fn max_bounds(&self) -> Vec3 {
    self.max_bounds
  }

  /// Source cloud bounds as a box.
  pub fn bounds(&self) -> Aabb {
    Aabb {
      min: self.min_bounds,
      max: self.max_bounds,
    }
  }
}

#[cfg(test)]
#[path = "compressed_test.rs"]
mod compressed_test;
