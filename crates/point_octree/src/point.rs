//! Point data: the stored record and the uncompressed point collection.

use glam::Vec3;
use rayon::prelude::*;

use crate::octree::Aabb;

/// Below this many points bounds are computed on the calling thread.
const PARALLEL_BOUNDS_MIN_LEN: usize = 4096;

/// A colored point - the value stored in the octree.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointRecord {
  /// Position in model space.
  pub position: Vec3,
  /// RGB color, one float per channel.
  pub color: Vec3,
}

impl PointRecord {
  pub fn new(position: Vec3, color: Vec3) -> Self {
    Self { position, color }
  }
}

/// Uncompressed point collection with parallel position/color sequences.
///
/// `positions` and `colors` must have equal length for the cloud to be
/// valid. `min_bounds`/`max_bounds` are a cache: [`push`](Self::push) keeps
/// them current, direct edits to the vectors require
/// [`calculate_bounds`](Self::calculate_bounds).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
  pub positions: Vec<Vec3>,
  pub colors: Vec<Vec3>,
  pub min_bounds: Vec3,
  pub max_bounds: Vec3,
}

impl PointCloud {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      positions: Vec::with_capacity(capacity),
      colors: Vec::with_capacity(capacity),
      ..Default::default()
    }
  }

  /// Build a cloud from parallel sequences and compute its bounds.
  ///
  /// Lengths are not checked here; see [`is_valid`](Self::is_valid).
  pub fn from_parts(positions: Vec<Vec3>, colors: Vec<Vec3>) -> Self {
    let mut cloud = Self {
      positions,
      colors,
      ..Default::default()
    };
    cloud.calculate_bounds();
    cloud
  }

  /// Append a point, growing the cached bounds.
  pub fn push(&mut self, position: Vec3, color: Vec3) {
    if self.positions.is_empty() {
      self.min_bounds = position;
      self.max_bounds = position;
    } else {
      self.min_bounds = self.min_bounds.min(position);
      self.max_bounds = self.max_bounds.max(position);
    }
    self.positions.push(position);
    self.colors.push(color);
  }

  /// Recompute the cached bounds from `positions`. Zero for an empty cloud.
  pub fn calculate_bounds(&mut self) {
    if self.positions.is_empty() {
      self.min_bounds = Vec3::ZERO;
      self.max_bounds = Vec3::ZERO;
      return;
    }

    let empty = || (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN));
    let (min, max) = self
      .positions
      .par_iter()
      .with_min_len(PARALLEL_BOUNDS_MIN_LEN)
      .fold(empty, |(min, max), p| (min.min(*p), max.max(*p)))
      .reduce(empty, |(a_min, a_max), (b_min, b_max)| {
        (a_min.min(b_min), a_max.max(b_max))
      });

    self.min_bounds = min;
    self.max_bounds = max;
  }

  /// Non-empty with one color per position.
  pub fn is_valid(&self) -> bool {
    !self.positions.is_empty() && self.positions.len() == self.colors.len()
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.positions.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  /// Cached bounds as a box.
  pub fn bounds(&self) -> Aabb {
    Aabb {
      min: self.min_bounds,
      max: self.max_bounds,
    }
  }

  /// Paired records; stops at the shorter sequence.
  pub fn records(&self) -> impl Iterator<Item = PointRecord> + '_ {
    self
      .positions
      .iter()
      .zip(&self.colors)
      .map(|(position, color)| PointRecord::new(*position, *color))
  }
}

impl FromIterator<PointRecord> for PointCloud {
  fn from_iter<I: IntoIterator<Item = PointRecord>>(iter: I) -> Self {
    let mut cloud = Self::new();
    for record in iter {
      cloud.push(record.position, record.color);
    }
    cloud
  }
}

#[cfg(test)]
#[path = "point_test.rs"]
mod point_test;
