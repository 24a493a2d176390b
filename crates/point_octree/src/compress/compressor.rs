//! OctreeCompressor - bulk build of an octree from a point cloud.

use glam::Vec3;
use thiserror::Error;
use web_time::Instant;

use super::CompressedCloud;
use crate::metrics::CompressionStats;
use crate::octree::{Octree, OctreeConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_POINTS_PER_LEAF};
use crate::point::{PointCloud, PointRecord};

/// Root cube enlargement so points on the computed bounds stay inside.
pub const DEFAULT_PADDING: f32 = 1.1;

/// Root half-size used when the cloud has no extent (all points coincident).
/// A power of two, so child faces of a coincident chain stay exact.
pub const MIN_HALF_SIZE: f32 = 1.0 / 1024.0;

/// Reasons a point cloud cannot be compressed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CompressError {
  #[error("cannot compress an empty point cloud")]
  EmptyInput,

  #[error("point cloud has {positions} positions but {colors} colors")]
  LengthMismatch { positions: usize, colors: usize },
}

/// Settings for the compression pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
  feature = "serde",
  derive(serde::Serialize, serde::Deserialize),
  serde(default)
)]
pub struct CompressorSettings {
  /// Depth ceiling of the built octree.
  pub max_depth: u32,

  /// Bucket capacity before a leaf subdivides.
  pub max_points_per_leaf: usize,

  /// Multiplier applied to the root half-size. Values below 1.0 leave
  /// boundary points outside the root cube; they are still stored, at the
  /// root.
  pub padding: f32,
}

impl CompressorSettings {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_depth(mut self, max_depth: u32) -> Self {
    self.max_depth = max_depth;
    self
  }

  pub fn with_max_points_per_leaf(mut self, capacity: usize) -> Self {
    self.max_points_per_leaf = capacity;
    self
  }

  pub fn with_padding(mut self, padding: f32) -> Self {
    self.padding = padding;
    self
  }

  /// Octree policy derived from these settings.
  pub fn octree_config(&self) -> OctreeConfig {
    OctreeConfig::new(self.max_depth, self.max_points_per_leaf)
  }
}

impl Default for CompressorSettings {
  fn default() -> Self {
    Self {
      max_depth: DEFAULT_MAX_DEPTH,
      max_points_per_leaf: DEFAULT_MAX_POINTS_PER_LEAF,
      padding: DEFAULT_PADDING,
    }
  }
}

/// Builds [`CompressedCloud`]s from [`PointCloud`]s.
#[derive(Clone, Debug, Default)]
pub struct OctreeCompressor {
  settings: CompressorSettings,
}

impl OctreeCompressor {
  pub fn new(settings: CompressorSettings) -> Self {
    Self { settings }
  }

  pub fn settings(&self) -> &CompressorSettings {
    &self.settings
  }

  /// Build an octree holding every point of `cloud`.
  ///
  /// Fails without panicking if the cloud is empty or its position and color
  /// sequences differ in length.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "compress::compress"))]
  pub fn compress(&self, cloud: &PointCloud) -> Result<CompressedCloud, CompressError> {
    if let Err(err) = validate(cloud) {
      #[cfg(feature = "tracing")]
      tracing::warn!(error = %err, "rejecting point cloud");
      return Err(err);
    }

    let (center, half_size) = root_cube(cloud.min_bounds, cloud.max_bounds, self.settings.padding);
    let mut octree = Octree::with_config(center, half_size, self.settings.octree_config());

    for (position, color) in cloud.positions.iter().zip(&cloud.colors) {
      octree.insert(PointRecord::new(*position, *color), *position);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
      points = octree.len(),
      nodes = octree.node_count(),
      depth = octree.actual_max_depth(),
      "octree built"
    );

    Ok(CompressedCloud::new(octree, cloud.min_bounds, cloud.max_bounds))
  }

  /// [`compress`](Self::compress) and report sizes and build time.
  pub fn compress_with_stats(
    &self,
    cloud: &PointCloud,
  ) -> Result<(CompressedCloud, CompressionStats), CompressError> {
    let start = Instant::now();
    let compressed = self.compress(cloud)?;
    let stats = CompressionStats::from_compressed(cloud, &compressed, start.elapsed());
    Ok((compressed, stats))
  }
}

fn validate(cloud: &PointCloud) -> Result<(), CompressError> {
  if cloud.positions.is_empty() {
    return Err(CompressError::EmptyInput);
  }
  if cloud.positions.len() != cloud.colors.len() {
    return Err(CompressError::LengthMismatch {
      positions: cloud.positions.len(),
      colors: cloud.colors.len(),
    });
  }
  Ok(())
}

/// Root cube around `[min, max]`: centered on the box, half of its largest
/// extent scaled by `padding`.
///
/// Computed in f64 so bounds near `±f32::MAX` do not overflow; the half-size
/// saturates at `f32::MAX`.
pub fn root_cube(min: Vec3, max: Vec3, padding: f32) -> (Vec3, f32) {
  let (min, max) = (min.as_dvec3(), max.as_dvec3());
  let center = ((min + max) * 0.5).as_vec3();
  let half_size = (max - min).max_element() * 0.5 * f64::from(padding);

  if half_size > 0.0 && center.is_finite() {
    return (center, half_size.min(f64::from(f32::MAX)) as f32);
  }

  #[cfg(feature = "tracing")]
  if !(half_size.is_finite() && center.is_finite()) {
    tracing::warn!(?center, half_size, "non-finite bounds, using minimal root cube");
  }
  (center, MIN_HALF_SIZE)
}

#[cfg(test)]
#[path = "compressor_test.rs"]
mod compressor_test;
