//! Engine-agnostic statistics for built octrees and compression runs.
//!
//! Collection walks the tree read-only; nothing here affects the data model.
//!
//! # Usage
//!
//! ```ignore
//! use point_octree::metrics::{CompressionStats, OctreeMetrics};
//!
//! let (compressed, stats) = compressor.compress_with_stats(&cloud)?;
//! println!("ratio {:.2}", stats.compression_ratio());
//!
//! let metrics = OctreeMetrics::collect(compressed.octree());
//! for (depth, nodes) in metrics.nodes_per_depth.iter().enumerate() {
//!     println!("depth {depth}: {nodes} nodes");
//! }
//! ```

use std::mem::size_of;
use std::time::Duration;

use glam::Vec3;

use crate::compress::CompressedCloud;
use crate::octree::{Octree, OctreeNode};
use crate::point::PointCloud;

/// Shape statistics of an octree, gathered in one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OctreeMetrics {
    // Distribution (index = depth)
    /// Allocated nodes at each depth.
    pub nodes_per_depth: Vec<usize>,
    /// Entries stored directly in buckets at each depth.
    pub entries_per_depth: Vec<usize>,

    // Shape
    /// Nodes with no children.
    pub leaf_count: usize,
    /// Nodes with at least one child.
    pub internal_count: usize,
    /// Internal nodes whose own bucket is non-empty.
    pub internal_with_data: usize,
    /// Nodes whose own bucket is non-empty.
    pub occupied_buckets: usize,
    /// Largest single bucket.
    pub largest_bucket: usize,
}

impl OctreeMetrics {
    /// Walk `octree` and gather statistics.
    pub fn collect<T>(octree: &Octree<T>) -> Self {
        let mut metrics = Self::default();
        metrics.visit(octree.root());
        metrics
    }

    fn visit<T>(&mut self, node: &OctreeNode<T>) {
        let depth = node.depth() as usize;
        if self.nodes_per_depth.len() <= depth {
            self.nodes_per_depth.resize(depth + 1, 0);
            self.entries_per_depth.resize(depth + 1, 0);
        }
        self.nodes_per_depth[depth] += 1;
        self.entries_per_depth[depth] += node.entries().len();
        self.largest_bucket = self.largest_bucket.max(node.entries().len());
        if node.has_data() {
            self.occupied_buckets += 1;
        }

        if node.is_leaf() {
            self.leaf_count += 1;
        } else {
            self.internal_count += 1;
            if node.has_data() {
                self.internal_with_data += 1;
            }
        }

        for child in node.children() {
            self.visit(child);
        }
    }

    /// Total allocated nodes.
    pub fn total_nodes(&self) -> usize {
        self.nodes_per_depth.iter().sum()
    }

    /// Total stored entries.
    pub fn total_entries(&self) -> usize {
        self.entries_per_depth.iter().sum()
    }

    /// Average entries per non-empty bucket.
    pub fn avg_bucket_size(&self) -> f64 {
        if self.occupied_buckets == 0 {
            0.0
        } else {
            self.total_entries() as f64 / self.occupied_buckets as f64
        }
    }
}

/// Summary of one compression run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionStats {
    /// Points in the source cloud.
    pub source_points: usize,
    /// Points a full-bounds query returns.
    pub vertex_count: usize,
    /// Raw position + color bytes of the source cloud.
    pub original_size: usize,
    /// Estimate from [`CompressedCloud::compressed_size`].
    pub compressed_size: usize,
    /// Allocated octree nodes.
    pub node_count: usize,
    /// Deepest level holding data.
    pub actual_max_depth: u32,
    /// Wall time spent building the tree.
    pub build_time: Duration,
}

impl CompressionStats {
    pub fn from_compressed(
        source: &PointCloud,
        compressed: &CompressedCloud,
        build_time: Duration,
    ) -> Self {
        Self {
            source_points: source.len(),
            vertex_count: compressed.vertex_count(),
            original_size: original_size(source),
            compressed_size: compressed.compressed_size(),
            node_count: compressed.octree().node_count(),
            actual_max_depth: compressed.octree().actual_max_depth(),
            build_time,
        }
    }

    /// original / compressed. Below 1.0 means the estimate grew.
    pub fn compression_ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            0.0
        } else {
            self.original_size as f64 / self.compressed_size as f64
        }
    }

    /// Build time in microseconds.
    pub fn build_time_us(&self) -> u64 {
        self.build_time.as_micros() as u64
    }
}

/// Bytes held by a cloud's position and color sequences.
pub fn original_size(cloud: &PointCloud) -> usize {
    (cloud.positions.len() + cloud.colors.len()) * size_of::<Vec3>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::OctreeCompressor;
    use crate::octree::OctreeConfig;

    #[test]
    fn test_empty_tree_metrics() {
        let tree: Octree<u8> = Octree::new(Vec3::ZERO, 1.0, 3);
        let metrics = OctreeMetrics::collect(&tree);

        assert_eq!(metrics.nodes_per_depth, vec![1]);
        assert_eq!(metrics.entries_per_depth, vec![0]);
        assert_eq!(metrics.leaf_count, 1);
        assert_eq!(metrics.internal_count, 0);
        assert_eq!(metrics.avg_bucket_size(), 0.0);
    }

    #[test]
    fn test_metrics_follow_subdivision() {
        let mut tree = Octree::with_config(Vec3::ZERO, 1.0, OctreeConfig::new(2, 1));
        tree.insert(0u8, Vec3::splat(-0.5));
        tree.insert(1, Vec3::splat(0.5));
        tree.insert(2, Vec3::splat(-0.5));

        // root keeps entry 0; entry 1 -> octant 7; entry 2 -> octant 0
        let metrics = OctreeMetrics::collect(&tree);
        assert_eq!(metrics.nodes_per_depth, vec![1, 2]);
        assert_eq!(metrics.entries_per_depth, vec![1, 2]);
        assert_eq!(metrics.leaf_count, 2);
        assert_eq!(metrics.internal_count, 1);
        assert_eq!(metrics.internal_with_data, 1);
        assert_eq!(metrics.occupied_buckets, 3);
        assert_eq!(metrics.largest_bucket, 1);
        assert_eq!(metrics.total_nodes(), tree.node_count());
        assert_eq!(metrics.total_entries(), tree.len());
        assert_eq!(metrics.avg_bucket_size(), 1.0);
    }

    #[test]
    fn test_compression_stats() {
        let mut cloud = PointCloud::new();
        for i in 0..10 {
            cloud.push(Vec3::splat(i as f32), Vec3::ONE);
        }
        let compressed = OctreeCompressor::default().compress(&cloud).unwrap();
        let stats = CompressionStats::from_compressed(&cloud, &compressed, Duration::from_micros(250));

        assert_eq!(stats.source_points, 10);
        assert_eq!(stats.vertex_count, 10);
        assert_eq!(stats.original_size, 10 * 2 * size_of::<Vec3>());
        assert_eq!(stats.compressed_size, compressed.compressed_size());
        assert_eq!(stats.build_time_us(), 250);
        assert!(
            (stats.compression_ratio() - stats.original_size as f64 / stats.compressed_size as f64)
                .abs()
                < 1e-12
        );
    }
}
