//! point_octree - bucketed octree compression for colored point clouds
//!
//! A point cloud is reorganized into a generic octree keyed by position and
//! reconstructed by one range query over the stored bounds. The round trip
//! preserves the multiset of `(position, color)` records; only their order
//! may change.
//!
//! # Features
//!
//! - **Generic octree**: bucket-before-subdivide insertion, closed box
//!   queries, deterministic pre-order traversal
//! - **Compression pipeline**: padded root cube, bulk build, stored bounds
//! - **OBJ loading**: vertex records with default or inline colors
//! - **Debug geometry**: node boxes as wireframe or solid vertex lists
//! - **Metrics**: per-depth tree shape and compression statistics
//!
//! # Example
//!
//! ```ignore
//! use point_octree::{loader, OctreeCompressor};
//!
//! let cloud = loader::load_obj("bunny.obj")?;
//! let compressed = OctreeCompressor::default().compress(&cloud)?;
//!
//! println!("{} nodes, depth {}",
//!     compressed.octree().node_count(), compressed.octree().actual_max_depth());
//!
//! let restored = compressed.decompress();
//! assert_eq!(restored.len(), cloud.len());
//! ```

// Point records and uncompressed clouds
pub mod point;
pub use point::{PointCloud, PointRecord};

// Generic octree
pub mod octree;
pub use octree::{Aabb, Entry, Octree, OctreeConfig, OctreeNode};

// Compression pipeline
pub mod compress;
pub use compress::{CompressError, CompressedCloud, CompressorSettings, OctreeCompressor};

// Model loading
pub mod loader;
pub use loader::LoadError;

// Debug box extraction
pub mod visualize;
pub use visualize::BoundingBox;

pub mod metrics;
pub use metrics::{CompressionStats, OctreeMetrics};
