//! Compression pipeline: point cloud -> octree -> point cloud.
//!
//! ```text
//! PointCloud --OctreeCompressor::compress--> CompressedCloud
//! CompressedCloud --decompress--> PointCloud (same multiset, query order)
//! ```

pub mod compressed;
pub mod compressor;

pub use compressed::CompressedCloud;
pub use compressor::{
  root_cube, CompressError, CompressorSettings, OctreeCompressor, DEFAULT_PADDING, MIN_HALF_SIZE,
};
