//! Octree module for bucketed spatial subdivision of point data.
//!
//! The tree is an explicit ownership graph: every node owns up to eight
//! boxed children, one per octant, and a bucket of entries. There are no
//! parent links, so dropping a node drops its whole subtree.
//!
//! # Octant Convention
//!
//! ```text
//! octant = (x >= cx) | (y >= cy) << 1 | (z >= cz) << 2
//! ```
//!
//! # Module Structure
//!
//! - [`bounds`]: `Aabb` - closed boxes for node cubes and queries
//! - [`config`]: `OctreeConfig` - depth ceiling and bucket capacity
//! - [`node`]: `OctreeNode` - cube, bucket and child slots
//! - [`tree`]: `Octree` - insertion, range queries, traversal

pub mod bounds;
pub mod config;
pub mod node;
pub mod tree;

// Re-exports
pub use bounds::Aabb;
pub use config::{OctreeConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_POINTS_PER_LEAF};
pub use node::{Entry, OctreeNode};
pub use tree::{Iter, Octree};
