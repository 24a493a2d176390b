//! octree-compress - compress an OBJ vertex set into an octree and report
//! statistics.
//!
//! ```bash
//! # Default settings
//! octree-compress bunny.obj
//!
//! # Deeper tree, smaller buckets
//! octree-compress bunny.obj --max-depth 12 --max-points-per-leaf 4
//!
//! # Settings file, flags still win
//! octree-compress bunny.obj --config octree.toml --padding 1.25
//!
//! # Count points inside a box and debug boxes down to level 3
//! octree-compress bunny.obj --query -1 -1 -1 1 1 1 --levels 3
//! ```

mod config;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::Vec3;
use point_octree::visualize::{boxes_at_level, extract_bounding_boxes};
use point_octree::{loader, Aabb, CompressedCloud, OctreeCompressor, OctreeMetrics};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{resolve_settings, Overrides};

// =============================================================================
// CLI Arguments
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "octree-compress")]
#[command(about = "Compress an OBJ point set into a bucketed octree")]
#[command(version)]
struct Args {
	/// OBJ file to load
	input: PathBuf,

	/// Settings file (TOML, `[compressor]` table)
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Depth ceiling of the octree
	#[arg(short = 'd', long)]
	max_depth: Option<u32>,

	/// Bucket capacity before a leaf subdivides
	#[arg(short = 'p', long)]
	max_points_per_leaf: Option<usize>,

	/// Root cube enlargement factor
	#[arg(long)]
	padding: Option<f32>,

	/// Count points inside the box MIN_X MIN_Y MIN_Z MAX_X MAX_Y MAX_Z
	#[arg(
		long,
		num_args = 6,
		allow_negative_numbers = true,
		value_names = ["MIN_X", "MIN_Y", "MIN_Z", "MAX_X", "MAX_Y", "MAX_Z"]
	)]
	query: Option<Vec<f32>>,

	/// Summarize debug boxes down to this level
	#[arg(long)]
	levels: Option<u32>,

	/// Enable verbose logging
	#[arg(short, long)]
	verbose: bool,
}

impl Args {
	fn overrides(&self) -> Overrides {
		Overrides {
			max_depth: self.max_depth,
			max_points_per_leaf: self.max_points_per_leaf,
			padding: self.padding,
		}
	}

	fn query_box(&self) -> Option<Aabb> {
		self.query.as_deref().map(|v| Aabb {
			min: Vec3::new(v[0], v[1], v[2]),
			max: Vec3::new(v[3], v[4], v[5]),
		})
	}
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
	let args = Args::parse();

	let filter = if args.verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::new("info")
	};
	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let settings = resolve_settings(args.config.as_deref(), args.overrides())?;
	info!(
		max_depth = settings.max_depth,
		max_points_per_leaf = settings.max_points_per_leaf,
		padding = settings.padding,
		"settings"
	);

	let cloud = loader::load_obj(&args.input)
		.with_context(|| format!("failed to load {}", args.input.display()))?;
	info!(
		points = cloud.len(),
		min = ?cloud.min_bounds,
		max = ?cloud.max_bounds,
		"loaded {}",
		args.input.display()
	);

	let (compressed, stats) = OctreeCompressor::new(settings)
		.compress_with_stats(&cloud)
		.context("compression failed")?;

	info!("Compression:");
	info!("  Build time: {} us", stats.build_time_us());
	info!("  Nodes: {}", stats.node_count);
	info!("  Depth reached: {}", stats.actual_max_depth);
	info!("  Original size: {} bytes", stats.original_size);
	info!("  Compressed size: {} bytes", stats.compressed_size);
	info!("  Ratio: {:.3}", stats.compression_ratio());

	report_metrics(&compressed);

	let restored = compressed.decompress();
	if restored.len() != cloud.len() {
		bail!(
			"round trip lost points: {} in, {} out",
			cloud.len(),
			restored.len()
		);
	}
	info!(points = restored.len(), "round trip verified");

	if let Some(region) = args.query_box() {
		if !region.is_valid() {
			warn!(?region, "query box is inverted and matches nothing");
		}
		let hits = compressed.octree().query_aabb(&region);
		info!(min = ?region.min, max = ?region.max, hits = hits.len(), "query");
	}

	if let Some(levels) = args.levels {
		let boxes = extract_bounding_boxes(compressed.octree(), Some(levels));
		for level in 0..=levels {
			let at_level = boxes_at_level(&boxes, level);
			let with_data = at_level.iter().filter(|b| b.has_data).count();
			info!(level, boxes = at_level.len(), with_data, "debug boxes");
		}
	}

	Ok(())
}

fn report_metrics(compressed: &CompressedCloud) {
	let metrics = OctreeMetrics::collect(compressed.octree());

	info!(
		leaves = metrics.leaf_count,
		internal = metrics.internal_count,
		internal_with_data = metrics.internal_with_data,
		largest_bucket = metrics.largest_bucket,
		avg_bucket = %format!("{:.2}", metrics.avg_bucket_size()),
		"tree shape"
	);
	for (depth, (nodes, entries)) in metrics
		.nodes_per_depth
		.iter()
		.zip(&metrics.entries_per_depth)
		.enumerate()
	{
		info!(depth, nodes, entries, "level");
	}
}
