//! Settings file loading and command-line overrides.
//!
//! ```toml
//! [compressor]
//! max_depth = 10
//! max_points_per_leaf = 16
//! padding = 1.1
//! ```
//!
//! Missing keys fall back to [`CompressorSettings::default`].

use std::path::Path;

use anyhow::{Context, Result};
use point_octree::CompressorSettings;
use serde::Deserialize;

/// Top-level layout of a settings file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
	pub compressor: CompressorSettings,
}

impl CliConfig {
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read config {}", path.display()))?;
		Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
	}

	pub fn parse(content: &str) -> Result<Self> {
		Ok(toml::from_str(content)?)
	}
}

/// Values given explicitly on the command line. They take precedence over
/// the settings file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
	pub max_depth: Option<u32>,
	pub max_points_per_leaf: Option<usize>,
	pub padding: Option<f32>,
}

impl Overrides {
	pub fn apply(self, mut settings: CompressorSettings) -> CompressorSettings {
		if let Some(max_depth) = self.max_depth {
			settings = settings.with_max_depth(max_depth);
		}
		if let Some(capacity) = self.max_points_per_leaf {
			settings = settings.with_max_points_per_leaf(capacity);
		}
		if let Some(padding) = self.padding {
			settings = settings.with_padding(padding);
		}
		settings
	}
}

/// Settings file (if any) merged with command-line overrides.
pub fn resolve_settings(config: Option<&Path>, overrides: Overrides) -> Result<CompressorSettings> {
	let base = match config {
		Some(path) => CliConfig::load(path)?.compressor,
		None => CompressorSettings::default(),
	};
	let settings = overrides.apply(base);

	if !(settings.padding > 0.0 && settings.padding.is_finite()) {
		anyhow::bail!("padding must be positive and finite, got {}", settings.padding);
	}

	Ok(settings)
}
