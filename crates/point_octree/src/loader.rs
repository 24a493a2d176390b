//! Wavefront OBJ vertex loader.
//!
//! Only geometric vertex records (`v x y z`) are read; faces, normals,
//! texture coordinates, groups and comments are skipped. Vertices carrying an
//! inline RGB triple (`v x y z r g b`) keep their color, all others get
//! [`DEFAULT_COLOR`].

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use glam::Vec3;
use thiserror::Error;

use crate::point::PointCloud;

/// Color assigned to vertices that do not carry their own.
pub const DEFAULT_COLOR: Vec3 = Vec3::splat(0.7);

/// Reasons an OBJ source cannot be turned into a point cloud.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to open {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("read failed at line {line}: {source}")]
  Read {
    line: usize,
    #[source]
    source: io::Error,
  },

  #[error("line {line}: {message}")]
  Parse { line: usize, message: String },

  #[error("invalid model loaded from {}: no vertices", path.display())]
  InvalidModel { path: PathBuf },
}

/// Load an OBJ file from disk.
///
/// A file without any vertex record is rejected as [`LoadError::InvalidModel`].
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "loader::load_obj"))]
pub fn load_obj(path: impl AsRef<Path>) -> Result<PointCloud, LoadError> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|source| LoadError::Io {
    path: path.to_path_buf(),
    source,
  })?;

  let cloud = parse_obj(BufReader::new(file))?;
  if cloud.is_empty() || !cloud.is_valid() {
    return Err(LoadError::InvalidModel {
      path: path.to_path_buf(),
    });
  }

  #[cfg(feature = "tracing")]
  tracing::debug!(points = cloud.len(), path = %path.display(), "model loaded");

  Ok(cloud)
}

/// Parse OBJ text. An input without vertices yields an empty cloud.
pub fn parse_obj(reader: impl BufRead) -> Result<PointCloud, LoadError> {
  let mut cloud = PointCloud::new();

  for (index, line) in reader.lines().enumerate() {
    let line_no = index + 1;
    let line = line.map_err(|source| LoadError::Read {
      line: line_no,
      source,
    })?;

    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("v") {
      continue;
    }

    let (position, color) = parse_vertex(tokens, line_no)?;
    cloud.push(position, color);
  }

  Ok(cloud)
}

/// Fields after the `v` tag: `x y z [w]` or `x y z r g b`.
fn parse_vertex<'a>(
  tokens: impl Iterator<Item = &'a str>,
  line: usize,
) -> Result<(Vec3, Vec3), LoadError> {
  let mut values = [0.0f32; 6];
  let mut count = 0;

  for token in tokens {
    if count == values.len() {
      return Err(LoadError::Parse {
        line,
        message: "too many vertex fields".into(),
      });
    }
    values[count] = token.parse().map_err(|_| LoadError::Parse {
      line,
      message: format!("invalid vertex coordinate `{token}`"),
    })?;
    count += 1;
  }

  let position = Vec3::new(values[0], values[1], values[2]);
  match count {
    3 | 4 => Ok((position, DEFAULT_COLOR)),
    6 => Ok((position, Vec3::new(values[3], values[4], values[5]))),
    _ => Err(LoadError::Parse {
      line,
      message: format!("expected 3, 4 or 6 vertex fields, found {count}"),
    }),
  }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;
