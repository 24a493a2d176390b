//! Axis-aligned bounding box used for node cubes and range queries.

use glam::Vec3;

/// Closed axis-aligned bounding box.
///
/// Both corners are inclusive, matching the octree's cube invariant: a point
/// lying exactly on a face belongs to the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl Aabb {
	/// Box spanning `min..=max`. Build the struct directly for a box that
	/// may be inverted (an inverted query box matches nothing).
	pub fn new(min: Vec3, max: Vec3) -> Self {
		debug_assert!(min.cmple(max).all(), "inverted box: {min:?} > {max:?}");
		Self { min, max }
	}

	/// Create a cube from its center and scalar half-size.
	pub fn from_center_half_size(center: Vec3, half_size: f32) -> Self {
		Self {
			min: center - Vec3::splat(half_size),
			max: center + Vec3::splat(half_size),
		}
	}

	/// Inverted box (ready for encapsulation). Overlaps and contains nothing.
	pub fn empty() -> Self {
		Self {
			min: Vec3::splat(f32::INFINITY),
			max: Vec3::splat(f32::NEG_INFINITY),
		}
	}

	/// Expand the box to include a point. NaN coordinates leave it unchanged.
	#[inline]
	pub fn encapsulate(&mut self, point: Vec3) {
		self.min = self.min.min(point);
		self.max = self.max.max(point);
	}

	/// False for an inverted or NaN box.
	#[inline]
	pub fn is_valid(&self) -> bool {
		self.min.cmple(self.max).all()
	}

	/// Closed intersection test; a shared face or corner is enough.
	#[inline]
	pub fn overlaps(&self, other: &Aabb) -> bool {
		self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
	}

	/// Point on or inside every face. A NaN coordinate is never contained.
	#[inline]
	pub fn contains_point(&self, point: Vec3) -> bool {
		self.min.cmple(point).all() && point.cmple(self.max).all()
	}

	/// Edge lengths per axis.
	#[inline]
	pub fn size(&self) -> Vec3 {
		self.max - self.min
	}

	#[inline]
	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}
}
