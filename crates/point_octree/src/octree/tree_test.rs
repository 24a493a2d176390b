use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Uniform random positions in the unit cube [0, 1]^3.
fn uniform_positions(count: usize, seed: u64) -> Vec<Vec3> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..count)
    .map(|_| Vec3::new(rng.random(), rng.random(), rng.random()))
    .collect()
}

/// Octree over the unit cube with a little padding, data = insertion index.
fn unit_cube_tree(positions: &[Vec3], config: OctreeConfig) -> Octree<usize> {
  let mut tree = Octree::with_config(Vec3::splat(0.5), 0.55, config);
  for (index, position) in positions.iter().enumerate() {
    tree.insert(index, *position);
  }
  tree
}

fn sorted_indices(results: &[&usize]) -> Vec<usize> {
  let mut indices: Vec<usize> = results.iter().map(|index| **index).collect();
  indices.sort_unstable();
  indices
}

fn for_each_node<T>(node: &OctreeNode<T>, f: &mut impl FnMut(&OctreeNode<T>)) {
  f(node);
  for child in node.children() {
    for_each_node(child, f);
  }
}

/// Every entry lies inside its node's cube and every ancestor cube; child
/// cubes halve their parent.
fn assert_contained<T: std::fmt::Debug>(node: &OctreeNode<T>, ancestors: &mut Vec<Aabb>) {
  ancestors.push(node.bounds());
  for entry in node.entries() {
    for cube in ancestors.iter() {
      assert!(
        cube.contains_point(entry.position),
        "Entry {:?} at {:?} (depth {}) escapes cube {:?}",
        entry.data,
        entry.position,
        node.depth(),
        cube
      );
    }
  }
  for child in node.children() {
    assert_eq!(child.half_size(), node.half_size() * 0.5);
    assert_eq!(child.depth(), node.depth() + 1);
    assert_contained(child, ancestors);
  }
  ancestors.pop();
}

// =========================================================================
// Insertion policy
// =========================================================================

#[test]
fn test_empty_tree() {
  let tree: Octree<usize> = Octree::new(Vec3::ZERO, 1.0, 4);

  assert!(tree.is_empty());
  assert_eq!(tree.len(), 0);
  assert_eq!(tree.actual_max_depth(), 0);
  assert_eq!(tree.node_count(), 1);
  assert!(tree.root().is_leaf());
  assert!(tree.query(Vec3::splat(-1.0), Vec3::splat(1.0)).is_empty());
}

/// A single point stays in the root bucket.
#[test]
fn test_single_point_stays_at_root() {
  let mut tree = Octree::new(Vec3::ZERO, 1.0, 5);
  tree.insert(7usize, Vec3::new(0.25, -0.5, 0.75));

  assert_eq!(tree.actual_max_depth(), 0);
  assert!(tree.root().is_leaf());
  assert_eq!(tree.root().entries().len(), 1);
  assert_eq!(tree.len(), 1);
}

/// The leaf accepts entries up to capacity, then routes to children while
/// keeping what it already holds.
#[test]
fn test_full_leaf_becomes_internal_and_keeps_bucket() {
  let mut tree = Octree::with_config(Vec3::ZERO, 1.0, OctreeConfig::new(4, 2));
  tree.insert(0usize, Vec3::new(-0.5, -0.5, -0.5));
  tree.insert(1, Vec3::new(0.5, 0.5, 0.5));
  assert!(tree.root().is_leaf());

  tree.insert(2, Vec3::new(0.5, -0.5, -0.5));

  let root = tree.root();
  assert!(!root.is_leaf(), "Root should subdivide past capacity");
  assert_eq!(root.entries().len(), 2, "Existing entries stay at the root");
  let child = root.child(1).expect("+X octant should be allocated");
  assert_eq!(child.entries().len(), 1);
  assert_eq!(child.entries()[0].data, 2);
  assert_eq!(tree.actual_max_depth(), 1);

  // Internal nodes no longer accept entries directly.
  tree.insert(3, Vec3::new(-0.5, -0.5, -0.5));
  assert_eq!(tree.root().entries().len(), 2);
  assert!(tree.root().child(0).is_some());
}

/// max_depth = 0: the root never subdivides regardless of capacity.
#[test]
fn test_max_depth_zero_never_subdivides() {
  let positions = uniform_positions(100, 1);
  let tree = unit_cube_tree(&positions, OctreeConfig::new(0, 1));

  assert!(tree.root().is_leaf());
  assert_eq!(tree.root().entries().len(), 100);
  assert_eq!(tree.actual_max_depth(), 0);
  assert_eq!(tree.node_count(), 1);
}

/// Two coincident points must both be retrievable.
#[test]
fn test_coincident_points_both_retrievable() {
  let position = Vec3::new(0.3, 0.3, 0.3);
  let mut tree = Octree::new(Vec3::splat(0.5), 0.55, 3);
  tree.insert(0usize, position);
  tree.insert(1, position);

  let results = tree.query(position, position);
  assert_eq!(sorted_indices(&results), vec![0, 1]);
  assert!(tree.actual_max_depth() <= 3);
}

/// Coincident points chain down to max_depth and pile into its bucket.
#[test]
fn test_coincident_points_pile_up_at_max_depth() {
  let position = Vec3::new(0.1, 0.9, 0.4);
  let mut tree = Octree::with_config(Vec3::splat(0.5), 0.55, OctreeConfig::new(3, 1));
  for index in 0..10usize {
    tree.insert(index, position);
  }

  assert_eq!(tree.actual_max_depth(), 3);
  assert_eq!(tree.node_count(), 4, "One chain of nodes from root to depth 3");

  let mut deepest_bucket = 0;
  for_each_node(tree.root(), &mut |node| {
    if node.depth() == 3 {
      deepest_bucket = node.entries().len();
    } else {
      assert_eq!(node.entries().len(), 1);
    }
  });
  assert_eq!(deepest_bucket, 7);
  assert_eq!(tree.query(position, position).len(), 10);
}

/// Points outside the root cube are kept and still found by queries.
#[test]
fn test_out_of_root_point_is_kept() {
  let mut tree = Octree::new(Vec3::ZERO, 1.0, 4);
  let outside = Vec3::new(5.0, 0.0, 0.0);
  tree.insert(0usize, Vec3::ZERO);
  tree.insert(1, outside);

  assert_eq!(tree.len(), 2);
  assert_eq!(sorted_indices(&tree.query(outside, outside)), vec![1]);
  assert_eq!(
    sorted_indices(&tree.query(Vec3::splat(-10.0), Vec3::splat(10.0))),
    vec![0, 1]
  );
  assert_eq!(tree.iter().count(), 2);
}

// =========================================================================
// Structural invariants
// =========================================================================

/// No node is deeper than max_depth; actual depth never exceeds the ceiling.
#[test]
fn test_depth_bound() {
  for max_depth in 0..6 {
    let positions = uniform_positions(500, 10 + max_depth as u64);
    let tree = unit_cube_tree(&positions, OctreeConfig::new(max_depth, 1));

    assert!(tree.actual_max_depth() <= max_depth);
    for_each_node(tree.root(), &mut |node| {
      assert!(
        node.depth() <= max_depth,
        "Node at depth {} exceeds max_depth {}",
        node.depth(),
        max_depth
      );
    });
  }
}

#[test]
fn test_containment() {
  let positions = uniform_positions(2000, 3);
  let tree = unit_cube_tree(&positions, OctreeConfig::new(6, 4));
  assert_contained(tree.root(), &mut Vec::new());
}

/// Points placed exactly on split planes of off-origin, non-dyadic roots.
/// Rounded child faces must never leave such a point outside its node.
#[test]
fn test_containment_on_split_planes() {
  let mut rng = StdRng::seed_from_u64(2024);

  for _ in 0..5 {
    let center = Vec3::new(
      rng.random_range(-1000.0..1000.0),
      rng.random_range(-1000.0..1000.0),
      rng.random_range(-1000.0..1000.0),
    );
    let half_size = rng.random_range(0.1..50.0);
    let mut tree = Octree::with_config(center, half_size, OctreeConfig::new(12, 0));

    for index in 0..400usize {
      // Walk a random path and take the center of the node it ends at.
      let mut cursor = OctreeNode::<()>::new(center, half_size, 0);
      for _ in 0..rng.random_range(1..=10) {
        let octant = rng.random_range(0..8u8);
        cursor = OctreeNode::new(
          cursor.child_center(octant),
          cursor.half_size() * 0.5,
          cursor.depth() + 1,
        );
      }
      tree.insert(index, cursor.center());
    }

    assert_contained(tree.root(), &mut Vec::new());
    assert_eq!(tree.query_aabb(&tree.bounds()).len(), 400);
  }
}

/// A position whose routed child cube rounds away from it stays in the
/// parent bucket, even below capacity 0.
#[test]
fn test_unroutable_position_stays_in_parent() {
  let position = Vec3::new(-4.0, 0.25, 7.0);
  let mut tree = Octree::with_config(position, 1.0e-3, OctreeConfig::new(12, 0));
  tree.insert(0usize, position);

  assert_eq!(tree.actual_max_depth(), 1);
  let child = tree.root().child(7).expect("+XYZ octant should be allocated");
  assert!(child.is_leaf());
  assert_eq!(child.entries().len(), 1);
  assert!(!child.child_bounds(child.octant_for(position)).contains_point(position));
  assert_contained(tree.root(), &mut Vec::new());
  assert_eq!(tree.query(position, position), vec![&0]);
}

// =========================================================================
// Queries
// =========================================================================

/// 1,000 uniform points with max_depth 5: depth within 1..=5 and a full query
/// returns every point exactly once.
#[test]
fn test_thousand_uniform_points() {
  let positions = uniform_positions(1000, 42);
  let tree = unit_cube_tree(&positions, OctreeConfig::default().with_max_depth(5));

  let depth = tree.actual_max_depth();
  assert!((1..=5).contains(&depth), "Unexpected depth {}", depth);

  let results = tree.query(Vec3::ZERO, Vec3::ONE);
  assert_eq!(results.len(), 1000);
  assert_eq!(sorted_indices(&results), (0..1000).collect::<Vec<_>>());
}

/// Query results match a brute-force filter and lie inside the box.
#[test]
fn test_query_matches_brute_force() {
  let positions = uniform_positions(1500, 9);
  let tree = unit_cube_tree(&positions, OctreeConfig::new(5, 4));
  let mut rng = StdRng::seed_from_u64(99);

  for _ in 0..50 {
    let a = Vec3::new(rng.random(), rng.random(), rng.random());
    let b = Vec3::new(rng.random(), rng.random(), rng.random());
    let region = Aabb::new(a.min(b), a.max(b));

    let results = tree.query_aabb(&region);
    for index in &results {
      assert!(region.contains_point(positions[**index]));
    }

    let expected: Vec<usize> = (0..positions.len())
      .filter(|index| region.contains_point(positions[*index]))
      .collect();
    assert_eq!(sorted_indices(&results), expected);
  }
}

/// Points exactly on the query faces are included.
#[test]
fn test_query_is_closed() {
  let mut tree = Octree::with_config(Vec3::ZERO, 2.0, OctreeConfig::new(4, 1));
  tree.insert(0usize, Vec3::new(1.0, 1.0, 1.0));
  tree.insert(1, Vec3::new(-1.0, 0.0, 0.5));
  tree.insert(2, Vec3::new(1.0001, 0.0, 0.0));

  let results = tree.query(Vec3::splat(-1.0), Vec3::splat(1.0));
  assert_eq!(sorted_indices(&results), vec![0, 1]);
}

#[test]
fn test_inverted_query_is_empty() {
  let positions = uniform_positions(100, 5);
  let tree = unit_cube_tree(&positions, OctreeConfig::default());
  assert!(tree.query(Vec3::ONE, Vec3::ZERO).is_empty());
}

/// Repeated queries on an unmodified tree return identical sequences.
#[test]
fn test_query_is_deterministic() {
  let positions = uniform_positions(800, 11);
  let tree = unit_cube_tree(&positions, OctreeConfig::new(6, 3));

  let first: Vec<usize> = tree
    .query(Vec3::splat(0.2), Vec3::splat(0.9))
    .into_iter()
    .copied()
    .collect();
  let second: Vec<usize> = tree
    .query(Vec3::splat(0.2), Vec3::splat(0.9))
    .into_iter()
    .copied()
    .collect();
  assert_eq!(first, second);
}

/// iter() walks entries in the same order as a full-bounds query.
#[test]
fn test_iter_matches_full_query_order() {
  let positions = uniform_positions(600, 21);
  let tree = unit_cube_tree(&positions, OctreeConfig::new(5, 2));

  let queried: Vec<usize> = tree.query(Vec3::ZERO, Vec3::ONE).into_iter().copied().collect();
  let iterated: Vec<usize> = tree.iter().map(|entry| entry.data).collect();
  assert_eq!(queried, iterated);
  assert_eq!((&tree).into_iter().count(), tree.len());
}

/// Parallel batch queries return the same sequences as sequential ones.
#[test]
fn test_query_batch_matches_sequential() {
  let positions = uniform_positions(1000, 17);
  let tree = unit_cube_tree(&positions, OctreeConfig::default());
  let regions: Vec<Aabb> = (0..8)
    .map(|i| {
      let min = Vec3::splat(i as f32 * 0.1);
      Aabb::new(min, min + Vec3::splat(0.3))
    })
    .collect();

  let batched = tree.query_batch(&regions);
  assert_eq!(batched.len(), regions.len());
  for (region, results) in regions.iter().zip(&batched) {
    assert_eq!(results, &tree.query_aabb(region));
  }
}

/// Content bounds track the exact extent of each subtree.
#[test]
fn test_content_bounds() {
  let positions = uniform_positions(300, 31);
  let tree = unit_cube_tree(&positions, OctreeConfig::new(4, 2));

  let expected_min = positions.iter().copied().fold(Vec3::splat(f32::MAX), Vec3::min);
  let expected_max = positions.iter().copied().fold(Vec3::splat(f32::MIN), Vec3::max);
  let root_content = tree.root().content_bounds().expect("non-empty tree");
  assert_eq!(root_content.min, expected_min);
  assert_eq!(root_content.max, expected_max);

  for_each_node(tree.root(), &mut |node| {
    let content = node.content_bounds().expect("allocated nodes hold data below");
    for child in node.children() {
      let inner = child.content_bounds().unwrap();
      assert!(content.contains_point(inner.min));
      assert!(content.contains_point(inner.max));
    }
  });

  let empty: Octree<usize> = Octree::new(Vec3::ZERO, 1.0, 3);
  assert!(empty.root().content_bounds().is_none());
}

/// Coincident points at an awkward offset, deep in the tree, are still found
/// by a zero-volume query on their exact position.
#[test]
fn test_point_query_on_deep_chain() {
  let position = Vec3::new(-4.0, 0.25, 7.0);
  let mut tree = Octree::with_config(position, 1.0 / 1024.0, OctreeConfig::new(12, 1));
  for index in 0..20usize {
    tree.insert(index, position);
  }

  assert_eq!(tree.actual_max_depth(), 12);
  assert_contained(tree.root(), &mut Vec::new());
  assert_eq!(tree.query(position, position).len(), 20);
}
