//! KD-tree spatial index over catalog positions.
//!
//! Provides O(log n) average-case nearest-neighbour and radius queries over
//! the stars of a [`StarCatalog`]. The star-hop planner uses radius queries to
//! limit candidate hops to the neighbourhood of the current star, and
//! [`SpatialIndex::nearest_star`] resolves a world-space point to a star.
//!
//! Coordinates are stored as `f32`; distances returned here are good enough
//! for candidate filtering, and callers needing exact distances recompute them
//! from the catalog's `f64` positions.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::debug;

use crate::catalog::{StarCatalog, StarPosition};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

#[derive(Debug, Clone)]
struct IndexNode {
    name: String,
    coords: [f32; 3],
}

/// Precomputed spatial index for neighbour queries.
pub struct SpatialIndex {
    tree: KdTree<f32, usize, 3, BUCKET_SIZE, u32>,
    nodes: Vec<IndexNode>,
}

impl SpatialIndex {
    /// Build an index over every star in the catalog.
    pub fn build(catalog: &StarCatalog) -> Self {
        let nodes: Vec<IndexNode> = catalog
            .iter()
            .map(|star| IndexNode {
                name: star.name.clone(),
                coords: position_to_coords(&star.position),
            })
            .collect();

        let mut tree: KdTree<f32, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        for (index, node) in nodes.iter().enumerate() {
            tree.add(&node.coords, index);
        }

        debug!(node_count = nodes.len(), "built spatial index");

        Self { tree, nodes }
    }

    /// Number of indexed stars.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find k nearest stars to a point.
    ///
    /// Returns (name, distance) pairs sorted by distance.
    pub fn nearest(&self, point: StarPosition, k: usize) -> Vec<(&str, f64)> {
        if k == 0 || self.nodes.is_empty() {
            return Vec::new();
        }

        let query_point = position_to_coords(&point);
        self.tree
            .nearest_n::<SquaredEuclidean>(&query_point, k)
            .into_iter()
            .map(|neighbour| {
                let node = &self.nodes[neighbour.item];
                (node.name.as_str(), (neighbour.distance as f64).sqrt())
            })
            .collect()
    }

    /// The single closest star to a point, if the index is not empty.
    pub fn nearest_star(&self, point: StarPosition) -> Option<(&str, f64)> {
        self.nearest(point, 1).into_iter().next()
    }

    /// Find all stars within a radius of a point.
    ///
    /// Returns (name, distance) pairs sorted by distance.
    pub fn within_radius(&self, point: StarPosition, radius: f64) -> Vec<(&str, f64)> {
        if radius <= 0.0 || self.nodes.is_empty() {
            return Vec::new();
        }

        let query_point = position_to_coords(&point);
        let squared_radius = (radius * radius) as f32;
        let mut neighbours: Vec<(&str, f64)> = self
            .tree
            .within::<SquaredEuclidean>(&query_point, squared_radius)
            .into_iter()
            .map(|neighbour| {
                let node = &self.nodes[neighbour.item];
                (node.name.as_str(), (neighbour.distance as f64).sqrt())
            })
            .collect();

        neighbours.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        neighbours
    }
}

fn position_to_coords(position: &StarPosition) -> [f32; 3] {
    [position.x as f32, position.y as f32, position.z as f32]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SpectralClass, Star};

    fn catalog() -> StarCatalog {
        StarCatalog::from_stars([
            Star::new("Sun", StarPosition::ORIGIN, 4.83, SpectralClass::G),
            Star::new("Near", StarPosition::new(3.0, 0.0, 0.0), 10.0, SpectralClass::M),
            Star::new("Mid", StarPosition::new(0.0, 6.0, 0.0), 10.0, SpectralClass::K),
            Star::new("Far", StarPosition::new(0.0, 0.0, 15.0), 10.0, SpectralClass::F),
        ])
        .expect("unique names")
    }

    #[test]
    fn nearest_returns_sorted_neighbours() {
        let index = SpatialIndex::build(&catalog());
        let results = index.nearest(StarPosition::ORIGIN, 3);
        let names: Vec<&str> = results.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["Sun", "Near", "Mid"]);
        assert!((results[1].1 - 3.0).abs() < 1e-4);
    }

    #[test]
    fn within_radius_excludes_distant_stars() {
        let index = SpatialIndex::build(&catalog());
        let results = index.within_radius(StarPosition::ORIGIN, 10.0);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|(name, _)| *name != "Far"));
    }

    #[test]
    fn empty_queries_return_nothing() {
        let index = SpatialIndex::build(&catalog());
        assert!(index.nearest(StarPosition::ORIGIN, 0).is_empty());
        assert!(index.within_radius(StarPosition::ORIGIN, 0.0).is_empty());
        assert_eq!(index.nearest_star(StarPosition::new(0.0, 5.5, 0.0)).unwrap().0, "Mid");
    }
}
