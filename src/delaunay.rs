//! Delaunay triangulation over room centers.
//!
//! Backed by `spade`, which uses exact orientation and in-circle predicates,
//! so thin but valid triangles are never lost. Points are inserted in input
//! order and triangles reported as indices back into the caller's slice.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::geometry::Point2D;

/// Three indices into the point slice passed to [`triangulate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    pub fn vertices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    /// The three sides, in winding order
    pub fn edges(&self) -> [(usize, usize); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }

    pub fn contains_vertex(&self, v: usize) -> bool {
        self.a == v || self.b == v || self.c == v
    }
}

/// Triangulate `points`. Returned triangles index into `points`.
///
/// Duplicate points are ignored (the first occurrence is used), as are points
/// spade rejects (non-finite or out of range). Fewer than three distinct
/// points, or points that are all collinear, give an empty result. Output is
/// deterministic for a given input order.
pub fn triangulate(points: &[Vec2]) -> Vec<Triangle> {
    puffin::profile_function!();

    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    // spade vertex index -> input index
    let mut input_index = HashMap::new();
    let mut seen = HashSet::new();

    for (i, p) in points.iter().enumerate() {
        if !seen.insert(Point2D::from(*p)) {
            continue;
        }
        match triangulation.insert(Point2::new(p.x as f64, p.y as f64)) {
            Ok(handle) => {
                input_index.entry(handle.index()).or_insert(i);
            }
            Err(err) => log::warn!("skipping point {i} at {p}: {err:?}"),
        }
    }

    triangulation
        .inner_faces()
        .filter_map(|face| {
            let [a, b, c] = face
                .vertices()
                .map(|v| input_index.get(&v.fix().index()).copied());
            Some(Triangle::new(a?, b?, c?))
        })
        .collect()
}

/// Total number of vertex slots across all triangles
pub fn vertex_incidence(triangles: &[Triangle]) -> usize {
    triangles.len() * 3
}

/// Distinct point indices used by `triangles`, ascending
pub fn used_vertices(triangles: &[Triangle]) -> Vec<usize> {
    let mut used: Vec<usize> = triangles.iter().flat_map(|t| t.vertices()).collect();
    used.sort_unstable();
    used.dedup();
    used
}
