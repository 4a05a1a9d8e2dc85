//! Spanning tree over the triangulation edges (union-find, Kruskal style).
//!
//! Edges are kept as a multiset: a side shared by two triangles is offered
//! twice and the second offer is rejected by the cycle check. By default the
//! edges are processed in insertion order, so the result is *a* spanning tree
//! of the input rather than necessarily the minimum one; [`EdgeOrder::AscendingCost`]
//! sorts first for a strict minimum spanning tree.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOrder {
    /// Process edges in the order they were added
    #[default]
    Insertion,
    /// Stable sort by ascending cost first
    AscendingCost,
}

/// An undirected edge between two room centers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub a: Point2D,
    pub b: Point2D,
}

impl Edge {
    pub fn new(a: Point2D, b: Point2D) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }
}

/// An edge together with its cost (Euclidean length)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostPair {
    pub cost: f32,
    pub edge: Edge,
}

#[derive(Debug, Clone, Default)]
pub struct MinSpanTree {
    cost_pairs: Vec<CostPair>,
    /// point -> parent; a root is its own parent
    roots: HashMap<Point2D, Point2D>,
    total_cost: f32,
    /// Number of cost pairs seen by the last pass
    size: usize,
    /// Edges accepted by the last pass without closing a cycle
    tree_edges: usize,
    order: EdgeOrder,
}

impl MinSpanTree {
    pub fn new(order: EdgeOrder) -> Self {
        Self {
            order,
            ..Default::default()
        }
    }

    pub fn order(&self) -> EdgeOrder {
        self.order
    }

    pub fn set_order(&mut self, order: EdgeOrder) {
        self.order = order;
    }

    /// Offer an edge. Cost is the distance between the endpoints.
    pub fn add_pair(&mut self, a: Point2D, b: Point2D) {
        let edge = Edge::new(a, b);
        self.cost_pairs.push(CostPair {
            cost: edge.length(),
            edge,
        });
    }

    /// Offer the three sides of a triangle. Shared sides are not deduplicated.
    pub fn add_triangle(&mut self, a: Point2D, b: Point2D, c: Point2D) {
        self.add_pair(a, b);
        self.add_pair(b, c);
        self.add_pair(c, a);
    }

    pub fn cost_pairs(&self) -> &[CostPair] {
        &self.cost_pairs
    }

    /// Total cost of the tree edges accepted by the last pass
    pub fn cost(&self) -> f32 {
        self.total_cost
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Tree edges in the last result, excluding reintroduced cycle edges
    pub fn tree_edge_count(&self) -> usize {
        self.tree_edges
    }

    /// Tree edges only.
    pub fn min_cost_pairs(&mut self) -> Vec<Edge> {
        self.run(|_| false)
    }

    /// Tree edges plus each rejected cycle edge kept with probability `chance`,
    /// which must be within [0, 1].
    ///
    /// The tree part is identical to [`Self::min_cost_pairs`] for the same
    /// edges, so the result is always a superset of it.
    pub fn natural_cost_pairs(&mut self, rng: &mut impl Rng, chance: f64) -> Vec<Edge> {
        self.run(|_| rng.gen_bool(chance))
    }

    fn run(&mut self, mut keep_cycle_edge: impl FnMut(&CostPair) -> bool) -> Vec<Edge> {
        puffin::profile_function!();

        self.size = self.cost_pairs.len();
        self.total_cost = 0.0;
        self.tree_edges = 0;
        self.fill_root_map();

        let mut pairs = self.cost_pairs.clone();
        if self.order == EdgeOrder::AscendingCost {
            pairs.sort_by(|x, y| x.cost.total_cmp(&y.cost));
        }

        let mut result = Vec::new();
        for pair in &pairs {
            let Edge { a, b } = pair.edge;
            if self.find(a) != self.find(b) {
                self.total_cost += pair.cost;
                self.tree_edges += 1;
                result.push(pair.edge);
                self.union(a, b);
            } else if keep_cycle_edge(pair) {
                result.push(pair.edge);
            }
        }
        result
    }

    /// Root of `point`'s set. Each visited node is re-pointed at its
    /// grandparent, so chains flatten over repeated lookups. Unknown points
    /// become their own root.
    pub fn find(&mut self, point: Point2D) -> Point2D {
        let mut node = point;
        loop {
            let parent = *self.roots.entry(node).or_insert(node);
            if parent == node {
                return node;
            }
            let grandparent = self.roots.get(&parent).copied().unwrap_or(parent);
            self.roots.insert(node, grandparent);
            node = grandparent;
        }
    }

    /// Merge the sets of `a` and `b` by hanging `a`'s root under `b`'s.
    pub fn union(&mut self, a: Point2D, b: Point2D) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        let target = self.roots.get(&root_b).copied().unwrap_or(root_b);
        self.roots.insert(root_a, target);
    }

    /// Every endpoint becomes its own root.
    fn fill_root_map(&mut self) {
        self.roots.clear();
        for pair in &self.cost_pairs {
            self.roots.insert(pair.edge.a, pair.edge.a);
            self.roots.insert(pair.edge.b, pair.edge.b);
        }
    }

    /// Forget every edge, the forest and the cost total.
    pub fn reset(&mut self) {
        self.cost_pairs.clear();
        self.roots.clear();
        self.total_cost = 0.0;
        self.size = 0;
        self.tree_edges = 0;
    }
}
