//! Undirected adjacency structures.
//!
//! [`GraphBuilder`] is the mutable arena used while wiring the network; it
//! inserts every edge in both directions within one call so the reciprocity
//! invariant holds at every point of construction. [`GraphBuilder::freeze`]
//! hands back an immutable [`SocialGraph`] that the walkers share.

use std::collections::HashSet;

use crate::error::GraphInvariantViolation;

/// Mutable adjacency list used during construction.
#[derive(Clone, Debug)]
pub struct GraphBuilder {
    adjacency: Vec<Vec<usize>>,
}

impl GraphBuilder {
    /// Creates a builder with `node_count` isolated nodes.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
        }
    }

    /// Returns whether `left` and `right` are already connected.
    #[must_use]
    pub fn is_connected(&self, left: usize, right: usize) -> bool {
        self.adjacency
            .get(left)
            .is_some_and(|neighbours| neighbours.contains(&right))
    }

    /// Inserts the undirected edge `{left, right}`.
    ///
    /// Appends `right` to `left`'s list and `left` to `right`'s list. Returns
    /// `false` without modifying anything for self-loops, existing edges, and
    /// ids outside the graph.
    ///
    /// # Examples
    /// ```
    /// use socialwalk_core::GraphBuilder;
    ///
    /// let mut builder = GraphBuilder::new(3);
    /// assert!(builder.connect(0, 2));
    /// assert!(!builder.connect(2, 0));
    /// assert!(!builder.connect(1, 1));
    /// let graph = builder.freeze();
    /// assert_eq!(graph.neighbors(2), [0]);
    /// assert_eq!(graph.edge_count(), 1);
    /// ```
    pub fn connect(&mut self, left: usize, right: usize) -> bool {
        let node_count = self.adjacency.len();
        if left == right || left >= node_count || right >= node_count {
            return false;
        }
        if self.is_connected(left, right) {
            return false;
        }
        if let Some(neighbours) = self.adjacency.get_mut(left) {
            neighbours.push(right);
        }
        if let Some(neighbours) = self.adjacency.get_mut(right) {
            neighbours.push(left);
        }
        true
    }

    /// Current neighbour list of `node`; empty for unknown ids.
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.adjacency.get(node).map_or(&[], Vec::as_slice)
    }

    /// Finishes construction.
    #[must_use]
    pub fn freeze(self) -> SocialGraph {
        SocialGraph::from_parts(self.adjacency)
    }
}

/// Immutable undirected graph shared by the walkers.
///
/// Neighbour lists keep discovery order.
///
/// # Examples
/// ```
/// use socialwalk_core::SocialGraph;
///
/// let graph = SocialGraph::from_adjacency(vec![vec![1], vec![0, 2], vec![1], vec![]])?;
/// assert_eq!(graph.degree(1), 2);
/// assert!(graph.is_isolated(3));
/// assert!(graph.has_edge(2, 1));
/// # Ok::<(), socialwalk_core::GraphInvariantViolation>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SocialGraph {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl SocialGraph {
    fn from_parts(adjacency: Vec<Vec<usize>>) -> Self {
        let endpoints: usize = adjacency.iter().map(Vec::len).sum();
        Self {
            adjacency,
            edge_count: endpoints / 2,
        }
    }

    /// Builds a graph from a hand-written adjacency list after validating it.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] found.
    pub fn from_adjacency(adjacency: Vec<Vec<usize>>) -> Result<Self, GraphInvariantViolation> {
        let graph = Self::from_parts(adjacency);
        graph.check_invariants()?;
        Ok(graph)
    }

    /// Builds the complete graph on `node_count` nodes.
    ///
    /// # Examples
    /// ```
    /// use socialwalk_core::SocialGraph;
    ///
    /// let graph = SocialGraph::complete(4);
    /// assert_eq!(graph.edge_count(), 6);
    /// assert_eq!(graph.neighbors(2), [0, 1, 3]);
    /// ```
    #[must_use]
    pub fn complete(node_count: usize) -> Self {
        let mut builder = GraphBuilder::new(node_count);
        for left in 0..node_count {
            for right in (left + 1)..node_count {
                builder.connect(left, right);
            }
        }
        builder.freeze()
    }

    /// Number of nodes, including isolated ones.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns whether `node` names a node of this graph.
    #[must_use]
    pub fn contains(&self, node: usize) -> bool {
        node < self.adjacency.len()
    }

    /// Neighbours of `node` in discovery order; empty for unknown ids.
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.adjacency.get(node).map_or(&[], Vec::as_slice)
    }

    /// Realised degree of `node`.
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }

    /// Returns whether `node` has no neighbours.
    #[must_use]
    pub fn is_isolated(&self, node: usize) -> bool {
        self.neighbors(node).is_empty()
    }

    /// Returns whether the undirected edge `{left, right}` exists.
    #[must_use]
    pub fn has_edge(&self, left: usize, right: usize) -> bool {
        self.neighbors(left).contains(&right)
    }

    /// Ids of nodes with at least one neighbour, in ascending order.
    #[must_use]
    pub fn connected_nodes(&self) -> Vec<usize> {
        (0..self.node_count())
            .filter(|&node| !self.is_isolated(node))
            .collect()
    }

    /// Iterates every undirected edge once as `(low, high)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(node, neighbours)| {
            neighbours
                .iter()
                .filter(move |&&neighbour| node < neighbour)
                .map(move |&neighbour| (node, neighbour))
        })
    }

    /// Verifies that every edge is reciprocated, that no node lists itself,
    /// that no neighbour repeats, and that every id is in range.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] encountered in node id
    /// order.
    pub fn check_invariants(&self) -> Result<(), GraphInvariantViolation> {
        let node_count = self.node_count();
        for (node, neighbours) in self.adjacency.iter().enumerate() {
            let mut seen = HashSet::with_capacity(neighbours.len());
            for &neighbour in neighbours {
                if neighbour >= node_count {
                    return Err(GraphInvariantViolation::NeighborOutOfRange {
                        node,
                        neighbor: neighbour,
                        node_count,
                    });
                }
                if neighbour == node {
                    return Err(GraphInvariantViolation::SelfLoop { node });
                }
                if !seen.insert(neighbour) {
                    return Err(GraphInvariantViolation::DuplicateNeighbor {
                        node,
                        neighbor: neighbour,
                    });
                }
                if !self.has_edge(neighbour, node) {
                    return Err(GraphInvariantViolation::OneWayEdge {
                        from: node,
                        to: neighbour,
                    });
                }
            }
        }
        Ok(())
    }
}
