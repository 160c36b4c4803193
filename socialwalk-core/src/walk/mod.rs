//! Random-walk samplers over a frozen [`SocialGraph`].
//!
//! Both samplers share [`WalkConfig`] and the dead-end handling implemented
//! by the internal `Walker` cursor. A dead end is a node without neighbours;
//! since every move follows an edge it can only be met at the start node.

pub mod metropolis;
pub mod simple;

use std::ops::ControlFlow;

use rand::{Rng, seq::SliceRandom};
use tracing::{debug, warn};

use crate::{
    Result,
    attributes::{Node, census},
    category::Category,
    error::NetworkError,
    graph::SocialGraph,
};

/// What a walk does when the current node has no neighbours.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DeadEndPolicy {
    /// Stop and return the steps taken so far as a partial report. A walk
    /// that has not taken a single step fails with
    /// [`NetworkError::DegenerateWalk`].
    #[default]
    Terminate,
    /// Jump to a uniformly random node that has at least one neighbour. The
    /// jump is not counted as a step. Fails with
    /// [`NetworkError::DegenerateWalk`] when the graph has no edges.
    Restart,
}

/// Parameters shared by both walkers.
///
/// # Examples
/// ```
/// use socialwalk_core::{Category, DeadEndPolicy, WalkConfig};
///
/// let config = WalkConfig::new(200)
///     .with_start_node(3)
///     .with_dead_end(DeadEndPolicy::Restart)
///     .with_focus(Category::Female);
/// assert_eq!(config.steps(), 200);
/// assert_eq!(config.start_node(), Some(3));
/// assert_eq!(config.dead_end(), DeadEndPolicy::Restart);
/// assert_eq!(config.focus(), Some(Category::Female));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WalkConfig {
    steps: usize,
    start_node: Option<usize>,
    dead_end: DeadEndPolicy,
    focus: Option<Category>,
}

impl WalkConfig {
    /// Creates a configuration for `steps` transitions from a random start
    /// node, terminating at dead ends and focusing on the minority category.
    #[must_use]
    pub const fn new(steps: usize) -> Self {
        Self {
            steps,
            start_node: None,
            dead_end: DeadEndPolicy::Terminate,
            focus: None,
        }
    }

    /// Starts the walk at `node` instead of a uniformly random node.
    #[must_use]
    pub const fn with_start_node(mut self, node: usize) -> Self {
        self.start_node = Some(node);
        self
    }

    /// Selects the dead-end policy.
    #[must_use]
    pub const fn with_dead_end(mut self, policy: DeadEndPolicy) -> Self {
        self.dead_end = policy;
        self
    }

    /// Reports probabilities for `category` instead of the minority category.
    #[must_use]
    pub const fn with_focus(mut self, category: Category) -> Self {
        self.focus = Some(category);
        self
    }

    /// Requested number of transitions.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Explicit start node, if any.
    #[must_use]
    pub const fn start_node(&self) -> Option<usize> {
        self.start_node
    }

    /// Configured dead-end policy.
    #[must_use]
    pub const fn dead_end(&self) -> DeadEndPolicy {
        self.dead_end
    }

    /// Explicit focus category, if any.
    #[must_use]
    pub const fn focus(&self) -> Option<Category> {
        self.focus
    }

    pub(crate) fn resolve_focus(&self, nodes: &[Node]) -> Category {
        self.focus.unwrap_or_else(|| census(nodes).minority())
    }
}

/// Cursor shared by the walkers: position, progress, and dead-end handling.
pub(crate) struct Walker<'a> {
    graph: &'a SocialGraph,
    nodes: &'a [Node],
    policy: DeadEndPolicy,
    current: usize,
    steps_taken: usize,
    restarts: usize,
    restart_pool: Option<Vec<usize>>,
}

impl<'a> Walker<'a> {
    pub(crate) fn start<R: Rng + ?Sized>(
        graph: &'a SocialGraph,
        nodes: &'a [Node],
        config: &WalkConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if config.steps == 0 {
            return Err(NetworkError::invalid_configuration(
                "steps must be greater than zero",
            ));
        }
        let node_count = graph.node_count();
        if node_count == 0 {
            return Err(NetworkError::invalid_configuration("the graph has no nodes"));
        }
        if nodes.len() != node_count {
            return Err(NetworkError::invalid_configuration(format!(
                "{} categorised nodes supplied for a graph of {node_count} nodes",
                nodes.len()
            )));
        }
        let current = match config.start_node {
            Some(node) if graph.contains(node) => node,
            Some(node) => return Err(NetworkError::InvalidStartNode { node, node_count }),
            None => rng.gen_range(0..node_count),
        };
        Ok(Self {
            graph,
            nodes,
            policy: config.dead_end,
            current,
            steps_taken: 0,
            restarts: 0,
            restart_pool: None,
        })
    }

    pub(crate) const fn current(&self) -> usize {
        self.current
    }

    pub(crate) const fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub(crate) const fn restarts(&self) -> usize {
        self.restarts
    }

    pub(crate) fn category(&self, node: usize) -> Result<Category> {
        self.nodes
            .get(node)
            .map(|entry| entry.category)
            .ok_or_else(|| {
                NetworkError::invalid_configuration(format!("node {node} has no category"))
            })
    }

    /// Moves to `next` (possibly the current node) and counts one step.
    pub(crate) fn advance(&mut self, next: usize) {
        self.current = next;
        self.steps_taken += 1;
        #[cfg(feature = "metrics")]
        metrics::counter!("walk_steps_total").increment(1);
    }

    /// Applies the dead-end policy at the current node.
    ///
    /// `Continue` means the walk was relocated and may proceed; `Break` means
    /// it should stop with a partial result.
    pub(crate) fn escape_dead_end<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<ControlFlow<()>> {
        let stalled = self.current;
        match self.policy {
            DeadEndPolicy::Terminate if self.steps_taken == 0 => Err(NetworkError::DegenerateWalk {
                node: stalled,
                steps_taken: 0,
            }),
            DeadEndPolicy::Terminate => {
                warn!(
                    node = stalled,
                    steps_taken = self.steps_taken,
                    "walk reached an isolated node, returning partial result"
                );
                Ok(ControlFlow::Break(()))
            }
            DeadEndPolicy::Restart => {
                let graph = self.graph;
                let pool = self
                    .restart_pool
                    .get_or_insert_with(|| graph.connected_nodes());
                let Some(&next) = pool.choose(rng) else {
                    return Err(NetworkError::DegenerateWalk {
                        node: stalled,
                        steps_taken: self.steps_taken,
                    });
                };
                debug!(from = stalled, to = next, "restarting walk from a connected node");
                self.current = next;
                self.restarts += 1;
                #[cfg(feature = "metrics")]
                metrics::counter!("walk_restarts_total").increment(1);
                Ok(ControlFlow::Continue(()))
            }
        }
    }
}
