//! Metropolis-Hastings random walk.
//!
//! From node `u` a neighbour `v` is proposed with probability `1 / deg(u)`
//! and accepted with the probability returned by a [`TransitionRule`];
//! otherwise the walk stays at `u`. With the default [`MetropolisHastings`]
//! rule, `min(1, deg(u) / deg(v))`, the chain satisfies detailed balance for
//! the uniform distribution over connected nodes, so visit frequencies
//! estimate population shares directly.
//!
//! Each step materialises the full [`TransitionTable`] for the current node
//! and samples from it, which is equivalent to propose-then-accept.

use std::ops::ControlFlow;

use rand::Rng;
use tracing::{info, instrument};

use crate::{
    Result,
    attributes::Node,
    category::{Category, CategoryCounts},
    error::NetworkError,
    graph::SocialGraph,
};

use super::{WalkConfig, Walker};

/// Acceptance probability for moving from `current` to the proposed
/// neighbour `candidate`.
///
/// Implemented for any `Fn(usize, usize, &SocialGraph) -> f64`, so closures
/// can be used as ad-hoc exploration policies. Returned values must lie in
/// `[0, 1]`.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use socialwalk_core::{SocialGraph, WalkConfig, assign_categories, metropolis_hastings_walk};
///
/// // Accept every proposal: a plain simple random walk.
/// let always = |_current: usize, _candidate: usize, _graph: &SocialGraph| 1.0;
/// let nodes = assign_categories(4, 0.5)?;
/// let graph = SocialGraph::complete(4);
/// let mut rng = SmallRng::seed_from_u64(3);
/// let report = metropolis_hastings_walk(&graph, &nodes, &WalkConfig::new(20), &always, &mut rng)?;
/// assert_eq!(report.accepted_moves(), 20);
/// # Ok::<(), socialwalk_core::NetworkError>(())
/// ```
pub trait TransitionRule {
    /// Probability of accepting the move `current -> candidate`.
    fn acceptance(&self, current: usize, candidate: usize, graph: &SocialGraph) -> f64;
}

impl<F> TransitionRule for F
where
    F: Fn(usize, usize, &SocialGraph) -> f64,
{
    fn acceptance(&self, current: usize, candidate: usize, graph: &SocialGraph) -> f64 {
        self(current, candidate, graph)
    }
}

/// The degree-ratio acceptance rule `min(1, deg(current) / deg(candidate))`.
///
/// # Examples
/// ```
/// use socialwalk_core::{MetropolisHastings, SocialGraph, TransitionRule};
///
/// let graph = SocialGraph::from_adjacency(vec![vec![1, 2], vec![0], vec![0]])?;
/// assert_eq!(MetropolisHastings.acceptance(0, 1, &graph), 1.0);
/// assert_eq!(MetropolisHastings.acceptance(1, 0, &graph), 0.5);
/// # Ok::<(), socialwalk_core::GraphInvariantViolation>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MetropolisHastings;

impl TransitionRule for MetropolisHastings {
    #[expect(clippy::cast_precision_loss, reason = "degrees are far below 2^52")]
    #[expect(clippy::float_arithmetic, reason = "degree ratio is fractional")]
    fn acceptance(&self, current: usize, candidate: usize, graph: &SocialGraph) -> f64 {
        let candidate_degree = graph.degree(candidate);
        if candidate_degree == 0 {
            return 0.0;
        }
        (graph.degree(current) as f64 / candidate_degree as f64).min(1.0)
    }
}

/// Transition probabilities out of one node: one entry per neighbour plus
/// the probability of staying put.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionTable {
    node: usize,
    entries: Vec<(usize, f64)>,
    stay: f64,
}

impl TransitionTable {
    /// Node the table describes.
    #[must_use]
    pub const fn node(&self) -> usize {
        self.node
    }

    /// `(neighbour, probability)` pairs in neighbour order.
    #[must_use]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Probability of remaining at [`Self::node`].
    #[must_use]
    pub const fn stay_probability(&self) -> f64 {
        self.stay
    }

    /// Probability of the next state being `target`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "summing probabilities")]
    pub fn probability_of(&self, target: usize) -> f64 {
        let moving: f64 = self
            .entries
            .iter()
            .filter(|(neighbour, _)| *neighbour == target)
            .map(|(_, probability)| probability)
            .sum();
        if target == self.node {
            moving + self.stay
        } else {
            moving
        }
    }

    /// Total probability mass; one up to rounding.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "summing probabilities")]
    pub fn total(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, probability)| probability)
            .sum::<f64>()
            + self.stay
    }

    /// Draws the next state.
    #[expect(clippy::float_arithmetic, reason = "inverse-CDF sampling")]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let draw = rng.gen_range(0.0_f64..1.0_f64);
        let mut cumulative = 0.0_f64;
        for &(neighbour, probability) in &self.entries {
            cumulative += probability;
            if draw < cumulative {
                return neighbour;
            }
        }
        // Rounding can leave the cumulative sum a hair below one.
        if self.stay > 0.0 {
            self.node
        } else {
            self.entries
                .last()
                .map_or(self.node, |&(neighbour, _)| neighbour)
        }
    }
}

/// Computes the transition table out of `node` under `rule`.
///
/// Each neighbour `v` receives `rule.acceptance(node, v) / deg(node)` and the
/// remainder, floored at zero, is the stay probability. An isolated node
/// yields an empty table with stay probability one.
///
/// # Errors
/// Returns [`NetworkError::InvalidTransitionProbability`] when the rule
/// produces a non-finite value or one outside `[0, 1]`.
///
/// # Examples
/// ```
/// use socialwalk_core::{MetropolisHastings, SocialGraph, transition_table};
///
/// let graph = SocialGraph::from_adjacency(vec![vec![1, 2], vec![0], vec![0]])?;
/// let leaf = transition_table(&graph, 1, &MetropolisHastings)?;
/// assert_eq!(leaf.entries(), [(0, 0.5)]);
/// assert_eq!(leaf.stay_probability(), 0.5);
/// # Ok::<(), socialwalk_core::NetworkError>(())
/// ```
#[expect(clippy::cast_precision_loss, reason = "degrees are far below 2^52")]
#[expect(clippy::float_arithmetic, reason = "probabilities are fractional")]
pub fn transition_table<T: TransitionRule + ?Sized>(
    graph: &SocialGraph,
    node: usize,
    rule: &T,
) -> Result<TransitionTable> {
    let neighbours = graph.neighbors(node);
    let proposal = if neighbours.is_empty() {
        0.0
    } else {
        (neighbours.len() as f64).recip()
    };
    let mut entries = Vec::with_capacity(neighbours.len());
    for &candidate in neighbours {
        let value = rule.acceptance(node, candidate, graph);
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(NetworkError::InvalidTransitionProbability {
                current: node,
                candidate,
                value,
            });
        }
        entries.push((candidate, proposal * value));
    }
    let moving: f64 = entries.iter().map(|(_, probability)| probability).sum();
    Ok(TransitionTable {
        node,
        entries,
        stay: (1.0 - moving).max(0.0),
    })
}

/// Outcome of [`metropolis_hastings_walk`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetropolisHastingsReport {
    counts: CategoryCounts,
    steps_requested: usize,
    steps_taken: usize,
    restarts: usize,
    accepted_moves: usize,
    focus: Category,
}

impl MetropolisHastingsReport {
    /// Categories of the node occupied after each step; a rejected proposal
    /// counts the current node again.
    #[must_use]
    pub const fn counts(&self) -> CategoryCounts {
        self.counts
    }

    /// Number of steps the caller asked for.
    #[must_use]
    pub const fn steps_requested(&self) -> usize {
        self.steps_requested
    }

    /// Number of steps actually taken.
    #[must_use]
    pub const fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Returns whether the walk stopped before `steps_requested`.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.steps_taken < self.steps_requested
    }

    /// Number of dead-end restarts performed.
    #[must_use]
    pub const fn restarts(&self) -> usize {
        self.restarts
    }

    /// Steps that moved to a different node.
    #[must_use]
    pub const fn accepted_moves(&self) -> usize {
        self.accepted_moves
    }

    /// Category the probability refers to.
    #[must_use]
    pub const fn focus(&self) -> Category {
        self.focus
    }

    /// Share of steps spent on the focus category.
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.counts.fraction(self.focus).unwrap_or(0.0)
    }

    /// Share of steps that moved.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "step counts are far below 2^52")]
    #[expect(clippy::float_arithmetic, reason = "rates are fractional")]
    pub fn acceptance_rate(&self) -> f64 {
        if self.steps_taken == 0 {
            return 0.0;
        }
        self.accepted_moves as f64 / self.steps_taken as f64
    }
}

/// Runs a Metropolis-Hastings walk of `config.steps()` transitions using
/// `rule` as the acceptance policy.
///
/// # Errors
/// Returns the same errors as [`crate::random_walk`], plus
/// [`NetworkError::InvalidTransitionProbability`] when `rule` misbehaves.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use socialwalk_core::{
///     MetropolisHastings, SocialGraph, WalkConfig, assign_categories, metropolis_hastings_walk,
/// };
///
/// let nodes = assign_categories(5, 0.4)?;
/// let graph = SocialGraph::complete(5);
/// let mut rng = SmallRng::seed_from_u64(11);
/// let report = metropolis_hastings_walk(
///     &graph,
///     &nodes,
///     &WalkConfig::new(40),
///     &MetropolisHastings,
///     &mut rng,
/// )?;
/// // Equal degrees: every proposal is accepted.
/// assert_eq!(report.acceptance_rate(), 1.0);
/// # Ok::<(), socialwalk_core::NetworkError>(())
/// ```
#[instrument(
    name = "core.metropolis_hastings_walk",
    err,
    skip(graph, nodes, rule, rng),
    fields(
        steps = config.steps(),
        start_node = ?config.start_node(),
        dead_end = ?config.dead_end(),
    ),
)]
pub fn metropolis_hastings_walk<T, R>(
    graph: &SocialGraph,
    nodes: &[Node],
    config: &WalkConfig,
    rule: &T,
    rng: &mut R,
) -> Result<MetropolisHastingsReport>
where
    T: TransitionRule + ?Sized,
    R: Rng + ?Sized,
{
    let mut walker = Walker::start(graph, nodes, config, rng)?;
    let focus = config.resolve_focus(nodes);
    let mut counts = CategoryCounts::default();
    let mut accepted_moves = 0_usize;

    while walker.steps_taken() < config.steps() {
        let current = walker.current();
        if graph.is_isolated(current) {
            match walker.escape_dead_end(rng)? {
                ControlFlow::Continue(()) => continue,
                ControlFlow::Break(()) => break,
            }
        }
        let table = transition_table(graph, current, rule)?;
        let next = table.sample(rng);
        if next == current {
            #[cfg(feature = "metrics")]
            metrics::counter!("mh_rejected_proposals_total").increment(1);
        } else {
            accepted_moves += 1;
        }
        walker.advance(next);
        counts.record(walker.category(next)?);
    }

    let report = MetropolisHastingsReport {
        counts,
        steps_requested: config.steps(),
        steps_taken: walker.steps_taken(),
        restarts: walker.restarts(),
        accepted_moves,
        focus,
    };
    info!(
        steps_taken = report.steps_taken,
        probability = report.probability(),
        acceptance_rate = report.acceptance_rate(),
        "metropolis-hastings walk completed"
    );
    Ok(report)
}
