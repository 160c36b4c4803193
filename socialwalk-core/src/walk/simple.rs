//! Simple random walk with inverse-degree reweighting.
//!
//! A simple random walk visits nodes in proportion to their degree. Weighting
//! every visit by `1 / degree` and renormalising removes that bias, giving an
//! estimate of the focus category's share of the node population.

use std::ops::ControlFlow;

use rand::{Rng, seq::SliceRandom};
use tracing::{info, instrument};

use crate::{
    Result,
    attributes::Node,
    category::{Category, CategoryCounts},
    graph::SocialGraph,
};

use super::{WalkConfig, Walker};

/// Outcome of [`random_walk`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomWalkReport {
    counts: CategoryCounts,
    steps_requested: usize,
    steps_taken: usize,
    restarts: usize,
    focus: Category,
    observed_probability: f64,
    unbiased_probability: f64,
}

impl RandomWalkReport {
    /// Categories of the nodes arrived at, one per step.
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

    /// Category the probabilities refer to.
    #[must_use]
    pub const fn focus(&self) -> Category {
        self.focus
    }

    /// Raw share of steps that landed on the focus category.
    #[must_use]
    pub const fn observed_probability(&self) -> f64 {
        self.observed_probability
    }

    /// Inverse-degree weighted share of the focus category.
    #[must_use]
    pub const fn unbiased_probability(&self) -> f64 {
        self.unbiased_probability
    }
}

/// Walks `config.steps()` transitions, each to a uniformly random neighbour
/// of the current node, recording the category of every node arrived at.
///
/// `nodes` supplies the category of each graph node and must be indexed by
/// node id.
///
/// # Errors
/// Returns [`crate::NetworkError::InvalidConfiguration`] for zero steps or
/// mismatched inputs, [`crate::NetworkError::InvalidStartNode`] for an
/// unknown start node, and [`crate::NetworkError::DegenerateWalk`] when the
/// dead-end policy cannot make progress.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use socialwalk_core::{Category, SocialGraph, WalkConfig, assign_categories, random_walk};
///
/// let nodes = assign_categories(6, 0.5)?;
/// let graph = SocialGraph::complete(6);
/// let mut rng = SmallRng::seed_from_u64(1);
/// let report = random_walk(&graph, &nodes, &WalkConfig::new(50), &mut rng)?;
/// assert_eq!(report.counts().total(), 50);
/// assert_eq!(report.focus(), Category::Female);
/// # Ok::<(), socialwalk_core::NetworkError>(())
/// ```
#[instrument(
    name = "core.random_walk",
    err,
    skip(graph, nodes, rng),
    fields(
        steps = config.steps(),
        start_node = ?config.start_node(),
        dead_end = ?config.dead_end(),
    ),
)]
pub fn random_walk<R: Rng + ?Sized>(
    graph: &SocialGraph,
    nodes: &[Node],
    config: &WalkConfig,
    rng: &mut R,
) -> Result<RandomWalkReport> {
    let mut walker = Walker::start(graph, nodes, config, rng)?;
    let focus = config.resolve_focus(nodes);
    let mut counts = CategoryCounts::default();
    let mut weights = InverseDegreeWeights::default();

    while walker.steps_taken() < config.steps() {
        let Some(&next) = graph.neighbors(walker.current()).choose(rng) else {
            match walker.escape_dead_end(rng)? {
                ControlFlow::Continue(()) => continue,
                ControlFlow::Break(()) => break,
            }
        };
        walker.advance(next);
        let category = walker.category(next)?;
        counts.record(category);
        weights.record(graph.degree(next), category == focus);
    }

    let report = RandomWalkReport {
        counts,
        steps_requested: config.steps(),
        steps_taken: walker.steps_taken(),
        restarts: walker.restarts(),
        focus,
        observed_probability: counts.fraction(focus).unwrap_or(0.0),
        unbiased_probability: weights.share(),
    };
    info!(
        steps_taken = report.steps_taken,
        observed = report.observed_probability,
        unbiased = report.unbiased_probability,
        "random walk completed"
    );
    Ok(report)
}

#[derive(Default)]
struct InverseDegreeWeights {
    focus: f64,
    total: f64,
}

impl InverseDegreeWeights {
    #[expect(
        clippy::cast_precision_loss,
        reason = "degrees are far below 2^52"
    )]
    #[expect(clippy::float_arithmetic, reason = "inverse-degree weights are fractional")]
    fn record(&mut self, degree: usize, is_focus: bool) {
        if degree == 0 {
            return;
        }
        let weight = (degree as f64).recip();
        self.total += weight;
        if is_focus {
            self.focus += weight;
        }
    }

    #[expect(clippy::float_arithmetic, reason = "normalising the weighted share")]
    fn share(&self) -> f64 {
        if self.total > 0.0 {
            self.focus / self.total
        } else {
            0.0
        }
    }
}
