//! Network orchestration: population, generated graph, and sampling entry
//! points.
//!
//! [`SocialMediaNetwork`] owns the categorised nodes and, once
//! [`SocialMediaNetwork::generate`] has run, the frozen [`SocialGraph`].
//! Walks borrow the graph read-only.

use rand::Rng;
use tracing::instrument;

use crate::{
    Result,
    attributes::{Node, assign_categories, census, validate_population},
    category::{Category, CategoryCounts},
    degree::ConnectionProfile,
    error::NetworkError,
    generate::generate_graph,
    graph::SocialGraph,
    walk::{
        WalkConfig,
        metropolis::{
            MetropolisHastings, MetropolisHastingsReport, TransitionRule, metropolis_hastings_walk,
        },
        simple::{RandomWalkReport, random_walk},
    },
};

const DEFAULT_MALE_RATIO: f64 = 0.4;

/// Configures and constructs [`SocialMediaNetwork`] instances.
///
/// # Examples
/// ```
/// use socialwalk_core::NetworkBuilder;
///
/// let network = NetworkBuilder::new()
///     .with_node_count(1_000)
///     .with_male_ratio(0.3)
///     .build()?;
/// assert_eq!(network.census().get(socialwalk_core::Category::Male), 300);
/// # Ok::<(), socialwalk_core::NetworkError>(())
/// ```
#[derive(Clone, Debug)]
pub struct NetworkBuilder {
    node_count: usize,
    male_ratio: f64,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self {
            node_count: 0,
            male_ratio: DEFAULT_MALE_RATIO,
        }
    }
}

impl NetworkBuilder {
    /// Creates a builder with no nodes and a male ratio of 0.4.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total number of nodes.
    #[must_use]
    pub const fn with_node_count(mut self, node_count: usize) -> Self {
        self.node_count = node_count;
        self
    }

    /// Sets the fraction of nodes that are male.
    #[must_use]
    pub const fn with_male_ratio(mut self, male_ratio: f64) -> Self {
        self.male_ratio = male_ratio;
        self
    }

    /// Returns the configured node count.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns the configured male ratio.
    #[must_use]
    pub const fn male_ratio(&self) -> f64 {
        self.male_ratio
    }

    /// Validates the configuration and assigns categories.
    ///
    /// # Errors
    /// Returns [`NetworkError::InvalidConfiguration`] for a zero node count
    /// or a ratio outside `(0, 1)`.
    pub fn build(self) -> Result<SocialMediaNetwork> {
        validate_population(self.node_count, self.male_ratio)?;
        Ok(SocialMediaNetwork {
            male_ratio: self.male_ratio,
            nodes: assign_categories(self.node_count, self.male_ratio)?,
            graph: None,
        })
    }
}

/// A synthetic two-category social network.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use socialwalk_core::{ConnectionProfile, SocialMediaNetwork, WalkConfig};
///
/// let mut network = SocialMediaNetwork::new(200, 0.3)?;
/// let mut rng = SmallRng::seed_from_u64(42);
/// let profile = ConnectionProfile::from_pairs((20.0, 6.0), (6.0, 4.0), (4.0, 2.0), (10.0, 3.0))?;
/// network.generate(&profile, &mut rng)?;
///
/// let report = network.random_walk(&WalkConfig::new(200), &mut rng)?;
/// assert_eq!(report.counts().total(), report.steps_taken());
///
/// let mh = network.metropolis_hastings_walk(&WalkConfig::new(200), &mut rng)?;
/// assert!(mh.probability() <= 1.0);
/// # Ok::<(), socialwalk_core::NetworkError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SocialMediaNetwork {
    male_ratio: f64,
    nodes: Vec<Node>,
    graph: Option<SocialGraph>,
}

impl SocialMediaNetwork {
    /// Shorthand for [`NetworkBuilder`] with explicit node count and ratio.
    ///
    /// # Errors
    /// See [`NetworkBuilder::build`].
    pub fn new(node_count: usize, male_ratio: f64) -> Result<Self> {
        NetworkBuilder::new()
            .with_node_count(node_count)
            .with_male_ratio(male_ratio)
            .build()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Configured male ratio.
    #[must_use]
    pub const fn male_ratio(&self) -> f64 {
        self.male_ratio
    }

    /// Nodes ordered by id.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The generated graph, if [`Self::generate`] has run.
    #[must_use]
    pub const fn graph(&self) -> Option<&SocialGraph> {
        self.graph.as_ref()
    }

    /// Number of nodes in each category.
    #[must_use]
    pub fn census(&self) -> CategoryCounts {
        census(&self.nodes)
    }

    /// The category with fewer nodes; ties resolve to [`Category::Female`].
    #[must_use]
    pub fn minority(&self) -> Category {
        self.census().minority()
    }

    /// Wires the network from scratch, replacing any earlier graph.
    ///
    /// # Errors
    /// Returns [`NetworkError::InvalidConfiguration`] when `profile` holds an
    /// invalid distribution.
    #[instrument(
        name = "core.generate",
        skip(self, profile, rng),
        fields(nodes = self.nodes.len(), male_ratio = self.male_ratio),
    )]
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        profile: &ConnectionProfile,
        rng: &mut R,
    ) -> Result<(&[Node], &SocialGraph)> {
        let graph = generate_graph(&self.nodes, profile, rng)?;
        let graph = self.graph.insert(graph);
        Ok((self.nodes.as_slice(), &*graph))
    }

    /// Runs [`random_walk`] over the generated graph.
    ///
    /// # Errors
    /// Returns [`NetworkError::NetworkNotGenerated`] before
    /// [`Self::generate`], otherwise the errors of [`random_walk`].
    pub fn random_walk<R: Rng + ?Sized>(
        &self,
        config: &WalkConfig,
        rng: &mut R,
    ) -> Result<RandomWalkReport> {
        random_walk(self.require_graph()?, &self.nodes, config, rng)
    }

    /// Runs a Metropolis-Hastings walk with the default degree-ratio rule.
    ///
    /// # Errors
    /// See [`Self::metropolis_hastings_walk_with`].
    pub fn metropolis_hastings_walk<R: Rng + ?Sized>(
        &self,
        config: &WalkConfig,
        rng: &mut R,
    ) -> Result<MetropolisHastingsReport> {
        self.metropolis_hastings_walk_with(config, &MetropolisHastings, rng)
    }

    /// Runs a Metropolis-Hastings walk with a caller-supplied acceptance
    /// rule.
    ///
    /// # Errors
    /// Returns [`NetworkError::NetworkNotGenerated`] before
    /// [`Self::generate`], otherwise the errors of
    /// [`metropolis_hastings_walk`].
    pub fn metropolis_hastings_walk_with<T, R>(
        &self,
        config: &WalkConfig,
        rule: &T,
        rng: &mut R,
    ) -> Result<MetropolisHastingsReport>
    where
        T: TransitionRule + ?Sized,
        R: Rng + ?Sized,
    {
        metropolis_hastings_walk(self.require_graph()?, &self.nodes, config, rule, rng)
    }

    fn require_graph(&self) -> Result<&SocialGraph> {
        self.graph.as_ref().ok_or(NetworkError::NetworkNotGenerated)
    }
}
