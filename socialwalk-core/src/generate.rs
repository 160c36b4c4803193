//! Stochastic wiring of a node population into a [`SocialGraph`].
//!
//! Nodes are visited in id order. Each node draws one target per partner
//! category from the [`ConnectionProfile`] and is then connected to that many
//! distinct, randomly chosen eligible partners. A partner is eligible when it
//! has the requested category, is not the node itself, and is not yet
//! connected to it. The target only counts edges the node initiates; edges
//! created earlier by other nodes do not consume it. When fewer eligible
//! partners exist than requested the node simply ends below target.

use rand::{Rng, seq::SliceRandom};
use tracing::{debug, info, instrument};

use crate::{
    Result,
    attributes::Node,
    category::Category,
    degree::ConnectionProfile,
    error::NetworkError,
    graph::{GraphBuilder, SocialGraph},
};

struct CategoryPools {
    male: Vec<usize>,
    female: Vec<usize>,
}

impl CategoryPools {
    fn from_nodes(nodes: &[Node]) -> Self {
        let (male, female): (Vec<&Node>, Vec<&Node>) = nodes
            .iter()
            .partition(|node| node.category == Category::Male);
        Self {
            male: male.into_iter().map(|node| node.id).collect(),
            female: female.into_iter().map(|node| node.id).collect(),
        }
    }

    fn members(&self, category: Category) -> &[usize] {
        match category {
            Category::Male => &self.male,
            Category::Female => &self.female,
        }
    }
}

/// Wires `nodes` into an undirected graph according to `profile`.
///
/// `nodes` must be ordered by id with ids `0..nodes.len()`, as produced by
/// [`crate::assign_categories`]. The result is deterministic for a given
/// random source state.
///
/// # Errors
/// Returns [`NetworkError::InvalidConfiguration`] when the profile contains
/// invalid distributions or the node ids are not contiguous from zero.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use socialwalk_core::{ConnectionProfile, assign_categories, generate_graph};
///
/// let nodes = assign_categories(50, 0.4)?;
/// let mut rng = SmallRng::seed_from_u64(42);
/// let graph = generate_graph(&nodes, &ConnectionProfile::default(), &mut rng)?;
/// assert_eq!(graph.node_count(), 50);
/// assert!(graph.check_invariants().is_ok());
/// # Ok::<(), socialwalk_core::NetworkError>(())
/// ```
#[instrument(
    name = "core.generate_graph",
    err,
    skip(nodes, profile, rng),
    fields(nodes = nodes.len()),
)]
pub fn generate_graph<R: Rng + ?Sized>(
    nodes: &[Node],
    profile: &ConnectionProfile,
    rng: &mut R,
) -> Result<SocialGraph> {
    profile.validate()?;
    if let Some((index, node)) = nodes
        .iter()
        .enumerate()
        .find(|(index, node)| node.id != *index)
    {
        return Err(NetworkError::invalid_configuration(format!(
            "node ids must be contiguous from zero; position {index} holds id {}",
            node.id
        )));
    }

    let pools = CategoryPools::from_nodes(nodes);
    let mut builder = GraphBuilder::new(nodes.len());
    let mut shortfall = 0_usize;

    for node in nodes {
        let targets =
            Category::ALL.map(|partner| profile.distribution(node.category, partner).sample(rng));
        for (partner, target) in Category::ALL.into_iter().zip(targets) {
            let realised = wire_node(&mut builder, node.id, pools.members(partner), target, rng);
            shortfall = shortfall.saturating_add(target.saturating_sub(realised));
        }
    }

    let graph = builder.freeze();
    if shortfall > 0 {
        debug!(shortfall, "some nodes ended below their degree target");
    }
    info!(
        edges = graph.edge_count(),
        isolated = graph.node_count() - graph.connected_nodes().len(),
        "graph generation completed"
    );
    Ok(graph)
}

/// Connects `node` to up to `target` distinct eligible members of `pool`,
/// returning how many edges were inserted.
fn wire_node<R: Rng + ?Sized>(
    builder: &mut GraphBuilder,
    node: usize,
    pool: &[usize],
    target: usize,
    rng: &mut R,
) -> usize {
    if target == 0 {
        return 0;
    }
    let eligible: Vec<usize> = pool
        .iter()
        .copied()
        .filter(|&candidate| candidate != node && !builder.is_connected(node, candidate))
        .collect();
    let mut realised = 0;
    for &partner in eligible.choose_multiple(rng, target) {
        if builder.connect(node, partner) {
            realised += 1;
        }
    }
    realised
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::{fixture, rstest};

    use crate::{attributes::assign_categories, degree::DegreeDistribution};

    fn fixed(mean: f64) -> DegreeDistribution {
        DegreeDistribution::new(mean, 0.0).expect("valid distribution")
    }

    #[fixture]
    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0x5EED)
    }

    #[rstest]
    fn single_category_targets_only_touch_that_category(mut rng: SmallRng) {
        let nodes = assign_categories(20, 0.5).expect("valid population");
        let profile = ConnectionProfile {
            male_to_male: fixed(2.0),
            male_to_female: fixed(0.0),
            female_to_male: fixed(0.0),
            female_to_female: fixed(0.0),
        };
        let graph = generate_graph(&nodes, &profile, &mut rng).expect("generation succeeds");
        for (left, right) in graph.edges() {
            assert!(left < 10 && right < 10, "edge {left}-{right} leaves the male pool");
        }
        assert!((10..20).all(|node| graph.is_isolated(node)));
        assert!((0..10).all(|node| graph.degree(node) >= 2));
    }

    #[rstest]
    fn starved_pool_leaves_nodes_below_target(mut rng: SmallRng) {
        // Two males cannot each find five male partners.
        let nodes = assign_categories(10, 0.2).expect("valid population");
        let profile = ConnectionProfile {
            male_to_male: fixed(5.0),
            male_to_female: fixed(0.0),
            female_to_male: fixed(0.0),
            female_to_female: fixed(0.0),
        };
        let graph = generate_graph(&nodes, &profile, &mut rng).expect("generation succeeds");
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge(0, 1));
    }

    #[rstest]
    fn saturating_targets_yield_complete_graph(mut rng: SmallRng) {
        let nodes = assign_categories(8, 0.5).expect("valid population");
        let profile = ConnectionProfile {
            male_to_male: fixed(50.0),
            male_to_female: fixed(50.0),
            female_to_male: fixed(50.0),
            female_to_female: fixed(50.0),
        };
        let graph = generate_graph(&nodes, &profile, &mut rng).expect("generation succeeds");
        assert_eq!(graph.edge_count(), 28);
        assert!(graph.check_invariants().is_ok());
    }

    #[rstest]
    fn astronomical_targets_wire_every_pair(mut rng: SmallRng) {
        // Means this large saturate the sampled target at `usize::MAX`.
        let nodes = assign_categories(4, 0.5).expect("valid population");
        let huge = (1e300, 0.0);
        let profile = ConnectionProfile::from_pairs(huge, huge, huge, huge)
            .expect("finite means are accepted");
        let graph = generate_graph(&nodes, &profile, &mut rng).expect("generation succeeds");
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.check_invariants().is_ok());
    }

    #[rstest]
    fn rejects_non_contiguous_ids(mut rng: SmallRng) {
        let nodes = [Node {
            id: 3,
            category: Category::Male,
        }];
        let err = generate_graph(&nodes, &ConnectionProfile::default(), &mut rng)
            .expect_err("ids must start at zero");
        assert!(matches!(err, NetworkError::InvalidConfiguration { .. }));
    }

    #[rstest]
    fn same_seed_same_graph() {
        let nodes = assign_categories(120, 0.3).expect("valid population");
        let profile = ConnectionProfile::default();
        let first = generate_graph(&nodes, &profile, &mut SmallRng::seed_from_u64(9))
            .expect("generation succeeds");
        let second = generate_graph(&nodes, &profile, &mut SmallRng::seed_from_u64(9))
            .expect("generation succeeds");
        assert_eq!(first, second);
    }
}
