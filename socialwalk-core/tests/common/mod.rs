#![expect(dead_code, reason = "each integration test uses a subset of the helpers")]

use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};
use socialwalk_core::{ConnectionProfile, SocialGraph, SocialMediaNetwork};
use test_strategy::Arbitrary;

/// Degree-target presets exercised by the property suites.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub enum ProfileShape {
    /// The default friendship profile.
    #[weight(3)]
    Default,
    /// Strong preference for the node's own category.
    #[weight(2)]
    Homophilous,
    /// Targets of zero or one partner, leaving isolated nodes behind.
    #[weight(2)]
    Sparse,
    /// Targets far above any pool size.
    #[weight(1)]
    Saturating,
}

impl ProfileShape {
    pub fn profile(self) -> ConnectionProfile {
        match self {
            Self::Default => ConnectionProfile::default(),
            Self::Homophilous => {
                ConnectionProfile::from_pairs((8.0, 2.0), (0.5, 0.5), (0.5, 0.5), (8.0, 2.0))
                    .expect("homophilous profile is valid")
            }
            Self::Sparse => {
                ConnectionProfile::from_pairs((0.5, 0.5), (0.5, 0.5), (0.5, 0.5), (0.5, 0.5))
                    .expect("sparse profile is valid")
            }
            Self::Saturating => {
                ConnectionProfile::from_pairs((500.0, 0.0), (500.0, 0.0), (500.0, 0.0), (500.0, 0.0))
                    .expect("saturating profile is valid")
            }
        }
    }
}

/// A network configuration plus the seed used to wire it.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub node_count: usize,
    pub male_ratio: f64,
    pub shape: ProfileShape,
    pub seed: u64,
}

impl Scenario {
    pub fn generate(&self) -> SocialMediaNetwork {
        let mut network =
            SocialMediaNetwork::new(self.node_count, self.male_ratio).expect("scenario is valid");
        let mut rng = seeded(self.seed);
        network
            .generate(&self.shape.profile(), &mut rng)
            .expect("generation succeeds");
        network
    }
}

pub fn scenario_strategy() -> impl Strategy<Value = Scenario> {
    (2_usize..60, 0.05_f64..0.95, any::<ProfileShape>(), any::<u64>()).prop_map(
        |(node_count, male_ratio, shape, seed)| Scenario {
            node_count,
            male_ratio,
            shape,
            seed,
        },
    )
}

pub fn seeded(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Star with hub 0 and `leaves` leaves numbered from 1.
pub fn star(leaves: usize) -> SocialGraph {
    let mut adjacency = vec![(1..=leaves).collect::<Vec<_>>()];
    adjacency.extend((0..leaves).map(|_| vec![0]));
    SocialGraph::from_adjacency(adjacency).expect("star is well formed")
}
