mod common;

use common::{Scenario, scenario_strategy, seeded};
use proptest::{
    prelude::any, prop_assert, prop_assert_eq, proptest, strategy::Strategy, test_runner::Config,
};
use socialwalk_core::{
    DeadEndPolicy, MetropolisHastings, NetworkError, SocialGraph, WalkConfig, assign_categories,
    random_walk, transition_table,
};

fn connected_scenario(scenario: &Scenario) -> bool {
    scenario
        .generate()
        .graph()
        .is_some_and(|graph| graph.edge_count() > 0)
}

proptest! {
    #![proptest_config(Config::with_cases(48))]

    #[test]
    fn generated_graphs_are_simple_and_undirected(scenario in scenario_strategy()) {
        let network = scenario.generate();
        let graph = network.graph().expect("graph was generated");
        prop_assert!(graph.check_invariants().is_ok());
        prop_assert_eq!(graph.node_count(), scenario.node_count);
        for (left, right) in graph.edges() {
            prop_assert!(left != right);
            prop_assert!(graph.has_edge(left, right));
            prop_assert!(graph.has_edge(right, left));
        }
        prop_assert_eq!(graph.edges().count(), graph.edge_count());
    }

    #[test]
    fn generation_is_deterministic_per_seed(scenario in scenario_strategy()) {
        let first = scenario.generate();
        let second = scenario.generate();
        prop_assert_eq!(first.graph(), second.graph());
    }

    #[test]
    fn walk_counts_account_for_every_step(
        scenario in scenario_strategy(),
        steps in 1_usize..400,
        walk_seed in any::<u64>(),
    ) {
        let network = scenario.generate();
        let graph = network.graph().expect("graph was generated");
        let config = WalkConfig::new(steps).with_dead_end(DeadEndPolicy::Restart);
        let mut rng = seeded(walk_seed);
        match network.random_walk(&config, &mut rng) {
            Ok(report) => {
                prop_assert_eq!(report.steps_taken(), steps);
                prop_assert_eq!(report.counts().total(), steps);
                prop_assert!((0.0..=1.0).contains(&report.observed_probability()));
                prop_assert!((0.0..=1.0).contains(&report.unbiased_probability()));
            }
            Err(NetworkError::DegenerateWalk { .. }) => prop_assert_eq!(graph.edge_count(), 0),
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
        match network.metropolis_hastings_walk(&config, &mut rng) {
            Ok(report) => {
                prop_assert_eq!(report.counts().total(), report.steps_taken());
                prop_assert!(report.accepted_moves() <= report.steps_taken());
            }
            Err(NetworkError::DegenerateWalk { .. }) => prop_assert_eq!(graph.edge_count(), 0),
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn metropolis_hastings_tables_satisfy_detailed_balance(
        scenario in scenario_strategy().prop_filter("needs an edge", connected_scenario),
    ) {
        let network = scenario.generate();
        let graph = network.graph().expect("graph was generated");
        for node in graph.connected_nodes() {
            let table = transition_table(graph, node, &MetropolisHastings)
                .expect("default rule is well behaved");
            prop_assert!((table.total() - 1.0).abs() < 1e-9);
            for &(neighbour, forward) in table.entries() {
                let reverse = transition_table(graph, neighbour, &MetropolisHastings)
                    .expect("default rule is well behaved")
                    .probability_of(node);
                prop_assert!(
                    (forward - reverse).abs() < 1e-12,
                    "P({}, {}) = {} but P({}, {}) = {}",
                    node, neighbour, forward, neighbour, node, reverse,
                );
            }
        }
    }

    #[test]
    fn regular_graphs_need_no_reweighting(
        node_count in 2_usize..24,
        steps in 1_usize..300,
        seed in any::<u64>(),
    ) {
        let nodes = assign_categories(node_count, 0.5).expect("valid population");
        let graph = SocialGraph::complete(node_count);
        let mut rng = seeded(seed);
        let report = random_walk(&graph, &nodes, &WalkConfig::new(steps), &mut rng)
            .expect("complete graphs never stall");
        prop_assert!(
            (report.unbiased_probability() - report.observed_probability()).abs() < 1e-9
        );
    }
}
