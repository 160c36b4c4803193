mod common;

use common::{seeded, star};
use rstest::rstest;
use socialwalk_core::{
    ConnectionProfile, DeadEndPolicy, SocialGraph, SocialMediaNetwork, WalkConfig,
    assign_categories, random_walk,
};
use socialwalk_test_support::tracing::capture;
use tracing::Level;

#[rstest]
fn generation_records_span_and_summary_event() {
    let (result, layer) = capture(|| {
        let mut network = SocialMediaNetwork::new(30, 0.4).expect("valid network");
        let mut rng = seeded(1);
        network
            .generate(&ConnectionProfile::default(), &mut rng)
            .map(|(_, graph)| graph.edge_count())
    });
    let edges = result.expect("generation succeeds");

    let span = layer.span("core.generate_graph").expect("generation span closed");
    assert_eq!(span.fields.get("nodes").map(String::as_str), Some("30"));
    assert!(layer.span("core.generate").is_some());

    let completed = layer.events_with_message("graph generation completed");
    assert_eq!(completed.len(), 1);
    let event = completed.first().expect("one summary event");
    assert_eq!(event.level, Level::INFO);
    assert_eq!(event.fields.get("edges"), Some(&edges.to_string()));
}

#[rstest]
fn walk_span_carries_configuration() {
    let ((), layer) = capture(|| {
        let nodes = assign_categories(6, 0.5).expect("valid population");
        let graph = SocialGraph::complete(6);
        let mut rng = seeded(2);
        let config = WalkConfig::new(25).with_start_node(3);
        random_walk(&graph, &nodes, &config, &mut rng).expect("walk succeeds");
    });
    let span = layer.span("core.random_walk").expect("walk span closed");
    assert_eq!(span.fields.get("steps").map(String::as_str), Some("25"));
    assert_eq!(span.fields.get("start_node").map(String::as_str), Some("Some(3)"));
    assert_eq!(span.fields.get("dead_end").map(String::as_str), Some("Terminate"));
    assert_eq!(layer.events_with_message("random walk completed").len(), 1);
}

#[rstest]
fn failed_walk_emits_error_event() {
    let (result, layer) = capture(|| {
        let graph = SocialGraph::from_adjacency(vec![vec![], vec![2], vec![1]])
            .expect("graph is well formed");
        let nodes = assign_categories(3, 0.4).expect("valid population");
        let mut rng = seeded(3);
        random_walk(&graph, &nodes, &WalkConfig::new(4).with_start_node(0), &mut rng)
    });
    assert!(result.is_err());
    let errors: Vec<_> = layer
        .events()
        .into_iter()
        .filter(|event| event.level == Level::ERROR)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.first().and_then(|event| event.span.as_deref()),
        Some("core.random_walk")
    );
}

#[rstest]
fn restart_is_logged_at_debug() {
    let ((), layer) = capture(|| {
        let graph = star(2);
        let mut adjacency: Vec<Vec<usize>> = (0..3).map(|node| graph.neighbors(node).to_vec()).collect();
        adjacency.push(Vec::new());
        let graph = SocialGraph::from_adjacency(adjacency).expect("graph is well formed");
        let nodes = assign_categories(4, 0.5).expect("valid population");
        let mut rng = seeded(4);
        let config = WalkConfig::new(6)
            .with_start_node(3)
            .with_dead_end(DeadEndPolicy::Restart);
        let report = random_walk(&graph, &nodes, &config, &mut rng).expect("walk succeeds");
        assert_eq!(report.restarts(), 1);
    });
    let restarts = layer.events_with_message("restarting walk from a connected node");
    assert_eq!(restarts.len(), 1);
    assert_eq!(
        restarts.first().map(|event| event.level),
        Some(Level::DEBUG)
    );
}
