//! Behavioural tests for assembling synthetic graphs.

use std::collections::{BTreeMap, BTreeSet};

use motifgraph_core::{
    BasisKind, BuildConfig, GraphError, RandomEdgePolicy, ShapeKind, ShapeSpec, build_graph,
};
use motifgraph_test_support::tracing::RecordingLayer;
use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};
use rstest::{fixture, rstest};

#[fixture]
fn rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}

#[rstest]
fn cycle_basis_with_house_matches_reference(mut rng: SmallRng) {
    let config = BuildConfig::new(BasisKind::Cycle, 10).with_shape(ShapeSpec::House);
    let built = build_graph(&config, &mut rng).expect("graph must build");

    assert_eq!(built.graph.node_count(), 15);
    assert_eq!(built.graph.edge_count(), 10 + 6 + 1);
    assert_eq!(built.plugins, vec![0]);
    assert!(built.graph.contains_edge(10, 0));

    let mut expected = vec![0; 10];
    expected.extend([1, 1, 2, 2, 3]);
    assert_eq!(built.roles, expected);
}

#[rstest]
fn motifs_of_one_kind_share_a_role_block(mut rng: SmallRng) {
    let config = BuildConfig::new(BasisKind::Tree, 3)
        .with_param(2)
        .with_shapes([
            ShapeSpec::House,
            ShapeSpec::Cycle { length: 6 },
            ShapeSpec::House,
            ShapeSpec::Cycle { length: 4 },
        ]);
    let built = build_graph(&config, &mut rng).expect("graph must build");

    let offsets: Vec<_> = built
        .motifs
        .iter()
        .map(|placement| (placement.kind, placement.role_offset))
        .collect();
    assert_eq!(
        offsets,
        vec![
            (ShapeKind::House, 1),
            (ShapeKind::Cycle, 4),
            (ShapeKind::House, 1),
            (ShapeKind::Cycle, 4),
        ]
    );

    for placement in &built.motifs {
        let roles: Vec<_> = placement
            .nodes()
            .map(|node| built.role_of(node).expect("motif node has a role"))
            .collect();
        match placement.kind {
            ShapeKind::House => assert_eq!(roles, vec![1, 1, 2, 2, 3]),
            ShapeKind::Cycle => assert!(roles.iter().all(|&role| role == 4)),
            other => panic!("unexpected motif kind {other}"),
        }
    }
}

#[rstest]
fn evenly_spaced_plugins_follow_floor_spacing(mut rng: SmallRng) {
    let config = BuildConfig::new(BasisKind::Cycle, 20)
        .with_start(7)
        .with_shapes([ShapeSpec::Diamond; 3]);
    let built = build_graph(&config, &mut rng).expect("graph must build");
    assert_eq!(built.plugins, vec![7, 13, 19]);
    for placement in &built.motifs {
        assert!(built.graph.contains_edge(placement.first_node, placement.plugin));
    }
    assert!(built.graph.is_contiguous_from(7));
}

#[rstest]
fn random_plugins_are_distinct_basis_nodes(mut rng: SmallRng) {
    let config = BuildConfig::new(BasisKind::Ba, 30)
        .with_param(2)
        .with_random_plugins(true)
        .with_shapes([ShapeSpec::House; 12]);
    let built = build_graph(&config, &mut rng).expect("graph must build");
    let distinct: BTreeSet<_> = built.plugins.iter().copied().collect();
    assert_eq!(distinct.len(), 12);
    assert!(built.plugins.iter().all(|&plugin| plugin < 30));
}

#[rstest]
fn random_plugins_are_shifted_by_start(mut rng: SmallRng) {
    let config = BuildConfig::new(BasisKind::Cycle, 16)
        .with_start(100)
        .with_random_plugins(true)
        .with_shapes([ShapeSpec::House; 6]);
    let built = build_graph(&config, &mut rng).expect("graph must build");

    let distinct: BTreeSet<_> = built.plugins.iter().copied().collect();
    assert_eq!(distinct.len(), 6);
    assert!(built.plugins.iter().all(|plugin| (100..116).contains(plugin)));
    for placement in &built.motifs {
        assert!(built.graph.contains_node(placement.plugin));
        assert!(built.graph.contains_edge(placement.first_node, placement.plugin));
    }
    assert!(built.graph.is_contiguous_from(100));
}

#[rstest]
#[case::basis(usize::MAX - 1, Vec::new())]
#[case::motif(usize::MAX - 6, vec![ShapeSpec::House])]
#[case::second_motif(usize::MAX - 14, vec![ShapeSpec::House, ShapeSpec::Diamond])]
fn overflowing_node_ids_are_rejected(
    #[case] start: usize,
    #[case] shapes: Vec<ShapeSpec>,
    mut rng: SmallRng,
) {
    let config = BuildConfig::new(BasisKind::Cycle, 4)
        .with_start(start)
        .with_shapes(shapes);
    let err = build_graph(&config, &mut rng).expect_err("node ids must overflow");
    assert!(matches!(
        err,
        GraphError::InvalidParameter {
            parameter: "start",
            ..
        }
    ));
}

#[rstest]
#[case(false)]
#[case(true)]
fn too_many_motifs_are_rejected(#[case] random: bool, mut rng: SmallRng) {
    let config = BuildConfig::new(BasisKind::Cycle, 3)
        .with_random_plugins(random)
        .with_shapes([ShapeSpec::House; 4]);
    let err = build_graph(&config, &mut rng).expect_err("four motifs cannot fit three nodes");
    assert_eq!(
        err,
        GraphError::PluginsExceedBasis {
            shapes: 4,
            basis_nodes: 3
        }
    );
}

#[rstest]
fn zero_motifs_yield_the_bare_basis(mut rng: SmallRng) {
    let config = BuildConfig::new(BasisKind::Grid, 4).with_param(3);
    let built = build_graph(&config, &mut rng).expect("graph must build");
    assert_eq!(built.graph.node_count(), 12);
    assert!(built.plugins.is_empty());
    assert!(built.roles.iter().all(|&role| role == 0));
}

#[rstest]
#[case::clique(BasisKind::Clique, 6, 6)]
#[case::cycle(BasisKind::Cycle, 6, 6)]
#[case::tree(BasisKind::Tree, 2, 31)]
#[case::ba(BasisKind::Ba, 12, 12)]
#[case::grid(BasisKind::Grid, 4, 20)]
fn basis_kinds_forward_the_shared_param(
    #[case] basis: BasisKind,
    #[case] width: usize,
    #[case] nodes: usize,
    mut rng: SmallRng,
) {
    let config = BuildConfig::new(basis, width);
    let built = build_graph(&config, &mut rng).expect("graph must build");
    assert_eq!(built.basis_nodes, nodes);
}

#[rstest]
fn distinct_policy_adds_exactly_the_requested_edges(mut rng: SmallRng) {
    let base = BuildConfig::new(BasisKind::Cycle, 15).with_shape(ShapeSpec::House);
    let plain = build_graph(&base, &mut SmallRng::seed_from_u64(1)).expect("graph must build");
    let config = base
        .clone()
        .with_extra_random_edges(10)
        .with_random_edge_policy(RandomEdgePolicy::DistinctNew);
    let built = build_graph(&config, &mut rng).expect("graph must build");
    assert_eq!(built.graph.edge_count(), plain.graph.edge_count() + 10);
}

#[rstest]
fn repeat_policy_never_adds_more_than_requested(mut rng: SmallRng) {
    let config = BuildConfig::new(BasisKind::Clique, 5)
        .with_shape(ShapeSpec::Cycle { length: 3 })
        .with_extra_random_edges(50);
    let built = build_graph(&config, &mut rng).expect("graph must build");
    let baseline = 10 + 3 + 1;
    assert!(built.graph.edge_count() <= baseline + 50);
    assert!(built.graph.edge_count() <= 8 * 7 / 2);
    assert!(built.graph.edges().all(|edge| edge.low() != edge.high()));
}

#[rstest]
fn distinct_policy_reports_saturated_graphs(mut rng: SmallRng) {
    let config = BuildConfig::new(BasisKind::Clique, 4)
        .with_extra_random_edges(1)
        .with_random_edge_policy(RandomEdgePolicy::DistinctNew);
    let err = build_graph(&config, &mut rng).expect_err("a complete graph has no free pairs");
    assert_eq!(
        err,
        GraphError::InsufficientNonEdges {
            requested: 1,
            available: 0
        }
    );
    assert_eq!(err.code().as_str(), "GRAPH_INSUFFICIENT_NON_EDGES");
}

#[rstest]
fn identical_seeds_build_identical_graphs() {
    let config = BuildConfig::new(BasisKind::Ba, 40)
        .with_param(3)
        .with_random_plugins(true)
        .with_shapes([ShapeSpec::House, ShapeSpec::Clique { nodes: 5, remove: 2 }])
        .with_extra_random_edges(6);
    let first = build_graph(&config, &mut SmallRng::seed_from_u64(7)).expect("graph must build");
    let second = build_graph(&config, &mut SmallRng::seed_from_u64(7)).expect("graph must build");
    assert_eq!(first, second);
}

#[rstest]
fn build_span_records_graph_size(mut rng: SmallRng) {
    let config = BuildConfig::new(BasisKind::Cycle, 10)
        .with_shapes([ShapeSpec::House, ShapeSpec::Diamond]);
    let (layer, result) = RecordingLayer::capture(|| build_graph(&config, &mut rng));
    let built = result.expect("graph must build");

    let span = layer.span_named("graph.build").expect("build span recorded");
    assert_eq!(span.field("basis"), Some("cycle"));
    assert_eq!(span.field("width"), Some("10"));
    assert_eq!(span.field("shapes"), Some("2"));
    let nodes = built.graph.node_count().to_string();
    assert_eq!(span.field("nodes"), Some(nodes.as_str()));

    let attached = layer.events_with_message("attached motif");
    assert_eq!(attached.len(), 2);
    assert_eq!(
        attached.first().and_then(|event| event.field("kind")),
        Some("house")
    );
}

fn shape_strategy() -> impl Strategy<Value = ShapeSpec> {
    prop_oneof![
        Just(ShapeSpec::House),
        Just(ShapeSpec::Diamond),
        (3_usize..=8).prop_map(|length| ShapeSpec::Cycle { length }),
        (2_usize..=6, 0_usize..=1).prop_map(|(nodes, remove)| ShapeSpec::Clique { nodes, remove }),
        (1_usize..=3, 1_usize..=3).prop_map(|(rows, cols)| ShapeSpec::Grid { rows, cols }),
    ]
}

fn basis_strategy() -> impl Strategy<Value = (BasisKind, usize, usize)> {
    prop_oneof![
        (10_usize..=30).prop_map(|width| (BasisKind::Cycle, width, 5)),
        (10_usize..=30, 1_usize..=4).prop_map(|(width, attach)| (BasisKind::Ba, width, attach)),
        (2_usize..=3, 2_usize..=3).prop_map(|(height, branching)| (BasisKind::Tree, height, branching)),
        (3_usize..=6, 3_usize..=6).prop_map(|(rows, cols)| (BasisKind::Grid, rows, cols)),
    ]
}

proptest! {
    #[test]
    fn role_sequence_covers_every_node(
        (basis, width, param) in basis_strategy(),
        shapes in prop::collection::vec(shape_strategy(), 0..=4),
        random_plugins in any::<bool>(),
        extra in 0_usize..=5,
        start in 0_usize..=1_000,
        seed in any::<u64>(),
    ) {
        let config = BuildConfig::new(basis, width)
            .with_start(start)
            .with_param(param)
            .with_shapes(shapes.clone())
            .with_random_plugins(random_plugins)
            .with_extra_random_edges(extra);
        let built = build_graph(&config, &mut SmallRng::seed_from_u64(seed))
            .expect("valid configuration must build");

        let motif_nodes: usize = built.motifs.iter().map(|placement| placement.node_count).sum();
        prop_assert_eq!(built.roles.len(), built.graph.node_count());
        prop_assert_eq!(built.roles.len(), built.basis_nodes + motif_nodes);
        prop_assert!(built.graph.is_contiguous_from(start));
        prop_assert!(built.graph.edges().all(|edge| edge.low() < edge.high()));

        let distinct: BTreeSet<_> = built.plugins.iter().copied().collect();
        prop_assert_eq!(distinct.len(), shapes.len());
        let basis_ids = start..start + built.basis_nodes;
        prop_assert!(built.plugins.iter().all(|plugin| basis_ids.contains(plugin)));

        let mut blocks: BTreeMap<ShapeKind, usize> = BTreeMap::new();
        for placement in &built.motifs {
            let offset = *blocks.entry(placement.kind).or_insert(placement.role_offset);
            prop_assert_eq!(offset, placement.role_offset);
            prop_assert!(built.graph.contains_edge(placement.first_node, placement.plugin));
        }
    }
}
