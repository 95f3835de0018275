//! Unit tests for Strahler classification and branch statistics.

use rstest::rstest;

use crate::error::AnalysisError;
use crate::graph::{NodeId, NodeRecord, PathInfo, Point3, SwcType, TreeGraph, TreeGraphBuilder};
use crate::test_utils::{balanced_binary, caterpillar, fork, node, straight_line, tree_from_parents};

use super::{OrderAggregates, StrahlerAnalyzer, StrahlerOrders, combine};

fn order_of(graph: &TreeGraph, orders: &StrahlerOrders, idx: usize) -> u32 {
    orders.order(graph.by_node_id(node(idx)).expect("fixture node"))
}

#[rstest]
#[case::leaf(&[], 1)]
#[case::single_child(&[3], 3)]
#[case::unique_max(&[1, 3, 2], 3)]
#[case::tied_max(&[2, 1, 2], 3)]
#[case::all_tips(&[1, 1, 1], 2)]
fn combine_applies_the_strahler_rule(#[case] children: &[u32], #[case] expected: u32) {
    assert_eq!(combine(children.iter().copied()), expected);
}

#[rstest]
#[case(1, 2)]
#[case(3, 4)]
#[case(6, 7)]
fn balanced_tree_orders_grow_by_level(#[case] depth: u32, #[case] root_number: u32) {
    let graph = balanced_binary(depth);
    let orders = StrahlerOrders::classify(&graph).expect("classify");
    assert_eq!(orders.root_number(), root_number);
    assert_eq!(orders.order(graph.root()), root_number);
    for tip in graph.tips() {
        assert_eq!(orders.order(tip), 1);
        assert_eq!(orders.reversed(tip), root_number);
    }
    assert_eq!(orders.reversed(graph.root()), 1);
}

#[rstest]
#[case(2)]
#[case(4)]
fn balanced_tree_has_constant_bifurcation_ratio(#[case] depth: u32) {
    let graph = balanced_binary(depth);
    let analyzer = StrahlerAnalyzer::new(&graph);
    let highest = analyzer.highest_branch_order().expect("highest");
    assert_eq!(highest, depth + 1);

    let counts = analyzer.branch_counts().expect("counts");
    for order in 1..=highest {
        assert_eq!(counts[&order], 1 << (highest - order));
    }

    let ratios = analyzer.bifurcation_ratios().expect("ratios");
    assert_eq!(ratios.len() as u32, highest);
    for order in 1..highest {
        assert_eq!(ratios[&order], 2.0);
    }
    assert!(ratios[&highest].is_nan());
    assert_eq!(analyzer.avg_bifurcation_ratio().expect("avg"), 2.0);
}

#[test]
fn caterpillar_has_one_main_stream() {
    let graph = caterpillar(8, &[2, 3, 5]);
    let analyzer = StrahlerAnalyzer::new(&graph);

    assert_eq!(analyzer.root_number().expect("root number"), 2);
    assert_eq!(analyzer.highest_branch_order().expect("highest"), 2);

    let counts = analyzer.branch_counts().expect("counts");
    assert_eq!(counts[&1], 4);
    assert_eq!(counts[&2], 1);

    let bps = analyzer.branch_point_counts().expect("branch points");
    assert_eq!(bps[&1], 0);
    assert_eq!(bps[&2], 3);

    let lengths = analyzer.lengths().expect("lengths");
    assert_eq!(lengths[&1], 1.0);
    assert_eq!(lengths[&2], 5.0);

    let main = analyzer.branches(2).expect("order 2");
    assert_eq!(main.len(), 1);
    assert_eq!(main[0].root_side(), graph.root());
    assert_eq!(main[0].len(), 6);
    assert_eq!(main[0].tip_side(), graph.by_node_id(node(5)).expect("node 5"));
}

#[test]
fn straight_line_is_a_single_first_order_branch() {
    let graph = straight_line(5, 8.0);
    let analyzer = StrahlerAnalyzer::new(&graph);

    assert_eq!(analyzer.root_number().expect("root number"), 1);
    assert_eq!(analyzer.highest_branch_order().expect("highest"), 1);
    let branches = analyzer.branches(1).expect("order 1");
    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0].len(), 5);
    assert_eq!(branches[0].length(), 8.0);
    assert_eq!(branches[0].contraction(), 1.0);

    let ratios = analyzer.bifurcation_ratios().expect("ratios");
    assert_eq!(ratios.len(), 1);
    assert!(ratios[&1].is_nan());
    assert!(analyzer.avg_bifurcation_ratio().expect("avg").is_nan());
    assert_eq!(analyzer.lengths().expect("lengths")[&1], 8.0);
}

#[test]
fn root_branch_point_lowers_the_highest_branch_order() {
    let graph = tree_from_parents(
        &[None, Some(0), Some(0)],
        &[
            Point3::ORIGIN,
            Point3::new(-1.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ],
    );
    let analyzer = StrahlerAnalyzer::new(&graph);
    assert_eq!(analyzer.root_number().expect("root number"), 2);
    assert_eq!(analyzer.highest_branch_order().expect("highest"), 1);
    assert_eq!(
        analyzer.branches(2),
        Err(AnalysisError::InvalidOrder {
            order: 2,
            highest: 1,
        })
    );
    assert_eq!(analyzer.branch_counts().expect("counts")[&2], 0);
    assert_eq!(analyzer.root_associated_branches().expect("root branches").len(), 2);
}

#[rstest]
#[case(0)]
#[case(3)]
fn out_of_range_orders_are_rejected(#[case] order: u32) {
    let graph = fork();
    let analyzer = StrahlerAnalyzer::new(&graph);
    let err = analyzer.branches(order).expect_err("order must be rejected");
    assert_eq!(err, AnalysisError::InvalidOrder { order, highest: 2 });
}

#[test]
fn lone_root_has_no_branches() {
    let graph = TreeGraph::from_records([NodeRecord::new(NodeId(7), None, Point3::ORIGIN)])
        .expect("single vertex");
    let analyzer = StrahlerAnalyzer::new(&graph);
    assert_eq!(analyzer.root_number().expect("root number"), 1);
    assert_eq!(analyzer.highest_branch_order().expect("highest"), 0);
    assert!(analyzer.bifurcation_ratios().expect("ratios").is_empty());
    assert!(matches!(
        analyzer.branches(1),
        Err(AnalysisError::InvalidOrder { order: 1, highest: 0 })
    ));
    assert!(analyzer.root_associated_branches().expect("root branches").is_empty());
}

#[test]
fn fork_statistics_per_order() {
    let graph = fork();
    let analyzer = StrahlerAnalyzer::new(&graph);

    let fragmentations = analyzer.avg_fragmentations().expect("fragmentation");
    assert_eq!(fragmentations[&1], 2.5);
    assert_eq!(fragmentations[&2], 2.0);

    let contractions = analyzer.avg_contractions().expect("contraction");
    assert!((contractions[&1] - 1.0).abs() < 1e-12);
    assert!((contractions[&2] - 1.0).abs() < 1e-12);

    // Order-1 branches leave the stem at acos(0.8) and 45 degrees.
    let angles = analyzer.avg_extension_angles().expect("angles");
    let expected = (0.8_f64.acos().to_degrees() + 45.0) / 2.0;
    assert!((angles[&1] - expected).abs() < 1e-9, "{}", angles[&1]);
    assert!(angles[&2].is_nan());

    let stem: Vec<_> = analyzer
        .root_associated_branches()
        .expect("root branches")
        .into_iter()
        .map(|branch| branch.order())
        .collect();
    assert_eq!(stem, vec![2]);
}

#[test]
fn nodes_are_grouped_by_order() {
    let graph = fork();
    let analyzer = StrahlerAnalyzer::new(&graph);
    let grouped = analyzer.nodes_by_order().expect("nodes");
    let ids = |order: u32| -> Vec<u64> {
        grouped[&order]
            .iter()
            .map(|&vertex| graph.vertex(vertex).id().0)
            .collect()
    };
    assert_eq!(ids(1), vec![2, 3, 4]);
    assert_eq!(ids(2), vec![0, 1]);
}

#[rstest]
#[case::line(straight_line(4, 3.0))]
#[case::fork(fork())]
#[case::caterpillar(caterpillar(9, &[1, 4, 6, 7]))]
#[case::balanced(balanced_binary(3))]
fn branches_partition_non_root_vertices(#[case] graph: TreeGraph) {
    let analyzer = StrahlerAnalyzer::new(&graph);
    let mut seen = vec![0_usize; graph.len()];
    for branches in analyzer.branches_by_order().expect("branches").values() {
        for branch in *branches {
            assert!(branch.len() >= 2);
            for vertex in &branch.vertices()[1..] {
                seen[vertex.index()] += 1;
            }
        }
    }
    for vertex in graph.vertices() {
        let expected = usize::from(vertex != graph.root());
        assert_eq!(seen[vertex.index()], expected, "vertex {vertex:?}");
    }
}

#[rstest]
#[case::fork(fork())]
#[case::caterpillar(caterpillar(9, &[1, 4, 6, 7]))]
#[case::balanced(balanced_binary(3))]
fn aggregates_cover_every_vertex(#[case] graph: TreeGraph) {
    let orders = StrahlerOrders::classify(&graph).expect("classify");
    let aggregates = OrderAggregates::compute(&graph, &orders);
    let vertices: usize = aggregates.orders().map(|order| aggregates.vertex_count(order)).sum();
    let tips: usize = aggregates.orders().map(|order| aggregates.tip_count(order)).sum();
    assert_eq!(vertices, graph.len());
    assert_eq!(tips, graph.tips().count());
    assert_eq!(aggregates.tip_count(1), tips);
    assert_eq!(aggregates.vertex_count(orders.root_number() + 1), 0);
}

#[test]
fn caterpillar_side_branches_keep_their_order() {
    let graph = caterpillar(6, &[1, 2, 3, 4]);
    let orders = StrahlerOrders::classify(&graph).expect("classify");
    for idx in 0..=4 {
        assert_eq!(order_of(&graph, &orders, idx), 2, "primary vertex {idx}");
    }
    assert_eq!(order_of(&graph, &orders, 5), 1);
}

#[test]
fn branches_carry_the_path_of_their_tip_side_vertex() {
    let mut builder = TreeGraphBuilder::new();
    let stem = builder.add_path(PathInfo::new(1, SwcType::BasalDendrite));
    let side = builder.add_path(PathInfo::new(2, SwcType::BasalDendrite));
    let at = |x: f64, y: f64| Point3::new(x, y, 0.0);
    builder
        .add_node(NodeRecord::new(NodeId(0), None, at(0.0, 0.0)).with_path(stem))
        .add_node(NodeRecord::new(NodeId(1), Some(NodeId(0)), at(0.0, 1.0)).with_path(stem))
        .add_node(NodeRecord::new(NodeId(2), Some(NodeId(1)), at(0.0, 2.0)).with_path(stem))
        .add_node(NodeRecord::new(NodeId(3), Some(NodeId(1)), at(1.0, 2.0)).with_path(side));
    let graph = builder.build().expect("tree");
    let analyzer = StrahlerAnalyzer::new(&graph);

    let first_order = analyzer.branches(1).expect("order 1");
    let paths: Vec<_> = first_order.iter().map(|branch| branch.path()).collect();
    assert_eq!(paths, vec![Some(stem), Some(side)]);
}
