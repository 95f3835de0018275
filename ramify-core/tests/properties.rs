//! Property tests over randomly generated trees.

mod common;

use common::{TreeSpec, tree_spec};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use ramify_core::{
    Descriptor, LandscapeConfig, PersistenceAnalyzer, StrahlerAnalyzer, StrahlerOrders,
};
use ramify_test_support::proptest_profile::ProptestRunProfile;

const MAX_NODES: usize = 48;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: ProptestRunProfile::load(96).cases(),
        ..ProptestConfig::default()
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn orders_grow_towards_the_root(spec in tree_spec(MAX_NODES)) {
        let graph = spec.graph();
        let orders = StrahlerOrders::classify(&graph).expect("classify");
        for tip in graph.tips() {
            prop_assert_eq!(orders.order(tip), 1);
        }
        for vertex in graph.vertices() {
            if let Some(parent) = graph.parent(vertex) {
                prop_assert!(orders.order(parent) >= orders.order(vertex));
            }
            prop_assert_eq!(
                orders.order(vertex) + orders.reversed(vertex),
                orders.root_number() + 1
            );
        }
        prop_assert_eq!(orders.order(graph.root()), orders.root_number());
    }

    #[test]
    fn classification_ignores_record_order(spec in tree_spec(MAX_NODES), rotation in 0_usize..MAX_NODES) {
        let graph = spec.graph();
        let permuted = spec.permuted_graph(rotation);
        let expected = StrahlerOrders::classify(&graph).expect("classify");
        let actual = StrahlerOrders::classify(&permuted).expect("classify");
        for vertex in graph.vertices() {
            let twin = permuted
                .by_node_id(graph.vertex(vertex).id())
                .expect("same ids");
            prop_assert_eq!(expected.order(vertex), actual.order(twin));
        }
    }

    #[test]
    fn branches_cover_each_non_root_vertex_once(spec in tree_spec(MAX_NODES)) {
        let graph = spec.graph();
        let analyzer = StrahlerAnalyzer::new(&graph);
        let mut seen = vec![0_usize; graph.len()];
        for branches in analyzer.branches_by_order().expect("branches").values() {
            for branch in *branches {
                prop_assert!(branch.len() >= 2);
                for vertex in &branch.vertices()[1..] {
                    seen[vertex.index()] += 1;
                }
            }
        }
        for vertex in graph.vertices() {
            prop_assert_eq!(seen[vertex.index()], usize::from(vertex != graph.root()));
        }
    }

    #[test]
    fn higher_order_streams_need_two_lower_ones(spec in tree_spec(MAX_NODES)) {
        let graph = spec.graph();
        let analyzer = StrahlerAnalyzer::new(&graph);
        for (order, ratio) in analyzer.bifurcation_ratios().expect("ratios") {
            if order < analyzer.highest_branch_order().expect("highest") {
                prop_assert!(ratio >= 2.0, "order {order}: {ratio}");
            } else {
                prop_assert!(ratio.is_nan());
            }
        }
    }

    #[test]
    fn diagrams_have_one_point_per_tip(spec in tree_spec(MAX_NODES)) {
        let graph = spec.graph();
        let tips = graph.tips().count();
        let analyzer = PersistenceAnalyzer::new(&graph);
        for descriptor in [Descriptor::Geodesic, Descriptor::Radial, Descriptor::Centrifugal, Descriptor::Y] {
            prop_assert_eq!(analyzer.diagram(descriptor).expect("diagram").len(), tips);
        }
    }

    #[test]
    fn geodesic_barcode_sums_to_cable_length(spec in tree_spec(MAX_NODES)) {
        let graph = spec.graph();
        let analyzer = PersistenceAnalyzer::new(&graph);
        let bars = analyzer.barcode(Descriptor::Geodesic).expect("barcode");
        prop_assert!(bars.iter().all(|&bar| bar >= 0.0));
        let total: f64 = bars.iter().sum();
        prop_assert!(close(total, graph.sum_edge_weights()), "{total} vs {}", graph.sum_edge_weights());
    }

    #[test]
    fn landscapes_have_fixed_shape(
        spec in tree_spec(MAX_NODES),
        num_landscapes in 1_usize..5,
        resolution in 1_usize..40,
    ) {
        let graph = spec.graph();
        let config = LandscapeConfig::try_new(num_landscapes, resolution).expect("config");
        let landscape = PersistenceAnalyzer::new(&graph)
            .landscape(Descriptor::Radial, config)
            .expect("landscape");
        prop_assert_eq!(landscape.values().len(), num_landscapes * resolution);
        prop_assert!(landscape.values().iter().all(|&value| value.is_finite() && value >= 0.0));
    }

    #[test]
    fn rerooting_keeps_the_cable(spec in tree_spec(MAX_NODES), pick in any::<prop::sample::Index>()) {
        let graph = spec.graph();
        let new_root = graph.vertex(graph.vertices().nth(pick.index(graph.len())).expect("in range")).id();
        let rerooted = graph.rerooted(new_root).expect("reroot");
        prop_assert_eq!(rerooted.len(), graph.len());
        prop_assert!(close(rerooted.sum_edge_weights(), graph.sum_edge_weights()));
        let bars: f64 = PersistenceAnalyzer::new(&rerooted)
            .barcode(Descriptor::Geodesic)
            .expect("barcode")
            .iter()
            .sum();
        prop_assert!(close(bars, graph.sum_edge_weights()));
    }
}

#[test]
fn generated_trees_have_a_single_root() {
    let spec = TreeSpec {
        parents: vec![None, Some(0), Some(0), Some(2)],
        positions: vec![ramify_core::Point3::ORIGIN; 4],
    };
    let graph = spec.graph();
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.vertex(graph.root()).id(), ramify_core::NodeId(0));
}
