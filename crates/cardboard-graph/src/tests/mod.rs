//! Unit tests for the cardboard-graph crate.

mod graph_tests {
    use crate::error::GraphError;
    use crate::graph::DirectedGraph;

    #[test]
    fn empty_graph_has_no_nodes() {
        let graph: DirectedGraph<&str> = DirectedGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn adding_a_node_twice_is_a_no_op() {
        let mut graph = DirectedGraph::new();
        assert!(graph.add_node("economy"));
        assert!(!graph.add_node("economy"));
        assert_eq!(graph.node_count(), 1);
        assert!(graph.contains(&"economy"));
    }

    #[test]
    fn edges_require_both_endpoints() {
        let mut graph = DirectedGraph::new();
        graph.add_node("shop");

        let err = graph
            .add_edge(&"shop", &"economy")
            .expect_err("missing target should fail");
        assert_eq!(err, GraphError::unknown_node("economy"));

        let err = graph
            .add_edge(&"bank", &"shop")
            .expect_err("missing source should fail");
        assert_eq!(err, GraphError::unknown_node("bank"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut graph = DirectedGraph::new();
        graph.add_node("shop");
        graph.add_node("economy");
        assert!(graph.add_edge(&"shop", &"economy").expect("first edge"));
        assert!(!graph.add_edge(&"shop", &"economy").expect("second edge"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn adjacency_is_indexed_both_ways() {
        let mut graph = DirectedGraph::new();
        for node in ["shop", "economy", "database"] {
            graph.add_node(node);
        }
        graph.add_edge(&"shop", &"economy").expect("edge");
        graph.add_edge(&"shop", &"database").expect("edge");
        graph.add_edge(&"economy", &"database").expect("edge");

        let successors: Vec<_> = graph.successors(&"shop").copied().collect();
        assert_eq!(successors, vec!["economy", "database"]);

        let predecessors: Vec<_> = graph.predecessors(&"database").copied().collect();
        assert_eq!(predecessors, vec!["shop", "economy"]);
    }

    #[test]
    fn transitive_dependents_follow_reverse_edges() {
        let mut graph = DirectedGraph::new();
        for node in ["shop", "economy", "database", "motd"] {
            graph.add_node(node);
        }
        graph.add_edge(&"shop", &"economy").expect("edge");
        graph.add_edge(&"economy", &"database").expect("edge");

        assert_eq!(
            graph.transitive_dependents(&"database"),
            vec!["shop", "economy"]
        );
        assert!(graph.transitive_dependents(&"motd").is_empty());
        assert!(graph.transitive_dependents(&"unknown").is_empty());
    }
}

mod sort_tests {
    use rstest::rstest;

    use crate::error::GraphError;
    use crate::graph::DirectedGraph;
    use crate::sort::{dependency_order, topological_sort};

    fn graph_of(nodes: &[&'static str], edges: &[(&'static str, &'static str)]) -> DirectedGraph<&'static str> {
        let mut graph = DirectedGraph::new();
        for node in nodes {
            graph.add_node(*node);
        }
        for (from, to) in edges {
            graph.add_edge(from, to).expect("edge endpoints exist");
        }
        graph
    }

    fn position(order: &[&str], node: &str) -> usize {
        order
            .iter()
            .position(|candidate| *candidate == node)
            .expect("node present in order")
    }

    #[test]
    fn topological_sort_places_dependents_first() {
        let graph = graph_of(&["a", "b"], &[("a", "b")]);
        let order = topological_sort(&graph).expect("acyclic");
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn dependency_order_is_the_reverse() {
        let graph = graph_of(&["a", "b"], &[("a", "b")]);
        let order = dependency_order(&graph).expect("acyclic");
        assert_eq!(order, vec!["b", "a"]);
    }

    #[rstest]
    #[case::chain(&["a", "b", "c"], &[("a", "b"), ("b", "c")])]
    #[case::diamond(&["top", "left", "right", "bottom"], &[
        ("top", "left"),
        ("top", "right"),
        ("left", "bottom"),
        ("right", "bottom"),
    ])]
    #[case::inserted_backwards(&["c", "b", "a"], &[("a", "b"), ("b", "c")])]
    fn every_dependency_precedes_its_dependent(
        #[case] nodes: &[&'static str],
        #[case] edges: &[(&'static str, &'static str)],
    ) {
        let graph = graph_of(nodes, edges);
        let order = dependency_order(&graph).expect("acyclic");
        assert_eq!(order.len(), nodes.len());
        for (dependent, dependency) in edges {
            assert!(
                position(&order, dependency) < position(&order, dependent),
                "{dependency} should precede {dependent} in {order:?}"
            );
        }
    }

    #[test]
    fn ties_break_by_insertion_order() {
        let graph = graph_of(&["motd", "economy", "chat"], &[]);
        assert_eq!(
            topological_sort(&graph).expect("acyclic"),
            vec!["motd", "economy", "chat"]
        );
    }

    #[test]
    fn repeated_sorts_are_identical() {
        let edges = [("shop", "economy"), ("shop", "perms"), ("economy", "db")];
        let first = dependency_order(&graph_of(&["shop", "economy", "perms", "db"], &edges));
        for _ in 0..10 {
            let again = dependency_order(&graph_of(&["shop", "economy", "perms", "db"], &edges));
            assert_eq!(first, again);
        }
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let graph = graph_of(&["a"], &[("a", "a")]);
        let err = topological_sort(&graph).expect_err("self loop");
        assert_eq!(err, GraphError::cycle(vec!["a"]));
    }

    #[test]
    fn cycle_reports_members_in_edge_order() {
        let graph = graph_of(
            &["entry", "a", "b", "c"],
            &[("entry", "a"), ("a", "b"), ("b", "c"), ("c", "a")],
        );
        let err = dependency_order(&graph).expect_err("cycle");
        let cycle = err.cycle_members();
        assert_eq!(cycle.len(), 3);
        assert!(!cycle.contains(&"entry"));
        for (index, node) in cycle.iter().enumerate() {
            let next = cycle
                .get((index + 1) % cycle.len())
                .expect("cycle wraps around");
            assert!(
                graph.successors(node).any(|successor| successor == next),
                "{node} should have an edge to {next}"
            );
        }
    }

    #[test]
    fn cycle_error_renders_the_loop() {
        let err = GraphError::cycle(vec!["a", "b"]);
        assert_eq!(
            err.to_string(),
            "dependency cycle detected: \"a\" -> \"b\" -> \"a\""
        );
    }

    #[test]
    fn empty_graph_sorts_to_nothing() {
        let graph: DirectedGraph<u32> = DirectedGraph::new();
        assert!(topological_sort(&graph).expect("empty").is_empty());
    }
}
