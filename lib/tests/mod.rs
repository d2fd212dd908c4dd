//! End-to-end tests which run whole analyses through the fixed-point
//! engine.


use crate::domain::{
    AbstractDomain, Bound, IntervalDomain, IntervalValue, PowersetDomain,
};
use crate::fixed_point::{FixedPointAnalysis, MonotonicFixpointIterator};
use crate::graph::Graph;

fn graph_of(vertices: &[usize], edges: &[(usize, usize)]) -> Graph<usize, (usize, usize)> {
    let mut graph = Graph::new();
    for vertex in vertices {
        graph.insert_vertex(*vertex).unwrap();
    }
    for edge in edges {
        graph.insert_edge(*edge).unwrap();
    }
    graph
}

/// A transfer function which leaves every state untouched.
struct Identity;

impl<N, D: AbstractDomain> FixedPointAnalysis<N, D> for Identity {
    fn analyze_node(&self, _node: &N, _state: &mut D) {}
}

/// Each node appends its own literal to a set.
struct CollectLiterals(&'static [&'static str]);

impl FixedPointAnalysis<usize, PowersetDomain<&'static str>> for CollectLiterals {
    fn analyze_node(&self, node: &usize, state: &mut PowersetDomain<&'static str>) {
        state.insert(self.0[*node]);
    }
}

/// A counter which is initialized to zero at node 0 and incremented at
/// node 1, the head of a loop.
struct CounterAnalysis;

fn bump(bound: Bound) -> Bound {
    match bound {
        Bound::Finite(value) => Bound::Finite(value + 1),
        infinite => infinite,
    }
}

impl FixedPointAnalysis<usize, IntervalDomain> for CounterAnalysis {
    fn analyze_node(&self, node: &usize, state: &mut IntervalDomain) {
        match node {
            0 => *state = IntervalDomain::constant(0),
            1 => {
                if state.is_value() {
                    let incremented = IntervalValue::new(
                        bump(state.value().low()),
                        bump(state.value().high()),
                    );
                    state.set_to_value(incremented);
                }
            }
            _ => {}
        }
    }
}

#[test]
fn counter_loop_widens_to_an_unbounded_interval() {
    // 0 initializes the counter, 1 increments it and loops, 2 is the exit.
    let graph = graph_of(&[0, 1, 2], &[(0, 1), (1, 1), (1, 2)]);

    let mut iterator = MonotonicFixpointIterator::new(
        CounterAnalysis,
        0,
        |vertex| graph.successor_indices(*vertex).unwrap(),
        |vertex| graph.predecessor_indices(*vertex).unwrap(),
    );
    iterator.run(IntervalDomain::bottom());

    let at_head = iterator.get_entry_state_at(&1);
    assert!(at_head.equals(&IntervalDomain::bounded(
        Bound::Finite(0),
        Bound::PosInfinity
    )));

    // Past the increment the counter is at least one.
    let after_loop = iterator.get_entry_state_at(&2);
    assert!(after_loop.equals(&IntervalDomain::bounded(
        Bound::Finite(1),
        Bound::PosInfinity
    )));
}

#[test]
fn literal_chain_accumulates_a_prefix_at_every_node() {
    let literals: &[&str] = &["a", "b", "c", "d", "e"];
    let graph = graph_of(&[0, 1, 2, 3, 4], &[(0, 1), (1, 2), (2, 3), (3, 4)]);

    let mut iterator = MonotonicFixpointIterator::new(
        CollectLiterals(literals),
        0,
        |vertex| graph.successor_indices(*vertex).unwrap(),
        |vertex| graph.predecessor_indices(*vertex).unwrap(),
    );
    iterator.run(PowersetDomain::default());

    for node in 0..5 {
        let exit = iterator.get_exit_state_at(&node);
        assert_eq!(exit.len(), node + 1);
        for literal in &literals[..=node] {
            assert!(exit.contains(literal));
        }
    }

    let last = iterator.get_exit_state_at(&4);
    assert!(last.equals(&literals.iter().cloned().collect()));
}

#[test]
fn isolated_nodes_stay_bottom() {
    // Vertex 9 exists in the graph but no path from the root reaches it.
    let graph = graph_of(&[0, 1, 9], &[(0, 1)]);

    let mut iterator = MonotonicFixpointIterator::new(
        CollectLiterals(&["a", "b"]),
        0,
        |vertex| graph.successor_indices(*vertex).unwrap(),
        |vertex| graph.predecessor_indices(*vertex).unwrap(),
    );
    iterator.run(PowersetDomain::default());

    assert!(iterator.get_entry_state_at(&9).is_bottom());
    assert!(iterator.get_exit_state_at(&9).is_bottom());
    assert!(!iterator.get_exit_state_at(&1).is_bottom());
}

#[test]
fn seed_propagates_through_an_identity_analysis() {
    let graph = graph_of(&[0, 1, 2, 3], &[(0, 1), (0, 2), (1, 3), (2, 3)]);
    let seed: PowersetDomain<&'static str> = ["seed"].iter().cloned().collect();

    let mut iterator = MonotonicFixpointIterator::new(
        Identity,
        0,
        |vertex| graph.successor_indices(*vertex).unwrap(),
        |vertex| graph.predecessor_indices(*vertex).unwrap(),
    );
    iterator.run(seed.clone());

    for node in 0..4 {
        assert!(iterator.get_entry_state_at(&node).equals(&seed));
        assert!(iterator.get_exit_state_at(&node).equals(&seed));
    }
}

#[test]
fn reruns_are_deterministic() {
    let graph = graph_of(&[0, 1, 2, 3], &[(0, 1), (1, 2), (2, 1), (2, 3)]);
    let literals: &[&str] = &["a", "b", "c", "d"];

    let mut first = MonotonicFixpointIterator::new(
        CollectLiterals(literals),
        0,
        |vertex| graph.successor_indices(*vertex).unwrap(),
        |vertex| graph.predecessor_indices(*vertex).unwrap(),
    );
    first.run(PowersetDomain::default());

    let mut second = MonotonicFixpointIterator::new(
        CollectLiterals(literals),
        0,
        |vertex| graph.successor_indices(*vertex).unwrap(),
        |vertex| graph.predecessor_indices(*vertex).unwrap(),
    );
    second.run(PowersetDomain::default());

    for node in 0..4 {
        assert!(first
            .get_entry_state_at(&node)
            .equals(&second.get_entry_state_at(&node)));
        assert!(first
            .get_exit_state_at(&node)
            .equals(&second.get_exit_state_at(&node)));
    }
}

#[test]
fn larger_seeds_produce_larger_results() {
    let graph = graph_of(&[0, 1, 2, 3], &[(0, 1), (0, 2), (1, 3), (2, 3)]);
    let small: PowersetDomain<&'static str> = ["x"].iter().cloned().collect();
    let large: PowersetDomain<&'static str> = ["x", "y"].iter().cloned().collect();
    assert!(small.leq(&large));

    let mut with_small = MonotonicFixpointIterator::new(
        Identity,
        0,
        |vertex| graph.successor_indices(*vertex).unwrap(),
        |vertex| graph.predecessor_indices(*vertex).unwrap(),
    );
    with_small.run(small);

    let mut with_large = MonotonicFixpointIterator::new(
        Identity,
        0,
        |vertex| graph.successor_indices(*vertex).unwrap(),
        |vertex| graph.predecessor_indices(*vertex).unwrap(),
    );
    with_large.run(large);

    for node in 0..4 {
        assert!(with_small
            .get_entry_state_at(&node)
            .leq(&with_large.get_entry_state_at(&node)));
        assert!(with_small
            .get_exit_state_at(&node)
            .leq(&with_large.get_exit_state_at(&node)));
    }
}

#[test]
fn wto_of_the_analyzed_graph_is_exposed() {
    let graph = graph_of(&[0, 1, 2, 3], &[(0, 1), (1, 2), (2, 1), (2, 3)]);

    let iterator: MonotonicFixpointIterator<_, PowersetDomain<&'static str>, _, _> =
        MonotonicFixpointIterator::new(
            Identity,
            0,
            |vertex| graph.successor_indices(*vertex).unwrap(),
            |vertex| graph.predecessor_indices(*vertex).unwrap(),
        );

    assert_eq!(format!("{}", iterator.wto()), "0 (1 2) 3");
}
