//! A fixed-point engine for data-flow analysis.
//!
//! The engine computes, for every node reachable from a root, the abstract
//! state on entry to and on exit from the node, as the least fixpoint of a
//! client-supplied transfer function:
//!
//! * `entry(n)` is the join of the edge-transformed exit states of the
//!   predecessors of `n`, plus the seed at the root;
//! * `exit(n)` is `analyze_node` applied to `entry(n)`.
//!
//! Iteration follows a weak topological ordering of the graph: components
//! are stabilized innermost-first, and widening at component heads bounds
//! the number of passes even over lattices of infinite height.
//!
//! The graph is injected as a pair of callables, so a backward analysis is
//! just a forward analysis over the reversed accessors: pass the exit node
//! as the root and swap `successors` and `predecessors`.

use log::trace;
use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::domain::AbstractDomain;
use crate::wto::{WeakTopologicalOrdering, WtoComponent};

/// The number of times a component head is re-visited with a plain join
/// before the solver switches to widening.
const DEFAULT_WIDENING_DELAY: usize = 3;

/// The abstract semantics of one analysis.
///
/// The engine never inspects what a node contains; whatever instruction
/// model the host uses stays opaque behind `analyze_node`.
pub trait FixedPointAnalysis<N, D: AbstractDomain> {
    /// The transfer function: mutates `state` from the entry state at
    /// `node` to the exit state. Must be monotone; the solver does not
    /// detect violations, and a non-monotone transfer function forfeits
    /// termination.
    fn analyze_node(&self, node: &N, state: &mut D);

    /// Transforms the state carried by the edge from `source` to `target`,
    /// e.g. for branch-condition refinement. Defaults to the identity.
    fn analyze_edge(&self, source: &N, target: &N, exit_state_at_source: &D) -> D {
        let _ = (source, target);
        exit_state_at_source.clone()
    }
}

/// A solver which runs a [`FixedPointAnalysis`] over a graph until the
/// abstract states stabilize.
///
/// The solver owns the per-node entry and exit states; the graph accessors
/// are borrowed for as long as the solver lives. A single `run` is
/// synchronous and CPU-bound. Re-running replaces all prior results.
pub struct MonotonicFixpointIterator<N, D, A, FP>
where
    N: Clone + Debug + Eq + Hash,
    D: AbstractDomain,
    A: FixedPointAnalysis<N, D>,
    FP: Fn(&N) -> Vec<N>,
{
    analysis: A,
    root: N,
    predecessors: FP,
    widening_delay: usize,
    wto: WeakTopologicalOrdering<N>,
    entry_states: FxHashMap<N, D>,
    exit_states: FxHashMap<N, D>,
}

struct AnalysisState<N, D> {
    entry: FxHashMap<N, D>,
    exit: FxHashMap<N, D>,
}

impl<N, D, A, FP> MonotonicFixpointIterator<N, D, A, FP>
where
    N: Clone + Debug + Eq + Hash,
    D: AbstractDomain,
    A: FixedPointAnalysis<N, D>,
    FP: Fn(&N) -> Vec<N>,
{
    /// Creates a solver rooted at `root`.
    ///
    /// `successors` steps forward in the analysis direction and is consumed
    /// here to build the weak topological ordering; `predecessors` is the
    /// reverse step, used to join predecessor contributions on every visit.
    pub fn new(
        analysis: A,
        root: N,
        successors: impl Fn(&N) -> Vec<N>,
        predecessors: FP,
    ) -> MonotonicFixpointIterator<N, D, A, FP> {
        Self::with_widening_delay(analysis, root, successors, predecessors, DEFAULT_WIDENING_DELAY)
    }

    /// Like [`new`](Self::new), with control over how many join passes each
    /// component head gets before widening kicks in.
    pub fn with_widening_delay(
        analysis: A,
        root: N,
        successors: impl Fn(&N) -> Vec<N>,
        predecessors: FP,
        widening_delay: usize,
    ) -> MonotonicFixpointIterator<N, D, A, FP> {
        let wto = WeakTopologicalOrdering::new(root.clone(), successors);
        MonotonicFixpointIterator {
            analysis,
            root,
            predecessors,
            widening_delay,
            wto,
            entry_states: FxHashMap::default(),
            exit_states: FxHashMap::default(),
        }
    }

    /// Runs the analysis to a fixed point, seeding the entry state at the
    /// root with `seed` joined to Bottom. Prior results are discarded.
    pub fn run(&mut self, seed: D) {
        let mut state = AnalysisState {
            entry: FxHashMap::default(),
            exit: FxHashMap::default(),
        };
        for component in self.wto.components() {
            self.analyze_component(component, &seed, &mut state);
        }
        self.entry_states = state.entry;
        self.exit_states = state.exit;
    }

    /// The entry state computed for `node` by the last `run`, as a copy.
    /// Nodes the analysis never reached are Bottom.
    pub fn get_entry_state_at(&self, node: &N) -> D {
        self.entry_states
            .get(node)
            .cloned()
            .unwrap_or_else(D::bottom)
    }

    /// The exit state computed for `node` by the last `run`, as a copy.
    /// Nodes the analysis never reached are Bottom.
    pub fn get_exit_state_at(&self, node: &N) -> D {
        self.exit_states
            .get(node)
            .cloned()
            .unwrap_or_else(D::bottom)
    }

    /// The weak topological ordering the solver iterates over.
    pub fn wto(&self) -> &WeakTopologicalOrdering<N> {
        &self.wto
    }

    fn analyze_component(
        &self,
        component: &WtoComponent<N>,
        seed: &D,
        state: &mut AnalysisState<N, D>,
    ) {
        match component {
            WtoComponent::Vertex(vertex) => self.analyze_vertex(vertex, seed, state),
            WtoComponent::Component { head, components } => {
                let mut iteration = 0;
                loop {
                    let new_entry = self.compute_entry_state(head, seed, state);
                    let entry = if iteration == 0 {
                        new_entry
                    } else {
                        // Every pass after the first has stored an entry
                        // state for the head.
                        let current = &state.entry[head];
                        if new_entry.leq(current) {
                            // The head is stable, and with it the whole
                            // component: the last pass recomputed every
                            // member from this entry state.
                            break;
                        }
                        if iteration <= self.widening_delay {
                            current.join(&new_entry)
                        } else {
                            current.widening(&new_entry)
                        }
                    };
                    trace!(
                        "component head {:?}: iteration {} entry {:?}",
                        head,
                        iteration,
                        entry
                    );
                    let mut exit = entry.clone();
                    self.analysis.analyze_node(head, &mut exit);
                    state.entry.insert(head.clone(), entry);
                    state.exit.insert(head.clone(), exit);
                    for inner in components {
                        self.analyze_component(inner, seed, state);
                    }
                    iteration += 1;
                }
            }
        }
    }

    fn analyze_vertex(&self, vertex: &N, seed: &D, state: &mut AnalysisState<N, D>) {
        let entry = self.compute_entry_state(vertex, seed, state);
        let mut exit = entry.clone();
        self.analysis.analyze_node(vertex, &mut exit);
        state.entry.insert(vertex.clone(), entry);
        state.exit.insert(vertex.clone(), exit);
    }

    /// Joins the edge-transformed exit states of every analyzed
    /// predecessor, plus the seed at the root. Predecessors the analysis
    /// has not reached (exit state absent or Bottom) contribute nothing and
    /// are not run through `analyze_edge`.
    fn compute_entry_state(&self, vertex: &N, seed: &D, state: &AnalysisState<N, D>) -> D {
        let mut entry = D::bottom();
        if *vertex == self.root {
            entry.join_with(seed);
        }
        for predecessor in (self.predecessors)(vertex) {
            if let Some(exit) = state.exit.get(&predecessor) {
                if !exit.is_bottom() {
                    entry.join_with(&self.analysis.analyze_edge(&predecessor, vertex, exit));
                }
            }
        }
        entry
    }
}
