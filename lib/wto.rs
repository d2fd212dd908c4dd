//! Weak topological orderings of directed graphs.
//!
//! A weak topological ordering (WTO) arranges the vertices reachable from a
//! root so that every strongly connected subgraph is bracketed into a
//! component with a designated head. Fixpoint iterators stabilize
//! components innermost-first and apply widening at the heads, which is
//! what guarantees termination over lattices of infinite height.
//!
//! The construction is Bourdoncle's hierarchical decomposition:
//!
//!   F. Bourdoncle. Efficient chaotic iteration strategies with widenings.
//!   Formal Methods in Programming and their Applications, 1993.
//!
//! Irreducible graphs and self-loops need no special casing.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

/// One element of a weak topological ordering.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum WtoComponent<N> {
    /// A vertex which is not part of any cycle.
    Vertex(N),
    /// A strongly connected subgraph. The head is the single entry vertex
    /// of the subgraph in depth-first order; every cycle through the
    /// component passes through it, so widening there suffices.
    Component {
        head: N,
        components: Vec<WtoComponent<N>>,
    },
}

/// A weak topological ordering of the vertices reachable from a root.
///
/// Vertices unreachable from the root do not appear.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WeakTopologicalOrdering<N> {
    components: Vec<WtoComponent<N>>,
}

impl<N: Clone + Eq + Hash> WeakTopologicalOrdering<N> {
    /// Orders all vertices reachable from `root`, stepping through
    /// `successors`. Tie-breaks follow the order of the successor sequences
    /// the callable returns.
    pub fn new(root: N, successors: impl Fn(&N) -> Vec<N>) -> WeakTopologicalOrdering<N> {
        let mut builder = Builder {
            successors: &successors,
            dfn: FxHashMap::default(),
            stack: Vec::new(),
            num: 0,
        };
        let mut partition = VecDeque::new();
        builder.visit(&root, &mut partition);
        WeakTopologicalOrdering {
            components: partition.into_iter().collect(),
        }
    }

    /// The top-level components, in iteration order.
    pub fn components(&self) -> &[WtoComponent<N>] {
        &self.components
    }
}

impl<N: fmt::Display> fmt::Display for WtoComponent<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WtoComponent::Vertex(vertex) => write!(f, "{}", vertex),
            WtoComponent::Component { head, components } => {
                write!(f, "({}", head)?;
                for component in components {
                    write!(f, " {}", component)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl<N: fmt::Display> fmt::Display for WeakTopologicalOrdering<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut is_first = true;
        for component in &self.components {
            if !is_first {
                write!(f, " ")?;
            }
            write!(f, "{}", component)?;
            is_first = false;
        }
        Ok(())
    }
}

// Depth-first numbers double as visitation state: 0 marks an unvisited
// vertex, usize::MAX a vertex whose component has been emitted.
struct Builder<'a, N, F> {
    successors: &'a F,
    dfn: FxHashMap<N, usize>,
    stack: Vec<N>,
    num: usize,
}

impl<'a, N, F> Builder<'a, N, F>
where
    N: Clone + Eq + Hash,
    F: Fn(&N) -> Vec<N>,
{
    fn visit(&mut self, vertex: &N, partition: &mut VecDeque<WtoComponent<N>>) -> usize {
        self.stack.push(vertex.clone());
        self.num += 1;
        let number = self.num;
        self.dfn.insert(vertex.clone(), number);

        let mut head = number;
        let mut is_loop = false;
        for successor in (self.successors)(vertex) {
            let successor_dfn = self.dfn.get(&successor).cloned().unwrap_or(0);
            let min = if successor_dfn == 0 {
                self.visit(&successor, partition)
            } else {
                successor_dfn
            };
            if min <= head {
                head = min;
                is_loop = true;
            }
        }

        if head == number {
            self.dfn.insert(vertex.clone(), usize::MAX);
            let mut element = self.stack.pop().unwrap();
            if is_loop {
                while element != *vertex {
                    // Members are re-numbered when the component is built.
                    self.dfn.insert(element, 0);
                    element = self.stack.pop().unwrap();
                }
                partition.push_front(self.component(vertex));
            } else {
                partition.push_front(WtoComponent::Vertex(vertex.clone()));
            }
        }
        head
    }

    fn component(&mut self, head: &N) -> WtoComponent<N> {
        let mut partition = VecDeque::new();
        for successor in (self.successors)(head) {
            if self.dfn.get(&successor).cloned().unwrap_or(0) == 0 {
                self.visit(&successor, &mut partition);
            }
        }
        WtoComponent::Component {
            head: head.clone(),
            components: partition.into_iter().collect(),
        }
    }
}
