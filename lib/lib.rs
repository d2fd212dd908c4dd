//! Absint: an abstract interpretation library in Rust.
//!
//! Absint provides the building blocks for writing static analyses by
//! abstract interpretation. A quick synopsis of its modules:
//!
//! * **domain** - The abstract domain algebra: lattice contracts, a
//!   scaffolding combinator which factors out the Top/Bottom case analysis,
//!   and ready-made powerset and interval domains.
//! * **fixed_point** - A fixed-point engine which runs a client-supplied
//!   transfer function over a graph until the abstract states stabilize.
//! * **graph** - A simple directed graph library, usable as the control-flow
//!   graph handed to the fixed-point engine.
//! * **wto** - Weak topological orderings of directed graphs, the iteration
//!   strategy used by the fixed-point engine.
//!
//! Clients plug in by defining a domain, either directly against the
//! [`domain::AbstractDomain`] trait or by lifting a
//! [`domain::AbstractValue`] through [`domain::Scaffolding`], and by
//! implementing [`fixed_point::FixedPointAnalysis`] for their transfer
//! function:
//!
//! ```
//! use absint::domain::PowersetDomain;
//! use absint::fixed_point::{FixedPointAnalysis, MonotonicFixpointIterator};
//! use absint::graph::Graph;
//!
//! // Each node of this graph contributes its own index to a set.
//! struct CollectIndices;
//!
//! impl FixedPointAnalysis<usize, PowersetDomain<usize>> for CollectIndices {
//!     fn analyze_node(&self, node: &usize, state: &mut PowersetDomain<usize>) {
//!         state.insert(*node);
//!     }
//! }
//!
//! let mut graph: Graph<usize, (usize, usize)> = Graph::new();
//! graph.insert_vertex(0).unwrap();
//! graph.insert_vertex(1).unwrap();
//! graph.insert_edge((0, 1)).unwrap();
//!
//! let mut iterator = MonotonicFixpointIterator::new(
//!     CollectIndices,
//!     0,
//!     |node| graph.successor_indices(*node).unwrap(),
//!     |node| graph.predecessor_indices(*node).unwrap(),
//! );
//! iterator.run(PowersetDomain::default());
//!
//! assert!(iterator.get_exit_state_at(&1).contains(&0));
//! assert!(iterator.get_exit_state_at(&1).contains(&1));
//! ```

pub mod domain;
pub mod fixed_point;
pub mod graph;
pub mod wto;

#[cfg(test)]
mod tests;

/// Absint error types.
pub mod error {
    /// An error raised by the graph library.
    ///
    /// The fixed-point engine itself never fails; all structural misuse is
    /// reported where the graph is built and queried.
    #[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
    pub enum Error {
        /// A vertex was not found in a graph
        #[error("The vertex id {0} does not exist in the graph")]
        GraphVertexNotFound(usize),
        /// An edge was not found in a graph
        #[error("The edge with head {0} and tail {1} does not exist in the graph")]
        GraphEdgeNotFound(usize, usize),
        #[error("{0}")]
        Custom(String),
    }

    impl From<&str> for Error {
        fn from(message: &str) -> Error {
            Error::Custom(message.to_string())
        }
    }

    pub type Result<T> = std::result::Result<T, Error>;
}

pub use error::{Error, Result};
