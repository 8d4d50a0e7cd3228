//! Dataflow analysis trait and result container.
//!
//! This module defines the core abstraction for dataflow analyses. A specific
//! analysis (reaching definitions, liveness, ...) implements the
//! [`DataFlowAnalysis`] trait; the [`DataFlowSolver`](crate::DataFlowSolver)
//! then iterates it to a fixed point in either direction.

use crate::analysis::cfg::{CfgNode, NodeId};
use crate::analysis::dataflow::lattice::MeetSemiLattice;

/// A dataflow analysis over the control flow graph.
///
/// Implementations supply the lattice values and the transfer function; the
/// solver owns the iteration. The direction is not part of the analysis:
/// [`solve_forward`](crate::DataFlowSolver::solve_forward) and
/// [`solve_backward`](crate::DataFlowSolver::solve_backward) are distinct
/// entry points, and an analysis is written for one of them.
///
/// # Transfer Functions
///
/// For a forward analysis: `out[N] = transfer(N, in[N])`, where `in[N]` is
/// the meet over all predecessor outputs.
///
/// For a backward analysis: `in[N] = transfer(N, out[N])`, where `out[N]` is
/// the meet over all successor inputs.
///
/// The transfer function must be monotonic with respect to the lattice order;
/// this is a documented contract, not a runtime check.
pub trait DataFlowAnalysis {
    /// The lattice type for this analysis.
    type Lattice: MeetSemiLattice;

    /// Returns the value at the boundary of the method.
    ///
    /// For forward analyses this is the value at the entry node; for backward
    /// analyses, the value at the exit node.
    fn boundary(&self, node: &CfgNode) -> Self::Lattice;

    /// Returns the starting value for non-boundary nodes.
    ///
    /// For most analyses this is the top element of the lattice (no
    /// information).
    fn initial(&self, node: &CfgNode) -> Self::Lattice;

    /// Computes the transfer function for a node.
    ///
    /// Given the value flowing into the node (forward) or out of it
    /// (backward), computes the value after flowing through the node.
    fn transfer(&self, node: &CfgNode, input: &Self::Lattice) -> Self::Lattice;
}

/// Results of a dataflow analysis: one input and one output value per node,
/// indexed by node id.
///
/// Nodes the solver never visited (unreachable from the boundary in the
/// relevant direction) keep their initial values.
#[derive(Debug, Clone)]
pub struct AnalysisResults<L> {
    in_states: Vec<L>,
    out_states: Vec<L>,
    passes: usize,
}

impl<L> AnalysisResults<L> {
    pub(crate) fn new(in_states: Vec<L>, out_states: Vec<L>, passes: usize) -> Self {
        Self {
            in_states,
            out_states,
            passes,
        }
    }

    /// Returns the input state of the node.
    ///
    /// # Panics
    ///
    /// Panics if the node does not belong to the analysed graph.
    #[must_use]
    pub fn input(&self, node: NodeId) -> &L {
        &self.in_states[node.index()]
    }

    /// Returns the output state of the node.
    ///
    /// # Panics
    ///
    /// Panics if the node does not belong to the analysed graph.
    #[must_use]
    pub fn output(&self, node: NodeId) -> &L {
        &self.out_states[node.index()]
    }

    /// Returns the number of nodes covered by these results.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.in_states.len()
    }

    /// Returns the number of full sweeps the solver performed, including the
    /// final sweep that detected the fixed point.
    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes
    }
}
