//! Iterative fixed-point dataflow solver.
//!
//! The solver sweeps the graph in topological order until a whole sweep
//! changes nothing. The forward variant walks the forward reverse-post-order
//! merging predecessor outputs; the backward variant walks the backward
//! ordering merging successor inputs. Reverse post-order makes acyclic
//! regions converge in a single sweep, so the total number of sweeps is
//! bounded by the lattice height along the graph's cycles.
//!
//! Nodes outside the respective ordering (unreachable from the boundary in
//! that direction) are never visited and keep their initial values.

use crate::analysis::cfg::ControlFlowGraph;
use crate::analysis::dataflow::framework::{AnalysisResults, DataFlowAnalysis};
use crate::analysis::dataflow::lattice::MeetSemiLattice;

/// Fixed-point solver for [`DataFlowAnalysis`] implementations.
///
/// The direction of the analysis is chosen by the entry point, not by the
/// analysis type: call [`solve_forward`](Self::solve_forward) for analyses
/// whose information flows from the entry (reaching definitions, constant
/// propagation) and [`solve_backward`](Self::solve_backward) for analyses
/// whose information flows from the exit (liveness, very busy expressions).
///
/// # Examples
///
/// ```rust
/// use tacscope::{
///     CfgBuilder, DataFlowSolver, Instruction, MethodBody, ReachingDefinitions,
/// };
///
/// let body = MethodBody::new(vec![
///     Instruction::assignment("L0", "x", ["a"]),
///     Instruction::assignment("L1", "y", ["x"]),
/// ]);
/// let mut cfg = CfgBuilder::build(&body)?;
///
/// let analysis = ReachingDefinitions::new(&cfg);
/// let results = DataFlowSolver::new(analysis).solve_forward(&mut cfg);
/// assert!(results.passes() >= 1);
/// # Ok::<(), tacscope::Error>(())
/// ```
pub struct DataFlowSolver<A: DataFlowAnalysis> {
    analysis: A,
}

impl<A: DataFlowAnalysis> DataFlowSolver<A> {
    /// Creates a solver for the given analysis.
    #[must_use]
    pub fn new(analysis: A) -> Self {
        Self { analysis }
    }

    /// Returns the analysis, consuming the solver.
    #[must_use]
    pub fn into_analysis(self) -> A {
        self.analysis
    }

    /// Borrows the analysis.
    #[must_use]
    pub fn analysis(&self) -> &A {
        &self.analysis
    }

    /// Runs the analysis forward, from the entry towards the exit.
    ///
    /// The entry's output is seeded with the boundary value and never
    /// recomputed; every other node starts from its initial value. The graph
    /// is only mutated to compute the cached forward ordering.
    pub fn solve_forward(&self, cfg: &mut ControlFlowGraph) -> AnalysisResults<A::Lattice> {
        let order = cfg.forward_order().to_vec();
        debug_assert_eq!(order.first(), Some(&cfg.entry()));

        let mut in_states: Vec<A::Lattice> =
            cfg.nodes().map(|n| self.analysis.initial(n)).collect();
        let mut out_states: Vec<A::Lattice> =
            cfg.nodes().map(|n| self.analysis.initial(n)).collect();

        let entry = cfg.entry();
        out_states[entry.index()] = self.analysis.boundary(cfg.node(entry));

        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;

            for &id in order.iter().skip(1) {
                let node = cfg.node(id);

                let mut input: Option<A::Lattice> = None;
                for &pred in node.predecessors() {
                    let pred_out = &out_states[pred.index()];
                    input = Some(match input {
                        None => pred_out.clone(),
                        Some(merged) => merged.meet(pred_out),
                    });
                }
                let input =
                    input.expect("entry-reachable node has at least one predecessor");

                let output = self.analysis.transfer(node, &input);
                in_states[id.index()] = input;

                if output != out_states[id.index()] {
                    out_states[id.index()] = output;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        AnalysisResults::new(in_states, out_states, passes)
    }

    /// Runs the analysis backward, from the exit towards the entry.
    ///
    /// The exit's input is seeded with the boundary value and never
    /// recomputed; every other node starts from its initial value. Nodes that
    /// cannot reach the exit are left untouched.
    pub fn solve_backward(&self, cfg: &mut ControlFlowGraph) -> AnalysisResults<A::Lattice> {
        let order = cfg.backward_order().to_vec();
        debug_assert_eq!(order.first(), Some(&cfg.exit()));

        let mut in_states: Vec<A::Lattice> =
            cfg.nodes().map(|n| self.analysis.initial(n)).collect();
        let mut out_states: Vec<A::Lattice> =
            cfg.nodes().map(|n| self.analysis.initial(n)).collect();

        let exit = cfg.exit();
        in_states[exit.index()] = self.analysis.boundary(cfg.node(exit));

        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;

            for &id in order.iter().skip(1) {
                let node = cfg.node(id);

                let mut output: Option<A::Lattice> = None;
                for &succ in node.successors() {
                    let succ_in = &in_states[succ.index()];
                    output = Some(match output {
                        None => succ_in.clone(),
                        Some(merged) => merged.meet(succ_in),
                    });
                }
                let output =
                    output.expect("exit-reaching node has at least one successor");

                let input = self.analysis.transfer(node, &output);
                out_states[id.index()] = output;

                if input != in_states[id.index()] {
                    in_states[id.index()] = input;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        AnalysisResults::new(in_states, out_states, passes)
    }
}
