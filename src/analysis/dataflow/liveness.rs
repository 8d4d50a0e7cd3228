//! Live variable analysis.
//!
//! A variable is *live* at a program point if some path from that point uses
//! its current value before redefining it. This is the classic backward
//! may-analysis:
//!
//! - `USE[N]` = variables read in N before any definition in N
//! - `DEF[N]` = variables defined in N
//! - `OUT[N]` = ∪{IN[S] | S is a successor of N}
//! - `IN[N]`  = USE[N] ∪ (OUT[N] - DEF[N])
//!
//! Uses and definitions come from the operands and results of assignment
//! instructions; variables are tracked in a bit set indexed by first
//! appearance.

use fixedbitset::FixedBitSet;
use rustc_hash::FxHashMap;

use crate::analysis::cfg::{CfgNode, ControlFlowGraph};
use crate::analysis::dataflow::{framework::DataFlowAnalysis, lattice::MeetSemiLattice};
use crate::model::InstructionKind;

/// Live variable analysis over a control flow graph.
///
/// # Examples
///
/// ```rust
/// use tacscope::{CfgBuilder, DataFlowSolver, Instruction, LiveVariables, MethodBody};
///
/// let body = MethodBody::new(vec![
///     Instruction::assignment("L0", "x", ["a"]),
///     Instruction::assignment("L1", "y", ["x"]),
/// ]);
/// let mut cfg = CfgBuilder::build(&body)?;
///
/// let analysis = LiveVariables::new(&cfg);
/// let a = analysis.variable_index("a").unwrap();
/// let results = DataFlowSolver::new(analysis).solve_backward(&mut cfg);
///
/// // `a` is read before any definition, so it is live at method entry.
/// assert!(results.input(cfg.entry()).contains(a));
/// # Ok::<(), tacscope::Error>(())
/// ```
pub struct LiveVariables {
    variables: Vec<String>,
    use_sets: Vec<FixedBitSet>,
    def_sets: Vec<FixedBitSet>,
}

impl LiveVariables {
    /// Prepares the analysis for `cfg` by indexing all variables and
    /// precomputing per-node USE and DEF sets.
    #[must_use]
    pub fn new(cfg: &ControlFlowGraph) -> Self {
        // First walk: assign every variable a stable index by first appearance.
        let mut variables: Vec<String> = Vec::new();
        let mut index_of: FxHashMap<String, usize> = FxHashMap::default();
        for node in cfg.nodes() {
            for instr in node.instructions() {
                if let InstructionKind::Assignment { result, operands } = instr.kind() {
                    for name in operands.iter().chain(std::iter::once(result)) {
                        if !index_of.contains_key(name) {
                            index_of.insert(name.clone(), variables.len());
                            variables.push(name.clone());
                        }
                    }
                }
            }
        }

        let variable_count = variables.len();
        let mut use_sets = Vec::with_capacity(cfg.node_count());
        let mut def_sets = Vec::with_capacity(cfg.node_count());

        for node in cfg.nodes() {
            let mut uses = FixedBitSet::with_capacity(variable_count);
            let mut defs = FixedBitSet::with_capacity(variable_count);

            for instr in node.instructions() {
                if let InstructionKind::Assignment { result, operands } = instr.kind() {
                    // Reads count as uses only when the block has not already
                    // redefined the variable.
                    for operand in operands {
                        let i = index_of[operand.as_str()];
                        if !defs.contains(i) {
                            uses.insert(i);
                        }
                    }
                    defs.insert(index_of[result.as_str()]);
                }
            }

            use_sets.push(uses);
            def_sets.push(defs);
        }

        Self {
            variables,
            use_sets,
            def_sets,
        }
    }

    /// Returns all tracked variable names, indexed by first appearance.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Returns the index of a variable, if it appears in the method.
    #[must_use]
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v == name)
    }
}

impl DataFlowAnalysis for LiveVariables {
    type Lattice = LivenessResult;

    fn boundary(&self, _node: &CfgNode) -> Self::Lattice {
        // Nothing is live after the method exits.
        LivenessResult {
            live: FixedBitSet::with_capacity(self.variables.len()),
        }
    }

    fn initial(&self, _node: &CfgNode) -> Self::Lattice {
        LivenessResult {
            live: FixedBitSet::with_capacity(self.variables.len()),
        }
    }

    fn transfer(&self, node: &CfgNode, output: &Self::Lattice) -> Self::Lattice {
        // IN = USE ∪ (OUT - DEF)
        let mut live = output.live.clone();
        live.difference_with(&self.def_sets[node.id().index()]);
        live.union_with(&self.use_sets[node.id().index()]);
        LivenessResult { live }
    }
}

/// The set of variables live at a single program point.
#[derive(Debug, Clone, PartialEq)]
pub struct LivenessResult {
    live: FixedBitSet,
}

impl LivenessResult {
    /// Returns `true` if the variable with the given index is live.
    #[must_use]
    pub fn contains(&self, variable: usize) -> bool {
        self.live.contains(variable)
    }

    /// Iterates over the indices of all live variables.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.live.ones()
    }

    /// Returns the number of live variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.count_ones(..)
    }

    /// Returns `true` if no variable is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MeetSemiLattice for LivenessResult {
    /// Union: a variable is live if it is live on any path.
    fn meet(&self, other: &Self) -> Self {
        let mut live = self.live.clone();
        live.union_with(&other.live);
        Self { live }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::{cfg::CfgBuilder, dataflow::solver::DataFlowSolver},
        model::{Instruction, MethodBody},
        NodeId,
    };

    fn build(instructions: Vec<Instruction>) -> ControlFlowGraph {
        CfgBuilder::build(&MethodBody::new(instructions)).expect("build should succeed")
    }

    #[test]
    fn test_dead_definition_is_not_live() {
        let mut cfg = build(vec![
            Instruction::assignment("L0", "x", ["a"]),
            Instruction::assignment("L1", "y", ["a"]),
            Instruction::assignment("L2", "z", ["y"]),
        ]);

        let analysis = LiveVariables::new(&cfg);
        let x = analysis.variable_index("x").unwrap();
        let y = analysis.variable_index("y").unwrap();
        let a = analysis.variable_index("a").unwrap();

        let results = DataFlowSolver::new(analysis).solve_backward(&mut cfg);

        // x is defined but never read, so it is live nowhere.
        let block_in = results.input(NodeId::new(2));
        assert!(block_in.contains(a));
        assert!(!block_in.contains(x));
        // y is defined before its use inside the same block.
        assert!(!block_in.contains(y));
    }

    #[test]
    fn test_variable_used_after_loop_stays_live_through_it() {
        let mut cfg = build(vec![
            Instruction::assignment("L0", "i", ["i"]),
            Instruction::conditional_branch("L1", "L4"),
            Instruction::assignment("L2", "j", ["j"]),
            Instruction::unconditional_branch("L3", "L0"),
            Instruction::assignment("L4", "r", ["j"]),
        ]);

        let analysis = LiveVariables::new(&cfg);
        let j = analysis.variable_index("j").unwrap();
        let results = DataFlowSolver::new(analysis).solve_backward(&mut cfg);

        // j is read after the loop, so it is live at the loop header's entry.
        let header = NodeId::new(2);
        assert!(results.input(header).contains(j));
        assert!(results.input(cfg.entry()).contains(j));
    }

    #[test]
    fn test_branch_arms_merge_their_liveness() {
        let mut cfg = build(vec![
            Instruction::conditional_branch("L0", "L3"),
            Instruction::assignment("L1", "r", ["p"]),
            Instruction::unconditional_branch("L2", "L4"),
            Instruction::assignment("L3", "r", ["q"]),
            Instruction::assignment("L4", "s", ["r"]),
        ]);

        let analysis = LiveVariables::new(&cfg);
        let p = analysis.variable_index("p").unwrap();
        let q = analysis.variable_index("q").unwrap();
        let results = DataFlowSolver::new(analysis).solve_backward(&mut cfg);

        // Both p and q are live where the branches diverge.
        let branch = NodeId::new(2);
        assert!(results.output(branch).contains(p));
        assert!(results.output(branch).contains(q));
    }

    #[test]
    fn test_variable_indexing_is_stable() {
        let cfg = build(vec![
            Instruction::assignment("L0", "x", ["a", "b"]),
            Instruction::ret("L1"),
        ]);

        let analysis = LiveVariables::new(&cfg);
        assert_eq!(analysis.variables(), &["a", "b", "x"]);
        assert_eq!(analysis.variable_index("missing"), None);
    }
}
