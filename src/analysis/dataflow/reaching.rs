//! Reaching definitions analysis.
//!
//! A definition site (an assignment instruction) reaches a program point when
//! some path from the assignment to the point contains no other assignment to
//! the same variable. This is the classic forward may-analysis:
//!
//! - `GEN[N]` = definitions in N that survive to the end of N
//! - `KILL[N]` = every definition site of a variable that N assigns
//! - `IN[N]`  = ∪{OUT[P] | P is a predecessor of N}
//! - `OUT[N]` = GEN[N] ∪ (IN[N] - KILL[N])
//!
//! Definition sites are identified by the label of their assignment
//! instruction and tracked in a bit set indexed by discovery order.

use fixedbitset::FixedBitSet;
use rustc_hash::FxHashMap;

use crate::analysis::cfg::{CfgNode, ControlFlowGraph};
use crate::analysis::dataflow::{framework::DataFlowAnalysis, lattice::MeetSemiLattice};
use crate::model::InstructionKind;

/// A single definition site: an assignment instruction and the variable it
/// defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSite {
    /// The label of the defining instruction.
    pub label: String,
    /// The variable being defined.
    pub variable: String,
}

/// Reaching definitions analysis over a control flow graph.
///
/// # Examples
///
/// ```rust
/// use tacscope::{
///     CfgBuilder, DataFlowSolver, Instruction, MethodBody, NodeId, ReachingDefinitions,
/// };
///
/// let body = MethodBody::new(vec![
///     Instruction::assignment("L0", "x", ["a"]),
///     Instruction::assignment("L1", "x", ["x"]),
/// ]);
/// let mut cfg = CfgBuilder::build(&body)?;
///
/// let analysis = ReachingDefinitions::new(&cfg);
/// let results = DataFlowSolver::new(analysis).solve_forward(&mut cfg);
///
/// // Only the second definition of x survives the block.
/// let out = results.output(NodeId::new(2));
/// assert_eq!(out.len(), 1);
/// # Ok::<(), tacscope::Error>(())
/// ```
pub struct ReachingDefinitions {
    sites: Vec<DefinitionSite>,
    gen_sets: Vec<FixedBitSet>,
    kill_sets: Vec<FixedBitSet>,
}

impl ReachingDefinitions {
    /// Prepares the analysis for `cfg` by collecting all definition sites and
    /// precomputing per-node GEN and KILL sets.
    #[must_use]
    pub fn new(cfg: &ControlFlowGraph) -> Self {
        // Discover the definition sites in node, then instruction order.
        let mut sites = Vec::new();
        let mut sites_of_variable: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for node in cfg.nodes() {
            for instr in node.instructions() {
                if let InstructionKind::Assignment { result, .. } = instr.kind() {
                    sites_of_variable
                        .entry(result.clone())
                        .or_default()
                        .push(sites.len());
                    sites.push(DefinitionSite {
                        label: instr.label().to_owned(),
                        variable: result.clone(),
                    });
                }
            }
        }

        let site_count = sites.len();
        let mut gen_sets = Vec::with_capacity(cfg.node_count());
        let mut kill_sets = Vec::with_capacity(cfg.node_count());
        let mut next_site = 0;

        for node in cfg.nodes() {
            let mut latest_def: FxHashMap<&str, usize> = FxHashMap::default();
            let mut kill = FixedBitSet::with_capacity(site_count);

            for instr in node.instructions() {
                if let InstructionKind::Assignment { result, .. } = instr.kind() {
                    let site = next_site;
                    next_site += 1;
                    // A later definition in the same block shadows earlier ones.
                    latest_def.insert(result.as_str(), site);
                    for &other in &sites_of_variable[result.as_str()] {
                        kill.insert(other);
                    }
                }
            }

            let mut gen_set = FixedBitSet::with_capacity(site_count);
            for &site in latest_def.values() {
                gen_set.insert(site);
            }
            gen_sets.push(gen_set);
            kill_sets.push(kill);
        }

        Self {
            sites,
            gen_sets,
            kill_sets,
        }
    }

    /// Returns all definition sites in discovery order.
    #[must_use]
    pub fn sites(&self) -> &[DefinitionSite] {
        &self.sites
    }

    /// Returns the definition site with the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[must_use]
    pub fn site(&self, index: usize) -> &DefinitionSite {
        &self.sites[index]
    }

    /// Returns the site index of the definition at `label`, if any.
    #[must_use]
    pub fn site_of_label(&self, label: &str) -> Option<usize> {
        self.sites.iter().position(|s| s.label == label)
    }
}

impl DataFlowAnalysis for ReachingDefinitions {
    type Lattice = ReachingDefsResult;

    fn boundary(&self, _node: &CfgNode) -> Self::Lattice {
        // No definitions reach the method entry.
        ReachingDefsResult {
            defs: FixedBitSet::with_capacity(self.sites.len()),
        }
    }

    fn initial(&self, _node: &CfgNode) -> Self::Lattice {
        ReachingDefsResult {
            defs: FixedBitSet::with_capacity(self.sites.len()),
        }
    }

    fn transfer(&self, node: &CfgNode, input: &Self::Lattice) -> Self::Lattice {
        // OUT = GEN ∪ (IN - KILL)
        let mut defs = input.defs.clone();
        defs.difference_with(&self.kill_sets[node.id().index()]);
        defs.union_with(&self.gen_sets[node.id().index()]);
        ReachingDefsResult { defs }
    }
}

/// The set of definition sites reaching a single program point.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachingDefsResult {
    defs: FixedBitSet,
}

impl ReachingDefsResult {
    /// Returns `true` if the definition site with the given index reaches
    /// this point.
    #[must_use]
    pub fn contains(&self, site: usize) -> bool {
        self.defs.contains(site)
    }

    /// Iterates over the indices of all reaching definition sites.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.defs.ones()
    }

    /// Returns the number of reaching definition sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.count_ones(..)
    }

    /// Returns `true` if no definitions reach this point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MeetSemiLattice for ReachingDefsResult {
    /// Union: a definition reaches a join point if it reaches it from any
    /// predecessor.
    fn meet(&self, other: &Self) -> Self {
        let mut defs = self.defs.clone();
        defs.union_with(&other.defs);
        Self { defs }
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
    fn test_redefinition_kills_within_a_block() {
        let mut cfg = build(vec![
            Instruction::assignment("L0", "x", ["a"]),
            Instruction::assignment("L1", "x", ["x"]),
            Instruction::assignment("L2", "y", ["x"]),
        ]);

        let analysis = ReachingDefinitions::new(&cfg);
        let first_x = analysis.site_of_label("L0").unwrap();
        let second_x = analysis.site_of_label("L1").unwrap();
        let y = analysis.site_of_label("L2").unwrap();

        let results = DataFlowSolver::new(analysis).solve_forward(&mut cfg);

        let out = results.output(NodeId::new(2));
        assert!(!out.contains(first_x));
        assert!(out.contains(second_x));
        assert!(out.contains(y));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_both_branch_definitions_reach_the_merge() {
        // x defined in both arms of a diamond; both reach the merge point.
        let mut cfg = build(vec![
            Instruction::conditional_branch("L0", "L3"),
            Instruction::assignment("L1", "x", ["a"]),
            Instruction::unconditional_branch("L2", "L4"),
            Instruction::assignment("L3", "x", ["b"]),
            Instruction::assignment("L4", "y", ["x"]),
        ]);

        let analysis = ReachingDefinitions::new(&cfg);
        let then_def = analysis.site_of_label("L1").unwrap();
        let else_def = analysis.site_of_label("L3").unwrap();

        let results = DataFlowSolver::new(analysis).solve_forward(&mut cfg);

        // L4 starts the merge block; its node was created when the branch at
        // L2 named it as a target, after L1's block.
        let merge = NodeId::new(5);
        let merge_in = results.input(merge);
        assert!(merge_in.contains(then_def));
        assert!(merge_in.contains(else_def));
    }

    #[test]
    fn test_definition_survives_a_loop() {
        let mut cfg = build(vec![
            Instruction::assignment("L0", "i", ["a"]),
            Instruction::conditional_branch("L1", "L4"),
            Instruction::assignment("L2", "j", ["i"]),
            Instruction::unconditional_branch("L3", "L0"),
            Instruction::assignment("L4", "r", ["i"]),
        ]);

        let analysis = ReachingDefinitions::new(&cfg);
        let i_def = analysis.site_of_label("L0").unwrap();
        let results = DataFlowSolver::new(analysis).solve_forward(&mut cfg);

        // The definition of i flows around the back edge and out of the loop.
        let after = NodeId::new(3);
        assert!(results.input(after).contains(i_def));
    }

    #[test]
    fn test_site_discovery_order() {
        let cfg = build(vec![
            Instruction::assignment("L0", "x", ["a"]),
            Instruction::ret("L1"),
        ]);

        let analysis = ReachingDefinitions::new(&cfg);
        assert_eq!(analysis.sites().len(), 1);
        assert_eq!(analysis.site(0).label, "L0");
        assert_eq!(analysis.site(0).variable, "x");
        assert_eq!(analysis.site_of_label("L9"), None);
    }
}
