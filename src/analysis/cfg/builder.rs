//! Two-pass control flow graph construction.
//!
//! The builder consumes a [`MethodBody`] and produces a
//! [`ControlFlowGraph`] with one basic block per leader:
//!
//! 1. **Leader identification** - scan the instruction stream and create one
//!    node per distinct leader label. An instruction leads a block when it
//!    follows a branch or return, when it opens a protected region or handler
//!    (Try/Catch/Finally), or when it is a branch target.
//! 2. **Node connection** - walk the stream again, appending instructions to
//!    the current block and inserting fall-through, branch, and return edges.
//!
//! Branch targets are validated up front: a target label missing from the
//! stream fails the build without returning a partial graph.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    analysis::cfg::{ControlFlowGraph, NodeId},
    model::{InstructionKind, MethodBody},
    Error, Result,
};

/// Builds control flow graphs from method bodies.
///
/// # Examples
///
/// ```rust
/// use tacscope::{CfgBuilder, Instruction, MethodBody};
///
/// let body = MethodBody::new(vec![
///     Instruction::assignment("L0", "x", ["a"]),
///     Instruction::conditional_branch("L1", "L3"),
///     Instruction::assignment("L2", "y", ["x"]),
///     Instruction::assignment("L3", "z", ["x"]),
/// ]);
///
/// let cfg = CfgBuilder::build(&body)?;
/// // Entry, Exit, and three basic blocks: L0, L2, L3.
/// assert_eq!(cfg.node_count(), 5);
/// # Ok::<(), tacscope::Error>(())
/// ```
pub struct CfgBuilder;

impl CfgBuilder {
    /// Builds the control flow graph for `body`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMethodBody`] for an empty instruction sequence and
    /// [`Error::UnknownBranchTarget`] when a branch names a label not present
    /// in the sequence. No partial graph is returned on error.
    pub fn build(body: &MethodBody) -> Result<ControlFlowGraph> {
        if body.is_empty() {
            return Err(Error::EmptyMethodBody);
        }

        let labels: FxHashSet<&str> = body.instructions().iter().map(|i| i.label()).collect();
        for instr in body.instructions() {
            if let Some(target) = instr.branch_target() {
                if !labels.contains(target) {
                    return Err(Error::UnknownBranchTarget {
                        label: target.to_owned(),
                    });
                }
            }
        }

        let mut cfg = ControlFlowGraph::new();
        let leaders = Self::identify_leaders(&mut cfg, body);
        Self::connect_nodes(&mut cfg, &leaders, body);
        Ok(cfg)
    }

    /// Pass 1: creates one basic block per distinct leader label.
    ///
    /// Node ids are assigned in encounter order, so a branch target seen
    /// before its own position in the stream claims its id early.
    fn identify_leaders<'a>(
        cfg: &mut ControlFlowGraph,
        body: &'a MethodBody,
    ) -> FxHashMap<&'a str, NodeId> {
        let mut leaders: FxHashMap<&'a str, NodeId> = FxHashMap::default();
        let mut next_is_leader = true;

        for instr in body.instructions() {
            if next_is_leader || instr.is_handler_start() {
                next_is_leader = false;
                leaders
                    .entry(instr.label())
                    .or_insert_with(|| cfg.add_block());
            }

            if let Some(target) = instr.branch_target() {
                leaders.entry(target).or_insert_with(|| cfg.add_block());
                next_is_leader = true;
            } else if matches!(instr.kind(), InstructionKind::Return) {
                next_is_leader = true;
            }
        }

        leaders
    }

    /// Pass 2: appends instructions to their blocks and inserts the edges.
    fn connect_nodes(
        cfg: &mut ControlFlowGraph,
        leaders: &FxHashMap<&str, NodeId>,
        body: &MethodBody,
    ) {
        let exit = cfg.exit();
        let mut current = cfg.entry();
        let mut connect_with_previous = true;

        for instr in body.instructions() {
            if let Some(&node) = leaders.get(instr.label()) {
                let previous = current;
                current = node;
                if connect_with_previous {
                    cfg.connect(previous, current);
                }
                connect_with_previous = true;
            }

            cfg.node_mut(current).instructions.push(instr.clone());

            match instr.kind() {
                InstructionKind::UnconditionalBranch { target } => {
                    cfg.connect(current, leaders[target.as_str()]);
                    connect_with_previous = false;
                }
                InstructionKind::ConditionalBranch { target }
                | InstructionKind::ExceptionalBranch { target } => {
                    cfg.connect(current, leaders[target.as_str()]);
                }
                // TODO: a return inside a finally block should reach the
                // handler chain rather than the exit directly.
                InstructionKind::Return => {
                    cfg.connect(current, exit);
                }
                _ => {}
            }
        }

        cfg.connect(current, exit);
    }
}
