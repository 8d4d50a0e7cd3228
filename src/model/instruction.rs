//! Three-address instruction model.
//!
//! Instructions arrive from the lifter as a linear sequence. Every instruction
//! carries a stable label that is unique within its method body; branch kinds
//! carry the label of their target. The analytical core treats everything else
//! as opaque payload.

use std::fmt;

/// The closed set of instruction kinds the analytical core distinguishes.
///
/// Only the discriminant and the branch targets matter for control flow
/// construction. Assignments additionally carry their defined variable and
/// used variables so that dataflow analyses shipping with this crate
/// (reaching definitions, liveness) have def/use information to work with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionKind {
    /// A three-address assignment `result = op(operands...)`.
    Assignment {
        /// The variable defined by this instruction.
        result: String,
        /// The variables read by this instruction.
        operands: Vec<String>,
    },
    /// An unconditional jump to `target`. No fall-through.
    UnconditionalBranch {
        /// Label of the jump target.
        target: String,
    },
    /// A conditional jump to `target` with fall-through to the next instruction.
    ConditionalBranch {
        /// Label of the jump target.
        target: String,
    },
    /// A jump to an exception handler at `target`, with fall-through.
    ExceptionalBranch {
        /// Label of the handler target.
        target: String,
    },
    /// Method return. Control transfers to the exit node.
    Return,
    /// Start of a protected region. Always begins a basic block.
    Try,
    /// Start of a catch handler. Always begins a basic block.
    Catch,
    /// Start of a finally handler. Always begins a basic block.
    Finally,
    /// Any instruction without control flow significance.
    Other,
}

/// A single three-address instruction.
///
/// # Examples
///
/// ```rust
/// use tacscope::Instruction;
///
/// let i = Instruction::conditional_branch("L4", "L9");
/// assert_eq!(i.label(), "L4");
/// assert_eq!(i.branch_target(), Some("L9"));
/// assert!(i.is_branch());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    label: String,
    kind: InstructionKind,
}

impl Instruction {
    /// Creates an instruction with the given label and kind.
    #[must_use]
    pub fn new(label: impl Into<String>, kind: InstructionKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    /// Creates an assignment instruction `result = op(operands...)`.
    #[must_use]
    pub fn assignment<I, S>(label: impl Into<String>, result: impl Into<String>, operands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            label,
            InstructionKind::Assignment {
                result: result.into(),
                operands: operands.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Creates an unconditional branch to `target`.
    #[must_use]
    pub fn unconditional_branch(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            label,
            InstructionKind::UnconditionalBranch {
                target: target.into(),
            },
        )
    }

    /// Creates a conditional branch to `target`.
    #[must_use]
    pub fn conditional_branch(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            label,
            InstructionKind::ConditionalBranch {
                target: target.into(),
            },
        )
    }

    /// Creates an exceptional branch to the handler at `target`.
    #[must_use]
    pub fn exceptional_branch(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            label,
            InstructionKind::ExceptionalBranch {
                target: target.into(),
            },
        )
    }

    /// Creates a return instruction.
    #[must_use]
    pub fn ret(label: impl Into<String>) -> Self {
        Self::new(label, InstructionKind::Return)
    }

    /// Creates an instruction without control flow significance.
    #[must_use]
    pub fn other(label: impl Into<String>) -> Self {
        Self::new(label, InstructionKind::Other)
    }

    /// Returns the label of this instruction.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the kind of this instruction.
    #[must_use]
    pub fn kind(&self) -> &InstructionKind {
        &self.kind
    }

    /// Returns the branch target label, or `None` for non-branch instructions.
    #[must_use]
    pub fn branch_target(&self) -> Option<&str> {
        match &self.kind {
            InstructionKind::UnconditionalBranch { target }
            | InstructionKind::ConditionalBranch { target }
            | InstructionKind::ExceptionalBranch { target } => Some(target),
            _ => None,
        }
    }

    /// Returns `true` for unconditional, conditional, and exceptional branches.
    #[must_use]
    pub fn is_branch(&self) -> bool {
        self.branch_target().is_some()
    }

    /// Returns `true` for instructions that open a protected region or handler.
    ///
    /// Try, Catch, and Finally instructions always start a new basic block.
    #[must_use]
    pub fn is_handler_start(&self) -> bool {
        matches!(
            self.kind,
            InstructionKind::Try | InstructionKind::Catch | InstructionKind::Finally
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            InstructionKind::Assignment { result, operands } => {
                write!(f, "{}: {} = {}", self.label, result, operands.join(", "))
            }
            InstructionKind::UnconditionalBranch { target } => {
                write!(f, "{}: goto {}", self.label, target)
            }
            InstructionKind::ConditionalBranch { target } => {
                write!(f, "{}: if ... goto {}", self.label, target)
            }
            InstructionKind::ExceptionalBranch { target } => {
                write!(f, "{}: on exception goto {}", self.label, target)
            }
            InstructionKind::Return => write!(f, "{}: return", self.label),
            InstructionKind::Try => write!(f, "{}: try", self.label),
            InstructionKind::Catch => write!(f, "{}: catch", self.label),
            InstructionKind::Finally => write!(f, "{}: finally", self.label),
            InstructionKind::Other => write!(f, "{}: nop", self.label),
        }
    }
}

/// The ordered instruction sequence of a single method.
///
/// This is the unit of input for [`CfgBuilder`](crate::CfgBuilder). Labels must
/// be unique within a body; branch targets must name labels present in the same
/// body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodBody {
    instructions: Vec<Instruction>,
}

impl MethodBody {
    /// Creates a method body from an instruction sequence.
    #[must_use]
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Returns the instructions in program order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the body contains no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
