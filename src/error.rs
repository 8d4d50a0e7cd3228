use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The analytical core distinguishes between malformed input (surfaced through this type) and
/// internal invariant violations (assertion failures, which indicate a bug in the core itself
/// and terminate the analysis).
///
/// # Error Categories
///
/// ## Malformed Input
/// - [`Error::UnknownBranchTarget`] - Branch target label not present in the method body
/// - [`Error::EmptyMethodBody`] - Empty instruction sequence provided
///
/// ## Graph Errors
/// - [`Error::GraphError`] - Control flow graph construction or query failure
///
/// # Examples
///
/// ```rust
/// use tacscope::{CfgBuilder, Error, Instruction, MethodBody};
///
/// let body = MethodBody::new(vec![
///     Instruction::unconditional_branch("L0", "nowhere"),
/// ]);
///
/// match CfgBuilder::build(&body) {
///     Err(Error::UnknownBranchTarget { label }) => {
///         assert_eq!(label, "nowhere");
///     }
///     _ => panic!("expected an unknown branch target error"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A branch instruction names a target label that does not exist in the method body.
    ///
    /// The builder validates all branch targets before creating any nodes, so no
    /// partial graph is ever returned alongside this error.
    #[error("Branch target label '{label}' is not present in the instruction stream")]
    UnknownBranchTarget {
        /// The missing target label.
        label: String,
    },

    /// The method body contains no instructions.
    ///
    /// A graph consisting only of Entry and Exit carries no information, so the
    /// builder rejects empty bodies outright.
    #[error("Cannot build a control flow graph from an empty method body")]
    EmptyMethodBody,

    /// Generic control flow graph error.
    ///
    /// Used for graph construction and query failures that don't fit into
    /// other categories.
    #[error("{0}")]
    GraphError(String),
}
