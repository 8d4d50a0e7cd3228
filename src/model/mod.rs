//! Instruction and type models consumed by the analytical core.
//!
//! The core does not lift bytecode or extract metadata itself; those collaborators
//! hand over a linear three-address instruction sequence ([`MethodBody`]) and a
//! read-only type registry ([`TypeRegistry`]). This module fixes the shapes of
//! those interfaces.
//!
//! # Key Components
//!
//! - [`Instruction`] / [`InstructionKind`] - Tagged three-address instruction
//!   variants. The core inspects only the `label` and the kind discriminant;
//!   branch kinds additionally expose their `target` label.
//! - [`MethodBody`] - The ordered instruction sequence consumed by the CFG
//!   builder.
//! - [`TacType`] and the declaration records ([`ClassDef`], [`StructDef`],
//!   [`InterfaceDef`], [`EnumDef`], [`MethodDef`], [`FieldDef`]) - The type
//!   model referenced from instruction operands and method signatures.

mod instruction;
mod typesystem;

pub use instruction::{Instruction, InstructionKind, MethodBody};
pub use typesystem::{
    ClassDef, EnumDef, FieldDef, InterfaceDef, MethodDef, Parameter, StructDef, TacType,
    TypeDefinition, TypeRegistry,
};
