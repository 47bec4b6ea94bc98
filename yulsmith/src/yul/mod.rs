//! The Yul surface: grammar tree, factories, fillers, operators, emitter
//! and generator.

pub mod ast;
pub mod emit;
pub mod factory;
pub mod fill;
pub mod generate;
pub mod mutators;

pub use ast::{Block, Expression, Literal, Statement, VarRef, YulProgram};
pub use emit::{emit, emit_with_config, EmittedYul};
pub use fill::{fill_args, fill_args_rec, is_filled, is_filled_deep};
pub use mutators::{YulCatalog, YulMutator, YUL_PERIODS};
