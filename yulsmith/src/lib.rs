//! yulsmith
//!
//! Structured program generation and mutation for compiler fuzzing.
//!
//! The crate holds grammar trees that always denote syntactically legal
//! programs, applies seed-selected rewrites to them, and prints them as
//! source text. Two surfaces are provided:
//!
//! - [`yul`]: Yul objects, printed by [`yul::emit`].
//! - [`program`]: Solidity libraries, interfaces and contracts, printed by
//!   [`program::convert`] together with the expected outputs of their test
//!   functions.
//!
//! Every decision is drawn from a [`MinStdRand`] seeded by the caller, so a
//! (tree, seed) pair always produces the same tree and the same text.
//!
//! # Example
//!
//! ```rust,ignore
//! use yulsmith::{FuzzConfig, YulMutator, YulProgram};
//!
//! let config = FuzzConfig::default();
//! let mutator = YulMutator::yul(&config.mutation);
//! let mut program = YulProgram::default();
//! mutator.mutate_program(&mut program, 42);
//! let emitted = yulsmith::yul::emit_with_config(&program, &config.emit)?;
//! println!("{}", emitted.source);
//! ```

pub mod config;
pub mod enum_range;
pub mod error;
pub mod mutation;
pub mod printer;
pub mod program;
pub mod random;
pub mod yul;

pub use config::FuzzConfig;
pub use enum_range::{enum_from_seed, SeedEnum};
pub use error::{ConfigError, ConfigResult, EmitError, EmitResult};
pub use mutation::{Mutable, Mutator, Operator, PeriodTable, Tier};
pub use program::{ConvertedProgram, Program, ProgramMutator};
pub use random::MinStdRand;
pub use yul::{EmittedYul, YulMutator, YulProgram};
