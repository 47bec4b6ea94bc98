//! The program surface: Solidity libraries, interfaces and contracts with
//! generated test functions.

pub mod ast;
pub mod convert;
pub mod generate;
pub mod mutators;

pub use ast::{
    Contract, ContractBase, ContractFunction, ContractType, Interface, InterfaceFunction, Library,
    LibraryFunction, Mutability, Program, TestContract, TestKind, Visibility,
};
pub use convert::{
    convert, convert_with_config, ContractTests, ConvertedProgram, LibraryTest, ProgramConverter,
};
pub use mutators::{ProgramCatalog, ProgramMutator, PROGRAM_PERIODS};
