//! Library / interface / contract program tree.
//!
//! Base contracts and interfaces are owned by value, so every node is a
//! distinct program unit with its own name when converted, and the tree can
//! never contain an inheritance cycle.

use serde::{Deserialize, Serialize};

crate::seed_enum! {
    #[derive(Default)]
    pub enum Visibility {
        #[default]
        Public = 0,
        External = 1,
        Internal = 2,
        Private = 3,
    }
}

impl Visibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::External => "external",
            Visibility::Internal => "internal",
            Visibility::Private => "private",
        }
    }

    /// Whether the function can be called on a deployed instance.
    pub fn is_callable_externally(self) -> bool {
        matches!(self, Visibility::Public | Visibility::External)
    }
}

crate::seed_enum! {
    #[derive(Default)]
    pub enum Mutability {
        #[default]
        Pure = 0,
        View = 1,
        Payable = 2,
        NonPayable = 3,
    }
}

impl Mutability {
    /// Keyword as written in a function header; non-payable has none.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Mutability::Pure => Some("pure"),
            Mutability::View => Some("view"),
            Mutability::Payable => Some("payable"),
            Mutability::NonPayable => None,
        }
    }
}

crate::seed_enum! {
    /// Which test function the generated test contract exercises.
    #[derive(Default)]
    pub enum TestKind {
        #[default]
        Library = 0,
        Contract = 1,
    }
}

/// A whole program: the units to emit and the test to generate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub units: Vec<ContractType>,
    #[serde(default)]
    pub test: TestContract,
    /// Seed of the generator that picks the library under test.
    #[serde(default)]
    pub seed: u32,
}

impl Program {
    /// Iterates over the top-level libraries.
    pub fn libraries(&self) -> impl Iterator<Item = &Library> {
        self.units.iter().filter_map(|unit| match unit {
            ContractType::Library(library) => Some(library),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractType {
    Contract(Contract),
    Library(Library),
    Interface(Interface),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestContract {
    pub kind: TestKind,
}

/// A function returning a constant `uint`. `returns` is both the body's
/// return value and the expected output recorded for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryFunction {
    pub visibility: Visibility,
    pub mutability: Mutability,
    pub is_test: bool,
    pub returns: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub functions: Vec<LibraryFunction>,
}

impl Library {
    /// A library without functions can never be the library under test.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceFunction {
    pub mutability: Mutability,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub functions: Vec<InterfaceFunction>,
    pub bases: Vec<Interface>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFunction {
    pub visibility: Visibility,
    pub mutability: Mutability,
    pub is_virtual: bool,
    pub is_test: bool,
    pub returns: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractBase {
    Contract(Contract),
    Interface(Interface),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub functions: Vec<ContractFunction>,
    pub is_abstract: bool,
    pub bases: Vec<ContractBase>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enum_range::{enum_from_seed, SeedEnum};

    #[test]
    fn test_enum_ranges() {
        assert_eq!(Visibility::MAX, 3);
        assert_eq!(Mutability::MAX, 3);
        assert_eq!(TestKind::MAX, 1);
        assert_eq!(enum_from_seed::<Visibility>(6), Visibility::Internal);
    }

    #[test]
    fn test_libraries_skips_other_units() {
        let program = Program {
            units: vec![
                ContractType::Contract(Contract::default()),
                ContractType::Library(Library::default()),
                ContractType::Interface(Interface::default()),
            ],
            ..Program::default()
        };
        assert_eq!(program.libraries().count(), 1);
    }
}
