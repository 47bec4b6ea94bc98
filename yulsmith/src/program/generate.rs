//! Grammar-based generation of program trees.

use arbitrary::{Arbitrary, Unstructured};

use crate::enum_range::enum_from_seed;

use super::ast::{
    Contract, ContractBase, ContractFunction, ContractType, Interface, InterfaceFunction, Library,
    LibraryFunction, Program, TestContract,
};

/// Maximum nesting of bases.
const MAX_DEPTH: u8 = 2;

/// Maximum number of units, functions or bases in one list.
const MAX_LIST_LEN: u8 = 4;

fn list_len(u: &mut Unstructured<'_>) -> arbitrary::Result<u8> {
    let len: u8 = u.arbitrary()?;
    Ok(len % (MAX_LIST_LEN + 1))
}

impl<'a> Arbitrary<'a> for Program {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let count = list_len(u)?;
        let mut units = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let choice: u8 = u.arbitrary()?;
            units.push(match choice % 3 {
                0 => ContractType::Library(library(u)?),
                1 => ContractType::Interface(interface_with_depth(u, 0)?),
                _ => ContractType::Contract(contract_with_depth(u, 0)?),
            });
        }

        Ok(Program {
            units,
            test: TestContract {
                kind: enum_from_seed(u.arbitrary()?),
            },
            seed: u.arbitrary()?,
        })
    }
}

fn library(u: &mut Unstructured<'_>) -> arbitrary::Result<Library> {
    let count = list_len(u)?;
    let mut functions = Vec::with_capacity(count as usize);
    for _ in 0..count {
        functions.push(LibraryFunction {
            visibility: enum_from_seed(u.arbitrary()?),
            mutability: enum_from_seed(u.arbitrary()?),
            is_test: u.arbitrary()?,
            returns: u.arbitrary()?,
        });
    }
    Ok(Library { functions })
}

fn interface_with_depth(u: &mut Unstructured<'_>, depth: u8) -> arbitrary::Result<Interface> {
    let count = list_len(u)?;
    let mut functions = Vec::with_capacity(count as usize);
    for _ in 0..count {
        functions.push(InterfaceFunction {
            mutability: enum_from_seed(u.arbitrary()?),
        });
    }

    let mut bases = Vec::new();
    if depth < MAX_DEPTH {
        for _ in 0..list_len(u)? % 2 {
            bases.push(interface_with_depth(u, depth + 1)?);
        }
    }
    Ok(Interface { functions, bases })
}

fn contract_with_depth(u: &mut Unstructured<'_>, depth: u8) -> arbitrary::Result<Contract> {
    let count = list_len(u)?;
    let mut functions = Vec::with_capacity(count as usize);
    for _ in 0..count {
        functions.push(ContractFunction {
            visibility: enum_from_seed(u.arbitrary()?),
            mutability: enum_from_seed(u.arbitrary()?),
            is_virtual: u.arbitrary()?,
            is_test: u.arbitrary()?,
            returns: u.arbitrary()?,
        });
    }

    let mut bases = Vec::new();
    if depth < MAX_DEPTH {
        for _ in 0..list_len(u)? % 3 {
            let base = if u.arbitrary()? {
                ContractBase::Contract(contract_with_depth(u, depth + 1)?)
            } else {
                ContractBase::Interface(interface_with_depth(u, depth + 1)?)
            };
            bases.push(base);
        }
    }

    Ok(Contract {
        functions,
        is_abstract: u.arbitrary()?,
        bases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::convert::convert;
    use crate::random::MinStdRand;

    #[test]
    fn test_generated_programs_convert() {
        for seed in 0..50 {
            let bytes = MinStdRand::new(seed).bytes(256);
            let mut u = Unstructured::new(&bytes);
            let program = Program::arbitrary(&mut u).unwrap();
            let converted = convert(&program).unwrap();
            assert!(converted.source.starts_with("// SPDX-License-Identifier"));
            if converted.uses_library {
                assert!(converted.library_name.is_some());
                assert!(!converted.library_tests.is_empty());
            }
        }
    }
}
