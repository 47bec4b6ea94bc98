//! Program mutation operator catalog.
//!
//! Rewrites on the library / interface / contract tree. Sampled with their
//! own period table, much sparser than the Yul surface's.

use crate::config::MutationConfig;
use crate::enum_range::enum_from_seed;
use crate::mutation::{Mutable, Mutator, Operator, PeriodTable, Tier};
use crate::random::MinStdRand;

use super::ast::{
    Contract, ContractBase, ContractFunction, ContractType, Interface, InterfaceFunction, Library,
    LibraryFunction, Program, TestKind,
};

/// Sampling periods of the program surface.
pub const PROGRAM_PERIODS: PeriodTable = PeriodTable {
    frequent: 23,
    occasional: 47,
    rare: 67,
};

/// Operators of the program surface, grouped by target kind.
#[derive(Debug)]
pub struct ProgramCatalog {
    pub program: Vec<Operator<Program>>,
    pub library: Vec<Operator<Library>>,
    pub library_function: Vec<Operator<LibraryFunction>>,
    pub contract: Vec<Operator<Contract>>,
    pub contract_function: Vec<Operator<ContractFunction>>,
    pub interface: Vec<Operator<Interface>>,
    pub interface_function: Vec<Operator<InterfaceFunction>>,
}

macro_rules! mutable_kind {
    ($($kind:ty => $field:ident),+ $(,)?) => {
        $(
            impl Mutable<ProgramCatalog> for $kind {
                fn operators(catalog: &ProgramCatalog) -> &[Operator<Self>] {
                    &catalog.$field
                }
            }
        )+
    };
}

mutable_kind! {
    Program => program,
    Library => library,
    LibraryFunction => library_function,
    Contract => contract,
    ContractFunction => contract_function,
    Interface => interface,
    InterfaceFunction => interface_function,
}

impl ProgramCatalog {
    pub fn new() -> Self {
        use Tier::{Frequent, Occasional, Rare};

        Self {
            program: vec![
                Operator::new("add_library", "Library added to program", Frequent, add_library),
                Operator::new("add_contract", "Contract added to program", Occasional, add_contract),
                Operator::new("add_interface", "Interface added to program", Rare, add_interface),
                Operator::new("remove_library", "Library removed from program", Rare, remove_library),
                Operator::new("flip_test_kind", "Test contract kind flipped", Occasional, flip_test_kind),
                Operator::new("reseed_test", "Test selection seed redrawn", Frequent, reseed_test),
            ],
            library: vec![
                Operator::new("add_library_function", "Function added to library", Frequent, add_library_function),
                Operator::new("remove_library_function", "Function removed from library", Occasional, remove_library_function),
            ],
            library_function: vec![
                Operator::new("toggle_library_test", "Library function test marker toggled", Frequent, toggle_library_test),
                Operator::new("mutate_library_visibility", "Library function visibility mutated", Occasional, mutate_library_visibility),
                Operator::new("mutate_library_mutability", "Library function mutability mutated", Occasional, mutate_library_mutability),
                Operator::new("mutate_library_return", "Library function return value mutated", Frequent, mutate_library_return),
            ],
            contract: vec![
                Operator::new("add_contract_function", "Function added to contract", Frequent, add_contract_function),
                Operator::new("toggle_abstract", "Contract abstractness toggled", Rare, toggle_abstract),
                Operator::new("add_interface_base", "Interface base added to contract", Rare, add_interface_base),
            ],
            contract_function: vec![
                Operator::new("toggle_contract_test", "Contract function test marker toggled", Frequent, toggle_contract_test),
                Operator::new("mutate_contract_visibility", "Contract function visibility mutated", Occasional, mutate_contract_visibility),
                Operator::new("mutate_contract_mutability", "Contract function mutability mutated", Occasional, mutate_contract_mutability),
                Operator::new("toggle_virtual", "Contract function virtual marker toggled", Rare, toggle_virtual),
                Operator::new("mutate_contract_return", "Contract function return value mutated", Frequent, mutate_contract_return),
            ],
            interface: vec![
                Operator::new("add_interface_function", "Function added to interface", Occasional, add_interface_function),
            ],
            interface_function: vec![
                Operator::new("mutate_interface_mutability", "Interface function mutability mutated", Occasional, mutate_interface_mutability),
            ],
        }
    }

    /// Total number of registered operators.
    pub fn len(&self) -> usize {
        self.program.len()
            + self.library.len()
            + self.library_function.len()
            + self.contract.len()
            + self.contract_function.len()
            + self.interface.len()
            + self.interface_function.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ProgramCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatcher for the program surface.
pub type ProgramMutator = Mutator<ProgramCatalog>;

impl Mutator<ProgramCatalog> {
    /// Creates a dispatcher over the full program catalog.
    pub fn program(config: &MutationConfig) -> Self {
        Mutator::new(ProgramCatalog::new(), PROGRAM_PERIODS, config)
    }

    /// Offers every node of `program` to the operators of its kind, children
    /// before parents, with per-node seeds drawn from `seed`. Returns the
    /// number of operators that fired.
    pub fn mutate_program(&self, program: &mut Program, seed: u32) -> usize {
        let mut seeds = MinStdRand::new(seed);
        let mut fired = 0;
        for unit in program.units.iter_mut() {
            fired += match unit {
                ContractType::Library(library) => self.walk_library(library, &mut seeds),
                ContractType::Interface(interface) => self.walk_interface(interface, &mut seeds),
                ContractType::Contract(contract) => self.walk_contract(contract, &mut seeds),
            };
        }
        fired + self.mutate(program, seeds.draw())
    }

    fn walk_library(&self, library: &mut Library, seeds: &mut MinStdRand) -> usize {
        let mut fired = 0;
        for function in library.functions.iter_mut() {
            fired += self.mutate(function, seeds.draw());
        }
        fired + self.mutate(library, seeds.draw())
    }

    fn walk_interface(&self, interface: &mut Interface, seeds: &mut MinStdRand) -> usize {
        let mut fired = 0;
        for base in interface.bases.iter_mut() {
            fired += self.walk_interface(base, seeds);
        }
        for function in interface.functions.iter_mut() {
            fired += self.mutate(function, seeds.draw());
        }
        fired + self.mutate(interface, seeds.draw())
    }

    fn walk_contract(&self, contract: &mut Contract, seeds: &mut MinStdRand) -> usize {
        let mut fired = 0;
        for base in contract.bases.iter_mut() {
            fired += match base {
                ContractBase::Contract(base) => self.walk_contract(base, seeds),
                ContractBase::Interface(base) => self.walk_interface(base, seeds),
            };
        }
        for function in contract.functions.iter_mut() {
            fired += self.mutate(function, seeds.draw());
        }
        fired + self.mutate(contract, seeds.draw())
    }
}

// Node construction

fn library_function(rng: &mut MinStdRand) -> LibraryFunction {
    LibraryFunction {
        visibility: enum_from_seed(rng.draw()),
        mutability: enum_from_seed(rng.draw()),
        is_test: rng.draw() % 2 == 0,
        returns: u64::from(rng.draw()),
    }
}

fn contract_function(rng: &mut MinStdRand) -> ContractFunction {
    ContractFunction {
        visibility: enum_from_seed(rng.draw()),
        mutability: enum_from_seed(rng.draw()),
        is_virtual: rng.draw() % 2 == 0,
        is_test: rng.draw() % 2 == 0,
        returns: u64::from(rng.draw()),
    }
}

fn interface_function(rng: &mut MinStdRand) -> InterfaceFunction {
    InterfaceFunction {
        mutability: enum_from_seed(rng.draw()),
    }
}

// Program

fn add_library(program: &mut Program, rng: &mut MinStdRand) {
    let functions = vec![library_function(rng)];
    program.units.push(ContractType::Library(Library { functions }));
}

fn add_contract(program: &mut Program, rng: &mut MinStdRand) {
    let functions = vec![contract_function(rng)];
    program.units.push(ContractType::Contract(Contract {
        functions,
        is_abstract: false,
        bases: Vec::new(),
    }));
}

fn add_interface(program: &mut Program, rng: &mut MinStdRand) {
    let functions = vec![interface_function(rng)];
    program.units.push(ContractType::Interface(Interface {
        functions,
        bases: Vec::new(),
    }));
}

fn remove_library(program: &mut Program, _rng: &mut MinStdRand) {
    if let Some(index) = program
        .units
        .iter()
        .position(|unit| matches!(unit, ContractType::Library(_)))
    {
        program.units.remove(index);
    }
}

fn flip_test_kind(program: &mut Program, _rng: &mut MinStdRand) {
    program.test.kind = match program.test.kind {
        TestKind::Library => TestKind::Contract,
        TestKind::Contract => TestKind::Library,
    };
}

fn reseed_test(program: &mut Program, rng: &mut MinStdRand) {
    program.seed = rng.draw();
}

// Library

fn add_library_function(library: &mut Library, rng: &mut MinStdRand) {
    library.functions.push(library_function(rng));
}

fn remove_library_function(library: &mut Library, rng: &mut MinStdRand) {
    if library.functions.is_empty() {
        return;
    }
    let index = rng.draw() as usize % library.functions.len();
    library.functions.remove(index);
}

fn toggle_library_test(function: &mut LibraryFunction, _rng: &mut MinStdRand) {
    function.is_test = !function.is_test;
}

fn mutate_library_visibility(function: &mut LibraryFunction, rng: &mut MinStdRand) {
    function.visibility = enum_from_seed(rng.draw());
}

fn mutate_library_mutability(function: &mut LibraryFunction, rng: &mut MinStdRand) {
    function.mutability = enum_from_seed(rng.draw());
}

fn mutate_library_return(function: &mut LibraryFunction, rng: &mut MinStdRand) {
    function.returns = u64::from(rng.draw());
}

// Contract

fn add_contract_function(contract: &mut Contract, rng: &mut MinStdRand) {
    contract.functions.push(contract_function(rng));
}

fn toggle_abstract(contract: &mut Contract, _rng: &mut MinStdRand) {
    contract.is_abstract = !contract.is_abstract;
}

fn add_interface_base(contract: &mut Contract, rng: &mut MinStdRand) {
    contract.bases.push(ContractBase::Interface(Interface {
        functions: vec![interface_function(rng)],
        bases: Vec::new(),
    }));
}

fn toggle_contract_test(function: &mut ContractFunction, _rng: &mut MinStdRand) {
    function.is_test = !function.is_test;
}

fn mutate_contract_visibility(function: &mut ContractFunction, rng: &mut MinStdRand) {
    function.visibility = enum_from_seed(rng.draw());
}

fn mutate_contract_mutability(function: &mut ContractFunction, rng: &mut MinStdRand) {
    function.mutability = enum_from_seed(rng.draw());
}

fn toggle_virtual(function: &mut ContractFunction, _rng: &mut MinStdRand) {
    function.is_virtual = !function.is_virtual;
}

fn mutate_contract_return(function: &mut ContractFunction, rng: &mut MinStdRand) {
    function.returns = u64::from(rng.draw());
}

// Interface

fn add_interface_function(interface: &mut Interface, rng: &mut MinStdRand) {
    interface.functions.push(interface_function(rng));
}

fn mutate_interface_mutability(function: &mut InterfaceFunction, rng: &mut MinStdRand) {
    function.mutability = enum_from_seed(rng.draw());
}
