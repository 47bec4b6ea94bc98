//! Program tree to Solidity conversion.
//!
//! Every library, interface and contract gets a name `<prefix><suffix>`
//! from one suffix counter per conversion (`L0`, `I1`, `C2`, ...); functions
//! are numbered `f_0`, `f_1`, ... across the whole program. While walking
//! the tree the converter records the test functions it meets, then appends
//! a test contract `C` whose `test()` returns zero when every checked call
//! produced its expected output.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use crate::config::FuzzConfig;
use crate::error::{EmitError, EmitResult};
use crate::printer::Printer;
use crate::random::MinStdRand;

use super::ast::{
    Contract, ContractBase, ContractFunction, ContractType, Interface, Library, LibraryFunction,
    Mutability, Program, TestKind, Visibility,
};

/// Maximum nesting of base contracts and interfaces.
pub const MAX_INHERITANCE_DEPTH: usize = 32;

/// Name of the generated test contract.
pub const TEST_CONTRACT_NAME: &str = "C";

/// Name of the generated test function.
pub const TEST_FUNCTION_NAME: &str = "test";

/// A library function whose output is checked by a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryTest {
    pub library: String,
    pub function: String,
    pub expected: String,
}

/// Contract name to test function name to expected output.
pub type ContractTests = IndexMap<String, IndexMap<String, String>>;

/// Result of converting one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertedProgram {
    pub source: String,
    pub library_tests: Vec<LibraryTest>,
    pub contract_tests: ContractTests,
    /// Whether the test contract calls a library function.
    pub uses_library: bool,
    /// The library under test, if `uses_library` is set.
    pub library_name: Option<String>,
}

impl ConvertedProgram {
    /// blake3 digest of the source text, as lowercase hex.
    pub fn fingerprint(&self) -> String {
        blake3::hash(self.source.as_bytes()).to_hex().to_string()
    }
}

/// Converts `program` with the default configuration.
pub fn convert(program: &Program) -> EmitResult<ConvertedProgram> {
    convert_with_config(program, &FuzzConfig::default())
}

/// Converts `program` to Solidity source plus its test triples.
pub fn convert_with_config(program: &Program, config: &FuzzConfig) -> EmitResult<ConvertedProgram> {
    ProgramConverter::new(config).convert(program)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum UnitKind {
    Contract,
    Library,
    Interface,
}

impl UnitKind {
    fn prefix(self) -> &'static str {
        match self {
            UnitKind::Contract => "C",
            UnitKind::Library => "L",
            UnitKind::Interface => "I",
        }
    }
}

/// Identity of a borrowed tree node for the duration of one conversion.
type NodeKey = (UnitKind, usize);

fn node_key<T>(kind: UnitKind, node: &T) -> NodeKey {
    (kind, node as *const T as usize)
}

/// Converter state for one program.
pub struct ProgramConverter<'a> {
    config: &'a FuzzConfig,
    printer: Printer,
    names: FxHashMap<NodeKey, String>,
    /// Functions declared by each interface, inherited ones included.
    interface_functions: FxHashMap<NodeKey, Vec<(String, Mutability)>>,
    next_suffix: u32,
    next_function: u32,
    library_tests: Vec<LibraryTest>,
    contract_tests: ContractTests,
    uses_library: bool,
    library_name: Option<String>,
}

impl<'a> ProgramConverter<'a> {
    pub fn new(config: &'a FuzzConfig) -> Self {
        Self {
            config,
            printer: Printer::new(config.emit.indent_str()),
            names: FxHashMap::default(),
            interface_functions: FxHashMap::default(),
            next_suffix: 0,
            next_function: 0,
            library_tests: Vec::new(),
            contract_tests: IndexMap::new(),
            uses_library: false,
            library_name: None,
        }
    }

    /// Returns true if the last converted test calls a library function.
    pub fn uses_library(&self) -> bool {
        self.uses_library
    }

    /// Returns the library under test of the last conversion.
    pub fn library_name(&self) -> Option<&str> {
        self.library_name.as_deref()
    }

    /// Converts `program`, discarding the state of any earlier conversion.
    pub fn convert(&mut self, program: &Program) -> EmitResult<ConvertedProgram> {
        self.reset();

        self.printer.line("// SPDX-License-Identifier: GPL-3.0");
        self.printer.line("pragma solidity >=0.8.0;");

        for unit in &program.units {
            match unit {
                ContractType::Library(library) => {
                    self.visit_library(library);
                }
                ContractType::Interface(interface) => {
                    self.visit_interface(interface, 0)?;
                }
                ContractType::Contract(contract) => {
                    self.visit_contract(contract, 0)?;
                }
            }
        }

        self.visit_test_contract(program);

        let indent = self.config.emit.indent_str();
        let source = std::mem::replace(&mut self.printer, Printer::new(indent)).finish();
        Ok(ConvertedProgram {
            source,
            library_tests: self.library_tests.clone(),
            contract_tests: self.contract_tests.clone(),
            uses_library: self.uses_library,
            library_name: self.library_name.clone(),
        })
    }

    fn reset(&mut self) {
        self.printer = Printer::new(self.config.emit.indent_str());
        self.names.clear();
        self.interface_functions.clear();
        self.next_suffix = 0;
        self.next_function = 0;
        self.library_tests.clear();
        self.contract_tests.clear();
        self.uses_library = false;
        self.library_name = None;
    }

    /// Returns the name registered for `key`, minting one on first use.
    fn program_name(&mut self, key: NodeKey) -> String {
        if let Some(name) = self.names.get(&key) {
            return name.clone();
        }
        let name = format!("{}{}", key.0.prefix(), self.next_suffix);
        self.next_suffix += 1;
        debug!(target: "yulsmith::convert", name = %name, kind = ?key.0, "named program unit");
        self.names.insert(key, name.clone());
        name
    }

    fn function_name(&mut self) -> String {
        let name = format!("f_{}", self.next_function);
        self.next_function += 1;
        name
    }

    fn open_unit(&mut self, header: &str) {
        self.printer.newline();
        self.printer.open(header);
    }

    fn emit_function(&mut self, header: &str, returns: u64) {
        self.printer.open(header);
        self.printer.line(&format!("return {};", returns));
        self.printer.close();
    }

    fn visit_library(&mut self, library: &Library) -> String {
        let name = self.program_name(node_key(UnitKind::Library, library));
        self.open_unit(&format!("library {}", name));
        for function in &library.functions {
            self.visit_library_function(&name, function);
        }
        self.printer.close();
        name
    }

    fn visit_library_function(&mut self, library: &str, function: &LibraryFunction) {
        let name = self.function_name();
        // Library functions cannot be payable.
        let mutability = match function.mutability {
            Mutability::Payable => Mutability::NonPayable,
            other => other,
        };
        let header = function_header(&name, function.visibility, mutability, false, false);
        self.emit_function(&header, function.returns);

        if function.is_test && function.visibility != Visibility::Private {
            debug!(
                target: "yulsmith::convert",
                library,
                function = %name,
                expected = function.returns,
                "recorded library test"
            );
            self.library_tests.push(LibraryTest {
                library: library.to_string(),
                function: name,
                expected: function.returns.to_string(),
            });
        }
    }

    fn visit_interface(&mut self, interface: &Interface, depth: usize) -> EmitResult<String> {
        if depth > MAX_INHERITANCE_DEPTH {
            return Err(EmitError::InheritanceTooDeep {
                limit: MAX_INHERITANCE_DEPTH,
            });
        }

        let mut base_names = Vec::with_capacity(interface.bases.len());
        let mut functions = Vec::new();
        for base in &interface.bases {
            base_names.push(self.visit_interface(base, depth + 1)?);
            if let Some(inherited) = self
                .interface_functions
                .get(&node_key(UnitKind::Interface, base))
            {
                functions.extend(inherited.iter().cloned());
            }
        }

        let key = node_key(UnitKind::Interface, interface);
        let name = self.program_name(key);
        self.open_unit(&inheritance_header("interface", &name, &base_names));
        for function in &interface.functions {
            let function_name = self.function_name();
            let mut header = format!("function {}() external", function_name);
            if let Some(keyword) = function.mutability.keyword() {
                header.push(' ');
                header.push_str(keyword);
            }
            header.push_str(" returns (uint);");
            self.printer.line(&header);
            functions.push((function_name, function.mutability));
        }
        self.printer.close();

        self.interface_functions.insert(key, functions);
        Ok(name)
    }

    fn visit_contract(&mut self, contract: &Contract, depth: usize) -> EmitResult<String> {
        if depth > MAX_INHERITANCE_DEPTH {
            return Err(EmitError::InheritanceTooDeep {
                limit: MAX_INHERITANCE_DEPTH,
            });
        }

        let mut base_names = Vec::with_capacity(contract.bases.len());
        let mut to_implement = Vec::new();
        for base in &contract.bases {
            match base {
                ContractBase::Contract(base) => {
                    base_names.push(self.visit_contract(base, depth + 1)?);
                }
                ContractBase::Interface(base) => {
                    base_names.push(self.visit_interface(base, depth + 1)?);
                    if let Some(functions) = self
                        .interface_functions
                        .get(&node_key(UnitKind::Interface, base))
                    {
                        to_implement.extend(functions.iter().cloned());
                    }
                }
            }
        }

        let name = self.program_name(node_key(UnitKind::Contract, contract));
        let keyword = if contract.is_abstract {
            "abstract contract"
        } else {
            "contract"
        };
        self.open_unit(&inheritance_header(keyword, &name, &base_names));

        // Interface functions are implemented with their declared mutability.
        for (function, mutability) in &to_implement {
            let header = function_header(function, Visibility::External, *mutability, false, true);
            self.emit_function(&header, 0);
        }

        for function in &contract.functions {
            self.visit_contract_function(&name, contract.is_abstract, function);
        }
        self.printer.close();
        Ok(name)
    }

    fn visit_contract_function(&mut self, contract: &str, is_abstract: bool, function: &ContractFunction) {
        let name = self.function_name();
        // Only externally callable functions may be payable.
        let mutability = match function.mutability {
            Mutability::Payable if !function.visibility.is_callable_externally() => {
                Mutability::NonPayable
            }
            other => other,
        };
        let is_virtual = function.is_virtual && function.visibility != Visibility::Private;
        let header = function_header(&name, function.visibility, mutability, is_virtual, false);
        self.emit_function(&header, function.returns);

        if !is_abstract && function.is_test && function.visibility.is_callable_externally() {
            debug!(
                target: "yulsmith::convert",
                contract,
                function = %name,
                expected = function.returns,
                "recorded contract test"
            );
            self.contract_tests
                .entry(contract.to_string())
                .or_default()
                .insert(name, function.returns.to_string());
        }
    }

    /// Appends the test contract for the kind selected by the program.
    /// Nothing is appended when that kind has no test.
    fn visit_test_contract(&mut self, program: &Program) {
        let checks = match program.test.kind {
            TestKind::Library => self.library_checks(program.seed),
            TestKind::Contract => self.contract_checks(),
        };
        let Some((declarations, checks)) = checks else {
            return;
        };

        self.open_unit(&format!("contract {}", TEST_CONTRACT_NAME));
        self.printer
            .open(&format!("function {}() public returns (uint)", TEST_FUNCTION_NAME));
        for declaration in &declarations {
            self.printer.line(declaration);
        }
        for (index, (call, expected)) in checks.iter().enumerate() {
            self.printer
                .line(&format!("if ({} != {}) return {};", call, expected, index + 1));
        }
        self.printer.line("return 0;");
        self.printer.close();
        self.printer.close();
    }

    /// Picks one recorded library test.
    fn library_checks(&mut self, seed: u32) -> Option<(Vec<String>, Vec<(String, String)>)> {
        if self.library_tests.is_empty() {
            return None;
        }
        let mut rng = MinStdRand::new(seed);
        let index = rng.draw() as usize % self.library_tests.len();
        let test = self.library_tests[index].clone();
        debug!(
            target: "yulsmith::convert",
            library = %test.library,
            function = %test.function,
            "library under test"
        );

        self.uses_library = true;
        self.library_name = Some(test.library.clone());
        Some((
            Vec::new(),
            vec![(format!("{}.{}()", test.library, test.function), test.expected)],
        ))
    }

    /// Instantiates tested contracts, at most `max_test_vars` of them, and
    /// checks each of their test functions.
    fn contract_checks(&self) -> Option<(Vec<String>, Vec<(String, String)>)> {
        if self.contract_tests.is_empty() {
            return None;
        }
        let mut declarations = Vec::new();
        let mut checks = Vec::new();
        for (index, (contract, functions)) in self
            .contract_tests
            .iter()
            .take(self.config.program.max_test_vars)
            .enumerate()
        {
            let var = format!("v{}", index);
            declarations.push(format!("{} {} = new {}();", contract, var, contract));
            for (function, expected) in functions {
                checks.push((format!("{}.{}()", var, function), expected.clone()));
            }
        }
        Some((declarations, checks))
    }
}

fn inheritance_header(keyword: &str, name: &str, bases: &[String]) -> String {
    if bases.is_empty() {
        format!("{} {}", keyword, name)
    } else {
        format!("{} {} is {}", keyword, name, bases.join(", "))
    }
}

fn function_header(
    name: &str,
    visibility: Visibility,
    mutability: Mutability,
    is_virtual: bool,
    is_override: bool,
) -> String {
    let mut header = format!("function {}() {}", name, visibility.keyword());
    if let Some(keyword) = mutability.keyword() {
        header.push(' ');
        header.push_str(keyword);
    }
    if is_virtual {
        header.push_str(" virtual");
    }
    if is_override {
        header.push_str(" override");
    }
    header.push_str(" returns (uint)");
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::ast::{InterfaceFunction, TestContract};
    use pretty_assertions::assert_eq;

    fn library(functions: Vec<LibraryFunction>) -> ContractType {
        ContractType::Library(Library { functions })
    }

    fn test_fn(returns: u64) -> LibraryFunction {
        LibraryFunction {
            visibility: Visibility::Public,
            mutability: Mutability::Pure,
            is_test: true,
            returns,
        }
    }

    #[test]
    fn test_empty_library_has_no_test() {
        let program = Program {
            units: vec![library(Vec::new())],
            test: TestContract {
                kind: TestKind::Library,
            },
            seed: 1,
        };
        let converted = convert(&program).unwrap();
        assert!(converted.library_tests.is_empty());
        assert!(!converted.uses_library);
        assert_eq!(converted.library_name, None);
        assert!(!converted.source.contains("contract C "));
    }

    #[test]
    fn test_library_test_is_selected() {
        let program = Program {
            units: vec![library(vec![test_fn(7)])],
            test: TestContract {
                kind: TestKind::Library,
            },
            seed: 3,
        };
        let converted = convert(&program).unwrap();
        assert_eq!(
            converted.source,
            "// SPDX-License-Identifier: GPL-3.0\n\
             pragma solidity >=0.8.0;\n\
             \n\
             library L0 {\n    \
                 function f_0() public pure returns (uint) {\n        \
                     return 7;\n    \
                 }\n\
             }\n\
             \n\
             contract C {\n    \
                 function test() public returns (uint) {\n        \
                     if (L0.f_0() != 7) return 1;\n        \
                     return 0;\n    \
                 }\n\
             }\n"
        );
        assert!(converted.uses_library);
        assert_eq!(converted.library_name.as_deref(), Some("L0"));
        assert_eq!(
            converted.library_tests,
            vec![LibraryTest {
                library: "L0".to_string(),
                function: "f_0".to_string(),
                expected: "7".to_string(),
            }]
        );
    }

    #[test]
    fn test_private_library_function_is_not_a_test() {
        let mut function = test_fn(1);
        function.visibility = Visibility::Private;
        let converted = convert(&Program {
            units: vec![library(vec![function])],
            ..Program::default()
        })
        .unwrap();
        assert!(converted.library_tests.is_empty());
    }

    #[test]
    fn test_library_payable_is_dropped() {
        let mut function = test_fn(1);
        function.mutability = Mutability::Payable;
        let converted = convert(&Program {
            units: vec![library(vec![function])],
            ..Program::default()
        })
        .unwrap();
        assert!(!converted.source.contains("payable"));
        assert!(converted.source.contains("function f_0() public returns (uint)"));
    }

    #[test]
    fn test_contract_tests_and_interface_implementation() {
        let contract = Contract {
            functions: vec![ContractFunction {
                visibility: Visibility::External,
                mutability: Mutability::View,
                is_virtual: true,
                is_test: true,
                returns: 9,
            }],
            is_abstract: false,
            bases: vec![ContractBase::Interface(Interface {
                functions: vec![InterfaceFunction {
                    mutability: Mutability::Pure,
                }],
                bases: Vec::new(),
            })],
        };
        let program = Program {
            units: vec![ContractType::Contract(contract)],
            test: TestContract {
                kind: TestKind::Contract,
            },
            seed: 0,
        };
        let converted = convert(&program).unwrap();

        assert!(converted.source.contains("interface I0 {"));
        assert!(converted
            .source
            .contains("function f_0() external pure returns (uint);"));
        assert!(converted.source.contains("contract C1 is I0 {"));
        assert!(converted
            .source
            .contains("function f_0() external pure override returns (uint) {"));
        assert!(converted
            .source
            .contains("function f_1() external view virtual returns (uint) {"));
        assert!(converted.source.contains("C1 v0 = new C1();"));
        assert!(converted.source.contains("if (v0.f_1() != 9) return 1;"));
        assert!(!converted.uses_library);

        let functions = &converted.contract_tests["C1"];
        assert_eq!(functions["f_1"], "9");
    }

    #[test]
    fn test_abstract_contract_is_not_tested() {
        let contract = Contract {
            functions: vec![ContractFunction {
                is_test: true,
                ..ContractFunction::default()
            }],
            is_abstract: true,
            bases: Vec::new(),
        };
        let converted = convert(&Program {
            units: vec![ContractType::Contract(contract)],
            test: TestContract {
                kind: TestKind::Contract,
            },
            seed: 0,
        })
        .unwrap();
        assert!(converted.source.contains("abstract contract C0 {"));
        assert!(converted.contract_tests.is_empty());
    }

    #[test]
    fn test_private_function_is_never_virtual_or_payable() {
        let contract = Contract {
            functions: vec![ContractFunction {
                visibility: Visibility::Private,
                mutability: Mutability::Payable,
                is_virtual: true,
                is_test: false,
                returns: 1,
            }],
            ..Contract::default()
        };
        let converted = convert(&Program {
            units: vec![ContractType::Contract(contract)],
            ..Program::default()
        })
        .unwrap();
        assert!(converted
            .source
            .contains("function f_0() private returns (uint) {"));
    }

    #[test]
    fn test_contract_instances_are_capped() {
        let tested = ContractType::Contract(Contract {
            functions: vec![ContractFunction {
                is_test: true,
                ..ContractFunction::default()
            }],
            ..Contract::default()
        });
        let mut config = FuzzConfig::default();
        config.program.max_test_vars = 2;
        let converted = convert_with_config(
            &Program {
                units: vec![tested; 4],
                test: TestContract {
                    kind: TestKind::Contract,
                },
                seed: 0,
            },
            &config,
        )
        .unwrap();
        assert_eq!(converted.contract_tests.len(), 4);
        assert_eq!(converted.source.matches(" = new ").count(), 2);
    }

    #[test]
    fn test_deep_inheritance_fails() {
        let mut interface = Interface::default();
        for _ in 0..=MAX_INHERITANCE_DEPTH + 1 {
            interface = Interface {
                functions: Vec::new(),
                bases: vec![interface],
            };
        }
        let err = convert(&Program {
            units: vec![ContractType::Interface(interface)],
            ..Program::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            EmitError::InheritanceTooDeep {
                limit: MAX_INHERITANCE_DEPTH
            }
        );
    }

    #[test]
    fn test_converter_resets_between_programs() {
        let config = FuzzConfig::default();
        let mut converter = ProgramConverter::new(&config);
        let program = Program {
            units: vec![library(vec![test_fn(2)])],
            ..Program::default()
        };
        let first = converter.convert(&program).unwrap();
        assert!(converter.uses_library());
        let second = converter.convert(&program).unwrap();
        assert_eq!(first, second);
        assert_eq!(converter.library_name(), Some("L0"));

        converter.convert(&Program::default()).unwrap();
        assert!(!converter.uses_library());
        assert_eq!(converter.library_name(), None);
    }
}
