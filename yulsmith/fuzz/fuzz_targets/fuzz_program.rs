//! Program conversion fuzz target.

#![no_main]

use libfuzzer_sys::fuzz_target;
use yulsmith::config::MutationConfig;
use yulsmith::program::{convert, Program, ProgramMutator};

fuzz_target!(|input: (Program, u32)| {
    let (mut program, seed) = input;
    ProgramMutator::program(&MutationConfig::default()).mutate_program(&mut program, seed);

    // Generated inheritance stays shallow, so conversion cannot fail.
    let converted = convert(&program).expect("program failed to convert");
    if converted.uses_library {
        assert!(converted.library_name.is_some());
    }
});
