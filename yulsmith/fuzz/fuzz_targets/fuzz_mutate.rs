//! Mutation fuzz target.
//!
//! Mutating a complete tree must keep it complete, so the result always
//! emits, and replaying the same seed on a copy gives the same text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use yulsmith::config::MutationConfig;
use yulsmith::yul::{emit, YulMutator, YulProgram};

fuzz_target!(|input: (YulProgram, u32)| {
    let (program, seed) = input;
    let mutator = YulMutator::yul(&MutationConfig::default());

    let mut a = program.clone();
    let mut b = program;
    mutator.mutate_program(&mut a, seed);
    mutator.mutate_program(&mut b, seed);

    let a = emit(&a).expect("mutated tree failed to emit");
    let b = emit(&b).expect("mutated tree failed to emit");
    assert_eq!(a.source, b.source);
});
