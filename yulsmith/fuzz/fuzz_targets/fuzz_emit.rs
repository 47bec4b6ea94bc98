//! Grammar-based fuzz target for the Yul emitter.
//!
//! Generated trees never contain unset nodes, so emission must succeed and
//! must be deterministic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use yulsmith::yul::{emit, YulProgram};

fuzz_target!(|program: YulProgram| {
    let first = emit(&program).expect("generated tree failed to emit");
    let second = emit(&program).expect("generated tree failed to emit");
    assert_eq!(first.source, second.source);
});
