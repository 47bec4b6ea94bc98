//! Property-based tests for the Yul surface.
//!
//! Uses proptest to generate seeds and raw generator input and checks the
//! invariants every mutation and emission must keep.

use arbitrary::{Arbitrary, Unstructured};
use proptest::prelude::*;

use yulsmith::config::MutationConfig;
use yulsmith::enum_range::{enum_from_seed, SeedEnum};
use yulsmith::mutation::Tier;
use yulsmith::random::MinStdRand;
use yulsmith::yul::ast::{
    BinaryOpKind, CallReturns, CopyKind, CreateKind, DataQuery, LogTopics, LowLevelCallKind,
    NullaryOpKind, StoreKind, TernaryOpKind, UnaryOpKind,
};
use yulsmith::yul::factory::{binop_expression, load_expression, ref_expression};
use yulsmith::yul::{
    emit, fill_args, fill_args_rec, is_filled, is_filled_deep, Block, Statement, YulMutator,
    YulProgram, YUL_PERIODS,
};

fn in_range<T: SeedEnum>(seed: u32) -> bool {
    let ordinal = enum_from_seed::<T>(seed).ordinal();
    (T::MIN..=T::MAX).contains(&ordinal)
}

fn tree_from(bytes: &[u8]) -> YulProgram {
    let mut u = Unstructured::new(bytes);
    YulProgram::arbitrary(&mut u).unwrap_or_default()
}

proptest! {
    /// Every enumeration maps every seed to a declared member.
    #[test]
    fn mapper_stays_in_range(seed in any::<u32>()) {
        prop_assert!(in_range::<CallReturns>(seed));
        prop_assert!(in_range::<StoreKind>(seed));
        prop_assert!(in_range::<NullaryOpKind>(seed));
        prop_assert!(in_range::<UnaryOpKind>(seed));
        prop_assert!(in_range::<BinaryOpKind>(seed));
        prop_assert!(in_range::<TernaryOpKind>(seed));
        prop_assert!(in_range::<LowLevelCallKind>(seed));
        prop_assert!(in_range::<CreateKind>(seed));
        prop_assert!(in_range::<DataQuery>(seed));
        prop_assert!(in_range::<CopyKind>(seed));
        prop_assert!(in_range::<LogTopics>(seed));
    }

    /// Shallow fill leaves no direct position unset, whatever the generator.
    #[test]
    fn shallow_fill_sets_direct_positions(kind in 0u32..Statement::KIND_COUNT, seed in any::<u32>(), generator in 0usize..3) {
        let mut stmt = Statement::of_kind(kind);
        let mut rng = MinStdRand::new(seed);
        match generator {
            0 => fill_args(&mut stmt, ref_expression, &mut rng),
            1 => fill_args(&mut stmt, binop_expression, &mut rng),
            _ => fill_args(&mut stmt, load_expression, &mut rng),
        }
        prop_assert!(is_filled(&stmt));
    }

    /// Recursive fill leaves nothing reachable unset.
    #[test]
    fn recursive_fill_sets_every_position(kind in 0u32..Statement::KIND_COUNT, seed in any::<u32>()) {
        let mut stmt = Statement::of_kind(kind);
        let mut rng = MinStdRand::new(seed);
        fill_args_rec(&mut stmt, |expr, rng| *expr = binop_expression(rng), &mut rng);
        prop_assert!(is_filled_deep(&stmt));
    }

    /// Identical trees and seeds give identical trees and identical text.
    #[test]
    fn mutation_is_deterministic(bytes in prop::collection::vec(any::<u8>(), 0..256), seed in any::<u32>()) {
        let mutator = YulMutator::yul(&MutationConfig::default());
        let mut a = tree_from(&bytes);
        let mut b = a.clone();
        for iteration in 0..2u32 {
            mutator.mutate_program(&mut a, seed.wrapping_add(iteration));
            mutator.mutate_program(&mut b, seed.wrapping_add(iteration));
        }
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(emit(&a).unwrap().source, emit(&b).unwrap().source);
    }

    /// Operators that add statements build them complete, so the result
    /// always emits.
    #[test]
    fn added_statements_emit(seed in any::<u32>()) {
        let catalog = yulsmith::yul::YulCatalog::new();
        let mut block = Block::default();
        let mut seeds = MinStdRand::new(seed);
        for operator in catalog.block.iter().filter(|op| op.name.starts_with("add_")) {
            (operator.rewrite)(&mut block, &mut MinStdRand::new(seeds.draw()));
        }
        let program = YulProgram { code: block, data: Vec::new() };
        prop_assert!(emit(&program).is_ok());
    }

    /// Mutating a generated tree never leaves an unset node behind.
    #[test]
    fn mutated_trees_emit(bytes in prop::collection::vec(any::<u8>(), 0..256), seed in any::<u32>()) {
        let mutator = YulMutator::yul(&MutationConfig::default());
        let mut program = tree_from(&bytes);
        let mut seeds = MinStdRand::new(seed);
        for _ in 0..3 {
            mutator.mutate_program(&mut program, seeds.draw());
        }
        prop_assert!(emit(&program).is_ok());
    }
}

#[test]
fn sampling_rate_matches_period() {
    const DRAWS: usize = 100_000;
    let catalog = yulsmith::yul::YulCatalog::new();

    for tier in [Tier::Frequent, Tier::Occasional, Tier::Rare] {
        let operator = catalog
            .block
            .iter()
            .chain(catalog.function_def.iter())
            .find(|op| op.tier == tier)
            .unwrap();
        let mut seeds = MinStdRand::new(12_345);
        let fired = (0..DRAWS)
            .filter(|_| operator.triggers(seeds.draw(), &YUL_PERIODS))
            .count();

        let expected = DRAWS as f64 / f64::from(YUL_PERIODS.period(tier));
        let error = (fired as f64 - expected).abs() / expected;
        assert!(
            error < 0.1,
            "{:?}: fired {} times, expected about {}",
            tier,
            fired,
            expected
        );
    }
}
