//! Mutation and emission benchmarks using criterion.
//!
//! Run with: cargo bench --bench mutation_bench

use arbitrary::{Arbitrary, Unstructured};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use yulsmith::config::MutationConfig;
use yulsmith::program::{convert, Program, ProgramMutator};
use yulsmith::random::MinStdRand;
use yulsmith::yul::{emit, YulMutator, YulProgram};

fn generated(seed: u32) -> YulProgram {
    let bytes = MinStdRand::new(seed).bytes(1024);
    YulProgram::arbitrary(&mut Unstructured::new(&bytes)).unwrap_or_default()
}

fn bench_yul_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("yul_mutation");
    let mutator = YulMutator::yul(&MutationConfig::default());

    // Trees roughly triple per pass, so pass counts stay small.
    for passes in [1u32, 2, 3] {
        group.bench_with_input(BenchmarkId::new("passes", passes), &passes, |b, &passes| {
            b.iter(|| {
                let mut program = generated(7);
                let mut seeds = MinStdRand::new(11);
                for _ in 0..passes {
                    mutator.mutate_program(&mut program, seeds.draw());
                }
                black_box(program)
            });
        });
    }

    group.finish();
}

fn bench_yul_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("yul_emission");
    let mutator = YulMutator::yul(&MutationConfig::default());

    let mut program = generated(3);
    let mut seeds = MinStdRand::new(5);
    for _ in 0..3 {
        mutator.mutate_program(&mut program, seeds.draw());
    }

    group.bench_function("emit", |b| {
        b.iter(|| black_box(emit(black_box(&program))))
    });

    group.finish();
}

fn bench_program_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("program_conversion");
    let mutator = ProgramMutator::program(&MutationConfig::default());

    let mut program = Program::default();
    let mut seeds = MinStdRand::new(1);
    for _ in 0..500 {
        mutator.mutate_program(&mut program, seeds.draw());
    }

    group.bench_function("convert", |b| {
        b.iter(|| black_box(convert(black_box(&program))))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_yul_mutation,
    bench_yul_emission,
    bench_program_conversion
);
criterion_main!(benches);
