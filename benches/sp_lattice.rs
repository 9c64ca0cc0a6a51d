//! Compares the enumeration of partitions with substitution property by closing the minimal
//! ones under joins with the brute force filter over all partitions of the state set.
//!
//! Run with:
//! ```bash
//! cargo bench --bench sp_lattice
//! ```

use automata_algebra::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const INPUTS: [char; 2] = ['a', 'b'];

fn machines(size: u8, count: usize) -> Vec<Machine<u8, char>> {
    let mut rng = fastrand::Rng::with_seed(size as u64);
    let states: Vec<u8> = (0..size).collect();
    (0..count)
        .map(|_| Machine::random_with(&mut rng, &states, &INPUTS, &[], OutputKind::Mealy))
        .collect()
}

fn enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("sp_lattice");
    for size in 2..=7u8 {
        let sample = machines(size, 10);
        group.bench_with_input(BenchmarkId::new("hartmanis_stearns", size), &sample, |b, ms| {
            b.iter(|| ms.iter().map(|m| m.enumerate_sp().len()).sum::<usize>())
        });
        group.bench_with_input(BenchmarkId::new("naive", size), &sample, |b, ms| {
            b.iter(|| ms.iter().map(|m| m.enumerate_sp_naive().len()).sum::<usize>())
        });
    }
    group.finish();
}

fn lattice_sizes(c: &mut Criterion) {
    // larger machines are out of reach for the naive enumeration
    let mut group = c.benchmark_group("sp_lattice_large");
    group.sample_size(10);
    for size in [10u8, 14] {
        let sample = machines(size, 4);
        group.bench_with_input(BenchmarkId::from_parameter(size), &sample, |b, ms| {
            b.iter(|| ms.iter().map(|m| m.enumerate_sp().len()).sum::<usize>())
        });
    }
    group.finish();
}

criterion_group!(benches, enumeration, lattice_sizes);
criterion_main!(benches);
