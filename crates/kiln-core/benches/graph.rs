use std::collections::BTreeSet;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kiln_core::graph::{Graph, find_cycle, reachable_nodes, reverse};

const SIZES: [u32; 3] = [1_000, 10_000, 100_000];

/// `0 → 1 → … → n-1`.
fn chain(n: u32) -> Graph<u32> {
    (0..n)
        .map(|i| {
            let next = if i + 1 < n { BTreeSet::from([i + 1]) } else { BTreeSet::new() };
            (i, next)
        })
        .collect()
}

/// Each node depends on the next four: many paths, no cycle.
fn layered(n: u32) -> Graph<u32> {
    (0..n)
        .map(|i| (i, (i + 1..n.min(i + 5)).collect()))
        .collect()
}

/// A chain whose last node points back to the first.
fn closed_chain(n: u32) -> Graph<u32> {
    let mut pairs = chain(n).to_pairs();
    if let Some((_, last)) = pairs.last_mut() {
        last.insert(0);
    }
    Graph::from_pairs(pairs)
}

fn bench_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph.find_cycle");

    for n in SIZES {
        group.throughput(Throughput::Elements(u64::from(n)));

        let acyclic = layered(n);
        group.bench_with_input(BenchmarkId::new("layered", n), &acyclic, |b, g| {
            b.iter(|| black_box(find_cycle(g)));
        });

        let cyclic = closed_chain(n);
        group.bench_with_input(BenchmarkId::new("closed_chain", n), &cyclic, |b, g| {
            b.iter(|| black_box(find_cycle(g)));
        });
    }

    group.finish();
}

fn bench_reachability(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph.reachable_nodes");

    for n in SIZES {
        group.throughput(Throughput::Elements(u64::from(n)));
        let g = layered(n);
        let seeds = BTreeSet::from([0]);

        group.bench_with_input(BenchmarkId::new("layered", n), &g, |b, g| {
            b.iter(|| black_box(reachable_nodes(&seeds, g)));
        });
    }

    group.finish();
}

fn bench_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph.reverse");

    for n in SIZES {
        group.throughput(Throughput::Elements(u64::from(n)));
        let g = layered(n);

        group.bench_with_input(BenchmarkId::new("layered", n), &g, |b, g| {
            b.iter(|| black_box(reverse(g)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cycles, bench_reachability, bench_reverse);
criterion_main!(benches);
