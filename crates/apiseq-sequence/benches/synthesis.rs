//! Benchmarks for sequence synthesis.
//!
//! Run with: cargo bench -p apiseq-sequence

use apiseq_graph::{build_graph, EndpointKey};
use apiseq_sequence::{valid_orderings, CrudMap, SequenceSynthesizer, SynthesisConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_orderings(c: &mut Criterion) {
    let mut group = c.benchmark_group("valid_orderings");

    for n in [4usize, 6, 8] {
        // every object before the last one
        let constraints: Vec<_> = (0..n - 1).map(|i| (i, n - 1)).collect();
        group.bench_with_input(BenchmarkId::new("star", n), &n, |b, &n| {
            b.iter(|| valid_orderings(black_box(n), black_box(&constraints), 0));
        });
    }
    group.finish();
}

fn bench_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");

    for leaves in [3usize, 5, 7] {
        let graph = build_graph(&apiseq_test_utils::star(leaves));
        let crud = CrudMap::classify(&graph);
        let key = EndpointKey::new("/roots", "post");
        let synthesizer = SequenceSynthesizer::new(SynthesisConfig::new().with_max_orderings(0));

        group.bench_with_input(BenchmarkId::new("star_create", leaves), &leaves, |b, _| {
            b.iter(|| synthesizer.synthesize(&graph, &crud, black_box(&key)));
        });
    }

    let graph = build_graph(&apiseq_test_utils::chain(24));
    let crud = CrudMap::classify(&graph);
    for parallel in [false, true] {
        let synthesizer = SequenceSynthesizer::new(SynthesisConfig::new().with_parallel(parallel));
        group.bench_with_input(
            BenchmarkId::new("chain_all", if parallel { "parallel" } else { "sequential" }),
            &parallel,
            |b, _| {
                b.iter(|| synthesizer.synthesize_all(black_box(&graph), &crud));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_orderings, bench_synthesis);
criterion_main!(benches);
