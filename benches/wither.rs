//! Benchmarks for withering sweeps and tracked traversal.
//!
//! Run with: `cargo bench --bench wither`

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use witherkit::builder::GenerationBuilder;
use witherkit::ds::GenerationState;
use witherkit::policy::wither;
use witherkit::traits::AccessConfig;
use witherkit::tree::{CacheNode, GenerationTree};

const WIDTH: u64 = 1 << 16;

/// Balanced tree with `fanout` children per node and random stamps in
/// `[0, stamp]`, so a sweep finds a mix of young and stale branches.
fn build_tree(
    rng: &mut StdRng,
    state: &GenerationState,
    start: u64,
    width: u64,
    fanout: u64,
    stamp: u32,
) -> CacheNode<u64> {
    let mut node = CacheNode::with_generation(start..start + width, state, stamp);
    let step = width / fanout;
    for i in 0..fanout {
        let child_start = start + i * step;
        if step <= fanout {
            node.push_value(child_start..child_start + step, child_start);
        } else {
            let child_stamp = rng.random_range(0..=stamp);
            node.push_child(build_tree(rng, state, child_start, step, fanout, child_stamp));
        }
    }
    node
}

// ============================================================================
// Sweep benchmarks
// ============================================================================

fn bench_sweep(c: &mut Criterion) {
    let state = GenerationBuilder::new(1 << 20).life_span(64).starting_at(1_000).build();
    let mut rng = StdRng::seed_from_u64(42);
    let template = build_tree(&mut rng, &state, 0, WIDTH, 8, 1_000);

    let mut group = c.benchmark_group("wither_sweep");
    group.throughput(Throughput::Elements(template.node_count() as u64));

    group.bench_function("mixed_ages", |b| {
        b.iter_batched(
            || template.clone(),
            |mut root| std::hint::black_box(wither::sweep(&mut root, &state)),
            BatchSize::LargeInput,
        )
    });

    let disabled = GenerationBuilder::new(1 << 20).starting_at(1_000).build();
    group.bench_function("disabled_policy", |b| {
        b.iter_batched(
            || template.clone(),
            |mut root| std::hint::black_box(wither::sweep(&mut root, &disabled)),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

// ============================================================================
// Tracked traversal benchmarks
// ============================================================================

fn bench_traverse(c: &mut Criterion) {
    let state = GenerationBuilder::new(1 << 20).life_span(64).starting_at(1_000).build();
    let mut rng = StdRng::seed_from_u64(7);
    let root = build_tree(&mut rng, &state, 0, WIDTH, 8, 1_000);
    let mut tree = GenerationTree::new(root, state);

    let mut group = c.benchmark_group("tracked_access");
    group.bench_function("traverse_narrow", |b| {
        b.iter(|| {
            let start = rng.random_range(0..WIDTH - 64);
            let mut sum = 0u64;
            tree.traverse(&(start..start + 64), AccessConfig::default(), |_, v| sum += *v);
            std::hint::black_box(sum)
        })
    });
    group.bench_function("uncached_range_inspect", |b| {
        b.iter(|| std::hint::black_box(tree.uncached_range(&(0..WIDTH), AccessConfig::INSPECT)))
    });
    group.finish();
}

criterion_group!(benches, bench_sweep, bench_traverse);
criterion_main!(benches);
