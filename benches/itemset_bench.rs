use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::seq::SliceRandom;
use rand::Rng;

use seqitems::Itemset;

/// Generate a random itemset and a shuffled copy of it
fn generate_pair(size: usize, num_items: i64) -> (Itemset<i64>, Itemset<i64>) {
    let mut rng = rand::thread_rng();
    let mut items: Vec<i64> = (0..size).map(|_| rng.gen_range(0..num_items)).collect();
    let left: Itemset<i64> = items.iter().copied().collect();
    items.shuffle(&mut rng);
    let right: Itemset<i64> = items.into_iter().collect();
    (left, right)
}

/// Benchmark order-independent equality at different itemset sizes
fn bench_equality(c: &mut Criterion) {
    let mut group = c.benchmark_group("itemset_equality");

    for size in [4, 16, 64, 256] {
        let pair = generate_pair(size, 1000);
        group.bench_with_input(BenchmarkId::from_parameter(size), &pair, |b, (l, r)| {
            b.iter(|| black_box(l) == black_box(r));
        });
    }

    group.finish();
}

fn bench_hash_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("itemset_hash_code");

    for size in [4, 16, 64, 256] {
        let (itemset, _) = generate_pair(size, 1000);
        group.bench_with_input(BenchmarkId::from_parameter(size), &itemset, |b, set| {
            b.iter(|| black_box(set).hash_code());
        });
    }

    group.finish();
}

/// Aliasing copy vs. new container
fn bench_copy_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("itemset_copy");
    let (itemset, _) = generate_pair(64, 1000);

    group.bench_function("share_from", |b| {
        b.iter(|| Itemset::share_from(black_box(&itemset)));
    });
    group.bench_function("duplicate", |b| {
        b.iter(|| black_box(&itemset).duplicate());
    });

    group.finish();
}

criterion_group!(benches, bench_equality, bench_hash_code, bench_copy_paths);
criterion_main!(benches);
