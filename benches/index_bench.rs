//! Index Structure Benchmarks
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use keydex::{MinMaxHeap, RobinHoodTable, SkipList, MIN_BITS};

fn random_keys(n: usize) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(0xBE7C);
    (0..n).map(|_| rng.gen()).collect()
}

fn bench_heap(c: &mut Criterion) {
    let sizes = [100, 1000, 10000];

    let mut group = c.benchmark_group("heap_push_drain");

    for n in sizes {
        let keys = random_keys(n);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("n_{}", n), |bencher| {
            bencher.iter_batched(
                MinMaxHeap::new,
                |mut heap| {
                    for &k in &keys {
                        heap.push(k).unwrap();
                    }
                    while heap.pop_min().is_some() {}
                    black_box(heap)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_skiplist(c: &mut Criterion) {
    let n = 1000;
    let keys = random_keys(n);
    let pages = 1 + n / keydex::NODES_PER_PAGE;

    let mut group = c.benchmark_group("skiplist");

    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("insert", |bencher| {
        bencher.iter_batched(
            || {
                let mut list = SkipList::with_rng(SmallRng::seed_from_u64(1));
                for _ in 0..pages {
                    list.inject_page().unwrap();
                }
                list
            },
            |mut list| {
                for &k in &keys {
                    list.insert(k, k).unwrap();
                }
                black_box(list)
            },
            BatchSize::SmallInput,
        )
    });

    let mut populated = SkipList::with_rng(SmallRng::seed_from_u64(1));
    for _ in 0..pages {
        populated.inject_page().unwrap();
    }
    for &k in &keys {
        populated.insert(k, k).unwrap();
    }
    group.throughput(Throughput::Elements(1));
    group.bench_function("find", |bencher| {
        let mut i = 0;
        bencher.iter(|| {
            i = (i + 1) % keys.len();
            black_box(populated.find(black_box(keys[i])))
        })
    });

    group.finish();
}

fn bench_robinhood(c: &mut Criterion) {
    let n = 1000;
    let keys = random_keys(n);

    let mut group = c.benchmark_group("robinhood");

    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("set", |bencher| {
        bencher.iter_batched(
            || RobinHoodTable::new(MIN_BITS).unwrap(),
            |mut table| {
                for &k in &keys {
                    table.set(k, Some(k)).unwrap();
                }
                black_box(table)
            },
            BatchSize::SmallInput,
        )
    });

    let mut populated = RobinHoodTable::new(MIN_BITS).unwrap();
    for &k in &keys {
        populated.set(k, Some(k)).unwrap();
    }
    group.throughput(Throughput::Elements(1));
    group.bench_function("get", |bencher| {
        let mut i = 0;
        bencher.iter(|| {
            i = (i + 1) % keys.len();
            black_box(populated.get(black_box(keys[i])))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_heap, bench_skiplist, bench_robinhood);
criterion_main!(benches);
