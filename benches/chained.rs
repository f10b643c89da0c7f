#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::collections::{BTreeMap, HashMap};

use chainmap::ChainedHashMap;
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use proptest::{
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;

fn string_items() -> Vec<(String, String)> {
    let mut runner = TestRunner::default();
    proptest::collection::vec(any::<(String, String)>(), ITEMS_AMOUNT)
        .new_tree(&mut runner)
        .unwrap()
        .current()
}

fn insert_benches(c: &mut Criterion) {
    let items = string_items();

    let mut group = c.benchmark_group("Insert comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    group.bench_function("chained insert", |b| {
        b.iter_batched(
            || items.clone(),
            |items| {
                let mut map = ChainedHashMap::with_capacity_and_load_factor(10, 0.75).unwrap();
                for (key, value) in items {
                    map.put(key, value);
                }
                black_box(map)
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("btree insert", |b| {
        b.iter_batched(
            || items.clone(),
            |items| {
                let mut map = BTreeMap::new();
                for (key, value) in items {
                    map.insert(key, value);
                }
                black_box(map)
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("rust std insert", |b| {
        b.iter_batched(
            || items.clone(),
            |items| {
                let mut map = HashMap::new();
                for (key, value) in items {
                    map.insert(key, value);
                }
                black_box(map)
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn lookup_benches(c: &mut Criterion) {
    let items = string_items();
    let chained: ChainedHashMap<_, _> = items.iter().cloned().collect();
    let btree: BTreeMap<_, _> = items.iter().cloned().collect();
    let rust_map: HashMap<_, _> = items.iter().cloned().collect();

    let mut group = c.benchmark_group("Lookup comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    group.bench_function("chained get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(chained.get(key).ok());
            }
        });
    });
    group.bench_function("btree get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(btree.get(key));
            }
        });
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(rust_map.get(key));
            }
        });
    });
    group.finish();
}

fn remove_benches(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let keys: Vec<usize> = (0..ITEMS_AMOUNT * 10).map(|_| rng.random_range(0..usize::MAX)).collect();

    let mut group = c.benchmark_group("Remove comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    group.bench_function("chained remove", |b| {
        b.iter_batched(
            || {
                let mut map = ChainedHashMap::with_capacity_and_load_factor(50, 0.75).unwrap();
                map.extend(keys.iter().map(|&k| (k, k)));
                map
            },
            |mut map| {
                for key in keys.iter().rev() {
                    black_box(map.remove(key));
                }
                map
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("btree remove", |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<_, _>>(),
            |mut map| {
                for key in keys.iter().rev() {
                    black_box(map.remove(key));
                }
                map
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, insert_benches, lookup_benches, remove_benches);

criterion_main!(benches);
