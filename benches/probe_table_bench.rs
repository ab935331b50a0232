use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use probe_table::{ProbeTable, TableConfig};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> Vec<u8> {
    format!("k{:016x}\0", n).into_bytes()
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    let keys: Vec<_> = lcg(1).take(100_000).map(key).collect();
    let mut group = c.benchmark_group("insert_fresh_100k");
    group.bench_function("probe_table", |b| {
        b.iter_batched(
            ProbeTable::<u64>::new,
            |mut m| {
                for (i, k) in keys.iter().enumerate() {
                    m.insert(k, i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("hashbrown", |b| {
        b.iter_batched(
            hashbrown::HashMap::<Vec<u8>, u64>::new,
            |mut m| {
                for (i, k) in keys.iter().enumerate() {
                    m.insert(k.clone(), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_insert_presized_100k(c: &mut Criterion) {
    let keys: Vec<_> = lcg(2).take(100_000).map(key).collect();
    c.bench_function("insert_presized_100k/probe_table", |b| {
        b.iter_batched(
            || ProbeTable::<u64>::with_config(TableConfig::default().with_capacity(262_144)).unwrap(),
            |mut m| {
                for (i, k) in keys.iter().enumerate() {
                    m.insert(k, i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
    let mut group = c.benchmark_group("get_hit");

    let mut m = ProbeTable::new();
    for (i, k) in keys.iter().enumerate() {
        m.insert(k, i as u64).unwrap();
    }
    let mut it = keys.iter().cycle();
    group.bench_function("probe_table", |b| {
        b.iter(|| black_box(m.get(it.next().unwrap())))
    });

    let mut h = hashbrown::HashMap::new();
    for (i, k) in keys.iter().enumerate() {
        h.insert(k.clone(), i as u64);
    }
    let mut it = keys.iter().cycle();
    group.bench_function("hashbrown", |b| {
        b.iter(|| black_box(h.get(it.next().unwrap())))
    });
    group.finish();
}

fn bench_get_miss(c: &mut Criterion) {
    let mut m = ProbeTable::new();
    for (i, x) in lcg(11).take(10_000).enumerate() {
        m.insert(&key(x), i as u64).unwrap();
    }
    let misses: Vec<_> = lcg(0xdead_beef).take(10_000).map(key).collect();
    let mut it = misses.iter().cycle();
    c.bench_function("get_miss/probe_table", |b| {
        b.iter(|| black_box(m.get(it.next().unwrap())))
    });
}

fn bench_remove_reinsert(c: &mut Criterion) {
    let keys: Vec<_> = lcg(5).take(50_000).map(key).collect();
    c.bench_function("remove_reinsert_10k_of_50k/probe_table", |b| {
        b.iter_batched(
            || {
                let mut m = ProbeTable::new();
                for (i, k) in keys.iter().enumerate() {
                    m.insert(k, i as u64).unwrap();
                }
                m
            },
            |mut m| {
                for k in keys.iter().step_by(5) {
                    m.remove(k);
                }
                for (i, k) in keys.iter().step_by(5).enumerate() {
                    m.insert(k, i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(6))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_presized_100k, bench_get_hit, bench_get_miss, bench_remove_reinsert
}
criterion_main!(benches);
