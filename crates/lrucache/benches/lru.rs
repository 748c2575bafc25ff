use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lrucache::{Lru, LruConfig, ShardedLru, SharedLru};

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("lru_get_1k_resident", |b| {
        let mut cache = Lru::new(1000).unwrap();
        for i in 0..1000u64 {
            cache.add(i, vec![b'x'; 64]);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 1000)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_add_evict(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_evict");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("lru_add_full", |b| {
        let mut cache = Lru::new(100).unwrap();
        let mut counter = 0u64;
        b.iter(|| {
            // Every add past the first 100 evicts
            black_box(cache.add(counter, counter));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("shared_50_read_50_write", |b| {
        let cache = SharedLru::new(1000).unwrap();
        for i in 0..100u64 {
            cache.add(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter.is_multiple_of(2) {
                black_box(cache.get(&(counter % 100)));
            } else {
                black_box(cache.add(counter, counter));
            }
            counter += 1;
        });
    });

    group.bench_function("sharded_50_read_50_write", |b| {
        let cache = ShardedLru::new(&LruConfig::new(1000).with_shards(8)).unwrap();
        for i in 0..100u64 {
            cache.add(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter.is_multiple_of(2) {
                black_box(cache.get(&(counter % 100)));
            } else {
                black_box(cache.add(counter, counter));
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_add_evict, bench_mixed_50_50);
criterion_main!(benches);
