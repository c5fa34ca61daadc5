use compara_core::{
    ComparableItem, MemoryStore, SPEC_PRIORITY, SnapshotStore, VisibilityMap, extract_keys,
    select_best, sort_keys,
};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;

fn sample_items(count: usize, keys_per_item: usize) -> Vec<ComparableItem> {
    (0..count)
        .map(|i| {
            let mut item = ComparableItem::new(i as i64, format!("Product {i}"))
                .with_rating((i % 50) as f64 / 10.0);
            for k in 0..keys_per_item {
                let key = if k < SPEC_PRIORITY.len() {
                    SPEC_PRIORITY[k].to_string()
                } else {
                    format!("Attribute {}", (i + k) % 40)
                };
                item = item.with_spec(key, format!("value {k}"));
            }
            item
        })
        .collect()
}

fn bench_spec_keys(c: &mut Criterion) {
    let items = sample_items(4, 30);
    c.bench_function("extract_keys_4x30", |b| {
        b.iter(|| extract_keys(black_box(&items)))
    });

    let keys = extract_keys(&items);
    c.bench_function("sort_keys_4x30", |b| b.iter(|| sort_keys(black_box(&keys))));

    let visibility = VisibilityMap::new(&keys);
    c.bench_function("visible_keys_4x30", |b| {
        b.iter(|| black_box(&visibility).visible_keys())
    });
}

fn bench_best(c: &mut Criterion) {
    let items = sample_items(50, 5);
    c.bench_function("select_best_50", |b| {
        b.iter(|| select_best(black_box(&items), true))
    });
}

fn bench_snapshot_save(c: &mut Criterion) {
    let items = sample_items(4, 15);
    let visibility = VisibilityMap::new(&extract_keys(&items));
    c.bench_function("snapshot_save_memory", |b| {
        b.iter_batched(
            || SnapshotStore::new(Arc::new(MemoryStore::new())),
            |store| store.save("Bench", &items, &visibility),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_spec_keys, bench_best, bench_snapshot_save);
criterion_main!(benches);
