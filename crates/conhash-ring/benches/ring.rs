//! Benchmarks for ring lookups and membership changes.

use conhash_ring::{HashAlgorithm, HashRing};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn node_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("cache-{i:03}.internal:11211")).collect()
}

fn bench_get(c: &mut Criterion) {
    let node_counts: &[usize] = &[3, 16, 128];
    let keys: Vec<String> = (0..1024).map(|i| format!("session:{i}")).collect();

    let mut group = c.benchmark_group("ring_get");
    for algorithm in [HashAlgorithm::Crc32, HashAlgorithm::Blake3] {
        for &n in node_counts {
            let mut ring = HashRing::with_hasher(160, algorithm.hasher()).unwrap();
            ring.add_nodes(node_names(n));
            let label = format!("{algorithm:?}_{n}_nodes");
            group.bench_with_input(BenchmarkId::new("get", &label), &ring, |b, ring| {
                let mut i = 0;
                b.iter(|| {
                    i = (i + 1) % keys.len();
                    ring.get(&keys[i])
                });
            });
        }
    }
    group.finish();
}

fn bench_membership(c: &mut Criterion) {
    let node_counts: &[usize] = &[16, 128];

    let mut group = c.benchmark_group("ring_membership");
    for &n in node_counts {
        let mut ring = HashRing::new(160).unwrap();
        ring.add_nodes(node_names(n));
        group.bench_with_input(BenchmarkId::new("add_remove", n), &ring, |b, ring| {
            b.iter(|| {
                let mut ring = ring.clone();
                ring.add_node("joining");
                ring.remove_node("joining");
                ring
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_get, bench_membership);
criterion_main!(benches);
