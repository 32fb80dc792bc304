//! Benchmarks for Cascade placement
//!
//! Measures performance of:
//! - Breadth-first placement into trees of increasing size
//! - Level enumeration at the deepest level
//! - Cascading delete

use cascade_tree::{RelayNode, Tree};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Build a complete binary tree of `size` connectable relays under one head.
fn build_tree(size: u64) -> Tree<RelayNode<u64>> {
    let tree = Tree::new(RelayNode::fill);
    tree.insert(0);
    tree.toggle_head(&0).unwrap();
    tree.toggle_connectable(&0).unwrap();

    for id in 1..size {
        tree.insert(id);
        tree.insert_child(&id, true).unwrap();
    }
    tree
}

/// Depth of the deepest level in a complete binary tree of `size` nodes.
fn depth(size: u64) -> u32 {
    64 - size.leading_zeros()
}

/// Benchmark placing one more node into an existing tree
fn bench_insert_child(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_child");

    for &size in &[16u64, 256, 4096] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            let tree = build_tree(n);
            let mut next = n;
            b.iter(|| {
                tree.insert(next);
                let placement = tree.insert_child(black_box(&next), true);
                next += 1;
                placement
            })
        });
    }
    group.finish();
}

/// Benchmark enumerating the deepest level
fn bench_level_nodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_nodes");

    for &size in &[16u64, 256, 4096] {
        let tree = build_tree(size);
        let level = depth(size);
        group.bench_with_input(BenchmarkId::new("deepest", size), &level, |b, &l| {
            b.iter(|| tree.level_nodes(black_box(l)))
        });
    }
    group.finish();
}

/// Benchmark building a whole tree from scratch
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(20);

    for &size in &[256u64, 1024] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            b.iter(|| build_tree(black_box(n)))
        });
    }
    group.finish();
}

/// Benchmark deleting a relay, which scans every node
fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");

    for &size in &[256u64, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            let tree = build_tree(n);
            b.iter(|| {
                tree.delete(black_box(&(n - 1)));
                tree.insert(n - 1);
                tree.insert_child(&(n - 1), true)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert_child, bench_level_nodes, bench_build, bench_delete);
criterion_main!(benches);
