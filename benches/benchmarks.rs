//! Performance benchmarks for arbor

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::fs;
use tempfile::TempDir;

use arbor::disk::LogicalDisk;
use arbor::rules::{FilterEngine, FilterRule};
use arbor::tree::{ScanConfig, TreeWalker, render};

/// Build a tree of `width` top-level dirs, each with `width` subdirs holding
/// `files_per_dir` small files.
fn create_test_tree(width: usize, files_per_dir: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for outer in 0..width {
        for inner in 0..width {
            let subdir = dir.path().join(format!("dir_{outer}/sub_{inner}"));
            fs::create_dir_all(&subdir).unwrap();
            for file in 0..files_per_dir {
                fs::write(subdir.join(format!("file_{file}.txt")), "0123456789").unwrap();
            }
        }
    }
    dir
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    let small = create_test_tree(4, 4);
    let large = create_test_tree(8, 16);

    let plain = ScanConfig {
        include_files: true,
        ..Default::default()
    };
    let sized = ScanConfig {
        include_files: true,
        show_sizes: true,
        ..Default::default()
    };

    group.bench_function("plain_small", |b| {
        let walker = TreeWalker::new(&plain, &LogicalDisk);
        b.iter(|| walker.scan(black_box(small.path())).unwrap())
    });

    group.bench_function("sized_small", |b| {
        let walker = TreeWalker::new(&sized, &LogicalDisk);
        b.iter(|| walker.scan(black_box(small.path())).unwrap())
    });

    group.bench_function("sized_large", |b| {
        let walker = TreeWalker::new(&sized, &LogicalDisk);
        b.iter(|| walker.scan(black_box(large.path())).unwrap())
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let tree = create_test_tree(8, 16);
    let config = ScanConfig {
        include_files: true,
        show_sizes: true,
        ..Default::default()
    };
    let report = TreeWalker::new(&config, &LogicalDisk)
        .scan(tree.path())
        .unwrap();

    c.bench_function("render_sized_large", |b| {
        b.iter(|| render(black_box(&report), black_box(&config)))
    });
}

fn bench_filter(c: &mut Criterion) {
    let engine = FilterEngine::new(
        &[
            FilterRule::Folder("node_modules".to_string()),
            FilterRule::Folder(".git".to_string()),
            FilterRule::Ext(".log".to_string()),
        ],
        &[FilterRule::Ext(".rs".to_string())],
    );

    let mut group = c.benchmark_group("filter");

    group.bench_function("admitted_file", |b| {
        b.iter(|| engine.admits(black_box("main.rs"), false))
    });

    group.bench_function("ignored_dir", |b| {
        b.iter(|| engine.admits(black_box("node_modules"), true))
    });

    group.finish();
}

criterion_group!(benches, bench_scan, bench_render, bench_filter);
criterion_main!(benches);
