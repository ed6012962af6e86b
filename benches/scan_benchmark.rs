//! Benchmarks for scanning and the coupling report

use std::fs;
use std::path::Path;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tempfile::TempDir;

use source_gates::{
    CouplingOptions, MemorySink, ScanOptions, build_coupling_report, count_local_includes,
    scan_sources,
};

fn generate_tree(root: &Path, dirs: usize, files_per_dir: usize) {
    for d in 0..dirs {
        let dir = root.join(format!("module_{}", d));
        fs::create_dir_all(&dir).unwrap();
        for f in 0..files_per_dir {
            let mut content = String::new();
            for i in 0..(f % 8) {
                content.push_str(&format!("#include \"module_{}/file_{}.hpp\"\n", d, i));
            }
            content.push_str("#include <vector>\n\nint value() { return 42; }\n");
            fs::write(dir.join(format!("file_{}.cpp", f)), &content).unwrap();
            fs::write(dir.join(format!("file_{}.hpp", f)), "#pragma once\n").unwrap();
        }
    }
}

fn bench_scan(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    generate_tree(dir.path(), 20, 25);

    c.bench_function("scan_sources_1000_files", |b| {
        b.iter(|| scan_sources(black_box(dir.path()), &ScanOptions::default()).unwrap())
    });
}

fn bench_coupling_report(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    generate_tree(dir.path(), 20, 25);
    let scan = scan_sources(dir.path(), &ScanOptions::default()).unwrap();

    c.bench_function("coupling_report_1000_files", |b| {
        b.iter(|| {
            let mut sink = MemorySink::default();
            build_coupling_report(black_box(&scan), &CouplingOptions::default(), &mut sink)
                .unwrap()
        })
    });
}

fn bench_count_local_includes(c: &mut Criterion) {
    let content: String = (0..500)
        .map(|i| format!("#include \"header_{}.hpp\"\nint f{}();\n", i, i))
        .collect();

    c.bench_function("count_local_includes_500", |b| {
        b.iter(|| count_local_includes(black_box(&content)))
    });
}

criterion_group!(
    benches,
    bench_scan,
    bench_coupling_report,
    bench_count_local_includes
);
criterion_main!(benches);
