use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use bacdive_enums::{
    config::DiscoveryConfig,
    discover::run_discovery,
    tables::{PathStat, ValueSample},
};

/// Synthetic strain dataset: `sections` lineages with a mix of categorical,
/// numeric, link-heavy and oversized siblings.
fn generate_dataset(sections: usize) -> (Vec<PathStat>, Vec<ValueSample>) {
    let mut stats = Vec::new();
    let mut samples = Vec::new();
    for section in 0..sections {
        let lineage = format!("[].Section {section}.details");
        let fields: [(&str, usize); 5] = [
            ("status", 3),
            ("temperature", 8),
            ("reference", 4),
            ("keyword", 40),
            ("oxygen tolerance.[]", 5),
        ];
        for (field, distinct) in fields {
            let path = format!("{lineage}.{field}");
            stats.push(PathStat {
                path: path.clone(),
                distinct_value_count: distinct as u64,
            });
            for i in 0..distinct {
                let value = match field {
                    "temperature" => format!("{}", 20 + i),
                    "reference" => format!("https://doi.org/10.{section}/{i}"),
                    "status" => format!("status-{i}"),
                    _ => format!("{field}-{section}-{i}"),
                };
                samples.push(ValueSample {
                    path: path.clone(),
                    value: Some(value),
                });
            }
        }
    }
    (stats, samples)
}

fn bench_discovery(c: &mut Criterion) {
    let config = DiscoveryConfig::default();
    let mut group = c.benchmark_group("discovery");
    for sections in [100usize, 1_000] {
        let (stats, samples) = generate_dataset(sections);
        group.bench_function(format!("run_discovery_{sections}_sections"), |b| {
            b.iter(|| black_box(run_discovery(&stats, &samples, &config)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_discovery);
criterion_main!(benches);
