//! Benchmark for descriptor construction, storage estimation and config parsing

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use producer_device_info::device::storage::estimate_storage_size;
use producer_device_info::{ConfigOverrides, DeviceInfoFactory};
use std::time::Duration;

fn bench_create_default(c: &mut Criterion) {
    let mut group = c.benchmark_group("device_info");
    group.throughput(Throughput::Elements(1));

    let factory = DeviceInfoFactory::new().with_log_level_override(Some("3".into()));
    group.bench_function("create_default", |b| {
        b.iter(|| {
            let _ = black_box(factory.create_default());
        });
    });

    group.finish();
}

fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_sizing");
    group.throughput(Throughput::Elements(1));

    group.bench_function("estimate_storage_size", |b| {
        let mut bitrate = 1_000_000u64;
        b.iter(|| {
            bitrate = bitrate.wrapping_add(1);
            estimate_storage_size(
                black_box(16),
                black_box(bitrate),
                black_box(Duration::from_secs(120)),
            )
        });
    });

    group.finish();
}

fn bench_parse_overrides(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_file");

    let config = br#"{
        "STREAM_NAME": "porch",
        "RETENTION_HOURS": "24",
        "DEFAULT_DEVICE_STORAGE_TYPE": "HYBRID_FILE",
        "DEFAULT_DEVICE_STORAGE_SIZE": "268435456"
    }"#;
    group.throughput(Throughput::Bytes(config.len() as u64));

    group.bench_function("parse_overrides", |b| {
        b.iter(|| ConfigOverrides::parse(black_box(config)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_create_default,
    bench_estimate,
    bench_parse_overrides
);
criterion_main!(benches);
