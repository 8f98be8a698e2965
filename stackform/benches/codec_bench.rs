//! Benchmarks for the document codec.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stackform::{decode, encode, HealthCheck, ServiceRecord};

fn build_stack(count: usize) -> Vec<ServiceRecord> {
    (0..count)
        .map(|i| {
            let mut record = ServiceRecord::new(format!("svc{i}"), "nginx:alpine");
            record.host_port = format!("{}", 8000 + i);
            record.container_port = "80".to_string();
            record.environment = vec![format!("INDEX={i}"), "MODE=bench".to_string()];
            record.networks = vec!["backend".to_string()];
            record.health_check = HealthCheck {
                enabled: true,
                ..HealthCheck::default()
            };
            if i > 0 {
                record.depends_on = vec![format!("svc{}", i - 1)];
            }
            record
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let records = build_stack(20);
    c.bench_function("encode 20 services", |b| {
        b.iter(|| encode(black_box(&records), None).unwrap());
    });
}

fn bench_decode(c: &mut Criterion) {
    let yaml = encode(&build_stack(20), None).unwrap();
    c.bench_function("decode 20 services", |b| {
        b.iter(|| decode(black_box(&yaml)).unwrap());
    });
}

fn bench_round_trip(c: &mut Criterion) {
    let records = build_stack(10);
    c.bench_function("round trip 10 services", |b| {
        b.iter(|| {
            let yaml = encode(black_box(&records), None).unwrap();
            decode(&yaml).unwrap()
        });
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_round_trip);
criterion_main!(benches);
