use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drift_hash::{compute_hash, hash_value, to_hash_value, HashOpts};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

#[derive(Serialize)]
struct Container {
    name: String,
    image: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cpu_millis: u32,
}

#[derive(Serialize)]
struct PodSpec {
    replicas: u32,
    containers: Vec<Container>,
    labels: BTreeMap<String, String>,
    paused: bool,
}

fn make_spec(seed: u64, containers: usize) -> PodSpec {
    let mut rng = StdRng::seed_from_u64(seed);
    let containers = (0..containers)
        .map(|idx| Container {
            name: format!("c{idx}"),
            image: format!("registry.local/app:{}", rng.gen::<u16>()),
            args: (0..4).map(|arg| format!("--flag-{arg}={}", rng.gen::<u8>())).collect(),
            env: (0..8)
                .map(|key| (format!("ENV_{key}"), rng.gen::<u32>().to_string()))
                .collect(),
            cpu_millis: rng.gen_range(100..4000),
        })
        .collect();
    PodSpec {
        replicas: rng.gen_range(1..10),
        containers,
        labels: (0..6)
            .map(|key| (format!("label-{key}"), format!("value-{}", rng.gen::<u16>())))
            .collect(),
        paused: false,
    }
}

fn bench_hash(c: &mut Criterion) {
    let spec = make_spec(4242, 16);
    c.bench_function("compute_hash_pod_spec", |b| {
        b.iter(|| compute_hash(black_box(&spec)).expect("hash"))
    });

    let view = to_hash_value(&spec, &HashOpts::default()).expect("view");
    c.bench_function("hash_value_prebuilt_view", |b| {
        b.iter(|| hash_value(black_box(&view)).expect("hash"))
    });
}

criterion_group!(benches, bench_hash);
criterion_main!(benches);
