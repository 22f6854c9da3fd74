// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec throughput: eager encode/decode against lazy single-field reads.
//!
//! The lazy path should stay flat as the vector grows; the eager decode
//! grows linearly.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use repro::{Descriptor, EncodeOptions, Value, View};
use std::hint::black_box as bb;

const SIZES: &[usize] = &[8, 64, 512, 4096];

fn record_view() -> View {
    View::unchecked(
        Descriptor::struct_builder()
            .field("id", Descriptor::uint32())
            .char_field("code", 8)
            .string_field("label")
            .field("samples", Descriptor::vector(Descriptor::float64()))
            .field("names", Descriptor::vector(Descriptor::string()))
            .build(),
    )
}

fn record(n: usize) -> Value {
    Value::record([
        ("id", Value::from(42u32)),
        ("code", Value::from("ABCD1234")),
        ("label", Value::from("benchmark record")),
        (
            "samples",
            Value::List((0..n).map(|i| Value::Float(i as f64 * 0.5)).collect()),
        ),
        (
            "names",
            Value::List((0..n).map(|i| Value::String(format!("name-{}", i))).collect()),
        ),
    ])
}

fn bench_encode(c: &mut Criterion) {
    let view = record_view();
    let mut group = c.benchmark_group("encode");
    for &n in SIZES {
        let value = record(n);
        let len = view.byte_length(&value).unwrap_or(0);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &value, |b, value| {
            b.iter(|| view.encode(bb(value), EncodeOptions::default()));
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let view = record_view();
    let mut group = c.benchmark_group("decode");
    for &n in SIZES {
        let Ok(bytes) = view.encode(&record(n), EncodeOptions::default()) else {
            continue;
        };
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("eager", n), &bytes, |b, bytes| {
            b.iter(|| view.decode(bb(bytes)));
        });
        group.bench_with_input(BenchmarkId::new("lazy_path", n), &bytes, |b, bytes| {
            b.iter(|| {
                view.over(bb(bytes))
                    .and_then(|lens| lens.path("names.7")?.map(|l| l.to_value()).transpose())
            });
        });
    }
    group.finish();
}

fn bench_set(c: &mut Criterion) {
    let view = record_view();
    let Ok(bytes) = view.encode(&record(512), EncodeOptions::default()) else {
        return;
    };
    let mut bytes = bytes.into_owned();
    let id = Value::from(7u32);
    c.bench_function("set_fixed_field", |b| {
        b.iter(|| view.over_mut(&mut bytes).set("id", bb(&id)));
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_set);
criterion_main!(benches);
