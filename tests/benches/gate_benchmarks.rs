//! # Delay Gate Benchmarks
//!
//! | Operation | Claim | Target |
//! |-----------|-------|--------|
//! | Call hashing | keccak over packed fields | < 5µs for 1 KB payload |
//! | Module membership | O(1) lookup | flat across registry sizes |
//! | Propose + execute | O(1) per slot | flat across queue depth |
//! | Module pagination | O(page) walk | linear in page size |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use delay_gate::prelude::*;
use rand::Rng;
use std::time::Duration;

const OWNER: Address = Address::new([0xA0; 20]);
const TARGET: Address = Address::new([0xB0; 20]);

fn module_address(i: u32) -> Address {
    let mut bytes = [0x10; 20];
    bytes[16..].copy_from_slice(&i.to_be_bytes());
    Address::new(bytes)
}

fn gate_with_modules(count: u32) -> DelayGate {
    let mut gate = DelayGate::initialize(OWNER, TARGET, 0, 0).expect("valid gate");
    for i in 0..count {
        gate.enable_module(OWNER, module_address(i))
            .expect("fresh module");
    }
    gate
}

// ============================================================================
// HASHING
// ============================================================================

fn bench_call_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("call-hashing");
    let mut rng = rand::thread_rng();

    for size in [0usize, 32, 256, 1024, 16 * 1024] {
        let data: Vec<u8> = (0..size).map(|_| rng.gen()).collect();
        let call = ProposedCall::new(
            Address::new([0x42; 20]),
            U256::from(rng.gen::<u64>()),
            Bytes::from(data),
            CallKind::Call,
        );

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("hash_call", size), &call, |b, call| {
            b.iter(|| black_box(hash_call(call)))
        });
    }

    group.finish();
}

// ============================================================================
// REGISTRY
// ============================================================================

fn bench_module_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("module-registry");

    for count in [10u32, 1_000, 10_000] {
        let gate = gate_with_modules(count);
        let present = module_address(count / 2);
        let absent = Address::new([0xEE; 20]);

        group.bench_with_input(BenchmarkId::new("is_enabled", count), &gate, |b, gate| {
            b.iter(|| {
                black_box(gate.is_module_enabled(&present));
                black_box(gate.is_module_enabled(&absent));
            })
        });
    }

    let gate = gate_with_modules(10_000);
    for page_size in [10usize, 100, 1_000] {
        group.throughput(Throughput::Elements(page_size as u64));
        group.bench_with_input(
            BenchmarkId::new("list_paginated", page_size),
            &page_size,
            |b, &page_size| {
                b.iter(|| black_box(gate.list_modules(Address::SENTINEL, page_size)))
            },
        );
    }

    group.finish();
}

// ============================================================================
// QUEUE
// ============================================================================

fn bench_queue_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("timelock-queue");
    group.measurement_time(Duration::from_secs(5));

    let module = module_address(0);
    let call = ProposedCall::call(Address::new([0x42; 20]), vec![0xAB; 64]);

    for backlog in [0u64, 1_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("propose_execute", backlog),
            &backlog,
            |b, &backlog| {
                let mut gate = gate_with_modules(1);
                for _ in 0..backlog {
                    gate.propose(module, call.clone(), 0).expect("enabled module");
                }
                gate.set_read_cursor(OWNER, backlog).ok();
                b.iter(|| {
                    gate.propose(module, call.clone(), 0).expect("enabled module");
                    black_box(gate.execute_next(&call, 0, |_, _| Ok(())))
                        .expect("head matches");
                    gate.drain_events();
                })
            },
        );
    }

    group.bench_function("skip_expired_1000", |b| {
        b.iter_batched(
            || {
                let mut gate =
                    DelayGate::initialize(OWNER, TARGET, 0, MIN_EXPIRATION_SECS).expect("gate");
                gate.enable_module(OWNER, module).expect("module");
                for _ in 0..1_000 {
                    gate.propose(module, call.clone(), 0).expect("enabled module");
                }
                gate
            },
            |mut gate| black_box(gate.skip_expired(MIN_EXPIRATION_SECS)),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_call_hashing,
    bench_module_lookup,
    bench_queue_cycle
);
criterion_main!(benches);
