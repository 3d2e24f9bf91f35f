//! Criterion benchmarks for capacity and feasibility.
//!
//! Benchmarks:
//!   - resolve_capacity over synthetic regions of 1K and 10K parcels
//!   - evaluate_feasibility over the same regions with every building form
//!
//! Run with: cargo bench -p baus --features bench --bench feasibility_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use baus::proforma::{evaluate_feasibility, BuildingForm};
use baus::test_harness::{flat_rents, TestRegion};
use baus::zoning::resolve_capacity;
use baus::BausParams;

const SIZES: [u64; 2] = [1_000, 10_000];
const ZONES: u32 = 50;

// ---------------------------------------------------------------------------
// Benchmark: capacity
// ---------------------------------------------------------------------------

fn bench_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_capacity");
    let params = BausParams::default();

    for parcels in SIZES {
        let region = TestRegion::synthetic(parcels, ZONES, 1).build();
        group.bench_with_input(BenchmarkId::from_parameter(parcels), &region, |b, region| {
            b.iter(|| {
                black_box(resolve_capacity(&region.parcels, &region.buildings, &params).unwrap())
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: pro forma
// ---------------------------------------------------------------------------

fn bench_feasibility(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_feasibility");
    group.sample_size(20);
    let params = BausParams::default();
    let rents = flat_rents(35.0, 0..ZONES);

    for parcels in SIZES {
        let region = TestRegion::synthetic(parcels, ZONES, 1).build();
        group.bench_with_input(BenchmarkId::from_parameter(parcels), &region, |b, region| {
            b.iter(|| {
                black_box(
                    evaluate_feasibility(
                        &region.parcels,
                        &region.buildings,
                        &rents,
                        &BuildingForm::ALL,
                        &params,
                    )
                    .unwrap(),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_capacity, bench_feasibility);
criterion_main!(benches);
