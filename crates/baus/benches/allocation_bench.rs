//! Criterion benchmarks for agent allocation.
//!
//! Benchmarks:
//!   - allocate: 10K choosers over 10K and 100K weighted alternatives
//!   - allocate_partitioned: unplaced households of a 10K-parcel region
//!   - run_step: one full simulated year over a 2K-parcel region
//!
//! Run with: cargo bench -p baus --features bench --bench allocation_bench

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use baus::allocation::{allocate, allocate_partitioned, expand_slots, UniformWeights};
use baus::choice::Segmentation;
use baus::tables::AgentKind;
use baus::test_harness::{flat_rents, TestRegion};
use baus::{run_step, BausParams, SimRng, StepContext, StepModels};

// ---------------------------------------------------------------------------
// Benchmark: weighted assignment core
// ---------------------------------------------------------------------------

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");
    let choosers: Vec<u32> = (0..10_000).collect();

    for alternatives in [10_000u32, 100_000] {
        let alts: Vec<u32> = (0..alternatives).collect();
        let weights: Vec<f64> = alts.iter().map(|&a| 1.0 + (a % 7) as f64).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(alternatives),
            &(alts, weights),
            |b, (alts, weights)| {
                let mut rng = SimRng::from_seed_u64(3);
                b.iter(|| black_box(allocate(&choosers, alts, weights, &mut rng.0).unwrap()));
            },
        );
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: partitioned placement of a region's households
// ---------------------------------------------------------------------------

fn bench_place_households(c: &mut Criterion) {
    let params = BausParams::default();
    let region = TestRegion::synthetic(10_000, 50, 5).build();
    let slots = expand_slots(
        AgentKind::Household,
        &region.buildings,
        &region.parcels,
        &region.households.occupancy(),
        &params.area_per_employee,
    )
    .unwrap();

    c.bench_function("allocate_partitioned_households_10k_parcels", |b| {
        let mut rng = SimRng::from_seed_u64(5);
        b.iter_batched(
            || region.households.clone(),
            |mut households| {
                black_box(
                    allocate_partitioned(
                        &mut households,
                        &slots,
                        &UniformWeights,
                        Segmentation::None,
                        None,
                        &mut rng.0,
                    )
                    .unwrap(),
                )
            },
            BatchSize::LargeInput,
        );
    });
}

// ---------------------------------------------------------------------------
// Benchmark: full year
// ---------------------------------------------------------------------------

fn bench_full_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_step");
    group.sample_size(10);
    let region = TestRegion::synthetic(2_000, 20, 9).build();
    let rents = flat_rents(35.0, 0..20);

    group.bench_function("2k_parcels", |b| {
        b.iter_batched(
            || {
                let ctx = StepContext::new(BausParams::default(), 2020).unwrap();
                (ctx, region.clone())
            },
            |(mut ctx, mut state)| {
                black_box(run_step(&mut ctx, &mut state, &rents, &StepModels::default()).unwrap())
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_allocate, bench_place_households, bench_full_step);
criterion_main!(benches);
