//! Region-scale tests through the public API.
//!
//! These tests build a county-sized region by hand and run several simulated
//! years over it:
//! - Capacity and feasibility cover every parcel without errors
//! - The developer keeps supply near the vacancy target year over year
//! - Allocation never over-fills a unit or job space
//! - A fixed seed reproduces the whole run
//!
//! Run: cargo test -p baus --test region_scale

use std::collections::HashMap;
use std::time::Instant;

use baus::proforma::{RentQuote, RentTable};
use baus::tables::{
    AgentId, AgentTable, AllowedUses, Building, BuildingId, BuildingInventory, BuildingType,
    Household, Job, Lineage, Parcel, ParcelId, ParcelTable, Use, ZoneId, Zoning,
};
use baus::{run_step, BausParams, RegionState, RngMode, StepContext, StepModels};

const PARCELS: u64 = 4_000;
const ZONES: u32 = 40;

// ---------------------------------------------------------------------------
// Region construction
// ---------------------------------------------------------------------------

/// Deterministic region: every third parcel is commercial, the rest housing.
/// Most parcels carry a small building; households and jobs slightly exceed
/// the existing stock.
fn county() -> RegionState {
    let mut parcels = Vec::new();
    let mut buildings = Vec::new();
    let mut households = Vec::new();
    let mut jobs = Vec::new();

    for id in 0..PARCELS {
        let zone = ZoneId((id % ZONES as u64) as u32);
        let commercial = id % 3 == 0;
        let acres = 0.1 + (id % 17) as f64 * 0.15;
        let zoning = Zoning {
            max_dua: Some(10.0 + (id % 7) as f64 * 10.0),
            max_far: Some(0.5 + (id % 5) as f64 * 0.75),
            max_height: None,
            allowed: if commercial {
                AllowedUses {
                    office: true,
                    retail: true,
                    ..AllowedUses::NONE
                }
            } else {
                AllowedUses::residential_only()
            },
            nodev: id % 50 == 0,
        };
        parcels.push(Parcel {
            id: ParcelId(id),
            acres,
            zone_id: zone,
            zoning,
        });

        if id % 4 == 3 {
            continue;
        }
        let (building_type, units, sqft) = if commercial {
            (BuildingType::Office, 0, 3_550.0 * (1 + id % 6) as f64)
        } else {
            (BuildingType::MultiFamily, 2 + (id % 9) as u32, 0.0)
        };
        buildings.push(Building {
            id: BuildingId(id),
            parcel_id: ParcelId(id),
            building_type,
            residential_units: units,
            deed_restricted_units: 0,
            non_residential_sqft: sqft,
            year_built: 1950 + (id % 60) as u32,
            residential_price: 0.0,
            non_residential_rent: 0.0,
            lineage: Lineage::BaseYear,
        });

        for i in 0..units + units / 5 {
            households.push(Household {
                id: AgentId(households.len() as u64),
                building_id: (i < units).then_some(BuildingId(id)),
                income_quartile: 1 + (i % 4) as u8,
                persons: 2,
                zone_id: None,
            });
        }
        let spaces = (sqft / 355.0) as u32;
        for i in 0..spaces + spaces / 5 {
            jobs.push(Job {
                id: AgentId(jobs.len() as u64),
                building_id: (i < spaces).then_some(BuildingId(id)),
                sector: if i % 2 == 0 { "OTHER" } else { "HEALTH" }.to_string(),
                zone_id: None,
            });
        }
    }

    RegionState::new(
        ParcelTable::new(parcels).unwrap(),
        BuildingInventory::new(buildings).unwrap(),
        AgentTable::new(households).unwrap(),
        AgentTable::new(jobs).unwrap(),
    )
    .unwrap()
}

fn rents() -> RentTable {
    let mut rents = RentTable::new();
    for zone in 0..ZONES {
        let premium = 1.0 + zone as f64 * 0.02;
        rents.set_zone(ZoneId(zone), Use::Residential, RentQuote::Price(700.0 * premium));
        rents.set_zone(ZoneId(zone), Use::Office, RentQuote::Rent(38.0 * premium));
        rents.set_zone(ZoneId(zone), Use::Retail, RentQuote::Rent(32.0 * premium));
        rents.set_zone(ZoneId(zone), Use::Industrial, RentQuote::Rent(14.0));
    }
    rents
}

fn assert_capacity_respected(state: &RegionState, params: &BausParams) {
    let mut households: HashMap<BuildingId, u32> = HashMap::new();
    for h in state.households.iter() {
        if let Some(b) = h.building_id {
            *households.entry(b).or_default() += 1;
        }
    }
    let mut jobs: HashMap<BuildingId, u32> = HashMap::new();
    for j in state.jobs.iter() {
        if let Some(b) = j.building_id {
            *jobs.entry(b).or_default() += 1;
        }
    }
    for b in state.buildings.iter() {
        let placed = households.get(&b.id).copied().unwrap_or(0);
        assert!(
            placed <= b.residential_units,
            "building {} holds {placed} households in {} units",
            b.id,
            b.residential_units
        );
        let spaces = b.job_spaces(&params.area_per_employee).unwrap();
        let placed = jobs.get(&b.id).copied().unwrap_or(0);
        assert!(placed <= spaces, "building {} holds {placed} jobs in {spaces} spaces", b.id);
    }
}

// ---------------------------------------------------------------------------
// 1. Five years over the county stay consistent
// ---------------------------------------------------------------------------

#[test]
fn test_five_years_over_county_region() {
    let mut state = county();
    let mut ctx = StepContext::new(BausParams::default(), 2020).unwrap();
    let rents = rents();
    let models = StepModels::default();
    let base_buildings = state.buildings.len();

    let start = Instant::now();
    for _ in 0..5 {
        let report = run_step(&mut ctx, &mut state, &rents, &models).unwrap();
        assert_eq!(report.violations.total(), 0, "year {}", report.year);
        assert!(report.feasible_rows > 0);
        assert_capacity_respected(&state, &ctx.params);
    }
    let elapsed = start.elapsed();

    assert_eq!(ctx.year, 2025);
    assert!(state.buildings.len() > base_buildings, "developer never built");
    assert!(
        state.households.unplaced_count() < state.households.len() / 10,
        "{} of {} households unplaced",
        state.households.unplaced_count(),
        state.households.len()
    );
    println!("5 years over {PARCELS} parcels: {elapsed:?}");
}

// ---------------------------------------------------------------------------
// 2. Same seed, same county, same result
// ---------------------------------------------------------------------------

#[test]
fn test_fixed_seed_reproduces_county_run() {
    let run = || {
        let mut params = BausParams::default();
        params.rng_mode = RngMode::Fixed(7);
        let mut ctx = StepContext::new(params, 2020).unwrap();
        let mut state = county();
        let rents = rents();
        for _ in 0..2 {
            run_step(&mut ctx, &mut state, &rents, &StepModels::default()).unwrap();
        }
        let placements: Vec<_> = state.households.iter().map(|h| h.building_id).collect();
        let new_parcels: Vec<_> = state
            .buildings
            .iter()
            .filter(|b| b.lineage != Lineage::BaseYear)
            .map(|b| (b.parcel_id, b.residential_units))
            .collect();
        (placements, new_parcels)
    };
    assert_eq!(run(), run());
}
