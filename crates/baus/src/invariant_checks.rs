//! Region invariant guards.
//!
//! Run after every simulation step. Occupied units and job spaces must not
//! exceed what each building offers, every agent's building must exist, and
//! capacity records must be finite and non-negative. Violations are logged
//! and counted, never fatal. Agents pointing at a missing building are reset
//! to unplaced so the next allocation rehouses them.

use tracing::warn;

use crate::error::BausError;
use crate::params::BausParams;
use crate::step::RegionState;
use crate::tables::{Agent, AgentId, AgentTable, Building, BuildingInventory};
use crate::zoning::CapacityRecord;

/// Violations found by the last [`check_region`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct InvariantViolations {
    pub over_occupied_units: u32,
    pub over_occupied_job_spaces: u32,
    pub dangling_households: u32,
    pub dangling_jobs: u32,
    pub invalid_capacity: u32,
}

impl InvariantViolations {
    pub fn total(&self) -> u32 {
        self.over_occupied_units
            + self.over_occupied_job_spaces
            + self.dangling_households
            + self.dangling_jobs
            + self.invalid_capacity
    }
}

// ---------------------------------------------------------------------------
// Agent references
// ---------------------------------------------------------------------------

fn reset_dangling<A: Agent>(agents: &mut AgentTable<A>, inventory: &BuildingInventory) -> u32 {
    let dangling: Vec<AgentId> = agents
        .iter()
        .filter(|a| a.building_id().is_some_and(|b| inventory.get(b).is_none()))
        .map(|a| a.id())
        .collect();
    for id in &dangling {
        warn!(
            "Invariant violation: {:?} {id} references a missing building. Unplacing.",
            A::KIND
        );
    }
    agents.unplace(&dangling);
    dangling.len() as u32
}

// ---------------------------------------------------------------------------
// Occupancy
// ---------------------------------------------------------------------------

fn over_occupied<A: Agent>(
    agents: &AgentTable<A>,
    inventory: &BuildingInventory,
    capacity: impl Fn(&Building) -> Result<u32, BausError>,
) -> Result<u32, BausError> {
    let mut count = 0;
    for (building_id, occupied) in agents.occupancy() {
        let Some(building) = inventory.get(building_id) else {
            continue;
        };
        let cap = capacity(building)?;
        if occupied > cap {
            warn!(
                "Invariant violation: building {building_id} holds {occupied} {:?} agents but has capacity {cap}.",
                A::KIND
            );
            count += 1;
        }
    }
    Ok(count)
}

// ---------------------------------------------------------------------------
// Capacity
// ---------------------------------------------------------------------------

/// Count capacity records with a negative or non-finite quantity.
pub fn check_capacity(records: &[CapacityRecord]) -> u32 {
    let mut count = 0;
    for r in records {
        let values = [
            r.raw.zoned_du,
            r.raw.zoned_sqft,
            r.raw.job_spaces,
            r.residual_units,
            r.underbuilt_ratio,
            r.net_vacant,
            r.net_underbuilt,
            r.net_underbuilt_unprotected,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            warn!(
                "Invariant violation: capacity of parcel {} is not finite and non-negative: {values:?}",
                r.parcel_id
            );
            count += 1;
        }
    }
    count
}

/// Check the region after a step, resetting dangling agent references.
pub fn check_region(
    state: &mut RegionState,
    records: &[CapacityRecord],
    params: &BausParams,
) -> Result<InvariantViolations, BausError> {
    let dangling_households = reset_dangling(&mut state.households, &state.buildings);
    let dangling_jobs = reset_dangling(&mut state.jobs, &state.buildings);

    let over_occupied_units = over_occupied(&state.households, &state.buildings, |b| {
        Ok(b.residential_units)
    })?;
    let over_occupied_job_spaces = over_occupied(&state.jobs, &state.buildings, |b| {
        b.job_spaces(&params.area_per_employee)
    })?;

    Ok(InvariantViolations {
        over_occupied_units,
        over_occupied_job_spaces,
        dangling_households,
        dangling_jobs,
        invalid_capacity: check_capacity(records),
    })
}
