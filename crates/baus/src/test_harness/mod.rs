//! # TestRegion: fluent builder for region fixtures
//!
//! Builds a [`RegionState`] from parcels, buildings and agents for unit,
//! scenario and bench code. `build()` does not check that buildings sit on
//! known parcels, so tests can construct inconsistent regions on purpose.

mod assertions;
mod fixtures;
mod synthetic;

pub use assertions::{assert_no_over_occupancy, assert_unique_slots};
pub use fixtures::{building, flat_rents, household, job, mixed_zoning, residential_zoning};

use crate::step::RegionState;
use crate::tables::{
    AgentTable, Building, BuildingInventory, Household, Job, Parcel, ParcelId, ParcelTable,
    ZoneId, Zoning,
};

#[derive(Debug, Clone, Default)]
pub struct TestRegion {
    parcels: Vec<Parcel>,
    buildings: Vec<Building>,
    households: Vec<Household>,
    jobs: Vec<Job>,
}

impl TestRegion {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    pub fn with_parcel(mut self, id: u64, acres: f64, zone: u32, zoning: Zoning) -> Self {
        self.parcels.push(Parcel {
            id: ParcelId(id),
            acres,
            zone_id: ZoneId(zone),
            zoning,
        });
        self
    }

    pub fn with_parcel_record(mut self, parcel: Parcel) -> Self {
        self.parcels.push(parcel);
        self
    }

    pub fn with_building(mut self, building: Building) -> Self {
        self.buildings.push(building);
        self
    }

    pub fn with_household(mut self, household: Household) -> Self {
        self.households.push(household);
        self
    }

    pub fn with_households(mut self, households: impl IntoIterator<Item = Household>) -> Self {
        self.households.extend(households);
        self
    }

    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn with_jobs(mut self, jobs: impl IntoIterator<Item = Job>) -> Self {
        self.jobs.extend(jobs);
        self
    }

    /// Panics on duplicate ids or invalid zoning.
    pub fn build(self) -> RegionState {
        RegionState {
            parcels: ParcelTable::new(self.parcels).expect("test parcels"),
            buildings: BuildingInventory::new(self.buildings).expect("test buildings"),
            households: AgentTable::new(self.households).expect("test households"),
            jobs: AgentTable::new(self.jobs).expect("test jobs"),
        }
    }
}
