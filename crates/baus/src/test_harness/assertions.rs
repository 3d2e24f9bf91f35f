//! Assertion helpers over region state.

use std::collections::HashSet;

use crate::allocation::Slot;
use crate::params::BausParams;
use crate::step::RegionState;

/// Assert no building holds more households than units or more jobs than
/// job spaces.
pub fn assert_no_over_occupancy(region: &RegionState, params: &BausParams) {
    for (id, occupied) in region.households.occupancy() {
        let b = region
            .buildings
            .get(id)
            .unwrap_or_else(|| panic!("household in missing building {id}"));
        assert!(
            occupied <= b.residential_units,
            "building {id}: {occupied} households in {} units",
            b.residential_units
        );
    }
    for (id, occupied) in region.jobs.occupancy() {
        let b = region
            .buildings
            .get(id)
            .unwrap_or_else(|| panic!("job in missing building {id}"));
        let spaces = b.job_spaces(&params.area_per_employee).unwrap();
        assert!(
            occupied <= spaces,
            "building {id}: {occupied} jobs in {spaces} job spaces"
        );
    }
}

/// Assert an assignment list never uses the same slot index twice.
pub fn assert_unique_slots(assigned: &[usize], slots: &[Slot]) {
    let mut seen = HashSet::with_capacity(assigned.len());
    for &i in assigned {
        assert!(i < slots.len(), "slot index {i} out of range");
        assert!(seen.insert(i), "slot {i} assigned twice");
    }
}
