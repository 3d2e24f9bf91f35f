use std::collections::BTreeMap;

use crate::config::{SQFT_PER_ACRE, UNKNOWN_YEAR_BUILT};
use crate::error::BausError;
use crate::params::BausParams;
use crate::tables::{
    area_per_employee_for, AreaPerEmployee, Building, BuildingInventory, BuildingType, Parcel,
    ParcelTable, ZoneId,
};

use super::types::{CapacityRecord, CapacitySummary, ExistingDevelopment, RawCapacity};

/// Zoned capacity of a parcel ignoring existing buildings.
pub fn raw_capacity(parcel: &Parcel, area: &AreaPerEmployee) -> Result<RawCapacity, BausError> {
    let zoning = &parcel.zoning;
    if zoning.nodev {
        return Ok(RawCapacity::default());
    }

    let zoned_du = if zoning.allowed.residential {
        parcel.acres * zoning.max_dua.unwrap_or(0.0)
    } else {
        0.0
    };

    let (zoned_sqft, job_spaces) = match zoning.allowed.primary_non_residential() {
        Some(use_) => {
            let sqft = parcel.acres * zoning.max_far.unwrap_or(0.0) * SQFT_PER_ACRE;
            let spaces = if sqft > 0.0 {
                sqft / area_per_employee_for(area, BuildingType::for_use(use_))?
            } else {
                0.0
            };
            (sqft, spaces)
        }
        None => (0.0, 0.0),
    };

    Ok(RawCapacity {
        zoned_du,
        zoned_sqft,
        job_spaces,
    })
}

fn existing_development(buildings: &[&Building]) -> ExistingDevelopment {
    ExistingDevelopment {
        building_count: buildings.len() as u32,
        residential_units: buildings.iter().map(|b| b.residential_units).sum(),
        non_residential_sqft: buildings.iter().map(|b| b.non_residential_sqft.max(0.0)).sum(),
        oldest_year_built: buildings
            .iter()
            .map(|b| b.year_built)
            .filter(|&y| y != UNKNOWN_YEAR_BUILT)
            .min(),
    }
}

/// Raw and net capacity for one parcel given the buildings standing on it.
pub fn net_capacity(
    parcel: &Parcel,
    buildings: &[&Building],
    params: &BausParams,
) -> Result<CapacityRecord, BausError> {
    let cp = &params.capacity;
    let raw = raw_capacity(parcel, &params.area_per_employee)?;
    let existing = existing_development(buildings);

    let vacant = buildings.is_empty()
        || buildings.iter().all(|b| b.building_type.is_vacant())
        || buildings.iter().all(|b| b.is_empty_shell());

    let existing_units = existing.residential_units as f64;
    let residual_units = (raw.zoned_du
        - existing_units
        - existing.non_residential_sqft / cp.sqft_per_unit)
        .max(0.0);

    // Nothing built means the parcel is entirely available.
    let underbuilt_ratio = if existing.residential_units == 0 {
        1.0
    } else {
        residual_units / existing_units
    };
    let underbuilt = underbuilt_ratio > cp.underbuilt_threshold;

    let historic = existing
        .oldest_year_built
        .is_some_and(|y| y < cp.protection_cutoff_year);
    let small_single_family = !buildings.is_empty()
        && buildings
            .iter()
            .all(|b| b.building_type == BuildingType::SingleFamily)
        && parcel.acres < cp.small_single_family_acres;
    let tiny = parcel.sqft() < cp.min_parcel_sqft;
    let protected = historic || small_single_family || tiny;

    let net_vacant = if vacant { residual_units } else { 0.0 };
    let net_underbuilt = if underbuilt { residual_units } else { 0.0 };
    let net_underbuilt_unprotected = if protected { 0.0 } else { net_underbuilt };

    Ok(CapacityRecord {
        parcel_id: parcel.id,
        zone_id: parcel.zone_id,
        raw,
        existing,
        residual_units,
        underbuilt_ratio,
        vacant,
        underbuilt,
        protected,
        net_vacant,
        net_underbuilt,
        net_underbuilt_unprotected,
    })
}

/// Capacity records for every parcel, in parcel-table order.
///
/// Fails if a building references a parcel missing from the table.
pub fn resolve_capacity(
    parcels: &ParcelTable,
    inventory: &BuildingInventory,
    params: &BausParams,
) -> Result<Vec<CapacityRecord>, BausError> {
    let by_parcel = inventory.by_parcel();
    if let Some(orphan) = inventory.iter().find(|b| !parcels.contains(b.parcel_id)) {
        return Err(BausError::UnknownParcel {
            building: orphan.id,
            parcel: orphan.parcel_id,
        });
    }

    parcels
        .iter()
        .map(|parcel| {
            let buildings = by_parcel
                .get(&parcel.id)
                .map(|v| v.as_slice())
                .unwrap_or(&[]);
            net_capacity(parcel, buildings, params)
        })
        .collect()
}

pub fn summarize_by_zone(records: &[CapacityRecord]) -> BTreeMap<ZoneId, CapacitySummary> {
    let mut out: BTreeMap<ZoneId, CapacitySummary> = BTreeMap::new();
    for r in records {
        let s = out.entry(r.zone_id).or_default();
        s.parcels += 1;
        s.zoned_du += r.raw.zoned_du;
        s.zoned_sqft += r.raw.zoned_sqft;
        s.job_spaces += r.raw.job_spaces;
        s.net_vacant += r.net_vacant;
        s.net_underbuilt += r.net_underbuilt;
        s.net_underbuilt_unprotected += r.net_underbuilt_unprotected;
    }
    out
}
