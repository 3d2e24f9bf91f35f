//! Row constructors with neutral defaults.

use crate::proforma::RentTable;
use crate::proforma::RentQuote;
use crate::tables::{
    AgentId, AllowedUses, Building, BuildingId, BuildingType, Household, Job, Lineage, ParcelId,
    Use, ZoneId, Zoning,
};

/// Base-year building with no price or rent.
pub fn building(
    id: u64,
    parcel: u64,
    building_type: BuildingType,
    units: u32,
    non_residential_sqft: f64,
    year_built: u32,
) -> Building {
    Building {
        id: BuildingId(id),
        parcel_id: ParcelId(parcel),
        building_type,
        residential_units: units,
        deed_restricted_units: 0,
        non_residential_sqft,
        year_built,
        residential_price: 0.0,
        non_residential_rent: 0.0,
        lineage: Lineage::BaseYear,
    }
}

/// Housing only, limited by density.
pub fn residential_zoning(max_dua: f64) -> Zoning {
    Zoning {
        max_dua: Some(max_dua),
        allowed: AllowedUses::residential_only(),
        ..Default::default()
    }
}

/// Every use allowed, limited by density and FAR.
pub fn mixed_zoning(max_dua: f64, max_far: f64) -> Zoning {
    Zoning {
        max_dua: Some(max_dua),
        max_far: Some(max_far),
        allowed: AllowedUses::ALL,
        ..Default::default()
    }
}

pub fn household(id: u64, building: Option<u64>, income_quartile: u8) -> Household {
    Household {
        id: AgentId(id),
        building_id: building.map(BuildingId),
        income_quartile,
        persons: 2,
        zone_id: None,
    }
}

pub fn job(id: u64, building: Option<u64>, sector: &str) -> Job {
    Job {
        id: AgentId(id),
        building_id: building.map(BuildingId),
        sector: sector.to_string(),
        zone_id: None,
    }
}

/// The same yearly rent for every use in each of `zones`.
pub fn flat_rents(rent: f64, zones: impl IntoIterator<Item = u32>) -> RentTable {
    let mut rents = RentTable::new();
    for zone in zones {
        for use_ in Use::ALL {
            rents.set_zone(ZoneId(zone), use_, RentQuote::Rent(rent));
        }
    }
    rents
}
