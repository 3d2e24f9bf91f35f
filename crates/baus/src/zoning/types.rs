use serde::Serialize;

use crate::tables::{ParcelId, ZoneId};

/// Zoned capacity ignoring what is already built.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RawCapacity {
    pub zoned_du: f64,
    pub zoned_sqft: f64,
    pub job_spaces: f64,
}

/// What currently stands on a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ExistingDevelopment {
    pub building_count: u32,
    pub residential_units: u32,
    pub non_residential_sqft: f64,
    /// Earliest known year built, if any building reports one.
    pub oldest_year_built: Option<u32>,
}

/// Raw and net capacity for one parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityRecord {
    pub parcel_id: ParcelId,
    pub zone_id: ZoneId,
    pub raw: RawCapacity,
    pub existing: ExistingDevelopment,
    /// Unbuilt zoned units after existing development, never negative.
    pub residual_units: f64,
    /// `residual_units / existing units`, or 1 when nothing is built.
    pub underbuilt_ratio: f64,
    pub vacant: bool,
    pub underbuilt: bool,
    pub protected: bool,
    pub net_vacant: f64,
    pub net_underbuilt: f64,
    pub net_underbuilt_unprotected: f64,
}

/// Zone totals of raw and net capacity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CapacitySummary {
    pub parcels: u32,
    pub zoned_du: f64,
    pub zoned_sqft: f64,
    pub job_spaces: f64,
    pub net_vacant: f64,
    pub net_underbuilt: f64,
    pub net_underbuilt_unprotected: f64,
}
